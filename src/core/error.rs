use crate::core::state::{CreatureRef, Side};
use thiserror::Error;

/// Rejected operations and fatal turn failures reported by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("{0} roster is empty")]
    EmptyRoster(Side),

    #[error("{side} roster has {len} creatures, at most {max} are allowed")]
    RosterTooLarge { side: Side, len: usize, max: usize },

    #[error("{0} roster has no creature able to battle")]
    NoHealthyCreature(Side),

    #[error("unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("unknown move '{0}'")]
    UnknownMove(String),

    #[error("a creature can know at most {max} moves, got {count}")]
    TooManyMoves { count: usize, max: usize },

    #[error("effort values total {total}, at most {max} are allowed")]
    TooManyEffortValues { total: i32, max: i32 },

    #[error("move '{move_id}' has unsupported category '{category}'")]
    UnsupportedMoveCategory { move_id: String, category: String },

    #[error("{side} cannot use move slot {slot}: slot is empty")]
    InvalidMoveSlot { side: Side, slot: usize },

    #[error("{0} has no usable moves")]
    NoUsableMoves(Side),

    #[error("{side} cannot switch to slot {index}: {reason}")]
    InvalidSwitch {
        side: Side,
        index: usize,
        reason: &'static str,
    },

    #[error("creature reference {0} does not exist")]
    InvalidReference(CreatureRef),

    #[error("{0} already submitted a turn this round")]
    TurnAlreadySubmitted(Side),

    #[error("turns cannot be submitted while a round is executing")]
    RoundInProgress,

    #[error("the log must be drained before the battle can advance")]
    LogNotDrained,

    #[error("{0} must choose a replacement before the battle can advance")]
    SwitchPromptPending(Side),

    #[error("no turns are queued")]
    NoTurnsQueued,

    #[error("the battle is already finished")]
    BattleFinished,
}

/// Failures while loading lookup tables or configuration.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid data: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, BattleError>;

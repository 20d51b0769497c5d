pub mod ai;
pub mod core;
pub mod data;

pub use ai::{choose_highest_power, first_healthy_reserve, run_auto_battle};
pub use crate::core::{
    battle::{Battle, BattleEngine, BattleOptions, BattleOutcome, BattlePhase, StepOutcome},
    error::{BattleError, DataError},
    factory::{calc_stat, create_roster_member, CreateCreatureOptions},
    replay::replay_battle,
    rng::{RandomSource, ScriptedRng, SeededRng},
    state::{Action, BattleCreature, BattleHistory, CreatureRef, RosterMember, Side, StageKind},
    turn::{Turn, TurnOrderKey, TurnRank},
    utils::{apply_accuracy_stage, apply_stat_stage, Multiplier},
};
pub use data::{
    growth::{xp_for_next_level, GrowthRate},
    moves::{MoveCategory, MoveData, MoveDatabase},
    species::{BaseStats, SpeciesData, SpeciesDatabase},
    type_chart::{EffectivenessBand, TypeChart},
};

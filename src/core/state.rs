use crate::core::error::{BattleError, Result};
use crate::core::utils::{apply_stat_stage, MAX_STAGE, MIN_STAGE};
use crate::data::growth::GrowthRate;
use crate::data::moves::{MoveData, MoveDatabase};
use crate::data::species::SpeciesDatabase;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ROSTER_SIZE: usize = 6;
pub const MAX_MOVES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// A roster slot on one side of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureRef {
    pub side: Side,
    pub slot: usize,
}

impl CreatureRef {
    pub fn new(side: Side, slot: usize) -> Self {
        Self { side, slot }
    }
}

impl fmt::Display for CreatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.slot)
    }
}

/// Level-derived battle stats before stage modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: i32,
    pub defense: i32,
    pub sp_attack: i32,
    pub sp_defense: i32,
    pub speed: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StageKind {
    pub const ALL: [StageKind; 7] = [
        StageKind::Attack,
        StageKind::Defense,
        StageKind::SpAttack,
        StageKind::SpDefense,
        StageKind::Speed,
        StageKind::Accuracy,
        StageKind::Evasion,
    ];
}

/// Temporary in-battle modifiers, each kept within [-6, 6].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStatStages")]
pub struct StatStages {
    atk: i32,
    def: i32,
    spa: i32,
    spd: i32,
    spe: i32,
    accuracy: i32,
    evasion: i32,
}

/// Stages as stored; clamped on the way in.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawStatStages {
    atk: i32,
    def: i32,
    spa: i32,
    spd: i32,
    spe: i32,
    accuracy: i32,
    evasion: i32,
}

impl From<RawStatStages> for StatStages {
    fn from(raw: RawStatStages) -> Self {
        let clamp = |value: i32| value.clamp(MIN_STAGE, MAX_STAGE);
        Self {
            atk: clamp(raw.atk),
            def: clamp(raw.def),
            spa: clamp(raw.spa),
            spd: clamp(raw.spd),
            spe: clamp(raw.spe),
            accuracy: clamp(raw.accuracy),
            evasion: clamp(raw.evasion),
        }
    }
}

impl StatStages {
    pub fn get(&self, kind: StageKind) -> i32 {
        match kind {
            StageKind::Attack => self.atk,
            StageKind::Defense => self.def,
            StageKind::SpAttack => self.spa,
            StageKind::SpDefense => self.spd,
            StageKind::Speed => self.spe,
            StageKind::Accuracy => self.accuracy,
            StageKind::Evasion => self.evasion,
        }
    }

    fn slot_mut(&mut self, kind: StageKind) -> &mut i32 {
        match kind {
            StageKind::Attack => &mut self.atk,
            StageKind::Defense => &mut self.def,
            StageKind::SpAttack => &mut self.spa,
            StageKind::SpDefense => &mut self.spd,
            StageKind::Speed => &mut self.spe,
            StageKind::Accuracy => &mut self.accuracy,
            StageKind::Evasion => &mut self.evasion,
        }
    }

    pub fn set(&mut self, kind: StageKind, value: i32) {
        *self.slot_mut(kind) = value.clamp(MIN_STAGE, MAX_STAGE);
    }

    /// Returns the change actually applied after clamping.
    pub fn adjust(&mut self, kind: StageKind, delta: i32) -> i32 {
        let slot = self.slot_mut(kind);
        let before = *slot;
        *slot = (before + delta).clamp(MIN_STAGE, MAX_STAGE);
        *slot - before
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_neutral(&self) -> bool {
        StageKind::ALL.iter().all(|kind| self.get(*kind) == 0)
    }
}

/// Permanent move record on a roster entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: String,
    pub pp: u32,
}

/// The persistent roster record a battle creature is snapshotted from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub species_id: String,
    pub name: String,
    pub level: u32,
    /// Progress toward the next level.
    #[serde(default)]
    pub experience: u32,
    pub moves: Vec<MoveSlot>,
    pub hp: i32,
    pub max_hp: i32,
    pub stats: Stats,
}

/// A move as used inside one battle; PP is a battle-local copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleMove {
    pub data: MoveData,
    pub pp: u32,
    pub max_pp: u32,
}

impl BattleMove {
    pub fn new(data: MoveData, pp: u32) -> Self {
        let max_pp = data.pp;
        Self {
            data,
            pp: pp.min(max_pp),
            max_pp,
        }
    }

    pub fn consume_pp(&mut self) {
        self.pp = self.pp.saturating_sub(1);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleCreature {
    pub species_id: String,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub types: Vec<String>,
    pub base_exp: u32,
    pub growth_rate: GrowthRate,
    /// Always `MAX_MOVES` long; `None` marks an empty slot.
    pub moves: Vec<Option<BattleMove>>,
    pub hp: i32,
    pub max_hp: i32,
    pub stats: Stats,
    pub stages: StatStages,
    pub flee_attempts: u32,
    pub fainted: bool,
}

impl BattleCreature {
    pub fn from_roster(
        member: &RosterMember,
        species_db: &SpeciesDatabase,
        move_db: &MoveDatabase,
    ) -> Result<Self> {
        let species = species_db
            .get(&member.species_id)
            .ok_or_else(|| BattleError::UnknownSpecies(member.species_id.clone()))?;
        if member.moves.len() > MAX_MOVES {
            return Err(BattleError::TooManyMoves {
                count: member.moves.len(),
                max: MAX_MOVES,
            });
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        for slot in &member.moves {
            let data = move_db
                .get(&slot.move_id)
                .ok_or_else(|| BattleError::UnknownMove(slot.move_id.clone()))?;
            moves.push(Some(BattleMove::new(data.clone(), slot.pp)));
        }
        moves.resize(MAX_MOVES, None);

        let hp = member.hp.max(0);
        Ok(Self {
            species_id: species.id.clone(),
            name: member.name.clone(),
            level: member.level,
            experience: member.experience,
            types: species.types.clone(),
            base_exp: species.base_exp,
            growth_rate: species.growth_rate,
            moves,
            hp,
            max_hp: member.max_hp,
            stats: member.stats,
            stages: StatStages::default(),
            flee_attempts: 0,
            fainted: hp <= 0,
        })
    }

    /// Copies the state that outlives a battle back onto the roster record.
    pub fn write_back(&self, member: &mut RosterMember) {
        member.hp = self.hp;
        member.level = self.level;
        member.experience = self.experience;
        for (slot, battle_move) in member.moves.iter_mut().zip(self.moves.iter()) {
            if let Some(battle_move) = battle_move {
                slot.pp = battle_move.pp;
            }
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    pub fn attack(&self) -> i32 {
        apply_stat_stage(self.stats.attack, self.stages.get(StageKind::Attack))
    }

    pub fn defense(&self) -> i32 {
        apply_stat_stage(self.stats.defense, self.stages.get(StageKind::Defense))
    }

    pub fn sp_attack(&self) -> i32 {
        apply_stat_stage(self.stats.sp_attack, self.stages.get(StageKind::SpAttack))
    }

    pub fn sp_defense(&self) -> i32 {
        apply_stat_stage(self.stats.sp_defense, self.stages.get(StageKind::SpDefense))
    }

    pub fn speed(&self) -> i32 {
        apply_stat_stage(self.stats.speed, self.stages.get(StageKind::Speed))
    }

    pub fn move_in_slot(&self, slot: usize) -> Option<&BattleMove> {
        self.moves.get(slot).and_then(Option::as_ref)
    }

    /// Indices of the slots that hold a move, regardless of remaining PP.
    pub fn filled_move_slots(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|_| idx))
            .collect()
    }

    /// Health floors at zero; returns the health actually lost.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - damage.max(0)).max(0);
        before - self.hp
    }
}

/// What a side chooses to do for a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Attack { slot: usize },
    Switch { index: usize },
    Flee,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub side: Side,
    pub action: Action,
    /// Submitted in answer to a switch prompt.
    #[serde(default)]
    pub forced_switch: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub actions: Vec<RecordedAction>,
    pub log: Vec<String>,
    pub rng: Vec<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleHistory {
    pub rounds: Vec<RoundRecord>,
}

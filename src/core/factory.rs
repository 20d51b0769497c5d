use crate::core::error::{BattleError, Result};
use crate::core::state::{MoveSlot, RosterMember, Stats, MAX_MOVES};
use crate::data::moves::MoveDatabase;
use crate::data::species::SpeciesData;
use serde::{Deserialize, Serialize};

pub const MAX_TOTAL_EVS: i32 = 510;

/// EVStats represents effort values for each stat (max 252 per stat, 510 total)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EVStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

impl EVStats {
    pub fn total(&self) -> i32 {
        self.hp + self.atk + self.def + self.spa + self.spd + self.spe
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateCreatureOptions {
    pub moves: Option<Vec<String>>,
    pub name: Option<String>,
    pub level: Option<u32>,
    pub evs: Option<EVStats>,
}

pub fn calc_stat(base: i32, is_hp: bool, level: i32, iv: i32, ev: i32) -> i32 {
    if is_hp {
        ((base * 2 + iv + (ev / 4)) * level) / 100 + level + 10
    } else {
        ((base * 2 + iv + (ev / 4)) * level) / 100 + 5
    }
}

/// Builds a full-health roster record for a species at the requested level.
pub fn create_roster_member(
    species: &SpeciesData,
    options: CreateCreatureOptions,
    move_db: &MoveDatabase,
) -> Result<RosterMember> {
    let level = options.level.unwrap_or(5).clamp(1, 100);
    let iv = 31;
    let evs = options.evs.unwrap_or_default();
    if evs.total() > MAX_TOTAL_EVS {
        return Err(BattleError::TooManyEffortValues {
            total: evs.total(),
            max: MAX_TOTAL_EVS,
        });
    }
    let stats = &species.base_stats;
    let lvl = level as i32;

    let requested = options.moves.unwrap_or_default();
    if requested.len() > MAX_MOVES {
        return Err(BattleError::TooManyMoves {
            count: requested.len(),
            max: MAX_MOVES,
        });
    }
    let moves = requested
        .into_iter()
        .map(|move_id| {
            let data = move_db
                .get(&move_id)
                .ok_or_else(|| BattleError::UnknownMove(move_id.clone()))?;
            Ok(MoveSlot { pp: data.pp, move_id })
        })
        .collect::<Result<Vec<_>>>()?;

    let max_hp = calc_stat(stats.hp, true, lvl, iv, evs.hp);
    Ok(RosterMember {
        species_id: species.id.clone(),
        name: options.name.unwrap_or_else(|| species.name.clone()),
        level,
        experience: 0,
        moves,
        hp: max_hp,
        max_hp,
        stats: Stats {
            attack: calc_stat(stats.atk, false, lvl, iv, evs.atk),
            defense: calc_stat(stats.def, false, lvl, iv, evs.def),
            sp_attack: calc_stat(stats.spa, false, lvl, iv, evs.spa),
            sp_defense: calc_stat(stats.spd, false, lvl, iv, evs.spd),
            speed: calc_stat(stats.spe, false, lvl, iv, evs.spe),
        },
    })
}

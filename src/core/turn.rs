use crate::core::battle::Battle;
use crate::core::error::{BattleError, Result};
use crate::core::experience::{experience_yield, gain_experience};
use crate::core::state::{Action, CreatureRef, Side, StageKind};
use crate::core::utils::{apply_accuracy_stage, Multiplier, MAX_STAGE, MIN_STAGE};
use crate::data::moves::MoveCategory;
use crate::data::type_chart::{EffectivenessBand, TypeChart};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One side's committed action for a round, bound to the creature performing it.
///
/// The target is resolved to the opposing side's active creature when the
/// turn executes, so an earlier switch in the same round is respected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Attack {
        user: CreatureRef,
        target: Side,
        slot: usize,
    },
    Switch {
        user: CreatureRef,
        new_index: usize,
    },
    Flee {
        user: CreatureRef,
        target: Side,
    },
}

/// Resolution class of a turn; earlier variants always act first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TurnRank {
    Flee,
    Switch,
    Attack,
}

/// Everything needed to place a turn in the round order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurnOrderKey {
    pub rank: TurnRank,
    /// Move priority; always 0 for flee and switch turns.
    pub priority: i32,
    /// Effective speed of the user.
    pub speed: i32,
}

impl Ord for TurnOrderKey {
    /// `Less` means "acts first".
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.speed.cmp(&self.speed))
    }
}

impl PartialOrd for TurnOrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Turn {
    /// Binds a side's action to its current active creature.
    pub fn bind(side: Side, active_slot: usize, action: &Action) -> Self {
        let user = CreatureRef::new(side, active_slot);
        match *action {
            Action::Attack { slot } => Turn::Attack {
                user,
                target: side.opponent(),
                slot,
            },
            Action::Switch { index } => Turn::Switch {
                user,
                new_index: index,
            },
            Action::Flee => Turn::Flee {
                user,
                target: side.opponent(),
            },
        }
    }

    pub fn user(&self) -> CreatureRef {
        match self {
            Turn::Attack { user, .. } | Turn::Switch { user, .. } | Turn::Flee { user, .. } => *user,
        }
    }

    pub fn side(&self) -> Side {
        self.user().side
    }

    pub fn action(&self) -> Action {
        match self {
            Turn::Attack { slot, .. } => Action::Attack { slot: *slot },
            Turn::Switch { new_index, .. } => Action::Switch { index: *new_index },
            Turn::Flee { .. } => Action::Flee,
        }
    }

    pub fn rank(&self) -> TurnRank {
        match self {
            Turn::Attack { .. } => TurnRank::Attack,
            Turn::Switch { .. } => TurnRank::Switch,
            Turn::Flee { .. } => TurnRank::Flee,
        }
    }

    pub fn order_key(&self, battle: &Battle<'_>) -> Result<TurnOrderKey> {
        let user = battle.creature(self.user())?;
        let priority = match self {
            Turn::Attack { slot, .. } => user
                .move_in_slot(*slot)
                .map(|m| m.data.priority)
                .unwrap_or(0),
            Turn::Switch { .. } | Turn::Flee { .. } => 0,
        };
        Ok(TurnOrderKey {
            rank: self.rank(),
            priority,
            speed: user.speed(),
        })
    }

    /// Runs the turn against the battle. `Ok(true)` means the battle ends
    /// immediately (a successful escape).
    pub fn execute(&self, battle: &mut Battle<'_>) -> Result<bool> {
        let ended = match *self {
            Turn::Attack { user, target, slot } => execute_attack(battle, user, target, slot)?,
            Turn::Switch { user, new_index } => execute_switch(battle, user, new_index)?,
            Turn::Flee { user, target } => execute_flee(battle, user, target)?,
        };
        battle.mark_log_dirty();
        Ok(ended)
    }
}

/// Damage before type and same-type multipliers.
pub fn base_damage(level: u32, attack: i32, power: u32, defense: i32) -> i64 {
    let level_factor = 2 * level as i64 / 5 + 2;
    let attack = attack.max(0) as i64;
    let defense = defense.max(1) as i64;
    (level_factor * attack * power as i64 / defense) / 50 + 2
}

/// Type effectiveness against every defending type, then 1.5x for each of the
/// user's types matching the move. A user whose two types both match gets 2.25x.
pub fn attack_multiplier(
    chart: &TypeChart,
    move_type: &str,
    user_types: &[String],
    target_types: &[String],
) -> Multiplier {
    let mut multiplier = chart.effectiveness(move_type, target_types);
    for user_type in user_types {
        if user_type.eq_ignore_ascii_case(move_type) {
            multiplier = multiplier * Multiplier::SAME_TYPE_BONUS;
        }
    }
    multiplier
}

/// Accuracy after folding the attacker's accuracy stage against the defender's evasion.
pub fn effective_accuracy(base_accuracy: u32, accuracy_stage: i32, evasion_stage: i32) -> i32 {
    let combined = (accuracy_stage - evasion_stage).clamp(MIN_STAGE, MAX_STAGE);
    apply_accuracy_stage(base_accuracy as i32, combined).clamp(0, 100)
}

/// Odds out of 256 of escaping; wraps like the 8-bit value it models.
pub fn escape_chance(user_speed: u32, target_speed: u32, attempts: u32) -> u8 {
    let ratio = user_speed as u64 * 128 / target_speed.max(1) as u64;
    ((ratio + 30 * attempts as u64) % 256) as u8
}

fn execute_attack(battle: &mut Battle<'_>, user_ref: CreatureRef, target_side: Side, slot: usize) -> Result<bool> {
    let target_ref = battle.active_ref(target_side);

    let user = battle.creature(user_ref)?;
    let move_data = user
        .move_in_slot(slot)
        .ok_or(BattleError::InvalidMoveSlot {
            side: user_ref.side,
            slot,
        })?
        .data
        .clone();
    let attack_stat = match move_data.category {
        MoveCategory::Physical => user.attack(),
        MoveCategory::Special => user.sp_attack(),
        MoveCategory::Status => {
            return Err(BattleError::UnsupportedMoveCategory {
                move_id: move_data.id.clone(),
                category: move_data.category.to_string(),
            })
        }
    };
    let user_name = user.name.clone();
    let user_level = user.level;
    let user_types = user.types.clone();
    let accuracy_stage = user.stages.get(StageKind::Accuracy);

    let target = battle.creature(target_ref)?;
    let defense_stat = match move_data.category {
        MoveCategory::Physical => target.defense(),
        _ => target.sp_defense(),
    };
    let target_name = target.name.clone();
    let target_types = target.types.clone();
    let accuracy = effective_accuracy(move_data.accuracy, accuracy_stage, target.stages.get(StageKind::Evasion));

    battle.push_log(format!("{} used {}!", user_name, move_data.display_name()));

    let roll = battle.draw(99);
    if (roll as i32) < accuracy {
        let multiplier = attack_multiplier(battle.type_chart(), &move_data.move_type, &user_types, &target_types);
        let damage = multiplier
            .apply(base_damage(user_level, attack_stat, move_data.power, defense_stat))
            .clamp(0, i32::MAX as i64) as i32;

        let target = battle.creature_mut(target_ref)?;
        target.take_damage(damage);
        let knocked_out = target.hp <= 0;
        let (defeated_base_exp, defeated_level) = (target.base_exp, target.level);
        if knocked_out {
            target.fainted = true;
        }

        tracing::debug!(attacker = %user_ref, defender = %target_ref, damage, %multiplier, "attack hit");
        battle.push_log(format!("{} took {} damage!", target_name, damage));
        if let Some(band) = EffectivenessBand::classify(multiplier) {
            battle.push_log(band.message().to_string());
        }

        if knocked_out {
            battle.push_log(format!("{} fainted!", target_name));
            if user_ref.side == Side::Player {
                award_experience(battle, user_ref, experience_yield(defeated_base_exp, defeated_level))?;
            }
        }
    } else {
        battle.push_log(format!("{} missed!", user_name));
    }

    if let Some(Some(battle_move)) = battle.creature_mut(user_ref)?.moves.get_mut(slot) {
        battle_move.consume_pp();
    }
    Ok(false)
}

fn award_experience(battle: &mut Battle<'_>, user_ref: CreatureRef, amount: u32) -> Result<()> {
    let max_level = battle.options().max_level;
    let creature = battle.creature_mut(user_ref)?;
    let name = creature.name.clone();
    let levels = gain_experience(creature, amount, max_level);

    battle.push_log(format!("{} gained {} experience!", name, amount));
    for level in levels {
        battle.push_log(format!("{} grew to level {}!", name, level));
    }
    Ok(())
}

fn execute_switch(battle: &mut Battle<'_>, user_ref: CreatureRef, new_index: usize) -> Result<bool> {
    let side = user_ref.side;
    battle.validate_switch(side, new_index)?;

    let outgoing = battle.creature_mut(user_ref)?;
    outgoing.stages.reset();
    let outgoing_name = outgoing.name.clone();

    battle.set_active(side, new_index);
    let incoming_name = battle.creature(CreatureRef::new(side, new_index))?.name.clone();

    match side {
        Side::Player => {
            battle.push_log(format!("Come back, {}!", outgoing_name));
            battle.push_log(format!("Go! {}!", incoming_name));
        }
        Side::Opponent => {
            battle.push_log(format!("The opponent withdrew {}!", outgoing_name));
            battle.push_log(format!("The opponent sent out {}!", incoming_name));
        }
    }
    Ok(false)
}

fn execute_flee(battle: &mut Battle<'_>, user_ref: CreatureRef, target_side: Side) -> Result<bool> {
    let target_ref = battle.active_ref(target_side);
    let target_speed = battle.creature(target_ref)?.speed().max(0) as u32;
    let user = battle.creature(user_ref)?;
    let user_speed = user.speed().max(0) as u32;
    let attempts = user.flee_attempts;
    let user_name = user.name.clone();

    // A target with no speed at all cannot give chase.
    let escaped = if target_speed == 0 {
        true
    } else {
        let chance = escape_chance(user_speed, target_speed, attempts);
        (battle.draw(255) as u8) < chance
    };

    if escaped {
        match user_ref.side {
            Side::Player => battle.push_log("Got away safely!".to_string()),
            Side::Opponent => battle.push_log(format!("{} fled!", user_name)),
        }
        return Ok(true);
    }

    battle.creature_mut(user_ref)?.flee_attempts += 1;
    match user_ref.side {
        Side::Player => battle.push_log("Can't escape!".to_string()),
        Side::Opponent => battle.push_log(format!("{} couldn't get away!", user_name)),
    }
    Ok(false)
}

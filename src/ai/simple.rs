use crate::core::battle::{Battle, StepOutcome};
use crate::core::error::Result;
use crate::core::state::{Action, Side};

/// Picks the filled move slot with the most power and PP left; ties go to the
/// lowest slot. Falls back to any filled slot when every move is out of PP.
pub fn choose_highest_power(battle: &Battle<'_>, side: Side) -> Option<Action> {
    let active = battle.active(side);
    if active.is_fainted() {
        return None;
    }

    let mut best: Option<(usize, u32)> = None;
    for (slot, battle_move) in active.moves.iter().enumerate() {
        let Some(battle_move) = battle_move else {
            continue;
        };
        if battle_move.pp == 0 {
            continue;
        }
        let power = battle_move.data.power;
        if best.map_or(true, |(_, best_power)| power > best_power) {
            best = Some((slot, power));
        }
    }

    best.map(|(slot, _)| slot)
        .or_else(|| active.filled_move_slots().first().copied())
        .map(|slot| Action::Attack { slot })
}

pub fn first_healthy_reserve(battle: &Battle<'_>, side: Side) -> Option<usize> {
    let active = battle.active_index(side);
    battle
        .roster(side)
        .iter()
        .enumerate()
        .find(|(idx, creature)| *idx != active && !creature.is_fainted())
        .map(|(idx, _)| idx)
}

/// Drives a battle until it finishes or `max_rounds` have been played,
/// answering switch prompts with the first healthy reserve. Returns every log
/// line produced along the way.
pub fn run_auto_battle(
    battle: &mut Battle<'_>,
    chooser: fn(&Battle<'_>, Side) -> Option<Action>,
    max_rounds: u32,
) -> Result<Vec<String>> {
    let mut log = Vec::new();
    let mut rounds = 0;
    while !battle.is_finished() && rounds < max_rounds {
        rounds += 1;
        for side in Side::BOTH {
            match chooser(battle, side) {
                Some(action) => battle.submit_turn(side, action)?,
                None => battle.add_default_action(side)?,
            }
        }

        loop {
            let step = battle.order_and_execute_next()?;
            log.extend(battle.drain_log());
            match step {
                StepOutcome::Continue => continue,
                StepOutcome::SwitchRequired(side) => {
                    let Some(index) = first_healthy_reserve(battle, side) else {
                        break;
                    };
                    battle.submit_turn(side, Action::Switch { index })?;
                }
                StepOutcome::RoundComplete | StepOutcome::Finished(_) => break,
            }
        }
    }
    Ok(log)
}

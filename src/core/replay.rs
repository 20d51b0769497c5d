use crate::core::battle::{Battle, BattleEngine};
use crate::core::error::Result;
use crate::core::rng::ScriptedRng;
use crate::core::state::{BattleHistory, RosterMember};

/// Re-runs a recorded battle from the same rosters, feeding back the recorded
/// actions and random draws round by round.
pub fn replay_battle<'e>(
    engine: &'e BattleEngine,
    player: &[RosterMember],
    opponent: &[RosterMember],
    history: &BattleHistory,
) -> Result<Battle<'e>> {
    let draws: Vec<u32> = history.rounds.iter().flat_map(|round| round.rng.iter().copied()).collect();
    let mut battle = engine.start_battle(player, opponent, Box::new(ScriptedRng::new(draws)))?;

    for round in &history.rounds {
        let mut forced = round.actions.iter().filter(|recorded| recorded.forced_switch);
        for recorded in round.actions.iter().filter(|recorded| !recorded.forced_switch) {
            battle.submit_turn(recorded.side, recorded.action.clone())?;
        }

        while battle.has_pending_turns() && !battle.is_finished() {
            battle.order_and_execute_next()?;
            battle.drain_log();
            if battle.needs_switch_prompt() {
                match forced.next() {
                    Some(recorded) => battle.submit_turn(recorded.side, recorded.action.clone())?,
                    None => break,
                }
            }
        }
        if battle.is_finished() {
            break;
        }
    }
    Ok(battle)
}

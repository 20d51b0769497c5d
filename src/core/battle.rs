use crate::core::error::{BattleError, DataError, Result};
use crate::core::rng::RandomSource;
use crate::core::state::{
    Action, BattleCreature, BattleHistory, CreatureRef, RecordedAction, RosterMember, RoundRecord, Side,
    MAX_ROSTER_SIZE,
};
use crate::core::turn::{Turn, TurnOrderKey};
use crate::data::growth::MAX_LEVEL;
use crate::data::moves::MoveDatabase;
use crate::data::species::SpeciesDatabase;
use crate::data::type_chart::TypeChart;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    pub record_history: bool,
    pub max_level: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            record_history: true,
            max_level: MAX_LEVEL,
        }
    }
}

impl BattleOptions {
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, DataError> {
        let options: Self = serde_yaml::from_str(yaml)?;
        if options.max_level == 0 || options.max_level > MAX_LEVEL {
            return Err(DataError::Invalid(format!(
                "max_level must be between 1 and {}",
                MAX_LEVEL
            )));
        }
        Ok(options)
    }
}

/// Read-only tables shared by every battle started from it.
#[derive(Clone, Debug, Default)]
pub struct BattleEngine {
    pub species_db: SpeciesDatabase,
    pub move_db: MoveDatabase,
    pub type_chart: TypeChart,
    pub options: BattleOptions,
}

impl BattleEngine {
    pub fn new(species_db: SpeciesDatabase, move_db: MoveDatabase, type_chart: TypeChart) -> Self {
        Self {
            species_db,
            move_db,
            type_chart,
            options: BattleOptions::default(),
        }
    }

    pub fn load_default() -> std::result::Result<Self, DataError> {
        Ok(Self::new(
            SpeciesDatabase::load_default()?,
            MoveDatabase::load_default()?,
            TypeChart::new(),
        ))
    }

    pub fn with_options(mut self, options: BattleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn snapshot(&self, member: &RosterMember) -> Result<BattleCreature> {
        BattleCreature::from_roster(member, &self.species_db, &self.move_db)
    }

    pub fn start_battle(
        &self,
        player: &[RosterMember],
        opponent: &[RosterMember],
        rng: Box<dyn RandomSource>,
    ) -> Result<Battle<'_>> {
        let player = player.iter().map(|m| self.snapshot(m)).collect::<Result<Vec<_>>>()?;
        let opponent = opponent.iter().map(|m| self.snapshot(m)).collect::<Result<Vec<_>>>()?;
        Battle::new(self, player, opponent, rng)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory { winner: Side },
    Fled { side: Side },
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattlePhase {
    AwaitingTurns,
    Executing,
    Finished,
}

/// What happened on one call to [`Battle::order_and_execute_next`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// More turns remain in this round.
    Continue,
    /// The round is over; the battle is waiting for new turns.
    RoundComplete,
    /// The side's active creature fainted and needs a replacement.
    SwitchRequired(Side),
    Finished(BattleOutcome),
}

pub struct Battle<'e> {
    engine: &'e BattleEngine,
    rosters: [Vec<BattleCreature>; 2],
    active: [usize; 2],
    queue: VecDeque<Turn>,
    log: VecDeque<String>,
    log_needs_draining: bool,
    switch_prompt: Option<Side>,
    phase: BattlePhase,
    outcome: Option<BattleOutcome>,
    round: u32,
    rng: Box<dyn RandomSource>,
    history: Option<BattleHistory>,
    current_round: RoundRecord,
}

impl fmt::Debug for Battle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("round", &self.round)
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("queue", &self.queue)
            .field("switch_prompt", &self.switch_prompt)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl<'e> Battle<'e> {
    pub fn new(
        engine: &'e BattleEngine,
        player: Vec<BattleCreature>,
        opponent: Vec<BattleCreature>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let player_lead = validate_roster(Side::Player, &player)?;
        let opponent_lead = validate_roster(Side::Opponent, &opponent)?;
        let history = engine.options.record_history.then(BattleHistory::default);

        Ok(Self {
            engine,
            rosters: [player, opponent],
            active: [player_lead, opponent_lead],
            queue: VecDeque::new(),
            log: VecDeque::new(),
            log_needs_draining: false,
            switch_prompt: None,
            phase: BattlePhase::AwaitingTurns,
            outcome: None,
            round: 1,
            rng,
            history,
            current_round: RoundRecord {
                round: 1,
                ..RoundRecord::default()
            },
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Side> {
        match self.outcome {
            Some(BattleOutcome::Victory { winner }) => Some(winner),
            _ => None,
        }
    }

    pub fn needs_switch_prompt(&self) -> bool {
        self.switch_prompt.is_some()
    }

    pub fn switch_prompt(&self) -> Option<Side> {
        self.switch_prompt
    }

    pub fn log_needs_draining(&self) -> bool {
        self.log_needs_draining
    }

    pub fn has_pending_turns(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending_turns(&self) -> impl Iterator<Item = &Turn> {
        self.queue.iter()
    }

    pub fn roster(&self, side: Side) -> &[BattleCreature] {
        &self.rosters[side.index()]
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut [BattleCreature] {
        &mut self.rosters[side.index()]
    }

    pub fn active_index(&self, side: Side) -> usize {
        self.active[side.index()]
    }

    pub fn active_ref(&self, side: Side) -> CreatureRef {
        CreatureRef::new(side, self.active_index(side))
    }

    pub fn active(&self, side: Side) -> &BattleCreature {
        &self.rosters[side.index()][self.active_index(side)]
    }

    pub fn active_mut(&mut self, side: Side) -> &mut BattleCreature {
        let idx = self.active_index(side);
        &mut self.rosters[side.index()][idx]
    }

    pub fn creature(&self, creature: CreatureRef) -> Result<&BattleCreature> {
        self.rosters[creature.side.index()]
            .get(creature.slot)
            .ok_or(BattleError::InvalidReference(creature))
    }

    pub fn creature_mut(&mut self, creature: CreatureRef) -> Result<&mut BattleCreature> {
        self.rosters[creature.side.index()]
            .get_mut(creature.slot)
            .ok_or(BattleError::InvalidReference(creature))
    }

    pub fn type_chart(&self) -> &'e TypeChart {
        &self.engine.type_chart
    }

    pub fn options(&self) -> &'e BattleOptions {
        &self.engine.options
    }

    pub fn history(&self) -> Option<&BattleHistory> {
        self.history.as_ref()
    }

    pub fn all_fainted(&self, side: Side) -> bool {
        self.roster(side).iter().all(BattleCreature::is_fainted)
    }

    /// Takes every pending log line, oldest first, and releases the battle to advance.
    pub fn drain_log(&mut self) -> Vec<String> {
        self.log_needs_draining = false;
        self.log.drain(..).collect()
    }

    /// Queues one side's action for the current round.
    ///
    /// While a switch prompt is pending only a switch for the prompted side is
    /// accepted; it runs next, ahead of whatever remains of the round.
    pub fn submit_turn(&mut self, side: Side, action: Action) -> Result<()> {
        if let Err(err) = self.check_submission(side, &action) {
            tracing::warn!(%side, ?action, %err, "turn rejected");
            return Err(err);
        }

        let turn = Turn::bind(side, self.active_index(side), &action);
        let forced_switch = self.switch_prompt.take().is_some();
        if forced_switch {
            self.queue.push_front(turn);
        } else {
            self.queue.push_back(turn);
        }
        if self.history.is_some() {
            self.current_round.actions.push(RecordedAction {
                side,
                action,
                forced_switch,
            });
        }
        Ok(())
    }

    fn check_submission(&self, side: Side, action: &Action) -> Result<()> {
        if self.is_finished() {
            return Err(BattleError::BattleFinished);
        }
        if let Some(prompted) = self.switch_prompt {
            return match action {
                Action::Switch { index } if side == prompted => self.validate_switch(side, *index),
                _ => Err(BattleError::SwitchPromptPending(prompted)),
            };
        }
        if self.phase == BattlePhase::Executing {
            return Err(BattleError::RoundInProgress);
        }
        if self.queue.iter().any(|turn| turn.side() == side) {
            return Err(BattleError::TurnAlreadySubmitted(side));
        }
        match action {
            Action::Attack { slot } => {
                if self.active(side).move_in_slot(*slot).is_none() {
                    return Err(BattleError::InvalidMoveSlot { side, slot: *slot });
                }
                Ok(())
            }
            Action::Switch { index } => self.validate_switch(side, *index),
            Action::Flee => Ok(()),
        }
    }

    pub(crate) fn validate_switch(&self, side: Side, index: usize) -> Result<()> {
        let invalid = |reason| BattleError::InvalidSwitch { side, index, reason };
        let roster = self.roster(side);
        let Some(target) = roster.get(index) else {
            return Err(invalid("no creature in that slot"));
        };
        if target.is_fainted() {
            return Err(invalid("that creature has fainted"));
        }
        if index == self.active_index(side) {
            return Err(invalid("that creature is already in battle"));
        }
        Ok(())
    }

    /// Submits an attack with a move slot picked uniformly at random among the
    /// active creature's filled slots.
    pub fn add_default_action(&mut self, side: Side) -> Result<()> {
        let slots = self.active(side).filled_move_slots();
        if slots.is_empty() {
            return Err(BattleError::NoUsableMoves(side));
        }
        // Any filled slot passes the same checks; reject before touching the rng.
        if let Err(err) = self.check_submission(side, &Action::Attack { slot: slots[0] }) {
            tracing::warn!(%side, %err, "default action rejected");
            return Err(err);
        }
        let pick = self.rng.next_int((slots.len() - 1) as u32) as usize;
        self.submit_turn(side, Action::Attack { slot: slots[pick] })
    }

    /// Executes the next queued turn, ordering the queue first when a round starts.
    pub fn order_and_execute_next(&mut self) -> Result<StepOutcome> {
        if self.is_finished() {
            return Err(BattleError::BattleFinished);
        }
        if self.log_needs_draining {
            return Err(BattleError::LogNotDrained);
        }
        if let Some(side) = self.switch_prompt {
            return Err(BattleError::SwitchPromptPending(side));
        }
        if self.queue.is_empty() {
            return Err(BattleError::NoTurnsQueued);
        }

        if self.phase == BattlePhase::AwaitingTurns {
            self.order_queue()?;
            self.phase = BattlePhase::Executing;
        }

        let Some(turn) = self.queue.pop_front() else {
            return Err(BattleError::NoTurnsQueued);
        };
        tracing::debug!(round = self.round, side = %turn.side(), action = ?turn.action(), "executing turn");

        let ended = match turn.execute(self) {
            Ok(ended) => ended,
            Err(err) => {
                tracing::warn!(round = self.round, %err, "turn failed, aborting round");
                self.abort_round(&turn);
                return Err(err);
            }
        };
        self.log_needs_draining = true;

        if ended {
            let outcome = BattleOutcome::Fled { side: turn.side() };
            self.finish(outcome);
            return Ok(StepOutcome::Finished(outcome));
        }
        if let Some(outcome) = self.victory_check() {
            self.finish(outcome);
            return Ok(StepOutcome::Finished(outcome));
        }

        for side in Side::BOTH {
            if self.active(side).is_fainted() {
                let fainted = self.active_ref(side);
                self.queue.retain(|queued| queued.user() != fainted);
                self.switch_prompt = Some(side);
                return Ok(StepOutcome::SwitchRequired(side));
            }
        }

        if self.queue.is_empty() {
            self.complete_round();
            return Ok(StepOutcome::RoundComplete);
        }
        Ok(StepOutcome::Continue)
    }

    /// Ends the battle without a winner. Queued turns are discarded.
    pub fn cancel(&mut self) {
        if self.is_finished() {
            return;
        }
        self.queue.clear();
        self.switch_prompt = None;
        self.push_log("The battle was called off.".to_string());
        self.log_needs_draining = true;
        self.finish(BattleOutcome::Cancelled);
    }

    /// Copies hp, level, experience and PP back onto the permanent roster records.
    pub fn write_back(&self, side: Side, roster: &mut [RosterMember]) {
        for (creature, member) in self.roster(side).iter().zip(roster.iter_mut()) {
            creature.write_back(member);
        }
    }

    fn order_queue(&mut self) -> Result<()> {
        let mut keyed: Vec<(TurnOrderKey, Turn)> = Vec::with_capacity(self.queue.len());
        for turn in &self.queue {
            keyed.push((turn.order_key(self)?, turn.clone()));
        }
        // Stable: equal keys keep submission order.
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.queue = keyed.into_iter().map(|(_, turn)| turn).collect();
        Ok(())
    }

    fn victory_check(&self) -> Option<BattleOutcome> {
        if self.all_fainted(Side::Opponent) {
            Some(BattleOutcome::Victory { winner: Side::Player })
        } else if self.all_fainted(Side::Player) {
            Some(BattleOutcome::Victory { winner: Side::Opponent })
        } else {
            None
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        tracing::info!(round = self.round, ?outcome, "battle finished");
        self.queue.clear();
        self.outcome = Some(outcome);
        self.phase = BattlePhase::Finished;
        self.close_round_record();
    }

    fn complete_round(&mut self) {
        self.phase = BattlePhase::AwaitingTurns;
        self.close_round_record();
        self.round += 1;
        self.current_round.round = self.round;
    }

    /// Drops the failed turn and everything still queued behind it, including
    /// their history entries, so a replay submits only what actually ran.
    fn abort_round(&mut self, failed: &Turn) {
        let mut discarded: Vec<Side> = vec![failed.side()];
        discarded.extend(self.queue.drain(..).map(|turn| turn.side()));
        for side in discarded {
            if let Some(pos) = self
                .current_round
                .actions
                .iter()
                .rposition(|recorded| recorded.side == side)
            {
                self.current_round.actions.remove(pos);
            }
        }
        self.complete_round();
    }

    fn close_round_record(&mut self) {
        let record = std::mem::take(&mut self.current_round);
        if let Some(history) = self.history.as_mut() {
            if !record.actions.is_empty() || !record.log.is_empty() {
                history.rounds.push(record);
            }
        }
    }

    pub(crate) fn set_active(&mut self, side: Side, index: usize) {
        self.active[side.index()] = index;
    }

    pub(crate) fn push_log(&mut self, message: String) {
        if self.history.is_some() {
            self.current_round.log.push(message.clone());
        }
        self.log.push_back(message);
    }

    pub(crate) fn mark_log_dirty(&mut self) {
        self.log_needs_draining = true;
    }

    /// Random draw made while resolving a turn; recorded for replay.
    pub(crate) fn draw(&mut self, inclusive_max: u32) -> u32 {
        let value = self.rng.next_int(inclusive_max);
        if self.history.is_some() {
            self.current_round.rng.push(value);
        }
        value
    }
}

/// Returns the slot of the first creature able to battle.
fn validate_roster(side: Side, roster: &[BattleCreature]) -> Result<usize> {
    if roster.is_empty() {
        return Err(BattleError::EmptyRoster(side));
    }
    if roster.len() > MAX_ROSTER_SIZE {
        return Err(BattleError::RosterTooLarge {
            side,
            len: roster.len(),
            max: MAX_ROSTER_SIZE,
        });
    }
    roster
        .iter()
        .position(|creature| !creature.is_fainted())
        .ok_or(BattleError::NoHealthyCreature(side))
}

use pocket_battle::core::battle::{Battle, BattleEngine, BattleOptions, BattleOutcome, BattlePhase, StepOutcome};
use pocket_battle::core::error::BattleError;
use pocket_battle::core::rng::ScriptedRng;
use pocket_battle::core::state::{
    Action, BattleCreature, BattleMove, CreatureRef, Side, StageKind, StatStages, Stats, MAX_MOVES,
};
use pocket_battle::core::turn::Turn;
use pocket_battle::data::growth::GrowthRate;
use pocket_battle::data::moves::{MoveCategory, MoveData, MoveDatabase};
use pocket_battle::data::species::SpeciesDatabase;
use pocket_battle::data::type_chart::TypeChart;

fn engine() -> BattleEngine {
    BattleEngine::new(SpeciesDatabase::new(), MoveDatabase::new(), TypeChart::new())
}

fn physical(id: &str) -> MoveData {
    MoveData {
        id: id.to_string(),
        name: None,
        move_type: "normal".to_string(),
        category: MoveCategory::Physical,
        power: 40,
        accuracy: 100,
        priority: 0,
        pp: 20,
    }
}

fn with_moves(name: &str, speed: i32, moves: Vec<Option<MoveData>>) -> BattleCreature {
    let mut slots: Vec<Option<BattleMove>> = moves
        .into_iter()
        .map(|data| data.map(|data| BattleMove::new(data, 20)))
        .collect();
    slots.resize(MAX_MOVES, None);
    BattleCreature {
        species_id: name.to_lowercase(),
        name: name.to_string(),
        level: 10,
        experience: 0,
        types: vec!["water".to_string()],
        base_exp: 64,
        growth_rate: GrowthRate::MediumFast,
        moves: slots,
        hp: 80,
        max_hp: 80,
        stats: Stats {
            attack: 20,
            defense: 20,
            sp_attack: 20,
            sp_defense: 20,
            speed,
        },
        stages: StatStages::default(),
        flee_attempts: 0,
        fainted: false,
    }
}

fn creature(name: &str, speed: i32) -> BattleCreature {
    with_moves(name, speed, vec![Some(physical("tackle"))])
}

fn fainted(name: &str) -> BattleCreature {
    let mut creature = creature(name, 10);
    creature.hp = 0;
    creature.fainted = true;
    creature
}

fn duel(engine: &BattleEngine) -> Battle<'_> {
    Battle::new(
        engine,
        vec![creature("Hero", 30)],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap()
}

#[test]
fn rosters_are_validated() {
    let engine = engine();
    let err = Battle::new(&engine, vec![], vec![creature("Rival", 20)], Box::new(ScriptedRng::default()))
        .unwrap_err();
    assert_eq!(err, BattleError::EmptyRoster(Side::Player));

    let seven: Vec<BattleCreature> = (0..7).map(|i| creature(&format!("Mon{}", i), 10)).collect();
    let err = Battle::new(&engine, vec![creature("Hero", 30)], seven, Box::new(ScriptedRng::default()))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::RosterTooLarge {
            side: Side::Opponent,
            len: 7,
            max: 6
        }
    );

    let err = Battle::new(
        &engine,
        vec![fainted("Down")],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap_err();
    assert_eq!(err, BattleError::NoHealthyCreature(Side::Player));
}

#[test]
fn lead_skips_fainted_creatures() {
    let engine = engine();
    let battle = Battle::new(
        &engine,
        vec![fainted("Down"), creature("Hero", 30)],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap();
    assert_eq!(battle.active_index(Side::Player), 1);
    assert_eq!(battle.active_ref(Side::Player), CreatureRef::new(Side::Player, 1));
    assert_eq!(battle.phase(), BattlePhase::AwaitingTurns);
    assert_eq!(battle.round(), 1);
}

#[test]
fn executing_with_nothing_queued_is_an_error() {
    let engine = engine();
    let mut battle = duel(&engine);
    assert_eq!(battle.order_and_execute_next().unwrap_err(), BattleError::NoTurnsQueued);
}

#[test]
fn one_turn_per_side_per_round() {
    let engine = engine();
    let mut battle = duel(&engine);
    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();
    assert_eq!(
        battle.submit_turn(Side::Player, Action::Flee).unwrap_err(),
        BattleError::TurnAlreadySubmitted(Side::Player)
    );
    assert_eq!(battle.pending_turns().count(), 1);
}

#[test]
fn empty_move_slots_cannot_be_used() {
    let engine = engine();
    let mut battle = duel(&engine);
    assert_eq!(
        battle.submit_turn(Side::Player, Action::Attack { slot: 2 }).unwrap_err(),
        BattleError::InvalidMoveSlot {
            side: Side::Player,
            slot: 2
        }
    );
    assert!(matches!(
        battle.submit_turn(Side::Player, Action::Attack { slot: 9 }),
        Err(BattleError::InvalidMoveSlot { .. })
    ));
}

#[test]
fn log_must_be_drained_between_steps() {
    let engine = engine();
    let mut battle = duel(&engine);
    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();
    battle.submit_turn(Side::Opponent, Action::Attack { slot: 0 }).unwrap();

    assert_eq!(battle.order_and_execute_next().unwrap(), StepOutcome::Continue);
    assert_eq!(battle.phase(), BattlePhase::Executing);
    assert!(battle.log_needs_draining());
    assert_eq!(battle.order_and_execute_next().unwrap_err(), BattleError::LogNotDrained);

    // Nothing new may be submitted mid-round.
    assert_eq!(
        battle.submit_turn(Side::Player, Action::Flee).unwrap_err(),
        BattleError::RoundInProgress
    );

    let log = battle.drain_log();
    assert_eq!(log, vec!["Hero used tackle!", "Rival took 6 damage!"]);
    assert!(!battle.log_needs_draining());
    assert!(battle.drain_log().is_empty());

    assert_eq!(battle.order_and_execute_next().unwrap(), StepOutcome::RoundComplete);
    assert_eq!(battle.drain_log(), vec!["Rival used tackle!", "Hero took 6 damage!"]);
    assert_eq!(battle.phase(), BattlePhase::AwaitingTurns);
    assert_eq!(battle.round(), 2);
}

#[test]
fn default_action_picks_among_filled_slots() {
    let engine = engine();
    let player = with_moves(
        "Hero",
        30,
        vec![Some(physical("tackle")), None, Some(physical("scratch")), Some(physical("pound"))],
    );
    let mut battle = Battle::new(
        &engine,
        vec![player],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::new([2])),
    )
    .unwrap();

    battle.add_default_action(Side::Player).unwrap();
    let queued: Vec<&Turn> = battle.pending_turns().collect();
    assert_eq!(
        queued,
        vec![&Turn::Attack {
            user: CreatureRef::new(Side::Player, 0),
            target: Side::Opponent,
            slot: 3,
        }]
    );
}

#[test]
fn default_action_needs_a_move() {
    let engine = engine();
    let mut battle = Battle::new(
        &engine,
        vec![with_moves("Empty", 30, vec![])],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap();
    let err = battle.add_default_action(Side::Player).unwrap_err();
    assert_eq!(err, BattleError::NoUsableMoves(Side::Player));
    assert_eq!(err.to_string(), "player has no usable moves");
}

#[test]
fn cancelled_battles_stay_finished() {
    let engine = engine();
    let mut battle = duel(&engine);
    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();

    battle.cancel();
    assert!(battle.is_finished());
    assert_eq!(battle.outcome(), Some(BattleOutcome::Cancelled));
    assert!(!battle.has_pending_turns());
    assert_eq!(battle.drain_log(), vec!["The battle was called off."]);

    assert_eq!(
        battle.submit_turn(Side::Player, Action::Flee).unwrap_err(),
        BattleError::BattleFinished
    );
    assert_eq!(battle.order_and_execute_next().unwrap_err(), BattleError::BattleFinished);
    battle.cancel();
    assert_eq!(battle.outcome(), Some(BattleOutcome::Cancelled));
    assert!(battle.drain_log().is_empty());
}

#[test]
fn finished_battles_reject_everything() {
    let engine = engine();
    let mut battle = Battle::new(
        &engine,
        vec![creature("Runner", 10)],
        vec![creature("Statue", 0)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap();
    battle.submit_turn(Side::Player, Action::Flee).unwrap();
    battle.order_and_execute_next().unwrap();
    battle.drain_log();

    assert_eq!(battle.outcome(), Some(BattleOutcome::Fled { side: Side::Player }));
    assert_eq!(
        battle.add_default_action(Side::Opponent).unwrap_err(),
        BattleError::BattleFinished
    );
    battle.cancel();
    assert_eq!(battle.outcome(), Some(BattleOutcome::Fled { side: Side::Player }));
}

#[test]
fn history_records_actions_log_and_draws() {
    let engine = engine();
    let mut battle = duel(&engine);
    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();
    battle.submit_turn(Side::Opponent, Action::Attack { slot: 0 }).unwrap();
    while battle.order_and_execute_next().unwrap() == StepOutcome::Continue {
        battle.drain_log();
    }
    battle.drain_log();

    let history = battle.history().unwrap();
    assert_eq!(history.rounds.len(), 1);
    let round = &history.rounds[0];
    assert_eq!(round.round, 1);
    assert_eq!(round.actions.len(), 2);
    assert!(round.actions.iter().all(|recorded| !recorded.forced_switch));
    // One accuracy roll per attack.
    assert_eq!(round.rng, vec![0, 0]);
    assert_eq!(round.log.len(), 4);
}

#[test]
fn history_can_be_switched_off() {
    let engine = engine().with_options(BattleOptions {
        record_history: false,
        ..BattleOptions::default()
    });
    let battle = duel(&engine);
    assert!(battle.history().is_none());
}

#[test]
fn rejected_default_action_leaves_the_rng_alone() {
    let engine = engine();
    let mut wild_swing = physical("wild_swing");
    wild_swing.accuracy = 50;
    let mut battle = Battle::new(
        &engine,
        vec![with_moves("Hero", 30, vec![Some(wild_swing)])],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::new([99, 0])),
    )
    .unwrap();

    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();
    assert_eq!(
        battle.add_default_action(Side::Player).unwrap_err(),
        BattleError::TurnAlreadySubmitted(Side::Player)
    );

    // The 99 is still there for the accuracy roll.
    battle.order_and_execute_next().unwrap();
    assert_eq!(battle.drain_log(), vec!["Hero used wild_swing!", "Hero missed!"]);
    assert_eq!(battle.active(Side::Opponent).hp, 80);
}

#[test]
fn creatures_can_be_adjusted_between_rounds() {
    let engine = engine();
    let mut battle = Battle::new(
        &engine,
        vec![creature("Hero", 30), creature("Reserve", 10)],
        vec![creature("Rival", 20)],
        Box::new(ScriptedRng::default()),
    )
    .unwrap();

    // 30 * 2 / 8 = 7, now slower than Rival.
    battle.active_mut(Side::Player).stages.set(StageKind::Speed, -6);
    assert_eq!(battle.active(Side::Player).speed(), 7);

    let reserve = &mut battle.roster_mut(Side::Player)[1];
    reserve.hp = 0;
    reserve.fainted = true;
    assert!(matches!(
        battle.submit_turn(Side::Player, Action::Switch { index: 1 }),
        Err(BattleError::InvalidSwitch { index: 1, .. })
    ));

    battle.submit_turn(Side::Player, Action::Attack { slot: 0 }).unwrap();
    battle.submit_turn(Side::Opponent, Action::Attack { slot: 0 }).unwrap();
    battle.order_and_execute_next().unwrap();
    assert_eq!(battle.drain_log()[0], "Rival used tackle!");
}

use pocket_battle::ai::{choose_highest_power, first_healthy_reserve, run_auto_battle};
use pocket_battle::core::battle::{BattleEngine, BattleOutcome};
use pocket_battle::core::factory::{create_roster_member, CreateCreatureOptions};
use pocket_battle::core::replay::replay_battle;
use pocket_battle::core::rng::SeededRng;
use pocket_battle::core::state::{Action, RosterMember, Side};

fn member(engine: &BattleEngine, species: &str, moves: &[&str]) -> RosterMember {
    create_roster_member(
        engine.species_db.get(species).unwrap(),
        CreateCreatureOptions {
            moves: Some(moves.iter().map(|m| m.to_string()).collect()),
            level: Some(15),
            ..Default::default()
        },
        &engine.move_db,
    )
    .unwrap()
}

fn teams(engine: &BattleEngine) -> (Vec<RosterMember>, Vec<RosterMember>) {
    let player = vec![
        member(engine, "cindermane", &["ember", "scratch"]),
        member(engine, "shellpup", &["water_gun", "tackle"]),
        member(engine, "sproutle", &["vine_whip", "poison_sting"]),
    ];
    let opponent = vec![
        member(engine, "voltmouse", &["thunder_shock", "quick_attack"]),
        member(engine, "pebblon", &["rock_throw", "mud_slap"]),
        member(engine, "scrapper", &["karate_chop", "scratch"]),
    ];
    (player, opponent)
}

#[test]
fn highest_power_move_is_chosen() {
    let engine = BattleEngine::load_default().unwrap();
    let (player, opponent) = teams(&engine);
    let battle = engine
        .start_battle(&player, &opponent, Box::new(SeededRng::from_seed(1)))
        .unwrap();

    // thunder_shock and quick_attack are both 40; the lower slot wins.
    assert_eq!(
        choose_highest_power(&battle, Side::Opponent),
        Some(Action::Attack { slot: 0 })
    );
    assert_eq!(first_healthy_reserve(&battle, Side::Player), Some(1));
}

#[test]
fn auto_battle_reaches_an_outcome() {
    let engine = BattleEngine::load_default().unwrap();
    let (player, opponent) = teams(&engine);
    let mut battle = engine
        .start_battle(&player, &opponent, Box::new(SeededRng::from_seed(7)))
        .unwrap();

    let log = run_auto_battle(&mut battle, choose_highest_power, 500).unwrap();
    assert!(battle.is_finished());
    assert!(matches!(battle.outcome(), Some(BattleOutcome::Victory { .. })));
    let loser = battle.winner().unwrap().opponent();
    assert!(battle.all_fainted(loser));
    assert!(log.iter().any(|line| line.ends_with("fainted!")));
}

#[test]
fn recorded_battles_replay_identically() {
    let engine = BattleEngine::load_default().unwrap();
    let (player, opponent) = teams(&engine);
    let mut original = engine
        .start_battle(&player, &opponent, Box::new(SeededRng::from_seed(2024)))
        .unwrap();
    run_auto_battle(&mut original, choose_highest_power, 500).unwrap();
    let history = original.history().unwrap().clone();
    assert!(!history.rounds.is_empty());

    let replayed = replay_battle(&engine, &player, &opponent, &history).unwrap();

    assert_eq!(replayed.outcome(), original.outcome());
    assert_eq!(replayed.round(), original.round());
    for side in Side::BOTH {
        assert_eq!(replayed.roster(side), original.roster(side));
        assert_eq!(replayed.active_index(side), original.active_index(side));
    }
    assert_eq!(replayed.history(), Some(&history));
}

#[test]
fn same_seed_same_battle() {
    let engine = BattleEngine::load_default().unwrap();
    let (player, opponent) = teams(&engine);

    let mut logs = Vec::new();
    for _ in 0..2 {
        let mut battle = engine
            .start_battle(&player, &opponent, Box::new(SeededRng::from_seed(99)))
            .unwrap();
        logs.push(run_auto_battle(&mut battle, choose_highest_power, 500).unwrap());
    }
    assert_eq!(logs[0], logs[1]);
}

#[test]
fn results_write_back_to_the_roster() {
    let engine = BattleEngine::load_default().unwrap();
    let (mut player, opponent) = teams(&engine);
    let mut battle = engine
        .start_battle(&player, &opponent, Box::new(SeededRng::from_seed(5)))
        .unwrap();
    run_auto_battle(&mut battle, choose_highest_power, 500).unwrap();

    battle.write_back(Side::Player, &mut player);
    for (member, creature) in player.iter().zip(battle.roster(Side::Player)) {
        assert_eq!(member.hp, creature.hp);
        assert_eq!(member.level, creature.level);
        assert_eq!(member.experience, creature.experience);
        for (slot, battle_move) in member.moves.iter().zip(&creature.moves) {
            assert_eq!(slot.pp, battle_move.as_ref().unwrap().pp);
        }
    }
    assert!(player[0].moves.iter().any(|slot| slot.pp < 25));
}

use inquire::Select;
use pocket_battle::ai::{choose_highest_power, first_healthy_reserve, run_auto_battle};
use pocket_battle::core::battle::{Battle, BattleEngine, BattleOutcome, StepOutcome};
use pocket_battle::core::factory::{create_roster_member, CreateCreatureOptions};
use pocket_battle::core::rng::SeededRng;
use pocket_battle::core::state::{Action, BattleCreature, RosterMember, Side, StageKind};
use pocket_battle::data::moves::MoveDatabase;
use pocket_battle::data::species::SpeciesData;

use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 20241016;
const TEAM_SIZE: usize = 3;
const LEVEL: u32 = 20;

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pocket_battle=info")),
        )
        .init();

    let auto = std::env::args().any(|arg| arg == "--auto");
    let seed = std::env::var("BATTLE_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    println!("╔═══════════════════════════════════════╗");
    println!("║          ⚔️  POCKET BATTLE ⚔️          ║");
    println!("╚═══════════════════════════════════════╝");
    println!();

    let engine = BattleEngine::load_default().expect("failed to load bundled battle data");
    let mut species_list: Vec<&SpeciesData> = engine.species_db.as_map().values().collect();
    species_list.sort_by(|a, b| a.id.cmp(&b.id));

    println!("📋 Available creatures:");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (i, species) in species_list.iter().enumerate() {
        let stats = &species.base_stats;
        println!("  {}. {} ({})", i + 1, species.name, species.types.join(" / "));
        println!(
            "     Base stats: H{} A{} B{} C{} D{} S{}",
            stats.hp, stats.atk, stats.def, stats.spa, stats.spd, stats.spe
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let player_picks: Vec<usize> = if auto {
        (0..TEAM_SIZE.min(species_list.len())).collect()
    } else {
        println!("🎮 Pick {} creatures for your team (space separated numbers):", TEAM_SIZE);
        read_numbers(TEAM_SIZE, species_list.len())
    };
    let player_team: Vec<RosterMember> = player_picks
        .iter()
        .map(|idx| build_member(species_list[*idx], &engine.move_db))
        .collect();
    let opponent_team: Vec<RosterMember> = species_list
        .iter()
        .rev()
        .take(TEAM_SIZE)
        .map(|species| build_member(species, &engine.move_db))
        .collect();

    println!();
    println!("✅ Your team: {}", names(&player_team));
    println!("🤖 Opponent team: {}", names(&opponent_team));
    println!();

    let mut battle = engine
        .start_battle(&player_team, &opponent_team, Box::new(SeededRng::from_seed(seed)))
        .expect("failed to start battle");

    println!("════════════════════════════════════════");
    println!("          ⚔️  BATTLE START! ⚔️          ");
    println!("════════════════════════════════════════");
    println!();

    if auto {
        match run_auto_battle(&mut battle, choose_highest_power, 200) {
            Ok(log) => log.iter().for_each(|line| println!("  {}", line)),
            Err(err) => println!("⚠️ battle stopped: {}", err),
        }
    } else {
        play_interactive(&mut battle);
    }

    println!("════════════════════════════════════════");
    match battle.outcome() {
        Some(BattleOutcome::Victory { winner: Side::Player }) => println!("      🎉 You win! Congratulations! 🎉"),
        Some(BattleOutcome::Victory { winner: Side::Opponent }) => println!("      💔 You lost... better luck next time!"),
        Some(BattleOutcome::Fled { side: Side::Player }) => println!("      🏃 You ran away."),
        Some(BattleOutcome::Fled { side: Side::Opponent }) => println!("      🏃 The opponent ran away."),
        Some(BattleOutcome::Cancelled) | None => println!("      The battle was called off."),
    }
    println!("════════════════════════════════════════");
}

fn play_interactive(battle: &mut Battle<'_>) {
    while !battle.is_finished() {
        print_battle_status(battle);

        let Some(action) = prompt_action(battle) else {
            battle.cancel();
            print_log(battle);
            break;
        };
        if let Err(err) = battle.submit_turn(Side::Player, action) {
            println!("⚠️ {}", err);
            continue;
        }
        if let Err(err) = battle.add_default_action(Side::Opponent) {
            println!("⚠️ {}", err);
            battle.cancel();
            break;
        }

        println!();
        loop {
            let step = match battle.order_and_execute_next() {
                Ok(step) => step,
                Err(err) => {
                    println!("⚠️ {}", err);
                    break;
                }
            };
            print_log(battle);
            match step {
                StepOutcome::Continue => continue,
                StepOutcome::SwitchRequired(Side::Player) => {
                    println!("💀 Your creature fainted! Choose a replacement:");
                    let index = prompt_switch(battle, true).or_else(|| first_healthy_reserve(battle, Side::Player));
                    let Some(index) = index else { break };
                    if let Err(err) = battle.submit_turn(Side::Player, Action::Switch { index }) {
                        println!("⚠️ {}", err);
                        break;
                    }
                }
                StepOutcome::SwitchRequired(Side::Opponent) => {
                    let Some(index) = first_healthy_reserve(battle, Side::Opponent) else { break };
                    if let Err(err) = battle.submit_turn(Side::Opponent, Action::Switch { index }) {
                        println!("⚠️ {}", err);
                        break;
                    }
                }
                StepOutcome::RoundComplete | StepOutcome::Finished(_) => break,
            }
        }
        println!();
    }
}

fn build_member(species: &SpeciesData, move_db: &MoveDatabase) -> RosterMember {
    let mut moves: Vec<String> = move_db
        .as_map()
        .values()
        .filter(|m| species.types.iter().any(|t| *t == m.move_type))
        .filter(|m| m.power > 0 && m.id != "tackle")
        .map(|m| m.id.clone())
        .collect();
    moves.sort();
    moves.truncate(3);
    moves.insert(0, "tackle".to_string());

    create_roster_member(
        species,
        CreateCreatureOptions {
            moves: Some(moves),
            level: Some(LEVEL),
            ..Default::default()
        },
        move_db,
    )
    .expect("failed to build creature")
}

fn names(team: &[RosterMember]) -> String {
    team.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
}

fn print_log(battle: &mut Battle<'_>) {
    for line in battle.drain_log() {
        println!("  {}", line);
    }
}

fn print_battle_status(battle: &Battle<'_>) {
    println!("─────────────────────────────────────────");
    println!("  Round {}", battle.round());
    println!("─────────────────────────────────────────");
    print_creature("[Foe]", battle.active(Side::Opponent));
    print_creature("[You]", battle.active(Side::Player));
    println!();
}

fn print_creature(label: &str, creature: &BattleCreature) {
    println!(
        "  {} {} Lv{} ({}) {}",
        label,
        creature.name,
        creature.level,
        creature.types.join("/"),
        hp_bar_string(creature.hp, creature.max_hp)
    );
    let changes: Vec<String> = StageKind::ALL
        .iter()
        .filter(|kind| creature.stages.get(**kind) != 0)
        .map(|kind| format!("{:?} {:+}", kind, creature.stages.get(*kind)))
        .collect();
    if !changes.is_empty() {
        println!("         Stages: {}", changes.join(", "));
    }
}

fn hp_bar_string(hp: i32, max_hp: i32) -> String {
    let max_hp = max_hp.max(1);
    let percentage = (hp as f64 / max_hp as f64 * 100.0) as i32;
    let bars = ((hp as f64 / max_hp as f64 * 10.0) as usize).min(10);
    let filled = "█".repeat(bars);
    let empty = "░".repeat(10 - bars);
    format!("[{}{}] {}/{} ({}%)", filled, empty, hp, max_hp, percentage)
}

fn prompt_action(battle: &Battle<'_>) -> Option<Action> {
    loop {
        let choice = Select::new("What will you do?", vec!["Fight", "Switch", "Run"]).prompt();
        match choice {
            Ok("Fight") => {
                if let Some(action) = prompt_move(battle) {
                    return Some(action);
                }
            }
            Ok("Switch") => {
                if let Some(index) = prompt_switch(battle, false) {
                    return Some(Action::Switch { index });
                }
            }
            Ok(_) => return Some(Action::Flee),
            Err(_) => {
                println!("Selection cancelled.");
                return None;
            }
        }
    }
}

fn prompt_move(battle: &Battle<'_>) -> Option<Action> {
    let active = battle.active(Side::Player);
    let mut options = Vec::new();
    let mut slots = Vec::new();
    for (slot, battle_move) in active.moves.iter().enumerate() {
        let Some(battle_move) = battle_move else {
            continue;
        };
        let data = &battle_move.data;
        options.push(format!(
            "{} [{}] {} power:{} PP {}/{}",
            data.display_name(),
            data.move_type,
            data.category,
            data.power,
            battle_move.pp,
            battle_move.max_pp
        ));
        slots.push(slot);
    }
    if options.is_empty() {
        println!("No moves available!");
        return None;
    }

    let choice = Select::new("Choose a move:", options.clone()).prompt().ok()?;
    let idx = options.iter().position(|o| *o == choice)?;
    Some(Action::Attack { slot: slots[idx] })
}

fn prompt_switch(battle: &Battle<'_>, forced: bool) -> Option<usize> {
    let active = battle.active_index(Side::Player);
    let available: Vec<(usize, &BattleCreature)> = battle
        .roster(Side::Player)
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != active && !c.is_fainted())
        .collect();

    if available.is_empty() {
        println!("No creature can switch in!");
        return None;
    }

    let options: Vec<String> = available
        .iter()
        .map(|(_, c)| format!("{} HP: {}/{}", c.name, c.hp, c.max_hp))
        .collect();
    let title = if forced { "Send out:" } else { "Switch to:" };
    let choice = Select::new(title, options.clone()).prompt().ok()?;
    let idx = options.iter().position(|o| *o == choice)?;
    Some(available[idx].0)
}

fn read_numbers(count: usize, max: usize) -> Vec<usize> {
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            continue;
        }

        let numbers: Vec<usize> = input
            .split_whitespace()
            .filter_map(|s| s.parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= max)
            .map(|n| n - 1)
            .take(count)
            .collect();

        if numbers.len() == count {
            return numbers;
        }

        println!("Please enter {} valid numbers (1-{}).", count, max);
    }
}

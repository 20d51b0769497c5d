use pocket_battle::core::turn::attack_multiplier;
use pocket_battle::core::utils::Multiplier;
use pocket_battle::data::type_chart::{EffectivenessBand, TypeChart};

fn types(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn single_type_lookups() {
    let chart = TypeChart::new();
    assert_eq!(chart.multiplier("fire", "grass"), Multiplier::DOUBLE);
    assert_eq!(chart.multiplier("water", "fire"), Multiplier::DOUBLE);
    assert_eq!(chart.multiplier("fire", "water"), Multiplier::HALF);
    assert_eq!(chart.multiplier("normal", "ghost"), Multiplier::ZERO);
    assert_eq!(chart.multiplier("ground", "flying"), Multiplier::ZERO);
    assert_eq!(chart.multiplier("normal", "fire"), Multiplier::ONE);
}

#[test]
fn lookups_are_order_significant() {
    let chart = TypeChart::new();
    assert_eq!(chart.multiplier("electric", "ground"), Multiplier::ZERO);
    assert_eq!(chart.multiplier("ground", "electric"), Multiplier::DOUBLE);
}

#[test]
fn missing_pairs_default_to_neutral() {
    let chart = TypeChart::empty();
    assert!(chart.is_empty());
    assert_eq!(chart.multiplier("fire", "grass"), Multiplier::ONE);
    assert_eq!(TypeChart::new().multiplier("cosmic", "grass"), Multiplier::ONE);
}

#[test]
fn lookups_ignore_case() {
    let chart = TypeChart::new();
    assert_eq!(chart.multiplier("Fire", "GRASS"), Multiplier::DOUBLE);
}

#[test]
fn dual_types_compound() {
    let chart = TypeChart::new();
    assert_eq!(chart.effectiveness("electric", &types(&["water", "flying"])), Multiplier::new(4, 1));
    assert_eq!(chart.effectiveness("fire", &types(&["water", "rock"])), Multiplier::new(1, 4));
    assert_eq!(chart.effectiveness("ground", &types(&["fire", "flying"])), Multiplier::ZERO);
    assert_eq!(chart.effectiveness("normal", &types(&["fire"])), Multiplier::ONE);
}

#[test]
fn custom_entries_override_the_chart() {
    let mut chart = TypeChart::new();
    chart.insert("normal", "ghost", Multiplier::HALF);
    assert_eq!(chart.multiplier("normal", "ghost"), Multiplier::HALF);
}

#[test]
fn same_type_bonus_applies_per_matching_user_type() {
    let chart = TypeChart::new();
    let target = types(&["normal"]);
    assert_eq!(attack_multiplier(&chart, "fire", &types(&["water"]), &target), Multiplier::ONE);
    assert_eq!(attack_multiplier(&chart, "fire", &types(&["fire"]), &target), Multiplier::new(3, 2));
    // Both user types matching compounds to 2.25x.
    assert_eq!(attack_multiplier(&chart, "fire", &types(&["fire", "fire"]), &target), Multiplier::new(9, 4));
    assert_eq!(
        attack_multiplier(&chart, "electric", &types(&["electric"]), &types(&["water", "flying"])),
        Multiplier::new(6, 1)
    );
}

#[test]
fn effectiveness_bands() {
    let band = |num, den| EffectivenessBand::classify(Multiplier::new(num, den));
    assert_eq!(band(4, 1), Some(EffectivenessBand::SuperDuperEffective));
    assert_eq!(band(6, 1), Some(EffectivenessBand::SuperDuperEffective));
    assert_eq!(band(2, 1), Some(EffectivenessBand::SuperEffective));
    assert_eq!(band(3, 1), Some(EffectivenessBand::SuperEffective));
    assert_eq!(band(1, 2), Some(EffectivenessBand::NotVeryEffective));
    assert_eq!(band(3, 4), Some(EffectivenessBand::NotVeryEffective));
    assert_eq!(band(1, 4), Some(EffectivenessBand::ReallyNotVeryEffective));
    assert_eq!(band(3, 8), Some(EffectivenessBand::ReallyNotVeryEffective));
    assert_eq!(band(0, 1), Some(EffectivenessBand::NoEffect));
    assert_eq!(band(1, 1), None);
    assert_eq!(band(3, 2), None);
    assert_eq!(band(9, 4), None);
}

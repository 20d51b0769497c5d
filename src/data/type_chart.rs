use crate::core::utils::Multiplier;
use std::collections::HashMap;

/// Order-significant lookup key: the attacking move's type against one defending type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePair {
    pub attack: String,
    pub defense: String,
}

impl TypePair {
    pub fn new(attack: &str, defense: &str) -> Self {
        Self {
            attack: attack.to_lowercase(),
            defense: defense.to_lowercase(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeChart {
    chart: HashMap<TypePair, Multiplier>,
}

impl TypeChart {
    pub fn empty() -> Self {
        Self {
            chart: HashMap::new(),
        }
    }

    /// The standard 18-type chart.
    pub fn new() -> Self {
        let mut chart = Self::empty();
        let mut add_entry = |defense: &str, weak_to: &[&str], resists: &[&str], immune_to: &[&str]| {
            for attack in weak_to {
                chart.insert(attack, defense, Multiplier::DOUBLE);
            }
            for attack in resists {
                chart.insert(attack, defense, Multiplier::HALF);
            }
            for attack in immune_to {
                chart.insert(attack, defense, Multiplier::ZERO);
            }
        };

        add_entry("normal", &["fighting"], &[], &["ghost"]);
        add_entry("fire", &["water", "ground", "rock"], &["fire", "grass", "ice", "bug", "steel", "fairy"], &[]);
        add_entry("water", &["electric", "grass"], &["fire", "water", "ice", "steel"], &[]);
        add_entry("electric", &["ground"], &["electric", "flying", "steel"], &[]);
        add_entry("grass", &["fire", "ice", "poison", "flying", "bug"], &["water", "electric", "grass", "ground"], &[]);
        add_entry("ice", &["fire", "fighting", "rock", "steel"], &["ice"], &[]);
        add_entry("fighting", &["flying", "psychic", "fairy"], &["bug", "rock", "dark"], &[]);
        add_entry("poison", &["ground", "psychic"], &["grass", "fighting", "poison", "bug", "fairy"], &[]);
        add_entry("ground", &["water", "grass", "ice"], &["poison", "rock"], &["electric"]);
        add_entry("flying", &["electric", "ice", "rock"], &["grass", "fighting", "bug"], &["ground"]);
        add_entry("psychic", &["bug", "ghost", "dark"], &["fighting", "psychic"], &[]);
        add_entry("bug", &["fire", "flying", "rock"], &["grass", "fighting", "ground"], &[]);
        add_entry("rock", &["water", "grass", "fighting", "ground", "steel"], &["normal", "fire", "poison", "flying"], &[]);
        add_entry("ghost", &["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]);
        add_entry("dragon", &["ice", "dragon", "fairy"], &["fire", "water", "electric", "grass"], &[]);
        add_entry("dark", &["fighting", "bug", "fairy"], &["ghost", "dark"], &["psychic"]);
        add_entry(
            "steel",
            &["fire", "fighting", "ground"],
            &["normal", "grass", "ice", "flying", "psychic", "bug", "rock", "dragon", "steel", "fairy"],
            &["poison"],
        );
        add_entry("fairy", &["poison", "steel"], &["fighting", "bug", "dark"], &["dragon"]);

        chart
    }

    pub fn insert(&mut self, attack: &str, defense: &str, multiplier: Multiplier) {
        self.chart.insert(TypePair::new(attack, defense), multiplier);
    }

    /// Missing pairs are neutral.
    pub fn multiplier(&self, attack: &str, defense: &str) -> Multiplier {
        self.chart
            .get(&TypePair::new(attack, defense))
            .copied()
            .unwrap_or(Multiplier::ONE)
    }

    /// Product of the per-type multipliers over every defending type.
    pub fn effectiveness(&self, move_type: &str, target_types: &[String]) -> Multiplier {
        target_types
            .iter()
            .fold(Multiplier::ONE, |acc, target_type| {
                acc * self.multiplier(move_type, target_type)
            })
    }

    pub fn len(&self) -> usize {
        self.chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }
}

/// Qualitative effectiveness line logged after a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectivenessBand {
    SuperDuperEffective,
    SuperEffective,
    NotVeryEffective,
    ReallyNotVeryEffective,
    NoEffect,
}

impl EffectivenessBand {
    /// Bands cover type multipliers with or without a single same-type bonus;
    /// anything else (neutral, bonus-only, double bonus) logs nothing.
    pub fn classify(multiplier: Multiplier) -> Option<Self> {
        let (num, den) = (multiplier.numerator(), multiplier.denominator());
        match (num, den) {
            (4, 1) | (6, 1) => Some(Self::SuperDuperEffective),
            (2, 1) | (3, 1) => Some(Self::SuperEffective),
            (1, 2) | (3, 4) => Some(Self::NotVeryEffective),
            (1, 4) | (3, 8) => Some(Self::ReallyNotVeryEffective),
            (0, _) => Some(Self::NoEffect),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::SuperDuperEffective => "It's super duper effective!",
            Self::SuperEffective => "It's super effective!",
            Self::NotVeryEffective => "It's not very effective...",
            Self::ReallyNotVeryEffective => "It's really not very effective...",
            Self::NoEffect => "It had no effect...",
        }
    }
}

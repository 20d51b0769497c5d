use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u32 = 100;

/// Experience curve a species levels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrowthRate {
    Fast,
    #[default]
    MediumFast,
    MediumSlow,
    Slow,
    Erratic,
    Fluctuating,
}

/// Total experience needed to reach `level` from level 1.
pub fn total_experience(rate: GrowthRate, level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let n = level.min(MAX_LEVEL) as i64;
    let cube = n * n * n;
    let total = match rate {
        GrowthRate::Fast => 4 * cube / 5,
        GrowthRate::MediumFast => cube,
        GrowthRate::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
        GrowthRate::Slow => 5 * cube / 4,
        GrowthRate::Erratic => match n {
            n if n < 50 => cube * (100 - n) / 50,
            n if n < 68 => cube * (150 - n) / 100,
            n if n < 98 => cube * ((1911 - 10 * n) / 3) / 500,
            n => cube * (160 - n) / 100,
        },
        GrowthRate::Fluctuating => match n {
            n if n < 15 => cube * ((n + 1) / 3 + 24) / 50,
            n if n < 36 => cube * (n + 14) / 50,
            n => cube * (n / 2 + 32) / 50,
        },
    };
    total.max(0) as u64
}

/// Experience needed to go from `level` to `level + 1`; zero at the cap.
pub fn xp_for_next_level(rate: GrowthRate, level: u32) -> u32 {
    if level >= MAX_LEVEL {
        return 0;
    }
    let next = total_experience(rate, level + 1);
    let current = total_experience(rate, level);
    next.saturating_sub(current) as u32
}

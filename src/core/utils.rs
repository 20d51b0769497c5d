use std::fmt;
use std::ops::Mul;

pub const MIN_STAGE: i32 = -6;
pub const MAX_STAGE: i32 = 6;

/// Multiplier for attack/defense/special/speed stages: 2/8 at -6 up to 8/2 at +6.
pub fn stage_multiplier(stage: i32) -> Multiplier {
    let s = stage.clamp(MIN_STAGE, MAX_STAGE);
    if s >= 0 {
        Multiplier::new((2 + s) as u32, 2)
    } else {
        Multiplier::new(2, (2 - s) as u32)
    }
}

/// Multiplier for accuracy/evasion stages: 3/9 at -6 up to 9/3 at +6.
pub fn accuracy_stage_multiplier(stage: i32) -> Multiplier {
    let s = stage.clamp(MIN_STAGE, MAX_STAGE);
    if s >= 0 {
        Multiplier::new((3 + s) as u32, 3)
    } else {
        Multiplier::new(3, (3 - s) as u32)
    }
}

pub fn apply_stat_stage(base_stat: i32, stage: i32) -> i32 {
    stage_multiplier(stage).apply(base_stat as i64) as i32
}

pub fn apply_accuracy_stage(base_accuracy: i32, stage: i32) -> i32 {
    accuracy_stage_multiplier(stage).apply(base_accuracy as i64) as i32
}

/// Exact non-negative rational, always stored in lowest terms so that
/// equality is structural.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Multiplier {
    num: u32,
    den: u32,
}

impl Multiplier {
    pub const ZERO: Self = Self { num: 0, den: 1 };
    pub const ONE: Self = Self { num: 1, den: 1 };
    pub const HALF: Self = Self { num: 1, den: 2 };
    pub const DOUBLE: Self = Self { num: 2, den: 1 };
    pub const SAME_TYPE_BONUS: Self = Self { num: 3, den: 2 };

    /// A zero denominator is read as 1.
    pub fn new(num: u32, den: u32) -> Self {
        Self::reduced(num as u64, den.max(1) as u64)
    }

    fn reduced(num: u64, den: u64) -> Self {
        if num == 0 {
            return Self::ZERO;
        }
        let g = gcd(num, den);
        Self {
            num: (num / g) as u32,
            den: (den / g) as u32,
        }
    }

    pub fn numerator(self) -> u32 {
        self.num
    }

    pub fn denominator(self) -> u32 {
        self.den
    }

    pub fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Scales `value`, truncating toward zero.
    pub fn apply(self, value: i64) -> i64 {
        value * self.num as i64 / self.den as i64
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl Mul for Multiplier {
    type Output = Multiplier;

    fn mul(self, rhs: Multiplier) -> Multiplier {
        Self::reduced(
            self.num as u64 * rhs.num as u64,
            self.den as u64 * rhs.den as u64,
        )
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "x{}", self.num)
        } else {
            write!(f, "x{}/{}", self.num, self.den)
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A closed integer range `[min, max]` from which the generator draws a
/// concrete value. Declared by the template for anything that is "rolled"
/// rather than fixed: stack value, loot value, gap chance, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomValue {
    pub min: i64,
    pub max: i64,
}

impl RandomValue {
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "RandomValue requires min <= max, got {min}..{max}");
        Self { min, max }
    }

    pub fn fixed(value: i64) -> Self {
        Self { min: value, max: value }
    }

    /// Uniform integer draw in `[min, max]` inclusive.
    pub fn pick_value(&self, rng: &mut impl Rng) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn pick_value_stays_in_range() {
        let rv = RandomValue::new(10, 20);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let v = rv.pick_value(&mut rng);
            assert!(v >= 10 && v <= 20);
        }
    }

    #[test]
    fn fixed_always_returns_same_value() {
        let rv = RandomValue::fixed(42);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rv.pick_value(&mut rng), 42);
    }
}

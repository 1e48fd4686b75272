//! Three-way category split of period spend

use serde::{Deserialize, Serialize};

/// Percentages of period spend by category, always summing to 100
///
/// Only `best` and `secondary` are chosen; `other` is the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShares {
    pub best: f64,
    pub secondary: f64,
    pub other: f64,
}

impl CategoryShares {
    /// Build from two raw slider values, see [`normalize_shares`]
    pub fn new(raw_best: f64, raw_secondary: f64) -> Self {
        normalize_shares(raw_best, raw_secondary)
    }

    /// All spend in the catch-all category
    pub fn all_other() -> Self {
        Self {
            best: 0.0,
            secondary: 0.0,
            other: 100.0,
        }
    }

    pub fn best_fraction(&self) -> f64 {
        self.best / 100.0
    }

    pub fn secondary_fraction(&self) -> f64 {
        self.secondary / 100.0
    }

    pub fn other_fraction(&self) -> f64 {
        self.other / 100.0
    }
}

impl Default for CategoryShares {
    fn default() -> Self {
        Self::new(40.0, 30.0)
    }
}

/// Clamp and renormalize two raw shares into a split that sums to 100
///
/// `best` is clamped to [0, 100], then `secondary` to whatever is left, and
/// `other` takes the remainder. Non-finite input counts as zero.
pub fn normalize_shares(raw_best: f64, raw_secondary: f64) -> CategoryShares {
    let best = clamp_finite(raw_best, 0.0, 100.0);
    let secondary = clamp_finite(raw_secondary, 0.0, 100.0 - best);
    let other = 100.0 - best - secondary;

    CategoryShares {
        best,
        secondary,
        other,
    }
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

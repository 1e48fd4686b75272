//! Miles earned in one statement period, with category caps and overflow

use serde::{Deserialize, Serialize};

use super::shares::CategoryShares;
use crate::instruments::InstrumentRules;

/// How overflow above a category cap shows up in the per-category lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowBookkeeping {
    /// Overflow earns at the other rate in its own category line and again
    /// through the other bucket. Matches the published calculator figures.
    #[default]
    Mirrored,
    /// Overflow is booked once, in the other bucket only
    SingleEntry,
}

/// Breakdown of one period's earn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleEarn {
    pub want_best: f64,
    pub want_secondary: f64,
    pub want_other: f64,
    pub eligible_best: f64,
    pub eligible_secondary: f64,
    pub overflow_best: f64,
    pub overflow_secondary: f64,
    /// Other spend plus all overflow
    pub other_total: f64,
    pub miles_best: f64,
    pub miles_secondary: f64,
    pub miles_other: f64,
    /// Authoritative earn for the period; the category lines are diagnostic
    pub cycle_miles: f64,
}

impl CycleEarn {
    pub fn has_overflow(&self) -> bool {
        self.overflow_best > 0.0 || self.overflow_secondary > 0.0
    }
}

/// Earn for one period using the default (mirrored) overflow bookkeeping
pub fn compute_cycle(spend: f64, shares: &CategoryShares, rules: &InstrumentRules) -> CycleEarn {
    compute_cycle_with(spend, shares, rules, OverflowBookkeeping::default())
}

/// Earn for one period
///
/// Spend above a category cap drops into the other bucket and earns at
/// `rate_other`.
pub fn compute_cycle_with(
    spend: f64,
    shares: &CategoryShares,
    rules: &InstrumentRules,
    bookkeeping: OverflowBookkeeping,
) -> CycleEarn {
    let want_best = spend * shares.best / 100.0;
    let want_secondary = spend * shares.secondary / 100.0;
    let want_other = spend * shares.other / 100.0;

    let eligible_best = want_best.min(rules.cap_best);
    let overflow_best = (want_best - rules.cap_best).max(0.0);
    let eligible_secondary = want_secondary.min(rules.cap_secondary);
    let overflow_secondary = (want_secondary - rules.cap_secondary).max(0.0);

    let other_total = want_other + overflow_best + overflow_secondary;

    let (miles_best, miles_secondary) = match bookkeeping {
        OverflowBookkeeping::Mirrored => (
            eligible_best / rules.rate_best + overflow_best / rules.rate_other,
            eligible_secondary / rules.rate_secondary + overflow_secondary / rules.rate_other,
        ),
        OverflowBookkeeping::SingleEntry => (
            eligible_best / rules.rate_best,
            eligible_secondary / rules.rate_secondary,
        ),
    };
    let miles_other = other_total / rules.rate_other;

    CycleEarn {
        want_best,
        want_secondary,
        want_other,
        eligible_best,
        eligible_secondary,
        overflow_best,
        overflow_secondary,
        other_total,
        miles_best,
        miles_secondary,
        miles_other,
        cycle_miles: miles_best + miles_secondary + miles_other,
    }
}

//! Closed-form spend estimates that skip the period-by-period simulation
//!
//! These ignore caps and take the blended earn rate at face value, so they
//! are quick bounds rather than a replacement for the simulated answer.

use serde::{Deserialize, Serialize};

use super::engine::AccrualConfig;
use super::shares::CategoryShares;
use crate::instruments::InstrumentRules;

/// Spend needed for a number of miles, and how long that takes at the pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendEstimate {
    pub miles: f64,
    pub spend: f64,
    pub periods: u32,
}

impl SpendEstimate {
    fn at_rate(miles: f64, thb_per_mile: f64, period_spend: f64) -> Self {
        let spend = (miles * thb_per_mile).max(0.0);
        Self {
            miles,
            spend,
            periods: periods_at_pace(spend, period_spend),
        }
    }
}

/// Mix, best-case and slowest-case estimates for one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendEstimates {
    /// Miles still needed once included bonuses are counted
    pub miles_to_go: f64,
    /// Spend at the configured category split
    pub mix: SpendEstimate,
    /// Everything at the best-category rate
    pub best_case: SpendEstimate,
    /// Everything at the catch-all rate
    pub slowest_case: SpendEstimate,
}

impl SpendEstimates {
    /// Estimates for `target_miles` under a simulation config, net of the
    /// bonuses the config includes
    pub fn compute(target_miles: f64, config: &AccrualConfig) -> Self {
        let miles_to_go = miles_to_go(
            target_miles,
            &config.rules,
            config.include_annual_bonus,
            config.include_signup_bonus,
        );
        let pace = config.period_spend;

        Self {
            miles_to_go,
            mix: estimate_required_spend(miles_to_go, &config.shares, &config.rules, pace),
            best_case: SpendEstimate::at_rate(miles_to_go, config.rules.rate_best, pace),
            slowest_case: SpendEstimate::at_rate(miles_to_go, config.rules.rate_other, pace),
        }
    }
}

/// Periods needed to spend `spend` at `period_spend` per period (0 when the pace is 0)
pub fn periods_at_pace(spend: f64, period_spend: f64) -> u32 {
    if period_spend > 0.0 && spend > 0.0 {
        (spend / period_spend).ceil() as u32
    } else {
        0
    }
}

/// Miles per THB at a category split, ignoring caps
pub fn blended_miles_per_thb(shares: &CategoryShares, rules: &InstrumentRules) -> f64 {
    shares.best_fraction() / rules.rate_best
        + shares.secondary_fraction() / rules.rate_secondary
        + shares.other_fraction() / rules.rate_other
}

/// Target less the annual and signup bonuses the caller counts on
pub fn miles_to_go(
    target_miles: f64,
    rules: &InstrumentRules,
    include_annual_bonus: bool,
    include_signup_bonus: bool,
) -> f64 {
    let mut remaining = target_miles;
    if include_annual_bonus && rules.has_annual_bonus() {
        remaining -= rules.annual_bonus_miles;
    }
    if include_signup_bonus && rules.has_signup_bonus() {
        remaining -= rules.signup_bonus_miles;
    }
    remaining
}

/// Spend needed for `miles` at the blended rate of a category split
pub fn estimate_required_spend(
    miles: f64,
    shares: &CategoryShares,
    rules: &InstrumentRules,
    period_spend: f64,
) -> SpendEstimate {
    let per_thb = blended_miles_per_thb(shares, rules);
    let spend = if per_thb > 0.0 { (miles / per_thb).max(0.0) } else { 0.0 };
    SpendEstimate {
        miles,
        spend,
        periods: periods_at_pace(spend, period_spend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_periods_at_pace_rounds_up() {
        assert_eq!(periods_at_pace(1_000_000.0, 120_000.0), 9);
        assert_eq!(periods_at_pace(960_000.0, 120_000.0), 8);
        assert_eq!(periods_at_pace(1_000.0, 0.0), 0);
        assert_eq!(periods_at_pace(0.0, 120_000.0), 0);
    }

    #[test]
    fn test_blended_rate_at_default_split() {
        let rate = blended_miles_per_thb(&CategoryShares::new(40.0, 30.0), &InstrumentRules::world_elite());
        // 8040 miles per 120k THB
        assert_relative_eq!(rate, 8_040.0 / 120_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_required_spend_at_mix() {
        let estimate = estimate_required_spend(
            122_500.0,
            &CategoryShares::new(40.0, 30.0),
            &InstrumentRules::world_elite(),
            120_000.0,
        );
        assert_relative_eq!(estimate.spend, 122_500.0 * 120_000.0 / 8_040.0, epsilon = 1e-6);
        assert_eq!(estimate.periods, 16);
    }

    #[test]
    fn test_miles_to_go_subtracts_included_bonuses_only() {
        let elite = InstrumentRules::world_elite();
        assert_eq!(miles_to_go(122_500.0, &elite, true, true), 97_500.0);
        assert_eq!(miles_to_go(122_500.0, &elite, false, true), 122_500.0);

        let world = InstrumentRules::world();
        assert_eq!(miles_to_go(122_500.0, &world, true, true), 117_500.0);
        assert_eq!(miles_to_go(122_500.0, &world, true, false), 122_500.0);
    }

    #[test]
    fn test_compute_best_and_slowest_cases() {
        let config = AccrualConfig::default();
        let estimates = SpendEstimates::compute(122_500.0, &config);

        assert_eq!(estimates.miles_to_go, 97_500.0);
        assert_relative_eq!(estimates.best_case.spend, 97_500.0 * 12.5);
        assert_eq!(estimates.best_case.periods, 11);
        assert_relative_eq!(estimates.slowest_case.spend, 97_500.0 * 20.0);
        assert_eq!(estimates.slowest_case.periods, 17);
        assert!(estimates.best_case.spend < estimates.mix.spend);
        assert!(estimates.mix.spend < estimates.slowest_case.spend);
    }

    #[test]
    fn test_bonus_larger_than_target_floors_spend_at_zero() {
        let config = AccrualConfig::default();
        let estimates = SpendEstimates::compute(10_000.0, &config);

        assert_eq!(estimates.miles_to_go, -15_000.0);
        assert_eq!(estimates.best_case.spend, 0.0);
        assert_eq!(estimates.slowest_case.spend, 0.0);
        assert_eq!(estimates.mix.spend, 0.0);
        assert_eq!(estimates.mix.periods, 0);
    }
}

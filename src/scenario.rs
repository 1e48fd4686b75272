//! Scenario runner for repeated and batch calculations
//!
//! Loads the rate table once, then runs any number of input sets against it
//! without re-reading CSV files.

use std::path::Path;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accrual::{solve_for_target, AccrualEngine, AccrualResult, SpendEstimates, TargetResolution};
use crate::error::Result;
use crate::inputs::AccrualInputs;
use crate::instruments::{InstrumentKey, RateTable};

/// Everything the presentation layer needs for one input set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub instrument: InstrumentKey,
    pub chosen_target_miles: f64,
    pub accrual: AccrualResult,
    /// None when the horizon ends short of the target
    pub resolution: Option<TargetResolution>,
    pub estimates: SpendEstimates,
}

impl ScenarioOutcome {
    pub fn expiry_risk(&self) -> bool {
        self.resolution.map(|r| r.at_expiry_risk()).unwrap_or(false)
    }
}

/// One point of a spend sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub period_spend: f64,
    pub periods_to_target: Option<u32>,
    pub total_spend_to_target: Option<f64>,
    pub effective_rate_per_mile: Option<f64>,
    pub final_miles: f64,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for spend in [60_000.0, 120_000.0, 240_000.0] {
///     let inputs = AccrualInputs { period_spend: spend, ..Default::default() };
///     let outcome = runner.run(&inputs)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    rate_table: RateTable,
}

impl ScenarioRunner {
    /// Create runner with the built-in catalog
    pub fn new() -> Self {
        Self {
            rate_table: RateTable::default_catalog(),
        }
    }

    /// Create runner by loading the rate table from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            rate_table: RateTable::from_csv()?,
        })
    }

    /// Create runner from a specific instruments directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            rate_table: RateTable::from_csv_path(path)?,
        })
    }

    pub fn with_rate_table(rate_table: RateTable) -> Self {
        Self { rate_table }
    }

    /// Simulate, solve and estimate for one input set
    ///
    /// Inputs are clamped to their caller bounds first.
    pub fn run(&self, inputs: &AccrualInputs) -> Result<ScenarioOutcome> {
        let inputs = inputs.sanitized();
        let config = inputs.to_config(&self.rate_table)?;
        let chosen_target_miles = inputs.chosen_target_miles(&self.rate_table)?;

        let accrual = AccrualEngine::new(config.clone()).simulate();
        let resolution = solve_for_target(&accrual.records, chosen_target_miles);
        let estimates = SpendEstimates::compute(chosen_target_miles, &config);

        Ok(ScenarioOutcome {
            instrument: inputs.instrument,
            chosen_target_miles,
            accrual,
            resolution,
            estimates,
        })
    }

    /// Run several input sets
    pub fn run_scenarios(&self, inputs: &[AccrualInputs]) -> Result<Vec<ScenarioOutcome>> {
        inputs.iter().map(|i| self.run(i)).collect()
    }

    /// Run the same inputs against every instrument in the table
    pub fn compare_instruments(&self, inputs: &AccrualInputs) -> Result<Vec<ScenarioOutcome>> {
        self.rate_table
            .keys()
            .map(|instrument| {
                // Signup follows each instrument unless the caller pinned it
                self.run(&AccrualInputs {
                    instrument,
                    ..inputs.clone()
                })
            })
            .collect()
    }

    /// Solve the same inputs across many period spends in parallel
    pub fn spend_sweep(&self, inputs: &AccrualInputs, spends: &[f64]) -> Result<Vec<SweepPoint>> {
        info!(
            "Running spend sweep over {} levels for {}",
            spends.len(),
            inputs.instrument
        );

        spends
            .par_iter()
            .map(|&period_spend| {
                let point_inputs = AccrualInputs {
                    period_spend,
                    ..inputs.clone()
                }
                .sanitized();
                let outcome = self.run(&point_inputs)?;
                let final_miles = outcome.accrual.summary().final_miles;
                Ok(SweepPoint {
                    period_spend: point_inputs.period_spend,
                    periods_to_target: outcome.resolution.map(|r| r.periods_to_target),
                    total_spend_to_target: outcome.resolution.map(|r| r.total_spend_to_target),
                    effective_rate_per_mile: outcome.resolution.and_then(|r| r.effective_rate_per_mile),
                    final_miles,
                })
            })
            .collect()
    }

    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }

    pub fn rate_table_mut(&mut self) -> &mut RateTable {
        &mut self.rate_table
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::AwardTarget;

    #[test]
    fn test_default_inputs_resolve_with_bonus() {
        let runner = ScenarioRunner::new();
        let outcome = runner.run(&AccrualInputs::default()).unwrap();

        assert_eq!(outcome.instrument, InstrumentKey::Elite);
        assert_eq!(outcome.chosen_target_miles, 122_500.0);
        assert_eq!(outcome.accrual.records.len(), 24);
        assert_eq!(outcome.resolution.unwrap().periods_to_target, 13);
        assert!(!outcome.expiry_risk());
    }

    #[test]
    fn test_short_horizon_is_unreachable() {
        let runner = ScenarioRunner::new();
        let inputs = AccrualInputs {
            period_count: 6,
            ..Default::default()
        };
        let outcome = runner.run(&inputs).unwrap();
        assert!(outcome.resolution.is_none());
        assert!(!outcome.expiry_risk());
    }

    #[test]
    fn test_slow_pace_flags_expiry_risk() {
        let runner = ScenarioRunner::new();
        let inputs = AccrualInputs {
            period_spend: 60_000.0,
            target: AwardTarget::Advantage,
            include_annual_bonus: false,
            period_count: 48,
            ..Default::default()
        };
        // 4,020 miles per period needs 43 periods for 172,000
        let outcome = runner.run(&inputs).unwrap();
        assert_eq!(outcome.resolution.unwrap().periods_to_target, 43);
        assert!(outcome.expiry_risk());
    }

    #[test]
    fn test_run_clamps_inputs() {
        let runner = ScenarioRunner::new();
        let inputs = AccrualInputs {
            period_count: 500,
            ..Default::default()
        };
        let outcome = runner.run(&inputs).unwrap();
        assert_eq!(outcome.accrual.records.len(), crate::inputs::MAX_PERIODS as usize);
    }

    #[test]
    fn test_oversized_custom_target_is_solved_at_bound() {
        let runner = ScenarioRunner::new();
        let inputs = AccrualInputs {
            use_custom_target: true,
            custom_miles: 900_000.0,
            period_count: 48,
            ..Default::default()
        };
        let outcome = runner.run(&inputs).unwrap();

        assert_eq!(outcome.chosen_target_miles, crate::inputs::MAX_CUSTOM_TARGET);
        assert_eq!(
            inputs.sanitized().chosen_target_miles(runner.rate_table()).unwrap(),
            outcome.chosen_target_miles
        );
    }

    #[test]
    fn test_compare_instruments_covers_catalog() {
        let runner = ScenarioRunner::new();
        let outcomes = runner.compare_instruments(&AccrualInputs::default()).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].instrument, InstrumentKey::Elite);
        assert_eq!(outcomes[1].instrument, InstrumentKey::World);

        // World follows its own signup default
        assert_eq!(outcomes[1].accrual.records[0].signup_posted, 5_000.0);
        assert_eq!(outcomes[0].accrual.records[0].signup_posted, 0.0);
    }

    #[test]
    fn test_run_scenarios_batch() {
        let runner = ScenarioRunner::new();
        let inputs: Vec<_> = [60_000.0, 120_000.0, 240_000.0]
            .iter()
            .map(|&spend| AccrualInputs {
                period_spend: spend,
                ..Default::default()
            })
            .collect();

        let outcomes = runner.run_scenarios(&inputs).unwrap();
        assert_eq!(outcomes.len(), 3);

        // Higher spend ends the horizon with more miles
        let finals: Vec<f64> = outcomes.iter().map(|o| o.accrual.summary().final_miles).collect();
        assert!(finals[0] < finals[1] && finals[1] < finals[2]);
    }

    #[test]
    fn test_spend_sweep_is_ordered_and_monotone() {
        let runner = ScenarioRunner::new();
        let spends: Vec<f64> = (1..=10).map(|i| i as f64 * 50_000.0).collect();
        let points = runner
            .spend_sweep(&AccrualInputs { period_count: 48, ..Default::default() }, &spends)
            .unwrap();

        assert_eq!(points.len(), spends.len());
        for (point, spend) in points.iter().zip(&spends) {
            assert_eq!(point.period_spend, *spend);
        }

        let periods: Vec<u32> = points.iter().filter_map(|p| p.periods_to_target).collect();
        assert_eq!(periods.len(), points.len());
        assert!(periods.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_runner_from_loaded_table() {
        let table = RateTable::from_csv_path(Path::new(crate::instruments::DEFAULT_INSTRUMENTS_PATH)).unwrap();
        let runner = ScenarioRunner::with_rate_table(table);
        assert!(runner.run(&AccrualInputs::default()).is_ok());
        assert_eq!(runner.rate_table().len(), 2);
    }
}

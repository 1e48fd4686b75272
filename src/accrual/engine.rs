//! Core accrual engine: constant period spend rolled forward over a horizon

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::cycle::{compute_cycle_with, OverflowBookkeeping};
use super::records::{AccrualResult, PeriodRecord};
use super::shares::CategoryShares;
use super::state::AccrualState;
use crate::instruments::InstrumentRules;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualConfig {
    /// Number of statement periods to simulate
    pub period_count: u32,

    /// THB spent in every period
    pub period_spend: f64,

    /// Category split of the period spend
    pub shares: CategoryShares,

    /// Earn rules of the chosen instrument
    pub rules: InstrumentRules,

    /// Post the annual spend bonus when its threshold is met
    pub include_annual_bonus: bool,

    /// Post the one-time signup bonus in period 1
    pub include_signup_bonus: bool,

    /// How overflow is split across the category lines
    pub overflow: OverflowBookkeeping,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self {
            period_count: 24,
            period_spend: 120_000.0,
            shares: CategoryShares::default(),
            rules: InstrumentRules::world_elite(),
            include_annual_bonus: true,
            include_signup_bonus: false,
            overflow: OverflowBookkeeping::default(),
        }
    }
}

/// Main accrual engine
pub struct AccrualEngine {
    config: AccrualConfig,
}

impl AccrualEngine {
    pub fn new(config: AccrualConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AccrualConfig {
        &self.config
    }

    /// Run the simulation over the configured horizon
    pub fn simulate(&self) -> AccrualResult {
        let mut result = AccrualResult::new(self.config.rules.name.clone());
        result.records.reserve(self.config.period_count as usize);
        let mut state = AccrualState::new();

        for _ in 0..self.config.period_count {
            state.advance_period();

            let record = self.calculate_period(&mut state);
            result.add_record(record);

            state.close_period();
        }

        result
    }

    /// Earn, bonuses and totals for the current period
    fn calculate_period(&self, state: &mut AccrualState) -> PeriodRecord {
        let spend = self.config.period_spend;
        let earn = compute_cycle_with(spend, &self.config.shares, &self.config.rules, self.config.overflow);

        state.accrue(spend, earn.cycle_miles);

        let mut bonus_posted = 0.0;
        if self.annual_bonus_due(state) {
            bonus_posted = self.config.rules.annual_bonus_miles;
            state.post_bonus(bonus_posted);
            debug!(
                "Annual bonus of {} miles posted in period {} (window {} spend {:.0})",
                bonus_posted, state.period_index, state.window, state.year_to_date_spend
            );
        }

        let mut signup_posted = 0.0;
        if self.signup_bonus_due(state) {
            signup_posted = self.config.rules.signup_bonus_miles;
            state.post_bonus(signup_posted);
            debug!("Signup bonus of {} miles posted in period 1", signup_posted);
        }

        trace!(
            "Period {}: earned {:.2} miles, cumulative {:.2}",
            state.period_index,
            earn.cycle_miles,
            state.cumulative_miles
        );

        PeriodRecord {
            index: state.period_index,
            window: state.window,
            period_in_window: state.period_in_window,
            spend,
            miles_best: earn.miles_best,
            miles_secondary: earn.miles_secondary,
            miles_other: earn.miles_other,
            bonus_posted,
            signup_posted,
            miles_this_period: earn.cycle_miles + bonus_posted + signup_posted,
            cumulative_miles: state.cumulative_miles,
            cumulative_spend: state.cumulative_spend,
        }
    }

    /// The annual bonus is judged only when a 12-period window closes, on the
    /// spend booked within that window, so it posts at most once per window
    fn annual_bonus_due(&self, state: &AccrualState) -> bool {
        let rules = &self.config.rules;
        self.config.include_annual_bonus
            && rules.has_annual_bonus()
            && state.closes_window()
            && state.year_to_date_spend >= rules.annual_bonus_threshold_thb
    }

    fn signup_bonus_due(&self, state: &AccrualState) -> bool {
        self.config.include_signup_bonus
            && state.period_index == 1
            && self.config.rules.has_signup_bonus()
    }
}

/// Simulate the configured horizon and return the period records
pub fn simulate_accrual(config: &AccrualConfig) -> Vec<PeriodRecord> {
    AccrualEngine::new(config.clone()).simulate().records
}

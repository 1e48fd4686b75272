//! Period output structures for accrual simulations

use serde::{Deserialize, Serialize};

/// A single simulated statement period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    // Timing
    pub index: u32,
    pub window: u32,
    pub period_in_window: u32,

    // Spend
    pub spend: f64,

    // Earn by category, after overflow redistribution
    pub miles_best: f64,
    pub miles_secondary: f64,
    pub miles_other: f64,

    // Bonuses posted this period (0 when none)
    pub bonus_posted: f64,
    pub signup_posted: f64,

    // Totals
    pub miles_this_period: f64,
    pub cumulative_miles: f64,
    pub cumulative_spend: f64,
}

/// Complete simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualResult {
    /// Instrument the simulation ran against
    pub instrument_name: String,

    /// Period records in order
    pub records: Vec<PeriodRecord>,
}

impl AccrualResult {
    pub fn new(instrument_name: impl Into<String>) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            records: Vec::new(),
        }
    }

    /// Add a period record
    pub fn add_record(&mut self, record: PeriodRecord) {
        self.records.push(record);
    }

    /// Get summary statistics
    pub fn summary(&self) -> AccrualSummary {
        let total_bonus_miles: f64 = self.records.iter().map(|r| r.bonus_posted).sum();
        let total_signup_miles: f64 = self.records.iter().map(|r| r.signup_posted).sum();
        let bonuses_posted = self.records.iter().filter(|r| r.bonus_posted > 0.0).count() as u32;

        let final_miles = self.records.last().map(|r| r.cumulative_miles).unwrap_or(0.0);
        let final_spend = self.records.last().map(|r| r.cumulative_spend).unwrap_or(0.0);

        AccrualSummary {
            total_periods: self.records.len() as u32,
            final_miles,
            final_spend,
            earned_miles: final_miles - total_bonus_miles - total_signup_miles,
            total_bonus_miles,
            total_signup_miles,
            bonuses_posted,
            average_rate_per_mile: if final_miles > 0.0 {
                Some(final_spend / final_miles)
            } else {
                None
            },
        }
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualSummary {
    pub total_periods: u32,
    pub final_miles: f64,
    pub final_spend: f64,
    /// Miles from spend alone
    pub earned_miles: f64,
    pub total_bonus_miles: f64,
    pub total_signup_miles: f64,
    pub bonuses_posted: u32,
    /// THB per mile over the whole horizon, bonuses included
    pub average_rate_per_mile: Option<f64>,
}

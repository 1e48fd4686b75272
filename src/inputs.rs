//! Caller-facing input set for one calculation
//!
//! Everything the presentation layer lets a user change, in one immutable
//! value. Bounds are enforced here by clamping, never by rejecting.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::accrual::{normalize_shares, AccrualConfig, OverflowBookkeeping};
use crate::error::Result;
use crate::instruments::{AwardTarget, InstrumentKey, RateTable};

pub const MAX_PERIOD_SPEND: f64 = 10_000_000.0;
pub const MAX_CUSTOM_TARGET: f64 = 500_000.0;
pub const MIN_PERIODS: u32 = 1;
pub const MAX_PERIODS: u32 = 48;

/// Raw user inputs for a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualInputs {
    /// Card variant (default: elite)
    #[serde(default = "default_instrument")]
    pub instrument: InstrumentKey,

    /// THB spent per statement period (default: 120,000)
    #[serde(default = "default_period_spend")]
    pub period_spend: f64,

    /// Percentage of spend in the best category (default: 40)
    #[serde(default = "default_share_best")]
    pub share_best: f64,

    /// Percentage of spend in the secondary category (default: 30)
    #[serde(default = "default_share_secondary")]
    pub share_secondary: f64,

    /// Preset award tier (default: saver)
    #[serde(default = "default_target")]
    pub target: AwardTarget,

    /// Use `custom_miles` instead of the preset tier
    #[serde(default)]
    pub use_custom_target: bool,

    /// Custom target balance (default: 122,500)
    #[serde(default = "default_custom_miles")]
    pub custom_miles: f64,

    /// Count the annual spend bonus (default: true)
    #[serde(default = "default_true")]
    pub include_annual_bonus: bool,

    /// Count the signup bonus; None follows the instrument (on when it has one)
    #[serde(default)]
    pub include_signup_bonus: Option<bool>,

    /// Expected award price inflation in percent
    #[serde(default)]
    pub devaluation_pct: f64,

    /// Simulation horizon in periods (default: 24)
    #[serde(default = "default_period_count")]
    pub period_count: u32,

    /// Overflow bookkeeping in the category lines
    #[serde(default)]
    pub overflow: OverflowBookkeeping,
}

fn default_instrument() -> InstrumentKey { InstrumentKey::Elite }
fn default_period_spend() -> f64 { 120_000.0 }
fn default_share_best() -> f64 { 40.0 }
fn default_share_secondary() -> f64 { 30.0 }
fn default_target() -> AwardTarget { AwardTarget::Saver }
fn default_custom_miles() -> f64 { 122_500.0 }
fn default_true() -> bool { true }
fn default_period_count() -> u32 { 24 }

impl Default for AccrualInputs {
    fn default() -> Self {
        Self {
            instrument: default_instrument(),
            period_spend: default_period_spend(),
            share_best: default_share_best(),
            share_secondary: default_share_secondary(),
            target: default_target(),
            use_custom_target: false,
            custom_miles: default_custom_miles(),
            include_annual_bonus: true,
            include_signup_bonus: None,
            devaluation_pct: 0.0,
            period_count: default_period_count(),
            overflow: OverflowBookkeeping::default(),
        }
    }
}

impl AccrualInputs {
    /// Parse inputs from JSON, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read inputs from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Copy of the inputs with every numeric field clamped to its caller bound
    pub fn sanitized(&self) -> Self {
        let mut clean = self.clone();
        clean.period_spend = clamp_logged("period_spend", self.period_spend, 0.0, MAX_PERIOD_SPEND);
        clean.custom_miles = clamp_logged("custom_miles", self.custom_miles, 0.0, MAX_CUSTOM_TARGET);

        let periods = self.period_count.clamp(MIN_PERIODS, MAX_PERIODS);
        if periods != self.period_count {
            warn!("period_count {} clamped to {}", self.period_count, periods);
        }
        clean.period_count = periods;

        if !self.devaluation_pct.is_finite() {
            warn!("devaluation_pct {} replaced with 0", self.devaluation_pct);
            clean.devaluation_pct = 0.0;
        }

        clean
    }

    /// Target balance after custom/preset selection and devaluation, priced
    /// from the table's award targets
    pub fn chosen_target_miles(&self, table: &RateTable) -> Result<f64> {
        table.chosen_target(
            self.use_custom_target,
            self.custom_miles,
            self.target,
            self.devaluation_pct,
        )
    }

    /// Build the engine config for these inputs against a rate table
    pub fn to_config(&self, table: &RateTable) -> Result<AccrualConfig> {
        let rules = table.rules(self.instrument)?.clone();
        let include_signup_bonus = self
            .include_signup_bonus
            .unwrap_or_else(|| rules.has_signup_bonus());

        Ok(AccrualConfig {
            period_count: self.period_count,
            period_spend: self.period_spend,
            shares: normalize_shares(self.share_best, self.share_secondary),
            rules,
            include_annual_bonus: self.include_annual_bonus,
            include_signup_bonus,
            overflow: self.overflow,
        })
    }
}

fn clamp_logged(field: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        warn!("{} {} clamped to {}", field, value, clamped);
    }
    clamped
}

//! Earn rules for a single card variant: rates, per-period caps and bonus terms

use serde::{Deserialize, Serialize};

use crate::error::{AccrualError, Result};

/// Earn rules for one instrument variant
///
/// Rates are expressed as THB spent per mile earned, so a lower rate earns
/// faster. Caps are THB ceilings per statement period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRules {
    /// Display name of the card
    pub name: String,

    /// THB per mile in the best category (airline group spend)
    pub rate_best: f64,

    /// THB per mile in the secondary category (duty free / foreign currency)
    pub rate_secondary: f64,

    /// THB per mile for all other spend and for overflow above the caps
    pub rate_other: f64,

    /// Per-period THB ceiling for the best category
    pub cap_best: f64,

    /// Per-period THB ceiling for the secondary category
    pub cap_secondary: f64,

    /// Miles awarded once per 12-period window when the spend threshold is met
    pub annual_bonus_miles: f64,

    /// Spend within one 12-period window required for the annual bonus
    pub annual_bonus_threshold_thb: f64,

    /// One-time miles posted in period 1
    pub signup_bonus_miles: f64,
}

impl InstrumentRules {
    /// UOB KrisFlyer World Elite
    pub fn world_elite() -> Self {
        Self {
            name: "UOB KrisFlyer World Elite".to_string(),
            rate_best: 12.5,
            rate_secondary: 15.0,
            rate_other: 20.0,
            cap_best: 200_000.0,
            cap_secondary: 200_000.0,
            annual_bonus_miles: 25_000.0,
            annual_bonus_threshold_thb: 1_000_000.0,
            signup_bonus_miles: 0.0,
        }
    }

    /// UOB KrisFlyer World
    pub fn world() -> Self {
        Self {
            name: "UOB KrisFlyer World".to_string(),
            rate_best: 15.0,
            rate_secondary: 15.0,
            rate_other: 20.0,
            cap_best: 100_000.0,
            cap_secondary: 50_000.0,
            annual_bonus_miles: 0.0,
            annual_bonus_threshold_thb: 1_000_000.0,
            signup_bonus_miles: 5_000.0,
        }
    }

    /// Check the rate table invariants
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| AccrualError::InvalidRules {
            name: self.name.clone(),
            reason,
        };

        for (label, rate) in [
            ("rate_best", self.rate_best),
            ("rate_secondary", self.rate_secondary),
            ("rate_other", self.rate_other),
        ] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", label, rate)));
            }
        }

        for (label, cap) in [("cap_best", self.cap_best), ("cap_secondary", self.cap_secondary)] {
            if cap.is_nan() || cap < 0.0 {
                return Err(invalid(format!("{} must be non-negative, got {}", label, cap)));
            }
        }

        if self.rate_other < self.rate_best {
            return Err(invalid(format!(
                "rate_other ({}) must not earn faster than rate_best ({})",
                self.rate_other, self.rate_best
            )));
        }

        if self.annual_bonus_miles < 0.0 || self.signup_bonus_miles < 0.0 {
            return Err(invalid("bonus miles must be non-negative".to_string()));
        }

        Ok(())
    }

    pub fn has_annual_bonus(&self) -> bool {
        self.annual_bonus_miles > 0.0
    }

    pub fn has_signup_bonus(&self) -> bool {
        self.signup_bonus_miles > 0.0
    }
}

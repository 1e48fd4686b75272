//! Target solving over a simulated period sequence
//!
//! Finds the first period whose balance meets the target and the effective
//! THB cost per mile at that point.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::records::PeriodRecord;

/// Miles stay valid for this many periods after posting
pub const MILES_VALIDITY_PERIODS: u32 = 36;

/// Resolutions slower than this risk early miles expiring before redemption
pub const EXPIRY_WARNING_PERIODS: u32 = 34;

/// When and at what cost a target balance is reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetResolution {
    /// Index of the first period meeting the target (0 for a zero target)
    pub periods_to_target: u32,

    /// Cumulative spend at that period
    pub total_spend_to_target: f64,

    /// THB per target mile; undefined for a zero target
    pub effective_rate_per_mile: Option<f64>,
}

impl TargetResolution {
    /// Whether the first miles earned would lapse before the target is reached
    pub fn at_expiry_risk(&self) -> bool {
        self.periods_to_target > EXPIRY_WARNING_PERIODS
    }
}

/// First period whose cumulative balance meets or exceeds `target_miles`
///
/// Returns None when the horizon ends short of the target. A target of zero
/// or less is reached at period 0 with no spend.
pub fn solve_for_target(periods: &[PeriodRecord], target_miles: f64) -> Option<TargetResolution> {
    if target_miles.is_nan() {
        return None;
    }

    if target_miles <= 0.0 {
        return Some(TargetResolution {
            periods_to_target: 0,
            total_spend_to_target: 0.0,
            effective_rate_per_mile: None,
        });
    }

    match periods.iter().find(|r| r.cumulative_miles >= target_miles) {
        Some(record) => {
            debug!(
                "Target {:.0} reached in period {} after {:.0} THB",
                target_miles, record.index, record.cumulative_spend
            );
            Some(TargetResolution {
                periods_to_target: record.index,
                total_spend_to_target: record.cumulative_spend,
                effective_rate_per_mile: Some(record.cumulative_spend / target_miles),
            })
        }
        None => {
            warn!(
                "Target {:.0} not reached within {} periods (balance {:.0})",
                target_miles,
                periods.len(),
                periods.last().map(|r| r.cumulative_miles).unwrap_or(0.0)
            );
            None
        }
    }
}

//! Award target presets and target-miles derivation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccrualError;

/// Named award tiers; built-in prices match data/instruments/award_targets.csv
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardTarget {
    /// SQ Saver
    Saver,
    /// SQ Advantage
    Advantage,
    /// Star Alliance one-world
    Star,
}

impl AwardTarget {
    pub const ALL: [AwardTarget; 3] = [AwardTarget::Saver, AwardTarget::Advantage, AwardTarget::Star];

    /// Built-in miles price of the award
    pub fn miles(self) -> f64 {
        match self {
            AwardTarget::Saver => 122_500.0,
            AwardTarget::Advantage => 172_000.0,
            AwardTarget::Star => 131_000.0,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            AwardTarget::Saver => "saver",
            AwardTarget::Advantage => "advantage",
            AwardTarget::Star => "star",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AwardTarget::Saver => "SQ Saver",
            AwardTarget::Advantage => "SQ Advantage",
            AwardTarget::Star => "Star Alliance OW",
        }
    }
}

impl fmt::Display for AwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AwardTarget {
    type Err = AccrualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saver" => Ok(AwardTarget::Saver),
            "advantage" => Ok(AwardTarget::Advantage),
            "star" => Ok(AwardTarget::Star),
            _ => Err(AccrualError::UnknownTarget(s.to_string())),
        }
    }
}

/// Miles balance to aim for at built-in prices, inflated by the expected
/// devaluation
///
/// `devaluation_pct` of 10 means the award is expected to cost 10% more by
/// the time it is redeemed. `RateTable::chosen_target` does the same against
/// loaded prices.
pub fn compute_chosen_target(
    use_custom: bool,
    custom_miles: f64,
    preset: AwardTarget,
    devaluation_pct: f64,
) -> f64 {
    chosen_target_from_price(use_custom, custom_miles, preset.miles(), devaluation_pct)
}

pub(crate) fn chosen_target_from_price(
    use_custom: bool,
    custom_miles: f64,
    preset_miles: f64,
    devaluation_pct: f64,
) -> f64 {
    let base = if use_custom { custom_miles } else { preset_miles };
    base * (1.0 + devaluation_pct / 100.0)
}

/// Weighted average of candidate targets, e.g. by award seat availability
///
/// Negative weights count as zero. Returns None when no candidate carries
/// any weight.
pub fn blend_expected_target(candidates: &[(f64, f64)]) -> Option<f64> {
    let (weighted, total) = candidates
        .iter()
        .fold((0.0, 0.0), |(acc, sum), &(miles, weight)| {
            let w = weight.max(0.0);
            (acc + miles * w, sum + w)
        });

    if total <= 0.0 {
        None
    } else {
        Some(weighted / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_preset_miles() {
        assert_eq!(AwardTarget::Saver.miles(), 122_500.0);
        assert_eq!(AwardTarget::Advantage.miles(), 172_000.0);
        assert_eq!(AwardTarget::Star.miles(), 131_000.0);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("saver".parse::<AwardTarget>().unwrap(), AwardTarget::Saver);
        assert_eq!(" Star ".parse::<AwardTarget>().unwrap(), AwardTarget::Star);
        assert!(matches!(
            "business".parse::<AwardTarget>(),
            Err(AccrualError::UnknownTarget(_))
        ));
    }

    #[test]
    fn test_chosen_target_uses_preset_unless_custom() {
        assert_eq!(compute_chosen_target(false, 50_000.0, AwardTarget::Saver, 0.0), 122_500.0);
        assert_eq!(compute_chosen_target(true, 50_000.0, AwardTarget::Saver, 0.0), 50_000.0);
    }

    #[test]
    fn test_chosen_target_applies_devaluation() {
        let target = compute_chosen_target(false, 0.0, AwardTarget::Advantage, 10.0);
        assert_relative_eq!(target, 189_200.0, epsilon = 1e-6);

        let custom = compute_chosen_target(true, 100_000.0, AwardTarget::Star, 25.0);
        assert_relative_eq!(custom, 125_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_blend_expected_target() {
        let blended = blend_expected_target(&[(122_500.0, 0.25), (172_000.0, 0.75)]).unwrap();
        assert_relative_eq!(blended, 159_625.0, epsilon = 1e-6);

        // Negative weight is ignored
        let blended = blend_expected_target(&[(100_000.0, 1.0), (500_000.0, -3.0)]).unwrap();
        assert_relative_eq!(blended, 100_000.0);

        assert_eq!(blend_expected_target(&[]), None);
        assert_eq!(blend_expected_target(&[(100_000.0, 0.0)]), None);
    }
}

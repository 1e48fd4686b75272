//! CSV-based rate table loader
//!
//! Loads instrument earn rules and award target prices from CSV files in
//! data/instruments/

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use super::{AwardTarget, InstrumentKey, InstrumentRules};
use crate::error::{AccrualError, Result};

/// Default path to the instruments directory
pub const DEFAULT_INSTRUMENTS_PATH: &str = "data/instruments";

/// File holding one row of earn rules per instrument
pub const INSTRUMENT_RULES_FILE: &str = "instrument_rules.csv";

/// File holding the miles price of each preset award tier
pub const AWARD_TARGETS_FILE: &str = "award_targets.csv";

/// Raw CSV row matching instrument_rules.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "RateBest")]
    rate_best: f64,
    #[serde(rename = "RateSecondary")]
    rate_secondary: f64,
    #[serde(rename = "RateOther")]
    rate_other: f64,
    #[serde(rename = "CapBest")]
    cap_best: f64,
    #[serde(rename = "CapSecondary")]
    cap_secondary: f64,
    #[serde(rename = "AnnualBonusMiles")]
    annual_bonus_miles: f64,
    #[serde(rename = "AnnualBonusThresholdTHB")]
    annual_bonus_threshold_thb: f64,
    #[serde(rename = "SignupBonusMiles")]
    signup_bonus_miles: f64,
}

impl CsvRow {
    fn into_rules(self) -> Result<(InstrumentKey, InstrumentRules)> {
        let key: InstrumentKey = self.key.parse()?;
        let rules = InstrumentRules {
            name: self.name,
            rate_best: self.rate_best,
            rate_secondary: self.rate_secondary,
            rate_other: self.rate_other,
            cap_best: self.cap_best,
            cap_secondary: self.cap_secondary,
            annual_bonus_miles: self.annual_bonus_miles,
            annual_bonus_threshold_thb: self.annual_bonus_threshold_thb,
            signup_bonus_miles: self.signup_bonus_miles,
        };
        rules.validate()?;
        Ok((key, rules))
    }
}

/// Load instrument rules from any reader producing instrument_rules.csv content
pub fn load_instrument_rules_from_reader<R: Read>(reader: R) -> Result<Vec<(InstrumentKey, InstrumentRules)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let (key, rules) = row.into_rules()?;
        debug!("Loaded rules for {} ({})", key, rules.name);
        rows.push((key, rules));
    }

    Ok(rows)
}

/// Load instrument rules from the given directory
pub fn load_instrument_rules(path: &Path) -> Result<Vec<(InstrumentKey, InstrumentRules)>> {
    let file_path = path.join(INSTRUMENT_RULES_FILE);
    let file = File::open(&file_path)?;
    let rows = load_instrument_rules_from_reader(file)?;
    info!("Loaded {} instruments from {}", rows.len(), file_path.display());
    Ok(rows)
}

/// Raw CSV row matching award_targets.csv columns
#[derive(Debug, serde::Deserialize)]
struct TargetRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Miles")]
    miles: f64,
}

impl TargetRow {
    fn into_target(self) -> Result<(AwardTarget, f64)> {
        let target: AwardTarget = self.key.parse()?;
        if !self.miles.is_finite() || self.miles <= 0.0 {
            return Err(AccrualError::InvalidTarget {
                key: self.key,
                miles: self.miles,
            });
        }
        debug!("Loaded award target {} ({}): {} miles", target, self.label, self.miles);
        Ok((target, self.miles))
    }
}

/// Load award target prices from any reader producing award_targets.csv content
pub fn load_award_targets_from_reader<R: Read>(reader: R) -> Result<Vec<(AwardTarget, f64)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: TargetRow = result?;
        rows.push(row.into_target()?);
    }

    Ok(rows)
}

/// Load award target prices from the given directory
pub fn load_award_targets(path: &Path) -> Result<Vec<(AwardTarget, f64)>> {
    let file_path = path.join(AWARD_TARGETS_FILE);
    let file = File::open(&file_path)?;
    let rows = load_award_targets_from_reader(file)?;
    info!("Loaded {} award targets from {}", rows.len(), file_path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Key,Name,RateBest,RateSecondary,RateOther,CapBest,CapSecondary,AnnualBonusMiles,AnnualBonusThresholdTHB,SignupBonusMiles\n";

    #[test]
    fn test_load_default_rules_file() {
        let result = load_instrument_rules(Path::new(DEFAULT_INSTRUMENTS_PATH));
        assert!(result.is_ok(), "Failed to load rules: {:?}", result.err());

        let rows = result.unwrap();
        assert_eq!(rows.len(), 2);

        let elite = rows.iter().find(|(k, _)| *k == InstrumentKey::Elite).unwrap();
        assert_eq!(elite.1, InstrumentRules::world_elite());

        let world = rows.iter().find(|(k, _)| *k == InstrumentKey::World).unwrap();
        assert_eq!(world.1, InstrumentRules::world());
    }

    #[test]
    fn test_load_from_reader() {
        let data = format!("{}world,Test World,15,15,20,100000,50000,0,1000000,5000\n", HEADER);
        let rows = load_instrument_rules_from_reader(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, InstrumentKey::World);
        assert_eq!(rows[0].1.name, "Test World");
        assert_eq!(rows[0].1.cap_secondary, 50_000.0);
    }

    #[test]
    fn test_unknown_key_fails_fast() {
        let data = format!("{}platinum,Platinum,10,15,20,1,1,0,0,0\n", HEADER);
        let err = load_instrument_rules_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AccrualError::UnknownInstrument(ref k) if k == "platinum"));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let data = format!("{}elite,Broken,0,15,20,1,1,0,0,0\n", HEADER);
        let err = load_instrument_rules_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AccrualError::InvalidRules { .. }));
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let data = format!("{}elite,Broken,abc,15,20,1,1,0,0,0\n", HEADER);
        let err = load_instrument_rules_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AccrualError::Csv(_)));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = load_instrument_rules(Path::new("data/does-not-exist")).unwrap_err();
        assert!(matches!(err, AccrualError::Io(_)));
    }

    #[test]
    fn test_load_default_targets_file() {
        let rows = load_award_targets(Path::new(DEFAULT_INSTRUMENTS_PATH)).unwrap();
        assert_eq!(rows.len(), AwardTarget::ALL.len());
        for (target, miles) in rows {
            assert_eq!(miles, target.miles());
        }
    }

    #[test]
    fn test_targets_from_reader() {
        let data = "Key,Label,Miles\nadvantage,SQ Advantage,180000\n";
        let rows = load_award_targets_from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows, vec![(AwardTarget::Advantage, 180_000.0)]);
    }

    #[test]
    fn test_unknown_target_key_fails_fast() {
        let data = "Key,Label,Miles\nbusiness,Business,250000\n";
        let err = load_award_targets_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AccrualError::UnknownTarget(ref k) if k == "business"));
    }

    #[test]
    fn test_non_positive_target_miles_rejected() {
        let data = "Key,Label,Miles\nsaver,SQ Saver,0\n";
        let err = load_award_targets_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AccrualError::InvalidTarget { ref key, .. } if key == "saver"));
    }
}

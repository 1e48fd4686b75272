//! Instrument rate tables and award targets

mod rules;
mod targets;
pub mod loader;

pub use rules::InstrumentRules;
pub use targets::{blend_expected_target, compute_chosen_target, AwardTarget};
pub use loader::DEFAULT_INSTRUMENTS_PATH;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AccrualError, Result};

/// Closed set of supported card variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKey {
    Elite,
    World,
}

impl InstrumentKey {
    pub const ALL: [InstrumentKey; 2] = [InstrumentKey::Elite, InstrumentKey::World];

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentKey::Elite => "elite",
            InstrumentKey::World => "world",
        }
    }

    /// Built-in rules for this variant
    pub fn default_rules(self) -> InstrumentRules {
        match self {
            InstrumentKey::Elite => InstrumentRules::world_elite(),
            InstrumentKey::World => InstrumentRules::world(),
        }
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKey {
    type Err = AccrualError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elite" => Ok(InstrumentKey::Elite),
            "world" => Ok(InstrumentKey::World),
            _ => Err(AccrualError::UnknownInstrument(s.to_string())),
        }
    }
}

/// Earn rules and award prices, loaded once and read-only afterwards
#[derive(Debug, Clone)]
pub struct RateTable {
    rules: BTreeMap<InstrumentKey, InstrumentRules>,
    targets: BTreeMap<AwardTarget, f64>,
}

impl RateTable {
    /// Built-in catalog matching the CSV files in data/instruments/
    pub fn default_catalog() -> Self {
        Self {
            rules: InstrumentKey::ALL
                .iter()
                .map(|&key| (key, key.default_rules()))
                .collect(),
            targets: AwardTarget::ALL
                .iter()
                .map(|&target| (target, target.miles()))
                .collect(),
        }
    }

    /// Load the rate table from CSV files in the default location
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_INSTRUMENTS_PATH))
    }

    /// Load the rate table from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let rules = loader::load_instrument_rules(path)?;
        let targets = loader::load_award_targets(path)?;
        Ok(Self {
            rules: rules.into_iter().collect(),
            targets: targets.into_iter().collect(),
        })
    }

    /// Look up the rules for an instrument
    pub fn rules(&self, key: InstrumentKey) -> Result<&InstrumentRules> {
        self.rules.get(&key).ok_or_else(|| AccrualError::MissingInstrument {
            key: key.to_string(),
        })
    }

    /// Look up the rules by raw key, failing fast on unknown names
    pub fn rules_by_name(&self, key: &str) -> Result<&InstrumentRules> {
        self.rules(key.parse()?)
    }

    /// Replace the rules for one instrument after checking them
    pub fn insert(&mut self, key: InstrumentKey, rules: InstrumentRules) -> Result<()> {
        rules.validate()?;
        self.rules.insert(key, rules);
        Ok(())
    }

    /// Miles price of a preset award tier
    pub fn target_miles(&self, target: AwardTarget) -> Result<f64> {
        self.targets
            .get(&target)
            .copied()
            .ok_or_else(|| AccrualError::MissingTarget {
                key: target.key().to_string(),
            })
    }

    /// Miles balance to aim for at this table's award prices
    pub fn chosen_target(
        &self,
        use_custom: bool,
        custom_miles: f64,
        preset: AwardTarget,
        devaluation_pct: f64,
    ) -> Result<f64> {
        let preset_miles = if use_custom { 0.0 } else { self.target_miles(preset)? };
        Ok(targets::chosen_target_from_price(use_custom, custom_miles, preset_miles, devaluation_pct))
    }

    pub fn keys(&self) -> impl Iterator<Item = InstrumentKey> + '_ {
        self.rules.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::default_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_catalog_has_all_instruments() {
        let table = RateTable::default_catalog();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules(InstrumentKey::Elite).unwrap().rate_best, 12.5);
        assert_eq!(table.rules(InstrumentKey::World).unwrap().cap_secondary, 50_000.0);
    }

    #[test]
    fn test_csv_matches_builtin_catalog() {
        let loaded = RateTable::from_csv().unwrap();
        let builtin = RateTable::default_catalog();
        for key in InstrumentKey::ALL {
            assert_eq!(loaded.rules(key).unwrap(), builtin.rules(key).unwrap());
        }
    }

    #[test]
    fn test_csv_target_prices_match_builtin() {
        let loaded = RateTable::from_csv().unwrap();
        for target in AwardTarget::ALL {
            assert_eq!(loaded.target_miles(target).unwrap(), target.miles());
        }
    }

    #[test]
    fn test_chosen_target_uses_loaded_prices() {
        let dir = std::env::temp_dir().join(format!("miles_accrual_targets_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::copy(
            Path::new(DEFAULT_INSTRUMENTS_PATH).join(loader::INSTRUMENT_RULES_FILE),
            dir.join(loader::INSTRUMENT_RULES_FILE),
        )
        .unwrap();
        std::fs::write(
            dir.join(loader::AWARD_TARGETS_FILE),
            "Key,Label,Miles\nsaver,SQ Saver,130000\n",
        )
        .unwrap();

        let table = RateTable::from_csv_path(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let saver = table.chosen_target(false, 0.0, AwardTarget::Saver, 10.0).unwrap();
        assert_relative_eq!(saver, 143_000.0, epsilon = 1e-6);
        assert_eq!(table.chosen_target(true, 50_000.0, AwardTarget::Star, 0.0).unwrap(), 50_000.0);
        assert!(matches!(
            table.chosen_target(false, 0.0, AwardTarget::Star, 0.0),
            Err(AccrualError::MissingTarget { .. })
        ));
    }

    #[test]
    fn test_lookup_by_name() {
        let table = RateTable::default_catalog();
        assert_eq!(table.rules_by_name("World").unwrap().name, "UOB KrisFlyer World");
        assert!(matches!(
            table.rules_by_name("gold"),
            Err(AccrualError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn test_insert_validates() {
        let mut table = RateTable::default_catalog();
        let mut rules = InstrumentRules::world();
        rules.rate_other = -5.0;
        assert!(table.insert(InstrumentKey::World, rules).is_err());
        assert_eq!(table.rules(InstrumentKey::World).unwrap().rate_other, 20.0);
    }

    #[test]
    fn test_key_round_trips_through_display() {
        for key in InstrumentKey::ALL {
            assert_eq!(key.to_string().parse::<InstrumentKey>().unwrap(), key);
        }
    }
}

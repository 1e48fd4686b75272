//! Miles Accrual CLI
//!
//! How long and how much spend until a miles target is reached

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;

use miles_accrual::accrual::{OverflowBookkeeping, MILES_VALIDITY_PERIODS};
use miles_accrual::{AccrualInputs, AwardTarget, InstrumentKey, ScenarioOutcome, ScenarioRunner};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliInstrument {
    Elite,
    World,
}

impl From<CliInstrument> for InstrumentKey {
    fn from(value: CliInstrument) -> Self {
        match value {
            CliInstrument::Elite => InstrumentKey::Elite,
            CliInstrument::World => InstrumentKey::World,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTarget {
    Saver,
    Advantage,
    Star,
}

impl From<CliTarget> for AwardTarget {
    fn from(value: CliTarget) -> Self {
        match value {
            CliTarget::Saver => AwardTarget::Saver,
            CliTarget::Advantage => AwardTarget::Advantage,
            CliTarget::Star => AwardTarget::Star,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "miles_accrual", about = "Spend-to-miles requirement calculator")]
struct Cli {
    /// Read all inputs from a JSON file (flags below are ignored)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Directory holding instrument_rules.csv (built-in rates when omitted)
    #[arg(long)]
    rates_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "elite")]
    instrument: CliInstrument,

    /// THB spent per statement period
    #[arg(long, default_value_t = 120_000.0)]
    spend: f64,

    /// Percent of spend in the airline-group category
    #[arg(long, default_value_t = 40.0)]
    share_best: f64,

    /// Percent of spend in the duty free / FX category
    #[arg(long, default_value_t = 30.0)]
    share_secondary: f64,

    #[arg(long, value_enum, default_value = "saver")]
    target: CliTarget,

    /// Custom miles target, replaces the preset tier
    #[arg(long)]
    custom_miles: Option<f64>,

    /// Expected award price increase in percent
    #[arg(long, default_value_t = 0.0)]
    devaluation_pct: f64,

    /// Statement periods to simulate
    #[arg(long, default_value_t = 24)]
    periods: u32,

    #[arg(long)]
    no_annual_bonus: bool,

    /// Force the signup bonus on or off (default follows the card)
    #[arg(long, action = ArgAction::Set)]
    signup_bonus: Option<bool>,

    /// Book cap overflow once instead of in both category lines
    #[arg(long)]
    single_entry_overflow: bool,

    /// Write period records to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full outcome as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Run the same inputs against every card
    #[arg(long)]
    compare: bool,
}

impl Cli {
    fn to_inputs(&self) -> Result<AccrualInputs> {
        if let Some(path) = &self.inputs {
            return AccrualInputs::from_json_path(path)
                .with_context(|| format!("reading inputs from {}", path.display()));
        }

        Ok(AccrualInputs {
            instrument: self.instrument.into(),
            period_spend: self.spend,
            share_best: self.share_best,
            share_secondary: self.share_secondary,
            target: self.target.into(),
            use_custom_target: self.custom_miles.is_some(),
            custom_miles: self.custom_miles.unwrap_or(0.0),
            include_annual_bonus: !self.no_annual_bonus,
            include_signup_bonus: self.signup_bonus,
            devaluation_pct: self.devaluation_pct,
            period_count: self.periods,
            overflow: if self.single_entry_overflow {
                OverflowBookkeeping::SingleEntry
            } else {
                OverflowBookkeeping::Mirrored
            },
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let inputs = cli.to_inputs()?;

    let runner = match &cli.rates_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading rate table from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    let outcomes = if cli.compare {
        runner.compare_instruments(&inputs)?
    } else {
        vec![runner.run(&inputs)?]
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    if let Some(path) = &cli.csv {
        write_records_csv(path, &outcomes)?;
        println!("\nPeriod records written to: {}", path.display());
    }

    Ok(())
}

fn print_outcome(outcome: &ScenarioOutcome) {
    let summary = outcome.accrual.summary();

    println!("{}", outcome.accrual.instrument_name);
    println!("{}", "=".repeat(outcome.accrual.instrument_name.len()));
    println!("Target: {:.0} miles", outcome.chosen_target_miles);
    println!();

    println!(
        "{:>6} {:>12} {:>10} {:>10} {:>10} {:>9} {:>9} {:>12} {:>14}",
        "Period", "Spend", "Best", "Second", "Other", "Bonus", "Signup", "Cum Miles", "Cum Spend"
    );
    println!("{}", "-".repeat(100));

    for row in &outcome.accrual.records {
        println!(
            "{:>6} {:>12.0} {:>10.1} {:>10.1} {:>10.1} {:>9.0} {:>9.0} {:>12.0} {:>14.0}",
            row.index,
            row.spend,
            row.miles_best,
            row.miles_secondary,
            row.miles_other,
            row.bonus_posted,
            row.signup_posted,
            row.cumulative_miles,
            row.cumulative_spend,
        );
    }

    println!();
    match outcome.resolution {
        Some(resolution) => {
            println!(
                "Target reached in {} periods after spending THB {:.0}",
                resolution.periods_to_target, resolution.total_spend_to_target
            );
            if let Some(rate) = resolution.effective_rate_per_mile {
                println!("Effective cost: THB {:.2} per mile", rate);
            }
            if outcome.expiry_risk() {
                println!(
                    "Expiry risk: miles expire {} periods after posting; the earliest miles may lapse first",
                    MILES_VALIDITY_PERIODS
                );
            }
        }
        None => println!(
            "Target not reached within {} periods (balance {:.0}); extend the horizon or raise spend",
            summary.total_periods, summary.final_miles
        ),
    }

    let est = &outcome.estimates;
    println!();
    println!("Estimates for {:.0} miles to go (caps ignored):", est.miles_to_go.max(0.0));
    println!("  Your mix:      THB {:>12.0} ({} periods)", est.mix.spend, est.mix.periods);
    println!("  Best case:     THB {:>12.0} ({} periods)", est.best_case.spend, est.best_case.periods);
    println!("  Slowest case:  THB {:>12.0} ({} periods)", est.slowest_case.spend, est.slowest_case.periods);
    println!();
}

/// Flat CSV row; the instrument column keeps compare runs apart
#[derive(Serialize)]
struct CsvRecord<'a> {
    instrument: &'a str,
    period: u32,
    window: u32,
    spend: f64,
    miles_best: f64,
    miles_secondary: f64,
    miles_other: f64,
    bonus_posted: f64,
    signup_posted: f64,
    miles_this_period: f64,
    cumulative_miles: f64,
    cumulative_spend: f64,
}

fn write_records_csv(path: &Path, outcomes: &[ScenarioOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for outcome in outcomes {
        for record in &outcome.accrual.records {
            writer.serialize(CsvRecord {
                instrument: outcome.instrument.as_str(),
                period: record.index,
                window: record.window,
                spend: record.spend,
                miles_best: record.miles_best,
                miles_secondary: record.miles_secondary,
                miles_other: record.miles_other,
                bonus_posted: record.bonus_posted,
                signup_posted: record.signup_posted,
                miles_this_period: record.miles_this_period,
                cumulative_miles: record.cumulative_miles,
                cumulative_spend: record.cumulative_spend,
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

//! Solve one target across a grid of period spends
//!
//! Every point runs the longest allowed horizon, so `period_count` from the
//! inputs is replaced with `MAX_PERIODS` along with the per-point spend.
//!
//! Usage: cargo run --bin spend_sweep -- --min 20000 --max 500000 --step 20000

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use miles_accrual::inputs::MAX_PERIODS;
use miles_accrual::scenario::SweepPoint;
use miles_accrual::{AccrualInputs, InstrumentKey, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "spend_sweep", about = "Periods to target across period spend levels")]
struct Args {
    /// Card to sweep (elite or world)
    #[arg(long, default_value = "elite")]
    instrument: InstrumentKey,

    /// Smallest period spend in THB
    #[arg(long, default_value_t = 20_000.0)]
    min: f64,

    /// Largest period spend in THB
    #[arg(long, default_value_t = 500_000.0)]
    max: f64,

    /// Spend increment in THB
    #[arg(long, default_value_t = 20_000.0)]
    step: f64,

    /// Optional JSON inputs; spend and horizon are overridden per sweep point
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Directory holding the rate table CSVs (built-in rates when omitted)
    #[arg(long)]
    rates_dir: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "spend_sweep_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.step <= 0.0 || args.max < args.min {
        bail!("need step > 0 and max >= min (got min {}, max {}, step {})", args.min, args.max, args.step);
    }

    let base = match &args.inputs {
        Some(path) => AccrualInputs::from_json_path(path)
            .with_context(|| format!("reading inputs from {}", path.display()))?,
        None => AccrualInputs::default(),
    };
    let inputs = AccrualInputs {
        instrument: args.instrument,
        period_count: MAX_PERIODS,
        ..base
    };

    let steps = ((args.max - args.min) / args.step).floor() as usize;
    let spends: Vec<f64> = (0..=steps).map(|i| args.min + i as f64 * args.step).collect();

    let start = Instant::now();
    let runner = match &args.rates_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading rate table from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };
    let target_miles = inputs.sanitized().chosen_target_miles(runner.rate_table())?;
    let points = runner.spend_sweep(&inputs, &spends)?;
    println!("Swept {} spend levels in {:?}", points.len(), start.elapsed());

    write_output(&args.output, &points)?;
    println!("Output written to {}", args.output.display());

    if let Some(lowest) = points.iter().find(|p| p.periods_to_target.is_some()) {
        println!(
            "Lowest spend reaching {:.0} miles within {} periods: THB {:.0} per period",
            target_miles,
            MAX_PERIODS,
            lowest.period_spend
        );
    } else {
        println!("No spend level in range reaches the target within {} periods", MAX_PERIODS);
    }

    Ok(())
}

fn write_output(path: &Path, points: &[SweepPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["PeriodSpend", "PeriodsToTarget", "TotalSpendToTarget", "THBPerMile", "FinalMiles"])?;
    for p in points {
        writer.write_record([
            format!("{:.0}", p.period_spend),
            p.periods_to_target.map(|v| v.to_string()).unwrap_or_default(),
            p.total_spend_to_target.map(|v| format!("{:.0}", v)).unwrap_or_default(),
            p.effective_rate_per_mile.map(|v| format!("{:.4}", v)).unwrap_or_default(),
            format!("{:.2}", p.final_miles),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

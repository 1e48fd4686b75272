//! Accrual engine: per-period earn, multi-period simulation and target solving

mod shares;
mod cycle;
mod state;
mod records;
mod engine;
mod solver;
pub mod estimates;

pub use shares::{normalize_shares, CategoryShares};
pub use cycle::{compute_cycle, compute_cycle_with, CycleEarn, OverflowBookkeeping};
pub use state::{AccrualState, PERIODS_PER_WINDOW};
pub use records::{AccrualResult, AccrualSummary, PeriodRecord};
pub use engine::{simulate_accrual, AccrualConfig, AccrualEngine};
pub use solver::{solve_for_target, TargetResolution, EXPIRY_WARNING_PERIODS, MILES_VALIDITY_PERIODS};
pub use estimates::{SpendEstimate, SpendEstimates};

//! Miles Accrual - spend-to-miles simulator for rewards card earn rules
//!
//! This library provides:
//! - Category split normalization and per-period earn with caps and overflow
//! - Multi-period accrual with annual and signup bonuses
//! - Target solving (periods, spend and effective THB per mile)
//! - Closed-form spend estimates and batch scenario runs

pub mod error;
pub mod instruments;
pub mod accrual;
pub mod inputs;
pub mod scenario;

// Re-export commonly used types
pub use error::{AccrualError, Result};
pub use instruments::{compute_chosen_target, AwardTarget, InstrumentKey, InstrumentRules, RateTable};
pub use accrual::{
    normalize_shares, simulate_accrual, solve_for_target, AccrualConfig, AccrualEngine, CategoryShares,
    PeriodRecord, TargetResolution,
};
pub use inputs::AccrualInputs;
pub use scenario::{ScenarioOutcome, ScenarioRunner};

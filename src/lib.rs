//! Fund Performance - fee and performance computation for a pooled investment fund
//!
//! This library provides:
//! - A hurdle / catch-up fee rule shared by every calculation
//! - Per-investor ledger processing (NAV, accrued fees, XIRR, YTD and locked-in returns)
//! - Rebasing of index series with a derived after-fee fund curve
//! - Locked-in NAV projection and the fee compensation curve
//! - CSV loaders and an investor directory for the binaries
//!
//! All computations are pure: callers pass fee parameters and the valuation
//! date explicitly.

pub mod error;
pub mod sanitize;
pub mod fees;
pub mod series;
pub mod performance;
pub mod rebase;
pub mod projection;
pub mod investors;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use fees::{compensation_curve, fee_rule, CurveResult, FeeOutcome, FeeParameters};
pub use series::{CashflowEntry, DateWindow, ReturnObservation, SeriesTable};
pub use performance::{
    compute_performance, compute_public_metrics, xirr, PerformanceResult, PublicMetrics,
};
pub use rebase::{compute_rebased_series, RebasedResult};
pub use projection::{project_locked_in, project_locked_in_from, ProjectionResult};
pub use investors::{InvestorConfig, InvestorDirectory, SeriesSource};

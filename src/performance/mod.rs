//! Investor performance: contribution ledger, IRR and headline returns

pub mod irr;
mod ledger;
mod result;
mod public;

pub use irr::{xirr, xirr_entries, xirr_with, XirrConfig};
pub use ledger::{compute_performance, LedgerProcessor};
pub use result::{CashflowChart, ChartPoint, PerformanceResult, TerminalSplit};
pub use public::{compute_public_metrics, PublicMetrics};

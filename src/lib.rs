//! Debt Projection - Government debt balance sheet and interest cost projection
//!
//! This library provides:
//! - Alignment of upstream debt series into a per-category and aggregate history
//! - User-editable interest-rate forecast curves with scenario persistence
//! - Period-by-period projection of the balance sheet under a fiscal model
//! - Batch runs across named rate scenarios

pub mod category;
pub mod error;
pub mod history;
pub mod forecast;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use category::DebtCategory;
pub use error::{Error, Result};
pub use history::{BalanceSheetHistory, HistoricalAggregator, SeriesAligner};
pub use forecast::{ControlPoint, ForecastCurve, ForecastSet, ScenarioStore};
pub use projection::{
    FiscalInputProvider, IssuanceAllocator, ProjectionConfig, ProjectionEngine, ProjectionResult,
    ProjectionRow,
};
pub use scenario::ScenarioRunner;

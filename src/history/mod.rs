//! Historical balance sheet built from upstream debt series

mod series;
mod aggregate;
pub mod loader;

pub use series::{
    monthly_interest, AlignedRow, CategoryBalance, CategorySources, DebtCategorySeries,
    InterestComparison, Observation, SeriesAligner,
};
pub use aggregate::{BalanceSheetHistory, HistoricalAggregator, HistoryRow};

//! Forward projection of the balance sheet

mod allocator;
mod fiscal;
mod rows;
mod engine;
mod export;

pub use allocator::{IssuanceAllocator, SPLIT_TOLERANCE};
pub use fiscal::{ConstantFiscalInputs, FiscalInputProvider, GrowingFiscalInputs};
pub use rows::{CategoryState, FiscalTerms, ProjectionResult, ProjectionRow, ProjectionSummary};
pub use engine::{EngineState, ProjectionConfig, ProjectionEngine, DAYS_PER_YEAR};
pub use export::write_balance_sheet_csv;

//! Crate error type

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Not enough overlapping observations to build a history
    #[error("Insufficient data for {category}: {reason}")]
    Alignment { category: String, reason: String },

    #[error("Requested time {requested} is beyond the curve horizon; max allowed is {max}")]
    CurveHorizon { requested: NaiveDate, max: NaiveDate },

    #[error("Requested time {requested} is before the first control point at {min}")]
    CurveStart { requested: NaiveDate, min: NaiveDate },

    #[error("Curve edit rejected: {0}")]
    CurveEdit(String),

    #[error("Curve needs at least 2 control points to fit, has {have}")]
    InsufficientPoints { have: usize },

    #[error("Issuance allocation error: {0}")]
    Allocation(String),

    #[error("Scenario '{scenario}' variable '{variable}': {reason}")]
    ScenarioIo {
        scenario: String,
        variable: String,
        reason: String,
    },

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Scenario-driven interest-rate forecast curves

mod spline;
mod curve;
mod set;
pub mod presets;
pub mod store;

pub use spline::Interpolant;
pub use curve::{ControlPoint, ForecastCurve};
pub use set::{rate_variable_name, ForecastSet};
pub use store::{CsvScenarioStore, InMemoryScenarioStore, ScenarioStore, DEFAULT_SCENARIO_PATH};

//! Scenario persistence for curve control points
//!
//! A scenario is a named set of point lists, one per forecast variable.
//! [`CsvScenarioStore`] keeps each list as `<root>/<scenario>/<variable>.csv`
//! with `date,value` columns.

use super::curve::ControlPoint;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Logical read/write contract for scenario records
pub trait ScenarioStore {
    fn save_points(
        &mut self,
        scenario: &str,
        variable: &str,
        points: &[ControlPoint],
    ) -> Result<()>;

    fn load_points(&self, scenario: &str, variable: &str) -> Result<Vec<ControlPoint>>;

    /// Names of all stored scenarios, sorted
    fn list_scenarios(&self) -> Result<Vec<String>>;
}

fn scenario_error(scenario: &str, variable: &str, reason: impl Into<String>) -> Error {
    Error::ScenarioIo {
        scenario: scenario.to_string(),
        variable: variable.to_string(),
        reason: reason.into(),
    }
}

/// Scenario records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenarioStore {
    records: BTreeMap<(String, String), Vec<ControlPoint>>,
}

impl ScenarioStore for InMemoryScenarioStore {
    fn save_points(
        &mut self,
        scenario: &str,
        variable: &str,
        points: &[ControlPoint],
    ) -> Result<()> {
        self.records
            .insert((scenario.to_string(), variable.to_string()), points.to_vec());
        Ok(())
    }

    fn load_points(&self, scenario: &str, variable: &str) -> Result<Vec<ControlPoint>> {
        self.records
            .get(&(scenario.to_string(), variable.to_string()))
            .cloned()
            .ok_or_else(|| scenario_error(scenario, variable, "not found"))
    }

    fn list_scenarios(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.records.keys().map(|(s, _)| s.clone()).collect();
        names.dedup();
        Ok(names)
    }
}

/// Default directory for saved scenarios
pub const DEFAULT_SCENARIO_PATH: &str = "scenarios";

/// Scenario records as CSV files under a root directory
#[derive(Debug, Clone)]
pub struct CsvScenarioStore {
    root: PathBuf,
}

impl CsvScenarioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, scenario: &str, variable: &str) -> Result<PathBuf> {
        for part in [scenario, variable] {
            if part.is_empty() || part.contains(['/', '\\']) || part == "." || part == ".." {
                return Err(scenario_error(scenario, variable, format!("invalid name '{}'", part)));
            }
        }
        Ok(self.root.join(scenario).join(format!("{}.csv", variable)))
    }
}

impl ScenarioStore for CsvScenarioStore {
    fn save_points(
        &mut self,
        scenario: &str,
        variable: &str,
        points: &[ControlPoint],
    ) -> Result<()> {
        let path = self.record_path(scenario, variable)?;
        let failed = |e: &dyn std::fmt::Display| {
            scenario_error(scenario, variable, format!("cannot write {}: {}", path.display(), e))
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| failed(&e))?;
        }
        let mut writer = csv::Writer::from_path(&path).map_err(|e| failed(&e))?;
        for point in points {
            writer.serialize(point).map_err(|e| failed(&e))?;
        }
        writer.flush().map_err(|e| failed(&e))?;

        log::debug!("Saved {} points to {}", points.len(), path.display());
        Ok(())
    }

    fn load_points(&self, scenario: &str, variable: &str) -> Result<Vec<ControlPoint>> {
        let path = self.record_path(scenario, variable)?;
        if !path.exists() {
            return Err(scenario_error(
                scenario,
                variable,
                format!("not found at {}", path.display()),
            ));
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| scenario_error(scenario, variable, e.to_string()))?;
        reader
            .deserialize()
            .map(|row| {
                row.map_err(|e| {
                    scenario_error(scenario, variable, format!("malformed record: {}", e))
                })
            })
            .collect()
    }

    fn list_scenarios(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

//! Scenario runner for repeated projections
//!
//! Holds the historical balance sheet and run configuration once, then
//! projects any number of rate scenarios against it. Intended to be re-run
//! after each curve edit.

use crate::error::Result;
use crate::forecast::{ForecastSet, ScenarioStore};
use crate::history::BalanceSheetHistory;
use crate::projection::{FiscalInputProvider, ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-built history plus configuration for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(history, ProjectionConfig::default());
/// let base = runner.base_forecasts(true)?;
///
/// for (name, result) in runner.run_scenarios(&base, &store, &["Scenario 1", "Scenario 2"])? {
///     println!("{}: {:.3e}", name, result.summary().final_total_debt);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    history: BalanceSheetHistory,
    config: ProjectionConfig,
}

impl ScenarioRunner {
    pub fn new(history: BalanceSheetHistory, config: ProjectionConfig) -> Self {
        Self { history, config }
    }

    /// Curves seeded from the last historical rates, with presets if requested
    pub fn base_forecasts(&self, with_presets: bool) -> Result<ForecastSet> {
        let set = ForecastSet::from_history(&self.history)?;
        if with_presets {
            set.with_presets()
        } else {
            Ok(set)
        }
    }

    /// Run a projection with the configured constant fiscal inputs
    pub fn run(&self, curves: &ForecastSet) -> Result<ProjectionResult> {
        let fiscal = self.config.fiscal_inputs();
        self.run_with_fiscal(curves, &fiscal)
    }

    /// Run a projection with a custom fiscal model
    pub fn run_with_fiscal(
        &self,
        curves: &ForecastSet,
        fiscal: &dyn FiscalInputProvider,
    ) -> Result<ProjectionResult> {
        let allocator = self.config.allocator(self.history.categories())?;
        ProjectionEngine::from_history(&self.history, curves, allocator, fiscal)?.run(&self.config)
    }

    /// Load each named scenario into its own copy of `base` and project it.
    /// Stops at the first scenario that fails to load or project.
    pub fn run_scenarios(
        &self,
        base: &ForecastSet,
        store: &dyn ScenarioStore,
        names: &[&str],
    ) -> Result<Vec<(String, ProjectionResult)>> {
        names
            .iter()
            .map(|name| {
                let mut curves = base.clone();
                curves.load_scenario(store, name)?;
                Ok((name.to_string(), self.run(&curves)?))
            })
            .collect()
    }

    pub fn history(&self) -> &BalanceSheetHistory {
        &self.history
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Mutable access for adjusting the configuration between runs
    pub fn config_mut(&mut self) -> &mut ProjectionConfig {
        &mut self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::DebtCategory;
    use crate::forecast::InMemoryScenarioStore;
    use crate::history::{CategorySources, HistoricalAggregator, Observation};
    use chrono::{Duration, NaiveDate};

    fn test_history() -> BalanceSheetHistory {
        let dates = [
            NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        ];
        let sources: Vec<CategorySources> = DebtCategory::MARKETABLE_NOMINAL
            .into_iter()
            .map(|category| {
                let mut s = CategorySources::new(category);
                for date in dates {
                    s.avg_interest_rate.push(Observation::new(date, 0.035));
                    s.total_outstanding.push(Observation::new(date, 8.0e12));
                }
                s
            })
            .collect();
        HistoricalAggregator::aggregate(&sources).unwrap()
    }

    #[test]
    fn test_presets_run_three_years() {
        let runner = ScenarioRunner::new(test_history(), ProjectionConfig::default());
        let base = runner.base_forecasts(true).unwrap();
        let result = runner.run(&base).unwrap();

        // 31-day steps up to the 1095-day preset horizon
        assert_eq!(result.projected().len(), 35);
        assert!(result.summary().final_total_debt > result.summary().initial_total_debt);
    }

    #[test]
    fn test_scenarios_with_higher_rates_cost_more() {
        let runner = ScenarioRunner::new(test_history(), ProjectionConfig::default());
        let base = runner.base_forecasts(false).unwrap();
        let start = runner.history().last_row().unwrap().date;

        let mut store = InMemoryScenarioStore::default();
        for (name, rate) in [("low", 0.01), ("high", 0.08)] {
            let mut curves = base.clone();
            for category in DebtCategory::MARKETABLE_NOMINAL {
                curves
                    .get_mut(category)
                    .unwrap()
                    .add_point(start + Duration::days(730), rate)
                    .unwrap();
            }
            curves.save_scenario(&mut store, name).unwrap();
        }

        let results = runner.run_scenarios(&base, &store, &["low", "high"]).unwrap();
        assert_eq!(results.len(), 2);
        let low = results[0].1.summary();
        let high = results[1].1.summary();
        assert!(high.final_monthly_interest > low.final_monthly_interest);
        assert!(high.final_total_debt > low.final_total_debt);

        assert!(runner.run_scenarios(&base, &store, &["missing"]).is_err());
    }

    #[test]
    fn test_seed_only_curves_are_rejected() {
        let runner = ScenarioRunner::new(test_history(), ProjectionConfig::default());
        let base = runner.base_forecasts(false).unwrap();
        assert!(matches!(
            runner.run(&base),
            Err(crate::error::Error::InsufficientPoints { have: 1 })
        ));
    }
}

//! Forward projection of the balance sheet under rate forecasts

use super::allocator::IssuanceAllocator;
use super::fiscal::{ConstantFiscalInputs, FiscalInputProvider};
use super::rows::{CategoryState, FiscalTerms, ProjectionResult, ProjectionRow};
use crate::category::DebtCategory;
use crate::error::{Error, Result};
use crate::forecast::ForecastSet;
use crate::history::{monthly_interest, BalanceSheetHistory};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Days per year used to convert elapsed days into a fraction of a year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Days between projected rows
    pub step_days: i64,

    /// Days from the seed date to the first projected row
    pub start_offset_days: i64,

    /// Annual tax receipts
    pub tax_receipts: f64,

    /// Annual government spending excluding interest
    pub spending_ex_interest: f64,

    /// Issuance split by category; equal split when None
    pub issuance_split: Option<BTreeMap<DebtCategory, f64>>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let fiscal = ConstantFiscalInputs::default();
        Self {
            step_days: 31,
            start_offset_days: 31,
            tax_receipts: fiscal.tax_receipts,
            spending_ex_interest: fiscal.spending_ex_interest,
            issuance_split: None,
        }
    }
}

impl ProjectionConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn fiscal_inputs(&self) -> ConstantFiscalInputs {
        ConstantFiscalInputs {
            tax_receipts: self.tax_receipts,
            spending_ex_interest: self.spending_ex_interest,
        }
    }

    /// Allocator from the configured split, or an equal split over `categories`.
    ///
    /// Categories left out of a configured split receive no new issuance.
    pub fn allocator(&self, categories: &[DebtCategory]) -> Result<IssuanceAllocator> {
        let Some(configured) = &self.issuance_split else {
            return IssuanceAllocator::equal(categories);
        };
        if let Some(unknown) = configured.keys().find(|c| !categories.contains(c)) {
            return Err(Error::Allocation(format!(
                "split names {}, which is not among the projected categories",
                unknown
            )));
        }

        let mut splits: BTreeMap<DebtCategory, f64> =
            categories.iter().map(|c| (*c, 0.0)).collect();
        splits.extend(configured.iter().map(|(c, f)| (*c, *f)));
        IssuanceAllocator::with_splits(splits)
    }
}

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Holding only the seed row
    Seeded,
    /// At least one row has been projected
    Stepping { steps: usize },
}

/// Steps the balance sheet forward one period at a time.
///
/// Curves are borrowed, never copied, and sampled afresh on every step.
pub struct ProjectionEngine<'a> {
    curves: &'a ForecastSet,
    allocator: IssuanceAllocator,
    fiscal: &'a dyn FiscalInputProvider,
    result: ProjectionResult,
    state: EngineState,
}

impl<'a> ProjectionEngine<'a> {
    /// Create an engine from a seed row.
    ///
    /// Every seed category must have a split and a fitted curve, and every
    /// allocator category must have a seed balance.
    pub fn new(
        seed: ProjectionRow,
        curves: &'a ForecastSet,
        allocator: IssuanceAllocator,
        fiscal: &'a dyn FiscalInputProvider,
    ) -> Result<Self> {
        if let Some(category) = allocator.categories().find(|c| seed.category(*c).is_none()) {
            return Err(Error::Projection(format!("seed row has no balance for {}", category)));
        }
        for &category in seed.categories.keys() {
            allocator.get_split(category)?;
            let curve = curves.curve(category)?;
            if !curve.is_fitted() {
                return Err(Error::InsufficientPoints { have: curve.len() });
            }
        }

        Ok(Self {
            curves,
            allocator,
            fiscal,
            result: ProjectionResult::new(seed),
            state: EngineState::Seeded,
        })
    }

    /// Create an engine seeded from the last historical row
    pub fn from_history(
        history: &BalanceSheetHistory,
        curves: &'a ForecastSet,
        allocator: IssuanceAllocator,
        fiscal: &'a dyn FiscalInputProvider,
    ) -> Result<Self> {
        let last = history.last_row().ok_or_else(|| Error::Alignment {
            category: "all".to_string(),
            reason: "empty history cannot seed a projection".to_string(),
        })?;
        Self::new(ProjectionRow::from_history(last), curves, allocator, fiscal)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn last_row(&self) -> &ProjectionRow {
        self.result.rows.last().unwrap_or(self.result.seed())
    }

    pub fn rows(&self) -> &[ProjectionRow] {
        &self.result.rows
    }

    /// Earliest horizon across the curves of the projected categories
    pub fn horizon(&self) -> Result<NaiveDate> {
        let mut horizon: Option<NaiveDate> = None;
        for &category in self.result.seed().categories.keys() {
            let h = self.curves.curve(category)?.horizon();
            horizon = Some(horizon.map_or(h, |cur| cur.min(h)));
        }
        horizon.ok_or_else(|| Error::Projection("no categories to project".to_string()))
    }

    /// Project one period ending at `to_date` and append it.
    ///
    /// Nothing is appended on error.
    pub fn advance(&mut self, to_date: NaiveDate) -> Result<&ProjectionRow> {
        let last = self.last_row();
        if to_date <= last.date {
            return Err(Error::Projection(format!(
                "step to {} does not advance past {}",
                to_date, last.date
            )));
        }

        let tax_receipts = self.fiscal.tax_receipts(to_date);
        let spending_ex_interest = self.fiscal.spending_ex_interest(to_date);
        let deficit_ex_interest = spending_ex_interest - tax_receipts;
        let deficit_incl_interest = deficit_ex_interest + 12.0 * last.total_interest;

        let elapsed_fraction = (to_date - last.date).num_days() as f64 / DAYS_PER_YEAR;
        let new_issuance_total = elapsed_fraction * deficit_incl_interest;

        let mut categories = BTreeMap::new();
        for (&category, prior) in &last.categories {
            let split = self.allocator.get_split(category)?;
            let new_issuance = new_issuance_total * split;

            let outstanding = prior.outstanding + new_issuance;
            let rate = self.curves.curve(category)?.sample_at(to_date)?;

            categories.insert(
                category,
                CategoryState {
                    outstanding,
                    monthly_interest: monthly_interest(rate, outstanding),
                    avg_interest_rate: rate,
                    new_issuance,
                    issuance_split: split,
                },
            );
        }

        let mut row = ProjectionRow::seed(to_date, categories);
        row.fiscal = Some(FiscalTerms {
            tax_receipts,
            spending_ex_interest,
            deficit_ex_interest,
            deficit_incl_interest,
            new_issuance_total,
        });

        log::debug!(
            "{}: issued {:.3e}, total debt {:.3e}, monthly interest {:.3e}",
            to_date,
            new_issuance_total,
            row.total_debt,
            row.total_interest
        );

        self.result.add_row(row);
        self.state = EngineState::Stepping {
            steps: self.result.rows.len() - 1,
        };
        Ok(self.last_row())
    }

    /// Step from the seed by the configured cadence while the candidate date
    /// stays within the curve horizon, then return all rows.
    pub fn run(mut self, config: &ProjectionConfig) -> Result<ProjectionResult> {
        if config.step_days <= 0 || config.start_offset_days <= 0 {
            return Err(Error::Projection(format!(
                "step ({}) and start offset ({}) must be positive day counts",
                config.step_days, config.start_offset_days
            )));
        }

        let horizon = self.horizon()?;
        let mut date = self.last_row().date + Duration::days(config.start_offset_days);

        while date <= horizon {
            self.advance(date)?;
            date += Duration::days(config.step_days);
        }

        let result = self.into_result();
        let summary = result.summary();
        log::info!(
            "Projected {} steps to {}: total debt {:.3e} -> {:.3e}",
            summary.steps,
            summary.end_date,
            summary.initial_total_debt,
            summary.final_total_debt
        );
        Ok(result)
    }

    pub fn into_result(self) -> ProjectionResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastCurve;
    use approx::assert_relative_eq;

    const CATEGORIES: [DebtCategory; 3] =
        [DebtCategory::Bills, DebtCategory::Notes, DebtCategory::Bonds];

    fn d0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn seed_row() -> ProjectionRow {
        let categories = CATEGORIES
            .iter()
            .map(|c| {
                (
                    *c,
                    CategoryState {
                        outstanding: 10e12,
                        monthly_interest: 0.1e12 / 3.0,
                        avg_interest_rate: 0.04,
                        new_issuance: 0.0,
                        issuance_split: 0.0,
                    },
                )
            })
            .collect();
        let mut seed = ProjectionRow::seed(d0(), categories);
        seed.total_interest = 0.1e12;
        seed
    }

    fn flat_curves(rate: f64, horizon_days: i64) -> ForecastSet {
        let mut set = ForecastSet::new();
        for c in CATEGORIES {
            let mut curve = ForecastCurve::create(c.slug(), d0(), rate);
            curve.add_point(d0() + Duration::days(horizon_days), rate).unwrap();
            set.insert(c, curve);
        }
        set
    }

    #[test]
    fn test_single_step_matches_hand_calculation() {
        let curves = flat_curves(0.04, 365);
        let fiscal = ConstantFiscalInputs {
            tax_receipts: 4.5e12,
            spending_ex_interest: 5.5e12,
        };
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();
        assert_eq!(engine.state(), EngineState::Seeded);

        let row = engine.advance(d0() + Duration::days(31)).unwrap().clone();
        let fiscal_terms = row.fiscal.unwrap();

        assert_relative_eq!(fiscal_terms.deficit_ex_interest, 1e12);
        assert_relative_eq!(fiscal_terms.deficit_incl_interest, 2.2e12, max_relative = 1e-12);
        let expected_issuance = 31.0 / 365.25 * 2.2e12;
        assert_relative_eq!(
            fiscal_terms.new_issuance_total,
            expected_issuance,
            max_relative = 1e-12
        );
        assert_relative_eq!(expected_issuance, 0.1867e12, max_relative = 1e-3);

        for c in CATEGORIES {
            let state = row.category(c).unwrap();
            let expected_outstanding = 10e12 + expected_issuance / 3.0;
            assert_relative_eq!(state.new_issuance, expected_issuance / 3.0, max_relative = 1e-12);
            assert_relative_eq!(state.outstanding, expected_outstanding, max_relative = 1e-12);
            assert_relative_eq!(
                state.monthly_interest,
                0.04 / 12.0 * expected_outstanding,
                max_relative = 1e-12
            );
            assert_relative_eq!(state.issuance_split, 1.0 / 3.0);
        }
        assert_relative_eq!(row.total_debt, 30e12 + expected_issuance, max_relative = 1e-12);
        assert_relative_eq!(
            row.total_interest,
            0.04 / 12.0 * (30e12 + expected_issuance),
            max_relative = 1e-12
        );
        assert_eq!(engine.state(), EngineState::Stepping { steps: 1 });
    }

    #[test]
    fn test_run_terminates_at_horizon_and_then_fails() {
        let curves = flat_curves(0.03, 365);
        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        let config = ProjectionConfig::default();

        let engine =
            ProjectionEngine::new(seed_row(), &curves, allocator.clone(), &fiscal).unwrap();
        let result = engine.run(&config).unwrap();

        // 31, 62, ..., 341 days; 372 is past the 365 day horizon
        assert_eq!(result.projected().len(), 11);
        let last_date = result.rows.last().unwrap().date;
        assert_eq!(last_date, d0() + Duration::days(341));

        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();
        for row in result.projected() {
            engine.advance(row.date).unwrap();
        }
        let horizon = d0() + Duration::days(365);
        match engine.advance(last_date + Duration::days(31)) {
            Err(Error::CurveHorizon { max, .. }) => assert_eq!(max, horizon),
            other => panic!("expected horizon error, got {:?}", other.map(|r| r.date)),
        }
        assert_eq!(engine.rows().len(), 12);
    }

    #[test]
    fn test_advance_must_move_forward() {
        let curves = flat_curves(0.03, 365);
        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();

        assert!(matches!(engine.advance(d0()), Err(Error::Projection(_))));
        assert_eq!(engine.state(), EngineState::Seeded);
    }

    #[test]
    fn test_rates_follow_curve_edits_between_runs() {
        let mut curves = flat_curves(0.03, 365);
        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        let step = d0() + Duration::days(31);

        let first = {
            let mut engine =
                ProjectionEngine::new(seed_row(), &curves, allocator.clone(), &fiscal).unwrap();
            engine.advance(step).unwrap().clone()
        };

        curves
            .get_mut(DebtCategory::Bills)
            .unwrap()
            .add_point(step, 0.06)
            .unwrap();

        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();
        let second = engine.advance(step).unwrap();

        assert_relative_eq!(first.category(DebtCategory::Bills).unwrap().avg_interest_rate, 0.03);
        assert_relative_eq!(second.category(DebtCategory::Bills).unwrap().avg_interest_rate, 0.06);
        assert!(second.total_interest > first.total_interest);
    }

    #[test]
    fn test_missing_curve_rejected_at_construction() {
        let mut curves = ForecastSet::new();
        let mut bills = ForecastCurve::create("bills", d0(), 0.03);
        bills.add_point(d0() + Duration::days(90), 0.03).unwrap();
        curves.insert(DebtCategory::Bills, bills);

        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        assert!(ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"step_days": 30, "issuance_split": {"bills": 0.5, "notes": 0.5}}"#;
        let config: ProjectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.step_days, 30);
        assert_eq!(config.start_offset_days, 31);
        assert_eq!(config.tax_receipts, 4.5e12);

        let allocator = config.allocator(&CATEGORIES).unwrap();
        assert_relative_eq!(allocator.get_split(DebtCategory::Bills).unwrap(), 0.5);
        assert_relative_eq!(allocator.get_split(DebtCategory::Bonds).unwrap(), 0.0);

        let tips: ProjectionConfig =
            serde_json::from_str(r#"{"issuance_split": {"bills": 0.5, "tips": 0.5}}"#).unwrap();
        assert!(matches!(tips.allocator(&CATEGORIES), Err(Error::Allocation(_))));
    }

    #[test]
    fn test_partial_split_carries_unallocated_balances() {
        let curves = flat_curves(0.04, 365);
        let fiscal = ConstantFiscalInputs::default();
        let config = ProjectionConfig {
            issuance_split: Some(BTreeMap::from([
                (DebtCategory::Bills, 0.5),
                (DebtCategory::Notes, 0.5),
            ])),
            ..ProjectionConfig::default()
        };
        let allocator = config.allocator(&CATEGORIES).unwrap();
        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();

        let row = engine.advance(d0() + Duration::days(31)).unwrap().clone();
        let issued = row.fiscal.unwrap().new_issuance_total;

        let bonds = row.category(DebtCategory::Bonds).unwrap();
        assert_relative_eq!(bonds.outstanding, 10e12);
        assert_relative_eq!(bonds.new_issuance, 0.0);
        assert_relative_eq!(bonds.monthly_interest, 0.04 / 12.0 * 10e12, max_relative = 1e-12);
        let bills = row.category(DebtCategory::Bills).unwrap();
        assert_relative_eq!(bills.new_issuance, issued / 2.0, max_relative = 1e-12);
        assert_relative_eq!(row.total_debt, 30e12 + issued, max_relative = 1e-12);
    }

    #[test]
    fn test_allocator_category_without_seed_balance_rejected() {
        let curves = flat_curves(0.04, 365);
        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&DebtCategory::ALL).unwrap();
        assert!(matches!(
            ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal),
            Err(Error::Projection(_))
        ));
    }

    #[test]
    fn test_each_step_builds_on_the_previous_row() {
        let mut curves = flat_curves(0.03, 365);
        for (c, rate) in [(DebtCategory::Bills, 0.05), (DebtCategory::Bonds, 0.02)] {
            curves.get_mut(c).unwrap().add_point(d0() + Duration::days(120), rate).unwrap();
        }
        let fiscal = ConstantFiscalInputs::default();
        let allocator = IssuanceAllocator::equal(&CATEGORIES).unwrap();
        let mut engine = ProjectionEngine::new(seed_row(), &curves, allocator, &fiscal).unwrap();
        for days in [31, 62, 93] {
            engine.advance(d0() + Duration::days(days)).unwrap();
        }
        assert_eq!(engine.state(), EngineState::Stepping { steps: 3 });

        let rows = engine.rows().to_vec();
        assert_eq!(rows.len(), 4);
        for pair in rows.windows(2) {
            let (prev, row) = (&pair[0], &pair[1]);
            let terms = row.fiscal.unwrap();
            assert_relative_eq!(
                terms.deficit_incl_interest,
                terms.deficit_ex_interest + 12.0 * prev.total_interest,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                terms.new_issuance_total,
                31.0 / DAYS_PER_YEAR * terms.deficit_incl_interest,
                max_relative = 1e-12
            );

            assert_eq!(row.categories.len(), CATEGORIES.len());
            for c in CATEGORIES {
                let before = prev.category(c).unwrap();
                let after = row.category(c).unwrap();
                assert_relative_eq!(
                    after.outstanding,
                    before.outstanding + after.new_issuance,
                    max_relative = 1e-12
                );
            }
            let summed: f64 = row.categories.values().map(|s| s.outstanding).sum();
            assert_relative_eq!(row.total_debt, summed, max_relative = 1e-12);
            let interest: f64 = row.categories.values().map(|s| s.monthly_interest).sum();
            assert_relative_eq!(row.total_interest, interest, max_relative = 1e-12);
        }
    }
}

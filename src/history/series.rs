//! Per-category alignment of independently dated source series

use crate::category::DebtCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dated value from one upstream source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The three constituent series for one debt category, already filtered
/// to that category upstream
#[derive(Debug, Clone)]
pub struct CategorySources {
    pub category: DebtCategory,

    /// Average interest rate as a decimal fraction (0.045 for 4.5%)
    pub avg_interest_rate: Vec<Observation>,

    /// Total outstanding amount (dollars)
    pub total_outstanding: Vec<Observation>,

    /// Actual monthly interest expense (dollars), may be sparser than the others
    pub interest_expense: Vec<Observation>,
}

impl CategorySources {
    pub fn new(category: DebtCategory) -> Self {
        Self {
            category,
            avg_interest_rate: Vec::new(),
            total_outstanding: Vec::new(),
            interest_expense: Vec::new(),
        }
    }
}

/// One date of the outer-joined table; any source may be missing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub avg_interest_rate: Option<f64>,
    pub total_outstanding: Option<f64>,
    pub actual_interest: Option<f64>,
}

impl AlignedRow {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            avg_interest_rate: None,
            total_outstanding: None,
            actual_interest: None,
        }
    }

    /// rate * outstanding / 12, only when both are observed
    pub fn estimated_interest(&self) -> Option<f64> {
        match (self.avg_interest_rate, self.total_outstanding) {
            (Some(rate), Some(amount)) => Some(monthly_interest(rate, amount)),
            _ => None,
        }
    }
}

/// Monthly interest on `amount` at an annualized `rate`
pub fn monthly_interest(rate: f64, amount: f64) -> f64 {
    rate * amount / 12.0
}

/// Fully observed row for one category (rate and outstanding both present)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub avg_interest_rate: f64,
    pub total_outstanding: f64,
    pub estimated_interest: f64,
    pub actual_interest: Option<f64>,
}

/// Estimated against actual interest for one date, with running totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterestComparison {
    pub date: NaiveDate,
    pub estimated: f64,
    pub actual: f64,
    pub cumulative_estimated: f64,
    pub cumulative_actual: f64,
}

/// Date-indexed table for one debt category, sorted ascending by date
#[derive(Debug, Clone)]
pub struct DebtCategorySeries {
    pub category: DebtCategory,
    rows: Vec<AlignedRow>,
}

impl DebtCategorySeries {
    /// Every date seen in any source
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    /// Dates with both rate and outstanding observed
    pub fn complete_rows(&self) -> impl Iterator<Item = (NaiveDate, CategoryBalance)> + '_ {
        self.rows.iter().filter_map(|row| {
            let rate = row.avg_interest_rate?;
            let amount = row.total_outstanding?;
            Some((
                row.date,
                CategoryBalance {
                    avg_interest_rate: rate,
                    total_outstanding: amount,
                    estimated_interest: monthly_interest(rate, amount),
                    actual_interest: row.actual_interest,
                },
            ))
        })
    }

    /// Rows where both the estimate and the reported expense exist
    pub fn estimated_vs_actual(&self) -> Vec<InterestComparison> {
        let mut cumulative_estimated = 0.0;
        let mut cumulative_actual = 0.0;

        self.rows
            .iter()
            .filter_map(|row| Some((row.date, row.estimated_interest()?, row.actual_interest?)))
            .map(|(date, estimated, actual)| {
                cumulative_estimated += estimated;
                cumulative_actual += actual;
                InterestComparison {
                    date,
                    estimated,
                    actual,
                    cumulative_estimated,
                    cumulative_actual,
                }
            })
            .collect()
    }
}

/// Outer-joins the constituent sources of a category on date
pub struct SeriesAligner;

impl SeriesAligner {
    pub fn align(sources: &CategorySources) -> DebtCategorySeries {
        let mut by_date: BTreeMap<NaiveDate, AlignedRow> = BTreeMap::new();

        for obs in &sources.avg_interest_rate {
            Self::row_for(&mut by_date, obs.date).avg_interest_rate = Some(obs.value);
        }
        for obs in &sources.total_outstanding {
            Self::row_for(&mut by_date, obs.date).total_outstanding = Some(obs.value);
        }
        for obs in &sources.interest_expense {
            Self::row_for(&mut by_date, obs.date).actual_interest = Some(obs.value);
        }

        let rows: Vec<AlignedRow> = by_date.into_values().collect();

        log::debug!(
            "{}: aligned {} rates, {} outstanding, {} expense observations into {} dates",
            sources.category,
            sources.avg_interest_rate.len(),
            sources.total_outstanding.len(),
            sources.interest_expense.len(),
            rows.len()
        );

        DebtCategorySeries {
            category: sources.category,
            rows,
        }
    }

    fn row_for(
        by_date: &mut BTreeMap<NaiveDate, AlignedRow>,
        date: NaiveDate,
    ) -> &mut AlignedRow {
        by_date.entry(date).or_insert_with(|| AlignedRow::empty(date))
    }
}

//! Balance sheet rows produced by a projection

use crate::category::DebtCategory;
use crate::history::HistoryRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of one debt category at the end of a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryState {
    pub outstanding: f64,
    /// Monthly interest on `outstanding`
    pub monthly_interest: f64,
    pub avg_interest_rate: f64,
    pub new_issuance: f64,
    pub issuance_split: f64,
}

/// Fiscal terms of a projected period (annualized except `new_issuance_total`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiscalTerms {
    pub tax_receipts: f64,
    pub spending_ex_interest: f64,
    pub deficit_ex_interest: f64,
    pub deficit_incl_interest: f64,
    /// Debt issued over the period
    pub new_issuance_total: f64,
}

/// Full balance sheet state for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub date: NaiveDate,
    pub categories: BTreeMap<DebtCategory, CategoryState>,
    pub total_debt: f64,
    /// Monthly interest summed over categories
    pub total_interest: f64,
    /// None for rows taken from history
    pub fiscal: Option<FiscalTerms>,
}

impl ProjectionRow {
    /// Seed row with totals summed from the category states
    pub fn seed(date: NaiveDate, categories: BTreeMap<DebtCategory, CategoryState>) -> Self {
        let total_debt = categories.values().map(|c| c.outstanding).sum();
        let total_interest = categories.values().map(|c| c.monthly_interest).sum();
        Self {
            date,
            categories,
            total_debt,
            total_interest,
            fiscal: None,
        }
    }

    /// Seed row from a historical balance sheet row
    pub fn from_history(row: &HistoryRow) -> Self {
        let categories = row
            .balances
            .iter()
            .map(|(category, balance)| {
                (
                    *category,
                    CategoryState {
                        outstanding: balance.total_outstanding,
                        monthly_interest: balance.estimated_interest,
                        avg_interest_rate: balance.avg_interest_rate,
                        new_issuance: 0.0,
                        issuance_split: 0.0,
                    },
                )
            })
            .collect();

        Self {
            date: row.date,
            categories,
            total_debt: row.total_debt,
            total_interest: row.total_interest,
            fiscal: None,
        }
    }

    pub fn category(&self, category: DebtCategory) -> Option<&CategoryState> {
        self.categories.get(&category)
    }

    pub fn is_projected(&self) -> bool {
        self.fiscal.is_some()
    }
}

/// Seed row followed by every projected row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionResult {
    pub fn new(seed: ProjectionRow) -> Self {
        Self { rows: vec![seed] }
    }

    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    pub fn seed(&self) -> &ProjectionRow {
        &self.rows[0]
    }

    /// Rows produced by the engine (seed excluded)
    pub fn projected(&self) -> &[ProjectionRow] {
        &self.rows[1..]
    }

    pub fn summary(&self) -> ProjectionSummary {
        let projected = self.projected();
        let last = self.rows.last().unwrap_or(self.seed());

        let total_new_issuance: f64 = projected
            .iter()
            .filter_map(|r| r.fiscal)
            .map(|f| f.new_issuance_total)
            .sum();
        let peak_monthly_interest = self
            .rows
            .iter()
            .map(|r| r.total_interest)
            .fold(f64::NEG_INFINITY, f64::max);

        ProjectionSummary {
            steps: projected.len() as u32,
            start_date: self.seed().date,
            end_date: last.date,
            initial_total_debt: self.seed().total_debt,
            final_total_debt: last.total_debt,
            final_monthly_interest: last.total_interest,
            peak_monthly_interest,
            total_new_issuance,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub steps: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_total_debt: f64,
    pub final_total_debt: f64,
    pub final_monthly_interest: f64,
    pub peak_monthly_interest: f64,
    pub total_new_issuance: f64,
}

//! Inner join of per-category series into the historical balance sheet

use super::series::{CategoryBalance, CategorySources, DebtCategorySeries, SeriesAligner};
use crate::category::DebtCategory;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One fully observed date of the balance sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub balances: BTreeMap<DebtCategory, CategoryBalance>,

    /// Sum of per-category outstanding
    pub total_debt: f64,

    /// Sum of per-category estimated monthly interest
    pub total_interest: f64,
}

/// Historical balance sheet, one row per date observed in every category
#[derive(Debug, Clone)]
pub struct BalanceSheetHistory {
    categories: Vec<DebtCategory>,
    series: Vec<DebtCategorySeries>,
    rows: Vec<HistoryRow>,
}

impl BalanceSheetHistory {
    pub fn categories(&self) -> &[DebtCategory] {
        &self.categories
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row; seeds the projection
    pub fn last_row(&self) -> Option<&HistoryRow> {
        self.rows.last()
    }

    /// Most recent (date, average rate) for a category
    pub fn last_rate(&self, category: DebtCategory) -> Option<(NaiveDate, f64)> {
        let row = self.rows.last()?;
        row.balances
            .get(&category)
            .map(|b| (row.date, b.avg_interest_rate))
    }

    /// Aligned (outer-joined) table for one category, before the inner join
    pub fn category_series(&self, category: DebtCategory) -> Option<&DebtCategorySeries> {
        self.series.iter().find(|s| s.category == category)
    }
}

/// Builds a [`BalanceSheetHistory`] from the sources of each category
pub struct HistoricalAggregator;

impl HistoricalAggregator {
    /// Align every category and inner-join them on date.
    ///
    /// Dates missing from any category are dropped, so the result covers the
    /// intersection of category coverage. Returns [`Error::Alignment`] when a
    /// category has no fully observed dates or the intersection is empty.
    pub fn aggregate(sources: &[CategorySources]) -> Result<BalanceSheetHistory> {
        if sources.is_empty() {
            return Err(Error::Alignment {
                category: "all".to_string(),
                reason: "no categories requested".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for s in sources {
            if !seen.insert(s.category) {
                return Err(Error::Alignment {
                    category: s.category.to_string(),
                    reason: "category supplied more than once".to_string(),
                });
            }
        }

        let series: Vec<DebtCategorySeries> = sources.iter().map(SeriesAligner::align).collect();

        let mut joined: Option<BTreeMap<NaiveDate, BTreeMap<DebtCategory, CategoryBalance>>> = None;

        for cat_series in &series {
            let complete: BTreeMap<NaiveDate, CategoryBalance> =
                cat_series.complete_rows().collect();

            if complete.is_empty() {
                return Err(Error::Alignment {
                    category: cat_series.category.to_string(),
                    reason: "no dates with both average rate and outstanding amount".to_string(),
                });
            }

            joined = Some(match joined {
                None => complete
                    .into_iter()
                    .map(|(date, balance)| (date, BTreeMap::from([(cat_series.category, balance)])))
                    .collect(),
                Some(prior) => {
                    let before = prior.len();
                    let merged: BTreeMap<_, _> = prior
                        .into_iter()
                        .filter_map(|(date, mut balances)| {
                            let balance = complete.get(&date)?;
                            balances.insert(cat_series.category, *balance);
                            Some((date, balances))
                        })
                        .collect();
                    if merged.len() < before {
                        log::debug!(
                            "{}: inner join dropped {} dates",
                            cat_series.category,
                            before - merged.len()
                        );
                    }
                    merged
                }
            });
        }

        let rows: Vec<HistoryRow> = joined
            .unwrap_or_default()
            .into_iter()
            .map(|(date, balances)| {
                let total_debt = balances.values().map(|b| b.total_outstanding).sum();
                let total_interest = balances.values().map(|b| b.estimated_interest).sum();
                HistoryRow {
                    date,
                    balances,
                    total_debt,
                    total_interest,
                }
            })
            .collect();

        let categories: Vec<DebtCategory> = sources.iter().map(|s| s.category).collect();

        if rows.is_empty() {
            let names: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
            return Err(Error::Alignment {
                category: names.join(", "),
                reason: "no dates observed in every category".to_string(),
            });
        }

        log::info!(
            "Historical balance sheet: {} rows from {} to {} across {} categories",
            rows.len(),
            rows[0].date,
            rows[rows.len() - 1].date,
            categories.len()
        );

        Ok(BalanceSheetHistory {
            categories,
            series,
            rows,
        })
    }
}

//! Wide CSV export of the historical and projected balance sheet

use super::rows::{ProjectionResult, ProjectionRow};
use crate::category::DebtCategory;
use crate::error::Result;
use crate::history::BalanceSheetHistory;
use std::io::Write;

const PER_CATEGORY_COLUMNS: [&str; 5] = [
    "total_debt",
    "avg_interest_rate",
    "monthly_interest",
    "new_issuance_amount",
    "new_issuance_split",
];

const FISCAL_COLUMNS: [&str; 5] = [
    "tax_receipts",
    "gov_spending_no_interest",
    "annual_deficit_no_interest",
    "annual_deficit_w_interest",
    "new_issuance",
];

fn header(categories: &[DebtCategory]) -> Vec<String> {
    let mut cols: Vec<String> = ["date", "kind", "total_debt", "monthly_interest"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    for category in categories {
        for col in PER_CATEGORY_COLUMNS {
            cols.push(format!("{}_{}", col, category.slug()));
        }
    }
    cols.extend(FISCAL_COLUMNS.iter().map(|c| c.to_string()));
    cols
}

fn record(row: &ProjectionRow, categories: &[DebtCategory]) -> Vec<String> {
    let kind = if row.is_projected() { "projected" } else { "historical" };
    let mut out = vec![
        row.date.to_string(),
        kind.to_string(),
        row.total_debt.to_string(),
        row.total_interest.to_string(),
    ];

    for category in categories {
        match row.category(*category) {
            Some(state) => out.extend([
                state.outstanding.to_string(),
                state.avg_interest_rate.to_string(),
                state.monthly_interest.to_string(),
                state.new_issuance.to_string(),
                state.issuance_split.to_string(),
            ]),
            None => out.extend(std::iter::repeat(String::new()).take(PER_CATEGORY_COLUMNS.len())),
        }
    }

    match row.fiscal {
        Some(f) => out.extend([
            f.tax_receipts.to_string(),
            f.spending_ex_interest.to_string(),
            f.deficit_ex_interest.to_string(),
            f.deficit_incl_interest.to_string(),
            f.new_issuance_total.to_string(),
        ]),
        None => out.extend(std::iter::repeat(String::new()).take(FISCAL_COLUMNS.len())),
    }
    out
}

/// Write every history row followed by the projected rows.
///
/// The projection seed duplicates the last history row and is skipped.
pub fn write_balance_sheet_csv<W: Write>(
    writer: W,
    history: &BalanceSheetHistory,
    projection: &ProjectionResult,
) -> Result<()> {
    let categories = history.categories();
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header(categories))?;

    for row in history.rows() {
        csv_writer.write_record(record(&ProjectionRow::from_history(row), categories))?;
    }
    for row in projection.projected() {
        csv_writer.write_record(record(row, categories))?;
    }

    csv_writer.flush()?;
    Ok(())
}

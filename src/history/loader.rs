//! Load already-filtered upstream series from CSV
//!
//! Each file holds one series for one category with a `date` (or
//! `record_date`) column and a `value` column. Files for a category live in
//! one directory as `<slug>_avg_interest_rate.csv`, `<slug>_outstanding.csv`
//! and `<slug>_interest_expense.csv`.

use super::series::{CategorySources, Observation};
use crate::category::DebtCategory;
use crate::error::Result;
use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

/// Default path to the historical series directory
pub const DEFAULT_HISTORY_PATH: &str = "data/history";

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "record_date")]
    date: NaiveDate,
    value: f64,
}

/// Load one series, multiplying every value by `scale`
pub fn load_series<P: AsRef<Path>>(path: P, scale: f64) -> Result<Vec<Observation>> {
    let reader = Reader::from_path(path)?;
    read_series(reader, scale)
}

/// Load one series from any reader (e.g., string buffer)
pub fn load_series_from_reader<R: std::io::Read>(
    reader: R,
    scale: f64,
) -> Result<Vec<Observation>> {
    read_series(Reader::from_reader(reader), scale)
}

fn read_series<R: std::io::Read>(mut reader: Reader<R>, scale: f64) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        observations.push(Observation::new(row.date, row.value * scale));
    }

    Ok(observations)
}

/// Load the three series for a category.
///
/// `rate_scale` converts the rate file to decimal fractions (0.01 when the
/// file is in percent). A missing interest expense file yields an empty series.
pub fn load_category_sources(
    dir: &Path,
    category: DebtCategory,
    rate_scale: f64,
) -> Result<CategorySources> {
    let slug = category.slug();
    let mut sources = CategorySources::new(category);

    let rate_path = dir.join(format!("{}_avg_interest_rate.csv", slug));
    sources.avg_interest_rate = load_series(rate_path, rate_scale)?;
    sources.total_outstanding = load_series(dir.join(format!("{}_outstanding.csv", slug)), 1.0)?;

    let expense_path = dir.join(format!("{}_interest_expense.csv", slug));
    if expense_path.exists() {
        sources.interest_expense = load_series(expense_path, 1.0)?;
    } else {
        log::warn!("{}: no interest expense file at {}", category, expense_path.display());
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    #[test]
    fn test_load_series_with_record_date_header() {
        let data = "record_date,value\n2023-01-31,4.5\n2023-02-28,4.6\n";
        let series = load_series_from_reader(data.as_bytes(), 0.01).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_relative_eq!(series[1].value, 0.046);
    }

    #[test]
    fn test_load_series_rejects_bad_date() {
        let data = "date,value\n31/01/2023,4.5\n";
        assert!(load_series_from_reader(data.as_bytes(), 1.0).is_err());
    }

    #[test]
    fn test_load_category_sources_without_expense() {
        let dir = tempfile::tempdir().unwrap();
        let rates = "date,value\n2023-01-31,2.1\n";
        fs::write(dir.path().join("notes_avg_interest_rate.csv"), rates).unwrap();
        let amounts = "date,value\n2023-01-31,14e12\n";
        fs::write(dir.path().join("notes_outstanding.csv"), amounts).unwrap();

        let sources = load_category_sources(dir.path(), DebtCategory::Notes, 0.01).unwrap();
        assert_eq!(sources.avg_interest_rate.len(), 1);
        assert_relative_eq!(sources.total_outstanding[0].value, 14.0e12);
        assert!(sources.interest_expense.is_empty());
    }
}

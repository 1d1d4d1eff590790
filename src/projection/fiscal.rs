//! Fiscal inputs consumed by the projection
//!
//! All amounts are annualized dollars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tax receipts and non-interest spending as a pure function of date
pub trait FiscalInputProvider {
    fn tax_receipts(&self, date: NaiveDate) -> f64;

    fn spending_ex_interest(&self, date: NaiveDate) -> f64;
}

/// Constant annual receipts and spending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantFiscalInputs {
    pub tax_receipts: f64,
    pub spending_ex_interest: f64,
}

impl Default for ConstantFiscalInputs {
    fn default() -> Self {
        Self {
            tax_receipts: 4.5e12,
            spending_ex_interest: 5.5e12,
        }
    }
}

impl FiscalInputProvider for ConstantFiscalInputs {
    fn tax_receipts(&self, _date: NaiveDate) -> f64 {
        self.tax_receipts
    }

    fn spending_ex_interest(&self, _date: NaiveDate) -> f64 {
        self.spending_ex_interest
    }
}

/// Receipts and spending compounding at fixed annual growth rates from a base date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowingFiscalInputs {
    pub base_date: NaiveDate,
    pub base: ConstantFiscalInputs,
    pub tax_growth: f64,
    pub spending_growth: f64,
}

impl GrowingFiscalInputs {
    fn years_since_base(&self, date: NaiveDate) -> f64 {
        (date - self.base_date).num_days() as f64 / 365.25
    }
}

impl FiscalInputProvider for GrowingFiscalInputs {
    fn tax_receipts(&self, date: NaiveDate) -> f64 {
        self.base.tax_receipts * (1.0 + self.tax_growth).powf(self.years_since_base(date))
    }

    fn spending_ex_interest(&self, date: NaiveDate) -> f64 {
        let years = self.years_since_base(date);
        self.base.spending_ex_interest * (1.0 + self.spending_growth).powf(years)
    }
}

//! Split of new debt issuance across categories

use crate::category::DebtCategory;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Allowed deviation of the split total from 1
pub const SPLIT_TOLERANCE: f64 = 1e-9;

/// Fractional issuance split; fractions always sum to 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuanceAllocator {
    splits: BTreeMap<DebtCategory, f64>,
}

impl IssuanceAllocator {
    /// Equal 1/N split across `categories`
    pub fn equal(categories: &[DebtCategory]) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::Allocation("no categories to allocate across".to_string()));
        }
        let share = 1.0 / categories.len() as f64;
        let mut splits = BTreeMap::new();
        for &category in categories {
            if splits.insert(category, share).is_some() {
                return Err(Error::Allocation(format!("{} listed more than once", category)));
            }
        }
        Ok(Self { splits })
    }

    /// Explicit split; fractions must be non-negative and sum to 1
    pub fn with_splits(splits: BTreeMap<DebtCategory, f64>) -> Result<Self> {
        if splits.is_empty() {
            return Err(Error::Allocation("no categories to allocate across".to_string()));
        }
        let invalid = splits.iter().find(|(_, f)| !f.is_finite() || **f < 0.0);
        if let Some((category, fraction)) = invalid {
            return Err(Error::Allocation(format!(
                "split for {} must be a non-negative fraction, got {}",
                category, fraction
            )));
        }
        let total: f64 = splits.values().sum();
        if (total - 1.0).abs() > SPLIT_TOLERANCE {
            return Err(Error::Allocation(format!("splits sum to {}, expected 1", total)));
        }
        Ok(Self { splits })
    }

    pub fn get_split(&self, category: DebtCategory) -> Result<f64> {
        self.splits.get(&category).copied().ok_or_else(|| {
            Error::Allocation(format!(
                "{} is not one of {:?}",
                category,
                self.splits.keys().collect::<Vec<_>>()
            ))
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = DebtCategory> + '_ {
        self.splits.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.splits.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equal_split_sums_to_one() {
        for n in 1..=4 {
            let categories = &DebtCategory::ALL[..n];
            let allocator = IssuanceAllocator::equal(categories).unwrap();
            assert_abs_diff_eq!(allocator.total(), 1.0, epsilon = 1e-9);
            for &c in categories {
                let split = allocator.get_split(c).unwrap();
                assert_abs_diff_eq!(split, 1.0 / n as f64, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_unknown_category_fails() {
        let allocator = IssuanceAllocator::equal(&DebtCategory::MARKETABLE_NOMINAL).unwrap();
        assert!(matches!(
            allocator.get_split(DebtCategory::Tips),
            Err(Error::Allocation(_))
        ));
    }

    #[test]
    fn test_explicit_split_must_sum_to_one() {
        let ok = BTreeMap::from([(DebtCategory::Bills, 0.6), (DebtCategory::Notes, 0.4)]);
        assert!(IssuanceAllocator::with_splits(ok).is_ok());

        let short = BTreeMap::from([(DebtCategory::Bills, 0.6), (DebtCategory::Notes, 0.3)]);
        assert!(IssuanceAllocator::with_splits(short).is_err());

        let negative = BTreeMap::from([(DebtCategory::Bills, 1.5), (DebtCategory::Notes, -0.5)]);
        assert!(IssuanceAllocator::with_splits(negative).is_err());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        assert!(IssuanceAllocator::equal(&[DebtCategory::Bills, DebtCategory::Bills]).is_err());
        assert!(IssuanceAllocator::equal(&[]).is_err());
    }
}

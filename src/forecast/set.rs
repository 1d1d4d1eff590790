//! One average-rate forecast curve per debt category

use super::curve::ForecastCurve;
use super::presets::apply_preset;
use super::store::ScenarioStore;
use crate::category::DebtCategory;
use crate::error::{Error, Result};
use crate::history::BalanceSheetHistory;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Persistence key of the average-rate curve for a category
pub fn rate_variable_name(category: DebtCategory) -> String {
    format!("avg_interest_rate_{}", category.slug())
}

/// Rate forecast curves keyed by category
#[derive(Debug, Clone, Default)]
pub struct ForecastSet {
    curves: BTreeMap<DebtCategory, ForecastCurve>,
}

impl ForecastSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one curve per history category from its last observed rate
    pub fn from_history(history: &BalanceSheetHistory) -> Result<Self> {
        let mut set = Self::new();
        for &category in history.categories() {
            let (date, rate) = history.last_rate(category).ok_or_else(|| Error::Alignment {
                category: category.to_string(),
                reason: "no historical rate to seed the forecast".to_string(),
            })?;
            set.insert(
                category,
                ForecastCurve::create(rate_variable_name(category), date, rate),
            );
        }
        Ok(set)
    }

    /// Add the preset control points to every curve that has one
    pub fn with_presets(mut self) -> Result<Self> {
        for (category, curve) in self.curves.iter_mut() {
            if !apply_preset(curve, *category)? {
                log::warn!("{}: no preset forecast, curve left at its seed point", category);
            }
        }
        Ok(self)
    }

    pub fn insert(
        &mut self,
        category: DebtCategory,
        curve: ForecastCurve,
    ) -> Option<ForecastCurve> {
        self.curves.insert(category, curve)
    }

    pub fn get(&self, category: DebtCategory) -> Option<&ForecastCurve> {
        self.curves.get(&category)
    }

    /// Mutable access for edits between projection runs
    pub fn get_mut(&mut self, category: DebtCategory) -> Option<&mut ForecastCurve> {
        self.curves.get_mut(&category)
    }

    /// Curve for a category, or a projection error if none is configured
    pub fn curve(&self, category: DebtCategory) -> Result<&ForecastCurve> {
        self.get(category)
            .ok_or_else(|| Error::Projection(format!("no forecast curve for {}", category)))
    }

    pub fn categories(&self) -> impl Iterator<Item = DebtCategory> + '_ {
        self.curves.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DebtCategory, &ForecastCurve)> {
        self.curves.iter().map(|(c, curve)| (*c, curve))
    }

    /// Earliest horizon across all curves
    pub fn horizon(&self) -> Option<NaiveDate> {
        self.curves.values().map(|c| c.horizon()).min()
    }

    pub fn save_scenario(&self, store: &mut dyn ScenarioStore, scenario: &str) -> Result<()> {
        for curve in self.curves.values() {
            curve.save(store, scenario)?;
        }
        log::info!("Saved scenario '{}' ({} curves)", scenario, self.curves.len());
        Ok(())
    }

    /// Load every curve from `scenario`. All or nothing: if any curve fails
    /// to load the set is left unchanged.
    pub fn load_scenario(&mut self, store: &dyn ScenarioStore, scenario: &str) -> Result<()> {
        let mut loaded = self.curves.clone();
        for curve in loaded.values_mut() {
            curve.load(store, scenario)?;
        }
        self.curves = loaded;
        log::info!("Loaded scenario '{}' ({} curves)", scenario, self.curves.len());
        Ok(())
    }
}

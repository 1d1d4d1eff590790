//! User-editable forecast curve over a sparse set of control points

use super::spline::Interpolant;
use super::store::ScenarioStore;
use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A (date, value) anchor of a forecast curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ControlPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Forecast curve for one variable (e.g. the average rate on T-Bills).
///
/// The earliest point is "today" and is pinned: it cannot be moved and no
/// point may be added at or before it. Points are kept in insertion order;
/// [`ForecastCurve::ordered_points`] gives the time-sorted view used for
/// fitting. Every mutation refits, so the interpolant is never stale.
#[derive(Debug, Clone)]
pub struct ForecastCurve {
    name: String,
    points: Vec<ControlPoint>,
    fit: Option<Interpolant>,
}

impl ForecastCurve {
    /// New curve with a single pinned seed point
    pub fn create(name: impl Into<String>, seed_date: NaiveDate, seed_value: f64) -> Self {
        Self {
            name: name.into(),
            points: vec![ControlPoint::new(seed_date, seed_value)],
            fit: None,
        }
    }

    /// Variable name used as the persistence key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points sorted ascending by date
    pub fn ordered_points(&self) -> Vec<ControlPoint> {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Date of the pinned first point
    pub fn start(&self) -> NaiveDate {
        self.points.iter().map(|p| p.date).min().unwrap_or(NaiveDate::MIN)
    }

    /// Latest control point date; the last date that may be sampled
    pub fn horizon(&self) -> NaiveDate {
        self.points.iter().map(|p| p.date).max().unwrap_or(NaiveDate::MIN)
    }

    pub fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    /// Append a future point. Ordering is derived from the date, not
    /// insertion order.
    pub fn add_point(&mut self, date: NaiveDate, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(self.reject(format!("value {} is not finite", value)));
        }
        let start = self.start();
        if date <= start {
            return Err(self.reject(format!(
                "{} is at or before the pinned first point {}",
                date, start
            )));
        }
        if self.points.iter().any(|p| p.date == date) {
            return Err(self.reject(format!("a control point already exists at {}", date)));
        }

        self.points.push(ControlPoint::new(date, value));
        self.refit()
    }

    /// Move the point at `index` of the ordered view.
    ///
    /// Index 0 is pinned. The new date must stay strictly between the
    /// time-sorted neighbours. On error the point set is unchanged.
    pub fn move_point(&mut self, index: usize, new_date: NaiveDate, new_value: f64) -> Result<()> {
        if index == 0 {
            return Err(self.reject("the first control point is pinned".to_string()));
        }
        let ordered = self.ordered_points();
        if index >= ordered.len() {
            return Err(self.reject(format!(
                "index {} out of range for {} points",
                index,
                ordered.len()
            )));
        }
        if !new_value.is_finite() {
            return Err(self.reject(format!("value {} is not finite", new_value)));
        }

        let prev = ordered[index - 1].date;
        if new_date <= prev {
            return Err(self.reject(format!(
                "{} would reach or cross the previous point at {}",
                new_date, prev
            )));
        }
        if let Some(next) = ordered.get(index + 1) {
            if new_date >= next.date {
                return Err(self.reject(format!(
                    "{} would reach or cross the next point at {}",
                    new_date, next.date
                )));
            }
        }

        let target = ordered[index].date;
        if let Some(point) = self.points.iter_mut().find(|p| p.date == target) {
            point.date = new_date;
            point.value = new_value;
        }
        self.refit()
    }

    /// Build the interpolant through [`Self::ordered_points`]
    pub fn fit(&mut self) -> Result<()> {
        self.fit = None;
        let ordered = self.ordered_points();
        if ordered.len() < 2 {
            return Err(Error::InsufficientPoints { have: ordered.len() });
        }

        let origin = ordered[0].date;
        let x = ordered.iter().map(|p| days_from(origin, p.date)).collect();
        let y = ordered.iter().map(|p| p.value).collect();

        self.fit = Some(Interpolant::fit(x, y)?);
        log::debug!("{}: refit through {} control points", self.name, ordered.len());
        Ok(())
    }

    /// Refit after a structural change; a single point leaves the curve unfitted
    fn refit(&mut self) -> Result<()> {
        if self.points.len() < 2 {
            self.fit = None;
            return Ok(());
        }
        self.fit()
    }

    /// Evaluate the curve at one date
    pub fn sample_at(&self, date: NaiveDate) -> Result<f64> {
        let fit = self
            .fit
            .as_ref()
            .ok_or(Error::InsufficientPoints { have: self.points.len() })?;

        let start = self.start();
        let horizon = self.horizon();
        if date > horizon {
            return Err(Error::CurveHorizon {
                requested: date,
                max: horizon,
            });
        }
        if date < start {
            return Err(Error::CurveStart {
                requested: date,
                min: start,
            });
        }

        Ok(fit.value(days_from(start, date)))
    }

    /// Evaluate the curve at every date; fails on the first out-of-range date
    pub fn sample(&self, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        dates.iter().map(|d| self.sample_at(*d)).collect()
    }

    /// Evenly spaced samples from the first point to the horizon (inclusive)
    pub fn sample_range(&self, step_days: i64) -> Result<Vec<ControlPoint>> {
        if step_days <= 0 {
            return Err(Error::CurveEdit(format!("step of {} days must be positive", step_days)));
        }
        let horizon = self.horizon();
        let mut out = Vec::new();
        let mut date = self.start();
        while date <= horizon {
            out.push(ControlPoint::new(date, self.sample_at(date)?));
            date += Duration::days(step_days);
        }
        Ok(out)
    }

    /// Persist the ordered point set under `scenario`
    pub fn save(&self, store: &mut dyn ScenarioStore, scenario: &str) -> Result<()> {
        store.save_points(scenario, &self.name, &self.ordered_points())
    }

    /// Replace the point set with the one saved under `scenario` and refit.
    /// The curve is untouched if the record is missing or malformed.
    pub fn load(&mut self, store: &dyn ScenarioStore, scenario: &str) -> Result<()> {
        let mut points = store.load_points(scenario, &self.name)?;
        points.sort_by_key(|p| p.date);

        let malformed = |reason: &str| Error::ScenarioIo {
            scenario: scenario.to_string(),
            variable: self.name.clone(),
            reason: reason.to_string(),
        };
        if points.is_empty() {
            return Err(malformed("no control points"));
        }
        if points.windows(2).any(|w| w[0].date == w[1].date) {
            return Err(malformed("duplicate control point dates"));
        }
        if points.iter().any(|p| !p.value.is_finite()) {
            return Err(malformed("non-finite control point value"));
        }

        self.points = points;
        self.refit()
    }

    fn reject(&self, reason: String) -> Error {
        log::warn!("{}: edit rejected: {}", self.name, reason);
        Error::CurveEdit(reason)
    }
}

fn days_from(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

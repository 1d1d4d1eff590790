//! Interpolants fitted through curve control points
//!
//! Two points give a straight line; three or more give a natural cubic
//! spline (zero second derivative at both ends). Range checks are the
//! caller's job: [`Interpolant::value`] assumes `x` lies within the knots.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Interpolant {
    Linear {
        x: Vec<f64>,
        y: Vec<f64>,
    },
    NaturalCubic {
        x: Vec<f64>,
        y: Vec<f64>,
        /// Second derivatives at each knot
        m: Vec<f64>,
    },
}

fn validate_xy(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::CurveEdit("x and y must have same length".to_string()));
    }
    if x.len() < 2 {
        return Err(Error::InsufficientPoints { have: x.len() });
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::CurveEdit("control point times must be strictly increasing".to_string()));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::CurveEdit("control points must be finite".to_string()));
    }
    Ok(())
}

/// Index of the segment containing `xq`, clamped to the last segment
fn segment(x: &[f64], xq: f64) -> usize {
    let idx = x.partition_point(|v| *v <= xq);
    idx.saturating_sub(1).min(x.len() - 2)
}

/// Second derivatives of the natural cubic spline (Thomas algorithm)
fn natural_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Interior unknowns m[1..n-1]: sub a, diag b, super c, rhs d
    let k = n - 2;
    let mut c_prime = vec![0.0; k];
    let mut d_prime = vec![0.0; k];

    for j in 0..k {
        let i = j + 1;
        let a = h[i - 1];
        let b = 2.0 * (h[i - 1] + h[i]);
        let c = h[i];
        let d = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);

        if j == 0 {
            c_prime[j] = c / b;
            d_prime[j] = d / b;
        } else {
            let denom = b - a * c_prime[j - 1];
            c_prime[j] = c / denom;
            d_prime[j] = (d - a * d_prime[j - 1]) / denom;
        }
    }

    for j in (0..k).rev() {
        let next = if j + 1 < k { m[j + 2] } else { 0.0 };
        m[j + 1] = d_prime[j] - c_prime[j] * next;
    }

    m
}

impl Interpolant {
    /// Fit through `(x, y)`; `x` must be strictly increasing
    pub fn fit(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        validate_xy(&x, &y)?;

        if x.len() == 2 {
            Ok(Interpolant::Linear { x, y })
        } else {
            let m = natural_second_derivatives(&x, &y);
            Ok(Interpolant::NaturalCubic { x, y, m })
        }
    }

    pub fn value(&self, xq: f64) -> f64 {
        match self {
            Interpolant::Linear { x, y } => {
                if let Ok(i) = x.binary_search_by(|v| v.total_cmp(&xq)) {
                    return y[i];
                }
                let i = segment(x, xq);
                let w = (xq - x[i]) / (x[i + 1] - x[i]);
                (1.0 - w) * y[i] + w * y[i + 1]
            }
            Interpolant::NaturalCubic { x, y, m } => {
                if let Ok(i) = x.binary_search_by(|v| v.total_cmp(&xq)) {
                    return y[i];
                }
                let i = segment(x, xq);
                let h = x[i + 1] - x[i];
                let left = x[i + 1] - xq;
                let right = xq - x[i];

                m[i] * left.powi(3) / (6.0 * h)
                    + m[i + 1] * right.powi(3) / (6.0 * h)
                    + (y[i] / h - m[i] * h / 6.0) * left
                    + (y[i + 1] / h - m[i + 1] * h / 6.0) * right
            }
        }
    }
}

//! # Curve Store
//!
//! A [`Curve`] is an immutable scalar function of span position rebuilt from a
//! monotonic sample set. Every pipeline stage hands its output downstream as a
//! curve, shared by `Arc`, and no consumer can mutate it.
//!
//! ## Interpolation
//!
//! - [`Interpolation::Linear`] - piecewise-linear, end segments continued
//!   beyond the sampled domain.
//! - [`Interpolation::Cubic`] - not-a-knot cubic spline (third derivative
//!   continuous at the second and second-to-last knots), end polynomial
//!   pieces continued beyond the sampled domain.
//!
//! Queries never fail; construction fails with [`WingBoxError::Domain`] when
//! the samples cannot support the requested mode.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::numerics::{Curve, Interpolation};
//!
//! let x = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let y: Vec<f64> = x.iter().map(|v| v * v).collect();
//! let curve = Curve::build(&x, &y, Interpolation::Cubic).unwrap();
//!
//! // A not-a-knot spline reproduces a quadratic exactly, inside and outside the samples
//! assert!((curve.at(2.5) - 6.25).abs() < 1e-12);
//! assert!((curve.at(5.0) - 25.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};

/// A continuous scalar function of span position `y` [m].
///
/// Implemented by [`Curve`], by the closed geometry formulas and by plain
/// closures, so stages can accept "a function of y" without caring where it
/// came from.
pub trait SpanFunction: Sync {
    /// Value at span position `y`
    fn at(&self, y: f64) -> f64;
}

impl<F> SpanFunction for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn at(&self, y: f64) -> f64 {
        self(y)
    }
}

/// Interpolation mode between samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Piecewise-linear (needs at least 2 samples)
    Linear,
    /// Not-a-knot cubic spline (needs at least 4 samples)
    #[default]
    Cubic,
}

impl Interpolation {
    /// Minimum number of samples the mode needs
    pub fn min_samples(&self) -> usize {
        match self {
            Interpolation::Linear => 2,
            Interpolation::Cubic => 4,
        }
    }
}

/// Raw sample form of a curve, used for (de)serialization.
///
/// ```json
/// { "mode": "cubic", "x": [0.0, 1.0, 2.0, 3.0], "y": [1.0, 0.9, 0.7, 0.4] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSamples {
    /// Interpolation mode
    #[serde(default)]
    pub mode: Interpolation,
    /// Strictly increasing abscissae
    pub x: Vec<f64>,
    /// Values at each abscissa
    pub y: Vec<f64>,
}

/// Immutable interpolated function of one variable.
///
/// On interval `i` the curve is
/// `y_i + b_i·dx + c_i·dx² + d_i·dx³` with `dx = x - x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveSamples", into = "CurveSamples")]
pub struct Curve {
    mode: Interpolation,
    x: Vec<f64>,
    y: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl Curve {
    /// Build a curve through `(x_samples[i], y_samples[i])`.
    ///
    /// # Errors
    ///
    /// [`WingBoxError::Domain`] when the lengths differ, there are fewer
    /// samples than the mode needs, a sample is non-finite, or the abscissae
    /// are not strictly increasing.
    pub fn build(x_samples: &[f64], y_samples: &[f64], mode: Interpolation) -> WingBoxResult<Curve> {
        if x_samples.len() != y_samples.len() {
            return Err(WingBoxError::domain(format!(
                "sample length mismatch: {} abscissae, {} values",
                x_samples.len(),
                y_samples.len()
            )));
        }
        if x_samples.len() < mode.min_samples() {
            return Err(WingBoxError::domain(format!(
                "{:?} interpolation needs at least {} samples, got {}",
                mode,
                mode.min_samples(),
                x_samples.len()
            )));
        }
        if let Some(bad) = x_samples
            .iter()
            .chain(y_samples.iter())
            .find(|v| !v.is_finite())
        {
            return Err(WingBoxError::domain(format!("non-finite sample value {bad}")));
        }
        if let Some(w) = x_samples.windows(2).find(|w| w[1] <= w[0]) {
            return Err(WingBoxError::domain(format!(
                "abscissae must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }

        let x = x_samples.to_vec();
        let y = y_samples.to_vec();
        let (b, c, d) = match mode {
            Interpolation::Linear => linear_coefficients(&x, &y),
            Interpolation::Cubic => not_a_knot_coefficients(&x, &y),
        };

        Ok(Curve { mode, x, y, b, c, d })
    }

    /// Shorthand for a piecewise-linear curve
    pub fn linear(x_samples: &[f64], y_samples: &[f64]) -> WingBoxResult<Curve> {
        Curve::build(x_samples, y_samples, Interpolation::Linear)
    }

    /// Shorthand for a not-a-knot cubic curve
    pub fn cubic(x_samples: &[f64], y_samples: &[f64]) -> WingBoxResult<Curve> {
        Curve::build(x_samples, y_samples, Interpolation::Cubic)
    }

    /// A constant function sampled at two points
    pub fn constant(value: f64, start: f64, end: f64) -> WingBoxResult<Curve> {
        Curve::linear(&[start, end], &[value, value])
    }

    /// Evaluate at `y`; positions outside the samples are extrapolated
    pub fn at(&self, y: f64) -> f64 {
        let i = self.interval(y);
        let dx = y - self.x[i];
        self.y[i] + dx * (self.b[i] + dx * (self.c[i] + dx * self.d[i]))
    }

    /// Interpolation mode
    pub fn mode(&self) -> Interpolation {
        self.mode
    }

    /// Sample abscissae
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Sample values
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false; a built curve has at least two samples
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// First and last sample abscissa
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Value at the last sample
    pub fn last_value(&self) -> f64 {
        self.y[self.y.len() - 1]
    }

    /// Sample with the largest magnitude, as `(x, value)`
    pub fn peak_magnitude(&self) -> (f64, f64) {
        let mut best = (self.x[0], self.y[0]);
        for (&x, &v) in self.x.iter().zip(&self.y) {
            if v.abs() > best.1.abs() {
                best = (x, v);
            }
        }
        best
    }

    /// Knots strictly inside `(a, b)`.
    ///
    /// For linear curves these are the slope discontinuities an integrator
    /// should split at.
    pub fn knots_within(&self, a: f64, b: f64) -> Vec<f64> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.x.iter().copied().filter(|&k| k > lo && k < hi).collect()
    }

    /// Sample pairs `(x, value)`
    pub fn samples(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }

    fn interval(&self, y: f64) -> usize {
        let last = self.x.len() - 2;
        let idx = self.x.partition_point(|&k| k <= y);
        idx.saturating_sub(1).min(last)
    }
}

impl SpanFunction for Curve {
    fn at(&self, y: f64) -> f64 {
        Curve::at(self, y)
    }
}

impl TryFrom<CurveSamples> for Curve {
    type Error = WingBoxError;

    fn try_from(samples: CurveSamples) -> Result<Self, Self::Error> {
        Curve::build(&samples.x, &samples.y, samples.mode)
    }
}

impl From<Curve> for CurveSamples {
    fn from(curve: Curve) -> Self {
        CurveSamples {
            mode: curve.mode,
            x: curve.x,
            y: curve.y,
        }
    }
}

fn linear_coefficients(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let b = (0..n).map(|i| (y[i + 1] - y[i]) / (x[i + 1] - x[i])).collect();
    (b, vec![0.0; n], vec![0.0; n])
}

/// Cubic coefficients from the second derivatives `m` at the knots.
///
/// Not-a-knot closes the system with `d_0 = d_1` and `d_{n-3} = d_{n-2}`.
/// Eliminating `m_0` and `m_{n-1}` with those two conditions leaves a
/// tridiagonal system in `m_1 .. m_{n-2}`.
fn not_a_knot_coefficients(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    // Unknowns m_1 ..= m_{n-2}; row k corresponds to knot k + 1
    let size = n - 2;
    let mut lower = vec![0.0; size];
    let mut diag = vec![0.0; size];
    let mut upper = vec![0.0; size];
    let mut rhs = vec![0.0; size];

    for k in 0..size {
        let i = k + 1;
        lower[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        upper[k] = h[i];
        rhs[k] = 6.0 * (slope[i] - slope[i - 1]);
    }

    // m_0 = ((h0 + h1) m_1 - h0 m_2) / h1
    let (h0, h1) = (h[0], h[1]);
    diag[0] += h0 * (h0 + h1) / h1;
    upper[0] -= h0 * h0 / h1;
    lower[0] = 0.0;

    // m_{n-1} = ((ha + hb) m_{n-2} - hb m_{n-3}) / ha
    let (ha, hb) = (h[n - 3], h[n - 2]);
    let last = size - 1;
    diag[last] += hb * (ha + hb) / ha;
    lower[last] -= hb * hb / ha;
    upper[last] = 0.0;

    let inner = solve_tridiagonal(&lower, &diag, &upper, &rhs);

    let mut m = vec![0.0; n];
    m[1..n - 1].copy_from_slice(&inner);
    m[0] = ((h0 + h1) * m[1] - h0 * m[2]) / h1;
    m[n - 1] = ((ha + hb) * m[n - 2] - hb * m[n - 3]) / ha;

    let mut b = Vec::with_capacity(n - 1);
    let mut c = Vec::with_capacity(n - 1);
    let mut d = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        b.push(slope[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
        c.push(m[i] / 2.0);
        d.push((m[i + 1] - m[i]) / (6.0 * h[i]));
    }
    (b, c, d)
}

/// Thomas algorithm. `lower[0]` and `upper[last]` are ignored.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - lower[i] * c_prime[i - 1];
        c_prime[i] = if i + 1 < n { upper[i] / denom } else { 0.0 };
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d_prime[i] - c_prime[i] * out[i + 1];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolates_and_extrapolates() {
        let curve = Curve::linear(&[0.0, 1.0, 3.0], &[0.0, 2.0, 4.0]).unwrap();
        assert_relative_eq!(curve.at(0.5), 1.0);
        assert_relative_eq!(curve.at(2.0), 3.0);
        // End segments continue with their own slope
        assert_relative_eq!(curve.at(-1.0), -2.0);
        assert_relative_eq!(curve.at(5.0), 6.0);
    }

    #[test]
    fn test_cubic_reproduces_cubic_polynomial() {
        let f = |x: f64| 0.5 * x.powi(3) - 2.0 * x * x + x - 3.0;
        let xs: Vec<f64> = (0..9).map(|i| i as f64 * 0.75).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let curve = Curve::cubic(&xs, &ys).unwrap();

        for probe in [0.1, 1.3, 2.9, 5.2, 6.0] {
            assert_relative_eq!(curve.at(probe), f(probe), epsilon = 1e-9);
        }
        // Extrapolation keeps the end pieces
        assert_relative_eq!(curve.at(-0.5), f(-0.5), epsilon = 1e-9);
        assert_relative_eq!(curve.at(7.5), f(7.5), epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_with_four_points_is_single_cubic() {
        let f = |x: f64| x.powi(3) - x;
        let xs = [0.0, 0.4, 1.5, 2.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let curve = Curve::cubic(&xs, &ys).unwrap();
        assert_relative_eq!(curve.at(1.0), f(1.0), epsilon = 1e-10);
    }

    #[test]
    fn test_cubic_passes_through_samples() {
        let xs = [0.0, 0.5, 1.5, 2.0, 3.5, 4.0];
        let ys = [1.0, -0.3, 2.2, 0.0, 5.0, 4.1];
        let curve = Curve::cubic(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(curve.at(*x), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            Curve::linear(&[1.0], &[1.0]),
            Err(WingBoxError::Domain { .. })
        ));
        assert!(matches!(
            Curve::cubic(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]),
            Err(WingBoxError::Domain { .. })
        ));
    }

    #[test]
    fn test_rejects_unsorted_and_nan() {
        assert!(Curve::linear(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
        assert!(Curve::linear(&[0.0, 1.0], &[0.0, f64::NAN]).is_err());
        assert!(Curve::linear(&[0.0, 1.0], &[0.0]).is_err());
    }

    #[test]
    fn test_peak_magnitude_and_knots() {
        let curve = Curve::linear(&[0.0, 1.0, 2.0, 3.0], &[1.0, -4.0, 3.0, 0.0]).unwrap();
        assert_eq!(curve.peak_magnitude(), (1.0, -4.0));
        assert_eq!(curve.knots_within(0.5, 3.0), vec![1.0, 2.0]);
        assert_eq!(curve.last_value(), 0.0);
    }

    #[test]
    fn test_serde_rebuilds_curve() {
        let json = r#"{"mode":"linear","x":[0.0,2.0],"y":[1.0,3.0]}"#;
        let curve: Curve = serde_json::from_str(json).unwrap();
        assert_relative_eq!(curve.at(1.0), 2.0);

        let bad = r#"{"mode":"cubic","x":[0.0,2.0],"y":[1.0,3.0]}"#;
        assert!(serde_json::from_str::<Curve>(bad).is_err());
    }

    #[test]
    fn test_closure_is_span_function() {
        fn eval(f: &dyn SpanFunction, y: f64) -> f64 {
            f.at(y)
        }
        assert_eq!(eval(&|y: f64| 2.0 * y, 3.0), 6.0);
    }
}

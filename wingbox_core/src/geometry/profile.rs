//! # Spanwise Geometry Functions
//!
//! Box width and height as closed-form functions of span position. These
//! replace free-form expression strings: every variant is a fixed formula with
//! named parameters, serializable with a `"kind"` discriminator.
//!
//! ```json
//! { "kind": "linear", "y0": 0.0, "v0": 1.2, "y1": 15.0, "v1": 0.45 }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};
use crate::numerics::{Curve, SpanFunction};

/// A scalar function of span position `y` [m]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryFunction {
    /// Same value everywhere
    Constant { value: f64 },
    /// Straight taper through `(y0, v0)` and `(y1, v1)`, continued beyond them
    Linear { y0: f64, v0: f64, y1: f64, v1: f64 },
    /// `c0 + c1·y + c2·y² + ...`
    Polynomial { coefficients: Vec<f64> },
    /// Interpolated from samples
    Sampled { curve: Curve },
}

impl GeometryFunction {
    /// Constant function
    pub fn constant(value: f64) -> Self {
        GeometryFunction::Constant { value }
    }

    /// Linear taper from `root` at `y0` to `tip` at `y1`
    pub fn taper(y0: f64, root: f64, y1: f64, tip: f64) -> Self {
        GeometryFunction::Linear {
            y0,
            v0: root,
            y1,
            v1: tip,
        }
    }

    /// Value at `y`
    pub fn value(&self, y: f64) -> f64 {
        match self {
            GeometryFunction::Constant { value } => *value,
            GeometryFunction::Linear { y0, v0, y1, v1 } => v0 + (v1 - v0) * (y - y0) / (y1 - y0),
            // Horner
            GeometryFunction::Polynomial { coefficients } => {
                coefficients.iter().rev().fold(0.0, |acc, c| acc * y + c)
            }
            GeometryFunction::Sampled { curve } => curve.at(y),
        }
    }

    /// Check the function is well formed and strictly positive over `[start, end]`.
    ///
    /// Positivity is checked at both ends and at 64 interior points.
    pub fn validate_positive(&self, field: &str, start: f64, end: f64) -> WingBoxResult<()> {
        match self {
            GeometryFunction::Linear { y0, y1, .. } if y0 == y1 => {
                return Err(WingBoxError::invalid_input(
                    field,
                    format!("y0 = y1 = {y0}"),
                    "Linear taper needs two distinct stations",
                ));
            }
            GeometryFunction::Polynomial { coefficients } if coefficients.is_empty() => {
                return Err(WingBoxError::invalid_input(field, "[]", "Polynomial needs at least one coefficient"));
            }
            _ => {}
        }

        const PROBES: usize = 64;
        for i in 0..=PROBES {
            let y = start + (end - start) * i as f64 / PROBES as f64;
            let v = self.value(y);
            if !(v.is_finite() && v > 0.0) {
                return Err(WingBoxError::invalid_input(
                    field,
                    v.to_string(),
                    format!("Must be positive over the wing box (fails at y = {y:.3} m)"),
                ));
            }
        }
        Ok(())
    }
}

impl SpanFunction for GeometryFunction {
    fn at(&self, y: f64) -> f64 {
        self.value(y)
    }
}

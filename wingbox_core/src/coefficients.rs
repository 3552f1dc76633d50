//! # Plate Buckling Coefficients
//!
//! Buckling coefficients as functions of plate aspect ratio a/b, read from
//! design charts:
//!
//! - `ks_clamped` / `ks_hinged` - flat plate in shear, edges clamped or simply supported
//! - `kc_b` - compression, one unloaded edge clamped (skin plate against a spar)
//! - `kc_c` - compression, unloaded edges simply supported (skin plate between stringers)
//!
//! Each table is a cubic curve through its chart samples. Lookups outside the
//! tabulated ratios return the value at the nearest end; the charts flatten
//! to their asymptote there and a cubic end piece would not.
//!
//! ## References
//!
//! - Bruhn, Analysis and Design of Flight Vehicle Structures, Fig. C5.2 and C5.11
//! - Megson, Aircraft Structures for Engineering Students, §9.3

use serde::{Deserialize, Serialize};

use crate::errors::WingBoxResult;
use crate::numerics::{Curve, Interpolation};

/// One coefficient chart: k as a function of aspect ratio a/b
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    curve: Curve,
}

impl CoefficientTable {
    /// Build a table from chart samples (cubic through the points)
    pub fn new(ratios: &[f64], values: &[f64]) -> WingBoxResult<Self> {
        Ok(CoefficientTable {
            curve: Curve::build(ratios, values, Interpolation::Cubic)?,
        })
    }

    /// Wrap an existing curve
    pub fn from_curve(curve: Curve) -> Self {
        CoefficientTable { curve }
    }

    /// Coefficient at aspect ratio `ratio`, held constant beyond the chart
    pub fn lookup(&self, ratio: f64) -> f64 {
        let (lo, hi) = self.curve.domain();
        self.curve.at(ratio.clamp(lo, hi))
    }

    /// Underlying curve
    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

/// The four coefficient charts used by the failure checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucklingTables {
    pub ks_clamped: CoefficientTable,
    pub ks_hinged: CoefficientTable,
    pub kc_b: CoefficientTable,
    pub kc_c: CoefficientTable,
}

const KS_RATIOS: [f64; 8] = [1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0];
const KS_CLAMPED: [f64; 8] = [14.71, 11.50, 10.34, 9.80, 9.60, 9.25, 9.10, 8.98];
// 5.35 + 4/(a/b)²
const KS_HINGED: [f64; 8] = [9.35, 7.13, 6.35, 5.99, 5.79, 5.60, 5.51, 5.39];

const KC_RATIOS: [f64; 8] = [0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0];
const KC_B: [f64; 8] = [8.00, 6.10, 5.60, 5.45, 5.42, 5.41, 5.41, 5.41];
const KC_C: [f64; 8] = [6.25, 4.69, 4.00, 4.00, 4.00, 4.00, 4.00, 4.00];

impl BucklingTables {
    /// Bundled chart values
    pub fn standard() -> Self {
        // The bundled samples are strictly increasing and finite
        let table = |x: &[f64], y: &[f64]| {
            CoefficientTable::new(x, y).unwrap_or_else(|_| unreachable!("bundled coefficient table is valid"))
        };
        BucklingTables {
            ks_clamped: table(&KS_RATIOS, &KS_CLAMPED),
            ks_hinged: table(&KS_RATIOS, &KS_HINGED),
            kc_b: table(&KC_RATIOS, &KC_B),
            kc_c: table(&KC_RATIOS, &KC_C),
        }
    }
}

impl Default for BucklingTables {
    fn default() -> Self {
        BucklingTables::standard()
    }
}

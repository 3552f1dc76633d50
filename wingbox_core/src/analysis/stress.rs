//! Skin panel bending stress and the yield check.
//!
//! The outer skin fibres sit at ±h/2; the neutral axis is at z̄ above mid-height:
//!
//! ```text
//! σ_top    = −M·(h/2 − z̄)/Ixx
//! σ_bottom =  M·(h/2 + z̄)/Ixx
//! ```
//!
//! A positive moment compresses the top skin.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::equations::buckling::bending_stress;
use crate::errors::WingBoxResult;
use crate::geometry::{Surface, WingBox};
use crate::numerics::Curve;

/// Outer-fibre stress at `y` on `surface` [Pa]
pub fn panel_stress_at(wing_box: &WingBox, moment: &Curve, surface: Surface, y: f64) -> WingBoxResult<f64> {
    let half = wing_box.height(y) / 2.0;
    let zc = wing_box.centroid_z(y)?;
    let ixx = wing_box.moi_xx(y)?;
    let m = moment.at(y);
    Ok(match surface {
        Surface::Top => bending_stress(-m, half - zc, ixx),
        Surface::Bottom => bending_stress(m, half + zc, ixx),
    })
}

/// Stress curves of both skins
#[derive(Debug, Clone)]
pub struct PanelStress {
    pub top: Arc<Curve>,
    pub bottom: Arc<Curve>,
}

impl PanelStress {
    pub fn surface(&self, surface: Surface) -> &Curve {
        match surface {
            Surface::Top => &self.top,
            Surface::Bottom => &self.bottom,
        }
    }
}

/// Governing sampled stress of one skin against yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldCheck {
    pub surface: Surface,
    /// Span position of the peak [m]
    pub peak_y: f64,
    /// Largest-magnitude sampled stress (signed) [Pa]
    pub peak_stress: f64,
    pub yield_stress: f64,
    /// yield / |peak|, `f64::MAX` for an unloaded skin
    pub margin: f64,
    pub passed: bool,
}

impl YieldCheck {
    /// Check the sampled values of `stress` against `yield_stress`
    pub fn evaluate(surface: Surface, stress: &Curve, yield_stress: f64) -> Self {
        let (peak_y, peak_stress) = stress.peak_magnitude();
        let passed = peak_stress.abs() <= yield_stress;
        let margin = if peak_stress == 0.0 {
            f64::MAX
        } else {
            yield_stress / peak_stress.abs()
        };
        if passed {
            log::info!(
                "{} panel: peak stress {:.1} MPa at y = {:.2} m (yield {:.1} MPa) [OK]",
                surface,
                peak_stress / 1e6,
                peak_y,
                yield_stress / 1e6
            );
        } else {
            log::warn!(
                "{} panel: peak stress {:.1} MPa at y = {:.2} m exceeds yield {:.1} MPa [FAIL]",
                surface,
                peak_stress / 1e6,
                peak_y,
                yield_stress / 1e6
            );
        }
        YieldCheck {
            surface,
            peak_y,
            peak_stress,
            yield_stress,
            margin,
            passed,
        }
    }
}

//! Bending rotation, deflection and twist, integrated from the root outward,
//! and their checks against the stiffness limits.
//!
//! ```text
//! θ(y) = (1/E)·∫₀ʸ M/Ixx        δ(y) = ∫₀ʸ θ        φ(y) = (1/G)·∫₀ʸ T/J
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::WingBoxResult;
use crate::geometry::InertiaCurves;
use crate::numerics::{integrate, Curve};

use super::StageContext;

/// Bending slope at `y` [rad]
pub fn rotation_at(ctx: &StageContext<'_>, moment: &Curve, inertia: &InertiaCurves, y: f64) -> WingBoxResult<f64> {
    let curvature = integrate(
        |x| Ok(moment.at(x) / inertia.moi_xx.at(x)),
        0.0,
        y,
        &ctx.settings.stiff_quadrature,
    )?;
    Ok(curvature / ctx.wing_box().material().e_modulus)
}

/// Vertical deflection at `y` [m]
pub fn deflection_at(ctx: &StageContext<'_>, rotation: &Curve, y: f64) -> WingBoxResult<f64> {
    integrate(|x| Ok(rotation.at(x)), 0.0, y, &ctx.settings.stiff_quadrature)
}

/// Twist at `y` [rad]
pub fn twist_at(ctx: &StageContext<'_>, torsion: &Curve, inertia: &InertiaCurves, y: f64) -> WingBoxResult<f64> {
    let rate = integrate(
        |x| Ok(torsion.at(x) / inertia.moi_polar.at(x)),
        0.0,
        y,
        &ctx.settings.stiff_quadrature,
    )?;
    Ok(rate / ctx.wing_box().material().shear_modulus)
}

/// Tip value of a stiffness quantity against its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffnessCheck {
    /// Tip station [m]
    pub tip_y: f64,
    /// Raw tip value (m for deflection, rad for twist)
    pub tip_value: f64,
    /// Tip value in the unit of the limit (% of span, degrees)
    pub measure: f64,
    pub limit: f64,
    pub passed: bool,
}

/// Tip deflection as a percentage of the full span `2·end_y`
pub fn deflection_check(deflection: &Curve, end_y: f64, limit_percent: f64) -> StiffnessCheck {
    let tip_value = deflection.at(end_y);
    let measure = tip_value.abs() / (2.0 * end_y) * 100.0;
    let check = StiffnessCheck {
        tip_y: end_y,
        tip_value,
        measure,
        limit: limit_percent,
        passed: measure <= limit_percent,
    };
    if check.passed {
        log::info!("Tip deflection {:.2} % of span (limit {:.1} %) [OK]", measure, limit_percent);
    } else {
        log::warn!("Tip deflection {:.2} % of span exceeds the {:.1} % limit [FAIL]", measure, limit_percent);
    }
    check
}

/// Tip twist in degrees
pub fn twist_check(twist: &Curve, end_y: f64, limit_deg: f64) -> StiffnessCheck {
    let tip_value = twist.at(end_y);
    let measure = tip_value.abs().to_degrees();
    let check = StiffnessCheck {
        tip_y: end_y,
        tip_value,
        measure,
        limit: limit_deg,
        passed: measure <= limit_deg,
    };
    if check.passed {
        log::info!("Tip twist {:.2} deg (limit {:.1} deg) [OK]", measure, limit_deg);
    } else {
        log::warn!("Tip twist {:.2} deg exceeds the {:.1} deg limit [FAIL]", measure, limit_deg);
    }
    check
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::test_support::StageFixture;
    use crate::analysis::Analysis;
    use approx::assert_relative_eq;

    fn constant_inertia(ixx: f64, j: f64) -> InertiaCurves {
        InertiaCurves {
            moi_xx: Arc::new(Curve::constant(ixx, 0.0, 10.0).unwrap()),
            moi_polar: Arc::new(Curve::constant(j, 0.0, 10.0).unwrap()),
        }
    }

    #[test]
    fn test_constant_moment_round_trip() {
        // θ = M·y/(E·I), δ = M·y²/(2·E·I)
        let fixture = StageFixture::weightless(0.0);
        let ctx = fixture.context();
        let (m, ixx) = (2.0e5, 3.0e-4);
        let e = ctx.wing_box().material().e_modulus;
        let moment = Curve::constant(m, 0.0, 10.0).unwrap();
        let inertia = constant_inertia(ixx, 1.0);

        let ys: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let theta: Vec<f64> = ys.iter().map(|&y| rotation_at(&ctx, &moment, &inertia, y).unwrap()).collect();
        for (&y, &t) in ys.iter().zip(&theta) {
            assert_relative_eq!(t, m * y / (e * ixx), max_relative = 1e-9, epsilon = 1e-15);
        }

        let rotation = Curve::cubic(&ys, &theta).unwrap();
        let delta = deflection_at(&ctx, &rotation, 10.0).unwrap();
        assert_relative_eq!(delta, m * 100.0 / (2.0 * e * ixx), max_relative = 1e-6);
    }

    #[test]
    fn test_integrals_start_at_wing_root_for_outboard_box() {
        // Box over [2, 10]: the integrals still run from y = 0
        let fixture = StageFixture::outboard_box(2.0);
        let ctx = fixture.context();
        let material = ctx.wing_box().material();
        let (m, t) = (2.0e5, -4.0e4);
        let inertia = constant_inertia(3.0e-4, 2.0e-4);
        let moment = Curve::constant(m, 0.0, 10.0).unwrap();
        let torsion = Curve::constant(t, 0.0, 10.0).unwrap();

        let theta = rotation_at(&ctx, &moment, &inertia, 2.0).unwrap();
        assert_relative_eq!(theta, m * 2.0 / (material.e_modulus * 3.0e-4), max_relative = 1e-9);
        let phi = twist_at(&ctx, &torsion, &inertia, 2.0).unwrap();
        assert_relative_eq!(phi, t * 2.0 / (material.shear_modulus * 2.0e-4), max_relative = 1e-9);
        let rotation = Curve::constant(1.0e-3, 0.0, 10.0).unwrap();
        assert_relative_eq!(deflection_at(&ctx, &rotation, 2.0).unwrap(), 2.0e-3, max_relative = 1e-9);

        // Through the pipeline the box start already carries root rotation
        let analysis = Analysis::new(&fixture.load_case, &fixture.settings, &fixture.tables).unwrap();
        let rotation = analysis.rotation().unwrap();
        assert!(rotation.at(2.0) > 0.0);
        assert!(analysis.deflection().unwrap().at(2.0) > 0.0);
    }

    #[test]
    fn test_twist_constant_torque() {
        let fixture = StageFixture::weightless(0.0);
        let ctx = fixture.context();
        let g = ctx.wing_box().material().shear_modulus;
        let torsion = Curve::constant(-4.0e4, 0.0, 10.0).unwrap();
        let inertia = constant_inertia(1.0, 2.0e-4);
        let phi = twist_at(&ctx, &torsion, &inertia, 5.0).unwrap();
        assert_relative_eq!(phi, -4.0e4 * 5.0 / (g * 2.0e-4), max_relative = 1e-9);
    }

    #[test]
    fn test_deflection_limit_percent_of_full_span() {
        // 1.5 m at the tip of a 10 m semi-span is 7.5 % of the 20 m span
        let d = Curve::linear(&[0.0, 10.0], &[0.0, 1.5]).unwrap();
        let check = deflection_check(&d, 10.0, 15.0);
        assert_relative_eq!(check.measure, 7.5, epsilon = 1e-12);
        assert!(check.passed);
        assert!(!deflection_check(&d, 10.0, 5.0).passed);
    }

    #[test]
    fn test_twist_limit_in_degrees() {
        let t = Curve::linear(&[0.0, 10.0], &[0.0, -0.2]).unwrap();
        let check = twist_check(&t, 10.0, 10.0);
        assert_relative_eq!(check.measure, 0.2f64.to_degrees(), epsilon = 1e-12);
        assert!(!check.passed);
    }
}

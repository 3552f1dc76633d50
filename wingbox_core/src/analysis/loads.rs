//! Internal loads: shear, bending moment and torsion.
//!
//! All three are reaction quantities, integrated from the station outboard to
//! the box tip:
//!
//! ```text
//! V(y) = ∫ᵧᵉ lift − ρ_f·g·∫ᵧᵉ A_fuel − g·ρ·∫ᵧᵉ (A_material + c_s·chord) − W_engine·[y ≤ y_e]
//! M(y) = ∫ᵧᵉ V
//! T(y) = ∫ᵧᵉ lift·(xcp − x_f·chord) + (F_t·z_e + W_engine·x_e)·[y ≤ y_e]
//! ```

use crate::case::TorsionModel;
use crate::errors::WingBoxResult;
use crate::loads::LoadCase;
use crate::numerics::{integrate_with_breakpoints, Curve};

use super::StageContext;

/// Known discontinuities strictly inside the box range, sorted.
///
/// Section boundaries, tank ends, the engine station and the knots of a
/// piecewise-linear chord.
pub fn breakpoints(load_case: &LoadCase) -> Vec<f64> {
    let wing = load_case.wing();
    let wing_box = wing.wing_box();
    let (start, end) = (wing_box.start_y(), wing_box.end_y());

    let mut points = wing_box.section_boundaries();
    if let Some(tank) = wing.fuel_tank() {
        points.extend([tank.start_y, tank.end_y]);
    }
    if let Some(engine) = wing.engine() {
        points.push(engine.y);
    }
    points.extend(wing.chord_breakpoints(start, end));
    points.retain(|&p| p > start && p < end);
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

/// Lift per unit span at `y` [N/m]
pub fn lift_at(ctx: &StageContext<'_>, y: f64) -> f64 {
    ctx.wing().lift(y, ctx.dynamic_pressure())
}

/// Weight per unit span of the box structure at `y` [N/m]
fn structure_weight_density(ctx: &StageContext<'_>, y: f64) -> WingBoxResult<f64> {
    let wing = ctx.wing();
    let wing_box = ctx.wing_box();
    let area = wing_box.material_area(y)? + ctx.settings.structure_allowance * wing.chord(y);
    Ok(ctx.settings.gravity * wing_box.material().density * area)
}

/// Structure weight outboard of `y` [N]
fn structure_weight_from(ctx: &StageContext<'_>, y: f64) -> WingBoxResult<f64> {
    integrate_with_breakpoints(
        |x| structure_weight_density(ctx, x),
        y,
        ctx.end_y(),
        ctx.breakpoints,
        &ctx.settings.quadrature,
    )
}

/// Weight of the whole box structure including the skin/rib allowance [N]
pub fn structure_weight(ctx: &StageContext<'_>) -> WingBoxResult<f64> {
    structure_weight_from(ctx, ctx.wing_box().start_y())
}

/// Fuel weight outboard of `y` [N]
fn fuel_weight_from(ctx: &StageContext<'_>, y: f64) -> WingBoxResult<f64> {
    let Some(tank) = ctx.wing().fuel_tank() else {
        return Ok(0.0);
    };
    let (a, b) = (y.max(tank.start_y), tank.end_y.min(ctx.end_y()));
    if b <= a {
        return Ok(0.0);
    }
    let wing_box = ctx.wing_box();
    let volume = integrate_with_breakpoints(
        |x| tank.cross_section(x, wing_box),
        a,
        b,
        ctx.breakpoints,
        &ctx.settings.quadrature,
    )?;
    Ok(tank.density * ctx.settings.gravity * volume)
}

/// Shear force at `y` [N]
pub fn shear_at(ctx: &StageContext<'_>, y: f64) -> WingBoxResult<f64> {
    let lift = integrate_with_breakpoints(
        |x| Ok(lift_at(ctx, x)),
        y,
        ctx.end_y(),
        ctx.breakpoints,
        &ctx.settings.quadrature,
    )?;
    let fuel = fuel_weight_from(ctx, y)?;
    let structure = structure_weight_from(ctx, y)?;
    let engine = ctx.wing().engine().map_or(0.0, |e| e.shear_step(y));
    Ok(lift - fuel - structure - engine)
}

/// Bending moment at `y` from the shear curve [Nm]
pub fn moment_at(ctx: &StageContext<'_>, shear: &Curve, y: f64) -> WingBoxResult<f64> {
    integrate_with_breakpoints(
        |x| Ok(shear.at(x)),
        y,
        ctx.end_y(),
        ctx.breakpoints,
        &ctx.settings.quadrature,
    )
}

/// Torsion about the flexural axis per unit span at `y` [Nm/m]
fn torque_density(ctx: &StageContext<'_>, y: f64) -> f64 {
    let wing = ctx.wing();
    match ctx.settings.torsion_model {
        TorsionModel::CenterOfPressure => {
            lift_at(ctx, y) * (wing.xcp(y) - ctx.settings.flexural_axis * wing.chord(y))
        }
        TorsionModel::PitchingMoment => wing.pitching_moment(y, ctx.dynamic_pressure()),
    }
}

/// Torque at `y` [Nm]
pub fn torsion_at(ctx: &StageContext<'_>, y: f64) -> WingBoxResult<f64> {
    let distributed = integrate_with_breakpoints(
        |x| Ok(torque_density(ctx, x)),
        y,
        ctx.end_y(),
        ctx.breakpoints,
        &ctx.settings.quadrature,
    )?;
    let engine = ctx.wing().engine().map_or(0.0, |e| e.torque_step(y));
    Ok(distributed + engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{uniform_case, StageFixture};
    use crate::loads::{Engine, FuelTank};

    #[test]
    fn test_breakpoints_sorted_inside_range() {
        let case = uniform_case(
            |spec| {
                spec.engine = Some(Engine {
                    x: 0.0,
                    y: 3.0,
                    z: 0.0,
                    thrust: 0.0,
                    weight: 0.0,
                });
                spec.fuel_tank = Some(FuelTank::new(0.0, 5.0));
            },
            1.0,
        );
        let points = breakpoints(&case);
        // box is 0..10 with a section boundary at 5
        assert_eq!(points, vec![3.0, 5.0]);
    }

    #[test]
    fn test_uniform_lift_shear_at_root() {
        let fixture = StageFixture::weightless(1000.0);
        let ctx = fixture.context();
        // V(0) = L·S with L = 1000 N/m over 10 m
        let v = shear_at(&ctx, 0.0).unwrap();
        assert!((v - 10_000.0).abs() < 1e-6, "V(0) = {v}");
        let v = shear_at(&ctx, 4.0).unwrap();
        assert!((v - 6_000.0).abs() < 1e-6, "V(4) = {v}");
    }

    #[test]
    fn test_engine_step_in_shear() {
        let fixture = StageFixture::with(1000.0, |spec| {
            spec.engine = Some(Engine {
                x: 0.0,
                y: 3.0,
                z: 0.0,
                thrust: 0.0,
                weight: 2500.0,
            });
        });
        let ctx = fixture.context();
        let inboard = shear_at(&ctx, 3.0).unwrap();
        let outboard = shear_at(&ctx, 3.0 + 1e-9).unwrap();
        assert!((outboard - inboard - 2500.0).abs() < 1e-3);
    }

    #[test]
    fn test_fuel_reduces_shear_inside_tank_only() {
        let dry = StageFixture::weightless(1000.0);
        let wet = StageFixture::weightless_with(1000.0, |spec| {
            spec.fuel_tank = Some(FuelTank::new(2.0, 4.0));
        });
        let (dry_ctx, wet_ctx) = (dry.context(), wet.context());
        assert!(shear_at(&wet_ctx, 1.0).unwrap() < shear_at(&dry_ctx, 1.0).unwrap());
        let outboard = shear_at(&wet_ctx, 6.0).unwrap() - shear_at(&dry_ctx, 6.0).unwrap();
        assert!(outboard.abs() < 1e-6);
    }

    #[test]
    fn test_structure_weight_matches_closed_form() {
        let fixture = StageFixture::with(0.0, |_| {});
        let ctx = fixture.context();
        let wb = ctx.wing_box();
        // uniform geometry: constant material area and chord in each section
        let expected: f64 = wb
            .sections()
            .iter()
            .map(|s| {
                let area = s.material_area(wb.width(s.start_y), wb.height(s.start_y))
                    + ctx.settings.structure_allowance * ctx.wing().chord(s.start_y);
                ctx.settings.gravity * wb.material().density * area * s.length()
            })
            .sum();
        let w = structure_weight(&ctx).unwrap();
        assert!((w - expected).abs() / expected < 1e-8);
    }

    #[test]
    fn test_torsion_center_of_pressure_arm() {
        // xcp = 0.3 m, chord 2 m, flexural axis 0.4·c = 0.8 m -> arm -0.5 m
        let fixture = StageFixture::weightless(1000.0);
        let ctx = fixture.context();
        let t = torsion_at(&ctx, 0.0).unwrap();
        assert!((t - 10_000.0 * -0.5).abs() < 1e-6, "T(0) = {t}");
    }
}

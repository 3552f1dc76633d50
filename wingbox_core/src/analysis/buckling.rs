//! # Buckling Analyzers
//!
//! Spar web shear buckling, skin plate compression buckling and stringer
//! column buckling. Each analyzer evaluates every grid position on the span
//! evaluator, attributes the margins to the active section and folds them
//! into a [`MarginTable`] on the caller.
//!
//! ## Web shear buckling
//!
//! ```text
//! τ_max  = V/(h·(t_f + t_b)) · k_shape         k_shape = Q·h/Ixx at peak |V|
//! τ_cr   = π²·ks(a/h)·E/(12(1−ν²))·(t/h)²
//! q      = T/(2·A_enclosed)
//! crit_f = τ_cr(t_f) − q/t_f      crit_b = τ_cr(t_b) + q/t_b
//! margin = |min(crit_f, crit_b) / τ_max|
//! ```
//!
//! ## Skin buckling
//!
//! ```text
//! b = width_fraction·w(y),  a/b capped
//! σ_cr   = π²·kc(a/b)·E/(12(1−ν²))·(t/b)²    (kc_b side plates, kc_c interior)
//! margin = −σ_cr/σ_panel                      (only compressed plates, margin > 0)
//! ```
//!
//! ## Column buckling
//!
//! ```text
//! P_cr   = K·π²·E·(I_set/n)/L²        per stringer, I_set about the neutral axis
//! σ_cr   = −n·P_cr/A_set
//! σ      = M·(z̄ − z_s)/Ixx
//! margin = σ_cr/σ                      (only compressed sets, margin > 0)
//! ```

use crate::case::WebEdgeSupport;
use crate::equations::buckling::{
    average_web_shear, bending_stress, euler_critical_load, peak_web_shear, plate_critical_stress,
};
use crate::equations::section::torsional_shear_flow;
use crate::errors::WingBoxResult;
use crate::geometry::{partition_plates, SkinPlate};
use crate::numerics::Curve;

use super::margins::{MarginSample, MarginTable};
use super::stress::PanelStress;
use super::StageContext;

pub const WEB_CHECK: &str = "shear buckling";
pub const SKIN_CHECK: &str = "skin buckling";
pub const COLUMN_CHECK: &str = "column buckling";

/// Shape factor τ_max/τ_avg at the grid position of peak |V|, as `(y, k)`
pub fn shear_shape_factor(ctx: &StageContext<'_>, shear: &Curve) -> WingBoxResult<(f64, f64)> {
    let (y, _) = shear.peak_magnitude();
    let wing_box = ctx.wing_box();
    let section = wing_box.active_section(y)?;
    let (tf, tb) = (section.front_spar_t, section.back_spar_t);
    let tau_max = peak_web_shear(1.0, wing_box.first_moment(y)?, wing_box.moi_xx(y)?, tf, tb);
    let tau_avg = average_web_shear(1.0, wing_box.height(y), tf, tb);
    Ok((y, tau_max / tau_avg))
}

fn web_sample(
    ctx: &StageContext<'_>,
    shear: &Curve,
    torsion: &Curve,
    shape_factor: f64,
    y: f64,
) -> WingBoxResult<MarginSample> {
    let wing_box = ctx.wing_box();
    let material = wing_box.material();
    let section = wing_box.active_section(y)?;
    let (tf, tb) = (section.front_spar_t, section.back_spar_t);
    let h = wing_box.height(y);

    let tau_max = average_web_shear(shear.at(y), h, tf, tb) * shape_factor;
    let chart = match ctx.settings.web_edge {
        WebEdgeSupport::Clamped => &ctx.tables.ks_clamped,
        WebEdgeSupport::Hinged => &ctx.tables.ks_hinged,
    };
    let ks = chart.lookup(section.length() / h);
    let tau_cr = |t: f64| plate_critical_stress(ks, material.e_modulus, material.poisson_ratio, t, h);

    let flow = torsional_shear_flow(torsion.at(y), wing_box.enclosed_area(y)?);
    let front = tau_cr(tf) - flow / tf;
    let back = tau_cr(tb) + flow / tb;
    let (critical, element) = if front < back {
        (front, "front spar")
    } else {
        (back, "back spar")
    };

    Ok(MarginSample {
        section: section.index(),
        margin: (critical / tau_max).abs(),
        element: element.to_string(),
    })
}

/// Spar web shear buckling margins per section
pub fn web_buckling(ctx: &StageContext<'_>, shear: &Curve, torsion: &Curve) -> WingBoxResult<MarginTable> {
    let (peak_y, shape_factor) = shear_shape_factor(ctx, shear)?;
    log::debug!("Shear shape factor {:.3} at y = {:.2} m", shape_factor, peak_y);

    let samples = ctx
        .evaluator
        .map(ctx.grid(), |y| web_sample(ctx, shear, torsion, shape_factor, y))?;
    Ok(MarginTable::reduce(WEB_CHECK, ctx.wing_box().sections(), samples))
}

fn skin_samples(
    ctx: &StageContext<'_>,
    plates: &[Vec<SkinPlate>],
    stress: &PanelStress,
    y: f64,
) -> WingBoxResult<Vec<MarginSample>> {
    let wing_box = ctx.wing_box();
    let material = wing_box.material();
    let section = wing_box.active_section(y)?;
    let w = wing_box.width(y);

    let mut samples = Vec::new();
    for plate in &plates[section.index()] {
        let b = plate.width_fraction() * w;
        let ratio = (plate.length() / b).min(ctx.settings.skin_aspect_cap);
        let chart = if plate.side { &ctx.tables.kc_b } else { &ctx.tables.kc_c };
        let sigma_cr = plate_critical_stress(
            chart.lookup(ratio),
            material.e_modulus,
            material.poisson_ratio,
            plate.thickness,
            b,
        );
        let margin = -sigma_cr / stress.surface(plate.surface).at(y);
        if margin > 0.0 {
            samples.push(MarginSample {
                section: section.index(),
                margin,
                element: plate.label(),
            });
        }
    }
    Ok(samples)
}

/// Skin plate compression buckling margins per section
pub fn skin_buckling(ctx: &StageContext<'_>, stress: &PanelStress) -> WingBoxResult<MarginTable> {
    let sections = ctx.wing_box().sections();
    let plates: Vec<Vec<SkinPlate>> = sections.iter().map(partition_plates).collect();
    log::debug!(
        "Skin buckling over {} plates",
        plates.iter().map(Vec::len).sum::<usize>()
    );

    let samples = ctx.evaluator.map(ctx.grid(), |y| skin_samples(ctx, &plates, stress, y))?;
    Ok(MarginTable::reduce(SKIN_CHECK, sections, samples.into_iter().flatten()))
}

fn column_samples(ctx: &StageContext<'_>, moment: &Curve, y: f64) -> WingBoxResult<Vec<MarginSample>> {
    let wing_box = ctx.wing_box();
    let material = wing_box.material();
    let section = wing_box.active_section(y)?;
    let h = wing_box.height(y);
    let zc = wing_box.centroid_z(y)?;
    let ixx = wing_box.moi_xx(y)?;
    let m = moment.at(y);

    let mut samples = Vec::new();
    for set in &section.stringer_sets {
        let z = section.stringer_z(set, h);
        let count = set.amount as f64;
        let moi_each = set.moi_xx_about(z, zc) / count;
        let p_cr = euler_critical_load(ctx.settings.column_end_fixity, material.e_modulus, moi_each, section.length());
        let sigma_cr = -count * p_cr / set.area();
        let sigma = bending_stress(m, zc - z, ixx);
        let margin = sigma_cr / sigma;
        if margin > 0.0 {
            samples.push(MarginSample {
                section: section.index(),
                margin,
                element: set.label(),
            });
        }
    }
    Ok(samples)
}

/// Stringer column buckling margins per section
pub fn column_buckling(ctx: &StageContext<'_>, moment: &Curve) -> WingBoxResult<MarginTable> {
    let samples = ctx.evaluator.map(ctx.grid(), |y| column_samples(ctx, moment, y))?;
    Ok(MarginTable::reduce(
        COLUMN_CHECK,
        ctx.wing_box().sections(),
        samples.into_iter().flatten(),
    ))
}

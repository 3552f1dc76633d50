//! Moment-of-inertia stage: Ixx and J sampled over the span grid and stored
//! on the wing box as cubic curves. The cache is write-once; every later
//! call (and every `WingBox::moi_xx`/`moi_polar` query) reads the stored
//! curves.

use std::sync::Arc;

use crate::errors::WingBoxResult;
use crate::geometry::{InertiaCurves, WingBox};
use crate::numerics::{Interpolation, SpanEvaluator};

/// Cached inertia curves of `wing_box`, computing them on first use
pub fn inertia_curves<'w>(
    wing_box: &'w WingBox,
    grid: &[f64],
    evaluator: &SpanEvaluator,
) -> WingBoxResult<&'w InertiaCurves> {
    wing_box.inertia_or_try_init(|| {
        log::info!("Stage inertia: sampling Ixx and J at {} positions", grid.len());
        let moi_xx = evaluator.curve(grid, |y| wing_box.section_moi_xx(y), Interpolation::Cubic)?;
        let moi_polar = evaluator.curve(grid, |y| wing_box.section_moi_polar(y), Interpolation::Cubic)?;
        Ok(InertiaCurves {
            moi_xx: Arc::new(moi_xx),
            moi_polar: Arc::new(moi_polar),
        })
    })
}

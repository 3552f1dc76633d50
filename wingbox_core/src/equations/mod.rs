//! # Structural Equations
//!
//! Closed-form formulas used by the geometry model and the failure checks.
//! Keeping them in one place lets each one be checked against its reference
//! independently of the pipeline that calls it.
//!
//! ## Modules
//!
//! - [`section`] - Rectangle, composite-shape and single-cell properties
//! - [`buckling`] - Plate and column critical stresses, bending and web shear
//!
//! ## Sign Conventions
//!
//! - **Span position `y`**: distance from the wing root, positive outboard
//! - **Lift**: positive up
//! - **Shear / moment / torsion**: reaction of the outboard part at `y`
//!   (integrals run from `y` to the tip)
//! - **Rotation / deflection / twist**: accumulated from the root (integrals
//!   run from 0 to `y`)
//! - **Stress**: tension positive; positive moment compresses the top skin

pub mod buckling;
pub mod section;

pub use buckling::{
    average_web_shear,
    bending_stress,
    euler_critical_load,
    peak_web_shear,
    plate_critical_stress,
};

pub use section::{
    bredt_torsion_constant,
    composite_area,
    composite_centroid,
    composite_moments,
    parallel_axis,
    rectangular_area,
    rectangular_moi_xx,
    rectangular_moi_zz,
    torsional_shear_flow,
    Rect,
};

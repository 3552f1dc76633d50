//! # Numerics
//!
//! Building blocks shared by every pipeline stage:
//!
//! - [`curve`] - immutable interpolated functions of span position
//! - [`quadrature`] - adaptive Gauss-Kronrod integration with breakpoints
//! - [`span`] - parallel per-position evaluation over the span grid

pub mod curve;
pub mod quadrature;
pub mod span;

pub use curve::{Curve, CurveSamples, Interpolation, SpanFunction};
pub use quadrature::{integrate, integrate_with_breakpoints, QuadratureSettings};
pub use span::{default_workers, SpanEvaluator};

//! Aerodynamic loading and load-case management
//!
//! This module binds the aerodynamic surface and its attachments to a flight
//! condition.
//!
//! # Overview
//!
//! - [`Wing`] - chord, two reference polars, blend constant, wing box
//! - [`Engine`] / [`FuelTank`] - step loads on shear and torsion
//! - [`LoadCase`] - wing + flight condition + span grid + limits
//!
//! # Example
//!
//! ```
//! use wingbox_core::loads::{FlightCondition, span_grid};
//!
//! let cruise = FlightCondition {
//!     load_factor: 2.5,
//!     velocity: 120.0,
//!     air_density: 0.9,
//!     aircraft_weight: 250_000.0,
//! };
//! assert!((cruise.dynamic_pressure() - 6480.0).abs() < 1e-9);
//! assert_eq!(span_grid(0.0, 2.0, 0.5).len(), 4);
//! ```

pub mod attachments;
pub mod load_case;
pub mod wing;

pub use attachments::{Engine, FuelTank, DEFAULT_FUEL_DENSITY};
pub use load_case::{span_grid, FlightCondition, Limits, LoadCase, LoadCaseSpec};
pub use wing::{AeroPolar, Trim, Wing, WingSpec, REFERENCE_AOA_DEG};

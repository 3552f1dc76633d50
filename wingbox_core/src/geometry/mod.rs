//! # Wing-Box Geometry
//!
//! Pure geometric and material property calculators for the box beam.
//!
//! - [`profile`] - width and height as closed-form functions of span
//! - [`stringer`] - stiffener archetypes and stringer sets
//! - [`section`] - constant-thickness span ranges and their section properties
//! - [`skin`] - chordwise partition of the skins into plates
//! - [`wing_box`] - the validated box with section lookup and the inertia cache

pub mod profile;
pub mod section;
pub mod skin;
pub mod stringer;
pub mod wing_box;

pub use profile::GeometryFunction;
pub use section::WingBoxSection;
pub use skin::{partition_plates, SkinPlate};
pub use stringer::{StringerSet, StringerType, Surface};
pub use wing_box::{InertiaCurves, WingBox, WingBoxSpec};

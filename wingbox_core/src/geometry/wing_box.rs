//! # Wing Box
//!
//! The spanwise structural envelope: width and height functions, a material,
//! and an ordered list of sections tiling `[start_y, end_y]`.
//!
//! A [`WingBox`] only exists fully validated. It is built from a
//! [`WingBoxSpec`] (directly, or while deserializing) and is read-only from then
//! on, apart from the write-once moment-of-inertia cache.
//!
//! ## Section lookup
//!
//! Sections are half-open `[start_y, end_y)`, so a shared boundary belongs to
//! the outboard section. The last section is closed at the box end.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::geometry::{GeometryFunction, WingBox, WingBoxSection, WingBoxSpec};
//! use wingbox_core::materials::Material;
//!
//! let spec = WingBoxSpec::new("demo", 0.0, 10.0, Material::default())
//!     .with_width(GeometryFunction::taper(0.0, 1.0, 10.0, 0.5))
//!     .with_height(GeometryFunction::taper(0.0, 0.3, 10.0, 0.15))
//!     .with_section(WingBoxSection::uniform(0.0, 4.0, 0.006, 0.004))
//!     .with_section(WingBoxSection::uniform(4.0, 10.0, 0.004, 0.003));
//! let wing_box = WingBox::new(spec).unwrap();
//!
//! assert_eq!(wing_box.active_section(4.0).unwrap().index(), 1);
//! assert_eq!(wing_box.active_section(10.0).unwrap().index(), 1);
//! assert!(wing_box.active_section(10.5).is_err());
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};
use crate::geometry::profile::GeometryFunction;
use crate::geometry::section::WingBoxSection;
use crate::materials::Material;
use crate::numerics::Curve;

/// Allowed mismatch between adjacent section ends
pub const TILING_TOLERANCE: f64 = 1e-9;

/// Unvalidated wing-box description, as stored in case files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingBoxSpec {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Root end of the box [m]
    pub start_y: f64,
    /// Tip end of the box [m]
    pub end_y: f64,
    /// Outer width w(y) [m]
    pub width: GeometryFunction,
    /// Outer height h(y) [m]
    pub height: GeometryFunction,
    /// Wall and stringer material
    pub material: Material,
    /// Sections, ordered root to tip
    pub sections: Vec<WingBoxSection>,
}

impl WingBoxSpec {
    /// Start a description with unit width, 0.2 m height and no sections
    pub fn new(name: impl Into<String>, start_y: f64, end_y: f64, material: Material) -> Self {
        WingBoxSpec {
            name: name.into(),
            start_y,
            end_y,
            width: GeometryFunction::constant(1.0),
            height: GeometryFunction::constant(0.2),
            material,
            sections: Vec::new(),
        }
    }

    pub fn with_width(mut self, width: GeometryFunction) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: GeometryFunction) -> Self {
        self.height = height;
        self
    }

    pub fn with_section(mut self, section: WingBoxSection) -> Self {
        self.sections.push(section);
        self
    }
}

/// Ixx and J sampled over the span grid, shared by every downstream stage
#[derive(Debug, Clone)]
pub struct InertiaCurves {
    /// Bending moment of inertia about the horizontal neutral axis [m⁴]
    pub moi_xx: Arc<Curve>,
    /// Torsion constant [m⁴]
    pub moi_polar: Arc<Curve>,
}

/// Validated wing box
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WingBoxSpec", into = "WingBoxSpec")]
pub struct WingBox {
    name: String,
    start_y: f64,
    end_y: f64,
    width: GeometryFunction,
    height: GeometryFunction,
    material: Material,
    sections: Vec<WingBoxSection>,
    inertia: OnceCell<InertiaCurves>,
}

impl WingBox {
    /// Validate a description and build the wing box.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the range is empty, the sections do not tile it
    /// exactly, a section or the material is invalid, or the walls leave no
    /// enclosed cell somewhere along the span.
    pub fn new(spec: WingBoxSpec) -> WingBoxResult<Self> {
        let WingBoxSpec {
            name,
            start_y,
            end_y,
            width,
            height,
            material,
            mut sections,
        } = spec;

        if !(start_y.is_finite() && end_y.is_finite() && start_y < end_y) {
            return Err(WingBoxError::invalid_input(
                "wing_box.range",
                format!("{start_y}, {end_y}"),
                "Wing box must have start_y < end_y",
            ));
        }
        material.validate()?;
        width.validate_positive("wing_box.width", start_y, end_y)?;
        height.validate_positive("wing_box.height", start_y, end_y)?;

        if sections.is_empty() {
            return Err(WingBoxError::invalid_input("wing_box.sections", "[]", "At least one section is required"));
        }

        let mut expected_start = start_y;
        for (index, section) in sections.iter_mut().enumerate() {
            section.validate()?;
            if (section.start_y - expected_start).abs() > TILING_TOLERANCE {
                return Err(WingBoxError::invalid_input(
                    format!("wing_box.sections[{index}].start_y"),
                    section.start_y.to_string(),
                    format!("Sections must tile the box without gaps or overlaps (expected {expected_start})"),
                ));
            }
            section.start_y = expected_start;
            section.index = index;
            expected_start = section.end_y;
        }
        if (expected_start - end_y).abs() > TILING_TOLERANCE {
            return Err(WingBoxError::invalid_input(
                "wing_box.sections",
                expected_start.to_string(),
                format!("Last section must end at the box end ({end_y})"),
            ));
        }
        if let Some(last) = sections.last_mut() {
            last.end_y = end_y;
        }

        let wing_box = WingBox {
            name,
            start_y,
            end_y,
            width,
            height,
            material,
            sections,
            inertia: OnceCell::new(),
        };
        wing_box.validate_cells()?;
        Ok(wing_box)
    }

    fn validate_cells(&self) -> WingBoxResult<()> {
        const PROBES: usize = 8;
        for section in &self.sections {
            for i in 0..=PROBES {
                let y = section.start_y + section.length() * i as f64 / PROBES as f64;
                let area = section.enclosed_area(self.width(y), self.height(y));
                if area <= 0.0 {
                    return Err(WingBoxError::invalid_input(
                        format!("wing_box.sections[{}]", section.index),
                        format!("y = {y:.3}"),
                        "Wall thicknesses leave no enclosed cell",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root end [m]
    pub fn start_y(&self) -> f64 {
        self.start_y
    }

    /// Tip end [m]
    pub fn end_y(&self) -> f64 {
        self.end_y
    }

    /// Wall material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Sections, root to tip; a section's index is its position here
    pub fn sections(&self) -> &[WingBoxSection] {
        &self.sections
    }

    /// Width function
    pub fn width_function(&self) -> &GeometryFunction {
        &self.width
    }

    /// Height function
    pub fn height_function(&self) -> &GeometryFunction {
        &self.height
    }

    /// Interior section boundaries (discontinuities of every section property)
    pub fn section_boundaries(&self) -> Vec<f64> {
        self.sections.iter().skip(1).map(|s| s.start_y).collect()
    }

    /// Section covering span position `y`.
    ///
    /// # Errors
    ///
    /// [`WingBoxError::Geometry`] when `y` lies outside `[start_y, end_y]`.
    pub fn active_section(&self, y: f64) -> WingBoxResult<&WingBoxSection> {
        if !(y >= self.start_y && y <= self.end_y) {
            return Err(WingBoxError::geometry(y));
        }
        let count = self.sections.partition_point(|s| s.start_y <= y);
        let index = count.checked_sub(1).ok_or_else(|| WingBoxError::geometry(y))?;
        let section = &self.sections[index];
        if y < section.end_y || index + 1 == self.sections.len() {
            Ok(section)
        } else {
            Err(WingBoxError::geometry(y))
        }
    }

    /// Outer width w(y) [m]
    pub fn width(&self, y: f64) -> f64 {
        self.width.value(y)
    }

    /// Outer height h(y) [m]
    pub fn height(&self, y: f64) -> f64 {
        self.height.value(y)
    }

    /// Perimeter of the outer envelope
    pub fn circumference(&self, y: f64) -> f64 {
        2.0 * (self.width(y) + self.height(y))
    }

    /// Wall material area at `y`
    pub fn material_area(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.material_area(self.width(y), self.height(y)))
    }

    /// Area enclosed by the walls at `y`
    pub fn enclosed_area(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.enclosed_area(self.width(y), self.height(y)))
    }

    /// Chordwise centroid at `y`, from the box centre line
    pub fn centroid_x(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.centroid_x(self.width(y), self.height(y)))
    }

    /// Vertical centroid at `y`, from the box mid-height
    pub fn centroid_z(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.centroid_z(self.width(y), self.height(y)))
    }

    /// Ixx at `y`, from the cached curve once it exists
    pub fn moi_xx(&self, y: f64) -> WingBoxResult<f64> {
        match self.inertia.get() {
            Some(cache) => Ok(cache.moi_xx.at(y)),
            None => self.section_moi_xx(y),
        }
    }

    /// Torsion constant J at `y`, from the cached curve once it exists
    pub fn moi_polar(&self, y: f64) -> WingBoxResult<f64> {
        match self.inertia.get() {
            Some(cache) => Ok(cache.moi_polar.at(y)),
            None => self.section_moi_polar(y),
        }
    }

    /// Ixx at `y` evaluated from the section, bypassing the cache
    pub fn section_moi_xx(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.moi_xx(self.width(y), self.height(y)))
    }

    /// J at `y` evaluated from the section, bypassing the cache
    pub fn section_moi_polar(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.moi_polar(self.width(y), self.height(y)))
    }

    /// Izz at `y`
    pub fn moi_zz(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self.active_section(y)?.moi_zz(self.width(y), self.height(y)))
    }

    /// First moment of the area above the neutral axis at `y`
    pub fn first_moment(&self, y: f64) -> WingBoxResult<f64> {
        Ok(self
            .active_section(y)?
            .first_moment_above_neutral_axis(self.width(y), self.height(y)))
    }

    /// Cached inertia curves, if computed
    pub fn inertia(&self) -> Option<&InertiaCurves> {
        self.inertia.get()
    }

    /// Return the cached inertia curves, computing them with `init` the first
    /// time. Concurrent callers block until the first writer finishes; a
    /// failed `init` leaves the cache empty.
    pub fn inertia_or_try_init<F>(&self, init: F) -> WingBoxResult<&InertiaCurves>
    where
        F: FnOnce() -> WingBoxResult<InertiaCurves>,
    {
        self.inertia.get_or_try_init(init)
    }
}

impl TryFrom<WingBoxSpec> for WingBox {
    type Error = WingBoxError;

    fn try_from(spec: WingBoxSpec) -> Result<Self, Self::Error> {
        WingBox::new(spec)
    }
}

impl From<WingBox> for WingBoxSpec {
    fn from(wing_box: WingBox) -> Self {
        WingBoxSpec {
            name: wing_box.name,
            start_y: wing_box.start_y,
            end_y: wing_box.end_y,
            width: wing_box.width,
            height: wing_box.height,
            material: wing_box.material,
            sections: wing_box.sections,
        }
    }
}

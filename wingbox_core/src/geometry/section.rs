//! # Wing-Box Sections
//!
//! A [`WingBoxSection`] fixes the wall thicknesses and the stringer layout over
//! one span range. Its properties are functions of the local box width `w` and
//! height `h`, which the owning [`WingBox`](super::WingBox) supplies.
//!
//! ## Idealization
//!
//! ```text
//!                        t_top
//!        ┌━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┐  ← z = +h/2
//!        ┃  ┳        ┳         ┳        ┳  ┃
//!  t_f   ┃            (stringers)          ┃  t_b      h
//!        ┃  ┻        ┻         ┻        ┻  ┃
//!        └━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┘  ← z = -h/2
//!                       t_bottom
//!        x = -w/2          x = 0          x = +w/2
//! ```
//!
//! - Origin at the box centre; `x` aft, `z` up.
//! - Spars are full-height webs centred on `z = 0`, inset by half their thickness.
//! - Skin panels span the full width, inset by half their thickness.
//! - Stringers sit on the inner skin face; a set's centroid is
//!   `h/2 - t_skin - c` from the centre line, `c` being the profile's centroid
//!   height above its bonded face.

use serde::{Deserialize, Serialize};

use crate::equations::section::{
    bredt_torsion_constant, parallel_axis, rectangular_moi_xx, rectangular_moi_zz,
};
use crate::errors::{WingBoxError, WingBoxResult};
use crate::geometry::stringer::{StringerSet, Surface};

/// One span range of the wing box with constant wall thicknesses.
///
/// ## JSON Example
///
/// ```json
/// {
///   "start_y": 0.0,
///   "end_y": 5.0,
///   "front_spar_t": 0.006,
///   "back_spar_t": 0.005,
///   "top_panel_t": 0.004,
///   "bottom_panel_t": 0.004,
///   "stringer_sets": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingBoxSection {
    /// Position of the section in its wing box; assigned by the wing box
    #[serde(skip)]
    pub(crate) index: usize,
    /// Inboard end [m]
    pub start_y: f64,
    /// Outboard end [m]
    pub end_y: f64,
    /// Front spar thickness [m]
    pub front_spar_t: f64,
    /// Back spar thickness [m]
    pub back_spar_t: f64,
    /// Top skin thickness [m]
    pub top_panel_t: f64,
    /// Bottom skin thickness [m]
    pub bottom_panel_t: f64,
    /// Stringer runs, in order
    #[serde(default)]
    pub stringer_sets: Vec<StringerSet>,
}

impl WingBoxSection {
    /// Section with uniform spar and skin thicknesses and no stringers
    pub fn uniform(start_y: f64, end_y: f64, spar_t: f64, panel_t: f64) -> Self {
        WingBoxSection {
            index: 0,
            start_y,
            end_y,
            front_spar_t: spar_t,
            back_spar_t: spar_t,
            top_panel_t: panel_t,
            bottom_panel_t: panel_t,
            stringer_sets: Vec::new(),
        }
    }

    /// Add a stringer set
    pub fn with_stringers(mut self, set: StringerSet) -> Self {
        self.stringer_sets.push(set);
        self
    }

    /// Stable key: the section's index in its wing box
    pub fn index(&self) -> usize {
        self.index
    }

    /// Span length of the section
    pub fn length(&self) -> f64 {
        self.end_y - self.start_y
    }

    /// Skin thickness of one surface
    pub fn skin_thickness(&self, surface: Surface) -> f64 {
        match surface {
            Surface::Top => self.top_panel_t,
            Surface::Bottom => self.bottom_panel_t,
        }
    }

    /// Sum of both spar thicknesses
    pub fn spar_thickness_sum(&self) -> f64 {
        self.front_spar_t + self.back_spar_t
    }

    /// Wall material area (spars and skins, no stringers)
    pub fn material_area(&self, w: f64, h: f64) -> f64 {
        w * (self.top_panel_t + self.bottom_panel_t) + h * (self.front_spar_t + self.back_spar_t)
    }

    /// Area enclosed by the inner wall faces
    pub fn enclosed_area(&self, w: f64, h: f64) -> f64 {
        (w - self.front_spar_t - self.back_spar_t) * (h - self.top_panel_t - self.bottom_panel_t)
    }

    /// Total stringer area
    pub fn stringer_area(&self) -> f64 {
        self.stringer_sets.iter().map(StringerSet::area).sum()
    }

    /// Walls plus stringers
    pub fn total_area(&self, w: f64, h: f64) -> f64 {
        self.material_area(w, h) + self.stringer_area()
    }

    /// Centreline-to-centroid height of a stringer set
    pub fn stringer_z(&self, set: &StringerSet, h: f64) -> f64 {
        let inner_face = h / 2.0 - self.skin_thickness(set.surface);
        let z = inner_face - set.offset_from_skin();
        match set.surface {
            Surface::Top => z,
            Surface::Bottom => -z,
        }
    }

    /// Vertical centroid of the whole section
    pub fn centroid_z(&self, w: f64, h: f64) -> f64 {
        let mut az = w * self.top_panel_t * self.top_panel_z(h)
            + w * self.bottom_panel_t * self.bottom_panel_z(h);
        for set in &self.stringer_sets {
            az += set.area() * self.stringer_z(set, h);
        }
        az / self.total_area(w, h)
    }

    /// Chordwise centroid of the whole section
    pub fn centroid_x(&self, w: f64, h: f64) -> f64 {
        let (x_front, x_back) = self.spar_x(w);
        let mut ax = h * self.front_spar_t * x_front + h * self.back_spar_t * x_back;
        for set in &self.stringer_sets {
            ax += set.area() * (set.centroid_fraction() - 0.5) * w;
        }
        ax / self.total_area(w, h)
    }

    /// Ixx about the section's own horizontal neutral axis
    pub fn moi_xx(&self, w: f64, h: f64) -> f64 {
        let zc = self.centroid_z(w, h);
        let spars = self.spar_thickness_sum();
        let mut moi = parallel_axis(rectangular_moi_xx(spars, h), spars * h, zc);
        moi += parallel_axis(
            rectangular_moi_xx(w, self.top_panel_t),
            w * self.top_panel_t,
            self.top_panel_z(h) - zc,
        );
        moi += parallel_axis(
            rectangular_moi_xx(w, self.bottom_panel_t),
            w * self.bottom_panel_t,
            self.bottom_panel_z(h) - zc,
        );
        for set in &self.stringer_sets {
            moi += set.moi_xx_about(self.stringer_z(set, h), zc);
        }
        moi
    }

    /// Izz about the section's own vertical neutral axis
    pub fn moi_zz(&self, w: f64, h: f64) -> f64 {
        let xc = self.centroid_x(w, h);
        let (x_front, x_back) = self.spar_x(w);
        let mut moi = parallel_axis(
            rectangular_moi_zz(self.front_spar_t, h),
            self.front_spar_t * h,
            x_front - xc,
        );
        moi += parallel_axis(
            rectangular_moi_zz(self.back_spar_t, h),
            self.back_spar_t * h,
            x_back - xc,
        );
        for t in [self.top_panel_t, self.bottom_panel_t] {
            moi += parallel_axis(rectangular_moi_zz(w, t), w * t, xc);
        }
        for set in &self.stringer_sets {
            moi += set.moi_zz_about(w, xc);
        }
        moi
    }

    /// Torsion constant of the closed cell (Bredt-Batho)
    pub fn moi_polar(&self, w: f64, h: f64) -> f64 {
        bredt_torsion_constant(
            self.enclosed_area(w, h),
            w,
            h,
            self.top_panel_t,
            self.bottom_panel_t,
            self.front_spar_t,
            self.back_spar_t,
        )
    }

    /// First moment of the area above the neutral axis, about the neutral axis
    pub fn first_moment_above_neutral_axis(&self, w: f64, h: f64) -> f64 {
        let zc = self.centroid_z(w, h);
        let web_height = (h / 2.0 - zc).max(0.0);
        let mut q = w * self.top_panel_t * (self.top_panel_z(h) - zc);
        q += self.spar_thickness_sum() * web_height * web_height / 2.0;
        for set in &self.stringer_sets {
            let z = self.stringer_z(set, h);
            if z > zc {
                q += set.area() * (z - zc);
            }
        }
        q
    }

    fn top_panel_z(&self, h: f64) -> f64 {
        (h - self.top_panel_t) / 2.0
    }

    fn bottom_panel_z(&self, h: f64) -> f64 {
        -(h - self.bottom_panel_t) / 2.0
    }

    fn spar_x(&self, w: f64) -> (f64, f64) {
        (-(w - self.front_spar_t) / 2.0, (w - self.back_spar_t) / 2.0)
    }

    /// Validate thicknesses, range and stringer sets
    pub fn validate(&self) -> WingBoxResult<()> {
        if !(self.start_y.is_finite() && self.end_y.is_finite() && self.start_y < self.end_y) {
            return Err(WingBoxError::invalid_input(
                "section.range",
                format!("{}, {}", self.start_y, self.end_y),
                "Section must have start_y < end_y",
            ));
        }
        for (field, value) in [
            ("section.front_spar_t", self.front_spar_t),
            ("section.back_spar_t", self.back_spar_t),
            ("section.top_panel_t", self.top_panel_t),
            ("section.bottom_panel_t", self.bottom_panel_t),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Thickness must be positive"));
            }
        }
        for set in &self.stringer_sets {
            set.validate()?;
        }
        Ok(())
    }
}

//! # Stringers
//!
//! [`StringerType`] is the closed set of stiffener cross-sections; each one is
//! a composite of thin rectangles in a local frame whose `z = 0` plane is the
//! face bonded to the skin, with the profile standing inward:
//!
//! ```text
//!   Angle        Tee         Zee          Flat bar
//!   ┃            ┃             ┏━━          ┃
//!   ┃            ┃             ┃            ┃
//!   ┗━━━━      ━━┻━━         ━━┛            ┃
//!  ─────────  ─────────    ─────────     ─────────  skin
//! ```
//!
//! A [`StringerSet`] is a run of identical stringers spread evenly over a
//! chordwise range given as fractions of the box width, on one surface.

use serde::{Deserialize, Serialize};

use crate::equations::section::{composite_area, composite_centroid, composite_moments, Rect};
use crate::errors::{WingBoxError, WingBoxResult};

/// Stiffener cross-section archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringerType {
    /// L-section: flange on the skin, web at one edge
    Angle,
    /// T-section: flange on the skin, web at the middle
    Tee,
    /// Z-section: half-flange on the skin, central web, half-flange on top
    Zee,
    /// Blade of thickness `t` and height `h`, centred in the width `w`
    FlatBar,
}

impl StringerType {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StringerType::Angle => "L-stringer",
            StringerType::Tee => "T-stringer",
            StringerType::Zee => "Z-stringer",
            StringerType::FlatBar => "flat bar",
        }
    }

    /// Rectangles making up the profile in the local frame
    pub fn parts(&self, w: f64, h: f64, t: f64) -> Vec<Rect> {
        match self {
            StringerType::Angle => vec![Rect::new(0.0, 0.0, w, t), Rect::new(0.0, t, t, h - t)],
            StringerType::Tee => vec![
                Rect::new(0.0, 0.0, w, t),
                Rect::new((w - t) / 2.0, t, t, h - t),
            ],
            StringerType::Zee => {
                let flange = (w + t) / 2.0;
                vec![
                    Rect::new(0.0, 0.0, flange, t),
                    Rect::new((w - t) / 2.0, t, t, h - 2.0 * t),
                    Rect::new((w - t) / 2.0, h - t, flange, t),
                ]
            }
            StringerType::FlatBar => vec![Rect::new((w - t) / 2.0, 0.0, t, h)],
        }
    }

    /// Cross-sectional area of one stringer
    pub fn area(&self, w: f64, h: f64, t: f64) -> f64 {
        composite_area(&self.parts(w, h, t))
    }

    /// Centroid distance from the profile's left edge
    pub fn centroid_x(&self, w: f64, h: f64, t: f64) -> f64 {
        composite_centroid(&self.parts(w, h, t)).0
    }

    /// Centroid distance from the skin face
    pub fn centroid_z(&self, w: f64, h: f64, t: f64) -> f64 {
        composite_centroid(&self.parts(w, h, t)).1
    }

    /// Second moment about the stringer's own horizontal centroidal axis
    pub fn moi_xx(&self, w: f64, h: f64, t: f64) -> f64 {
        composite_moments(&self.parts(w, h, t)).0
    }

    /// Second moment about the stringer's own vertical centroidal axis
    pub fn moi_zz(&self, w: f64, h: f64, t: f64) -> f64 {
        composite_moments(&self.parts(w, h, t)).1
    }

    /// Check the dimensions produce a real profile
    pub fn validate(&self, w: f64, h: f64, t: f64) -> WingBoxResult<()> {
        for (field, value) in [("stringer.width", w), ("stringer.height", h), ("stringer.thickness", t)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        let min_height = match self {
            StringerType::Zee => 2.0 * t,
            _ => t,
        };
        if t >= w || h <= min_height {
            return Err(WingBoxError::invalid_input(
                "stringer.thickness",
                t.to_string(),
                format!("Too thick for a {} of {w} x {h} m", self.display_name()),
            ));
        }
        Ok(())
    }
}

/// Skin surface a stringer set is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Upper skin
    Top,
    /// Lower skin
    Bottom,
}

impl Surface {
    /// Both surfaces
    pub const BOTH: [Surface; 2] = [Surface::Top, Surface::Bottom];
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Surface::Top => write!(f, "top"),
            Surface::Bottom => write!(f, "bottom"),
        }
    }
}

/// A run of identical stringers on one surface.
///
/// ## JSON Example
///
/// ```json
/// {
///   "stringer": "tee",
///   "amount": 6,
///   "width": 0.03,
///   "height": 0.025,
///   "thickness": 0.002,
///   "start_x": 0.1,
///   "end_x": 0.9,
///   "surface": "top"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringerSet {
    /// Cross-section archetype
    pub stringer: StringerType,
    /// Number of stringers
    pub amount: usize,
    /// Profile width [m]
    pub width: f64,
    /// Profile height [m]
    pub height: f64,
    /// Wall thickness [m]
    pub thickness: f64,
    /// First stringer position, as a fraction of box width
    pub start_x: f64,
    /// Last stringer position, as a fraction of box width
    pub end_x: f64,
    /// Attached surface
    pub surface: Surface,
}

impl StringerSet {
    /// Stringer pair sitting in both corners of one surface
    pub fn corner(stringer: StringerType, width: f64, height: f64, thickness: f64, surface: Surface) -> Self {
        StringerSet {
            stringer,
            amount: 2,
            width,
            height,
            thickness,
            start_x: 0.0,
            end_x: 1.0,
            surface,
        }
    }

    /// L-stringers in all four box corners (one set per surface)
    pub fn corner_pair(width: f64, height: f64, thickness: f64) -> [StringerSet; 2] {
        [
            StringerSet::corner(StringerType::Angle, width, height, thickness, Surface::Top),
            StringerSet::corner(StringerType::Angle, width, height, thickness, Surface::Bottom),
        ]
    }

    /// Area of one stringer
    pub fn stringer_area(&self) -> f64 {
        self.stringer.area(self.width, self.height, self.thickness)
    }

    /// Total area of the set
    pub fn area(&self) -> f64 {
        self.stringer_area() * self.amount as f64
    }

    /// Centroid distance from the skin face
    pub fn offset_from_skin(&self) -> f64 {
        self.stringer.centroid_z(self.width, self.height, self.thickness)
    }

    /// Sum of the stringers' own Ixx
    pub fn own_moi_xx(&self) -> f64 {
        self.stringer.moi_xx(self.width, self.height, self.thickness) * self.amount as f64
    }

    /// Sum of the stringers' own Izz
    pub fn own_moi_zz(&self) -> f64 {
        self.stringer.moi_zz(self.width, self.height, self.thickness) * self.amount as f64
    }

    /// Chordwise stringer positions as width fractions.
    ///
    /// Evenly spaced from `start_x` to `end_x`; a single stringer sits at the
    /// middle of the range.
    pub fn positions(&self) -> Vec<f64> {
        match self.amount {
            0 => Vec::new(),
            1 => vec![self.centroid_fraction()],
            n => {
                let step = (self.end_x - self.start_x) / (n - 1) as f64;
                (0..n).map(|i| self.start_x + step * i as f64).collect()
            }
        }
    }

    /// Mean chordwise position as a width fraction
    pub fn centroid_fraction(&self) -> f64 {
        (self.start_x + self.end_x) / 2.0
    }

    /// Ixx of the set about a horizontal axis at `axis_z`, with the set's centroid at `set_z`
    pub fn moi_xx_about(&self, set_z: f64, axis_z: f64) -> f64 {
        self.own_moi_xx() + self.area() * (set_z - axis_z).powi(2)
    }

    /// Izz of the set about a vertical axis at `axis_x`, for a box `box_width` wide
    /// whose chordwise origin is the box centre line
    pub fn moi_zz_about(&self, box_width: f64, axis_x: f64) -> f64 {
        let a = self.stringer_area();
        self.own_moi_zz()
            + self
                .positions()
                .iter()
                .map(|f| a * ((f - 0.5) * box_width - axis_x).powi(2))
                .sum::<f64>()
    }

    /// Short label for reports, e.g. `"6 x T-stringer 30x25x2 mm (top)"`
    pub fn label(&self) -> String {
        format!(
            "{} x {} {:.0}x{:.0}x{:.1} mm ({})",
            self.amount,
            self.stringer.display_name(),
            self.width * 1e3,
            self.height * 1e3,
            self.thickness * 1e3,
            self.surface
        )
    }

    /// Validate the set
    pub fn validate(&self) -> WingBoxResult<()> {
        self.stringer.validate(self.width, self.height, self.thickness)?;
        if self.amount == 0 {
            return Err(WingBoxError::invalid_input("stringer_set.amount", "0", "At least one stringer"));
        }
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.start_x) || !in_unit(self.end_x) || self.start_x > self.end_x {
            return Err(WingBoxError::invalid_input(
                "stringer_set.range",
                format!("{}, {}", self.start_x, self.end_x),
                "Range must be ordered fractions of the box width within [0, 1]",
            ));
        }
        Ok(())
    }
}

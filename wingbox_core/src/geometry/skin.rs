//! # Skin Plates
//!
//! Each skin surface of a section is cut chordwise into plates by its
//! stringers. The box edges (fractions 0 and 1) always bound a surface, so a
//! surface without stringers is one plate spanning the full width.
//!
//! Plates touching a box edge are side plates (one edge on a spar); all
//! others are interior plates between two stringers.

use serde::{Deserialize, Serialize};

use crate::geometry::section::WingBoxSection;
use crate::geometry::stringer::Surface;

/// Two stringer positions closer than this are the same station
pub const POSITION_TOLERANCE: f64 = 1e-9;

/// A skin panel between adjacent stringers (or a stringer and a box edge)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinPlate {
    /// Key of the owning section
    pub section: usize,
    /// Surface the plate belongs to
    pub surface: Surface,
    /// Skin thickness [m]
    pub thickness: f64,
    /// Span extent [m]
    pub start_y: f64,
    pub end_y: f64,
    /// Chordwise extent as fractions of box width
    pub start_fraction: f64,
    pub end_fraction: f64,
    /// Plate has one edge on a spar
    pub side: bool,
}

impl SkinPlate {
    /// Width as a fraction of box width
    pub fn width_fraction(&self) -> f64 {
        self.end_fraction - self.start_fraction
    }

    /// Span length of the plate
    pub fn length(&self) -> f64 {
        self.end_y - self.start_y
    }

    /// Short label for reports
    pub fn label(&self) -> String {
        format!(
            "{} {} plate {:.3}-{:.3} of width",
            self.surface,
            if self.side { "side" } else { "interior" },
            self.start_fraction,
            self.end_fraction
        )
    }
}

/// Stringer stations on one surface, sorted, with both box edges and without duplicates
pub fn stations(section: &WingBoxSection, surface: Surface) -> Vec<f64> {
    let mut coords: Vec<f64> = section
        .stringer_sets
        .iter()
        .filter(|set| set.surface == surface)
        .flat_map(|set| set.positions())
        .collect();
    coords.push(0.0);
    coords.push(1.0);
    coords.sort_by(f64::total_cmp);
    coords.dedup_by(|b, a| (*b - *a).abs() <= POSITION_TOLERANCE);
    coords
}

/// Cut both surfaces of a section into skin plates (top first, then bottom).
pub fn partition_plates(section: &WingBoxSection) -> Vec<SkinPlate> {
    let mut plates = Vec::new();
    for surface in Surface::BOTH {
        let coords = stations(section, surface);
        for pair in coords.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let side = start.abs() <= POSITION_TOLERANCE || (end - 1.0).abs() <= POSITION_TOLERANCE;
            plates.push(SkinPlate {
                section: section.index(),
                surface,
                thickness: section.skin_thickness(surface),
                start_y: section.start_y,
                end_y: section.end_y,
                start_fraction: start,
                end_fraction: end,
                side,
            });
        }
    }
    plates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::stringer::{StringerSet, StringerType};

    fn single(x: f64, surface: Surface) -> StringerSet {
        StringerSet {
            stringer: StringerType::Tee,
            amount: 1,
            width: 0.02,
            height: 0.02,
            thickness: 0.002,
            start_x: x,
            end_x: x,
            surface,
        }
    }

    #[test]
    fn test_no_stringers_gives_one_plate_per_surface() {
        let s = WingBoxSection::uniform(0.0, 2.0, 0.004, 0.003);
        let plates = partition_plates(&s);
        assert_eq!(plates.len(), 2);
        assert!(plates.iter().all(|p| p.side && (p.width_fraction() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_corner_and_interior_stringers() {
        let [top, bottom] = StringerSet::corner_pair(0.02, 0.02, 0.002);
        let s = WingBoxSection::uniform(0.0, 2.0, 0.004, 0.003)
            .with_stringers(top)
            .with_stringers(bottom)
            .with_stringers(single(0.3, Surface::Top))
            .with_stringers(single(0.7, Surface::Top));

        let top_plates: Vec<_> = partition_plates(&s)
            .into_iter()
            .filter(|p| p.surface == Surface::Top)
            .collect();
        assert_eq!(top_plates.len(), 3);
        let widths: Vec<f64> = top_plates.iter().map(SkinPlate::width_fraction).collect();
        assert!((widths[0] - 0.3).abs() < 1e-12);
        assert!((widths[1] - 0.4).abs() < 1e-12);
        assert!((widths[2] - 0.3).abs() < 1e-12);
        assert_eq!(top_plates.iter().map(|p| p.side).collect::<Vec<_>>(), vec![true, false, true]);
        assert!(top_plates.iter().all(|p| p.thickness == 0.003));
    }

    #[test]
    fn test_duplicate_stations_collapse() {
        let s = WingBoxSection::uniform(0.0, 1.0, 0.004, 0.003)
            .with_stringers(single(0.5, Surface::Bottom))
            .with_stringers(single(0.5 + 1e-12, Surface::Bottom));
        assert_eq!(stations(&s, Surface::Bottom), vec![0.0, 0.5, 1.0]);
        assert_eq!(stations(&s, Surface::Top), vec![0.0, 1.0]);
    }
}

//! # Cross-Section Property Formulas
//!
//! Closed-form properties of the thin rectangles a wing-box cross-section is
//! assembled from (spars, skin panels, stringer flanges and webs), plus the
//! single-cell torsion constant.
//!
//! ## Notation
//!
//! - `b` = Width of a rectangle (chordwise, along x)
//! - `d` = Depth of a rectangle (vertical, along z)
//! - `A` = Area
//! - `I` = Second moment of area
//! - `J` = Torsion constant
//!
//! ## Axes
//!
//! - `x` runs chordwise, positive aft
//! - `z` runs vertically, positive up
//! - `Ixx` resists bending about the x axis (vertical offsets `z` enter squared)
//! - `Izz` resists bending about the z axis (chordwise offsets `x` enter squared)
//!
//! ## References
//!
//! - Megson, Aircraft Structures for Engineering Students, Ch. 15 and 18
//! - Roark's Formulas for Stress and Strain, 8th Edition, Appendix A

// =============================================================================
// RECTANGLE PROPERTIES
// =============================================================================

/// Area of a rectangle
///
/// # Formula
/// A = b × d
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Second moment of area of a rectangle about its own horizontal centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │ ════════│ ← x axis at d/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// Ixx = b·d³/12
///
/// # Example
/// ```rust
/// use wingbox_core::equations::section::rectangular_moi_xx;
///
/// // 4 mm thick, 300 mm tall spar web
/// let i = rectangular_moi_xx(0.004, 0.3);
/// assert!((i - 9.0e-6).abs() < 1e-12);
/// ```
#[inline]
pub fn rectangular_moi_xx(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Second moment of area of a rectangle about its own vertical centroidal axis
///
/// # Formula
/// Izz = d·b³/12
#[inline]
pub fn rectangular_moi_zz(b: f64, d: f64) -> f64 {
    d * b.powi(3) / 12.0
}

/// Parallel-axis transfer of a second moment of area
///
/// # Formula
/// I = I_c + A·r²
///
/// # Arguments
/// * `i_centroidal` - Second moment about the element's own centroid
/// * `area` - Element area
/// * `offset` - Distance from the element centroid to the target axis
#[inline]
pub fn parallel_axis(i_centroidal: f64, area: f64, offset: f64) -> f64 {
    i_centroidal + area * offset * offset
}

// =============================================================================
// CLOSED SINGLE-CELL SECTIONS
// =============================================================================

/// Torsion constant of a thin-walled rectangular cell (Bredt-Batho)
///
/// ```text
///            t_top
///     ┌─────────────────┐
///     │                 │
/// t_f │     A_enclosed  │ t_b   h
///     │                 │
///     └─────────────────┘
///           t_bottom
///              w
/// ```
///
/// # Formula
/// J = 4·A² / ∮(ds/t) = 4·A² / (w·(1/t_top + 1/t_bottom) + h·(1/t_f + 1/t_b))
///
/// # Arguments
/// * `enclosed_area` - Area enclosed by the wall
/// * `width`, `height` - Wall lengths along the chord and vertically
/// * `t_top`, `t_bottom` - Skin panel thicknesses
/// * `t_front`, `t_back` - Spar thicknesses
///
/// # Example
/// ```rust
/// use wingbox_core::equations::section::bredt_torsion_constant;
///
/// // Uniform wall: J = 4A²t / perimeter
/// let j = bredt_torsion_constant(0.5, 1.0, 0.5, 0.01, 0.01, 0.01, 0.01);
/// assert!((j - 4.0 * 0.25 * 0.01 / 3.0).abs() < 1e-12);
/// ```
#[inline]
pub fn bredt_torsion_constant(
    enclosed_area: f64,
    width: f64,
    height: f64,
    t_top: f64,
    t_bottom: f64,
    t_front: f64,
    t_back: f64,
) -> f64 {
    let line_integral = width * (1.0 / t_top + 1.0 / t_bottom) + height * (1.0 / t_front + 1.0 / t_back);
    4.0 * enclosed_area * enclosed_area / line_integral
}

/// Shear flow in a closed cell due to torque
///
/// # Formula
/// q = T / (2·A_enclosed)
#[inline]
pub fn torsional_shear_flow(torque: f64, enclosed_area: f64) -> f64 {
    torque / (2.0 * enclosed_area)
}

// =============================================================================
// COMPOSITE SHAPES
// =============================================================================

/// An axis-aligned rectangle, located by its lower-left corner.
///
/// Stringer archetypes are assembled from these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Bottom edge
    pub z0: f64,
    /// Width along x
    pub b: f64,
    /// Depth along z
    pub d: f64,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and size
    pub const fn new(x0: f64, z0: f64, b: f64, d: f64) -> Self {
        Self { x0, z0, b, d }
    }

    /// Area
    pub fn area(&self) -> f64 {
        rectangular_area(self.b, self.d)
    }

    /// Centroid x
    pub fn cx(&self) -> f64 {
        self.x0 + self.b / 2.0
    }

    /// Centroid z
    pub fn cz(&self) -> f64 {
        self.z0 + self.d / 2.0
    }
}

/// Area of a composite shape
pub fn composite_area(parts: &[Rect]) -> f64 {
    parts.iter().map(Rect::area).sum()
}

/// Centroid `(x, z)` of a composite shape
pub fn composite_centroid(parts: &[Rect]) -> (f64, f64) {
    let area = composite_area(parts);
    if area <= 0.0 {
        return (0.0, 0.0);
    }
    let ax: f64 = parts.iter().map(|r| r.area() * r.cx()).sum();
    let az: f64 = parts.iter().map(|r| r.area() * r.cz()).sum();
    (ax / area, az / area)
}

/// `(Ixx, Izz)` of a composite shape about its own centroid
pub fn composite_moments(parts: &[Rect]) -> (f64, f64) {
    let (cx, cz) = composite_centroid(parts);
    parts.iter().fold((0.0, 0.0), |(ixx, izz), r| {
        (
            ixx + parallel_axis(rectangular_moi_xx(r.b, r.d), r.area(), r.cz() - cz),
            izz + parallel_axis(rectangular_moi_zz(r.b, r.d), r.area(), r.cx() - cx),
        )
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < tol {
            (a - b).abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    #[test]
    fn test_rectangle_moments() {
        assert!(approx_eq(rectangular_moi_xx(0.02, 0.1), 0.02 * 0.001 / 12.0, EPSILON));
        assert!(approx_eq(rectangular_moi_zz(0.02, 0.1), 0.1 * 8.0e-6 / 12.0, EPSILON));
    }

    #[test]
    fn test_parallel_axis() {
        // 10x10 square shifted 5 from the axis: I = 10^4/12 + 100·25
        let i = parallel_axis(rectangular_moi_xx(10.0, 10.0), 100.0, 5.0);
        assert!(approx_eq(i, 10_000.0 / 12.0 + 2500.0, EPSILON));
    }

    #[test]
    fn test_composite_equals_single_rectangle() {
        // Two stacked halves behave as one 2 x 4 rectangle
        let parts = [Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 2.0, 2.0, 2.0)];
        let (cx, cz) = composite_centroid(&parts);
        assert!(approx_eq(cx, 1.0, EPSILON));
        assert!(approx_eq(cz, 2.0, EPSILON));
        let (ixx, izz) = composite_moments(&parts);
        assert!(approx_eq(ixx, rectangular_moi_xx(2.0, 4.0), EPSILON));
        assert!(approx_eq(izz, rectangular_moi_zz(2.0, 4.0), EPSILON));
    }

    #[test]
    fn test_bredt_uniform_wall() {
        let (w, h, t) = (0.8, 0.2, 0.003);
        let a = w * h;
        let j = bredt_torsion_constant(a, w, h, t, t, t, t);
        assert!(approx_eq(j, 4.0 * a * a * t / (2.0 * (w + h)), EPSILON));
    }

    #[test]
    fn test_shear_flow() {
        assert!(approx_eq(torsional_shear_flow(1000.0, 0.25), 2000.0, EPSILON));
    }
}

//! # Buckling and Stress Formulas
//!
//! Critical-stress formulas for the failure checks: flat plates in shear and
//! compression, Euler columns, and bending stress.
//!
//! ## Notation
//!
//! - `E` = Young's modulus
//! - `ν` = Poisson ratio
//! - `t` = Plate thickness
//! - `b` = Loaded plate edge (the short side the buckle spans)
//! - `k` = Buckling coefficient from the plate tables (`ks` shear, `kc` compression)
//! - `K` = Column end-fixity coefficient
//!
//! ## Sign Conventions
//!
//! - Stress: tension positive, compression negative
//! - Bending moment: positive when it compresses the top skin
//!
//! ## References
//!
//! - Megson, Aircraft Structures for Engineering Students, Ch. 9
//! - Bruhn, Analysis and Design of Flight Vehicle Structures, C5 and C6

use std::f64::consts::PI;

/// Critical buckling stress of a flat plate
///
/// ```text
///      ┌──────────── a ───────────┐
///      │                          │
///    b │      ← σ or τ →          │ t
///      │                          │
///      └──────────────────────────┘
/// ```
///
/// # Formula
/// σ_cr = π²·k·E / (12·(1 − ν²)) · (t/b)²
///
/// The same expression gives τ_cr with a shear coefficient `ks`.
///
/// # Example
/// ```rust
/// use wingbox_core::equations::buckling::plate_critical_stress;
///
/// let sigma = plate_critical_stress(4.0, 70e9, 0.33, 0.002, 0.15);
/// assert!(sigma > 0.0);
/// ```
#[inline]
pub fn plate_critical_stress(k: f64, e_modulus: f64, poisson: f64, thickness: f64, b: f64) -> f64 {
    PI * PI * k * e_modulus / (12.0 * (1.0 - poisson * poisson)) * (thickness / b).powi(2)
}

/// Euler critical load of a column
///
/// # Formula
/// P_cr = K·π²·E·I / L²
///
/// # Arguments
/// * `k_factor` - End fixity (1 pinned-pinned, 4 clamped-clamped, 1/4 clamped-free)
/// * `e_modulus` - Young's modulus
/// * `moi` - Second moment of area about the bending axis
/// * `length` - Column length
#[inline]
pub fn euler_critical_load(k_factor: f64, e_modulus: f64, moi: f64, length: f64) -> f64 {
    k_factor * PI * PI * e_modulus * moi / (length * length)
}

/// Bending stress at distance `z` from the neutral axis
///
/// # Formula
/// σ = M·z / I
#[inline]
pub fn bending_stress(moment: f64, z: f64, moi: f64) -> f64 {
    moment * z / moi
}

/// Average shear stress in the spar webs
///
/// # Formula
/// τ_avg = V / (h·(t_front + t_back))
#[inline]
pub fn average_web_shear(shear: f64, height: f64, t_front: f64, t_back: f64) -> f64 {
    shear / (height * (t_front + t_back))
}

/// Peak web shear from the first moment of area (τ = V·Q / (I·Σt))
#[inline]
pub fn peak_web_shear(shear: f64, first_moment: f64, moi: f64, t_front: f64, t_back: f64) -> f64 {
    shear * first_moment / (moi * (t_front + t_back))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn test_plate_critical_stress_scales_with_thickness_squared() {
        let s1 = plate_critical_stress(5.0, 72e9, 0.33, 0.002, 0.2);
        let s2 = plate_critical_stress(5.0, 72e9, 0.33, 0.004, 0.2);
        assert!(approx_eq(s2 / s1, 4.0, 1e-12));
    }

    #[test]
    fn test_plate_critical_stress_value() {
        // ≈ 25.3 MPa
        let s = plate_critical_stress(4.0, 70e9, 0.3, 0.001, 0.1);
        let expected = PI * PI * 4.0 * 70e9 / (12.0 * 0.91) * 1e-4;
        assert!(approx_eq(s, expected, 1e-12));
    }

    #[test]
    fn test_euler_load() {
        // Pinned 2 m column, E = 70 GPa, I = 1e-8
        let p = euler_critical_load(1.0, 70e9, 1e-8, 2.0);
        assert!(approx_eq(p, PI * PI * 700.0 / 4.0, 1e-12));
        assert!(approx_eq(euler_critical_load(4.0, 70e9, 1e-8, 2.0), 4.0 * p, 1e-12));
    }

    #[test]
    fn test_bending_stress_sign() {
        assert!(bending_stress(1000.0, -0.1, 1e-4) < 0.0);
        assert!(approx_eq(bending_stress(1000.0, 0.1, 1e-4), 1.0e6, 1e-12));
    }

    #[test]
    fn test_web_shear() {
        assert!(approx_eq(average_web_shear(1200.0, 0.2, 0.002, 0.004), 1.0e6, 1e-12));
    }
}

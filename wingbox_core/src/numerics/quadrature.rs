//! # Adaptive Quadrature
//!
//! Globally adaptive Gauss-Kronrod integration (10-point Gauss embedded in a
//! 21-point Kronrod rule). The interval with the largest error estimate is
//! bisected until the summed estimate falls under
//! `max(epsabs, epsrel·|I|)`, or the bisection budget runs out, in which case
//! the integral fails with [`WingBoxError::Integration`].
//!
//! Known discontinuities (section boundaries, tank ends, kinks of a linear
//! curve) are passed as breakpoints; the integration range is split there
//! before any bisection happens.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::numerics::{integrate, QuadratureSettings};
//!
//! let settings = QuadratureSettings::default();
//! let area = integrate(|x| Ok(x.sin()), 0.0, std::f64::consts::PI, &settings).unwrap();
//! assert!((area - 2.0).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};

/// Kronrod abscissae on [-1, 1] (positive half, descending; odd indices are Gauss nodes)
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

/// Kronrod weights matching [`XGK`]
const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_931_966_482,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// 10-point Gauss weights for `XGK[1], XGK[3], .., XGK[9]`
const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Tolerances and bisection budget for one integral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureSettings {
    /// Absolute error tolerance
    pub epsabs: f64,
    /// Relative error tolerance
    pub epsrel: f64,
    /// Maximum number of bisections
    pub limit: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            epsabs: 1.49e-8,
            epsrel: 1.49e-6,
            limit: 50,
        }
    }
}

impl QuadratureSettings {
    /// Settings for the root-to-y integrals (rotation, twist)
    pub fn stiff() -> Self {
        Self {
            limit: 200,
            ..Self::default()
        }
    }

    /// Check tolerances are usable
    pub fn validate(&self, field: &str) -> WingBoxResult<()> {
        if !(self.epsabs >= 0.0 && self.epsrel >= 0.0) || (self.epsabs == 0.0 && self.epsrel == 0.0) {
            return Err(WingBoxError::invalid_input(
                format!("{field}.epsabs/epsrel"),
                format!("{}/{}", self.epsabs, self.epsrel),
                "Tolerances must be non-negative and not both zero",
            ));
        }
        if self.limit == 0 {
            return Err(WingBoxError::invalid_input(
                format!("{field}.limit"),
                "0",
                "Bisection limit must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[a, b]`.
///
/// `a > b` integrates the reversed range and flips the sign; `a == b` is zero.
pub fn integrate<F>(f: F, a: f64, b: f64, settings: &QuadratureSettings) -> WingBoxResult<f64>
where
    F: FnMut(f64) -> WingBoxResult<f64>,
{
    integrate_with_breakpoints(f, a, b, &[], settings)
}

/// Integrate `f` over `[a, b]`, splitting first at every breakpoint strictly inside the range.
pub fn integrate_with_breakpoints<F>(
    mut f: F,
    a: f64,
    b: f64,
    breakpoints: &[f64],
    settings: &QuadratureSettings,
) -> WingBoxResult<f64>
where
    F: FnMut(f64) -> WingBoxResult<f64>,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(WingBoxError::domain(format!(
            "integration limits must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Ok(0.0);
    }
    let (lo, hi, sign) = if a < b { (a, b, 1.0) } else { (b, a, -1.0) };

    let mut edges: Vec<f64> = breakpoints
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > lo && *p < hi)
        .collect();
    edges.sort_by(f64::total_cmp);
    edges.dedup();
    edges.insert(0, lo);
    edges.push(hi);

    let mut segments = Vec::with_capacity(edges.len() + settings.limit);
    for w in edges.windows(2) {
        segments.push(kronrod21(&mut f, w[0], w[1])?);
    }

    let mut bisections = 0;
    loop {
        let total: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = settings.epsabs.max(settings.epsrel * total.abs());

        if !total.is_finite() || !error.is_finite() {
            return Err(WingBoxError::Integration {
                lower: a,
                upper: b,
                subdivisions: bisections,
                error_estimate: error,
                tolerance,
            });
        }
        if error <= tolerance {
            log::debug!(
                "quadrature [{a:.4}, {b:.4}] converged: {} intervals, error {error:.3e}",
                segments.len()
            );
            return Ok(sign * total);
        }
        if bisections >= settings.limit {
            return Err(WingBoxError::Integration {
                lower: a,
                upper: b,
                subdivisions: bisections,
                error_estimate: error,
                tolerance,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, s), (_, t)| s.error.total_cmp(&t.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        if mid <= seg.a || mid >= seg.b {
            // Interval can no longer be split in floating point
            return Err(WingBoxError::Integration {
                lower: a,
                upper: b,
                subdivisions: bisections,
                error_estimate: error,
                tolerance,
            });
        }
        segments.push(kronrod21(&mut f, seg.a, mid)?);
        segments.push(kronrod21(&mut f, mid, seg.b)?);
        bisections += 1;
    }
}

/// One 21-point Kronrod evaluation with the 10-point Gauss error estimate,
/// scaled the way QUADPACK's `qk21` does.
fn kronrod21<F>(f: &mut F, a: f64, b: f64) -> WingBoxResult<Segment>
where
    F: FnMut(f64) -> WingBoxResult<f64>,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = f(center)?;
    let mut res_gauss = 0.0;
    let mut res_kronrod = WGK[10] * fc;
    let mut res_abs = (WGK[10] * fc).abs();
    let mut fv1 = [0.0; 10];
    let mut fv2 = [0.0; 10];

    for j in 0..10 {
        let dx = half * XGK[j];
        let f1 = f(center - dx)?;
        let f2 = f(center + dx)?;
        fv1[j] = f1;
        fv2[j] = f2;
        res_kronrod += WGK[j] * (f1 + f2);
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * (f1 + f2);
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[10] * (fc - mean).abs();
    for j in 0..10 {
        res_asc += WGK[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_kronrod * half;
    let res_abs = res_abs * half.abs();
    let res_asc = res_asc * half.abs();
    let mut error = ((res_kronrod - res_gauss) * half).abs();

    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    let round_off = 50.0 * f64::EPSILON * res_abs;
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(round_off);
    }

    Ok(Segment { a, b, value, error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_exact() {
        let s = QuadratureSettings::default();
        let v = integrate(|x| Ok(3.0 * x * x + 2.0 * x - 1.0), -1.0, 2.0, &s).unwrap();
        // x^3 + x^2 - x from -1 to 2 = (8 + 4 - 2) - (-1 + 1 + 1)
        assert_relative_eq!(v, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_limits_flip_sign() {
        let s = QuadratureSettings::default();
        let forward = integrate(|x| Ok(x.exp()), 0.0, 1.0, &s).unwrap();
        let backward = integrate(|x| Ok(x.exp()), 1.0, 0.0, &s).unwrap();
        assert_relative_eq!(forward, -backward);
        assert_relative_eq!(forward, 1f64.exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_range_is_zero() {
        let s = QuadratureSettings::default();
        assert_eq!(integrate(|_| Ok(1.0), 4.0, 4.0, &s).unwrap(), 0.0);
    }

    #[test]
    fn test_step_with_breakpoint() {
        let s = QuadratureSettings::default();
        let step = |x: f64| Ok(if x <= 0.3 { 2.0 } else { 0.5 });
        let v = integrate_with_breakpoints(step, 0.0, 1.0, &[0.3], &s).unwrap();
        assert_relative_eq!(v, 2.0 * 0.3 + 0.5 * 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_adaptive_handles_peaked_integrand() {
        let s = QuadratureSettings::stiff();
        let v = integrate(|x| Ok(1.0 / (1e-4 + x * x)), -1.0, 1.0, &s).unwrap();
        let exact = 2.0 * (1.0 / 1e-2) * (1.0f64 / 1e-2).atan();
        assert_relative_eq!(v, exact, max_relative = 1e-6);
    }

    #[test]
    fn test_non_convergence_is_integration_error() {
        let s = QuadratureSettings {
            limit: 1,
            ..QuadratureSettings::default()
        };
        let err = integrate(|x| Ok((1.0 / (x + 1e-9)).sin()), 0.0, 1.0, &s).unwrap_err();
        assert!(matches!(err, WingBoxError::Integration { subdivisions: 1, .. }));
    }

    #[test]
    fn test_integrand_error_propagates() {
        let s = QuadratureSettings::default();
        let err = integrate(|x| if x > 0.5 { Err(WingBoxError::geometry(x)) } else { Ok(1.0) }, 0.0, 1.0, &s)
            .unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY_ERROR");
    }

    #[test]
    fn test_validate_rejects_zero_tolerances() {
        let s = QuadratureSettings {
            epsabs: 0.0,
            epsrel: 0.0,
            limit: 10,
        };
        assert!(s.validate("quadrature").is_err());
        assert!(QuadratureSettings::stiff().validate("stiff").is_ok());
    }
}

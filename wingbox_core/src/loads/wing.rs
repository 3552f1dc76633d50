//! # Wing and Aerodynamic Polars
//!
//! The aerodynamic surface carrying the wing box. Spanwise coefficient curves
//! come from a panel-method solution at two reference angles of attack
//! (0° and 10°); the wing blends them linearly with a single constant chosen
//! so the integrated lift matches the flight condition (see [`Wing::trim`]).
//!
//! ## Blending
//!
//! ```text
//! c(y) = c₀(y) + k·(c₁₀(y) − c₀(y))
//! k    = (CL_req − CL₀) / (CL₁₀ − CL₀)
//! α    = asin(k·sin 10°)
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};
use crate::geometry::WingBox;
use crate::loads::attachments::{Engine, FuelTank};
use crate::loads::load_case::FlightCondition;
use crate::numerics::Curve;

/// Angle of attack of the second reference polar [deg]
pub const REFERENCE_AOA_DEG: f64 = 10.0;

/// Spanwise coefficients from one panel-method run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroPolar {
    /// Section lift coefficient cl(y)
    pub cl: Curve,
    /// Section drag coefficient cd(y)
    pub cd: Curve,
    /// Section pitching-moment coefficient cm(y)
    pub cm: Curve,
    /// Centre of pressure from the leading edge, xcp(y) [m]
    pub xcp: Curve,
    /// Integrated wing lift coefficient
    pub total_cl: f64,
}

/// Result of trimming the wing to a flight condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trim {
    /// Wing lift coefficient needed for n·W
    pub required_cl: f64,
    /// Blend constant between the two polars
    pub blend: f64,
    /// Angle of attack [rad]
    pub aoa: f64,
}

/// Unvalidated wing description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WingSpec {
    #[serde(default)]
    pub name: String,
    /// Reference (planform) area S [m²]
    pub surface_area: f64,
    /// Chord c(y) [m]
    pub chord: Curve,
    /// Polar at 0° angle of attack
    pub polar_0: AeroPolar,
    /// Polar at 10° angle of attack
    pub polar_10: AeroPolar,
    /// Blend constant (overwritten when the wing is trimmed)
    #[serde(default)]
    pub blend: f64,
    /// Angle of attack [rad]
    #[serde(default)]
    pub aoa: f64,
    pub wing_box: WingBox,
    #[serde(default)]
    pub engine: Option<Engine>,
    #[serde(default)]
    pub fuel_tank: Option<FuelTank>,
}

/// Validated wing with its structure and attachments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WingSpec", into = "WingSpec")]
pub struct Wing {
    name: String,
    surface_area: f64,
    chord: Curve,
    polar_0: AeroPolar,
    polar_10: AeroPolar,
    blend: f64,
    aoa: f64,
    wing_box: WingBox,
    engine: Option<Engine>,
    fuel_tank: Option<FuelTank>,
}

impl Wing {
    /// Validate a description and build the wing
    pub fn new(spec: WingSpec) -> WingBoxResult<Self> {
        if !(spec.surface_area.is_finite() && spec.surface_area > 0.0) {
            return Err(WingBoxError::invalid_input(
                "wing.surface_area",
                spec.surface_area.to_string(),
                "Surface area must be positive",
            ));
        }
        for (field, value) in [("wing.blend", spec.blend), ("wing.aoa", spec.aoa)] {
            if !value.is_finite() {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Must be finite"));
            }
        }
        for y in [spec.wing_box.start_y(), spec.wing_box.end_y()] {
            let c = spec.chord.at(y);
            if !(c > 0.0) {
                return Err(WingBoxError::invalid_input(
                    "wing.chord",
                    c.to_string(),
                    format!("Chord must be positive over the wing box (y = {y})"),
                ));
            }
        }
        if let Some(engine) = &spec.engine {
            engine.validate()?;
        }
        if let Some(tank) = &spec.fuel_tank {
            tank.validate()?;
        }

        Ok(Wing {
            name: spec.name,
            surface_area: spec.surface_area,
            chord: spec.chord,
            polar_0: spec.polar_0,
            polar_10: spec.polar_10,
            blend: spec.blend,
            aoa: spec.aoa,
            wing_box: spec.wing_box,
            engine: spec.engine,
            fuel_tank: spec.fuel_tank,
        })
    }

    /// Blend constant and angle of attack that make the wing carry n·W.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when both polars have the same CL or the required lift
    /// is beyond what the blend can reach (|k·sin 10°| > 1).
    pub fn trim(&self, flight: &FlightCondition) -> WingBoxResult<Trim> {
        let required_cl = flight.load_factor * flight.aircraft_weight / (flight.dynamic_pressure() * self.surface_area);
        let spread = self.polar_10.total_cl - self.polar_0.total_cl;
        if spread.abs() < f64::EPSILON {
            return Err(WingBoxError::invalid_input(
                "wing.polar_10.total_cl",
                self.polar_10.total_cl.to_string(),
                "Reference polars must have different lift coefficients",
            ));
        }
        let blend = (required_cl - self.polar_0.total_cl) / spread;
        let sine = blend * REFERENCE_AOA_DEG.to_radians().sin();
        if !(-1.0..=1.0).contains(&sine) {
            return Err(WingBoxError::invalid_input(
                "flight",
                format!("CL = {required_cl:.3}"),
                "Required lift coefficient cannot be reached by blending the polars",
            ));
        }
        Ok(Trim {
            required_cl,
            blend,
            aoa: sine.asin(),
        })
    }

    /// The same wing trimmed for `flight`
    pub fn with_trim_for(mut self, flight: &FlightCondition) -> WingBoxResult<Self> {
        let trim = self.trim(flight)?;
        log::info!(
            "Trim: CL required {:.3}, blend {:.3}, angle of attack {:.2} [deg]",
            trim.required_cl,
            trim.blend,
            trim.aoa.to_degrees()
        );
        self.blend = trim.blend;
        self.aoa = trim.aoa;
        Ok(self)
    }

    /// The same wing with an explicit blend constant
    pub fn with_blend(mut self, blend: f64) -> Self {
        self.blend = blend;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    pub fn blend(&self) -> f64 {
        self.blend
    }

    /// Angle of attack [rad]
    pub fn aoa(&self) -> f64 {
        self.aoa
    }

    pub fn chord_curve(&self) -> &Curve {
        &self.chord
    }

    pub fn wing_box(&self) -> &WingBox {
        &self.wing_box
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn fuel_tank(&self) -> Option<&FuelTank> {
        self.fuel_tank.as_ref()
    }

    fn mix(&self, c0: f64, c10: f64) -> f64 {
        c0 + self.blend * (c10 - c0)
    }

    /// Chord c(y) [m]
    pub fn chord(&self, y: f64) -> f64 {
        self.chord.at(y)
    }

    pub fn cl(&self, y: f64) -> f64 {
        self.mix(self.polar_0.cl.at(y), self.polar_10.cl.at(y))
    }

    pub fn cd(&self, y: f64) -> f64 {
        self.mix(self.polar_0.cd.at(y), self.polar_10.cd.at(y))
    }

    pub fn cm(&self, y: f64) -> f64 {
        self.mix(self.polar_0.cm.at(y), self.polar_10.cm.at(y))
    }

    /// Centre of pressure from the leading edge [m]
    pub fn xcp(&self, y: f64) -> f64 {
        self.mix(self.polar_0.xcp.at(y), self.polar_10.xcp.at(y))
    }

    /// Lift per unit span q·cl·c [N/m]
    pub fn lift(&self, y: f64, dynamic_pressure: f64) -> f64 {
        dynamic_pressure * self.cl(y) * self.chord(y)
    }

    /// Drag per unit span q·cd·c [N/m]
    pub fn drag(&self, y: f64, dynamic_pressure: f64) -> f64 {
        dynamic_pressure * self.cd(y) * self.chord(y)
    }

    /// Pitching moment per unit span q·cm·c² [Nm/m]
    pub fn pitching_moment(&self, y: f64, dynamic_pressure: f64) -> f64 {
        dynamic_pressure * self.cm(y) * self.chord(y).powi(2)
    }

    /// Force normal to the chord per unit span [N/m]
    pub fn normal(&self, y: f64, dynamic_pressure: f64) -> f64 {
        self.aoa.cos() * self.lift(y, dynamic_pressure) + self.aoa.sin() * self.drag(y, dynamic_pressure)
    }

    /// Chord knots strictly inside `(a, b)` when the chord is piecewise linear
    pub fn chord_breakpoints(&self, a: f64, b: f64) -> Vec<f64> {
        match self.chord.mode() {
            crate::numerics::Interpolation::Linear => self.chord.knots_within(a, b),
            crate::numerics::Interpolation::Cubic => Vec::new(),
        }
    }
}

impl TryFrom<WingSpec> for Wing {
    type Error = WingBoxError;

    fn try_from(spec: WingSpec) -> Result<Self, Self::Error> {
        Wing::new(spec)
    }
}

impl From<Wing> for WingSpec {
    fn from(wing: Wing) -> Self {
        WingSpec {
            name: wing.name,
            surface_area: wing.surface_area,
            chord: wing.chord,
            polar_0: wing.polar_0,
            polar_10: wing.polar_10,
            blend: wing.blend,
            aoa: wing.aoa,
            wing_box: wing.wing_box,
            engine: wing.engine,
            fuel_tank: wing.fuel_tank,
        }
    }
}

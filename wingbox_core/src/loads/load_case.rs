//! Load case: a wing bound to a flight condition, a span sampling step and
//! the deflection/twist limits it is checked against.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};
use crate::loads::wing::Wing;
use crate::numerics::Interpolation;

/// Flight condition the wing is trimmed for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    /// Load factor n [-]
    pub load_factor: f64,
    /// True airspeed V [m/s]
    pub velocity: f64,
    /// Air density ρ [kg/m³]
    pub air_density: f64,
    /// Aircraft weight W [N]
    pub aircraft_weight: f64,
}

impl FlightCondition {
    /// Dynamic pressure ½ρV² [Pa]
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.air_density * self.velocity * self.velocity
    }

    pub fn validate(&self) -> WingBoxResult<()> {
        for (field, value) in [
            ("flight.velocity", self.velocity),
            ("flight.air_density", self.air_density),
            ("flight.aircraft_weight", self.aircraft_weight),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if !self.load_factor.is_finite() {
            return Err(WingBoxError::invalid_input(
                "flight.load_factor",
                self.load_factor.to_string(),
                "Must be finite",
            ));
        }
        Ok(())
    }
}

/// Stiffness limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Allowed tip deflection as a percentage of the full span (2·end_y) [%]
    pub deflection_percent: f64,
    /// Allowed tip twist [deg]
    pub twist_deg: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            deflection_percent: 15.0,
            twist_deg: 10.0,
        }
    }
}

/// Unvalidated load case, as stored in case files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCaseSpec {
    #[serde(default)]
    pub name: String,
    pub wing: Wing,
    pub flight: FlightCondition,
    /// Span sampling step [m]
    pub step: f64,
    #[serde(default)]
    pub limits: Limits,
    /// Trim the wing for the flight condition while loading
    #[serde(default = "default_trim")]
    pub trim: bool,
}

fn default_trim() -> bool {
    true
}

/// A fully populated load case with its span grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LoadCaseSpec", into = "LoadCaseSpec")]
pub struct LoadCase {
    name: String,
    wing: Wing,
    flight: FlightCondition,
    step: f64,
    limits: Limits,
    grid: Arc<[f64]>,
}

impl LoadCase {
    /// Bind a wing (used as given, not re-trimmed) to a flight condition.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive step, an invalid flight condition, or
    /// a step so coarse that the grid has fewer points than a cubic curve needs.
    pub fn new(
        name: impl Into<String>,
        wing: Wing,
        flight: FlightCondition,
        step: f64,
        limits: Limits,
    ) -> WingBoxResult<Self> {
        flight.validate()?;
        if !(step.is_finite() && step > 0.0) {
            return Err(WingBoxError::invalid_input("step", step.to_string(), "Span step must be positive"));
        }
        let wing_box = wing.wing_box();
        let grid = span_grid(wing_box.start_y(), wing_box.end_y(), step);
        let needed = Interpolation::Cubic.min_samples();
        if grid.len() < needed {
            return Err(WingBoxError::invalid_input(
                "step",
                step.to_string(),
                format!("Span grid has {} points; at least {needed} are needed", grid.len()),
            ));
        }

        Ok(LoadCase {
            name: name.into(),
            wing,
            flight,
            step,
            limits,
            grid: grid.into(),
        })
    }

    /// Trim the wing for `flight`, then bind it
    pub fn trimmed(
        name: impl Into<String>,
        wing: Wing,
        flight: FlightCondition,
        step: f64,
        limits: Limits,
    ) -> WingBoxResult<Self> {
        flight.validate()?;
        let wing = wing.with_trim_for(&flight)?;
        LoadCase::new(name, wing, flight, step, limits)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wing(&self) -> &Wing {
        &self.wing
    }

    pub fn flight(&self) -> &FlightCondition {
        &self.flight
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Span grid `start_y + i·step` for every value below `end_y`
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Dynamic pressure of the flight condition [Pa]
    pub fn dynamic_pressure(&self) -> f64 {
        self.flight.dynamic_pressure()
    }
}

/// `start + i·step` for all `i` with value `< end`
pub fn span_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start) / step).ceil().max(0.0) as usize;
    (0..count)
        .map(|i| start + i as f64 * step)
        .filter(|&y| y < end)
        .collect()
}

impl TryFrom<LoadCaseSpec> for LoadCase {
    type Error = WingBoxError;

    fn try_from(spec: LoadCaseSpec) -> Result<Self, Self::Error> {
        if spec.trim {
            LoadCase::trimmed(spec.name, spec.wing, spec.flight, spec.step, spec.limits)
        } else {
            LoadCase::new(spec.name, spec.wing, spec.flight, spec.step, spec.limits)
        }
    }
}

impl From<LoadCase> for LoadCaseSpec {
    fn from(case: LoadCase) -> Self {
        // The stored wing already carries its blend constant
        LoadCaseSpec {
            name: case.name,
            wing: case.wing,
            flight: case.flight,
            step: case.step,
            limits: case.limits,
            trim: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_grid_excludes_end() {
        let g = span_grid(0.0, 1.0, 0.25);
        assert_eq!(g, vec![0.0, 0.25, 0.5, 0.75]);
        let g = span_grid(0.0, 1.0, 0.3);
        assert_eq!(g.len(), 4);
        assert!((g[3] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_span_grid_offset_start() {
        let g = span_grid(1.5, 3.0, 0.5);
        assert_eq!(g, vec![1.5, 2.0, 2.5]);
    }

    #[test]
    fn test_dynamic_pressure() {
        let f = FlightCondition {
            load_factor: 1.0,
            velocity: 100.0,
            air_density: 1.225,
            aircraft_weight: 1.0,
        };
        assert!((f.dynamic_pressure() - 6125.0).abs() < 1e-9);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_flight_validation() {
        let f = FlightCondition {
            load_factor: 1.0,
            velocity: 0.0,
            air_density: 1.225,
            aircraft_weight: 1.0,
        };
        assert!(f.validate().is_err());
    }
}

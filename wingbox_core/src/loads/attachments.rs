//! Concentrated and tank loads carried by the wing box.
//!
//! Both act as step terms: the engine applies to every station inboard of its
//! mount (`y <= engine.y`), the fuel fills the closed interval
//! `[start_y, end_y]` of the box's enclosed cell.

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};
use crate::geometry::WingBox;

/// Default kerosene density [kg/m³]
pub const DEFAULT_FUEL_DENSITY: f64 = 804.0;

fn default_fuel_density() -> f64 {
    DEFAULT_FUEL_DENSITY
}

/// Wing-mounted engine
///
/// ## JSON Example
///
/// ```json
/// { "x": -1.2, "y": 4.5, "z": -0.8, "thrust": 60000.0, "weight": 18000.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    /// Chordwise offset of the engine's centre of gravity [m]
    pub x: f64,
    /// Span station of the mount [m]
    pub y: f64,
    /// Vertical offset of the thrust line [m]
    pub z: f64,
    /// Thrust [N]
    pub thrust: f64,
    /// Weight [N]
    pub weight: f64,
}

impl Engine {
    /// True when the engine is outboard of (or at) station `y`
    pub fn acts_at(&self, y: f64) -> bool {
        y <= self.y
    }

    /// Engine weight seen by the shear at `y` (subtracted from lift)
    pub fn shear_step(&self, y: f64) -> f64 {
        if self.acts_at(y) {
            self.weight
        } else {
            0.0
        }
    }

    /// Engine torque seen at `y`: thrust·z + weight·x
    pub fn torque_step(&self, y: f64) -> f64 {
        if self.acts_at(y) {
            self.thrust * self.z + self.weight * self.x
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> WingBoxResult<()> {
        for (field, value) in [
            ("engine.x", self.x),
            ("engine.y", self.y),
            ("engine.z", self.z),
            ("engine.thrust", self.thrust),
        ] {
            if !value.is_finite() {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Must be finite"));
            }
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(WingBoxError::invalid_input(
                "engine.weight",
                self.weight.to_string(),
                "Weight cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Integral fuel tank filling the wing-box cell over a span interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelTank {
    /// Inboard end [m]
    pub start_y: f64,
    /// Outboard end [m]
    pub end_y: f64,
    /// Fuel density [kg/m³]
    #[serde(default = "default_fuel_density")]
    pub density: f64,
}

impl FuelTank {
    /// Tank over `[start_y, end_y]` with the default fuel density
    pub fn new(start_y: f64, end_y: f64) -> Self {
        FuelTank {
            start_y,
            end_y,
            density: DEFAULT_FUEL_DENSITY,
        }
    }

    /// Closed-interval membership
    pub fn contains(&self, y: f64) -> bool {
        self.start_y <= y && y <= self.end_y
    }

    /// Fuel cross-section at `y`: the enclosed cell area inside the tank, zero outside
    pub fn cross_section(&self, y: f64, wing_box: &WingBox) -> WingBoxResult<f64> {
        if self.contains(y) {
            wing_box.enclosed_area(y)
        } else {
            Ok(0.0)
        }
    }

    pub fn validate(&self) -> WingBoxResult<()> {
        if !(self.start_y.is_finite() && self.end_y.is_finite() && self.start_y <= self.end_y) {
            return Err(WingBoxError::invalid_input(
                "fuel_tank.range",
                format!("{}, {}", self.start_y, self.end_y),
                "Tank range must be ordered",
            ));
        }
        if !(self.density.is_finite() && self.density >= 0.0) {
            return Err(WingBoxError::invalid_input(
                "fuel_tank.density",
                self.density.to_string(),
                "Density cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_step_includes_mount_station() {
        let e = Engine {
            x: -1.0,
            y: 4.0,
            z: -0.5,
            thrust: 1000.0,
            weight: 500.0,
        };
        assert_eq!(e.shear_step(4.0), 500.0);
        assert_eq!(e.shear_step(4.0001), 0.0);
        assert_eq!(e.torque_step(0.0), 1000.0 * -0.5 + 500.0 * -1.0);
        assert_eq!(e.torque_step(5.0), 0.0);
    }

    #[test]
    fn test_fuel_tank_closed_interval() {
        let t = FuelTank::new(1.0, 3.0);
        assert!(t.contains(1.0));
        assert!(t.contains(3.0));
        assert!(!t.contains(3.0 + 1e-12));
        assert_eq!(t.density, DEFAULT_FUEL_DENSITY);
    }

    #[test]
    fn test_fuel_density_defaults_in_json() {
        let t: FuelTank = serde_json::from_str(r#"{"start_y":0.5,"end_y":2.0}"#).unwrap();
        assert_eq!(t.density, 804.0);
    }

    #[test]
    fn test_validation() {
        assert!(FuelTank::new(3.0, 1.0).validate().is_err());
        let e = Engine {
            x: 0.0,
            y: 1.0,
            z: 0.0,
            thrust: 0.0,
            weight: -1.0,
        };
        assert!(e.validate().is_err());
    }
}

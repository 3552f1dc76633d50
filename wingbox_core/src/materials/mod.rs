//! # Materials
//!
//! Isotropic material properties for the wing-box skins, spars and stringers.
//! A [`Material`] can be written out in full in a case file or taken from one
//! of the bundled [`AlloyPreset`]s.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::materials::{AlloyPreset, Material};
//!
//! let al = Material::preset(AlloyPreset::Al2024T3);
//! assert!(al.validate().is_ok());
//! println!("E = {:.1} GPa, yield = {:.0} MPa", al.e_modulus / 1e9, al.yield_stress / 1e6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingBoxError, WingBoxResult};

/// Bundled aerospace aluminium alloys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlloyPreset {
    /// Al 2024-T3 sheet
    #[serde(rename = "Al2024-T3")]
    Al2024T3,
    /// Al 7075-T6 sheet
    #[serde(rename = "Al7075-T6")]
    Al7075T6,
}

impl AlloyPreset {
    /// All presets, in display order
    pub const ALL: [AlloyPreset; 2] = [AlloyPreset::Al2024T3, AlloyPreset::Al7075T6];

    /// Short code used in case files
    pub fn code(&self) -> &'static str {
        match self {
            AlloyPreset::Al2024T3 => "Al2024-T3",
            AlloyPreset::Al7075T6 => "Al7075-T6",
        }
    }

    /// Parse from common spellings ("2024-T3", "al 7075 t6", ...)
    pub fn from_str_flexible(s: &str) -> WingBoxResult<Self> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.trim_start_matches("al") {
            "2024t3" => Ok(AlloyPreset::Al2024T3),
            "7075t6" => Ok(AlloyPreset::Al7075T6),
            _ => Err(WingBoxError::invalid_input(
                "material",
                s,
                "Unknown alloy (expected Al2024-T3 or Al7075-T6)",
            )),
        }
    }
}

impl std::fmt::Display for AlloyPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Elastic and strength properties of an isotropic material (SI units).
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Al2024-T3",
///   "e_modulus": 73.1e9,
///   "shear_modulus": 28.0e9,
///   "poisson_ratio": 0.33,
///   "yield_stress": 345.0e6,
///   "density": 2780.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Young's modulus E [Pa]
    pub e_modulus: f64,
    /// Shear modulus G [Pa]
    pub shear_modulus: f64,
    /// Poisson ratio ν [-]
    pub poisson_ratio: f64,
    /// Tensile yield stress [Pa]
    pub yield_stress: f64,
    /// Density [kg/m³]
    pub density: f64,
}

impl Material {
    /// Properties of a bundled alloy
    pub fn preset(alloy: AlloyPreset) -> Self {
        let (e, g, nu, fy, rho) = match alloy {
            AlloyPreset::Al2024T3 => (73.1e9, 28.0e9, 0.33, 345.0e6, 2780.0),
            AlloyPreset::Al7075T6 => (71.7e9, 26.9e9, 0.33, 503.0e6, 2810.0),
        };
        Material {
            name: alloy.code().to_string(),
            e_modulus: e,
            shear_modulus: g,
            poisson_ratio: nu,
            yield_stress: fy,
            density: rho,
        }
    }

    /// Plate flexural stiffness factor E/(12·(1 − ν²))
    pub fn plate_stiffness(&self) -> f64 {
        self.e_modulus / (12.0 * (1.0 - self.poisson_ratio * self.poisson_ratio))
    }

    /// Validate material properties
    pub fn validate(&self) -> WingBoxResult<()> {
        let positive = [
            ("material.e_modulus", self.e_modulus),
            ("material.shear_modulus", self.shear_modulus),
            ("material.yield_stress", self.yield_stress),
            ("material.density", self.density),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(WingBoxError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a positive finite number",
                ));
            }
        }
        if !(self.poisson_ratio > -1.0 && self.poisson_ratio < 0.5) {
            return Err(WingBoxError::invalid_input(
                "material.poisson_ratio",
                self.poisson_ratio.to_string(),
                "Poisson ratio must lie in (-1, 0.5)",
            ));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::preset(AlloyPreset::Al2024T3)
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (E = {:.1} GPa, G = {:.1} GPa, Fy = {:.0} MPa)",
            self.name,
            self.e_modulus / 1e9,
            self.shear_modulus / 1e9,
            self.yield_stress / 1e6
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for alloy in AlloyPreset::ALL {
            assert!(Material::preset(alloy).validate().is_ok(), "{alloy}");
        }
    }

    #[test]
    fn test_alloy_parsing() {
        assert_eq!(AlloyPreset::from_str_flexible("2024-T3").unwrap(), AlloyPreset::Al2024T3);
        assert_eq!(AlloyPreset::from_str_flexible("Al 7075 T6").unwrap(), AlloyPreset::Al7075T6);
        assert!(AlloyPreset::from_str_flexible("6061").is_err());
    }

    #[test]
    fn test_invalid_poisson() {
        let mut m = Material::default();
        m.poisson_ratio = 0.5;
        assert!(matches!(m.validate(), Err(WingBoxError::InvalidInput { .. })));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&AlloyPreset::Al7075T6).unwrap();
        assert_eq!(json, "\"Al7075-T6\"");
        let m = Material::preset(AlloyPreset::Al7075T6);
        let back: Material = serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn test_plate_stiffness() {
        let m = Material {
            name: "test".into(),
            e_modulus: 12.0,
            shear_modulus: 1.0,
            poisson_ratio: 0.0,
            yield_stress: 1.0,
            density: 1.0,
        };
        assert_eq!(m.plate_stiffness(), 1.0);
    }
}

//! # Case Files
//!
//! The `CaseFile` struct is the root container for one analysis run.
//! Cases serialize to `.wbx` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! CaseFile
//! ├── version: schema version (for migration compatibility)
//! ├── name: display name
//! ├── settings: AnalysisSettings (workers, quadrature, model constants)
//! ├── tables: BucklingTables (ks / kc charts)
//! └── load_case: LoadCase (wing, wing box, flight condition, limits)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::case::{CaseFile, SCHEMA_VERSION};
//!
//! let case = CaseFile::sample().unwrap();
//! assert_eq!(case.version, SCHEMA_VERSION);
//!
//! let json = serde_json::to_string_pretty(&case).unwrap();
//! let back: CaseFile = serde_json::from_str(&json).unwrap();
//! assert_eq!(back.load_case.grid().len(), case.load_case.grid().len());
//! ```

use serde::{Deserialize, Serialize};

use crate::coefficients::BucklingTables;
use crate::errors::{WingBoxError, WingBoxResult};
use crate::geometry::{GeometryFunction, StringerSet, StringerType, Surface, WingBox, WingBoxSection, WingBoxSpec};
use crate::loads::{AeroPolar, Engine, FlightCondition, FuelTank, Limits, LoadCase, Wing, WingSpec};
use crate::materials::{AlloyPreset, Material};
use crate::numerics::{default_workers, Curve, QuadratureSettings, SpanEvaluator};

/// Current schema version for .wbx files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Lever arm used by the torsion integrand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorsionModel {
    /// lift·(xcp − flexural_axis·c)
    #[default]
    CenterOfPressure,
    /// q·cm·c²
    PitchingMoment,
}

/// Spar web edge restraint, selects the shear buckling chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebEdgeSupport {
    #[default]
    Clamped,
    Hinged,
}

/// Which branches of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    #[default]
    All,
    /// Shear, moment, rotation, deflection
    Deflection,
    /// Torsion, twist
    Twist,
    /// Panel stress and every buckling check
    Stress,
}

impl AnalysisScope {
    pub fn includes_deflection(&self) -> bool {
        matches!(self, AnalysisScope::All | AnalysisScope::Deflection)
    }

    pub fn includes_twist(&self) -> bool {
        matches!(self, AnalysisScope::All | AnalysisScope::Twist)
    }

    pub fn includes_stress(&self) -> bool {
        matches!(self, AnalysisScope::All | AnalysisScope::Stress)
    }

    /// Parse a CLI-style name (case-insensitive)
    pub fn from_str_flexible(s: &str) -> WingBoxResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AnalysisScope::All),
            "deflection" => Ok(AnalysisScope::Deflection),
            "twist" => Ok(AnalysisScope::Twist),
            "stress" => Ok(AnalysisScope::Stress),
            _ => Err(WingBoxError::invalid_input(
                "analyses",
                s,
                "Expected one of: all, deflection, twist, stress",
            )),
        }
    }
}

/// Numerical settings and model constants for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Worker threads for span evaluation (None = hardware parallelism)
    pub workers: Option<usize>,

    /// Quadrature for the y→tip integrals (shear, moment, torsion)
    pub quadrature: QuadratureSettings,

    /// Quadrature for the root→y integrals (rotation, deflection, twist)
    pub stiff_quadrature: QuadratureSettings,

    /// Gravitational acceleration [m/s²]
    pub gravity: f64,

    /// Skin, rib and fastener weight per unit chord, as an equivalent area [m²/m]
    pub structure_allowance: f64,

    /// Flexural axis position as a chord fraction from the leading edge
    pub flexural_axis: f64,

    pub torsion_model: TorsionModel,

    /// Cap on the skin plate aspect ratio a/b before the kc lookup
    pub skin_aspect_cap: f64,

    /// Column end-fixity coefficient K in K·π²·E·I/L²
    pub column_end_fixity: f64,

    pub web_edge: WebEdgeSupport,

    pub analyses: AnalysisScope,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            workers: None,
            quadrature: QuadratureSettings::default(),
            stiff_quadrature: QuadratureSettings::stiff(),
            gravity: 9.81,
            structure_allowance: 2.06e-3,
            flexural_axis: 0.4,
            torsion_model: TorsionModel::default(),
            skin_aspect_cap: 5.0,
            column_end_fixity: 1.0,
            web_edge: WebEdgeSupport::default(),
            analyses: AnalysisScope::default(),
        }
    }
}

impl AnalysisSettings {
    /// Span evaluator sized per `workers`
    pub fn evaluator(&self) -> SpanEvaluator {
        SpanEvaluator::new(self.workers.unwrap_or_else(default_workers))
    }

    pub fn validate(&self) -> WingBoxResult<()> {
        self.quadrature.validate("settings.quadrature")?;
        self.stiff_quadrature.validate("settings.stiff_quadrature")?;
        if self.workers == Some(0) {
            return Err(WingBoxError::invalid_input(
                "settings.workers",
                "0",
                "At least one worker is required",
            ));
        }
        for (field, value) in [
            ("settings.gravity", self.gravity),
            ("settings.skin_aspect_cap", self.skin_aspect_cap),
            ("settings.column_end_fixity", self.column_end_fixity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WingBoxError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if !(self.structure_allowance.is_finite() && self.structure_allowance >= 0.0) {
            return Err(WingBoxError::invalid_input(
                "settings.structure_allowance",
                self.structure_allowance.to_string(),
                "Cannot be negative",
            ));
        }
        if !self.flexural_axis.is_finite() {
            return Err(WingBoxError::invalid_input(
                "settings.flexural_axis",
                self.flexural_axis.to_string(),
                "Must be finite",
            ));
        }
        Ok(())
    }
}

/// Root case container.
///
/// This is the top-level struct that gets serialized to `.wbx` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// Schema version
    pub version: String,

    /// Display name of the case
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub settings: AnalysisSettings,

    /// Buckling coefficient charts (bundled charts when omitted)
    #[serde(default)]
    pub tables: BucklingTables,

    pub load_case: LoadCase,
}

impl CaseFile {
    /// Wrap a load case with default settings and the bundled charts
    pub fn new(load_case: LoadCase) -> Self {
        CaseFile {
            version: SCHEMA_VERSION.to_string(),
            name: load_case.name().to_string(),
            settings: AnalysisSettings::default(),
            tables: BucklingTables::standard(),
            load_case,
        }
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Check the settings; the load case validated itself on construction
    pub fn validate(&self) -> WingBoxResult<()> {
        self.settings.validate()
    }

    /// A complete demonstration case: a 15 m tapered semi-span box in three
    /// sections with corner and skin stringers, an underwing engine and an
    /// inboard tank, trimmed for a 2.5 g pull-up.
    pub fn sample() -> WingBoxResult<Self> {
        let material = Material::preset(AlloyPreset::Al7075T6);
        let [top_corners, bottom_corners] = StringerSet::corner_pair(0.04, 0.04, 0.004);
        let skin_stringers = |surface| StringerSet {
            stringer: StringerType::Zee,
            amount: 4,
            width: 0.03,
            height: 0.035,
            thickness: 0.003,
            start_x: 0.2,
            end_x: 0.8,
            surface,
        };

        let wing_box = WingBox::new(
            WingBoxSpec::new("sample box", 0.0, 15.0, material)
                .with_width(GeometryFunction::taper(0.0, 1.2, 15.0, 0.6))
                .with_height(GeometryFunction::taper(0.0, 0.5, 15.0, 0.25))
                .with_section(
                    WingBoxSection::uniform(0.0, 5.0, 0.008, 0.015)
                        .with_stringers(top_corners.clone())
                        .with_stringers(bottom_corners.clone())
                        .with_stringers(skin_stringers(Surface::Top))
                        .with_stringers(skin_stringers(Surface::Bottom)),
                )
                .with_section(
                    WingBoxSection::uniform(5.0, 10.0, 0.006, 0.010)
                        .with_stringers(top_corners.clone())
                        .with_stringers(bottom_corners.clone())
                        .with_stringers(skin_stringers(Surface::Top)),
                )
                .with_section(
                    WingBoxSection::uniform(10.0, 15.0, 0.004, 0.006)
                        .with_stringers(top_corners)
                        .with_stringers(bottom_corners),
                ),
        )?;

        let span = [0.0, 15.0];
        let polar = |cl_root: f64, cl_tip: f64, total_cl: f64| -> WingBoxResult<AeroPolar> {
            Ok(AeroPolar {
                cl: Curve::linear(&span, &[cl_root, cl_tip])?,
                cd: Curve::linear(&span, &[0.008, 0.012])?,
                cm: Curve::linear(&span, &[-0.08, -0.06])?,
                xcp: Curve::linear(&span, &[1.35, 0.55])?,
                total_cl,
            })
        };

        let wing = Wing::new(WingSpec {
            name: "sample wing".to_string(),
            surface_area: 105.0,
            chord: Curve::linear(&span, &[5.0, 2.0])?,
            polar_0: polar(0.30, 0.18, 0.25)?,
            polar_10: polar(1.20, 0.85, 1.05)?,
            blend: 0.0,
            aoa: 0.0,
            wing_box,
            engine: Some(Engine {
                x: -1.5,
                y: 4.5,
                z: -0.9,
                thrust: 60_000.0,
                weight: 20_000.0,
            }),
            fuel_tank: Some(FuelTank::new(0.5, 9.0)),
        })?;

        let flight = FlightCondition {
            load_factor: 2.5,
            velocity: 120.0,
            air_density: 1.0,
            aircraft_weight: 250_000.0,
        };
        let load_case = LoadCase::trimmed("sample 2.5 g pull-up", wing, flight, 0.25, Limits::default())?;
        Ok(CaseFile::new(load_case))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let s = AnalysisSettings::default();
        assert_eq!(s.quadrature.limit, 50);
        assert_eq!(s.stiff_quadrature.limit, 200);
        assert_eq!(s.structure_allowance, 2.06e-3);
        assert_eq!(s.flexural_axis, 0.4);
        assert_eq!(s.skin_aspect_cap, 5.0);
        assert_eq!(s.torsion_model, TorsionModel::CenterOfPressure);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_settings_fill_missing_fields() {
        let s: AnalysisSettings = serde_json::from_str(r#"{"workers": 3, "torsion_model": "pitching_moment"}"#).unwrap();
        assert_eq!(s.workers, Some(3));
        assert_eq!(s.torsion_model, TorsionModel::PitchingMoment);
        assert_eq!(s.gravity, 9.81);
        assert_eq!(s.evaluator().workers(), 3);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let s = AnalysisSettings {
            workers: Some(0),
            ..AnalysisSettings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_scope() {
        assert!(AnalysisScope::All.includes_stress());
        assert!(!AnalysisScope::Twist.includes_deflection());
        assert_eq!(AnalysisScope::from_str_flexible("Stress").unwrap(), AnalysisScope::Stress);
        assert!(AnalysisScope::from_str_flexible("flutter").is_err());
    }

    #[test]
    fn test_sample_case_roundtrip() {
        let case = CaseFile::sample().unwrap();
        assert_eq!(case.version, SCHEMA_VERSION);
        assert_eq!(case.load_case.wing().wing_box().sections().len(), 3);
        assert!(case.load_case.wing().blend() > 0.0);

        let json = serde_json::to_string_pretty(&case).unwrap();
        assert!(json.contains("\"load_case\""));
        let back: CaseFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.load_case.wing().blend(), case.load_case.wing().blend());
        assert_eq!(back.load_case.grid(), case.load_case.grid());
    }

    #[test]
    fn test_tables_default_when_omitted() {
        let case = CaseFile::sample().unwrap();
        let mut value = serde_json::to_value(&case).unwrap();
        value.as_object_mut().unwrap().remove("tables");
        value.as_object_mut().unwrap().remove("settings");
        let back: CaseFile = serde_json::from_value(value).unwrap();
        assert_eq!(back.tables, BucklingTables::standard());
        assert_eq!(back.settings, AnalysisSettings::default());
    }
}

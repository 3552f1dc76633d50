//! # Analysis Report
//!
//! Everything a run produces: the named span curves, peak summaries, the
//! stiffness and yield checks, and one margin table per buckling check.
//! The report is plain data and serializes to JSON (see
//! [`crate::file_io::save_report`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{MarginTable, StiffnessCheck, YieldCheck};
use crate::numerics::Curve;

/// Curve keys used in [`AnalysisReport::curves`]
pub mod names {
    pub const LIFT: &str = "lift";
    pub const SHEAR: &str = "shear";
    pub const MOMENT: &str = "moment";
    pub const ROTATION: &str = "rotation";
    pub const DEFLECTION: &str = "deflection";
    pub const TORSION: &str = "torsion";
    pub const TWIST: &str = "twist";
    pub const MOI_XX: &str = "moi_xx";
    pub const MOI_POLAR: &str = "moi_polar";
    pub const TOP_PANEL_STRESS: &str = "top_panel_stress";
    pub const BOTTOM_PANEL_STRESS: &str = "bottom_panel_stress";
}

/// Report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Schema version of the case file the report was produced from
    pub version: String,
    pub case_name: String,
    pub generated: DateTime<Utc>,
    pub workers: usize,
    pub grid_points: usize,
    /// Span step [m]
    pub step: f64,
}

/// Aerodynamic state the loads were computed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSummary {
    pub blend: f64,
    pub aoa_deg: f64,
    /// [Pa]
    pub dynamic_pressure: f64,
}

/// Largest-magnitude sample of a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub y: f64,
    pub value: f64,
}

impl Peak {
    pub fn of(curve: &Curve) -> Self {
        let (y, value) = curve.peak_magnitude();
        Peak { y, value }
    }
}

/// Pass/fail line for one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Results of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub meta: ReportMetadata,
    pub trim: TrimSummary,
    /// Box structure weight including the skin/rib allowance [N]
    pub structure_weight: f64,
    /// Peak magnitude of every curve, by curve name
    pub peaks: BTreeMap<String, Peak>,
    /// Sampled curves by name (see [`names`])
    pub curves: BTreeMap<String, Curve>,
    pub deflection: Option<StiffnessCheck>,
    pub twist: Option<StiffnessCheck>,
    /// Top and bottom skin yield checks
    #[serde(default)]
    pub panel_stress: Vec<YieldCheck>,
    /// Shear, skin and column buckling tables
    #[serde(default)]
    pub margins: Vec<MarginTable>,
}

impl AnalysisReport {
    pub fn new(meta: ReportMetadata, trim: TrimSummary) -> Self {
        AnalysisReport {
            meta,
            trim,
            structure_weight: 0.0,
            peaks: BTreeMap::new(),
            curves: BTreeMap::new(),
            deflection: None,
            twist: None,
            panel_stress: Vec::new(),
            margins: Vec::new(),
        }
    }

    /// Store a curve and its peak under `name`
    pub fn add_curve(&mut self, name: &str, curve: &Curve) {
        self.peaks.insert(name.to_string(), Peak::of(curve));
        self.curves.insert(name.to_string(), curve.clone());
    }

    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.get(name)
    }

    pub fn peak(&self, name: &str) -> Option<Peak> {
        self.peaks.get(name).copied()
    }

    /// Margin table of a buckling check by name
    pub fn margin_table(&self, check: &str) -> Option<&MarginTable> {
        self.margins.iter().find(|t| t.check == check)
    }

    /// One outcome per check that was run
    pub fn checks(&self) -> Vec<CheckOutcome> {
        let mut checks = Vec::new();
        if let Some(d) = &self.deflection {
            checks.push(CheckOutcome {
                name: "deflection".to_string(),
                passed: d.passed,
                detail: format!("tip {:.2} % of span, limit {:.1} %", d.measure, d.limit),
            });
        }
        if let Some(t) = &self.twist {
            checks.push(CheckOutcome {
                name: "twist".to_string(),
                passed: t.passed,
                detail: format!("tip {:.2} deg, limit {:.1} deg", t.measure, t.limit),
            });
        }
        for y in &self.panel_stress {
            checks.push(CheckOutcome {
                name: format!("{} panel yield", y.surface),
                passed: y.passed,
                detail: format!(
                    "peak {:.1} MPa at y = {:.2} m, yield {:.1} MPa",
                    y.peak_stress / 1e6,
                    y.peak_y,
                    y.yield_stress / 1e6
                ),
            });
        }
        for table in &self.margins {
            let detail = match table.governing() {
                Some(row) => format!(
                    "lowest margin {:.2} in section {:.2}-{:.2} m on {}",
                    row.margin.unwrap_or(f64::INFINITY),
                    row.start_y,
                    row.end_y,
                    row.controlling.as_deref().unwrap_or("-")
                ),
                None => "not critical".to_string(),
            };
            checks.push(CheckOutcome {
                name: table.check.clone(),
                passed: table.passed(),
                detail,
            });
        }
        checks
    }

    /// True when every check that was run passed
    pub fn passed(&self) -> bool {
        self.checks().iter().all(|c| c.passed)
    }
}

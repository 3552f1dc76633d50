//! # wingbox_core - Wing-Box Load and Margin Analysis Engine
//!
//! `wingbox_core` takes a wing (planform, aerodynamic polars, engine, fuel
//! tank) and its structural box (spars, skin panels, stringer sets) at one
//! flight condition and produces the spanwise load curves, the elastic
//! response, and the buckling margins of every section.
//!
//! ## Design Philosophy
//!
//! - **On-demand pipeline**: Each stage is computed once, when first needed
//! - **JSON-First**: Case files and reports implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Parallel sampling**: Every span curve is a fork-join over the grid
//!
//! ## Quick Start
//!
//! ```rust
//! use wingbox_core::{Analysis, CaseFile};
//!
//! let case = CaseFile::sample().unwrap();
//! let report = Analysis::from_case(&case).unwrap().run().unwrap();
//!
//! for check in report.checks() {
//!     println!("{}: {}", check.name, if check.passed { "OK" } else { "FAIL" });
//! }
//! ```
//!
//! ## Modules
//!
//! - [`numerics`] - Interpolated curves, adaptive quadrature, parallel span sampling
//! - [`equations`] - Section property and buckling formulas
//! - [`materials`] - Aluminium alloy presets
//! - [`geometry`] - Wing box, sections, stringer sets, skin plates
//! - [`loads`] - Wing aerodynamics, engine, fuel tank, load case
//! - [`coefficients`] - Plate buckling coefficient tables
//! - [`analysis`] - The load and margin pipeline
//! - [`case`] - Case file and analysis settings
//! - [`report`] - Analysis results
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic case and report saves

pub mod analysis;
pub mod case;
pub mod coefficients;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod loads;
pub mod materials;
pub mod numerics;
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use analysis::Analysis;
pub use case::{AnalysisScope, AnalysisSettings, CaseFile};
pub use errors::{WingBoxError, WingBoxResult};
pub use file_io::{load_case_file, save_case_file, save_report};
pub use report::AnalysisReport;

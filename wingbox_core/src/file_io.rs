//! # File I/O Module
//!
//! Handles case and report files with safety features:
//! - **Atomic saves**: Write to .tmp, verify, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Cases are saved as `.wbx` files containing JSON; reports are plain JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wingbox_core::case::CaseFile;
//! use wingbox_core::file_io::{load_case_file, save_case_file};
//! use std::path::Path;
//!
//! let case = CaseFile::sample()?;
//! let path = Path::new("sample.wbx");
//!
//! save_case_file(&case, path)?;
//! let loaded = load_case_file(path)?;
//! assert_eq!(loaded.version, case.version);
//! # Ok::<(), wingbox_core::errors::WingBoxError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::case::{CaseFile, SCHEMA_VERSION};
use crate::errors::{WingBoxError, WingBoxResult};
use crate::report::AnalysisReport;

/// Temp path next to `path`: `name.ext.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Serialize `value` to `path` with atomic write semantics.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to a temporary file (.tmp) and sync it to disk
/// 3. Re-read the temporary file and parse it back as `T`
/// 4. Rename .tmp over the target (atomic on most filesystems)
fn save_atomic<T>(value: &T, path: &Path) -> WingBoxResult<()>
where
    T: Serialize + DeserializeOwned,
{
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        WingBoxError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        WingBoxError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        WingBoxError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    // Verify
    let written = read_to_string(&tmp_path)?;
    if let Err(e) = serde_json::from_str::<T>(&written) {
        let _ = fs::remove_file(&tmp_path);
        return Err(WingBoxError::SerializationError {
            reason: format!("Verification of {} failed: {}", tmp_path.display(), e),
        });
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        WingBoxError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("Saved {}", path.display());
    Ok(())
}

fn read_to_string(path: &Path) -> WingBoxResult<String> {
    let mut file = File::open(path)
        .map_err(|e| WingBoxError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| WingBoxError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Save a case file atomically.
pub fn save_case_file(case: &CaseFile, path: &Path) -> WingBoxResult<()> {
    save_atomic(case, path)
}

/// Save an analysis report atomically.
///
/// # Example
///
/// ```rust,no_run
/// use wingbox_core::analysis::Analysis;
/// use wingbox_core::case::CaseFile;
/// use wingbox_core::file_io::save_report;
/// use std::path::Path;
///
/// let case = CaseFile::sample()?;
/// let report = Analysis::from_case(&case)?.run()?;
/// save_report(&report, Path::new("report.json"))?;
/// # Ok::<(), wingbox_core::errors::WingBoxError>(())
/// ```
pub fn save_report(report: &AnalysisReport, path: &Path) -> WingBoxResult<()> {
    save_atomic(report, path)
}

/// Load a case file.
///
/// # Returns
///
/// * `Ok(CaseFile)` - Successfully loaded and validated case
/// * `Err(WingBoxError::VersionMismatch)` - File version is incompatible
/// * `Err(WingBoxError::SerializationError)` - Invalid JSON
/// * `Err(WingBoxError::InvalidInput)` - The model failed validation
/// * `Err(WingBoxError::FileError)` - I/O error
pub fn load_case_file(path: &Path) -> WingBoxResult<CaseFile> {
    let contents = read_to_string(path)?;

    // Check the version before the full parse so an old layout reports as a version problem
    let header: serde_json::Value = serde_json::from_str(&contents).map_err(|e| WingBoxError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    let version = header
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    validate_version(version)?;

    let case: CaseFile = serde_json::from_value(header).map_err(|e| WingBoxError::SerializationError {
        reason: format!("Invalid case in {}: {}", path.display(), e),
    })?;
    case.validate()?;

    log::info!("Loaded case '{}' from {}", case.name, path.display());
    Ok(case)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> WingBoxResult<()> {
    let mismatch = || WingBoxError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

//! Per-section margin-of-safety reduction.
//!
//! Failure analyzers produce one or more [`MarginSample`]s per span position.
//! The caller folds them sequentially into a [`MarginTable`] that keeps, for
//! every wing-box section, the smallest margin and the element that produced
//! it.
//!
//! ## Convention
//!
//! ```text
//! margin = critical / actual        margin < 1 ⇒ failed
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::WingBoxSection;

/// Margin found at one span position for one element of a section
#[derive(Debug, Clone, PartialEq)]
pub struct MarginSample {
    /// Key of the section the position falls in
    pub section: usize,
    pub margin: f64,
    /// Element that produced the margin (spar, plate, stringer set)
    pub element: String,
}

/// Smallest margin of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginRow {
    pub section: usize,
    pub start_y: f64,
    pub end_y: f64,
    /// `None` when no sampled position produced a qualifying margin
    pub margin: Option<f64>,
    pub controlling: Option<String>,
}

impl MarginRow {
    pub fn passed(&self) -> bool {
        self.margin.map_or(true, |m| m >= 1.0)
    }
}

/// Per-section minimum margins of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTable {
    /// Check name, e.g. "shear buckling"
    pub check: String,
    pub rows: Vec<MarginRow>,
}

impl MarginTable {
    /// Empty table with one row per section
    pub fn new(check: impl Into<String>, sections: &[WingBoxSection]) -> Self {
        MarginTable {
            check: check.into(),
            rows: sections
                .iter()
                .map(|s| MarginRow {
                    section: s.index(),
                    start_y: s.start_y,
                    end_y: s.end_y,
                    margin: None,
                    controlling: None,
                })
                .collect(),
        }
    }

    /// Keep `sample` if it is the lowest margin of its section so far.
    /// Non-finite margins are ignored.
    pub fn offer(&mut self, sample: MarginSample) {
        if !sample.margin.is_finite() {
            return;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.section == sample.section) else {
            return;
        };
        if row.margin.map_or(true, |m| sample.margin < m) {
            row.margin = Some(sample.margin);
            row.controlling = Some(sample.element);
        }
    }

    /// Fold a batch of samples
    pub fn reduce<I>(check: impl Into<String>, sections: &[WingBoxSection], samples: I) -> Self
    where
        I: IntoIterator<Item = MarginSample>,
    {
        let mut table = MarginTable::new(check, sections);
        for sample in samples {
            table.offer(sample);
        }
        table
    }

    /// Lowest margin over all sections
    pub fn minimum(&self) -> Option<f64> {
        self.rows.iter().filter_map(|r| r.margin).min_by(f64::total_cmp)
    }

    /// Row holding the lowest margin
    pub fn governing(&self) -> Option<&MarginRow> {
        self.rows
            .iter()
            .filter(|r| r.margin.is_some())
            .min_by(|a, b| f64::total_cmp(&a.margin.unwrap_or(f64::MAX), &b.margin.unwrap_or(f64::MAX)))
    }

    /// True when no section has a margin below one
    pub fn passed(&self) -> bool {
        self.rows.iter().all(MarginRow::passed)
    }

    /// Rows with a margin below one
    pub fn failed_rows(&self) -> impl Iterator<Item = &MarginRow> {
        self.rows.iter().filter(|r| !r.passed())
    }

    /// Log one line per section, warning on failed sections
    pub fn log(&self) {
        for row in &self.rows {
            match (row.margin, &row.controlling) {
                (Some(m), Some(element)) if m < 1.0 => log::warn!(
                    "{}: section {:.2}-{:.2} m, margin {:.2} on {} [FAIL]",
                    self.check,
                    row.start_y,
                    row.end_y,
                    m,
                    element
                ),
                (Some(m), Some(element)) => log::info!(
                    "{}: section {:.2}-{:.2} m, margin {:.2} on {}",
                    self.check,
                    row.start_y,
                    row.end_y,
                    m,
                    element
                ),
                _ => log::info!(
                    "{}: section {:.2}-{:.2} m, not critical",
                    self.check,
                    row.start_y,
                    row.end_y
                ),
            }
        }
        if !self.passed() {
            log::warn!("Wing box failed due to {}", self.check);
        }
    }
}

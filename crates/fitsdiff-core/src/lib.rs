//! Structural and numeric diff engine for FITS files.
//!
//! Two inputs are walked unit by unit: header keywords are grouped and
//! compared by occurrence, then image payloads or table columns are compared
//! element-wise under an optional relative tolerance. Findings accumulate in
//! a textual report; only an unreadable input or a unit-count mismatch aborts
//! a run.

pub mod diff;
pub mod domain;
pub mod hdu;

pub use diff::{
    CoordinateSet, DiffConfig, DiffLog, DiffReport, ExclusionSet, HeaderIndex, PrintBudget,
    UnitDiffSummary, compare_hdu_lists, display_location, locate_differences, run_diff,
};
pub use domain::{DiffResult, FileLabels, FitsDiffError};
pub use hdu::{
    Card, CardValue, Column, ElementArray, ElementKind, Hdu, HduList, HduSource, Payload,
    SnapshotReader,
};

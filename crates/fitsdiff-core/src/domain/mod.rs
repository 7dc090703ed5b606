pub mod errors;

pub use errors::{DiffResult, FitsDiffError};

/// Display names for the two sides of a comparison, printed verbatim in
/// report lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLabels {
    pub first: String,
    pub second: String,
}

impl FileLabels {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

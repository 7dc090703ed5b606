use std::path::PathBuf;

pub type DiffResult<T> = Result<T, FitsDiffError>;

/// Fatal failures that abort a comparison run.
///
/// Every other irregularity the engine notices is reported as a line in the
/// diff output and folded into the final verdict instead of being raised.
#[derive(Debug, thiserror::Error)]
pub enum FitsDiffError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse HDU snapshot '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid HDU snapshot '{}': {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error(
        "files have different numbers of HDUs: '{first}' has {first_count}, '{second}' has {second_count}"
    )]
    UnitCountMismatch {
        first: String,
        second: String,
        first_count: usize,
        second_count: usize,
    },
}

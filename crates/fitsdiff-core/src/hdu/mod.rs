pub mod model;
pub mod snapshot;

pub use model::{Card, CardValue, Column, ElementArray, ElementKind, Hdu, HduList, Payload};
pub use snapshot::SnapshotReader;

use crate::domain::DiffResult;
use std::path::Path;

/// Supplies the parsed units of one file to the comparison engine.
pub trait HduSource {
    fn open(&self, path: &Path) -> DiffResult<HduList>;
}

use thiserror::Error;

use crate::ids::VersionId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("version already exists: {0}")]
    AlreadyExists(VersionId),
    #[error("version not found: {0}")]
    NotFound(VersionId),
    #[error("failed to apply patch segment {index}")]
    ApplyFailure { index: usize },
    #[error("parent chain cycles through version {0}")]
    Cycle(VersionId),
}

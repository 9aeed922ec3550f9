//! Error types for the media tree / media source / provider core.

use thiserror::Error;

/// Failures that can be surfaced from [`crate::tree::MediaTree`] mutators.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// An internal allocation could not be satisfied. Tree state is left
    /// unchanged (strong exception guarantee).
    #[error("media tree: allocation failed")]
    AllocationFailed,
}

/// Failures surfaced by [`crate::provider::MediaSourceProvider`] and
/// [`crate::source::MediaSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaSourceError {
    /// An internal allocation could not be satisfied.
    #[error("media source: allocation failed")]
    AllocationFailed,
    /// The service discovery plugin catalog has no entry of the requested
    /// name.
    #[error("media source: no service discovery plugin named {0:?}")]
    NotFound(String),
    /// The service discovery plugin exists but failed to initialise.
    /// Distinguishable from [`MediaSourceError::NotFound`] for diagnostics
    /// only; callers otherwise treat the two identically.
    #[error("media source: service discovery plugin {0:?} failed to initialize")]
    SdInitFailed(String),
}

impl From<TreeError> for MediaSourceError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::AllocationFailed => MediaSourceError::AllocationFailed,
        }
    }
}

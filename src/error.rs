//! Error types for package resolution.

use thiserror::Error;

/// Errors a resolution can end with.
///
/// "Nothing matched" is not an error: it is the
/// [`ResolutionOutcome::NotFound`](crate::resolver::ResolutionOutcome::NotFound) outcome.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The requested architecture does not exist in the catalog
    #[error("Invalid architecture: {0}")]
    InvalidArchitecture(String),

    /// A catalog or history query failed; passed through untouched
    #[error("Package data source unavailable: {0:#}")]
    DataSourceUnavailable(#[source] anyhow::Error),
}

impl ResolveError {
    /// Client errors are caused by the lookup itself rather than by the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResolveError::InvalidArchitecture(_))
    }
}

impl From<anyhow::Error> for ResolveError {
    fn from(err: anyhow::Error) -> Self {
        ResolveError::DataSourceUnavailable(err)
    }
}

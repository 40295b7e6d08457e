//! Job error types.
//!
//! Request validation and lookup failures. Failures of a running job are not
//! errors at this level: they are recorded on the job itself and surface
//! through its snapshot.

use thiserror::Error;

/// Errors returned by job submission and lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    /// The submission carried no URL (absent, empty or blank).
    #[error("URL is missing")]
    MissingUrl,

    /// No job is registered under this identifier.
    #[error("job not found: {0}")]
    NotFound(String),
}

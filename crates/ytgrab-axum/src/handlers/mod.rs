//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to `DownloadService`.

pub mod downloads;
pub mod index;
pub mod status;

use crate::error::HttpError;

/// Method fallback for the JSON routes.
pub async fn method_not_allowed() -> HttpError {
    HttpError::MethodNotAllowed
}

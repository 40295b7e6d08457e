//! Download submission.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use ytgrab_core::JobId;

use crate::error::HttpError;
use crate::state::AppState;

/// Request to start a download.
///
/// `url` defaults to empty so a missing field is reported as a missing URL
/// rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub url: String,
    /// Free-form mode; audio aliases select audio, anything else video.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Response from a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub id: JobId,
}

/// Submit a new download.
///
/// The body is parsed from raw bytes so requests without a JSON content type
/// are still accepted, and any malformed body maps to 400.
pub async fn submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, HttpError> {
    let req: SubmitRequest = serde_json::from_slice(&body)
        .map_err(|e| HttpError::BadRequest(format!("invalid JSON: {e}")))?;

    let id = state.service.submit(&req.url, req.mode.as_deref())?;
    Ok(Json(SubmitResponse { ok: true, id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields_are_optional() {
        let req: SubmitRequest = serde_json::from_str("{}").unwrap();
        assert!(req.url.is_empty());
        assert!(req.mode.is_none());

        let req: SubmitRequest =
            serde_json::from_str(r#"{"url":"https://youtu.be/x","mode":"Audio"}"#).unwrap();
        assert_eq!(req.url, "https://youtu.be/x");
        assert_eq!(req.mode.as_deref(), Some("Audio"));
    }

    #[test]
    fn ill_typed_url_is_rejected() {
        assert!(serde_json::from_str::<SubmitRequest>(r#"{"url":42}"#).is_err());
    }
}

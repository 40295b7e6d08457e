//! Job status polling.

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use ytgrab_core::JobSnapshot;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub job: JobSnapshot,
}

/// First non-blank `id` in the query string. Repeated keys are allowed.
fn job_id(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.trim())
        .filter(|id| !id.is_empty())
}

/// Current snapshot of one job.
pub async fn get(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<StatusResponse>, HttpError> {
    let id = job_id(&pairs).ok_or_else(|| HttpError::BadRequest("id is missing".to_string()))?;

    let job = state.service.status(id)?;
    Ok(Json(StatusResponse { ok: true, job }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn first_id_wins() {
        assert_eq!(job_id(&pairs(&[("id", "a"), ("id", "b")])), Some("a"));
        assert_eq!(job_id(&pairs(&[("x", "1"), ("id", " abc ")])), Some("abc"));
    }

    #[test]
    fn blank_or_absent_id_is_missing() {
        assert_eq!(job_id(&pairs(&[])), None);
        assert_eq!(job_id(&pairs(&[("id", "")])), None);
        assert_eq!(job_id(&pairs(&[("other", "1")])), None);
    }
}

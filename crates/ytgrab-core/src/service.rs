//! Download service: submission and status lookups.
//!
//! Submitting hands the job to the runner on a detached task and returns at
//! once; the run is bounded by the runner's own timeout, not by the request
//! that started it.

use std::sync::Arc;

use tracing::info;

use crate::error::JobError;
use crate::job::{JobId, JobSnapshot};
use crate::link::normalize_video_url;
use crate::mode::DownloadMode;
use crate::ports::JobRunner;
use crate::registry::JobRegistry;

/// Facade over the registry and the runner.
#[derive(Clone)]
pub struct DownloadService {
    registry: Arc<JobRegistry>,
    runner: Arc<dyn JobRunner>,
}

impl DownloadService {
    pub fn new(registry: Arc<JobRegistry>, runner: Arc<dyn JobRunner>) -> Self {
        Self { registry, runner }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Create a job for `url` and start running it in the background.
    ///
    /// `mode` is normalized (absent means video) and the URL is rewritten to
    /// its canonical form before the runner sees it. Must be called from
    /// within a tokio runtime.
    pub fn submit(&self, url: &str, mode: Option<&str>) -> Result<JobId, JobError> {
        if url.trim().is_empty() {
            return Err(JobError::MissingUrl);
        }

        let mode = DownloadMode::normalize(mode.unwrap_or_default());
        let url = normalize_video_url(url);
        let job = self.registry.create(mode);
        job.append_log(format!("normalized URL: {url}"));

        info!(
            target: "ytgrab.jobs",
            job_id = %job.id(),
            %mode,
            %url,
            "Download submitted"
        );

        let id = job.id().clone();
        let runner = Arc::clone(&self.runner);
        tokio::spawn(async move {
            runner.run(job, url).await;
        });

        Ok(id)
    }

    /// Snapshot of a job's current state.
    pub fn status(&self, id: &str) -> Result<JobSnapshot, JobError> {
        self.registry.get(id).map(|job| job.snapshot())
    }
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService")
            .field("jobs", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{Job, JobPhase};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Records the URL it was given and completes the job.
    struct CompletingRunner {
        seen: std::sync::Mutex<Vec<String>>,
        done: Notify,
    }

    #[async_trait]
    impl JobRunner for CompletingRunner {
        async fn run(&self, job: Arc<Job>, url: String) {
            self.seen.lock().unwrap().push(url);
            job.complete();
            self.done.notify_one();
        }
    }

    fn service() -> (DownloadService, Arc<CompletingRunner>) {
        let runner = Arc::new(CompletingRunner {
            seen: std::sync::Mutex::new(Vec::new()),
            done: Notify::new(),
        });
        let service = DownloadService::new(Arc::new(JobRegistry::new()), runner.clone());
        (service, runner)
    }

    #[tokio::test]
    async fn submit_normalizes_and_runs() {
        let (service, runner) = service();

        let id = service
            .submit("https://youtu.be/abc123", Some("music"))
            .unwrap();
        runner.done.notified().await;

        assert_eq!(
            runner.seen.lock().unwrap().as_slice(),
            ["https://www.youtube.com/watch?v=abc123"]
        );
        let snapshot = service.status(id.as_str()).unwrap();
        assert_eq!(snapshot.mode, DownloadMode::Audio);
        assert_eq!(snapshot.status, JobPhase::Completed);
        assert_eq!(
            snapshot.log.first().unwrap(),
            "normalized URL: https://www.youtube.com/watch?v=abc123"
        );
    }

    #[tokio::test]
    async fn missing_mode_means_video() {
        let (service, runner) = service();
        let id = service.submit("https://vimeo.com/1", None).unwrap();
        runner.done.notified().await;
        assert_eq!(service.status(id.as_str()).unwrap().mode, DownloadMode::Video);
    }

    /// Never finishes; the job stays wherever the runner left it.
    struct StalledRunner;

    #[async_trait]
    impl JobRunner for StalledRunner {
        async fn run(&self, _job: Arc<Job>, _url: String) {
            std::future::pending::<()>().await;
        }
    }

    #[tokio::test]
    async fn submit_does_not_wait_for_the_run() {
        let service = DownloadService::new(Arc::new(JobRegistry::new()), Arc::new(StalledRunner));

        let id = service.submit("https://youtu.be/abc123", None).unwrap();
        tokio::task::yield_now().await;

        let snapshot = service.status(id.as_str()).unwrap();
        assert_eq!(snapshot.status, JobPhase::Preparing);
        assert!(!snapshot.finished);
        assert!(snapshot.completed_at.is_none());
    }

    #[tokio::test]
    async fn blank_url_is_rejected_without_creating_a_job() {
        let (service, _runner) = service();
        assert_eq!(service.submit("", None).unwrap_err(), JobError::MissingUrl);
        assert_eq!(service.submit("   ", Some("audio")).unwrap_err(), JobError::MissingUrl);
        assert!(service.registry().is_empty());
    }

    #[tokio::test]
    async fn unknown_status_is_not_found() {
        let (service, _runner) = service();
        assert!(matches!(
            service.status("nope"),
            Err(JobError::NotFound(id)) if id == "nope"
        ));
    }
}

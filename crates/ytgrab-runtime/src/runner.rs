//! Downloader process runner.
//!
//! One `run` per job: spawn the downloader, stream its combined output into
//! the job on a nested task, wait for exit under the job timeout, and make
//! the terminal transition.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use ytgrab_core::{DownloadMode, Job, JobRunner, LineInterpreter};

use crate::args::downloader_args;
use crate::paths::DownloaderLocation;
use crate::shutdown::shutdown_child;
use crate::stream::{merged_lines, read_output};

/// Upper bound on a single download, independent of the request that
/// started it.
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Time the output reader gets after the process exits to record lines
/// still buffered in the pipes.
const READER_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Why a run did not complete. The `Display` text becomes the job's error.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to capture downloader {0}")]
    Pipe(&'static str),

    #[error("failed to wait for downloader: {0}")]
    Wait(#[source] io::Error),

    #[error("downloader exited with {0}")]
    Exit(ExitStatus),

    #[error("downloader timed out after {}", describe(*.0))]
    TimedOut(Duration),
}

fn describe(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

/// Where and how long the downloader runs.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Downloader executable.
    pub program: PathBuf,
    /// Working directory of the process; downloaded files land here.
    pub work_dir: PathBuf,
    /// Overall deadline per job.
    pub timeout: Duration,
}

impl RunnerConfig {
    pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
            timeout: DEFAULT_JOB_TIMEOUT,
        }
    }

    pub fn from_location(location: &DownloaderLocation) -> Self {
        Self::new(&location.program, &location.work_dir)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }
}

/// [`JobRunner`] that launches the downloader as a child process.
#[derive(Debug, Clone)]
pub struct ProcessJobRunner {
    config: RunnerConfig,
    interpreter: Arc<LineInterpreter>,
}

impl ProcessJobRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            interpreter: Arc::new(LineInterpreter::standard()),
        }
    }

    /// Use a custom output interpreter.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: LineInterpreter) -> Self {
        self.interpreter = Arc::new(interpreter);
        self
    }

    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn command(&self, mode: DownloadMode, url: &str) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(downloader_args(mode, url))
            .current_dir(&self.config.work_dir)
            .env("PYTHONUNBUFFERED", "1")
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn execute(&self, job: &Arc<Job>, url: &str) -> Result<(), RunError> {
        let mut child = self
            .command(job.mode(), url)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: self.config.program.display().to_string(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(RunError::Pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(RunError::Pipe("stderr"))?;

        debug!(
            target: "ytgrab.runner",
            job_id = %job.id(),
            pid = ?child.id(),
            "Downloader started"
        );

        let reader = tokio::spawn(read_output(
            Arc::clone(job),
            Arc::clone(&self.interpreter),
            merged_lines(stdout, stderr),
        ));

        let status = match timeout(self.config.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                reader.abort();
                return Err(RunError::Wait(e));
            }
            Err(_) => {
                warn!(
                    target: "ytgrab.runner",
                    job_id = %job.id(),
                    timeout_secs = self.config.timeout.as_secs(),
                    "Downloader exceeded its deadline, stopping it"
                );
                if let Err(e) = shutdown_child(child).await {
                    warn!(target: "ytgrab.runner", job_id = %job.id(), error = %e, "Failed to stop downloader");
                }
                reader.abort();
                return Err(RunError::TimedOut(self.config.timeout));
            }
        };

        drain(reader).await;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Exit(status))
        }
    }
}

/// Let the reader finish the lines already written, then drop it.
async fn drain(mut reader: JoinHandle<()>) {
    if timeout(READER_DRAIN_GRACE, &mut reader).await.is_err() {
        reader.abort();
    }
}

#[async_trait]
impl JobRunner for ProcessJobRunner {
    async fn run(&self, job: Arc<Job>, url: String) {
        match self.execute(&job, &url).await {
            Ok(()) => {
                job.complete();
                info!(target: "ytgrab.runner", job_id = %job.id(), "Download completed");
            }
            Err(e) => {
                warn!(target: "ytgrab.runner", job_id = %job.id(), error = %e, "Download failed");
                job.fail(&e);
            }
        }
    }
}

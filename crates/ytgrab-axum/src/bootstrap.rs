//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. The downloader is resolved, the process runner is
//! built and injected into the download service here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use ytgrab_core::{DownloadService, JobRegistry, JobRunner};
use ytgrab_runtime::{DEFAULT_JOB_TIMEOUT, ProcessJobRunner, RunnerConfig, resolve_downloader};

use crate::routes::create_router;

/// Default bind host. The service is meant for the local browser only.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// No CORS headers; only the bundled UI may call the API.
    #[default]
    SameOrigin,
    /// Allow all origins (development mode).
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Downloader executable; resolved beside the program when unset.
    pub downloader: Option<PathBuf>,
    /// Where downloaded files land; the downloader's directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Overall deadline for a single download.
    pub job_timeout: Duration,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            downloader: None,
            output_dir: None,
            job_timeout: DEFAULT_JOB_TIMEOUT,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = if origins.iter().any(|o| o == "*") {
            CorsConfig::AllowAll
        } else if origins.is_empty() {
            CorsConfig::SameOrigin
        } else {
            CorsConfig::AllowOrigins(origins)
        };
        self
    }
}

/// Application context for the Axum adapter.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Submission and status lookups.
    pub service: DownloadService,
}

impl AppContext {
    /// Context over a fresh, empty registry.
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            service: DownloadService::new(Arc::new(JobRegistry::new()), runner),
        }
    }
}

/// Build the application context from configuration.
pub fn bootstrap(config: &ServerConfig) -> Result<AppContext> {
    let location = resolve_downloader(config.downloader.as_deref())?;

    let mut runner_config = RunnerConfig::from_location(&location).with_timeout(config.job_timeout);
    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        runner_config = runner_config.with_work_dir(dir);
    }

    info!(
        target: "ytgrab.paths",
        downloader = %runner_config.program.display(),
        downloader_source = ?location.source,
        output_dir = %runner_config.work_dir.display(),
        timeout_secs = runner_config.timeout.as_secs(),
        "Bootstrap resolved paths"
    );

    Ok(AppContext::new(Arc::new(ProcessJobRunner::new(runner_config))))
}

/// Start the web server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;
    let app = create_router(ctx, &config.cors);

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("ytgrab listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ytgrab shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

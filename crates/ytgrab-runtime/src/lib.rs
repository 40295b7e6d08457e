#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod args;
pub mod paths;
mod runner;
mod shutdown;
pub mod stream;

// Re-export the main JobRunner implementation
pub use runner::{DEFAULT_JOB_TIMEOUT, ProcessJobRunner, RunError, RunnerConfig};

pub use args::downloader_args;
pub use paths::{DownloaderLocation, DownloaderSource, PathError, resolve_downloader};

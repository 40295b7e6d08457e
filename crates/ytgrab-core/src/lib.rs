#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod interpreter;
pub mod job;
pub mod link;
pub mod mode;
pub mod ports;
pub mod registry;
pub mod service;

// Re-export commonly used types for convenience
pub use error::JobError;
pub use interpreter::{LineEffect, LineInterpreter, LineRule};
pub use job::{CONVERSION_INDETERMINATE, Job, JobId, JobPhase, JobSnapshot};
pub use link::normalize_video_url;
pub use mode::DownloadMode;
pub use ports::JobRunner;
pub use registry::JobRegistry;
pub use service::DownloadService;

// Only used by unit tests
#[cfg(test)]
use serde_json as _;

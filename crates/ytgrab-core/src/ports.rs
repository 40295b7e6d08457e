//! Port definitions.
//!
//! The runner port is implemented by `ytgrab-runtime`; the HTTP adapter only
//! sees the trait, so tests can substitute a runner that never spawns a
//! process.

use std::sync::Arc;

use async_trait::async_trait;

use crate::job::Job;

/// Drives one job from `preparing` to a terminal state.
///
/// The runner is the only writer of the job for the duration of `run`. When
/// `run` returns the job must be finished, whatever happened to the
/// underlying process.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Download `url` according to the job's mode.
    async fn run(&self, job: Arc<Job>, url: String);
}

//! Process-wide job registry.
//!
//! Jobs are never removed: the registry lives from service start to shutdown
//! and nothing is persisted.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::JobError;
use crate::job::{Job, JobId};
use crate::mode::DownloadMode;

/// Concurrent map from job identifier to job.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Arc<Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a job under a fresh identifier and register it.
    ///
    /// The job is fully constructed before it becomes visible to lookups.
    pub fn create(&self, mode: DownloadMode) -> Arc<Job> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        loop {
            let id = JobId::generate();
            if let Entry::Vacant(slot) = jobs.entry(id.clone()) {
                let job = Arc::new(Job::new(id, mode));
                slot.insert(Arc::clone(&job));
                return job;
            }
        }
    }

    /// Look up a job by its identifier.
    pub fn get(&self, id: &str) -> Result<Arc<Job>, JobError> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

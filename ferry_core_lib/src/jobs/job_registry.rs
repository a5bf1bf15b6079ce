use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::FerryError;

use super::{CancelProbe, JobId, JobState};

pub const DEFAULT_JOB_ID_BASE: u64 = 1000;

struct RegistryData {
    jobs: HashMap<JobId, JobState>,
    next_job_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The job was registered and is now flagged.
    Requested,
    /// No such job, most likely because it already finished. Nothing changed.
    Unknown,
}

/// Process-wide table of in-flight background jobs.
///
/// Cloning yields another handle to the same table. Every operation takes the
/// single lock, so register/cancel/query/unregister are linearizable.
#[derive(Clone)]
pub struct JobRegistry {
    data: Arc<Mutex<RegistryData>>,
}

impl JobRegistry {
    pub fn new() -> JobRegistry {
        JobRegistry::with_base(DEFAULT_JOB_ID_BASE)
    }

    pub fn with_base(job_id_base: u64) -> JobRegistry {
        JobRegistry {
            data: Arc::new(Mutex::new(RegistryData {
                jobs: HashMap::new(),
                next_job_id: job_id_base,
            })),
        }
    }

    /// Hand out the next identifier and register it as running in one step.
    pub async fn allocate(&self) -> JobId {
        let mut data = self.data.lock().await;
        let job_id = JobId::from(data.next_job_id);
        data.next_job_id += 1;
        data.jobs.insert(job_id.clone(), JobState::Running);
        job_id
    }

    /// Track a job under an identifier assigned elsewhere. Returns false if the
    /// identifier was already registered, in which case its state is kept.
    pub async fn register(&self, job_id: JobId) -> bool {
        let mut data = self.data.lock().await;

        if data.jobs.contains_key(&job_id) {
            return false;
        }

        data.jobs.insert(job_id, JobState::Running);
        true
    }

    pub async fn request_cancel(&self, job_id: &JobId) -> CancelOutcome {
        let mut data = self.data.lock().await;

        match data.jobs.get_mut(job_id) {
            Some(state) => {
                *state = JobState::CancelRequested;
                CancelOutcome::Requested
            }
            None => CancelOutcome::Unknown,
        }
    }

    /// Like [`JobRegistry::request_cancel`], with an unknown id as an error.
    pub async fn cancel(&self, job_id: &JobId) -> Result<(), FerryError> {
        match self.request_cancel(job_id).await {
            CancelOutcome::Requested => Ok(()),
            CancelOutcome::Unknown => Err(FerryError::UnknownJobId(job_id.to_string())),
        }
    }

    pub async fn is_cancelled(&self, job_id: &JobId) -> bool {
        matches!(self.state(job_id).await, Some(JobState::CancelRequested))
    }

    pub async fn state(&self, job_id: &JobId) -> Option<JobState> {
        let data = self.data.lock().await;
        data.jobs.get(job_id).copied()
    }

    pub async fn unregister(&self, job_id: &JobId) -> Option<JobState> {
        let mut data = self.data.lock().await;
        data.jobs.remove(job_id)
    }

    pub async fn contains(&self, job_id: &JobId) -> bool {
        self.state(job_id).await.is_some()
    }

    pub async fn len(&self) -> usize {
        self.data.lock().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn probe(&self, job_id: JobId) -> RegistryProbe {
        RegistryProbe {
            registry: self.clone(),
            job_id,
        }
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        JobRegistry::new()
    }
}

/// Cancellation probe bound to one job's entry.
pub struct RegistryProbe {
    registry: JobRegistry,
    job_id: JobId,
}

#[async_trait]
impl CancelProbe for RegistryProbe {
    async fn is_cancelled(&self) -> bool {
        self.registry.is_cancelled(&self.job_id).await
    }
}

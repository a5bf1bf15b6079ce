mod cancel_probe;
pub use cancel_probe::CancelProbe;
pub use cancel_probe::NeverCancel;
mod job;
pub use job::JobId;
pub use job::JobState;
pub use job::TransferDirection;
pub use job::TransferRole;
mod job_registry;
pub use job_registry::CancelOutcome;
pub use job_registry::JobRegistry;
pub use job_registry::RegistryProbe;
pub use job_registry::DEFAULT_JOB_ID_BASE;
mod transfer_job;
pub use transfer_job::TransferJob;

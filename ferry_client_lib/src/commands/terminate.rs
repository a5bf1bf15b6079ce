use ferry_core_lib::{
    data::protocol::ControlWord,
    jobs::{CancelOutcome, JobId, JobRegistry},
    FerryError,
};

use crate::connectivity::Connection;

pub struct TerminateCommand {
    job_id: JobId,
}

impl TerminateCommand {
    pub fn new(job_id: JobId) -> Self {
        TerminateCommand { job_id }
    }

    /// Flags the local half of the job first, then asks the server to stop
    /// its half. `Requested` when either side knew the job.
    pub async fn execute(
        &self,
        connection: &mut Connection,
        registry: &JobRegistry,
    ) -> Result<CancelOutcome, FerryError> {
        let local = registry.request_cancel(&self.job_id).await;

        connection.send_line(self.job_id.as_str()).await?;
        let reply = connection.read_line().await?;

        match ControlWord::from_line(&reply) {
            Some(ControlWord::Terminating) => Ok(CancelOutcome::Requested),
            Some(ControlWord::UnknownId) => Ok(local),
            _ => Err(FerryError::protocol(format!(
                "unexpected reply to terminate: '{}'",
                reply
            ))),
        }
    }
}

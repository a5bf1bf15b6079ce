use ferry_core_lib::{
    data::protocol::{ControlWord, ProtocolStream},
    jobs::{JobId, JobRegistry},
};
use tokio::net::TcpStream;
use uuid::Uuid;

/// Reads one JobID per line and flags the matching job for cancellation.
/// The job itself notices at its next chunk boundary.
pub struct TerminateSession {
    pub uuid: Uuid,
    stream: ProtocolStream<TcpStream>,
    registry: JobRegistry,
}

impl TerminateSession {
    pub fn new(stream: TcpStream, registry: JobRegistry) -> TerminateSession {
        TerminateSession {
            uuid: Uuid::new_v4(),
            stream: ProtocolStream::new(stream),
            registry,
        }
    }

    pub async fn listen(&mut self) {
        info!("Listening for terminate requests on connection {}", self.uuid);

        loop {
            let line = match self.stream.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("Terminate connection closed for {}", self.uuid);
                    break;
                }
                Err(e) => {
                    warn!("Terminate connection {} failed: {}", self.uuid, e);
                    break;
                }
            };

            let token = match line.split_whitespace().next() {
                Some(token) => token,
                None => continue,
            };

            if ControlWord::Quit.matches(token) {
                info!("Terminate connection {} quit", self.uuid);
                break;
            }

            let reply = self.terminate(JobId::from(token)).await;
            if let Err(e) = self.stream.write_word(reply).await {
                warn!("Could not answer terminate request on {}: {}", self.uuid, e);
                break;
            }
        }

        self.stream.shutdown().await;
    }

    async fn terminate(&self, job_id: JobId) -> ControlWord {
        match self.registry.cancel(&job_id).await {
            Ok(()) => {
                info!("Terminate requested for job {}", job_id);
                ControlWord::Terminating
            }
            Err(e) => {
                debug!("Terminate request on {} ignored: {}", self.uuid, e);
                ControlWord::UnknownId
            }
        }
    }
}

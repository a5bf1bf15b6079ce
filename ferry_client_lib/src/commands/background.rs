use std::{io, path::PathBuf};

use ferry_core_lib::{
    data::transfer::TransferOutcome,
    jobs::{JobId, JobRegistry, TransferDirection, TransferJob, TransferRole},
    FerryError,
};
use tokio::{net::TcpStream, task::JoinHandle};

use crate::connectivity::Connection;

/// Port asked for during negotiation. Zero lets the server pick a free one.
pub const EPHEMERAL_PORT: u16 = 0;

/// A transfer running on its own connection while the control session
/// moves on.
pub struct BackgroundTransfer {
    pub job_id: JobId,
    pub direction: TransferDirection,
    pub file_name: String,
    pub handle: JoinHandle<Result<TransferOutcome, FerryError>>,
}

impl BackgroundTransfer {
    /// Runs the port negotiation that follows a `&` command the server
    /// accepted, connects to the announced port and spawns the local job.
    pub async fn start(
        connection: &mut Connection,
        registry: &JobRegistry,
        direction: TransferDirection,
        file_path: PathBuf,
        file_name: String,
    ) -> Result<BackgroundTransfer, FerryError> {
        connection.send_line(&EPHEMERAL_PORT.to_string()).await?;

        let port_line = connection.read_line().await?;
        let port = port_line.trim().parse::<u16>().map_err(|_| {
            FerryError::protocol(format!("expected a port but received '{}'", port_line))
        })?;
        let job_id = JobId::from(connection.read_line().await?.as_str());
        registry.register(job_id.clone()).await;

        let socket = match TcpStream::connect((connection.host.as_str(), port)).await {
            Ok(socket) => socket,
            Err(e) => {
                registry.unregister(&job_id).await;
                return Err(e.into());
            }
        };
        debug!("Job {} connected on port {}", job_id, port);

        let job = TransferJob::new(
            job_id.clone(),
            direction,
            file_path,
            TransferRole::for_client(direction),
        );
        let handle = tokio::spawn(job.run(socket, registry.clone()));

        Ok(BackgroundTransfer {
            job_id,
            direction,
            file_name,
            handle,
        })
    }

    pub async fn wait(self) -> Result<TransferOutcome, FerryError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(FerryError::TransferIo(io::Error::new(
                io::ErrorKind::Other,
                e,
            ))),
        }
    }
}

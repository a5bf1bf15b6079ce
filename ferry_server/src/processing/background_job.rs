use std::path::PathBuf;

use ferry_core_lib::{
    jobs::{JobId, TransferDirection, TransferJob, TransferRole},
    FerryError,
};
use tokio::net::TcpListener;

use crate::connectivity::ControlSession;

pub const INVALID_PORT: &str = "Invalid port";

/// Negotiates the ephemeral connection of a background transfer and leaves
/// the job running on its own task.
///
/// The client sends the port it would like (`0` lets the server pick), the
/// server replies with the port it actually bound and the new JobID. The
/// control session is free again as soon as both lines are out.
pub async fn spawn_background_job(
    session: &mut ControlSession,
    direction: TransferDirection,
    path: PathBuf,
) -> Result<(), FerryError> {
    let port_line = session.stream.expect_line().await?;
    let port = match port_line.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            session.send_line(INVALID_PORT).await?;
            return Err(FerryError::protocol(format!(
                "'{}' is not a port",
                port_line
            )));
        }
    };

    let listener = match TcpListener::bind((session.state.config.host(), port)).await {
        Ok(listener) => listener,
        Err(e) => {
            session.send_line(INVALID_PORT).await?;
            return Err(e.into());
        }
    };
    let bound_port = listener.local_addr()?.port();

    let registry = session.state.registry.clone();
    let job_id = registry.allocate().await;

    if let Err(e) = announce(session, bound_port, &job_id).await {
        registry.unregister(&job_id).await;
        return Err(e);
    }
    info!(
        "Job {} for {} waiting on port {} ({:?})",
        job_id,
        session.uuid,
        bound_port,
        direction
    );

    let job = TransferJob::new(
        job_id,
        direction,
        path,
        TransferRole::for_server(direction),
    );
    tokio::spawn(async move {
        match listener.accept().await {
            Ok((socket, peer)) => {
                debug!("Job {} connected to {}", job.id, peer);
                let job_id = job.id.clone();
                if let Err(e) = job.run(socket, registry).await {
                    debug!("Job {} ended with error: {}", job_id, e);
                }
            }
            Err(e) => {
                error!("Job {} never got its connection: {}", job.id, e);
                registry.unregister(&job.id).await;
            }
        }
    });

    Ok(())
}

async fn announce(
    session: &mut ControlSession,
    port: u16,
    job_id: &JobId,
) -> Result<(), FerryError> {
    session.send_line(&port.to_string()).await?;
    session.send_line(job_id.as_str()).await
}

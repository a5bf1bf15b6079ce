use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ferry_core_lib::{
    data::{
        protocol::{CommandRequest, ControlWord},
        transfer::receive_file,
    },
    jobs::{NeverCancel, TransferDirection},
    FerryError,
};
use tokio::fs;

use super::{ControlCommand, UNRECOGNIZED_FORMAT};
use crate::{connectivity::ControlSession, processing::spawn_background_job};

pub struct PutCommand {}

#[async_trait]
impl ControlCommand for PutCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let resolved = request
            .require_argument()
            .and_then(|file_name| session.resolve(file_name));
        let resolved = match resolved {
            Ok(path) => writable_target(path).await,
            Err(e) => Err(e),
        };

        let path = match resolved {
            Ok(path) => path,
            Err(e) => {
                // The client follows up with a length or a port line either way.
                let follow_up = session.stream.expect_line().await?;
                debug!("Refusing PUT from {}, discarded '{}'", session.uuid, follow_up);
                session.send_line(UNRECOGNIZED_FORMAT).await?;
                return Err(e);
            }
        };

        if request.background {
            return spawn_background_job(session, TransferDirection::Put, path).await;
        }

        match receive_file(&mut session.stream, &path, &NeverCancel).await {
            Ok(outcome) => {
                session.send_word(ControlWord::Received).await?;
                info!(
                    "{} -> server: {} ({} bytes)",
                    session.uuid,
                    path.display(),
                    outcome.bytes()
                );
                Ok(())
            }
            Err(FerryError::ProtocolViolation(message)) => {
                session.send_line(UNRECOGNIZED_FORMAT).await?;
                Err(FerryError::ProtocolViolation(message))
            }
            Err(e) => Err(e),
        }
    }
}

/// The destination must be creatable as a regular file.
async fn writable_target(path: PathBuf) -> Result<PathBuf, FerryError> {
    if is_directory(&path).await {
        return Err(FerryError::protocol(format!(
            "{} is a directory",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !is_directory(parent).await {
            return Err(FerryError::protocol(format!(
                "{} has no parent directory",
                path.display()
            )));
        }
    }

    Ok(path)
}

async fn is_directory(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_dir(),
        Err(_) => false,
    }
}

use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};
use tokio::fs;

use super::{ControlCommand, FILE_DOES_NOT_EXIST};
use crate::connectivity::ControlSession;

/// Removes a file, or an empty directory, from the working directory.
pub struct DeleteCommand {}

#[async_trait]
impl ControlCommand for DeleteCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let name = match request.argument.as_deref() {
            Some(name) => name,
            None => return session.send_line(FILE_DOES_NOT_EXIST).await,
        };

        let path = match session.resolve(name) {
            Ok(path) => path,
            Err(_) => return session.send_line(FILE_DOES_NOT_EXIST).await,
        };

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(_) => return session.send_line(FILE_DOES_NOT_EXIST).await,
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match removed {
            Ok(()) => {
                info!("{} removed {}", session.uuid, name);
                session.send_line(&format!("Removed {}", name)).await
            }
            Err(e) => {
                warn!("{} could not remove {}: {}", session.uuid, name, e);
                session
                    .send_line(&format!("Deletion of {} Failed", name))
                    .await
            }
        }
    }
}

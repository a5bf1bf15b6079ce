use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};
use tokio::fs;

use super::{ControlCommand, BLANK_DIRECTORY_NAME, DIRECTORY_CREATION_FAILED};
use crate::connectivity::ControlSession;

pub struct MkdirCommand {}

#[async_trait]
impl ControlCommand for MkdirCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let name = match request.argument.as_deref() {
            Some(name) => name,
            None => return session.send_line(BLANK_DIRECTORY_NAME).await,
        };

        let created = match session.resolve(name) {
            Ok(path) => fs::create_dir(&path).await.map_err(FerryError::from),
            Err(e) => Err(e),
        };

        match created {
            Ok(()) => {
                info!("{} created directory {}", session.uuid, name);
                session.send_line("").await
            }
            Err(e) => {
                debug!("{} could not create directory {}: {}", session.uuid, name, e);
                session.send_line(DIRECTORY_CREATION_FAILED).await
            }
        }
    }
}

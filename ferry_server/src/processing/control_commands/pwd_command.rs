use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};

use super::ControlCommand;
use crate::connectivity::ControlSession;

pub struct PwdCommand {}

#[async_trait]
impl ControlCommand for PwdCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        _request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let reply = format!(
            "Remote working directory: {}",
            session.current_directory.display()
        );
        session.send_line(&reply).await
    }
}

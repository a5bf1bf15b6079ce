use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};

use super::{ControlCommand, UNKNOWN_COMMAND};
use crate::connectivity::ControlSession;

pub struct UnknownCommand {}

#[async_trait]
impl ControlCommand for UnknownCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        debug!("{} sent unknown command '{}'", session.uuid, request);
        session.send_line(UNKNOWN_COMMAND).await
    }
}

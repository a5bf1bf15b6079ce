use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};

use crate::connectivity::ControlSession;

#[async_trait]
pub trait ControlCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError>;
}

use std::path::Path;

use async_trait::async_trait;
use ferry_core_lib::{
    data::{
        protocol::{CommandRequest, ControlWord},
        transfer::send_file,
    },
    jobs::{NeverCancel, TransferDirection},
    FerryError,
};
use tokio::fs;

use super::{ControlCommand, UNRECOGNIZED_FORMAT};
use crate::{connectivity::ControlSession, processing::spawn_background_job};

pub struct GetCommand {}

#[async_trait]
impl ControlCommand for GetCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let file_name = match request.argument.as_deref() {
            Some(file_name) => file_name,
            None => {
                session.send_line(UNRECOGNIZED_FORMAT).await?;
                return Err(FerryError::protocol("GET without a file name"));
            }
        };

        let path = match session.resolve(file_name) {
            Ok(path) => path,
            Err(e) => {
                debug!("{} asked for {}: {}", session.uuid, file_name, e);
                return session.send_word(ControlWord::NotFound).await;
            }
        };

        if !is_file(&path).await {
            debug!("{} asked for missing file {}", session.uuid, file_name);
            return session.send_word(ControlWord::NotFound).await;
        }
        session.send_word(ControlWord::Exists).await?;

        if request.background {
            return spawn_background_job(session, TransferDirection::Get, path).await;
        }

        let outcome = send_file(&mut session.stream, &path, &NeverCancel).await?;
        session.send_word(ControlWord::Sent).await?;
        info!(
            "server -> {}: {} ({} bytes)",
            session.uuid,
            file_name,
            outcome.bytes()
        );

        Ok(())
    }
}

async fn is_file(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false,
    }
}

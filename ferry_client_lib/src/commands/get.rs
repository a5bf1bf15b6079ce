use std::path::{Path, PathBuf};

use ferry_core_lib::{
    data::{
        protocol::{CommandRequest, CommandVerb, ControlWord},
        transfer::{receive_file, TransferOutcome},
    },
    jobs::{JobRegistry, NeverCancel, TransferDirection},
    FerryError,
};

use super::{remote_name, BackgroundTransfer};
use crate::connectivity::Connection;

pub struct GetCommand {
    file_name: String,
}

impl GetCommand {
    pub fn new(file_name: String) -> Self {
        GetCommand { file_name }
    }

    pub async fn execute(
        &self,
        connection: &mut Connection,
        local_directory: &Path,
    ) -> Result<TransferOutcome, FerryError> {
        self.request(connection, false).await?;

        let path = self.local_path(local_directory);
        let stream = connection.stream()?;
        let outcome = receive_file(stream, &path, &NeverCancel).await?;
        stream.expect_word(ControlWord::Sent).await?;

        info!("server -> client: {} ({} bytes)", self.file_name, outcome.bytes());
        Ok(outcome)
    }

    pub async fn execute_background(
        &self,
        connection: &mut Connection,
        local_directory: &Path,
        registry: &JobRegistry,
    ) -> Result<BackgroundTransfer, FerryError> {
        self.request(connection, true).await?;

        BackgroundTransfer::start(
            connection,
            registry,
            TransferDirection::Get,
            self.local_path(local_directory),
            self.file_name.clone(),
        )
        .await
    }

    /// Sends the GET line and reads the existence verdict.
    async fn request(&self, connection: &mut Connection, background: bool) -> Result<(), FerryError> {
        let request = if background {
            CommandRequest::background(CommandVerb::Get, self.file_name.clone())
        } else {
            CommandRequest::new(CommandVerb::Get, Some(self.file_name.clone()))
        };
        debug!("Requesting {}", self.file_name);
        connection.send_line(&request.to_line()).await?;

        let reply = connection.read_line().await?;
        match ControlWord::from_line(&reply) {
            Some(ControlWord::Exists) => Ok(()),
            Some(ControlWord::NotFound) => Err(FerryError::NotFound(self.file_name.clone())),
            _ => Err(FerryError::protocol(format!(
                "unexpected reply to GET: '{}'",
                reply
            ))),
        }
    }

    fn local_path(&self, local_directory: &Path) -> PathBuf {
        local_directory.join(remote_name(&self.file_name))
    }
}

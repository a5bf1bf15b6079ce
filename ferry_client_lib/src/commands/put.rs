use std::path::{Path, PathBuf};

use ferry_core_lib::{
    data::{
        protocol::{CommandRequest, CommandVerb, ControlWord},
        transfer::{send_file, TransferOutcome},
    },
    jobs::{JobRegistry, NeverCancel, TransferDirection},
    FerryError,
};
use tokio::fs;

use super::{remote_name, BackgroundTransfer};
use crate::connectivity::Connection;

pub struct PutCommand {
    file_name: String,
}

impl PutCommand {
    pub fn new(file_name: String) -> Self {
        PutCommand { file_name }
    }

    pub async fn execute(
        &self,
        connection: &mut Connection,
        local_directory: &Path,
    ) -> Result<TransferOutcome, FerryError> {
        let source = self.local_source(local_directory).await?;

        let request = CommandRequest::new(CommandVerb::Put, Some(self.remote_name()));
        connection.send_line(&request.to_line()).await?;

        let stream = connection.stream()?;
        let outcome = send_file(stream, &source, &NeverCancel).await?;
        stream.expect_word(ControlWord::Received).await?;

        info!("client -> server: {} ({} bytes)", self.file_name, outcome.bytes());
        Ok(outcome)
    }

    pub async fn execute_background(
        &self,
        connection: &mut Connection,
        local_directory: &Path,
        registry: &JobRegistry,
    ) -> Result<BackgroundTransfer, FerryError> {
        let source = self.local_source(local_directory).await?;

        let request = CommandRequest::background(CommandVerb::Put, self.remote_name());
        connection.send_line(&request.to_line()).await?;

        BackgroundTransfer::start(
            connection,
            registry,
            TransferDirection::Put,
            source,
            self.file_name.clone(),
        )
        .await
    }

    /// The server is never contacted for a file that is not there.
    async fn local_source(&self, local_directory: &Path) -> Result<PathBuf, FerryError> {
        let source = local_directory.join(&self.file_name);

        match fs::metadata(&source).await {
            Ok(metadata) if metadata.is_file() => Ok(source),
            _ => Err(FerryError::NotFound(self.file_name.clone())),
        }
    }

    fn remote_name(&self) -> String {
        remote_name(&self.file_name).to_string()
    }
}

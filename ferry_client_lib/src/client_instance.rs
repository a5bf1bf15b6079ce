use std::path::{Path, PathBuf};

use ferry_core_lib::{
    data::{
        protocol::{CommandRequest, CommandVerb, ControlWord},
        transfer::TransferOutcome,
    },
    jobs::{CancelOutcome, JobId, JobRegistry},
    FerryError,
};

use crate::{
    commands::{GetCommand, LsCommand, PutCommand, RemoteCommand, TerminateCommand},
    connectivity::Connection,
    BackgroundTransfer,
};

/// A connected client: one control connection, one terminate connection and
/// the registry of its own background jobs.
pub struct ClientInstance {
    control: Connection,
    terminate: Connection,
    registry: JobRegistry,
    local_directory: PathBuf,
}

impl ClientInstance {
    pub async fn new(
        host: String,
        port: u16,
        terminate_port: u16,
        local_directory: PathBuf,
    ) -> Result<ClientInstance, FerryError> {
        let mut control = Connection::new(host.clone(), port);
        control.connect().await?;

        let mut terminate = Connection::new(host, terminate_port);
        terminate.connect().await?;

        Ok(ClientInstance {
            control,
            terminate,
            registry: JobRegistry::new(),
            local_directory,
        })
    }

    pub fn registry(&self) -> JobRegistry {
        self.registry.clone()
    }

    pub fn local_directory(&self) -> &Path {
        &self.local_directory
    }

    pub async fn get(&mut self, file_name: &str) -> Result<TransferOutcome, FerryError> {
        let command = GetCommand::new(file_name.to_string());
        command.execute(&mut self.control, &self.local_directory).await
    }

    pub async fn get_background(&mut self, file_name: &str) -> Result<BackgroundTransfer, FerryError> {
        let command = GetCommand::new(file_name.to_string());
        command
            .execute_background(&mut self.control, &self.local_directory, &self.registry)
            .await
    }

    pub async fn put(&mut self, file_name: &str) -> Result<TransferOutcome, FerryError> {
        let command = PutCommand::new(file_name.to_string());
        command.execute(&mut self.control, &self.local_directory).await
    }

    pub async fn put_background(&mut self, file_name: &str) -> Result<BackgroundTransfer, FerryError> {
        let command = PutCommand::new(file_name.to_string());
        command
            .execute_background(&mut self.control, &self.local_directory, &self.registry)
            .await
    }

    pub async fn ls(&mut self) -> Result<Vec<String>, FerryError> {
        LsCommand::new().execute(&mut self.control).await
    }

    pub async fn cd(&mut self, directory: Option<&str>) -> Result<String, FerryError> {
        let request = CommandRequest::new(CommandVerb::Cd, directory.map(str::to_string));
        self.send_raw(&request.to_line()).await
    }

    pub async fn mkdir(&mut self, directory: &str) -> Result<String, FerryError> {
        let request = CommandRequest::new(CommandVerb::Mkdir, Some(directory.to_string()));
        self.send_raw(&request.to_line()).await
    }

    pub async fn pwd(&mut self) -> Result<String, FerryError> {
        let request = CommandRequest::new(CommandVerb::Pwd, None);
        self.send_raw(&request.to_line()).await
    }

    pub async fn delete(&mut self, file_name: &str) -> Result<String, FerryError> {
        let request = CommandRequest::new(CommandVerb::Delete, Some(file_name.to_string()));
        self.send_raw(&request.to_line()).await
    }

    /// Sends a line as-is and returns the single reply line.
    pub async fn send_raw(&mut self, line: &str) -> Result<String, FerryError> {
        RemoteCommand::new(line.to_string())
            .execute(&mut self.control)
            .await
    }

    pub async fn terminate(&mut self, job_id: &JobId) -> Result<CancelOutcome, FerryError> {
        TerminateCommand::new(job_id.clone())
            .execute(&mut self.terminate, &self.registry)
            .await
    }

    /// Says goodbye on both connections. Background jobs keep their own
    /// sockets and are not affected.
    pub async fn quit(&mut self) -> Result<(), FerryError> {
        let control_result = self.control.send_line(ControlWord::Quit.as_str()).await;
        let terminate_result = self.terminate.send_line(ControlWord::Quit.as_str()).await;

        self.control.disconnect().await;
        self.terminate.disconnect().await;

        control_result.and(terminate_result)
    }
}

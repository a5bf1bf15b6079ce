use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use ferry_core_lib::{
    data::protocol::{ControlWord, ProtocolStream},
    FerryError,
};
use tokio::net::TcpStream;
use uuid::Uuid;

use super::ServerState;
use crate::processing::{CommandFlow, CommandHandler};

/// One client's control connection plus its working directory.
pub struct ControlSession {
    pub uuid: Uuid,
    pub stream: ProtocolStream<TcpStream>,
    pub state: Arc<ServerState>,
    pub current_directory: PathBuf,
}

impl ControlSession {
    pub fn new(stream: TcpStream, state: Arc<ServerState>) -> ControlSession {
        let current_directory = state.root.clone();
        ControlSession {
            uuid: Uuid::new_v4(),
            stream: ProtocolStream::new(stream),
            state,
            current_directory,
        }
    }

    pub async fn listen(&mut self) {
        info!("Listening for commands on connection {}", self.uuid);
        let command_handler = CommandHandler {};

        loop {
            let line = match self.stream.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("Connection closed for {}", self.uuid);
                    break;
                }
                Err(e) => {
                    warn!("Connection {} failed: {}", self.uuid, e);
                    break;
                }
            };
            debug!("{} -> {}", self.uuid, line);

            if let CommandFlow::Close = command_handler.handle_line(&line, self).await {
                info!("Client {} quit", self.uuid);
                break;
            }
        }

        self.stream.shutdown().await;
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), FerryError> {
        self.stream.write_line(line).await
    }

    pub async fn send_word(&mut self, word: ControlWord) -> Result<(), FerryError> {
        self.stream.write_word(word).await
    }

    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Path of `name` inside the current directory. Only plain relative
    /// names are accepted.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, FerryError> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if !plain || relative.file_name().is_none() {
            return Err(FerryError::protocol(format!(
                "'{}' is not a plain file name",
                name
            )));
        }

        Ok(self.current_directory.join(relative))
    }
}

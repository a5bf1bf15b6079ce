use std::{io, path::Path};

use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};
use tokio::fs;

use super::ControlCommand;
use crate::connectivity::ControlSession;

/// Replies with the entry count followed by one name per line.
pub struct LsCommand {}

#[async_trait]
impl ControlCommand for LsCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        _request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let names = match list_names(&session.current_directory).await {
            Ok(names) => names,
            Err(e) => {
                warn!(
                    "Could not list {}: {}",
                    session.current_directory.display(),
                    e
                );
                Vec::new()
            }
        };

        session.send_line(&names.len().to_string()).await?;
        for name in &names {
            session.send_line(name).await?;
        }

        Ok(())
    }
}

async fn list_names(directory: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    names.sort();
    Ok(names)
}

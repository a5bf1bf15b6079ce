use std::path::PathBuf;

use async_trait::async_trait;
use ferry_core_lib::{data::protocol::CommandRequest, FerryError};
use tokio::fs;

use super::{ControlCommand, NO_SUCH_DIRECTORY};
use crate::connectivity::ControlSession;

/// Moves the session's working directory. `..` stops at the serving root and
/// no target may lie outside it.
pub struct CdCommand {}

#[async_trait]
impl ControlCommand for CdCommand {
    async fn execute(
        &self,
        session: &mut ControlSession,
        request: &CommandRequest,
    ) -> Result<(), FerryError> {
        let target = match request.argument.as_deref() {
            None | Some(".") => Some(session.current_directory.clone()),
            Some("..") => Some(parent_within_root(session)),
            Some(name) => child_within_root(session, name).await,
        };

        match target {
            Some(directory) => {
                debug!("{} changed directory to {}", session.uuid, directory.display());
                session.current_directory = directory;
                session.send_line("").await
            }
            None => session.send_line(NO_SUCH_DIRECTORY).await,
        }
    }
}

fn parent_within_root(session: &ControlSession) -> PathBuf {
    if session.current_directory == session.root() {
        return session.current_directory.clone();
    }

    match session.current_directory.parent() {
        Some(parent) if parent.starts_with(session.root()) => parent.to_path_buf(),
        _ => session.root().to_path_buf(),
    }
}

async fn child_within_root(session: &ControlSession, name: &str) -> Option<PathBuf> {
    let candidate = fs::canonicalize(session.current_directory.join(name))
        .await
        .ok()?;
    let metadata = fs::metadata(&candidate).await.ok()?;

    if metadata.is_dir() && candidate.starts_with(session.root()) {
        Some(candidate)
    } else {
        None
    }
}

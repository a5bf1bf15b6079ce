use ferry_core_lib::FerryError;

use crate::connectivity::Connection;

/// Any command answered with exactly one line: CD, MKDIR, PWD, DELETE and
/// whatever the server does not recognise.
pub struct RemoteCommand {
    line: String,
}

impl RemoteCommand {
    pub fn new(line: String) -> Self {
        RemoteCommand { line }
    }

    pub async fn execute(&self, connection: &mut Connection) -> Result<String, FerryError> {
        connection.send_line(&self.line).await?;
        connection.read_line().await
    }
}

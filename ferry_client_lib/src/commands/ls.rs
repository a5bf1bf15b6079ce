use ferry_core_lib::{
    data::protocol::{CommandRequest, CommandVerb},
    FerryError,
};

use crate::connectivity::Connection;

pub struct LsCommand {}

impl LsCommand {
    pub fn new() -> Self {
        LsCommand {}
    }

    /// Names in the remote working directory, as the server ordered them.
    pub async fn execute(&self, connection: &mut Connection) -> Result<Vec<String>, FerryError> {
        let request = CommandRequest::new(CommandVerb::Ls, None);
        connection.send_line(&request.to_line()).await?;

        let count_line = connection.read_line().await?;
        let count = count_line.trim().parse::<usize>().map_err(|_| {
            FerryError::protocol(format!("expected an entry count but received '{}'", count_line))
        })?;

        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            names.push(connection.read_line().await?);
        }

        Ok(names)
    }
}

impl Default for LsCommand {
    fn default() -> Self {
        Self::new()
    }
}

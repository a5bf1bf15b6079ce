use ferry_core_lib::{
    data::protocol::{CommandRequest, CommandVerb},
    FerryError,
};

use crate::connectivity::ControlSession;

use super::control_commands::{
    CdCommand, ControlCommand, DeleteCommand, GetCommand, LsCommand, MkdirCommand, PutCommand,
    PwdCommand, UnknownCommand, UNRECOGNIZED_FORMAT,
};

pub enum CommandFlow {
    Continue,
    Close,
}

pub struct CommandHandler {}

impl CommandHandler {
    /// Parses and runs one control line. A failing command is logged and the
    /// session carries on; only `QUIT` closes it.
    pub async fn handle_line(&self, line: &str, session: &mut ControlSession) -> CommandFlow {
        let request = match CommandRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Dropping command from {}: {}", session.uuid, e);
                if let Err(e) = session.send_line(UNRECOGNIZED_FORMAT).await {
                    warn!("Could not reply to {}: {}", session.uuid, e);
                }
                return CommandFlow::Continue;
            }
        };

        if request.verb == CommandVerb::Quit {
            return CommandFlow::Close;
        }

        if let Err(e) = self.handle_request(&request, session).await {
            warn!("Command '{}' from {} failed: {}", request, session.uuid, e);
        }

        CommandFlow::Continue
    }

    async fn handle_request(
        &self,
        request: &CommandRequest,
        session: &mut ControlSession,
    ) -> Result<(), FerryError> {
        match request.verb {
            CommandVerb::Get => {
                let command = GetCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Put => {
                let command = PutCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Ls => {
                let command = LsCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Cd => {
                let command = CdCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Mkdir => {
                let command = MkdirCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Pwd => {
                let command = PwdCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Delete => {
                let command = DeleteCommand {};
                command.execute(session, request).await
            }
            CommandVerb::Quit => Ok(()),
            // TERMINATE belongs on the terminate port.
            CommandVerb::Terminate | CommandVerb::Unknown(_) => {
                let command = UnknownCommand {};
                command.execute(session, request).await
            }
        }
    }
}

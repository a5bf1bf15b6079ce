use std::fmt;

use crate::FerryError;

pub const BACKGROUND_MARKER: &str = "&";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandVerb {
    Get,
    Put,
    Ls,
    Cd,
    Mkdir,
    Pwd,
    Delete,
    Quit,
    Terminate,
    Unknown(String),
}

impl CommandVerb {
    pub fn from_token(token: &str) -> CommandVerb {
        match token.to_ascii_uppercase().as_str() {
            "GET" => CommandVerb::Get,
            "PUT" => CommandVerb::Put,
            "LS" => CommandVerb::Ls,
            "CD" => CommandVerb::Cd,
            "MKDIR" => CommandVerb::Mkdir,
            "PWD" => CommandVerb::Pwd,
            "DELETE" => CommandVerb::Delete,
            "QUIT" => CommandVerb::Quit,
            "TERMINATE" => CommandVerb::Terminate,
            _ => CommandVerb::Unknown(token.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandVerb::Get => "GET",
            CommandVerb::Put => "PUT",
            CommandVerb::Ls => "LS",
            CommandVerb::Cd => "CD",
            CommandVerb::Mkdir => "MKDIR",
            CommandVerb::Pwd => "PWD",
            CommandVerb::Delete => "DELETE",
            CommandVerb::Quit => "QUIT",
            CommandVerb::Terminate => "TERMINATE",
            CommandVerb::Unknown(token) => token,
        }
    }

    /// Only transfers may carry the background marker.
    pub fn supports_background(&self) -> bool {
        matches!(self, CommandVerb::Get | CommandVerb::Put)
    }
}

/// One request line: `<VERB> [<ARG>] [&]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRequest {
    pub verb: CommandVerb,
    pub argument: Option<String>,
    pub background: bool,
}

impl CommandRequest {
    pub fn new(verb: CommandVerb, argument: Option<String>) -> CommandRequest {
        CommandRequest {
            verb,
            argument,
            background: false,
        }
    }

    pub fn background(verb: CommandVerb, argument: String) -> CommandRequest {
        CommandRequest {
            verb,
            argument: Some(argument),
            background: true,
        }
    }

    pub fn parse(line: &str) -> Result<CommandRequest, FerryError> {
        let mut tokens = line.split_whitespace();

        let verb = match tokens.next() {
            Some(token) => CommandVerb::from_token(token),
            None => return Err(FerryError::protocol("empty command")),
        };
        let argument = tokens.next().map(|token| token.to_string());

        let background = match tokens.next() {
            None => false,
            Some(BACKGROUND_MARKER) => true,
            Some(other) => {
                return Err(FerryError::protocol(format!(
                    "unrecognized trailing token '{}'",
                    other
                )))
            }
        };

        if tokens.next().is_some() {
            return Err(FerryError::protocol("too many arguments"));
        }

        if background && !verb.supports_background() {
            return Err(FerryError::protocol(format!(
                "{} cannot run in the background",
                verb.as_str()
            )));
        }

        Ok(CommandRequest {
            verb,
            argument,
            background,
        })
    }

    /// The argument, or a protocol violation naming the verb that needed it.
    pub fn require_argument(&self) -> Result<&str, FerryError> {
        self.argument
            .as_deref()
            .ok_or_else(|| FerryError::protocol(format!("{} requires an argument", self.verb.as_str())))
    }

    pub fn to_line(&self) -> String {
        let mut line = self.verb.as_str().to_string();

        if let Some(argument) = &self.argument {
            line.push(' ');
            line.push_str(argument);
        }

        if self.background {
            line.push(' ');
            line.push_str(BACKGROUND_MARKER);
        }

        line
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

mod cd_command;
pub use cd_command::CdCommand;
mod control_command;
pub use control_command::ControlCommand;
mod delete_command;
pub use delete_command::DeleteCommand;
mod get_command;
pub use get_command::GetCommand;
mod ls_command;
pub use ls_command::LsCommand;
mod mkdir_command;
pub use mkdir_command::MkdirCommand;
mod put_command;
pub use put_command::PutCommand;
mod pwd_command;
pub use pwd_command::PwdCommand;
mod unknown_command;
pub use unknown_command::UnknownCommand;

pub const UNRECOGNIZED_FORMAT: &str = "Unrecognized command format";
pub const UNKNOWN_COMMAND: &str = "Unknown command";
pub const NO_SUCH_DIRECTORY: &str = "No such file or directory.";
pub const DIRECTORY_CREATION_FAILED: &str = "New Directory creation failed";
pub const BLANK_DIRECTORY_NAME: &str = "Directory name must not be blank";
pub const FILE_DOES_NOT_EXIST: &str = "File does not exist.";

mod background_job;
pub use background_job::spawn_background_job;
mod command_handler;
pub use command_handler::{CommandFlow, CommandHandler};
pub mod control_commands;

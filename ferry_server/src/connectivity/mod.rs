mod connection_manager;
pub use connection_manager::ConnectionManager;
mod control_session;
pub use control_session::ControlSession;
mod server_state;
pub use server_state::ServerState;
mod terminate_session;
pub use terminate_session::TerminateSession;

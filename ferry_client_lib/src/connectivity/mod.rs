mod connection;
pub use connection::Connection;

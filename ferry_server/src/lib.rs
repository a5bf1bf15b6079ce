#[macro_use]
extern crate log;

pub mod configuration;
pub mod connectivity;
pub mod processing;

pub use configuration::ApplicationConfig;
pub use connectivity::ConnectionManager;

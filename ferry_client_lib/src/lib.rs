#[macro_use]
extern crate log;

pub mod client_instance;
pub mod commands;
pub mod connectivity;

pub use client_instance::ClientInstance;
pub use commands::BackgroundTransfer;

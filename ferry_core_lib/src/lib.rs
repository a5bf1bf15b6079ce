#[macro_use]
extern crate log;

pub mod data;
pub mod error;
pub mod jobs;

pub use error::FerryError;

pub mod protocol;
pub mod transfer;

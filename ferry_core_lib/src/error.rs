use thiserror::Error;

/// Every failure a ferry worker can observe.
#[derive(Debug, Error)]
pub enum FerryError {
    /// The requested file does not exist on the side that should provide it.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The peer sent something the line protocol does not allow.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Socket or file I/O failed mid-operation.
    #[error("transfer I/O error: {0}")]
    TransferIo(#[from] std::io::Error),

    /// A terminate request named a job that is not (or no longer) registered.
    #[error("unknown job id: {0}")]
    UnknownJobId(String),

    /// The peer closed a line-oriented stream.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FerryError {
    pub fn protocol(message: impl Into<String>) -> Self {
        FerryError::ProtocolViolation(message.into())
    }

    /// True when the peer hung up, either cleanly or halfway through a payload.
    pub fn is_disconnect(&self) -> bool {
        match self {
            FerryError::ConnectionClosed => true,
            FerryError::TransferIo(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }
}

pub mod chunked_codec;
mod file_access;
pub use file_access::mark_accessible;
pub use file_access::FileLock;
mod inbound;
pub use inbound::receive_file;
mod outbound;
pub use outbound::send_file;

/// How a whole file transfer ended, from the point of view of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Complete { bytes: u64 },
    Aborted { bytes: u64 },
}

impl TransferOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, TransferOutcome::Complete { .. })
    }

    pub fn bytes(&self) -> u64 {
        match self {
            TransferOutcome::Complete { bytes } | TransferOutcome::Aborted { bytes } => *bytes,
        }
    }
}

use std::fmt;

/// Opaque identifier of one background transfer. The server hands it out and
/// both peers track their own side of the job under the same string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> JobId {
        JobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> JobId {
        JobId(id.trim().to_string())
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> JobId {
        JobId(id.to_string())
    }
}

/// State of a registered job. A finished job is simply absent from the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    Running,
    CancelRequested,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferDirection {
    Get,
    Put,
}

/// Which end of the payload a side holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferRole {
    Send,
    Receive,
}

impl TransferRole {
    pub fn for_server(direction: TransferDirection) -> TransferRole {
        match direction {
            TransferDirection::Get => TransferRole::Send,
            TransferDirection::Put => TransferRole::Receive,
        }
    }

    pub fn for_client(direction: TransferDirection) -> TransferRole {
        match direction {
            TransferDirection::Get => TransferRole::Receive,
            TransferDirection::Put => TransferRole::Send,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_mirrored() {
        for direction in [TransferDirection::Get, TransferDirection::Put] {
            assert_ne!(
                TransferRole::for_server(direction),
                TransferRole::for_client(direction)
            );
        }
        assert_eq!(TransferRole::for_server(TransferDirection::Get), TransferRole::Send);
    }

    #[test]
    fn test_job_id_from_line() {
        assert_eq!(JobId::from(" 1000\n"), JobId::from(1000u64));
        assert_eq!(JobId::new("1001").to_string(), "1001");
    }
}

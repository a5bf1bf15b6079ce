use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    data::{
        protocol::ProtocolStream,
        transfer::{receive_file, send_file, TransferOutcome},
    },
    FerryError,
};

use super::{JobId, JobRegistry, TransferDirection, TransferRole};

/// One background transfer on its own dedicated connection.
///
/// The job owns its socket, file handle and buffer; the only thing it shares
/// with the rest of the process is its entry in the [`JobRegistry`], which it
/// polls between chunks and removes when it returns.
pub struct TransferJob {
    pub id: JobId,
    pub direction: TransferDirection,
    pub file_path: PathBuf,
    pub role: TransferRole,
}

impl TransferJob {
    pub fn new(
        id: JobId,
        direction: TransferDirection,
        file_path: PathBuf,
        role: TransferRole,
    ) -> TransferJob {
        TransferJob {
            id,
            direction,
            file_path,
            role,
        }
    }

    pub async fn run<S>(self, stream: S, registry: JobRegistry) -> Result<TransferOutcome, FerryError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let mut stream = ProtocolStream::new(stream);
        let probe = registry.probe(self.id.clone());

        info!(
            "Job {} started: {:?} {} ({:?})",
            self.id,
            self.direction,
            self.file_path.display(),
            self.role
        );

        let result = match self.role {
            TransferRole::Send => send_file(&mut stream, &self.file_path, &probe).await,
            TransferRole::Receive => receive_file(&mut stream, &self.file_path, &probe).await,
        };

        match &result {
            Ok(TransferOutcome::Complete { bytes }) => {
                info!("Job {} complete: {} bytes", self.id, bytes)
            }
            Ok(TransferOutcome::Aborted { bytes }) => {
                info!("Job {} terminated after {} bytes", self.id, bytes)
            }
            Err(e) => warn!("Job {} failed: {}", self.id, e),
        }

        stream.shutdown().await;
        drop(stream);
        registry.unregister(&self.id).await;

        result
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::duplex;

    use super::*;

    fn write_source(dir: &std::path::Path, length: usize) -> (PathBuf, Vec<u8>) {
        let path = dir.join("source.bin");
        let data: Vec<u8> = (0..length).map(|i| (i % 253) as u8).collect();
        std::fs::write(&path, &data).unwrap();
        (path, data)
    }

    #[tokio::test]
    async fn test_put_job_pair_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let (source, data) = write_source(dir.path(), 5000);
        let destination = dir.path().join("data.bin");

        let client_registry = JobRegistry::new();
        let server_registry = JobRegistry::new();
        let job_id = server_registry.allocate().await;
        client_registry.register(job_id.clone()).await;

        let (client_side, server_side) = duplex(1024);
        let client_job = TransferJob::new(
            job_id.clone(),
            TransferDirection::Put,
            source,
            TransferRole::for_client(TransferDirection::Put),
        );
        let server_job = TransferJob::new(
            job_id.clone(),
            TransferDirection::Put,
            destination.clone(),
            TransferRole::for_server(TransferDirection::Put),
        );

        let client = tokio::spawn(client_job.run(client_side, client_registry.clone()));
        let server = tokio::spawn(server_job.run(server_side, server_registry.clone()));

        assert_eq!(
            client.await.unwrap().unwrap(),
            TransferOutcome::Complete { bytes: 5000 }
        );
        assert_eq!(
            server.await.unwrap().unwrap(),
            TransferOutcome::Complete { bytes: 5000 }
        );
        assert_eq!(std::fs::read(&destination).unwrap(), data);
        assert!(client_registry.is_empty().await);
        assert!(server_registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_cancelled_receiver_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let (source, _) = write_source(dir.path(), 50_000);
        let destination = dir.path().join("bigfile.bin");

        let sender_registry = JobRegistry::new();
        let receiver_registry = JobRegistry::new();
        let job_id = JobId::from("1000");
        sender_registry.register(job_id.clone()).await;
        receiver_registry.register(job_id.clone()).await;
        receiver_registry.request_cancel(&job_id).await;

        let (sending_side, receiving_side) = duplex(1024);
        let sender = TransferJob::new(
            job_id.clone(),
            TransferDirection::Get,
            source,
            TransferRole::Send,
        );
        let receiver = TransferJob::new(
            job_id.clone(),
            TransferDirection::Get,
            destination.clone(),
            TransferRole::Receive,
        );

        let sending = tokio::spawn(sender.run(sending_side, sender_registry.clone()));
        let outcome = receiver
            .run(receiving_side, receiver_registry.clone())
            .await
            .unwrap();

        assert_eq!(outcome, TransferOutcome::Aborted { bytes: 1000 });
        assert!(!destination.exists());
        assert!(receiver_registry.is_empty().await);

        // The sender was never told, so it only sees the connection drop.
        assert!(sending.await.unwrap().is_err());
        assert!(sender_registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_both_sides_cancelled_report_aborted() {
        let dir = tempfile::tempdir().unwrap();
        let (source, _) = write_source(dir.path(), 50_000);
        let destination = dir.path().join("bigfile.bin");

        let sender_registry = JobRegistry::new();
        let receiver_registry = JobRegistry::new();
        let job_id = JobId::from("1001");
        for registry in [&sender_registry, &receiver_registry] {
            registry.register(job_id.clone()).await;
            registry.request_cancel(&job_id).await;
        }

        let (sending_side, receiving_side) = duplex(1024);
        let sender = TransferJob::new(job_id.clone(), TransferDirection::Get, source, TransferRole::Send);
        let receiver = TransferJob::new(
            job_id.clone(),
            TransferDirection::Get,
            destination.clone(),
            TransferRole::Receive,
        );

        let sending = tokio::spawn(sender.run(sending_side, sender_registry));
        let received = receiver.run(receiving_side, receiver_registry).await.unwrap();
        let sent = sending.await.unwrap().unwrap();

        assert!(!received.is_complete());
        assert!(!sent.is_complete());
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_small_file_is_not_cancelable() {
        let dir = tempfile::tempdir().unwrap();
        let (source, data) = write_source(dir.path(), 999);
        let destination = dir.path().join("small.bin");

        let registry = JobRegistry::new();
        let job_id = registry.allocate().await;
        registry.request_cancel(&job_id).await;

        let (sending_side, receiving_side) = duplex(4096);
        let sender = TransferJob::new(job_id.clone(), TransferDirection::Get, source, TransferRole::Send);
        let receiver = TransferJob::new(
            job_id.clone(),
            TransferDirection::Get,
            destination.clone(),
            TransferRole::Receive,
        );

        // Both ends share one registry here, so the entry is gone once either
        // finishes; neither consults it for a sub-chunk payload anyway.
        let sending = tokio::spawn(sender.run(sending_side, registry.clone()));
        let received = receiver.run(receiving_side, registry.clone()).await.unwrap();
        sending.await.unwrap().unwrap();

        assert_eq!(received, TransferOutcome::Complete { bytes: 999 });
        assert_eq!(std::fs::read(&destination).unwrap(), data);
    }
}

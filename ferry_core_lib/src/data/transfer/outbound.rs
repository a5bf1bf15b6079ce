use std::{io::ErrorKind, path::Path};

use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt, AsyncWrite},
};

use crate::{
    data::protocol::{ControlWord, ProtocolStream},
    jobs::CancelProbe,
    FerryError,
};

use super::{
    chunked_codec::{self, SendOutcome},
    FileLock, TransferOutcome,
};

/// Sending half of a file transfer: announce the length, wait for `READY`,
/// then stream the chunks. Used inline on the control stream and by
/// background jobs alike.
pub async fn send_file<S>(
    stream: &mut ProtocolStream<S>,
    path: &Path,
    probe: &dyn CancelProbe,
) -> Result<TransferOutcome, FerryError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FerryError::NotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let lock = FileLock::try_acquire(&file).await;

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).await?;

    chunked_codec::write_length(stream.raw(), buffer.len()).await?;
    stream.expect_word(ControlWord::Ready).await?;

    let result = chunked_codec::send_chunks(stream.raw(), &buffer, probe).await;
    drop(lock);

    match result {
        Ok(SendOutcome::Complete { bytes_sent }) => Ok(TransferOutcome::Complete {
            bytes: bytes_sent as u64,
        }),
        Ok(SendOutcome::Aborted { bytes_sent }) => Ok(TransferOutcome::Aborted {
            bytes: bytes_sent as u64,
        }),
        // The receiver hung up because it saw the same cancellation first.
        Err(e) if probe.is_cancelled().await => {
            debug!("Send of {} ended after cancellation: {}", path.display(), e);
            Ok(TransferOutcome::Aborted { bytes: 0 })
        }
        Err(e) => Err(e),
    }
}

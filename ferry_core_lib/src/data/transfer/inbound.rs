use std::path::Path;

use tempfile::TempPath;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
};

use crate::{
    data::protocol::{ControlWord, ProtocolStream},
    jobs::CancelProbe,
    FerryError,
};

use super::{
    chunked_codec::{self, ReceiveOutcome},
    mark_accessible, FileLock, TransferOutcome,
};

/// Receiving half of a file transfer: read the length, reply `READY`, collect
/// the chunks and persist the whole buffer once it is complete.
///
/// The payload lands in a hidden `.part` sibling first and only replaces
/// `path` after the last byte arrived. A rejected length, a cancellation or
/// an I/O failure leaves whatever was at `path` untouched.
pub async fn receive_file<S>(
    stream: &mut ProtocolStream<S>,
    path: &Path,
    probe: &dyn CancelProbe,
) -> Result<TransferOutcome, FerryError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let length = chunked_codec::read_length(stream.raw()).await?;
    let mut buffer = chunked_codec::payload_buffer(length)?;

    let (file, temp_path) = partial_file(path)?;
    let mut file = File::from_std(file);
    let lock = FileLock::try_acquire(&file).await;

    let result = receive_into(stream, &mut file, &mut buffer, length, probe).await;

    drop(lock);
    drop(file);

    match result {
        Ok(TransferOutcome::Complete { bytes }) => {
            temp_path.persist(path).map_err(|e| e.error)?;
            mark_accessible(path).await;
            Ok(TransferOutcome::Complete { bytes })
        }
        Ok(TransferOutcome::Aborted { bytes }) => {
            discard_partial(temp_path);
            Ok(TransferOutcome::Aborted { bytes })
        }
        Err(e) => {
            discard_partial(temp_path);

            if probe.is_cancelled().await {
                debug!("Receive of {} ended after cancellation: {}", path.display(), e);
                Ok(TransferOutcome::Aborted { bytes: 0 })
            } else {
                Err(e)
            }
        }
    }
}

async fn receive_into<S>(
    stream: &mut ProtocolStream<S>,
    file: &mut File,
    buffer: &mut Vec<u8>,
    length: usize,
    probe: &dyn CancelProbe,
) -> Result<TransferOutcome, FerryError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    stream.write_word(ControlWord::Ready).await?;

    if let Some(bytes_received) =
        chunked_codec::receive_chunks_into(stream.raw(), buffer, length, probe).await?
    {
        return Ok(TransferOutcome::Aborted {
            bytes: bytes_received as u64,
        });
    }

    file.write_all(buffer).await?;
    file.flush().await?;
    Ok(TransferOutcome::Complete {
        bytes: buffer.len() as u64,
    })
}

/// Fresh `.<name>.XXXX.part` file next to `path`, removed again when its
/// [`TempPath`] is dropped without being persisted.
fn partial_file(path: &Path) -> Result<(std::fs::File, TempPath), FerryError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let partial = tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".part")
        .tempfile_in(directory)?;

    Ok(partial.into_parts())
}

fn discard_partial(temp_path: TempPath) {
    let display = temp_path.display().to_string();
    match temp_path.close() {
        Ok(()) => debug!("Removed partial file {}", display),
        Err(e) => warn!("Could not remove partial file {}: {}", display, e),
    }
}

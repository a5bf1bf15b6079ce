//! Length-announced payload framing.
//!
//! A payload travels as its decimal length on a text line followed by the raw
//! bytes in successive chunks of at most [`CHUNK_SIZE`] bytes. There is no
//! per-chunk header and no checksum, so the receiver must know the total length
//! before it starts reading.
//!
//! Payloads shorter than one chunk are moved with a single write/read and are
//! not probed for cancellation. Longer payloads are probed between chunks, so a
//! cancellation is observed at most one chunk after it was requested.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    jobs::{CancelProbe, NeverCancel},
    FerryError,
};

pub const CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Complete { bytes_sent: usize },
    Aborted { bytes_sent: usize },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Complete(Vec<u8>),
    Aborted { bytes_received: usize },
}

pub async fn write_length<W>(writer: &mut W, length: usize) -> Result<(), FerryError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(format!("{}\n", length).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_length<R>(reader: &mut R) -> Result<usize, FerryError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = String::new();

    if reader.read_line(&mut line).await? == 0 {
        return Err(FerryError::ConnectionClosed);
    }

    let line = line.trim();
    line.parse::<usize>()
        .map_err(|_| FerryError::protocol(format!("invalid payload length '{}'", line)))
}

/// Announce the length of `buffer`, then send it in chunks.
pub async fn send<W>(writer: &mut W, buffer: &[u8]) -> Result<(), FerryError>
where
    W: AsyncWrite + Unpin + Send,
{
    write_length(writer, buffer.len()).await?;
    send_chunks(writer, buffer, &NeverCancel).await?;
    Ok(())
}

/// Receive a payload whose length has already been read.
pub async fn receive<R>(reader: &mut R, length: usize) -> Result<Vec<u8>, FerryError>
where
    R: AsyncRead + Unpin + Send,
{
    match receive_chunks(reader, length, &NeverCancel).await? {
        ReceiveOutcome::Complete(buffer) => Ok(buffer),
        ReceiveOutcome::Aborted { bytes_received } => Err(FerryError::protocol(format!(
            "payload aborted after {} of {} bytes",
            bytes_received, length
        ))),
    }
}

pub async fn send_chunks<W>(
    writer: &mut W,
    buffer: &[u8],
    probe: &dyn CancelProbe,
) -> Result<SendOutcome, FerryError>
where
    W: AsyncWrite + Unpin + Send,
{
    if buffer.len() < CHUNK_SIZE {
        writer.write_all(buffer).await?;
        writer.flush().await?;
        return Ok(SendOutcome::Complete {
            bytes_sent: buffer.len(),
        });
    }

    let mut bytes_sent = 0;

    for chunk in buffer.chunks(CHUNK_SIZE) {
        writer.write_all(chunk).await?;
        writer.flush().await?;
        bytes_sent += chunk.len();

        if bytes_sent < buffer.len() && probe.is_cancelled().await {
            debug!("Send cancelled after {} of {} bytes", bytes_sent, buffer.len());
            return Ok(SendOutcome::Aborted { bytes_sent });
        }
    }

    Ok(SendOutcome::Complete { bytes_sent })
}

/// Empty buffer with room for a payload of `length` bytes.
///
/// The announced length comes from the peer, so an allocation that cannot be
/// satisfied is reported as a protocol violation instead of aborting.
pub fn payload_buffer(length: usize) -> Result<Vec<u8>, FerryError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(length)
        .map_err(|_| FerryError::protocol(format!("cannot allocate {} bytes", length)))?;
    Ok(buffer)
}

pub async fn receive_chunks<R>(
    reader: &mut R,
    length: usize,
    probe: &dyn CancelProbe,
) -> Result<ReceiveOutcome, FerryError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut buffer = payload_buffer(length)?;

    match receive_chunks_into(reader, &mut buffer, length, probe).await? {
        Some(bytes_received) => Ok(ReceiveOutcome::Aborted { bytes_received }),
        None => Ok(ReceiveOutcome::Complete(buffer)),
    }
}

/// Append `length` payload bytes to `buffer`. Returns the byte count reached
/// when the transfer was cancelled, `None` once everything arrived.
pub async fn receive_chunks_into<R>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
    length: usize,
    probe: &dyn CancelProbe,
) -> Result<Option<usize>, FerryError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut chunk = [0u8; CHUNK_SIZE];

    if length < CHUNK_SIZE {
        reader.read_exact(&mut chunk[..length]).await?;
        buffer.extend_from_slice(&chunk[..length]);
        return Ok(None);
    }

    let mut offset = 0;

    while offset < length {
        let size = CHUNK_SIZE.min(length - offset);
        reader.read_exact(&mut chunk[..size]).await?;
        buffer.extend_from_slice(&chunk[..size]);
        offset += size;

        if offset < length && probe.is_cancelled().await {
            debug!("Receive cancelled after {} of {} bytes", offset, length);
            return Ok(Some(offset));
        }
    }

    Ok(None)
}

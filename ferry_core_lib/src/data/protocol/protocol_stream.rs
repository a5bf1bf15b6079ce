use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::FerryError;

use super::ControlWord;

/// Buffered duplex stream speaking the line protocol.
///
/// Lines and raw payload bytes are read through the same buffer, so a payload
/// that arrives in the same segment as its length line is never lost.
pub struct ProtocolStream<S> {
    inner: BufReader<S>,
}

impl<S> ProtocolStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> ProtocolStream<S> {
        ProtocolStream {
            inner: BufReader::new(stream),
        }
    }

    /// Next line without its terminator, or `None` once the peer has closed.
    pub async fn read_line(&mut self) -> Result<Option<String>, FerryError> {
        let mut line = String::new();
        let bytes_read = self.inner.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }

        Ok(Some(line))
    }

    pub async fn expect_line(&mut self) -> Result<String, FerryError> {
        match self.read_line().await? {
            Some(line) => Ok(line),
            None => Err(FerryError::ConnectionClosed),
        }
    }

    pub async fn expect_word(&mut self, word: ControlWord) -> Result<(), FerryError> {
        let line = self.expect_line().await?;

        if word.matches(&line) {
            Ok(())
        } else {
            Err(FerryError::protocol(format!(
                "expected {} but received '{}'",
                word, line
            )))
        }
    }

    pub async fn write_line(&mut self, line: &str) -> Result<(), FerryError> {
        let writer = self.inner.get_mut();
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn write_word(&mut self, word: ControlWord) -> Result<(), FerryError> {
        self.write_line(word.as_str()).await
    }

    /// Raw access for the chunked codec. Reads go through the line buffer,
    /// writes pass straight to the underlying stream.
    pub fn raw(&mut self) -> &mut BufReader<S> {
        &mut self.inner
    }

    pub async fn shutdown(&mut self) {
        if let Err(e) = self.inner.get_mut().shutdown().await {
            debug!("Shutdown of protocol stream failed: {}", e);
        }
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{duplex, AsyncReadExt};

    use super::*;

    #[tokio::test]
    async fn test_lines_round_trip() {
        let (left, right) = duplex(64);
        let mut left = ProtocolStream::new(left);
        let mut right = ProtocolStream::new(right);

        left.write_line("GET report.txt").await.unwrap();
        left.write_word(ControlWord::Ready).await.unwrap();

        assert_eq!(right.expect_line().await.unwrap(), "GET report.txt");
        right.expect_word(ControlWord::Ready).await.unwrap();
    }

    #[tokio::test]
    async fn test_crlf_is_stripped() {
        let (left, right) = duplex(64);
        let mut right = ProtocolStream::new(right);
        let mut left = left;

        left.write_all(b"ready\r\n").await.unwrap();

        right.expect_word(ControlWord::Ready).await.unwrap();
    }

    #[tokio::test]
    async fn test_eof_is_none() {
        let (left, right) = duplex(64);
        let mut right = ProtocolStream::new(right);
        drop(left);

        assert!(right.read_line().await.unwrap().is_none());
        assert!(matches!(
            right.expect_line().await,
            Err(FerryError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_payload_after_line_is_kept() {
        let (left, right) = duplex(64);
        let mut right = ProtocolStream::new(right);
        let mut left = left;

        left.write_all(b"3\nabc").await.unwrap();

        assert_eq!(right.expect_line().await.unwrap(), "3");
        let mut payload = [0u8; 3];
        right.raw().read_exact(&mut payload).await.unwrap();
        assert_eq!(&payload, b"abc");
    }

    #[tokio::test]
    async fn test_unexpected_word_is_violation() {
        let (left, right) = duplex(64);
        let mut left = ProtocolStream::new(left);
        let mut right = ProtocolStream::new(right);

        left.write_line("NOPE").await.unwrap();

        assert!(matches!(
            right.expect_word(ControlWord::Ready).await,
            Err(FerryError::ProtocolViolation(_))
        ));
    }
}

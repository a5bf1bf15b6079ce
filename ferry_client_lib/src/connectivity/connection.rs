use ferry_core_lib::{data::protocol::ProtocolStream, FerryError};
use tokio::net::TcpStream;

pub struct Connection {
    pub stream: Option<ProtocolStream<TcpStream>>,
    pub active: bool,
    pub host: String,
    pub port: u16,
}

impl Connection {
    pub fn new(host: String, port: u16) -> Connection {
        Connection {
            stream: None,
            active: false,
            host,
            port,
        }
    }

    pub async fn connect(&mut self) -> Result<(), FerryError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        debug!("Connected to {}:{}", self.host, self.port);
        self.stream = Some(ProtocolStream::new(stream));
        self.active = true;
        Ok(())
    }

    pub async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await;
        }
        self.active = false;
    }

    pub fn stream(&mut self) -> Result<&mut ProtocolStream<TcpStream>, FerryError> {
        self.stream.as_mut().ok_or(FerryError::ConnectionClosed)
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), FerryError> {
        debug!("-> {}:{} {}", self.host, self.port, line);
        self.stream()?.write_line(line).await
    }

    pub async fn read_line(&mut self) -> Result<String, FerryError> {
        self.stream()?.expect_line().await
    }
}

use std::{net::SocketAddr, path::Path, time::Duration};

use ferry_core_lib::{
    data::{
        protocol::{ControlWord, ProtocolStream},
        transfer::chunked_codec,
    },
    jobs::{JobRegistry, NeverCancel},
};
use ferry_server::{ApplicationConfig, ConnectionManager};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::{sleep, timeout},
};

struct TestServer {
    directory: TempDir,
    control: SocketAddr,
    terminate: SocketAddr,
    registry: JobRegistry,
}

async fn start_server() -> TestServer {
    let directory = tempfile::tempdir().unwrap();
    let config = ApplicationConfig {
        host: Some("127.0.0.1".to_string()),
        port: Some(0),
        terminate_port: Some(0),
        serving_directory: Some(directory.path().to_string_lossy().into_owned()),
        job_id_base: None,
    };

    let manager = ConnectionManager::bind(config).await.unwrap();
    let control = manager.control_addr().unwrap();
    let terminate = manager.terminate_addr().unwrap();
    let registry = manager.registry();
    tokio::spawn(manager.listen_for_connections());

    TestServer {
        directory,
        control,
        terminate,
        registry,
    }
}

async fn connect(addr: SocketAddr) -> ProtocolStream<TcpStream> {
    ProtocolStream::new(TcpStream::connect(addr).await.unwrap())
}

async fn request(stream: &mut ProtocolStream<TcpStream>, line: &str) -> String {
    stream.write_line(line).await.unwrap();
    stream.expect_line().await.unwrap()
}

async fn wait_until_idle(registry: &JobRegistry) {
    timeout(Duration::from_secs(20), async {
        while !registry.is_empty().await {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("background jobs did not finish");
}

fn write_file(directory: &Path, name: &str, length: usize) -> Vec<u8> {
    let data: Vec<u8> = (0..length).map(|i| (i % 241) as u8).collect();
    std::fs::write(directory.join(name), &data).unwrap();
    data
}

#[tokio::test]
async fn test_missing_file_keeps_session_usable() {
    let server = start_server().await;
    let mut control = connect(server.control).await;

    assert_eq!(request(&mut control, "GET missing.txt").await, "NOT FOUND");
    assert!(request(&mut control, "PWD")
        .await
        .starts_with("Remote working directory: "));
}

#[tokio::test]
async fn test_malformed_and_unknown_commands() {
    let server = start_server().await;
    let mut control = connect(server.control).await;

    assert_eq!(
        request(&mut control, "GET a.txt now").await,
        "Unrecognized command format"
    );
    assert_eq!(
        request(&mut control, "LS docs &").await,
        "Unrecognized command format"
    );
    assert_eq!(request(&mut control, "FROB x").await, "Unknown command");
    assert_eq!(request(&mut control, "TERMINATE 1000").await, "Unknown command");
    assert_eq!(request(&mut control, "get ../escape.txt").await, "NOT FOUND");
}

#[tokio::test]
async fn test_foreground_get_sends_chunks_then_sent() {
    let server = start_server().await;
    let data = write_file(server.directory.path(), "data.bin", 2500);
    let mut control = connect(server.control).await;

    assert_eq!(request(&mut control, "get data.bin").await, "EXISTS");
    let length = chunked_codec::read_length(control.raw()).await.unwrap();
    assert_eq!(length, 2500);
    control.write_word(ControlWord::Ready).await.unwrap();
    let received = chunked_codec::receive(control.raw(), length).await.unwrap();
    control.expect_word(ControlWord::Sent).await.unwrap();

    assert_eq!(received, data);
}

#[tokio::test]
async fn test_foreground_put_writes_file() {
    let server = start_server().await;
    let data: Vec<u8> = (0..1500).map(|i| (i % 7) as u8).collect();
    let mut control = connect(server.control).await;

    control.write_line("PUT upload.bin").await.unwrap();
    chunked_codec::write_length(control.raw(), data.len()).await.unwrap();
    control.expect_word(ControlWord::Ready).await.unwrap();
    chunked_codec::send_chunks(control.raw(), &data, &NeverCancel)
        .await
        .unwrap();
    control.expect_word(ControlWord::Received).await.unwrap();

    let stored = std::fs::read(server.directory.path().join("upload.bin")).unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn test_background_put_negotiates_port_and_job_id() {
    let server = start_server().await;
    let data: Vec<u8> = (0..5000).map(|i| (i % 13) as u8).collect();
    let mut control = connect(server.control).await;

    control.write_line("PUT later.bin &").await.unwrap();
    let port: u16 = request(&mut control, "0").await.parse().unwrap();
    let job_id = control.expect_line().await.unwrap();
    assert_ne!(port, 0);
    assert_eq!(job_id, "1000");

    let mut job = connect(SocketAddr::from(([127, 0, 0, 1], port))).await;
    chunked_codec::write_length(job.raw(), data.len()).await.unwrap();
    job.expect_word(ControlWord::Ready).await.unwrap();
    chunked_codec::send_chunks(job.raw(), &data, &NeverCancel)
        .await
        .unwrap();
    job.shutdown().await;

    wait_until_idle(&server.registry).await;
    let stored = std::fs::read(server.directory.path().join("later.bin")).unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn test_invalid_port_drops_background_command() {
    let server = start_server().await;
    let mut control = connect(server.control).await;

    control.write_line("PUT later.bin &").await.unwrap();
    assert_eq!(request(&mut control, "not-a-port").await, "Invalid port");

    assert!(server.registry.is_empty().await);
    assert!(request(&mut control, "PWD")
        .await
        .starts_with("Remote working directory: "));
}

#[tokio::test]
async fn test_terminate_session_replies() {
    let server = start_server().await;
    let mut terminate = connect(server.terminate).await;

    assert_eq!(request(&mut terminate, "4242").await, "UNKNOWN ID");
    terminate.write_line("").await.unwrap();
    assert_eq!(request(&mut terminate, "  77  ").await, "UNKNOWN ID");

    terminate.write_line("quit").await.unwrap();
    assert_eq!(terminate.read_line().await.unwrap(), None);
}

#[tokio::test]
async fn test_terminate_stops_running_get_job() {
    let server = start_server().await;
    let length = 32 * 1024 * 1024;
    write_file(server.directory.path(), "big.bin", length);
    let mut control = connect(server.control).await;
    let mut terminate = connect(server.terminate).await;

    assert_eq!(request(&mut control, "GET big.bin &").await, "EXISTS");
    let port: u16 = request(&mut control, "0").await.parse().unwrap();
    let job_id = control.expect_line().await.unwrap();

    let mut job = connect(SocketAddr::from(([127, 0, 0, 1], port))).await;
    assert_eq!(chunked_codec::read_length(job.raw()).await.unwrap(), length);
    job.write_word(ControlWord::Ready).await.unwrap();
    let mut first_chunk = vec![0u8; chunked_codec::CHUNK_SIZE];
    job.raw().read_exact(&mut first_chunk).await.unwrap();

    assert_eq!(request(&mut terminate, &job_id).await, "TERMINATING");

    let mut rest = Vec::new();
    let _ = job.raw().read_to_end(&mut rest).await;
    assert!(first_chunk.len() + rest.len() < length);

    wait_until_idle(&server.registry).await;
    assert_eq!(request(&mut terminate, &job_id).await, "UNKNOWN ID");
}

#[tokio::test]
async fn test_directory_commands() {
    let server = start_server().await;
    write_file(server.directory.path(), "b.txt", 10);
    let mut control = connect(server.control).await;

    assert_eq!(request(&mut control, "MKDIR docs").await, "");
    assert_eq!(request(&mut control, "MKDIR docs").await, "New Directory creation failed");
    assert_eq!(request(&mut control, "MKDIR").await, "Directory name must not be blank");

    assert_eq!(request(&mut control, "LS").await, "2");
    assert_eq!(control.expect_line().await.unwrap(), "b.txt");
    assert_eq!(control.expect_line().await.unwrap(), "docs");

    assert_eq!(request(&mut control, "CD docs").await, "");
    assert!(request(&mut control, "PWD").await.ends_with("docs"));
    assert_eq!(request(&mut control, "LS").await, "0");
    assert_eq!(request(&mut control, "CD ..").await, "");
    assert_eq!(request(&mut control, "CD ..").await, "");
    assert_eq!(request(&mut control, "CD nowhere").await, "No such file or directory.");
    assert_eq!(request(&mut control, "CD b.txt").await, "No such file or directory.");

    assert_eq!(request(&mut control, "DELETE b.txt").await, "Removed b.txt");
    assert_eq!(request(&mut control, "DELETE b.txt").await, "File does not exist.");
    assert_eq!(request(&mut control, "DELETE docs").await, "Removed docs");
}

#[tokio::test]
async fn test_put_onto_directory_is_refused_without_desync() {
    let server = start_server().await;
    let mut control = connect(server.control).await;

    assert_eq!(request(&mut control, "MKDIR docs").await, "");
    control.write_line("PUT docs").await.unwrap();
    assert_eq!(request(&mut control, "10").await, "Unrecognized command format");

    assert!(request(&mut control, "PWD")
        .await
        .starts_with("Remote working directory: "));
    assert!(server.directory.path().join("docs").is_dir());
}

#[tokio::test]
async fn test_oversized_put_length_keeps_server_alive() {
    let server = start_server().await;
    let mut control = connect(server.control).await;

    control.write_line("PUT huge.bin").await.unwrap();
    assert_eq!(
        request(&mut control, &usize::MAX.to_string()).await,
        "Unrecognized command format"
    );
    assert!(request(&mut control, "PWD")
        .await
        .starts_with("Remote working directory: "));

    // Whether this one is refused depends on the host's overcommit policy.
    let mut greedy = connect(server.control).await;
    greedy.write_line("PUT huge.bin").await.unwrap();
    greedy.write_line("100000000000000").await.unwrap();

    let mut other = connect(server.control).await;
    assert!(request(&mut other, "PWD")
        .await
        .starts_with("Remote working directory: "));
    assert!(!server.directory.path().join("huge.bin").exists());
}

#[tokio::test]
async fn test_malformed_put_length_keeps_existing_file() {
    let server = start_server().await;
    let data = write_file(server.directory.path(), "keep.txt", 1234);
    let mut control = connect(server.control).await;

    control.write_line("PUT keep.txt").await.unwrap();
    assert_eq!(
        request(&mut control, "not-a-length").await,
        "Unrecognized command format"
    );

    let stored = std::fs::read(server.directory.path().join("keep.txt")).unwrap();
    assert_eq!(stored, data);
    assert!(request(&mut control, "PWD")
        .await
        .starts_with("Remote working directory: "));
}

#[tokio::test]
async fn test_terminated_put_keeps_existing_file() {
    let server = start_server().await;
    let data = write_file(server.directory.path(), "keep.bin", 1234);
    let mut control = connect(server.control).await;
    let mut terminate = connect(server.terminate).await;

    control.write_line("PUT keep.bin &").await.unwrap();
    let port: u16 = request(&mut control, "0").await.parse().unwrap();
    let job_id = control.expect_line().await.unwrap();

    let mut job = connect(SocketAddr::from(([127, 0, 0, 1], port))).await;
    chunked_codec::write_length(job.raw(), 50_000).await.unwrap();
    job.expect_word(ControlWord::Ready).await.unwrap();
    job.raw()
        .write_all(&[3u8; chunked_codec::CHUNK_SIZE])
        .await
        .unwrap();

    assert_eq!(request(&mut terminate, &job_id).await, "TERMINATING");
    let _ = job.raw().write_all(&[3u8; 4 * chunked_codec::CHUNK_SIZE]).await;

    wait_until_idle(&server.registry).await;
    drop(job);

    let stored = std::fs::read(server.directory.path().join("keep.bin")).unwrap();
    assert_eq!(stored, data);
    let leftovers = std::fs::read_dir(server.directory.path())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".part")
        })
        .count();
    assert_eq!(leftovers, 0);
}

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::path::PathBuf;

use clap::{arg, value_parser, Command};
use ferry_client_lib::ClientInstance;

mod prompt;
use prompt::Prompt;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = Command::new("ferry")
        .about("Ferry client CLI")
        .version("1.0")
        .arg(arg!(--host <host> "The host to connect to").default_value("127.0.0.1"))
        .arg(
            arg!(-p --port <port> "The control port to connect to")
                .value_parser(value_parser!(u16))
                .default_value("7777"),
        )
        .arg(
            arg!(-t --"terminate-port" <port> "The terminate port to connect to")
                .value_parser(value_parser!(u16))
                .default_value("7778"),
        )
        .arg(arg!(-d --directory <directory> "Local directory for transferred files"))
        .get_matches();

    let host = matches
        .get_one::<String>("host")
        .cloned()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = matches.get_one::<u16>("port").copied().unwrap_or(7777);
    let terminate_port = matches
        .get_one::<u16>("terminate-port")
        .copied()
        .unwrap_or(7778);
    let local_directory = matches
        .get_one::<String>("directory")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let client = match ClientInstance::new(host.clone(), port, terminate_port, local_directory).await {
        Ok(client) => client,
        Err(e) => {
            error!("Could not connect to {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };
    info!("Connected to {}:{} (terminate {})", host, port, terminate_port);

    let mut prompt = Prompt::new(client);
    prompt.run().await;
}

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use clap::{arg, command, value_parser};
use ferry_server::{ApplicationConfig, ConnectionManager};

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = command!()
        .about("Serves a directory over the ferry protocol")
        .arg(arg!(-c --config <FILE> "YAML configuration file").default_value("config.yaml"))
        .arg(
            arg!(-p --port <PORT> "Port for control connections")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            arg!(-t --"terminate-port" <PORT> "Port for terminate connections")
                .value_parser(value_parser!(u16)),
        )
        .arg(arg!(-d --directory <DIR> "Directory to serve"))
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.yaml");
    let config = match ApplicationConfig::build_from(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let overrides = ApplicationConfig {
        port: matches.get_one::<u16>("port").copied(),
        terminate_port: matches.get_one::<u16>("terminate-port").copied(),
        serving_directory: matches.get_one::<String>("directory").cloned(),
        ..Default::default()
    };
    let config = config.merge(overrides);

    let manager = match ConnectionManager::bind(config).await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Could not start server: {}", e);
            std::process::exit(1);
        }
    };

    manager.listen_for_connections().await;
}

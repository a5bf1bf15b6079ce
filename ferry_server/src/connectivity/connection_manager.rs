use std::{io, net::SocketAddr, path::PathBuf, sync::Arc};

use ferry_core_lib::{jobs::JobRegistry, FerryError};
use tokio::{
    fs,
    net::{TcpListener, TcpStream},
};

use super::{ControlSession, ServerState, TerminateSession};
use crate::ApplicationConfig;

/// Owns the control and terminate listeners and hands every accepted
/// connection to its own session task.
pub struct ConnectionManager {
    control_listener: TcpListener,
    terminate_listener: TcpListener,
    state: Arc<ServerState>,
}

impl ConnectionManager {
    pub async fn bind(config: ApplicationConfig) -> Result<ConnectionManager, FerryError> {
        let serving_directory = PathBuf::from(config.serving_directory());
        fs::create_dir_all(&serving_directory).await?;
        let root = fs::canonicalize(&serving_directory).await?;

        let control_listener = TcpListener::bind((config.host(), config.port())).await?;
        let terminate_listener =
            TcpListener::bind((config.host(), config.terminate_port())).await?;
        info!(
            "Listening on {} (control) and {} (terminate), serving {}",
            control_listener.local_addr()?,
            terminate_listener.local_addr()?,
            root.display()
        );

        Ok(ConnectionManager {
            control_listener,
            terminate_listener,
            state: Arc::new(ServerState::new(config, root)),
        })
    }

    pub fn control_addr(&self) -> io::Result<SocketAddr> {
        self.control_listener.local_addr()
    }

    pub fn terminate_addr(&self) -> io::Result<SocketAddr> {
        self.terminate_listener.local_addr()
    }

    pub fn registry(&self) -> JobRegistry {
        self.state.registry.clone()
    }

    pub async fn listen_for_connections(self) {
        let ConnectionManager {
            control_listener,
            terminate_listener,
            state,
        } = self;

        let terminate_state = state.clone();
        tokio::spawn(async move {
            accept_terminate_connections(terminate_listener, terminate_state).await;
        });

        loop {
            match control_listener.accept().await {
                Ok((socket, peer)) => {
                    info!("New control connection accepted from: {}", peer);
                    handle_control_connection(socket, state.clone());
                }
                Err(e) => error!("Failed to accept control connection: {}", e),
            }
        }
    }
}

async fn accept_terminate_connections(listener: TcpListener, state: Arc<ServerState>) {
    loop {
        match listener.accept().await {
            Ok((socket, peer)) => {
                info!("New terminate connection accepted from: {}", peer);
                let registry = state.registry.clone();
                tokio::spawn(async move {
                    let mut session = TerminateSession::new(socket, registry);
                    session.listen().await;
                });
            }
            Err(e) => error!("Failed to accept terminate connection: {}", e),
        }
    }
}

fn handle_control_connection(socket: TcpStream, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let mut session = ControlSession::new(socket, state);
        session.listen().await;
    });
}

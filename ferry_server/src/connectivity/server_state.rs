use std::path::PathBuf;

use ferry_core_lib::jobs::JobRegistry;

use crate::ApplicationConfig;

/// Everything the sessions of one server share.
pub struct ServerState {
    pub config: ApplicationConfig,
    pub registry: JobRegistry,
    /// Canonical serving directory. Sessions never leave it.
    pub root: PathBuf,
}

impl ServerState {
    pub fn new(config: ApplicationConfig, root: PathBuf) -> ServerState {
        let registry = JobRegistry::with_base(config.job_id_base());
        ServerState {
            config,
            registry,
            root,
        }
    }
}

use std::path::Path;

use ferry_core_lib::{jobs::DEFAULT_JOB_ID_BASE, FerryError};
use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7777;
const DEFAULT_TERMINATE_PORT: u16 = 7778;
const DEFAULT_SERVING_DIRECTORY: &str = "./files";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub terminate_port: Option<u16>,
    pub serving_directory: Option<String>,
    pub job_id_base: Option<u64>,
}

impl ApplicationConfig {
    pub fn build() -> Result<ApplicationConfig, FerryError> {
        ApplicationConfig::build_from("config.yaml")
    }

    /// Defaults, overlaid with the YAML file at `path` when there is one.
    pub fn build_from(path: impl AsRef<Path>) -> Result<ApplicationConfig, FerryError> {
        let path = path.as_ref();
        let defaults = ApplicationConfig::get_defaults();
        let yaml = match std::fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(e) => {
                debug!("No configuration read from {}: {}", path.display(), e);
                return Ok(defaults);
            }
        };

        let user_config = ApplicationConfig::from_yaml(&yaml)?;
        Ok(defaults.merge(user_config))
    }

    pub fn from_yaml(yaml: &str) -> Result<ApplicationConfig, FerryError> {
        serde_yaml::from_str(yaml).map_err(|e| FerryError::Configuration(e.to_string()))
    }

    /// Values set in `other` win over the ones in `self`.
    pub fn merge(&self, other: ApplicationConfig) -> Self {
        Self {
            host: other.host.or(self.host.clone()),
            port: other.port.or(self.port),
            terminate_port: other.terminate_port.or(self.terminate_port),
            serving_directory: other.serving_directory.or(self.serving_directory.clone()),
            job_id_base: other.job_id_base.or(self.job_id_base),
        }
    }

    pub fn get_defaults() -> ApplicationConfig {
        ApplicationConfig {
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            terminate_port: Some(DEFAULT_TERMINATE_PORT),
            serving_directory: Some(DEFAULT_SERVING_DIRECTORY.to_string()),
            job_id_base: Some(DEFAULT_JOB_ID_BASE),
        }
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn terminate_port(&self) -> u16 {
        self.terminate_port.unwrap_or(DEFAULT_TERMINATE_PORT)
    }

    pub fn serving_directory(&self) -> &str {
        self.serving_directory
            .as_deref()
            .unwrap_or(DEFAULT_SERVING_DIRECTORY)
    }

    pub fn job_id_base(&self) -> u64 {
        self.job_id_base.unwrap_or(DEFAULT_JOB_ID_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = ApplicationConfig::build_from(dir.path().join("config.yaml")).unwrap();

        assert_eq!(config, ApplicationConfig::get_defaults());
        assert_eq!(config.port(), 7777);
        assert_eq!(config.terminate_port(), 7778);
        assert_eq!(config.job_id_base(), 1000);
    }

    #[test]
    fn test_partial_yaml_is_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "port: 9000\nserving_directory: /srv/ferry\n").unwrap();

        let config = ApplicationConfig::build_from(&path).unwrap();

        assert_eq!(config.port(), 9000);
        assert_eq!(config.serving_directory(), "/srv/ferry");
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.terminate_port(), 7778);
    }

    #[test]
    fn test_invalid_yaml_is_a_configuration_error() {
        let result = ApplicationConfig::from_yaml("port: [not, a, port]");

        assert!(matches!(result, Err(FerryError::Configuration(_))));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ApplicationConfig {
            terminate_port: Some(8001),
            ..Default::default()
        };

        let config = ApplicationConfig::get_defaults().merge(overrides);

        assert_eq!(config.terminate_port(), 8001);
        assert_eq!(config.port(), 7777);
    }

    #[test]
    fn test_accessors_fall_back_without_defaults() {
        let config = ApplicationConfig::default();

        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.serving_directory(), "./files");
    }
}

//! Server configuration loaded from `config.toml` in the app directory.
//!
//! Every field has a default, so a missing file or a partial file is valid.
//! `SEGMENTER_BIND` overrides the listen address after the file is read.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::segmentation::{
    ClusterParams, DEFAULT_MAX_ITERATIONS, DEFAULT_N_CLUSTERS, DEFAULT_N_INIT, DEFAULT_TOLERANCE,
};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const BIND_ENV: &str = "SEGMENTER_BIND";
/// Origin entry that allows every origin, method and header.
pub const ANY_ORIGIN: &str = "*";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 10;

/// Errors that may occur while loading server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The listen address is not `host:port`.
    #[error("Invalid bind address {value:?}: {source}")]
    InvalidBind {
        value: String,
        source: std::net::AddrParseError,
    },
    /// A CORS origin is not a valid header value.
    #[error("Invalid CORS origin {0:?}")]
    InvalidOrigin(String),
    /// The app directory could not be resolved.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Upper bound on a request body, multipart framing included.
    pub max_upload_bytes: usize,
    pub clustering: ClusteringDefaults,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            clustering: ClusteringDefaults::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringDefaults {
    /// Cluster count used when a request omits `n_clusters`.
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusteringDefaults {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_N_CLUSTERS,
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ClusteringDefaults {
    pub fn params(&self, n_clusters: Option<usize>) -> ClusterParams {
        ClusterParams {
            n_clusters: n_clusters.unwrap_or(self.n_clusters),
            n_init: self.n_init,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

/// Cross-origin policy applied to every response.
///
/// The default `["*"]` permits all origins, methods and headers; list
/// explicit origins to restrict it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec![ANY_ORIGIN.to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allow_origins.iter().any(|origin| origin == ANY_ORIGIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub write_file: bool,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            write_file: true,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl ServerConfig {
    /// Load from the app directory and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_bind_override(std::env::var(BIND_ENV).ok());
        Ok(config)
    }

    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_bind_override(&mut self, bind_addr: Option<String>) {
        if let Some(value) = bind_addr.filter(|value| !value.trim().is_empty()) {
            self.bind_addr = value.trim().to_string();
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: self.bind_addr.clone(),
                source,
            })
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::load_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.clustering.n_clusters, 3);
        assert_eq!(config.clustering.n_init, 10);
        assert!(config.cors.allows_any_origin());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "bind_addr = \"0.0.0.0:9000\"\n\n[cors]\nallow_origins = [\"https://app.example\"]\n\n[clustering]\nn_init = 25\n",
        )
        .unwrap();
        let config = ServerConfig::load_from_path(&path).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.clustering.n_init, 25);
        assert_eq!(config.clustering.n_clusters, 3);
        assert!(!config.cors.allows_any_origin());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "bind_addr = [").unwrap();
        let err = ServerConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn bind_override_replaces_address() {
        let mut config = ServerConfig::default();
        config.apply_bind_override(Some(" 0.0.0.0:8080 ".to_string()));
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
        config.apply_bind_override(Some(String::new()));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let config = ServerConfig {
            bind_addr: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidBind { .. })
        ));
    }

    #[test]
    fn request_cluster_count_overrides_default() {
        let defaults = ClusteringDefaults::default();
        assert_eq!(defaults.params(None).n_clusters, 3);
        assert_eq!(defaults.params(Some(5)).n_clusters, 5);
        assert_eq!(defaults.params(Some(5)).n_init, 10);
    }

    #[test]
    fn resolves_config_inside_app_dir() {
        let base = tempdir().unwrap();
        let _guard = app_dirs::OverrideGuard::set(base.path().to_path_buf());
        let path = config_path().unwrap();
        assert_eq!(
            path,
            base.path().join(app_dirs::APP_DIR_NAME).join(CONFIG_FILE_NAME)
        );
    }
}

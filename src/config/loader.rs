//! Configuration loader.
//!
//! Settings are merged from three sources, later ones winning:
//! 1. The YAML configuration file (optional)
//! 2. Environment variables
//! 3. Command-line overrides applied by the binary

use std::fs;
use std::path::Path;

use crate::error::ConfigError;

use super::types::{FileConfig, OdooSettings, ServerSettings, ServiceConfig};

/// Environment variable holding the backend base URL.
pub const ENV_ODOO_URL: &str = "ODOO_URL";
/// Environment variable holding the backend database name.
pub const ENV_ODOO_DB: &str = "ODOO_DB";
/// Environment variable holding the bind address.
pub const ENV_HOST: &str = "COLILLAS_HOST";
/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "COLILLAS_PORT";

/// A type alias for Results that return ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads and holds the resolved service configuration.
///
/// # Example
///
/// ```no_run
/// use colillas::config::ConfigLoader;
///
/// let loader = ConfigLoader::load(Some("./config/colillas.yaml"))?;
/// println!("Backend: {}", loader.odoo().url);
/// # Ok::<(), colillas::error::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
}

impl ConfigLoader {
    /// Loads configuration from an optional file plus the process environment.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The given file does not exist or is not valid YAML
    /// - The backend URL or database is not set by any source
    /// - A value (URL scheme, port) cannot be used
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> ConfigResult<Self> {
        let file = match path {
            Some(path) => Self::read_file(path.as_ref())?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Reads and parses a YAML configuration file.
    pub fn read_file(path: &Path) -> ConfigResult<FileConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Merges a parsed file with environment values looked up through `env`.
    pub fn from_sources<F>(file: FileConfig, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let url = lookup(ENV_ODOO_URL)
            .or(file.odoo.url)
            .ok_or_else(|| ConfigError::Missing {
                key: "odoo.url".to_string(),
                env: ENV_ODOO_URL.to_string(),
            })?;
        let database = lookup(ENV_ODOO_DB)
            .or(file.odoo.database)
            .ok_or_else(|| ConfigError::Missing {
                key: "odoo.database".to_string(),
                env: ENV_ODOO_DB.to_string(),
            })?;

        let defaults = ServerSettings::default();
        let host = lookup(ENV_HOST).or(file.server.host).unwrap_or(defaults.host);
        let port = match lookup(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "server.port".to_string(),
                message: format!("'{}': {}", raw, e),
            })?,
            None => file.server.port.unwrap_or(defaults.port),
        };

        Ok(Self {
            config: ServiceConfig {
                odoo: OdooSettings {
                    url: normalize_url(&url)?,
                    database,
                },
                server: ServerSettings { host, port },
            },
        })
    }

    /// Applies command-line overrides for the server address.
    pub fn with_server_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.config.server.host = host;
        }
        if let Some(port) = port {
            self.config.server.port = port;
        }
        self
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the backend connection settings.
    pub fn odoo(&self) -> &OdooSettings {
        &self.config.odoo
    }

    /// Returns the HTTP server settings.
    pub fn server(&self) -> &ServerSettings {
        &self.config.server
    }
}

fn normalize_url(url: &str) -> ConfigResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "odoo.url".to_string(),
            message: format!("'{}' must start with http:// or https://", url),
        });
    }
    Ok(trimmed.to_string())
}

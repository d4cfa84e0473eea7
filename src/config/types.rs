//! Configuration types for the service.
//!
//! [`FileConfig`] mirrors the YAML file, where every setting is optional.
//! [`ServiceConfig`] is the resolved configuration after the file,
//! environment and command line have been merged.

use serde::{Deserialize, Serialize};

/// Default address the HTTP server binds to.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port the HTTP server listens on.
pub const DEFAULT_PORT: u16 = 8000;

/// Connection settings for the Odoo backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdooSettings {
    /// Base URL of the backend, without a trailing slash.
    pub url: String,
    /// Database name passed on every call.
    pub database: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The fully resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Backend connection.
    pub odoo: OdooSettings,
    /// HTTP server.
    pub server: ServerSettings,
}

/// `odoo` section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OdooSection {
    /// Base URL of the backend.
    #[serde(default)]
    pub url: Option<String>,
    /// Database name.
    #[serde(default)]
    pub database: Option<String>,
}

/// `server` section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    /// Address to bind to.
    #[serde(default)]
    pub host: Option<String>,
    /// Port to listen on.
    #[serde(default)]
    pub port: Option<u16>,
}

/// The configuration file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Backend connection.
    #[serde(default)]
    pub odoo: OdooSection,
    /// HTTP server.
    #[serde(default)]
    pub server: ServerSection,
}

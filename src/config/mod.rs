//! Configuration loading for the payslip rendering service.
//!
//! Configuration comes from an optional YAML file, overridden by
//! environment variables (`ODOO_URL`, `ODOO_DB`, `COLILLAS_HOST`,
//! `COLILLAS_PORT`) and finally by command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use colillas::config::ConfigLoader;
//!
//! let config = ConfigLoader::load(None::<&str>).unwrap();
//! println!("Backend database: {}", config.odoo().database);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigResult, ENV_HOST, ENV_ODOO_DB, ENV_ODOO_URL, ENV_PORT};
pub use types::{
    DEFAULT_HOST, DEFAULT_PORT, FileConfig, OdooSection, OdooSettings, ServerSection,
    ServerSettings, ServiceConfig,
};

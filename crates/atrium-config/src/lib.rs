//! # atrium-config
//!
//! Layered configuration loading for Atrium using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ATRIUM_*` prefix, `__` as separator)
//! 2. Project-level `.atrium/config.toml`
//! 3. User-level `~/.config/atrium/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ATRIUM_API__BASE_URL` -> `api.base_url`,
//! `ATRIUM_ROUTES__LOGIN_PATH` -> `routes.login_path`, etc. The `__`
//! (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use atrium_config::AtriumConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = AtriumConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = AtriumConfig::load().expect("config");
//!
//! if config.api.is_configured() {
//!     println!("Portal API: {}", config.api.base_url);
//! }
//! ```

mod api;
mod error;
mod routes;
mod session;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use routes::RoutesConfig;
pub use session::SessionConfig;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AtriumConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl AtriumConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you
    /// need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or
    /// merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the working tree
    /// before building the figment. This is the typical entry point for
    /// the CLI and tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or
    /// merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".atrium/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("ATRIUM_").split("__"));

        figment
    }

    /// The API section, validated for use.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotConfigured` when `api.base_url` is unset,
    /// `ConfigError::InvalidValue` when the timeout is zero.
    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        if !self.api.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "api".into(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(&self.api)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("atrium").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or the current
    /// dir looking for a `.env` file. Silently does nothing if no `.env`
    /// is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

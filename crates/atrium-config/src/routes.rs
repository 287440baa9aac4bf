//! Route destinations used by the guard layer.

use serde::{Deserialize, Serialize};

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_denied_path() -> String {
    "/access-denied".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Where unauthenticated visitors are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Where authenticated-but-unauthorized visitors are redirected.
    #[serde(default = "default_denied_path")]
    pub denied_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            denied_path: default_denied_path(),
        }
    }
}

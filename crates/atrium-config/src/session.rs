//! Session persistence configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory holding the persisted session blob. Empty means
    /// `~/.atrium`.
    #[serde(default)]
    pub storage_dir: String,
}

impl SessionConfig {
    /// Resolve the storage directory, falling back to `~/.atrium`.
    /// `None` when unset and no home directory can be determined.
    #[must_use]
    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        if self.storage_dir.is_empty() {
            dirs::home_dir().map(|home| home.join(".atrium"))
        } else {
            Some(PathBuf::from(&self.storage_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_home() {
        let config = SessionConfig {
            storage_dir: "/var/lib/atrium".into(),
        };
        assert_eq!(
            config.resolved_storage_dir(),
            Some(PathBuf::from("/var/lib/atrium"))
        );
    }

    #[test]
    fn empty_dir_falls_back_to_home() {
        let config = SessionConfig::default();
        if let Some(dir) = config.resolved_storage_dir() {
            assert!(dir.ends_with(".atrium"));
        }
    }
}

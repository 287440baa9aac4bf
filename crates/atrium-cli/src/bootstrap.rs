use std::sync::Arc;

use anyhow::Context;
use atrium_auth::{FileStorage, HttpAuthApi, SessionService};
use atrium_config::AtriumConfig;

pub fn load_config() -> anyhow::Result<AtriumConfig> {
    AtriumConfig::load_with_dotenv().map_err(anyhow::Error::from)
}

/// Wire the session service from config: file-backed storage plus the
/// HTTP auth client.
pub fn session_service(config: &AtriumConfig) -> anyhow::Result<SessionService> {
    let api_config = config
        .require_api()
        .context("portal API config (set ATRIUM_API__BASE_URL)")?;

    let storage_dir = config
        .session
        .resolved_storage_dir()
        .context("cannot resolve session storage dir (no home directory?)")?;
    let storage = Arc::new(FileStorage::new(storage_dir));

    let api = Arc::new(HttpAuthApi::new(
        api_config.base_url.clone(),
        api_config.timeout(),
    )?);

    tracing::debug!(base_url = %config.api.base_url, "session service wired");
    Ok(SessionService::new(storage, api))
}

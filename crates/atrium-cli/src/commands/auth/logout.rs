use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub async fn handle(
    flags: &GlobalFlags,
    config: &atrium_config::AtriumConfig,
) -> anyhow::Result<()> {
    let service = crate::bootstrap::session_service(config)?;
    service.hydrate().await;
    service.logout().await;
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}

use atrium_auth::roles;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    username: Option<String>,
    user_id: Option<i64>,
    roles: Vec<String>,
    has_refresh_token: bool,
    note: Option<String>,
}

pub async fn handle(
    flags: &GlobalFlags,
    config: &atrium_config::AtriumConfig,
) -> anyhow::Result<()> {
    let service = crate::bootstrap::session_service(config)?;
    service.hydrate().await;
    let session = service.snapshot();

    let status = if session.authenticated() {
        let user = session.user.as_ref();
        AuthStatusResponse {
            authenticated: true,
            username: user.map(|u| u.username.clone()),
            user_id: user.map(|u| u.id),
            roles: user.map(roles::normalize_roles).unwrap_or_default(),
            has_refresh_token: session
                .token
                .as_ref()
                .is_some_and(|t| t.refresh_token.is_some()),
            note: None,
        }
    } else {
        AuthStatusResponse {
            authenticated: false,
            username: None,
            user_id: None,
            roles: Vec::new(),
            has_refresh_token: false,
            note: Some("no stored session".into()),
        }
    };

    output(&status, flags.format)
}

use atrium_auth::{Credentials, roles};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: i64,
    username: String,
    roles: Vec<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &atrium_config::AtriumConfig,
) -> anyhow::Result<()> {
    let username = resolve_credential(args.username.clone(), "ATRIUM_USERNAME")
        .ok_or_else(|| anyhow::anyhow!("auth login requires --username or ATRIUM_USERNAME"))?;
    let password = resolve_credential(args.password.clone(), "ATRIUM_PASSWORD")
        .ok_or_else(|| anyhow::anyhow!("auth login requires --password or ATRIUM_PASSWORD"))?;

    let service = crate::bootstrap::session_service(config)?;
    service.hydrate().await;

    let user = service.login(&Credentials::new(username, password)).await?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            user_id: user.id,
            roles: roles::normalize_roles(&user),
            username: user.username,
        },
        flags.format,
    )
}

fn resolve_credential(arg: Option<String>, env_var: &str) -> Option<String> {
    arg.or_else(|| std::env::var(env_var).ok())
        .filter(|value| !value.is_empty())
}

use atrium_core::UserPatch;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthUpdateArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthUpdateResponse {
    username: String,
    full_name: Option<String>,
    email: String,
    phone: Option<String>,
}

pub async fn handle(
    args: &AuthUpdateArgs,
    flags: &GlobalFlags,
    config: &atrium_config::AtriumConfig,
) -> anyhow::Result<()> {
    let patch = UserPatch {
        full_name: args.full_name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        ..Default::default()
    };
    if patch.is_empty() {
        anyhow::bail!("auth update: nothing to change (pass --full-name, --email, or --phone)");
    }

    let service = crate::bootstrap::session_service(config)?;
    service.hydrate().await;

    let Some(user) = service.update_user(&patch).await else {
        anyhow::bail!("auth update: not logged in");
    };

    output(
        &AuthUpdateResponse {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
        },
        flags.format,
    )
}

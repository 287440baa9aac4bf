mod login;
mod logout;
mod refresh;
mod status;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `atr auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &atrium_config::AtriumConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags, config).await,
        AuthCommands::Status => status::handle(flags, config).await,
        AuthCommands::Refresh => refresh::handle(flags, config).await,
        AuthCommands::Update(args) => update::handle(args, flags, config).await,
    }
}

use clap::Subcommand;

use super::subcommands::AuthCommands;

/// Root command tree for `atr`.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Session and authentication.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

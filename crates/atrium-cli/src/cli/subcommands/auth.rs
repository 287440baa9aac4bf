use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with portal credentials.
    Login(AuthLoginArgs),
    /// End the session and clear stored credentials.
    Logout,
    /// Show current session status.
    Status,
    /// Rotate the access token using the stored refresh token.
    Refresh,
    /// Update profile fields on the logged-in user.
    Update(AuthUpdateArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Portal username (falls back to ATRIUM_USERNAME).
    #[arg(long)]
    pub username: Option<String>,
    /// Portal password (falls back to ATRIUM_PASSWORD).
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthUpdateArgs {
    /// New display name.
    #[arg(long)]
    pub full_name: Option<String>,
    /// New contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// New contact phone number.
    #[arg(long)]
    pub phone: Option<String>,
}

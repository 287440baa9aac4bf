use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("auth service unreachable: {0}")]
    Transport(String),

    #[error("not authenticated — log in first")]
    NotAuthenticated,

    #[error("no refresh token on the current session")]
    NoRefreshToken,

    #[error("unexpected auth service response: {0}")]
    Api(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// True when retrying with different credentials could succeed.
    #[must_use]
    pub const fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }
}

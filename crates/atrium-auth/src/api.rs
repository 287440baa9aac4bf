use async_trait::async_trait;
use atrium_core::{AuthToken, User};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Username/password pair submitted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful login payload: the authenticated user plus the credential
/// the session store will hold on their behalf.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: AuthToken,
}

/// Network boundary to the auth backend.
///
/// `login` must reject with [`AuthError::InvalidCredentials`] on a
/// credential failure and [`AuthError::Transport`] on anything
/// network-shaped, so the caller can show the right message. `logout` is
/// best-effort — the session store clears local state regardless.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    async fn logout(&self, token: &AuthToken) -> Result<(), AuthError>;

    /// Exchange a refresh token for a fresh access token.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, AuthError>;
}

/// Production [`AuthApi`] over the portal's REST backend.
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the HTTP client cannot be built
    /// (bad TLS backend, invalid timeout).
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Transport(format!("build http client: {e}")))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let resp = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("login: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Transport(format!("login: HTTP {status}")));
        }

        resp.json::<LoginResponse>()
            .await
            .map_err(|e| AuthError::Api(format!("parse login response: {e}")))
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.endpoint("/auth/logout"))
            .header("Authorization", token.authorization_header())
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("logout: {e}")))?;

        if !resp.status().is_success() {
            return Err(AuthError::Transport(format!(
                "logout: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, AuthError> {
        let resp = self
            .client
            .post(self.endpoint("/auth/refresh"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("refresh: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Transport(format!("refresh: HTTP {status}")));
        }

        resp.json::<AuthToken>()
            .await
            .map_err(|e| AuthError::Api(format!("parse refresh response: {e}")))
    }
}

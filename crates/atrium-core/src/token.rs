use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Opaque credential triple issued by the auth backend.
///
/// The session core stores and forwards this value; it never inspects the
/// token contents. `refresh_token` is absent when the backend declines to
/// issue one (e.g. short-lived kiosk logins).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl AuthToken {
    /// Build a bearer token without a refresh counterpart.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
        }
    }

    /// Value for an HTTP `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: AuthToken =
            serde_json::from_str(r#"{"access_token": "abc123"}"#).expect("should parse");
        assert_eq!(token.token_type, "bearer");
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn authorization_header_uses_access_token() {
        let token = AuthToken::bearer("abc123");
        assert_eq!(token.authorization_header(), "Bearer abc123");
    }

    #[test]
    fn round_trips_refresh_token() {
        let token: AuthToken = serde_json::from_str(
            r#"{"access_token": "a", "refresh_token": "r", "token_type": "bearer"}"#,
        )
        .expect("should parse");
        assert_eq!(token.refresh_token.as_deref(), Some("r"));
    }
}

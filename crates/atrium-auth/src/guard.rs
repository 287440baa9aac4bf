use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::roles::has_any_role;
use crate::session::Session;

/// Default destination for authenticated-but-unauthorized access. Fixed
/// per deployment, not per policy — there is nothing useful to return to
/// after a role denial, so no intent is carried there.
pub const ACCESS_DENIED_PATH: &str = "/access-denied";

const fn default_require_auth() -> bool {
    true
}

fn default_redirect_to() -> String {
    "/login".to_string()
}

/// Per-route access requirements, supplied by the caller that registers
/// the protected view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Whether the route requires an authenticated session at all.
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,
    /// Where unauthenticated visitors are sent (the login view).
    #[serde(default = "default_redirect_to")]
    pub redirect_to: String,
    /// When non-empty, the session user must hold at least one of these.
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            require_auth: true,
            redirect_to: default_redirect_to(),
            allowed_roles: Vec::new(),
        }
    }
}

impl AccessPolicy {
    /// Policy for a route anyone may visit.
    #[must_use]
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    /// Policy requiring authentication, redirecting to `redirect_to`.
    #[must_use]
    pub fn authenticated(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            ..Self::default()
        }
    }

    /// Restrict to the given roles on top of authentication.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// The location a visitor was trying to reach when denied, preserved
/// across the login redirect so they land back where they intended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationIntent {
    pub from: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
    /// Intent forwarded to the destination view.
    pub state: Option<NavigationIntent>,
}

/// Navigation collaborator. The guard triggers at most one call per
/// denied `(session, location)` pair.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, options: NavigateOptions);
}

/// Outcome of evaluating a policy against a session at a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Session not hydrated yet: render nothing, navigate nowhere.
    Pending,
    /// Render the protected content.
    Allowed,
    /// No authenticated session: redirect to the login view, carrying
    /// the intended location.
    DeniedUnauthenticated {
        redirect_to: String,
        intent: NavigationIntent,
    },
    /// Authenticated but missing every allowed role: redirect to the
    /// access-denied view.
    DeniedUnauthorized { redirect_to: String },
}

impl Decision {
    /// Whether the protected content may render.
    #[must_use]
    pub const fn allows_render(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The redirect this decision demands, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<(&str, Option<&NavigationIntent>)> {
        match self {
            Self::Pending | Self::Allowed => None,
            Self::DeniedUnauthenticated {
                redirect_to,
                intent,
            } => Some((redirect_to, Some(intent))),
            Self::DeniedUnauthorized { redirect_to } => Some((redirect_to, None)),
        }
    }
}

/// Pure decision function: no side effects, safe to re-run on every
/// render. Uses the deployment-default denied destination; the
/// [`RouteGuard`] effect layer can override it.
#[must_use]
pub fn decide(session: &Session, policy: &AccessPolicy, location: &str) -> Decision {
    decide_with_denied_path(session, policy, location, ACCESS_DENIED_PATH)
}

fn decide_with_denied_path(
    session: &Session,
    policy: &AccessPolicy,
    location: &str,
    denied_path: &str,
) -> Decision {
    // Nothing — content or navigation — may happen before hydration
    // completes, regardless of what the session holds.
    if !session.ready {
        return Decision::Pending;
    }
    if !policy.require_auth {
        return Decision::Allowed;
    }
    if !session.authenticated() {
        return Decision::DeniedUnauthenticated {
            redirect_to: policy.redirect_to.clone(),
            intent: NavigationIntent {
                from: location.to_string(),
            },
        };
    }
    if !policy.allowed_roles.is_empty()
        && let Some(user) = &session.user
    {
        let roles: Vec<&str> = policy.allowed_roles.iter().map(String::as_str).collect();
        if !has_any_role(user, &roles) {
            return Decision::DeniedUnauthorized {
                redirect_to: denied_path.to_string(),
            };
        }
    }
    Decision::Allowed
}

/// Effect layer around [`decide`].
///
/// Evaluation is level-triggered: the UI re-runs it whenever the session
/// snapshot or the location changes, so it must be idempotent. The guard
/// keys fired redirects by `(session.version, location)` — re-evaluating
/// an already-denied state does not navigate again, which is what breaks
/// redirect loops when the denial target re-renders the guard.
pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
    denied_path: String,
    last_redirect: Mutex<Option<(u64, String)>>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            denied_path: ACCESS_DENIED_PATH.to_string(),
            last_redirect: Mutex::new(None),
        }
    }

    /// Override the access-denied destination (deployment-level setting).
    #[must_use]
    pub fn with_denied_path(mut self, path: impl Into<String>) -> Self {
        self.denied_path = path.into();
        self
    }

    /// Evaluate the policy and fire at most one redirect per denied
    /// `(session, location)` pair.
    ///
    /// # Panics
    ///
    /// Panics if the redirect latch is poisoned, which cannot happen
    /// outside a prior panic.
    pub fn evaluate(&self, session: &Session, policy: &AccessPolicy, location: &str) -> Decision {
        let decision = decide_with_denied_path(session, policy, location, &self.denied_path);

        if let Some((path, intent)) = decision.redirect() {
            let key = (session.version, location.to_string());
            let mut last = self.last_redirect.lock().expect("redirect latch poisoned");
            if last.as_ref() != Some(&key) {
                *last = Some(key);
                tracing::debug!(from = location, to = path, "access denied; redirecting");
                self.navigator.navigate(
                    path,
                    NavigateOptions {
                        replace: true,
                        state: intent.cloned(),
                    },
                );
            }
        }

        decision
    }
}

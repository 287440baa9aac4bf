//! End-to-end flows through the session store, role predicates, and
//! route guard, using in-memory collaborator doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atrium_auth::{
    AccessPolicy, AuthApi, AuthError, Credentials, Decision, LoginResponse, MemoryStorage,
    NavigateOptions, Navigator, RouteGuard, SESSION_KEY, SessionService, SessionStorage,
    StoredSession, decide,
};
use atrium_core::{AuthToken, RoleValue, User, UserPatch};
use pretty_assertions::assert_eq;

fn user(id: i64, username: &str, roles: &[&str]) -> User {
    User {
        id,
        username: username.into(),
        email: format!("{username}@university.edu"),
        full_name: None,
        phone: None,
        status: Some("active".into()),
        last_login: None,
        role: None,
        roles: Some(roles.iter().map(|r| RoleValue::from(*r)).collect()),
    }
}

/// Fake auth backend: any password equal to the username logs in.
struct FakeApi {
    users: Vec<User>,
    fail_logout: bool,
    login_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl FakeApi {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            fail_logout: false,
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    fn failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if credentials.password != credentials.username {
            return Err(AuthError::InvalidCredentials);
        }
        let user = self
            .users
            .iter()
            .find(|u| u.username == credentials.username)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        let token = AuthToken {
            access_token: format!("access-{}", user.username),
            refresh_token: Some(format!("refresh-{}", user.username)),
            token_type: "bearer".into(),
        };
        Ok(LoginResponse { user, token })
    }

    async fn logout(&self, _token: &AuthToken) -> Result<(), AuthError> {
        if self.fail_logout {
            return Err(AuthError::Transport("backend unreachable".into()));
        }
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, AuthError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthToken {
            access_token: format!("rotated-{refresh_token}-{n}"),
            refresh_token: None,
            token_type: "bearer".into(),
        })
    }
}

#[derive(Default)]
struct RecordingNavigator {
    calls: Mutex<Vec<(String, NavigateOptions)>>,
}

impl RecordingNavigator {
    fn calls(&self) -> Vec<(String, NavigateOptions)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        self.calls
            .lock()
            .expect("lock")
            .push((path.to_string(), options));
    }
}

fn portal() -> (Arc<MemoryStorage>, Arc<FakeApi>, SessionService) {
    let storage = Arc::new(MemoryStorage::new());
    let api = Arc::new(FakeApi::with_users(vec![
        user(1, "mchan", &["student"]),
        user(2, "dkhan", &["professor", "ta"]),
        user(3, "root", &["admin"]),
    ]));
    let service = SessionService::new(storage.clone(), api.clone());
    (storage, api, service)
}

#[tokio::test]
async fn redirect_intent_round_trip() {
    let (_storage, _api, service) = portal();
    service.hydrate().await;

    let navigator = Arc::new(RecordingNavigator::default());
    let guard = RouteGuard::new(navigator.clone());
    let policy = AccessPolicy::authenticated("/login");

    // Anonymous visit to /grades: exactly one redirect to /login with intent.
    let decision = guard.evaluate(&service.snapshot(), &policy, "/grades");
    assert!(!decision.allows_render());
    let calls = navigator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "/login");
    let intent = calls[0].1.state.clone().expect("intent preserved");
    assert_eq!(intent.from, "/grades");

    // Successful login, then the caller returns to the intended location.
    service
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect("login succeeds");
    let decision = guard.evaluate(&service.snapshot(), &policy, &intent.from);
    assert_eq!(decision, Decision::Allowed);
    assert_eq!(navigator.calls().len(), 1, "no further navigation");
}

#[tokio::test]
async fn wrong_role_goes_to_denied_destination_not_login() {
    let (_storage, _api, service) = portal();
    service.hydrate().await;
    service
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect("login succeeds");

    let navigator = Arc::new(RecordingNavigator::default());
    let guard = RouteGuard::new(navigator.clone());
    let policy = AccessPolicy::authenticated("/login").with_roles(["admin"]);

    let decision = guard.evaluate(&service.snapshot(), &policy, "/admin/users");
    assert!(matches!(decision, Decision::DeniedUnauthorized { .. }));

    let calls = navigator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, atrium_auth::ACCESS_DENIED_PATH);
    assert_eq!(calls[0].1.state, None, "no intent on a role denial");
}

#[tokio::test]
async fn no_action_before_hydration_completes() {
    let (storage, _api, service) = portal();
    // A stored authenticated session exists, but hydrate has not run.
    storage.preload(
        SESSION_KEY,
        &serde_json::to_string(&StoredSession {
            user: user(1, "mchan", &["student"]),
            token: AuthToken::bearer("t"),
        })
        .expect("serialize"),
    );

    let navigator = Arc::new(RecordingNavigator::default());
    let guard = RouteGuard::new(navigator.clone());

    let decision = guard.evaluate(&service.snapshot(), &AccessPolicy::default(), "/grades");
    assert_eq!(decision, Decision::Pending);
    assert!(navigator.calls().is_empty());

    service.hydrate().await;
    let decision = guard.evaluate(&service.snapshot(), &AccessPolicy::default(), "/grades");
    assert_eq!(decision, Decision::Allowed);
}

#[tokio::test]
async fn login_writes_through_and_survives_restart() {
    let (storage, api, service) = portal();
    service.hydrate().await;
    service
        .login(&Credentials::new("dkhan", "dkhan"))
        .await
        .expect("login succeeds");

    // Same storage, fresh process.
    let restarted = SessionService::new(storage, api);
    restarted.hydrate().await;

    let session = restarted.snapshot();
    assert!(session.authenticated());
    let restored = session.user.expect("user restored");
    assert_eq!(restored.username, "dkhan");
    assert!(atrium_auth::roles::has_any_role(&restored, &["ta"]));
}

#[tokio::test]
async fn concurrent_logins_leave_a_consistent_pair() {
    let (_storage, api, service) = portal();
    service.hydrate().await;
    let service = Arc::new(service);

    let first = {
        let service = service.clone();
        tokio::spawn(
            async move { service.login(&Credentials::new("mchan", "mchan")).await },
        )
    };
    let second = {
        let service = service.clone();
        tokio::spawn(
            async move { service.login(&Credentials::new("dkhan", "dkhan")).await },
        )
    };
    first.await.expect("join").expect("login");
    second.await.expect("join").expect("login");

    assert_eq!(api.login_calls.load(Ordering::SeqCst), 2);
    let session = service.snapshot();
    let final_user = session.user.expect("user");
    let final_token = session.token.expect("token");
    assert_eq!(
        final_token.access_token,
        format!("access-{}", final_user.username),
        "user and token always belong to the same login"
    );
}

#[tokio::test]
async fn logout_after_failed_remote_call_still_clears_everything() {
    let storage = Arc::new(MemoryStorage::new());
    let api = Arc::new(FakeApi::with_users(vec![user(1, "mchan", &["student"])]).failing_logout());
    let service = SessionService::new(storage.clone(), api);
    service.hydrate().await;
    service
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect("login succeeds");
    assert!(storage.get(SESSION_KEY).await.is_some());

    service.logout().await;

    assert!(!service.snapshot().authenticated());
    assert_eq!(storage.get(SESSION_KEY).await, None);

    // The cleared session is a new version: the guard redirects afresh.
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = RouteGuard::new(navigator.clone());
    guard.evaluate(&service.snapshot(), &AccessPolicy::default(), "/grades");
    assert_eq!(navigator.calls().len(), 1);
}

#[tokio::test]
async fn refresh_rotates_token_and_keeps_refresh_token() {
    let (storage, api, service) = portal();
    service.hydrate().await;
    service
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect("login succeeds");

    service.refresh().await.expect("refresh succeeds");
    assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 1);

    let token = service.snapshot().token.expect("token");
    assert!(token.access_token.starts_with("rotated-refresh-mchan"));
    assert_eq!(
        token.refresh_token.as_deref(),
        Some("refresh-mchan"),
        "old refresh token kept when the backend omits a new one"
    );

    // Write-through: the rotated token is what a restart would see.
    let blob = storage.get(SESSION_KEY).await.expect("blob");
    let stored: StoredSession = serde_json::from_str(&blob).expect("parse");
    assert_eq!(stored.token.access_token, token.access_token);

    // And refresh stays repeatable.
    service.refresh().await.expect("second refresh succeeds");
    assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn update_user_is_visible_to_the_guard_immediately() {
    let (_storage, _api, service) = portal();
    service.hydrate().await;
    service
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect("login succeeds");

    let before = service.snapshot().version;
    service
        .update_user(&UserPatch {
            full_name: Some("Mei Chan".into()),
            ..Default::default()
        })
        .await
        .expect("session exists");

    let session = service.snapshot();
    assert!(session.version > before, "mutation bumps the version");
    assert_eq!(
        session.user.as_ref().expect("user").full_name.as_deref(),
        Some("Mei Chan")
    );
    assert_eq!(
        decide(&session, &AccessPolicy::default(), "/profile"),
        Decision::Allowed
    );
}

#[tokio::test]
async fn invalid_credentials_and_transport_failures_are_distinct() {
    let (_storage, _api, service) = portal();
    service.hydrate().await;

    let err = service
        .login(&Credentials::new("mchan", "wrong"))
        .await
        .expect_err("wrong password");
    assert!(err.is_invalid_credentials());

    struct DownApi;
    #[async_trait]
    impl AuthApi for DownApi {
        async fn login(&self, _c: &Credentials) -> Result<LoginResponse, AuthError> {
            Err(AuthError::Transport("connection refused".into()))
        }
        async fn logout(&self, _t: &AuthToken) -> Result<(), AuthError> {
            Ok(())
        }
        async fn refresh(&self, _r: &str) -> Result<AuthToken, AuthError> {
            Err(AuthError::Transport("connection refused".into()))
        }
    }

    let down = SessionService::new(Arc::new(MemoryStorage::new()), Arc::new(DownApi));
    down.hydrate().await;
    let err = down
        .login(&Credentials::new("mchan", "mchan"))
        .await
        .expect_err("backend down");
    assert!(matches!(err, AuthError::Transport(_)));
}

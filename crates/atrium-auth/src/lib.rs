//! # atrium-auth
//!
//! Client session and RBAC core for the Atrium portal.
//!
//! Three pieces, composed left to right:
//! - [`session::SessionService`] owns the in-memory session, hydrates it
//!   once from a [`storage::SessionStorage`] adapter, and keeps memory
//!   and storage consistent through login/logout/update.
//! - [`roles`] answers pure role-membership questions about a user.
//! - [`guard`] turns a session snapshot plus a per-route
//!   [`guard::AccessPolicy`] into an authorization decision and fires at
//!   most one redirect per denial.
//!
//! The service is constructed once at process start and shared by
//! reference; everything downstream reads immutable [`session::Session`]
//! snapshots.

pub mod api;
pub mod error;
pub mod guard;
pub mod roles;
pub mod session;
pub mod storage;

pub use api::{AuthApi, Credentials, HttpAuthApi, LoginResponse};
pub use error::AuthError;
pub use guard::{
    ACCESS_DENIED_PATH, AccessPolicy, Decision, NavigateOptions, NavigationIntent, Navigator,
    RouteGuard, decide,
};
pub use session::{Session, SessionService, StoredSession};
pub use storage::{FileStorage, MemoryStorage, SESSION_KEY, SessionStorage};

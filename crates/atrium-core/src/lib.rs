//! # atrium-core
//!
//! Shared wire types for the Atrium portal client:
//! - [`User`] and the heterogeneous role fields the backend emits
//! - [`UserPatch`] for PATCH-style profile updates
//! - [`AuthToken`], the opaque credential triple
//!
//! This crate holds only data — session logic, role predicates, and route
//! guarding live in `atrium-auth`.

pub mod identity;
pub mod token;

pub use identity::{RoleValue, User, UserPatch};
pub use token::AuthToken;

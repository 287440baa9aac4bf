//! Pure role predicates over a [`User`].
//!
//! The backend attaches roles in two shapes: a scalar `role` or a `roles`
//! array. A non-empty array always wins over the scalar — that precedence
//! is the contract, not an accident. Matching is exact and
//! case-sensitive; querying with an empty role list is always `false`
//! (vacuous truth is rejected on purpose, so a misconfigured policy
//! denies instead of allowing everyone).

use atrium_core::User;

/// Resolve the user's effective role names.
///
/// Precedence: non-empty `roles` array → each element's string form;
/// else scalar `role` → singleton; else empty.
#[must_use]
pub fn normalize_roles(user: &User) -> Vec<String> {
    if let Some(roles) = &user.roles
        && !roles.is_empty()
    {
        return roles.iter().map(|r| r.as_str().to_string()).collect();
    }
    if let Some(role) = &user.role {
        return vec![role.as_str().to_string()];
    }
    Vec::new()
}

/// Exact, case-sensitive membership check.
#[must_use]
pub fn has_role(user: &User, role: &str) -> bool {
    normalize_roles(user).iter().any(|r| r == role)
}

/// True iff `roles` is non-empty and the user holds at least one of them.
#[must_use]
pub fn has_any_role(user: &User, roles: &[&str]) -> bool {
    if roles.is_empty() {
        return false;
    }
    let held = normalize_roles(user);
    roles.iter().any(|role| held.iter().any(|h| h == role))
}

/// True iff `roles` is non-empty and the user holds every one of them.
#[must_use]
pub fn has_all_roles(user: &User, roles: &[&str]) -> bool {
    if roles.is_empty() {
        return false;
    }
    let held = normalize_roles(user);
    roles.iter().all(|role| held.iter().any(|h| h == role))
}

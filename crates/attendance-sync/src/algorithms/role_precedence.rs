//! # Role Precedence
//!
//! The single derivation of an effective role from its two sources.

use crate::domain::Role;

/// Apply the precedence chain: global owner flag, then per-conference
/// override, then the default `user`.
///
/// Callers that already know `is_owner` is true must not fetch the
/// override at all; the flag short-circuits.
pub fn role_precedence(is_owner: bool, override_role: Option<Role>) -> Role {
    if is_owner {
        return Role::Owner;
    }
    override_role.unwrap_or(Role::User)
}

//! # Domain Invariants
//!
//! Business rules that must always hold true.

use super::entities::{Profile, Role};
use super::value_objects::LocalTicket;
use std::collections::HashSet;

/// Default capacity of the in-process role cache tier.
pub const DEFAULT_ROLE_CACHE_CAPACITY: usize = 64;

/// Lower edge of the event reminder window, seconds before start.
pub const REMINDER_LEAD_MIN_SECS: u64 = 10 * 60;

/// Upper edge of the event reminder window, seconds before start.
pub const REMINDER_LEAD_MAX_SECS: u64 = 20 * 60;

/// Invariant: the effective role is re-derivable from the two source
/// tables at any time.
///
/// `effective = is_owner ? owner : override ?? user`. Cached copies are
/// optimizations, never sources of truth.
pub fn invariant_effective_role(
    profile: &Profile,
    override_role: Option<Role>,
    resolved: Role,
) -> bool {
    let expected = if profile.is_owner {
        Role::Owner
    } else {
        override_role.unwrap_or(Role::User)
    };
    resolved == expected
}

/// Invariant: tickets are keyed by event id, so any number of attendance
/// scans for one event collapses to at most one local ticket.
pub fn invariant_tickets_collapse(tickets: &[LocalTicket]) -> bool {
    let mut seen = HashSet::new();
    tickets.iter().all(|t| seen.insert(t.event_id.as_str()))
}

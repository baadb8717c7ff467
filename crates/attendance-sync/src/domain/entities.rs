//! # Domain Entities
//!
//! Authoritative record shapes as served by the remote store. All
//! identifiers are opaque strings; timestamps are Unix seconds.
//!
//! These are validated/narrowed at the gateway boundary: the rest of the
//! crate never handles untyped rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-conference participant role.
///
/// `Owner` is special: it is granted by the global `is_owner` profile
/// flag and outranks any per-conference assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role when no per-conference override exists.
    User,
    /// Conference staff (scanning desk, logistics).
    Staff,
    /// Speaker.
    Ponente,
    /// Conference administrator.
    Admin,
    /// Global owner, derived from `Profile::is_owner`.
    Owner,
    /// Invited VIP attendee.
    Vip,
}

impl Role {
    /// Whether this role satisfies a required-role set.
    ///
    /// An empty set means any resolved role passes.
    pub fn satisfies(&self, required: &[Role]) -> bool {
        required.is_empty() || required.contains(self)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Ponente => "ponente",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Vip => "vip",
        };
        write!(f, "{}", s)
    }
}

/// Registered participant profile.
///
/// `short_id` is the public, human-enterable credential printed on the
/// badge QR; it is globally unique and distinct from `id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Internal identifier (auth subject).
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Raw stored role. Never used directly for authorization; see
    /// the effective-role invariant in [`super::invariants`].
    pub role: Role,
    /// Global owner flag. Outranks any per-conference role.
    pub is_owner: bool,
    /// Academic degree, free-form.
    pub degree: Option<String>,
    /// Public badge credential.
    pub short_id: String,
    /// Self-reported gender, free-form.
    pub gender: Option<String>,
}

impl Profile {
    /// Display name for confirmation dialogs and pushes.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A conference (tenant). Roles, events, and attendance are scoped to it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conference {
    /// Identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// First day, Unix seconds.
    pub starts_at: u64,
    /// Last day, Unix seconds.
    pub ends_at: u64,
    /// Whether the conference is currently selectable.
    pub is_active: bool,
    /// Branding accent color (hex string).
    pub accent_color: Option<String>,
    /// Free-form certificate template configuration.
    pub certificate_config: Option<String>,
}

/// Per-conference role override. At most one row per (user, conference);
/// absence means the default role `user`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConferenceRole {
    /// Profile id.
    pub user_id: String,
    /// Conference scope.
    pub conference_id: String,
    /// Assigned role within that conference.
    pub role: Role,
}

/// An activity inside a conference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Identifier.
    pub id: String,
    /// Owning conference.
    pub conference_id: String,
    /// Display title.
    pub title: String,
    /// Start time, Unix seconds.
    pub starts_at: u64,
    /// Number of daily scans required for full credit.
    pub duration_days: u32,
    /// Whether completing this event grants a certificate.
    pub gives_certificate: bool,
    /// Speaker profile id, if any.
    pub speaker_id: Option<String>,
}

/// Append-only attendance record.
///
/// No uniqueness constraint over (user, event): each scan inserts a new
/// row, and the row COUNT is the unit of business logic (compared
/// against [`Event::duration_days`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendance {
    /// Row identifier (UUID v4, generated at commit time).
    pub id: String,
    /// Scanned participant.
    pub user_id: String,
    /// Scanned activity.
    pub event_id: String,
    /// Scan time, Unix seconds.
    pub scanned_at: u64,
}

/// "I plan to attend" marker, independent of actual attendance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventInterest {
    /// Interested participant.
    pub user_id: String,
    /// Target activity.
    pub event_id: String,
}

/// Push delivery endpoint registration, upserted by (user, endpoint).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushSubscription {
    /// Owning participant.
    pub user_id: String,
    /// Transport endpoint URL.
    pub endpoint: String,
    /// Encryption keys blob, transport-specific.
    pub keys: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Ponente).unwrap(), "\"ponente\"");
        let role: Role = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, Role::Owner);
    }

    #[test]
    fn test_role_satisfies_empty_set() {
        assert!(Role::User.satisfies(&[]));
        assert!(Role::Vip.satisfies(&[]));
    }

    #[test]
    fn test_role_satisfies_membership() {
        let required = [Role::Staff, Role::Admin, Role::Owner];
        assert!(Role::Admin.satisfies(&required));
        assert!(!Role::User.satisfies(&required));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Owner.to_string(), "owner");
        assert_eq!(Role::default().to_string(), "user");
    }

    #[test]
    fn test_conference_row_narrowing() {
        // Shape as served by the remote store, including nullable columns.
        let row = r##"{
            "id": "c-1",
            "title": "CongresoKapta 2026",
            "starts_at": 1780000000,
            "ends_at": 1780259200,
            "is_active": true,
            "accent_color": "#1d4ed8",
            "certificate_config": null
        }"##;
        let conference: Conference = serde_json::from_str(row).unwrap();
        assert_eq!(conference.id, "c-1");
        assert!(conference.is_active);
        assert_eq!(conference.accent_color.as_deref(), Some("#1d4ed8"));
        assert!(conference.certificate_config.is_none());
        assert!(conference.starts_at < conference.ends_at);
    }

    #[test]
    fn test_profile_full_name() {
        let profile = Profile {
            id: "u-1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.org".into(),
            role: Role::User,
            is_owner: false,
            degree: None,
            short_id: "CK2-AB12".into(),
            gender: None,
        };
        assert_eq!(profile.full_name(), "Ada Lovelace");
    }
}

//! # Value Objects
//!
//! Local mirror projections, sync/scan session values, and the small
//! composite types passed between services.

use super::entities::{Profile, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as Unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Agenda item status in the local mirror.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AgendaStatus {
    /// User marked interest but has not scanned in.
    Interested,
    /// At least one attendance scan exists.
    Attending,
}

/// Device-local profile projection.
///
/// `role` holds the COMPUTED effective role; the sync pass is the only
/// writer, and offline-rendered UI trusts it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalProfile {
    /// Profile id (mirror key).
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Effective role at last sync, never the raw stored role.
    pub role: Role,
    /// Academic degree.
    pub degree: Option<String>,
    /// Public badge credential.
    pub short_id: String,
}

/// Device-local agenda entry, keyed by event id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalAgendaItem {
    /// Event id (mirror key).
    pub event_id: String,
    /// Owning conference.
    pub conference_id: String,
    /// Event title.
    pub title: String,
    /// Event start, Unix seconds.
    pub starts_at: u64,
    /// Interested or attending.
    pub status: AgendaStatus,
}

/// Device-local ticket, keyed by event id. Multiple attendance scans for
/// the same event collapse to one ticket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalTicket {
    /// Event id (mirror key).
    pub event_id: String,
    /// Ticket holder.
    pub user_id: String,
    /// Event title.
    pub title: String,
    /// Most recent scan time, Unix seconds.
    pub scanned_at: u64,
}

/// Device-local earned certificate, keyed by event id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalCertificate {
    /// Event id (mirror key).
    pub event_id: String,
    /// Certificate holder.
    pub user_id: String,
    /// Event title.
    pub title: String,
    /// Scans recorded when the mirror was written.
    pub scan_count: u64,
}

/// Full mirror contents, used for idempotence checks and offline reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MirrorSnapshot {
    /// Profiles by id.
    pub profiles: BTreeMap<String, LocalProfile>,
    /// Agenda items by event id.
    pub agenda: BTreeMap<String, LocalAgendaItem>,
    /// Tickets by event id.
    pub tickets: BTreeMap<String, LocalTicket>,
    /// Certificates by event id.
    pub certificates: BTreeMap<String, LocalCertificate>,
}

/// Cache key for the two role-cache tiers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Profile id.
    pub user_id: String,
    /// Conference scope.
    pub conference_id: String,
}

impl CacheKey {
    /// Build a key for a (user, conference) pair.
    pub fn new(user_id: impl Into<String>, conference_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            conference_id: conference_id.into(),
        }
    }
}

/// Outcome of a required-role gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    /// Caller may render; carries the role used for the decision.
    Granted(Role),
    /// Caller must navigate to the given route instead.
    Redirect(String),
}

/// Emitted when a background revalidation demotes a cached role below
/// the page's required set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectEvent {
    /// Affected user.
    pub user_id: String,
    /// Conference scope of the stale grant.
    pub conference_id: String,
    /// Route the caller should navigate to.
    pub route: String,
    /// Freshly resolved role that failed the gate.
    pub fresh_role: Role,
}

/// Conference selection as seen by the embedding shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConferenceContext {
    /// Selected conference id.
    pub id: String,
    /// Explicit readiness signal: false while the selection is still
    /// loading, which must block role writes.
    pub ready: bool,
}

/// Inputs for one reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncContext {
    /// Device connectivity.
    pub online: bool,
    /// Authenticated user, if any.
    pub user_id: Option<String>,
    /// Selected conference, if any.
    pub conference: Option<ConferenceContext>,
}

impl SyncContext {
    /// Context for a signed-in, online user with a loaded conference.
    pub fn ready(user_id: impl Into<String>, conference_id: impl Into<String>) -> Self {
        Self {
            online: true,
            user_id: Some(user_id.into()),
            conference: Some(ConferenceContext {
                id: conference_id.into(),
                ready: true,
            }),
        }
    }
}

/// Why a reconciliation pass did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Device offline.
    Offline,
    /// Conference selection missing or still loading.
    ContextNotReady,
    /// No signed-in user.
    NotAuthenticated,
}

/// Rows written by a completed pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncCounts {
    /// Agenda items written (interested + attending).
    pub agenda_items: usize,
    /// Tickets written.
    pub tickets: usize,
    /// Certificates written.
    pub certificates: usize,
}

/// Result of one reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Pass skipped before touching the mirror.
    Skipped(SkipReason),
    /// Pass completed; counts of rows written.
    Completed(SyncCounts),
}

/// Scan session states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// No session started.
    Idle,
    /// Camera active, decoding payloads.
    Scanning,
    /// Resolving a decoded payload to a participant.
    LookingUp,
    /// Participant shown to the operator; scanner paused.
    ConfirmPending,
    /// Attendance insert in flight.
    Committing,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanState::Idle => "idle",
            ScanState::Scanning => "scanning",
            ScanState::LookingUp => "looking_up",
            ScanState::ConfirmPending => "confirm_pending",
            ScanState::Committing => "committing",
        };
        write!(f, "{}", s)
    }
}

/// Matched participant awaiting operator confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingParticipant {
    /// Matched profile.
    pub profile: Profile,
    /// Effective role for the selected conference.
    pub role: Role,
}

/// One row of the role-aware conference user listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    /// Profile.
    pub profile: Profile,
    /// Effective role within the listed conference.
    pub role: Role,
}

/// Push notification payload handed to the dispatch collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// In-app route to open on tap.
    pub url: String,
}

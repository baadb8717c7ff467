//! # Outbound Ports
//!
//! Traits for external dependencies. The hosted relational store, the
//! on-device mirror database, the durable role-cache tier, and the push
//! delivery transport all sit behind these.

use crate::domain::{
    Attendance, CacheKey, ConferenceRole, Event, EventInterest, LocalAgendaItem, LocalCertificate,
    LocalProfile, LocalTicket, MirrorSnapshot, Profile, PushMessage, PushSubscription, Role,
    RosterEntry, SyncError,
};
use async_trait::async_trait;
use tokio::sync::watch;

/// Typed gateway to the hosted relational store.
///
/// Every method maps to a filtered select, insert, or upsert against one
/// table, plus one privileged RPC for the role-aware user listing.
/// Response shapes are narrowed to the domain types at this boundary.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a profile by internal id.
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, SyncError>;

    /// Exact-match lookup on the public badge credential.
    async fn find_profile_by_short_id(&self, short_id: &str)
        -> Result<Option<Profile>, SyncError>;

    /// Plain profile select, optionally filtered by a search string.
    /// Fallback path when the privileged RPC fails.
    async fn list_profiles(&self, search: Option<&str>) -> Result<Vec<Profile>, SyncError>;

    /// Fetch the per-conference role override, if any.
    async fn get_conference_role(
        &self,
        user_id: &str,
        conference_id: &str,
    ) -> Result<Option<ConferenceRole>, SyncError>;

    /// Insert or replace the single (user, conference) override row.
    async fn upsert_conference_role(&self, row: ConferenceRole) -> Result<(), SyncError>;

    /// Fetch an event by id.
    async fn get_event(&self, id: &str) -> Result<Option<Event>, SyncError>;

    /// Events of a conference starting within `[from, to]`.
    async fn list_upcoming_events(
        &self,
        conference_id: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<Event>, SyncError>;

    /// Append one attendance row. Never checks uniqueness: duplicate
    /// rows per (user, event) are meaningful.
    async fn insert_attendance(&self, row: Attendance) -> Result<(), SyncError>;

    /// Count attendance rows for a (user, event) pair.
    async fn count_attendance(&self, user_id: &str, event_id: &str) -> Result<u64, SyncError>;

    /// All attendance rows for a user, joined with their event.
    async fn list_attendance_with_events(
        &self,
        user_id: &str,
    ) -> Result<Vec<(Attendance, Event)>, SyncError>;

    /// All interest rows for a user, joined with their event.
    async fn list_interests_with_events(
        &self,
        user_id: &str,
    ) -> Result<Vec<(EventInterest, Event)>, SyncError>;

    /// User ids interested in an event.
    async fn list_interested_users(&self, event_id: &str) -> Result<Vec<String>, SyncError>;

    /// Register or refresh a push delivery endpoint.
    async fn upsert_push_subscription(&self, sub: PushSubscription) -> Result<(), SyncError>;

    /// Privileged RPC: batch role-aware user listing for a conference.
    async fn get_users_for_conference(
        &self,
        conference_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<RosterEntry>, SyncError>;
}

/// On-device key-indexed mirror used for offline rendering.
///
/// Writes are bulk-put overwrites keyed by id; a bulk-put only touches
/// the given rows, so an aborted pass leaves older rows intact.
/// Consumers observe updates through the watch revision.
pub trait LocalMirror: Send + Sync {
    /// Read a mirrored profile.
    fn get_profile(&self, id: &str) -> Option<LocalProfile>;

    /// Overwrite one profile record.
    fn put_profile(&self, profile: LocalProfile) -> Result<(), SyncError>;

    /// Overwrite agenda items, keyed by event id.
    fn put_agenda_items(&self, items: Vec<LocalAgendaItem>) -> Result<(), SyncError>;

    /// Overwrite tickets, keyed by event id.
    fn put_tickets(&self, tickets: Vec<LocalTicket>) -> Result<(), SyncError>;

    /// Overwrite certificates, keyed by event id.
    fn put_certificates(&self, certificates: Vec<LocalCertificate>) -> Result<(), SyncError>;

    /// Full copy of the mirror contents.
    fn snapshot(&self) -> MirrorSnapshot;

    /// Reactive read handle: the revision bumps on every write.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Durable device-local role cache tier. Survives process restart,
/// unlike the in-process tier layered above it.
pub trait RoleCacheStore: Send + Sync {
    /// Load a cached role.
    fn load(&self, key: &CacheKey) -> Result<Option<Role>, SyncError>;

    /// Store a resolved role.
    fn store(&self, key: &CacheKey, role: Role) -> Result<(), SyncError>;

    /// Drop one entry.
    fn remove(&self, key: &CacheKey) -> Result<(), SyncError>;

    /// Drop everything (sign-out).
    fn clear(&self) -> Result<(), SyncError>;
}

/// Push delivery transport. Best-effort: callers fire-and-forget, and
/// delivery failures are logged by the dispatcher, never propagated into
/// the commit they follow.
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Send a push to every registered device of a user.
    async fn send_to_user(&self, user_id: &str, message: PushMessage) -> Result<(), SyncError>;
}

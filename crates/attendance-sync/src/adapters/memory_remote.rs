//! In-memory implementation of `RemoteStore` for testing.
//!
//! Holds the authoritative tables in process memory and exposes failure
//! knobs for exercising the fallback and abort paths.

use crate::algorithms::role_precedence;
use crate::domain::{
    Attendance, ConferenceRole, Event, EventInterest, Profile, PushSubscription, RosterEntry,
    SyncError,
};
use crate::ports::RemoteStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct RemoteTables {
    profiles: HashMap<String, Profile>,
    conference_roles: HashMap<(String, String), ConferenceRole>,
    events: HashMap<String, Event>,
    attendance: Vec<Attendance>,
    interests: Vec<EventInterest>,
    subscriptions: HashMap<(String, String), PushSubscription>,
}

/// In-memory remote store.
#[derive(Default)]
pub struct InMemoryRemoteStore {
    tables: RwLock<RemoteTables>,
    fail_rpc: AtomicBool,
    fail_inserts: AtomicBool,
}

impl InMemoryRemoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile.
    pub fn add_profile(&self, profile: Profile) {
        self.tables
            .write()
            .profiles
            .insert(profile.id.clone(), profile);
    }

    /// Seed a per-conference role override.
    pub fn add_conference_role(&self, row: ConferenceRole) {
        self.tables.write().conference_roles.insert(
            (row.user_id.clone(), row.conference_id.clone()),
            row,
        );
    }

    /// Seed an event.
    pub fn add_event(&self, event: Event) {
        self.tables.write().events.insert(event.id.clone(), event);
    }

    /// Seed an interest row.
    pub fn add_interest(&self, interest: EventInterest) {
        self.tables.write().interests.push(interest);
    }

    /// Seed an attendance row directly (bypassing the workflow).
    pub fn add_attendance(&self, row: Attendance) {
        self.tables.write().attendance.push(row);
    }

    /// Make the privileged RPC fail, exercising the fallback path.
    pub fn set_fail_rpc(&self, fail: bool) {
        self.fail_rpc.store(fail, Ordering::SeqCst);
    }

    /// Make attendance inserts fail.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Total attendance rows for a (user, event) pair.
    pub fn attendance_rows(&self, user_id: &str, event_id: &str) -> usize {
        self.tables
            .read()
            .attendance
            .iter()
            .filter(|a| a.user_id == user_id && a.event_id == event_id)
            .count()
    }

    /// Registered push subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.tables.read().subscriptions.len()
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, SyncError> {
        Ok(self.tables.read().profiles.get(id).cloned())
    }

    async fn find_profile_by_short_id(
        &self,
        short_id: &str,
    ) -> Result<Option<Profile>, SyncError> {
        Ok(self
            .tables
            .read()
            .profiles
            .values()
            .find(|p| p.short_id == short_id)
            .cloned())
    }

    async fn list_profiles(&self, search: Option<&str>) -> Result<Vec<Profile>, SyncError> {
        let tables = self.tables.read();
        let needle = search.map(|s| s.to_lowercase());
        let mut profiles: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|p| match &needle {
                Some(n) => {
                    p.full_name().to_lowercase().contains(n)
                        || p.email.to_lowercase().contains(n)
                        || p.short_id.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    async fn get_conference_role(
        &self,
        user_id: &str,
        conference_id: &str,
    ) -> Result<Option<ConferenceRole>, SyncError> {
        Ok(self
            .tables
            .read()
            .conference_roles
            .get(&(user_id.to_string(), conference_id.to_string()))
            .cloned())
    }

    async fn upsert_conference_role(&self, row: ConferenceRole) -> Result<(), SyncError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(SyncError::Gateway("simulated upsert failure".to_string()));
        }
        self.add_conference_role(row);
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, SyncError> {
        Ok(self.tables.read().events.get(id).cloned())
    }

    async fn list_upcoming_events(
        &self,
        conference_id: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<Event>, SyncError> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .events
            .values()
            .filter(|e| {
                e.conference_id == conference_id && e.starts_at >= from && e.starts_at <= to
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(events)
    }

    async fn insert_attendance(&self, row: Attendance) -> Result<(), SyncError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(SyncError::Gateway("simulated insert failure".to_string()));
        }
        // Append-only, duplicates allowed by design.
        self.tables.write().attendance.push(row);
        Ok(())
    }

    async fn count_attendance(&self, user_id: &str, event_id: &str) -> Result<u64, SyncError> {
        Ok(self.attendance_rows(user_id, event_id) as u64)
    }

    async fn list_attendance_with_events(
        &self,
        user_id: &str,
    ) -> Result<Vec<(Attendance, Event)>, SyncError> {
        let tables = self.tables.read();
        Ok(tables
            .attendance
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| tables.events.get(&a.event_id).map(|e| (a.clone(), e.clone())))
            .collect())
    }

    async fn list_interests_with_events(
        &self,
        user_id: &str,
    ) -> Result<Vec<(EventInterest, Event)>, SyncError> {
        let tables = self.tables.read();
        Ok(tables
            .interests
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter_map(|i| tables.events.get(&i.event_id).map(|e| (i.clone(), e.clone())))
            .collect())
    }

    async fn list_interested_users(&self, event_id: &str) -> Result<Vec<String>, SyncError> {
        Ok(self
            .tables
            .read()
            .interests
            .iter()
            .filter(|i| i.event_id == event_id)
            .map(|i| i.user_id.clone())
            .collect())
    }

    async fn upsert_push_subscription(&self, sub: PushSubscription) -> Result<(), SyncError> {
        self.tables
            .write()
            .subscriptions
            .insert((sub.user_id.clone(), sub.endpoint.clone()), sub);
        Ok(())
    }

    async fn get_users_for_conference(
        &self,
        conference_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<RosterEntry>, SyncError> {
        if self.fail_rpc.load(Ordering::SeqCst) {
            return Err(SyncError::Gateway("simulated rpc failure".to_string()));
        }
        let profiles = self.list_profiles(search).await?;
        let tables = self.tables.read();
        Ok(profiles
            .into_iter()
            .map(|profile| {
                let override_role = tables
                    .conference_roles
                    .get(&(profile.id.clone(), conference_id.to_string()))
                    .map(|r| r.role);
                let role = role_precedence(profile.is_owner, override_role);
                RosterEntry { profile, role }
            })
            .collect())
    }
}

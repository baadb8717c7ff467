//! # Domain Layer
//!
//! Core types for attendance sync: remote entities, local mirror
//! projections, errors, and invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::{
    Attendance, Conference, ConferenceRole, Event, EventInterest, Profile, PushSubscription, Role,
};
pub use errors::SyncError;
pub use invariants::{
    invariant_effective_role, invariant_tickets_collapse, DEFAULT_ROLE_CACHE_CAPACITY,
    REMINDER_LEAD_MAX_SECS, REMINDER_LEAD_MIN_SECS,
};
pub use value_objects::{
    unix_now, AccessDecision, AgendaStatus, CacheKey, ConferenceContext, LocalAgendaItem,
    LocalCertificate, LocalProfile, LocalTicket, MirrorSnapshot, PendingParticipant, PushMessage,
    RedirectEvent, RosterEntry, ScanState, SkipReason, SyncContext, SyncCounts, SyncOutcome,
};

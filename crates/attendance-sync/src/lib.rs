//! # Attendance Sync
//!
//! Offline-first core of a conference attendance and certificate app:
//! local mirror synchronization, effective role resolution, and the
//! QR-scan attendance confirmation workflow.
//!
//! ## Purpose
//!
//! Keep a device usable offline and a scanning desk honest, using:
//! - A local mirror of the signed-in user's state, overwritten per pass
//! - A two-tier role cache with stale-read-then-correct authorization
//! - An append-only attendance log where the row COUNT carries meaning
//!
//! ## Module Structure
//!
//! ```text
//! attendance-sync/
//! ├── domain/          # Entities, mirror projections, errors, invariants
//! ├── algorithms/      # Role precedence, QR payload decode, certificate threshold
//! ├── ports/           # API traits (inbound) + dependency traits (outbound)
//! ├── adapters/        # In-memory remote store, mirror, role cache, push recorder
//! ├── application/     # RoleResolver, SyncOrchestrator, ScanSession, Notifier
//! └── config.rs        # SyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{certificate_ready, decode_scan_payload, role_precedence};
pub use application::{
    resolve_effective_role, CommitOutcome, Notifier, RoleResolver, ScanSession, SyncOrchestrator,
};
pub use config::SyncConfig;
pub use domain::{
    AccessDecision, AgendaStatus, Attendance, CacheKey, Conference, ConferenceContext,
    ConferenceRole, Event, EventInterest, LocalAgendaItem, LocalCertificate, LocalProfile,
    LocalTicket, MirrorSnapshot, PendingParticipant, Profile, PushMessage, PushSubscription,
    RedirectEvent, Role, RosterEntry, ScanState, SkipReason, SyncContext, SyncCounts, SyncError,
    SyncOutcome,
};
pub use ports::{
    AccessCheck, LocalMirror, NotificationDispatch, ReconciliationApi, RemoteStore,
    RoleCacheStore, RoleResolutionApi,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

//! # Application Services
//!
//! Orchestration over the domain and ports: role resolution with its
//! two-tier cache, the mirror reconciliation loop, the scan session
//! state machine, and the notification side-effects.

pub mod notify;
pub mod roles;
pub mod scan;
pub mod sync;

pub use notify::Notifier;
pub use roles::{resolve_effective_role, RoleResolver};
pub use scan::{CommitOutcome, ScanSession};
pub use sync::SyncOrchestrator;

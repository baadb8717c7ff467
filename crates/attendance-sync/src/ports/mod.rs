//! # Ports
//!
//! Inbound API traits implemented by the application services, and
//! outbound traits for the external collaborators (remote store, local
//! mirror, durable role cache, push dispatch).

pub mod inbound;
pub mod outbound;

pub use inbound::{AccessCheck, ReconciliationApi, RoleResolutionApi};
pub use outbound::{LocalMirror, NotificationDispatch, RemoteStore, RoleCacheStore};

//! # Domain Errors
//!
//! Error types shared by the sync, role-resolution, and attendance
//! workflows.

use thiserror::Error;

/// Errors surfaced by the attendance-sync core.
///
/// Orchestrator and post-commit failures are logged and swallowed by
/// their callers; commit failures in the scan workflow are surfaced to
/// the operator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Device is offline; reconciliation skipped.
    #[error("device is offline")]
    Offline,

    /// Conference context has not finished loading.
    #[error("conference context not ready")]
    ContextNotReady,

    /// No authenticated user in the current session.
    #[error("no authenticated user")]
    NotAuthenticated,

    /// Profile row missing for an authenticated user id.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// No profile matches the scanned short id.
    #[error("no participant with short id {0}")]
    ParticipantNotFound(String),

    /// Event row missing.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// Scan payload could not be interpreted as a short id.
    #[error("invalid scan payload: {0}")]
    InvalidScanPayload(String),

    /// Remote store call failed (network or server side).
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Local mirror write failed.
    #[error("mirror write failed: {0}")]
    MirrorWrite(String),

    /// Durable role-cache tier failed.
    #[error("role cache store error: {0}")]
    CacheStore(String),

    /// Scan session action not valid in the current state.
    #[error("invalid transition: {action} while {from}")]
    InvalidTransition {
        /// State the session was in.
        from: String,
        /// Attempted action.
        action: String,
    },
}

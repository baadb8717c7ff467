//! # Inbound Ports
//!
//! API traits implemented by the application services.

use crate::domain::{
    AccessDecision, Role, RosterEntry, SyncContext, SyncError, SyncOutcome,
};
use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Result of a required-role gate check.
///
/// When the decision came from a cached role, `revalidation` holds the
/// background task re-running the full resolution; tests await it to
/// observe the corrected state deterministically.
#[derive(Debug)]
pub struct AccessCheck {
    /// Grant or redirect, possibly from a cached (stale) role.
    pub decision: AccessDecision,
    /// Background revalidation task, present iff a cached value was used.
    pub revalidation: Option<JoinHandle<()>>,
}

/// Role resolution engine API.
#[async_trait]
pub trait RoleResolutionApi: Send + Sync {
    /// Resolve the effective role from the source tables, writing the
    /// result through both cache tiers.
    async fn resolve(&self, user_id: &str, conference_id: &str) -> Result<Role, SyncError>;

    /// Gate a page behind a required-role set. Cached roles are served
    /// optimistically with a background revalidation; `None` conference
    /// with a non-empty set redirects to conference selection.
    async fn check_access(
        &self,
        user_id: &str,
        conference_id: Option<&str>,
        required: &[Role],
    ) -> Result<AccessCheck, SyncError>;

    /// Upsert the per-conference override and invalidate both cache
    /// tiers for that key.
    async fn assign_role(
        &self,
        user_id: &str,
        conference_id: &str,
        role: Role,
    ) -> Result<(), SyncError>;

    /// Role-aware conference user listing via the privileged RPC, with a
    /// plain profile select as fallback.
    async fn list_conference_users(
        &self,
        conference_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<RosterEntry>, SyncError>;
}

/// Reconciliation loop API.
#[async_trait]
pub trait ReconciliationApi: Send + Sync {
    /// Run one pass: pull authoritative state for the signed-in user and
    /// overwrite the local mirror.
    async fn run_pass(&self, ctx: &SyncContext) -> Result<SyncOutcome, SyncError>;

    /// Number of completed passes since construction.
    fn passes_completed(&self) -> u64;

    /// Unix seconds of the last completed pass.
    fn last_completed_at(&self) -> Option<u64>;
}

//! # Sync Orchestrator
//!
//! Reconciliation loop: on mount, connectivity regain, or conference
//! change, pull authoritative state for the signed-in user and overwrite
//! the local mirror.
//!
//! Each pass is a pure overwrite of local rows derived from a fresh
//! remote read. Overlapping passes are safe: last-bulk-put-wins with
//! idempotent computed inputs, and no local read-modify-write exists.

use super::roles::resolve_effective_role;
use crate::domain::{
    unix_now, AgendaStatus, Event, LocalAgendaItem, LocalCertificate, LocalProfile, LocalTicket,
    SkipReason, SyncContext, SyncCounts, SyncError, SyncOutcome,
};
use crate::ports::{LocalMirror, ReconciliationApi, RemoteStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reconciliation loop over the remote store and the local mirror.
pub struct SyncOrchestrator {
    remote: Arc<dyn RemoteStore>,
    mirror: Arc<dyn LocalMirror>,
    passes: AtomicU64,
    last_completed: Mutex<Option<u64>>,
}

impl SyncOrchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(remote: Arc<dyn RemoteStore>, mirror: Arc<dyn LocalMirror>) -> Self {
        Self {
            remote,
            mirror,
            passes: AtomicU64::new(0),
            last_completed: Mutex::new(None),
        }
    }

    async fn run_pass_inner(&self, ctx: &SyncContext) -> Result<SyncOutcome, SyncError> {
        if !ctx.online {
            return Ok(SyncOutcome::Skipped(SkipReason::Offline));
        }
        let conference = match &ctx.conference {
            // An unloaded conference must not produce a partial role write.
            Some(conference) if conference.ready => conference,
            _ => return Ok(SyncOutcome::Skipped(SkipReason::ContextNotReady)),
        };
        let user_id = match &ctx.user_id {
            Some(user_id) => user_id,
            None => return Ok(SyncOutcome::Skipped(SkipReason::NotAuthenticated)),
        };

        let profile = self
            .remote
            .get_profile(user_id)
            .await?
            .ok_or_else(|| SyncError::ProfileNotFound(user_id.clone()))?;

        // The mirror profile carries the COMPUTED effective role; this
        // pass is the only writer of that field.
        let role = resolve_effective_role(self.remote.as_ref(), user_id, &conference.id).await?;
        self.mirror.put_profile(LocalProfile {
            id: profile.id.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            role,
            degree: profile.degree.clone(),
            short_id: profile.short_id.clone(),
        })?;

        let mut agenda: Vec<LocalAgendaItem> = Vec::new();

        for (_, event) in self.remote.list_interests_with_events(user_id).await? {
            agenda.push(LocalAgendaItem {
                event_id: event.id.clone(),
                conference_id: event.conference_id.clone(),
                title: event.title.clone(),
                starts_at: event.starts_at,
                status: AgendaStatus::Interested,
            });
        }

        // Attendance keyed by event id: repeated scans collapse, the
        // last fetched row wins.
        let mut tickets: BTreeMap<String, LocalTicket> = BTreeMap::new();
        let mut scan_counts: BTreeMap<String, (u64, Event)> = BTreeMap::new();
        for (attendance, event) in self.remote.list_attendance_with_events(user_id).await? {
            tickets.insert(
                event.id.clone(),
                LocalTicket {
                    event_id: event.id.clone(),
                    user_id: user_id.clone(),
                    title: event.title.clone(),
                    scanned_at: attendance.scanned_at,
                },
            );
            agenda.push(LocalAgendaItem {
                event_id: event.id.clone(),
                conference_id: event.conference_id.clone(),
                title: event.title.clone(),
                starts_at: event.starts_at,
                status: AgendaStatus::Attending,
            });
            let entry = scan_counts.entry(event.id.clone()).or_insert((0, event));
            entry.0 += 1;
        }

        // Earned certificates: enough scans for a certificate-granting
        // event. Projection only; notification dedup lives elsewhere.
        let certificates: Vec<LocalCertificate> = scan_counts
            .values()
            .filter(|(count, event)| {
                event.gives_certificate
                    && event.duration_days > 0
                    && *count >= u64::from(event.duration_days)
            })
            .map(|(count, event)| LocalCertificate {
                event_id: event.id.clone(),
                user_id: user_id.clone(),
                title: event.title.clone(),
                scan_count: *count,
            })
            .collect();

        let counts = SyncCounts {
            agenda_items: agenda.len(),
            tickets: tickets.len(),
            certificates: certificates.len(),
        };

        // Interested entries first so an attending entry for the same
        // event overwrites it.
        self.mirror.put_agenda_items(agenda)?;
        self.mirror.put_tickets(tickets.into_values().collect())?;
        self.mirror.put_certificates(certificates)?;

        self.passes.fetch_add(1, Ordering::SeqCst);
        *self.last_completed.lock() = Some(unix_now());
        debug!(
            "sync pass for {} completed: {} agenda, {} tickets, {} certificates",
            user_id, counts.agenda_items, counts.tickets, counts.certificates
        );

        Ok(SyncOutcome::Completed(counts))
    }
}

#[async_trait]
impl ReconciliationApi for SyncOrchestrator {
    async fn run_pass(&self, ctx: &SyncContext) -> Result<SyncOutcome, SyncError> {
        match self.run_pass_inner(ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Abort: previous mirror state stays intact, next
                // trigger retries.
                warn!("sync pass aborted: {}", e);
                Err(e)
            }
        }
    }

    fn passes_completed(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    fn last_completed_at(&self) -> Option<u64> {
        *self.last_completed.lock()
    }
}

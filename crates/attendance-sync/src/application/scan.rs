//! # Attendance Confirmation Workflow
//!
//! State machine over a single scan session:
//!
//! ```text
//! Idle -> Scanning -> LookingUp -> ConfirmPending -> Committing -> Scanning
//! ```
//!
//! Decoding pauses while a lookup or confirmation is outstanding; that
//! pause is the only concurrency control on one device. Across devices
//! no mutual exclusion exists or is needed: concurrent inserts for the
//! same (user, event) are all accepted, duplicates are meaningful.

use super::notify::Notifier;
use super::roles::resolve_effective_role;
use crate::algorithms::decode_scan_payload;
use crate::domain::{
    unix_now, Attendance, PendingParticipant, ScanState, SyncError,
};
use crate::ports::RemoteStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// A committed scan plus its fire-and-forget certificate check.
#[derive(Debug)]
pub struct CommitOutcome {
    /// The inserted attendance row.
    pub attendance: Attendance,
    /// Post-commit certificate-completion task. Does not block the
    /// scanner; tests await it for determinism.
    pub certificate_check: JoinHandle<()>,
}

/// One operator's scan session for a selected activity.
pub struct ScanSession {
    remote: Arc<dyn RemoteStore>,
    notifier: Arc<Notifier>,
    conference_id: String,
    event_id: Option<String>,
    state: ScanState,
    pending: Option<PendingParticipant>,
    last_error: Option<String>,
}

impl ScanSession {
    /// Create an idle session scoped to a conference.
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        notifier: Arc<Notifier>,
        conference_id: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            notifier,
            conference_id: conference_id.into(),
            event_id: None,
            state: ScanState::Idle,
            pending: None,
            last_error: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Participant awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&PendingParticipant> {
        self.pending.as_ref()
    }

    /// Take the last transient error message.
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn invalid(&self, action: &str) -> SyncError {
        SyncError::InvalidTransition {
            from: self.state.to_string(),
            action: action.to_string(),
        }
    }

    fn resume_with_error(&mut self, err: SyncError) -> SyncError {
        self.last_error = Some(err.to_string());
        self.pending = None;
        self.state = ScanState::Scanning;
        err
    }

    /// Start (or restart) scanning for the given activity.
    pub fn start(&mut self, event_id: impl Into<String>) -> Result<(), SyncError> {
        match self.state {
            ScanState::Idle | ScanState::Scanning => {
                self.event_id = Some(event_id.into());
                self.pending = None;
                self.last_error = None;
                self.state = ScanState::Scanning;
                Ok(())
            }
            _ => Err(self.invalid("start")),
        }
    }

    /// Feed one decoded QR payload.
    ///
    /// Ignored (returns `Ok(None)`) unless the session is actively
    /// scanning, which prevents duplicate decodes of the same badge
    /// while the confirmation modal is open. A lookup miss or gateway
    /// error is transient: the error is surfaced, the scanner resumes,
    /// and nothing was written.
    pub async fn handle_decode(
        &mut self,
        payload: &str,
    ) -> Result<Option<&PendingParticipant>, SyncError> {
        if self.state != ScanState::Scanning {
            return Ok(None);
        }
        self.state = ScanState::LookingUp;

        let short_id = match decode_scan_payload(payload) {
            Ok(id) => id,
            Err(e) => return Err(self.resume_with_error(e)),
        };

        // The short id is the public credential; never look up by `id`.
        let profile = match self.remote.find_profile_by_short_id(&short_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                return Err(self.resume_with_error(SyncError::ParticipantNotFound(short_id)))
            }
            Err(e) => return Err(self.resume_with_error(e)),
        };

        let role = match resolve_effective_role(
            self.remote.as_ref(),
            &profile.id,
            &self.conference_id,
        )
        .await
        {
            Ok(role) => role,
            Err(e) => return Err(self.resume_with_error(e)),
        };

        debug!("scan matched {} ({})", profile.full_name(), role);
        self.pending = Some(PendingParticipant { profile, role });
        self.state = ScanState::ConfirmPending;
        Ok(self.pending.as_ref())
    }

    /// Operator confirmed the participant: commit one attendance row.
    ///
    /// No uniqueness check: every confirmed scan inserts a new row, so a
    /// multi-day event accrues one row per day. Insert failure is
    /// surfaced (the operator must know the scan did not count) and the
    /// scanner resumes with no partial state.
    pub async fn confirm(&mut self) -> Result<CommitOutcome, SyncError> {
        if self.state != ScanState::ConfirmPending {
            return Err(self.invalid("confirm"));
        }
        let pending = self.pending.take().ok_or_else(|| self.invalid("confirm"))?;
        let event_id = self
            .event_id
            .clone()
            .ok_or_else(|| self.invalid("confirm"))?;
        self.state = ScanState::Committing;

        let row = Attendance {
            id: Uuid::new_v4().to_string(),
            user_id: pending.profile.id.clone(),
            event_id: event_id.clone(),
            scanned_at: unix_now(),
        };

        if let Err(e) = self.remote.insert_attendance(row.clone()).await {
            return Err(self.resume_with_error(e));
        }

        let certificate_check = self
            .notifier
            .spawn_certificate_check(pending.profile.id.clone(), event_id);

        self.state = ScanState::Scanning;
        Ok(CommitOutcome {
            attendance: row,
            certificate_check,
        })
    }

    /// Operator dismissed the confirmation modal. Zero cost: no remote
    /// state was touched yet.
    pub fn cancel(&mut self) -> Result<(), SyncError> {
        if self.state != ScanState::ConfirmPending {
            return Err(self.invalid("cancel"));
        }
        self.pending = None;
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// End the session.
    pub fn finish(&mut self) {
        self.event_id = None;
        self.pending = None;
        self.state = ScanState::Idle;
    }
}

//! # Notifier
//!
//! Notification side-effects shared by the scan workflow and the
//! cron-style boundary: the post-commit certificate check, the
//! upcoming-event reminder pass, and push endpoint registration.
//!
//! Everything here is best-effort. The certificate check is not
//! transactional with the attendance insert it follows: a crash in
//! between can under-notify, never over-notify, because the count query
//! re-reads current truth.

use crate::algorithms::certificate_ready;
use crate::config::SyncConfig;
use crate::domain::{PushMessage, PushSubscription, SyncError};
use crate::ports::{NotificationDispatch, RemoteStore};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Notification side-effect service.
pub struct Notifier {
    config: SyncConfig,
    remote: Arc<dyn RemoteStore>,
    dispatch: Arc<dyn NotificationDispatch>,
    /// (user, event) pairs already reminded in this process.
    reminded: Mutex<HashSet<(String, String)>>,
}

impl Notifier {
    /// Create a notifier over the given collaborators.
    pub fn new(
        config: SyncConfig,
        remote: Arc<dyn RemoteStore>,
        dispatch: Arc<dyn NotificationDispatch>,
    ) -> Self {
        Self {
            config,
            remote,
            dispatch,
            reminded: Mutex::new(HashSet::new()),
        }
    }

    /// Certificate-completion check, run after every attendance insert.
    ///
    /// Sends the one-time "certificate ready" push when the row count
    /// EXACTLY equals the event's duration in days. All failures are
    /// logged and swallowed; the commit this follows is never rolled
    /// back.
    pub async fn certificate_check(&self, user_id: &str, event_id: &str) {
        let event = match self.remote.get_event(event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                warn!("certificate check: event {} not found", event_id);
                return;
            }
            Err(e) => {
                warn!("certificate check: event fetch failed: {}", e);
                return;
            }
        };

        if !event.gives_certificate {
            return;
        }

        let count = match self.remote.count_attendance(user_id, event_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!("certificate check: attendance count failed: {}", e);
                return;
            }
        };

        if !certificate_ready(count, event.duration_days, event.gives_certificate) {
            return;
        }

        debug!(
            "certificate threshold reached for {} on {} ({} scans)",
            user_id, event_id, count
        );
        let message = PushMessage {
            title: "Certificate ready".to_string(),
            body: format!("Your certificate for {} is ready.", event.title),
            url: "/certificates".to_string(),
        };
        if let Err(e) = self.dispatch.send_to_user(user_id, message).await {
            warn!("certificate push to {} failed: {}", user_id, e);
        }
    }

    /// Fire-and-forget wrapper around [`Self::certificate_check`].
    pub fn spawn_certificate_check(
        self: &Arc<Self>,
        user_id: String,
        event_id: String,
    ) -> JoinHandle<()> {
        let notifier = Arc::clone(self);
        tokio::spawn(async move {
            notifier.certificate_check(&user_id, &event_id).await;
        })
    }

    /// Cron-style boundary: remind interested users of events starting
    /// within the configured lead window. Returns pushes sent.
    ///
    /// Reminders are de-duplicated per (user, event) within this
    /// process; the trigger re-runs every few minutes.
    pub async fn run_reminder_pass(
        &self,
        conference_id: &str,
        now: u64,
    ) -> Result<usize, SyncError> {
        let from = now + self.config.reminder_lead_min_secs;
        let to = now + self.config.reminder_lead_max_secs;
        let events = self
            .remote
            .list_upcoming_events(conference_id, from, to)
            .await?;

        let mut sent = 0;
        for event in events {
            for user_id in self.remote.list_interested_users(&event.id).await? {
                let pair = (user_id.clone(), event.id.clone());
                if !self.reminded.lock().insert(pair) {
                    continue;
                }
                let message = PushMessage {
                    title: "Starting soon".to_string(),
                    body: format!("{} starts in a few minutes.", event.title),
                    url: format!("/events/{}", event.id),
                };
                match self.dispatch.send_to_user(&user_id, message).await {
                    Ok(()) => sent += 1,
                    Err(e) => warn!("reminder push to {} failed: {}", user_id, e),
                }
            }
        }
        Ok(sent)
    }

    /// Register or refresh a push delivery endpoint.
    pub async fn register_push_subscription(
        &self,
        sub: PushSubscription,
    ) -> Result<(), SyncError> {
        self.remote.upsert_push_subscription(sub).await
    }
}

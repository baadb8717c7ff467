//! Recording implementation of `NotificationDispatch` for testing.

use crate::domain::{PushMessage, SyncError};
use crate::ports::NotificationDispatch;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Push dispatcher that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingPushDispatch {
    sent: Mutex<Vec<(String, PushMessage)>>,
    fail: AtomicBool,
}

impl RecordingPushDispatch {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail, exercising the swallow-and-log path.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All messages sent so far, in order.
    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().clone()
    }

    /// Messages sent to one user.
    pub fn sent_to(&self, user_id: &str) -> Vec<PushMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationDispatch for RecordingPushDispatch {
    async fn send_to_user(&self, user_id: &str, message: PushMessage) -> Result<(), SyncError> {
        if self.fail.load(Ordering::SeqCst) {
            warn!("push delivery to {} failed (simulated)", user_id);
            return Err(SyncError::Gateway("simulated push failure".to_string()));
        }
        self.sent.lock().push((user_id.to_string(), message));
        Ok(())
    }
}

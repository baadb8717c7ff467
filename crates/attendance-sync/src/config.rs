//! # Sync Configuration

use crate::domain::invariants::{
    DEFAULT_ROLE_CACHE_CAPACITY, REMINDER_LEAD_MAX_SECS, REMINDER_LEAD_MIN_SECS,
};
use serde::{Deserialize, Serialize};

/// Configuration for the attendance-sync core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Route to redirect to when a required-role gate fails.
    pub fallback_route: String,

    /// Route to redirect to when a gated page is opened with no
    /// conference selected.
    pub conference_select_route: String,

    /// Capacity of the in-process role cache tier.
    pub role_cache_capacity: usize,

    /// Lower edge of the reminder window, seconds before event start.
    pub reminder_lead_min_secs: u64,

    /// Upper edge of the reminder window, seconds before event start.
    pub reminder_lead_max_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fallback_route: "/home".to_string(),
            conference_select_route: "/conferences".to_string(),
            role_cache_capacity: DEFAULT_ROLE_CACHE_CAPACITY,
            reminder_lead_min_secs: REMINDER_LEAD_MIN_SECS,
            reminder_lead_max_secs: REMINDER_LEAD_MAX_SECS,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            fallback_route: "/home".to_string(),
            conference_select_route: "/conferences".to_string(),
            role_cache_capacity: 8,
            reminder_lead_min_secs: 60,
            reminder_lead_max_secs: 120,
        }
    }
}

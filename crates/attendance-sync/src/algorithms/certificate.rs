//! # Certificate Threshold
//!
//! A certificate-completion notification fires when the attendance row
//! count EXACTLY equals the event's duration in days. Exact equality is
//! the de-duplication mechanism: the check runs after every insert, so
//! the count passes through each integer once and the threshold is
//! observed exactly once.

/// Whether a "certificate ready" notification should fire after the
/// insert that brought the count to `attendance_count`.
pub fn certificate_ready(attendance_count: u64, duration_days: u32, gives_certificate: bool) -> bool {
    gives_certificate && duration_days > 0 && attendance_count == u64::from(duration_days)
}

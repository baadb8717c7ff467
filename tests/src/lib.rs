//! # Attendance-Sync Test Suite
//!
//! Cross-component flows: scan desk to certificate push, reconciliation
//! against the local mirror, and stale-role correction.
//!
//! ```bash
//! cargo test -p attendance-tests
//! ```

#![allow(dead_code)]

pub mod integration;

//! Cross-component integration flows.

pub mod flows;
pub mod role_access;

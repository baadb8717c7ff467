//! # Algorithms
//!
//! Pure functions behind the services: role precedence, QR payload
//! decoding, and the certificate threshold check.

pub mod certificate;
pub mod role_precedence;
pub mod scan_payload;

pub use certificate::certificate_ready;
pub use role_precedence::role_precedence;
pub use scan_payload::decode_scan_payload;

//! # Scan Payload Decoding
//!
//! A badge QR carries either the bare short id, or a JSON object with an
//! `id` field holding it. JSON parse is attempted first; parse failure
//! falls back to treating the raw string as the id.

use crate::domain::SyncError;
use serde::Deserialize;

/// JSON envelope form of the QR payload.
#[derive(Debug, Deserialize)]
struct ScanEnvelope {
    id: String,
}

/// Extract the participant short id from a decoded QR payload.
///
/// `"CK2-AB12"` and `{"id":"CK2-AB12"}` yield the same id.
pub fn decode_scan_payload(raw: &str) -> Result<String, SyncError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::InvalidScanPayload("empty payload".to_string()));
    }

    if let Ok(envelope) = serde_json::from_str::<ScanEnvelope>(trimmed) {
        let id = envelope.id.trim().to_string();
        if id.is_empty() {
            return Err(SyncError::InvalidScanPayload(
                "envelope has empty id".to_string(),
            ));
        }
        return Ok(id);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bare_short_id() {
        assert_eq!(decode_scan_payload("CK2-AB12").unwrap(), "CK2-AB12");
    }

    #[test]
    fn test_json_envelope() {
        assert_eq!(
            decode_scan_payload(r#"{"id":"CK2-AB12"}"#).unwrap(),
            "CK2-AB12"
        );
    }

    #[test]
    fn test_both_forms_agree() {
        let bare = decode_scan_payload("CK2-AB12").unwrap();
        let wrapped = decode_scan_payload(r#"{"id":"CK2-AB12"}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(decode_scan_payload("  CK2-AB12\n").unwrap(), "CK2-AB12");
    }

    #[test]
    fn test_envelope_with_extra_fields() {
        let raw = r#"{"id":"CK2-AB12","v":2,"issued":"2026-08-24"}"#;
        assert_eq!(decode_scan_payload(raw).unwrap(), "CK2-AB12");
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(decode_scan_payload("").is_err());
        assert!(decode_scan_payload("   ").is_err());
    }

    #[test]
    fn test_envelope_empty_id_rejected() {
        assert!(decode_scan_payload(r#"{"id":""}"#).is_err());
    }

    #[test]
    fn test_malformed_json_falls_back_to_raw() {
        // Not valid JSON, so the whole string is the id.
        assert_eq!(decode_scan_payload("{oops").unwrap(), "{oops");
    }

    proptest! {
        #[test]
        fn prop_bare_and_wrapped_always_agree(id in "[A-Z0-9]{3}-[A-Z0-9]{4}") {
            let wrapped = format!(r#"{{"id":"{}"}}"#, id);
            prop_assert_eq!(
                decode_scan_payload(&id).unwrap(),
                decode_scan_payload(&wrapped).unwrap()
            );
        }
    }
}

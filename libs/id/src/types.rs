//! Typed ID definitions for all platform resources.
//!
//! Server-generated resources use prefixed ULID IDs; rows keyed by a Postgres
//! `serial` column use i32-backed serial IDs.

use crate::{define_id, define_serial_id};

// =============================================================================
// Sessions and Accounts
// =============================================================================

define_id!(SessionId, "sess");
define_id!(AccountId, "acct");

// =============================================================================
// Requests
// =============================================================================

define_id!(RequestId, "req");

// =============================================================================
// Serial-keyed resources
// =============================================================================

define_serial_id!(UserId);
define_serial_id!(ReportId);
define_serial_id!(ItemId);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdError;
    use proptest::prelude::*;

    #[test]
    fn session_id_roundtrip() {
        let id = SessionId::new();
        let s = id.to_string();
        assert!(s.starts_with("sess_"));
        let parsed = SessionId::parse(&s).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_rejects_wrong_prefix() {
        let id = AccountId::new().to_string();
        let err = SessionId::parse(&id).unwrap_err();
        assert!(err.is_prefix_error());
    }

    #[test]
    fn session_id_rejects_empty_and_garbage() {
        assert_eq!(SessionId::parse(""), Err(IdError::Empty));
        assert_eq!(SessionId::parse("sess"), Err(IdError::MissingSeparator));
        assert!(matches!(
            SessionId::parse("sess_not-a-ulid"),
            Err(IdError::InvalidUlid(_))
        ));
    }

    #[test]
    fn serial_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(UserId::parse("42").unwrap(), id);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn serial_id_rejects_non_positive() {
        assert!(UserId::parse("0").is_err());
        assert!(UserId::parse("-3").is_err());
        assert!(ReportId::parse("abc").is_err());
    }

    #[test]
    fn ids_serialize_as_expected() {
        let session = SessionId::new();
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, format!("\"{session}\""));

        let report = ReportId::new(7);
        assert_eq!(serde_json::to_string(&report).unwrap(), "7");
        let back: ReportId = serde_json::from_str("7").unwrap();
        assert_eq!(back, report);
    }

    proptest! {
        #[test]
        fn request_id_string_roundtrip(_seed in 0u8..255) {
            let id = RequestId::new();
            let parsed = RequestId::parse(&id.to_string()).unwrap();
            prop_assert_eq!(id, parsed);
        }

        #[test]
        fn serial_id_parse_format_roundtrip(raw in 1i32..i32::MAX) {
            let id = ItemId::new(raw);
            let parsed = ItemId::parse(&id.to_string()).unwrap();
            prop_assert_eq!(id, parsed);
        }
    }
}

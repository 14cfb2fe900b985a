//! Unit tests for the identifier newtypes

use core_kernel::{AddressId, PersonId};
use proptest::prelude::*;
use uuid::Uuid;

mod address_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = AddressId::new();
        let id2 = AddressId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_generates_time_ordered_ids() {
        let id1 = AddressId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = AddressId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = AddressId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_parse_rejects_prefixed_value() {
        let id = AddressId::new();
        assert!(format!("END-{}", id).parse::<AddressId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = AddressId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod person_id_tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_display() {
        let original = PersonId::new();
        let parsed: PersonId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let original = PersonId::new();
        let parsed: PersonId = format!("  {}  ", original).parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("not-a-uuid".parse::<PersonId>().is_err());
        assert!("".parse::<PersonId>().is_err());
    }
}

proptest! {
    #[test]
    fn prop_any_uuid_parses_back(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        let parsed: AddressId = uuid.to_string().parse().unwrap();
        prop_assert_eq!(*parsed.as_uuid(), uuid);
    }
}

//! Tests for sequence identifiers, principals and call contexts

use chrono::{TimeZone, Utc};
use core_kernel::{CallContext, ClaimId, EvidenceId, PolicyId, Principal};

#[test]
fn test_ids_serialize_as_bare_numbers() {
    let json = serde_json::to_string(&ClaimId::new(3)).unwrap();
    assert_eq!(json, "3");

    let back: ClaimId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ClaimId::new(3));
}

#[test]
fn test_id_prefixes() {
    assert_eq!(PolicyId::prefix(), "POL");
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(EvidenceId::prefix(), "EVD");
}

#[test]
fn test_invalid_id_parse_fails() {
    assert!("CLM-abc".parse::<ClaimId>().is_err());
    assert!("".parse::<PolicyId>().is_err());
}

#[test]
fn test_ids_are_ordered_by_sequence() {
    let first = ClaimId::FIRST;
    let second = first.next();
    assert!(first < second);
    assert_eq!(u64::from(second), 2);
}

#[test]
fn test_principal_compares_by_raw_value() {
    let a = Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
    let b: Principal = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG".into();
    let c = Principal::new("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), a.as_str());
}

#[test]
fn test_call_context_rebinding() {
    let t0 = Utc.timestamp_opt(0, 0).unwrap();
    let t1 = Utc.timestamp_opt(60, 0).unwrap();
    let ctx = CallContext::new("admin", t0);

    let later = ctx.at(t1);
    assert_eq!(later.caller, ctx.caller);
    assert_eq!(later.now, t1);

    let other = ctx.as_caller("reviewer");
    assert_eq!(other.caller, Principal::new("reviewer"));
    assert_eq!(other.now, t0);
}

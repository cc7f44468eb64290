//! Remote data slices driven the way the CLI drives them.
//!
//! These tests verify that:
//! - A failed fetch keeps stale data and records the envelope message
//! - A later successful fetch clears the error
//! - Stale responses never overwrite newer data
//! - Mutations apply fully or not at all

use fedctl::api::{envelope_message, parse_body};
use fedctl::error::{ClientError, GENERIC_FAILURE};
use fedctl::models::{CoachMembership, MembershipStatus, PartnerMembership};
use fedctl::{SliceStatus, Store};

fn membership(json: &str) -> CoachMembership {
    parse_body("/api/coach/membership", json).unwrap()
}

fn http_error(status: u16, body: &str) -> ClientError {
    ClientError::Http {
        status,
        message: envelope_message(body),
    }
}

#[test]
fn test_fetch_error_isolation() {
    let mut store = Store::new();
    let slice = &mut store.coach_membership;

    let first = slice
        .fetch(|| Ok(membership(r#"{"status":"active","plan":"pro","auto_renew":true}"#)))
        .map(|m| m.status);
    assert_eq!(first, Ok(MembershipStatus::Active));

    let err = slice
        .fetch(|| Err(http_error(500, r#"{"message":"Database unavailable"}"#)))
        .map(|_| ())
        .unwrap_err()
        .to_string();
    assert_eq!(err, "Database unavailable");
    assert_eq!(slice.status(), SliceStatus::Failed);
    assert_eq!(slice.data().and_then(|m| m.plan.as_deref()), Some("pro"));

    assert!(slice
        .fetch(|| Ok(membership(r#"{"status":"cancelled","plan":"pro"}"#)))
        .is_ok());
    assert!(slice.error().is_none());
    assert_eq!(slice.data().map(|m| m.status), Some(MembershipStatus::Cancelled));
}

#[test]
fn test_generic_message_without_envelope() {
    let mut store = Store::new();
    let res = store
        .dashboard
        .fetch(|| Err(http_error(502, "<html>Bad Gateway</html>")))
        .map(|_| ());
    assert_eq!(res, Err(GENERIC_FAILURE));
}

#[test]
fn test_stale_response_dropped() {
    let mut store = Store::new();
    let slice = &mut store.partner_membership;

    let slow = slice.begin();
    let fast = slice.begin();
    let newer: PartnerMembership =
        parse_body("/api/partner/membership", r#"{"status":"active","plan":"gold"}"#).unwrap();
    let older: PartnerMembership =
        parse_body("/api/partner/membership", r#"{"status":"active","plan":"silver"}"#).unwrap();

    assert!(slice.settle(fast, Ok(newer)));
    assert!(!slice.settle(slow, Ok(older)));
    assert_eq!(slice.data().and_then(|m| m.plan.as_deref()), Some("gold"));
    assert!(!slice.is_loading());
}

#[test]
fn test_mutation_all_or_nothing() {
    let mut store = Store::new();
    let slice = &mut store.coach_membership;
    let _ = slice.fetch(|| Ok(membership(r#"{"status":"active","plan":"basic"}"#)));

    let res = slice
        .mutate(|_| Err(http_error(402, r#"{"error":{"message":"Card declined"}}"#)))
        .map(|_| ());
    assert_eq!(res, Err("Card declined"));
    assert_eq!(slice.data().and_then(|m| m.plan.as_deref()), Some("basic"));

    let res = slice
        .mutate(|cur| {
            let mut next = cur.cloned().ok_or_else(|| ClientError::validation("membership", "missing"))?;
            next.plan = Some("pro".to_string());
            Ok(next)
        })
        .map(|m| m.plan.clone());
    assert_eq!(res, Ok(Some("pro".to_string())));
    assert_eq!(slice.status(), SliceStatus::Success);
}

#[test]
fn test_malformed_payload_surfaces_as_error() {
    let mut store = Store::new();
    let res = store
        .coach_membership
        .fetch(|| parse_body("/api/coach/membership", r#"{"plan":"pro"}"#))
        .map(|_| ());
    assert!(res.is_err());
    assert!(store.coach_membership.data().is_none());
    assert_eq!(store.coach_membership.status(), SliceStatus::Failed);
}

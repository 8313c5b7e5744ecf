// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Token Integration Tests
//!
//! - `test_token_*`: issuance and verification
//! - `test_expiry_*`: the 24 hour window
//! - `test_unverified_*`: claim reads that skip the signature

use chrono::{Duration, TimeZone, Utc};
use warden_api::auth::decode_unverified;
use warden_api::TokenAuthority;
use warden_config::TokenConfig;
use warden_core::{AccountId, Role, TokenError};
use warden_tests::prelude::*;

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_token_issue_then_verify_returns_identity() {
    let tokens = token_authority();
    let alice = IdentityFixtures::alice();

    let token = tokens.issue(&alice).unwrap();
    let claims = tokens.verify(&token).unwrap();

    assert_eq!(claims.sub, "alice@example.com");
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.uid, AccountId(1));
    assert_eq!(claims.identity(), alice);
}

#[test]
fn test_token_default_ttl_is_one_day() {
    let tokens = token_authority();
    assert_eq!(tokens.ttl_secs(), 86_400);

    let token = tokens.issue_at(&IdentityFixtures::bob(), fixed_now()).unwrap();
    let claims = tokens.verify_at(&token, fixed_now()).unwrap();
    assert_eq!(claims.exp - claims.iat, 86_400);
}

#[test]
fn test_token_from_other_authority_is_rejected() {
    let ours = token_authority();
    let theirs = TokenAuthority::new(TokenConfig::new("some-other-secret-of-adequate-length!")).unwrap();

    let forged = theirs.issue(&IdentityFixtures::admin()).unwrap();
    assert_eq!(ours.verify(&forged), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_token_garbage_is_malformed() {
    let tokens = token_authority();
    for garbage in ["", "abc", "a.b", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..sig"] {
        assert!(
            matches!(tokens.verify(garbage), Err(TokenError::Malformed { .. })),
            "{garbage:?} should be malformed"
        );
    }
}

#[test]
fn test_expiry_window_boundaries() {
    let tokens = token_authority();
    let issued = fixed_now();
    let token = tokens.issue_at(&IdentityFixtures::alice(), issued).unwrap();

    let just_before = issued + Duration::seconds(86_399);
    let at_expiry = issued + Duration::seconds(86_400);

    assert!(tokens.verify_at(&token, just_before).is_ok());
    assert!(!tokens.is_expired_at(&token, just_before).unwrap());

    assert_eq!(tokens.verify_at(&token, at_expiry), Err(TokenError::Expired));
    assert!(tokens.is_expired_at(&token, at_expiry).unwrap());
}

#[test]
fn test_expiry_check_ignores_signature() {
    let ours = token_authority();
    let theirs = TokenAuthority::new(TokenConfig::new("some-other-secret-of-adequate-length!")).unwrap();

    let foreign = theirs.issue_at(&IdentityFixtures::bob(), fixed_now()).unwrap();
    let later = fixed_now() + Duration::days(2);

    assert!(ours.is_expired_at(&foreign, later).unwrap());
    assert!(!ours.is_expired_at(&foreign, fixed_now()).unwrap());
}

#[test]
fn test_unverified_claims_need_no_key() {
    let tokens = token_authority();
    let token = tokens.issue(&IdentityFixtures::admin()).unwrap();

    let claims = decode_unverified(&token).unwrap();
    assert_eq!(claims["sub"], "root@example.com");
    assert_eq!(claims["role"], "ADMIN");
    assert_eq!(claims["uid"], 3);
    assert_eq!(claims, tokens.extract_claims_unverified(&token).unwrap());
}

#[test]
fn test_unverified_claims_of_expired_token_still_readable() {
    let tokens = token_authority();
    let long_ago = fixed_now() - Duration::days(30);
    let token = tokens.issue_at(&IdentityFixtures::alice(), long_ago).unwrap();

    assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    let claims = tokens.extract_claims_unverified(&token).unwrap();
    assert_eq!(claims["sub"], "alice@example.com");
}

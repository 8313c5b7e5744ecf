// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Authorization Guard Integration Tests
//!
//! `allow = ADMIN || owner`, with unauthenticated callers always denied.

use warden_core::{AccessGrant, AccountId, AuthContext, AuthorizationGuard, Role, WardenError};
use warden_tests::prelude::*;

#[test]
fn test_guard_decision_table() {
    let alice = IdentityFixtures::context(&IdentityFixtures::alice());
    let admin = IdentityFixtures::context(&IdentityFixtures::admin());
    let anonymous = AuthContext::anonymous();

    let cases = [
        (&alice, AccountId(1), true),
        (&alice, AccountId(2), false),
        (&admin, AccountId(1), true),
        (&admin, AccountId(3), true),
        (&admin, AccountId(999), true),
        (&anonymous, AccountId(0), false),
        (&anonymous, AccountId(1), false),
    ];

    for (ctx, target, expected) in cases {
        assert_eq!(
            AuthorizationGuard::allows(ctx, target),
            expected,
            "{} -> {}",
            ctx.subject,
            target
        );
    }
}

#[test]
fn test_guard_reports_grant_reason() {
    let alice = IdentityFixtures::context(&IdentityFixtures::alice());
    let admin = IdentityFixtures::context(&IdentityFixtures::admin());

    assert_eq!(
        AuthorizationGuard::authorize(&alice, AccountId(1)).unwrap(),
        AccessGrant::Owner
    );
    assert_eq!(
        AuthorizationGuard::authorize(&admin, AccountId(1)).unwrap(),
        AccessGrant::RoleBypass
    );
}

#[test]
fn test_guard_failures_are_typed() {
    let alice = IdentityFixtures::context(&IdentityFixtures::alice());

    assert!(matches!(
        AuthorizationGuard::authorize(&alice, AccountId(2)),
        Err(WardenError::AuthorizationDenied { .. })
    ));
    assert!(matches!(
        AuthorizationGuard::authorize(&AuthContext::anonymous(), AccountId(1)),
        Err(WardenError::Unauthenticated)
    ));
}

#[test]
fn test_guard_forged_anonymous_fields_grant_nothing() {
    let mut ctx = AuthContext::anonymous();
    ctx.account_id = Some(AccountId(1));
    ctx.role = Role::Admin;

    assert!(!AuthorizationGuard::allows(&ctx, AccountId(1)));
    assert!(!AuthorizationGuard::has_role(&ctx, Role::Admin));
    assert!(AuthorizationGuard::require_role(&ctx, Role::Admin).is_err());
}

#[test]
fn test_guard_role_check_is_exact() {
    let admin = IdentityFixtures::context(&IdentityFixtures::admin());
    let bob = IdentityFixtures::context(&IdentityFixtures::bob());

    assert!(AuthorizationGuard::has_role(&admin, Role::Admin));
    assert!(!AuthorizationGuard::has_role(&admin, Role::User));
    assert!(AuthorizationGuard::require_role(&bob, Role::User).is_ok());
    assert!(AuthorizationGuard::require_role(&bob, Role::Admin).is_err());
}

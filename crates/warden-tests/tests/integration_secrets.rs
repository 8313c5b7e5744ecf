// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Resource Server Integration Tests
//!
//! The resource server router driven in-process with a scripted verifier.
//!
//! - `test_secrets_*`: per-account secret CRUD
//! - `test_users_*`: profile endpoints
//! - `test_filter_*`: the authentication filter

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use warden_core::{AccountId, SecretCipher};
use warden_tests::prelude::*;

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";
const ROOT: &str = "root-token";

fn app() -> (ResourceApp, MockVerifier) {
    init_test_logging();
    let verifier = MockVerifier::new()
        .with_token(ALICE, IdentityFixtures::alice())
        .with_token(BOB, IdentityFixtures::bob())
        .with_token(ROOT, IdentityFixtures::admin());
    (ResourceApp::new(Arc::new(verifier.clone())), verifier)
}

fn secret(website: &str, value: &str) -> serde_json::Value {
    json!({
        "website": website,
        "username": "alice",
        "description": "personal",
        "value": value,
    })
}

async fn create(app: &ResourceApp, token: &str, owner: u64, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    app.send(
        Method::POST,
        &format!("/api/secrets/user/{}", owner),
        Some(token),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn test_secrets_owner_lifecycle() {
    let (app, _) = app();

    let (status, created) = create(&app, ALICE, 1, secret("example.org", "p@ss1")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], 1);
    assert_eq!(created["website"], "example.org");
    assert_eq!(created["value"], "p@ss1");
    let id = created["id"].as_u64().unwrap();

    let (status, fetched) = app.get(&format!("/api/secrets/user/1/{}", id), Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["value"], "p@ss1");

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/secrets/user/1/{}", id),
            Some(ALICE),
            Some(secret("example.org", "p@ss2")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["value"], "p@ss2");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/secrets/user/1/{}", id), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/secrets/user/1/{}", id), Some(ALICE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_secrets_stored_encrypted() {
    let (app, _) = app();
    let (_, created) = create(&app, ALICE, 1, secret("example.org", "p@ss1")).await;
    let id = created["id"].as_u64().unwrap();

    let record = app
        .state
        .secrets
        .store()
        .get(AccountId(1), id)
        .await
        .expect("stored record");
    assert_ne!(record.value, "p@ss1");

    let cipher = SecretCipher::new(TEST_CIPHER_SECRET);
    assert_eq!(cipher.decrypt(&record.value).unwrap(), "p@ss1");
}

#[tokio::test]
async fn test_secrets_other_user_is_forbidden() {
    let (app, _) = app();
    // Bob must be known to the directory before his account can be a target.
    app.get("/api/users/me", Some(BOB)).await;
    let (_, created) = create(&app, BOB, 2, secret("bank.example", "hunter2")).await;
    let id = created["id"].as_u64().unwrap();

    let (status, body) = app.get("/api/secrets/user/2", Some(ALICE)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = create(&app, ALICE, 2, secret("evil.example", "x")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/secrets/user/2/{}", id), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_secrets_admin_reads_any_account() {
    let (app, _) = app();
    create(&app, ALICE, 1, secret("example.org", "p@ss1")).await;

    let (status, listed) = app.get("/api/secrets/user/1", Some(ROOT)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["value"], "p@ss1");
}

#[tokio::test]
async fn test_secrets_unknown_account_is_not_found() {
    let (app, _) = app();

    let (status, body) = app.get("/api/secrets/user/77", Some(ROOT)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_secrets_missing_fields_rejected() {
    let (app, _) = app();

    let (status, body) = create(&app, ALICE, 1, json!({ "website": "example.org" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_users_me_and_rename() {
    let (app, _) = app();

    let (status, me) = app.get("/api/users/me", Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], 1);
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["role"], "USER");

    let (status, renamed) = app
        .send(Method::PUT, "/api/users/1", Some(ALICE), Some(json!({ "username": "Alice A." })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["username"], "Alice A.");
}

#[tokio::test]
async fn test_users_listing_requires_admin() {
    let (app, _) = app();
    app.get("/api/users/me", Some(ALICE)).await;

    let (status, _) = app.get("/api/users", Some(ALICE)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, listed) = app.get("/api/users", Some(ROOT)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_users_delete_cascades_secrets() {
    let (app, _) = app();
    create(&app, ALICE, 1, secret("a.example", "1")).await;
    create(&app, ALICE, 1, secret("b.example", "2")).await;

    let (status, _) = app.send(Method::DELETE, "/api/users/1", Some(ROOT), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.secrets.store().list(AccountId(1)).await.is_empty());
    assert!(!app.state.directory.contains(AccountId(1)));
}

#[tokio::test]
async fn test_filter_invalid_token_is_anonymous() {
    let (app, verifier) = app();

    let (status, _) = app.get("/api/users/me", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(verifier.call_count(), 1);
}

#[tokio::test]
async fn test_filter_missing_header_skips_verifier() {
    let (app, verifier) = app();

    let (status, _) = app.get("/api/secrets/user/1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(verifier.call_count(), 0);
}

#[tokio::test]
async fn test_filter_outage_is_anonymous_not_error() {
    let (app, verifier) = app();
    verifier.set_offline(true);

    let (status, _) = app.get("/health", Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/users/me", Some(ALICE)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resource server storage: encrypted secrets and known accounts.
//!
//! Stores hold ciphertext only. Encryption, decryption and authorization
//! happen in [`crate::service`] before anything reaches a store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use warden_core::{AccountId, Role};

// =============================================================================
// Secret Records
// =============================================================================

/// A stored secret. `value` is a cipher blob, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Secret id, unique across owners.
    pub id: u64,
    /// Owning account.
    pub owner_id: AccountId,
    /// Website or service the credential belongs to.
    pub website: String,
    /// Login name on that website.
    pub username: String,
    /// Free-form note.
    pub description: Option<String>,
    /// `base64(IV || ciphertext)`.
    pub value: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields of a secret about to be stored.
#[derive(Debug, Clone)]
pub struct SecretDraft {
    /// Website.
    pub website: String,
    /// Login name.
    pub username: String,
    /// Note.
    pub description: Option<String>,
    /// Cipher blob.
    pub value: String,
}

/// Persistence boundary for secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Stores a new secret for `owner`.
    async fn insert(&self, owner: AccountId, draft: SecretDraft) -> SecretRecord;

    /// All secrets of `owner`, ordered by id.
    async fn list(&self, owner: AccountId) -> Vec<SecretRecord>;

    /// A secret of `owner`. Secrets of other owners are invisible.
    async fn get(&self, owner: AccountId, id: u64) -> Option<SecretRecord>;

    /// Replaces a secret's fields. Returns `None` if it does not exist for `owner`.
    async fn update(&self, owner: AccountId, id: u64, draft: SecretDraft) -> Option<SecretRecord>;

    /// Deletes a secret. Returns `true` if it existed for `owner`.
    async fn remove(&self, owner: AccountId, id: u64) -> bool;

    /// Deletes every secret of `owner`, returning how many were removed.
    async fn remove_owner(&self, owner: AccountId) -> usize;
}

/// In-memory secret store.
pub struct InMemorySecretStore {
    records: RwLock<BTreeMap<u64, SecretRecord>>,
    next_id: AtomicU64,
}

impl InMemorySecretStore {
    /// Creates an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Total number of stored secrets, across owners.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn insert(&self, owner: AccountId, draft: SecretDraft) -> SecretRecord {
        let now = Utc::now();
        let record = SecretRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            owner_id: owner,
            website: draft.website,
            username: draft.username,
            description: draft.description,
            value: draft.value,
            created_at: now,
            updated_at: now,
        };
        self.records.write().insert(record.id, record.clone());
        record
    }

    async fn list(&self, owner: AccountId) -> Vec<SecretRecord> {
        self.records
            .read()
            .values()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect()
    }

    async fn get(&self, owner: AccountId, id: u64) -> Option<SecretRecord> {
        self.records
            .read()
            .get(&id)
            .filter(|r| r.owner_id == owner)
            .cloned()
    }

    async fn update(&self, owner: AccountId, id: u64, draft: SecretDraft) -> Option<SecretRecord> {
        let mut records = self.records.write();
        let record = records.get_mut(&id).filter(|r| r.owner_id == owner)?;

        record.website = draft.website;
        record.username = draft.username;
        record.description = draft.description;
        record.value = draft.value;
        record.updated_at = Utc::now();
        Some(record.clone())
    }

    async fn remove(&self, owner: AccountId, id: u64) -> bool {
        let mut records = self.records.write();
        match records.get(&id) {
            Some(r) if r.owner_id == owner => records.remove(&id).is_some(),
            _ => false,
        }
    }

    async fn remove_owner(&self, owner: AccountId) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, r| r.owner_id != owner);
        before - records.len()
    }
}

// =============================================================================
// Account Directory
// =============================================================================

/// What the resource server knows about an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account id, as assigned by the authority.
    pub id: AccountId,
    /// Account email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Role last reported by the authority.
    pub role: Role,
    /// When the account first made an authenticated request here.
    pub first_seen: DateTime<Utc>,
    /// When the account last made an authenticated request here.
    pub last_seen: DateTime<Utc>,
}

/// Accounts that have authenticated against the resource server.
///
/// Filled by the authentication layer from authority verdicts. Display names
/// edited here survive later requests; email and role always follow the
/// authority.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    profiles: RwLock<BTreeMap<AccountId, UserProfile>>,
}

impl AccountDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an authenticated sighting of an account.
    pub fn upsert(
        &self,
        id: AccountId,
        email: &str,
        username: Option<&str>,
        role: Role,
    ) -> UserProfile {
        let now = Utc::now();
        let mut profiles = self.profiles.write();
        let profile = profiles.entry(id).or_insert_with(|| UserProfile {
            id,
            email: email.to_string(),
            username: username.unwrap_or(email).to_string(),
            role,
            first_seen: now,
            last_seen: now,
        });

        profile.email = email.to_string();
        profile.role = role;
        profile.last_seen = now;
        profile.clone()
    }

    /// Returns a profile by id.
    pub fn get(&self, id: AccountId) -> Option<UserProfile> {
        self.profiles.read().get(&id).cloned()
    }

    /// Returns `true` if the account is known.
    pub fn contains(&self, id: AccountId) -> bool {
        self.profiles.read().contains_key(&id)
    }

    /// All known profiles, ordered by id.
    pub fn list(&self) -> Vec<UserProfile> {
        self.profiles.read().values().cloned().collect()
    }

    /// Changes a display name.
    pub fn rename(&self, id: AccountId, username: &str) -> Option<UserProfile> {
        let mut profiles = self.profiles.write();
        let profile = profiles.get_mut(&id)?;
        profile.username = username.to_string();
        Some(profile.clone())
    }

    /// Forgets an account. Returns `true` if it was known.
    pub fn remove(&self, id: AccountId) -> bool {
        self.profiles.write().remove(&id).is_some()
    }
}

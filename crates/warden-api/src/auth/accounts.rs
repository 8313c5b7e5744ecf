// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account storage for the token authority.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use warden_core::{AccountId, Identity, Role};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Account
// =============================================================================

/// A registered account.
#[derive(Clone)]
pub struct Account {
    /// Account id.
    pub id: AccountId,
    /// Display name.
    pub username: String,
    /// Email, also the token subject. Stored lowercased.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Current role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns the identity to embed in a token.
    pub fn identity(&self) -> Identity {
        Identity::new(self.email.clone(), self.role, self.id)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Display name.
    pub username: String,
    /// Email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Initial role.
    pub role: Role,
}

// =============================================================================
// AccountStore
// =============================================================================

/// Persistence boundary for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts an account. Fails with a conflict if the email is taken.
    async fn insert(&self, account: NewAccount) -> ApiResult<Account>;

    /// Finds an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Option<Account>;

    /// Finds an account by id.
    async fn find_by_id(&self, id: AccountId) -> Option<Account>;

    /// Number of accounts.
    async fn count(&self) -> usize;
}

/// In-memory account store.
pub struct InMemoryAccountStore {
    accounts: RwLock<BTreeMap<AccountId, Account>>,
    next_id: AtomicU64,
}

impl InMemoryAccountStore {
    /// Creates an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> ApiResult<Account> {
        let email = account.email.trim().to_lowercase();
        let mut accounts = self.accounts.write();

        if accounts.values().any(|a| a.email == email) {
            return Err(ApiError::conflict(format!(
                "Email is already registered: {}",
                email
            )));
        }

        let id = AccountId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = Account {
            id,
            username: account.username,
            email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: Utc::now(),
        };
        accounts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = email.trim().to_lowercase();
        self.accounts
            .read()
            .values()
            .find(|a| a.email == email)
            .cloned()
    }

    async fn find_by_id(&self, id: AccountId) -> Option<Account> {
        self.accounts.read().get(&id).cloned()
    }

    async fn count(&self) -> usize {
        self.accounts.read().len()
    }
}

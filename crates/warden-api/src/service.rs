// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resource server operations.
//!
//! Every operation on a per-account resource calls
//! [`AuthorizationGuard::authorize`] first. A denial returns before any store
//! read, mutation or cipher work.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warden_core::{AccountId, AuthContext, AuthorizationGuard, CoreResult, Role, SecretCipher, WardenError};

use crate::store::{AccountDirectory, SecretDraft, SecretRecord, SecretStore, UserProfile};

// =============================================================================
// Secret Views
// =============================================================================

/// A secret as returned to its owner, with the value decrypted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretView {
    /// Secret id.
    pub id: u64,
    /// Owning account.
    pub user_id: AccountId,
    /// Website.
    pub website: String,
    /// Login name.
    pub username: String,
    /// Note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Decrypted value.
    pub value: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Body of a create or update request.
///
/// On update, absent or empty fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretInput {
    /// Website.
    #[serde(default)]
    pub website: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Note.
    #[serde(default)]
    pub description: Option<String>,
    /// Plaintext value.
    #[serde(default)]
    pub value: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

// =============================================================================
// SecretService
// =============================================================================

/// Guarded access to encrypted secrets.
#[derive(Clone)]
pub struct SecretService {
    store: Arc<dyn SecretStore>,
    cipher: Arc<SecretCipher>,
    directory: Arc<AccountDirectory>,
}

impl SecretService {
    /// Creates a service over a store, a cipher and the account directory.
    pub fn new(
        store: Arc<dyn SecretStore>,
        cipher: Arc<SecretCipher>,
        directory: Arc<AccountDirectory>,
    ) -> Self {
        Self {
            store,
            cipher,
            directory,
        }
    }

    /// The underlying record store. Values in it are ciphertext.
    pub fn store(&self) -> &Arc<dyn SecretStore> {
        &self.store
    }

    /// Authorizes `ctx` against `owner`, then checks the owner exists.
    fn admit(&self, ctx: &AuthContext, owner: AccountId) -> CoreResult<()> {
        let grant = AuthorizationGuard::authorize(ctx, owner)?;
        if !self.directory.contains(owner) {
            return Err(WardenError::account_not_found(owner));
        }
        debug!(subject = %ctx.subject, owner = %owner, grant = ?grant, "Secret access granted");
        Ok(())
    }

    fn view(&self, record: SecretRecord) -> CoreResult<SecretView> {
        let value = self.cipher.decrypt(&record.value)?;
        Ok(SecretView {
            id: record.id,
            user_id: record.owner_id,
            website: record.website,
            username: record.username,
            description: record.description,
            value,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Encrypts and stores a new secret for `owner`.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        owner: AccountId,
        input: SecretInput,
    ) -> CoreResult<SecretView> {
        self.admit(ctx, owner)?;

        let (Some(website), Some(username), Some(value)) = (
            non_empty(&input.website),
            non_empty(&input.username),
            non_empty(&input.value),
        ) else {
            return Err(WardenError::invalid_input(
                "website, username and value are required",
            ));
        };

        let draft = SecretDraft {
            website: website.to_string(),
            username: username.to_string(),
            description: input.description.clone(),
            value: self.cipher.encrypt(value)?,
        };

        let record = self.store.insert(owner, draft).await;
        info!(subject = %ctx.subject, owner = %owner, secret_id = record.id, "Secret created");
        self.view(record)
    }

    /// Lists and decrypts every secret of `owner`.
    ///
    /// One undecryptable record fails the whole listing.
    pub async fn list(&self, ctx: &AuthContext, owner: AccountId) -> CoreResult<Vec<SecretView>> {
        self.admit(ctx, owner)?;

        self.store
            .list(owner)
            .await
            .into_iter()
            .map(|record| self.view(record))
            .collect()
    }

    /// Fetches and decrypts one secret.
    pub async fn get(&self, ctx: &AuthContext, owner: AccountId, id: u64) -> CoreResult<SecretView> {
        self.admit(ctx, owner)?;

        let record = self
            .store
            .get(owner, id)
            .await
            .ok_or_else(|| WardenError::secret_not_found(id))?;
        self.view(record)
    }

    /// Updates a secret, re-encrypting the value with a fresh IV.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        owner: AccountId,
        id: u64,
        input: SecretInput,
    ) -> CoreResult<SecretView> {
        self.admit(ctx, owner)?;

        let current = self
            .store
            .get(owner, id)
            .await
            .ok_or_else(|| WardenError::secret_not_found(id))?;

        let value = match non_empty(&input.value) {
            Some(plaintext) => self.cipher.encrypt(plaintext)?,
            None => self.cipher.encrypt(&self.cipher.decrypt(&current.value)?)?,
        };

        let draft = SecretDraft {
            website: non_empty(&input.website)
                .map(str::to_string)
                .unwrap_or(current.website),
            username: non_empty(&input.username)
                .map(str::to_string)
                .unwrap_or(current.username),
            description: input.description.or(current.description),
            value,
        };

        let record = self
            .store
            .update(owner, id, draft)
            .await
            .ok_or_else(|| WardenError::secret_not_found(id))?;
        info!(subject = %ctx.subject, owner = %owner, secret_id = id, "Secret updated");
        self.view(record)
    }

    /// Deletes a secret.
    pub async fn delete(&self, ctx: &AuthContext, owner: AccountId, id: u64) -> CoreResult<()> {
        self.admit(ctx, owner)?;

        if !self.store.remove(owner, id).await {
            return Err(WardenError::secret_not_found(id));
        }
        info!(subject = %ctx.subject, owner = %owner, secret_id = id, "Secret deleted");
        Ok(())
    }
}

// =============================================================================
// UserService
// =============================================================================

/// Body of a profile update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    /// New display name.
    #[serde(default)]
    pub username: Option<String>,
}

/// Guarded access to account profiles.
#[derive(Clone)]
pub struct UserService {
    directory: Arc<AccountDirectory>,
    secrets: Arc<dyn SecretStore>,
}

impl UserService {
    /// Creates a service over the directory and the secret store.
    pub fn new(directory: Arc<AccountDirectory>, secrets: Arc<dyn SecretStore>) -> Self {
        Self { directory, secrets }
    }

    /// Lists every known account. Admin only.
    pub fn list(&self, ctx: &AuthContext) -> CoreResult<Vec<UserProfile>> {
        AuthorizationGuard::require_role(ctx, Role::Admin)?;
        Ok(self.directory.list())
    }

    /// Returns one profile.
    pub fn get(&self, ctx: &AuthContext, id: AccountId) -> CoreResult<UserProfile> {
        AuthorizationGuard::authorize(ctx, id)?;
        self.directory
            .get(id)
            .ok_or_else(|| WardenError::account_not_found(id))
    }

    /// Returns the caller's own profile.
    pub fn me(&self, ctx: &AuthContext) -> CoreResult<UserProfile> {
        let id = match (ctx.authenticated, ctx.account_id) {
            (true, Some(id)) => id,
            _ => return Err(WardenError::Unauthenticated),
        };
        self.get(ctx, id)
    }

    /// Changes a display name.
    pub fn update(&self, ctx: &AuthContext, id: AccountId, update: UserUpdate) -> CoreResult<UserProfile> {
        AuthorizationGuard::authorize(ctx, id)?;

        let Some(username) = non_empty(&update.username) else {
            return Err(WardenError::invalid_input("username is required"));
        };

        let profile = self
            .directory
            .rename(id, username.trim())
            .ok_or_else(|| WardenError::account_not_found(id))?;
        info!(subject = %ctx.subject, account_id = %id, "Profile updated");
        Ok(profile)
    }

    /// Forgets an account and deletes its secrets.
    pub async fn delete(&self, ctx: &AuthContext, id: AccountId) -> CoreResult<()> {
        AuthorizationGuard::authorize(ctx, id)?;

        if !self.directory.remove(id) {
            return Err(WardenError::account_not_found(id));
        }
        let removed = self.secrets.remove_owner(id).await;
        info!(subject = %ctx.subject, account_id = %id, secrets_removed = removed, "Account deleted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySecretStore;
    use warden_core::CipherError;

    struct Fixture {
        secrets: SecretService,
        users: UserService,
        store: Arc<InMemorySecretStore>,
        directory: Arc<AccountDirectory>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemorySecretStore::new());
        let directory = Arc::new(AccountDirectory::new());
        directory.upsert(AccountId(1), "alice@example.com", Some("alice"), Role::User);
        directory.upsert(AccountId(2), "bob@example.com", Some("bob"), Role::User);

        let cipher = Arc::new(SecretCipher::new("k1"));
        Fixture {
            secrets: SecretService::new(store.clone(), cipher, directory.clone()),
            users: UserService::new(directory.clone(), store.clone()),
            store,
            directory,
        }
    }

    fn alice() -> AuthContext {
        AuthContext::authenticated("alice@example.com", AccountId(1), Role::User, "t")
    }

    fn bob() -> AuthContext {
        AuthContext::authenticated("bob@example.com", AccountId(2), Role::User, "t")
    }

    fn admin() -> AuthContext {
        AuthContext::authenticated("root@example.com", AccountId(9), Role::Admin, "t")
    }

    fn input(value: &str) -> SecretInput {
        SecretInput {
            website: Some("example.com".into()),
            username: Some("alice".into()),
            description: Some("main login".into()),
            value: Some(value.into()),
        }
    }

    #[tokio::test]
    async fn test_create_stores_ciphertext() {
        let f = fixture();
        let view = f.secrets.create(&alice(), AccountId(1), input("p@ss1")).await.unwrap();
        assert_eq!(view.value, "p@ss1");

        let stored = f.store.get(AccountId(1), view.id).await.unwrap();
        assert_ne!(stored.value, "p@ss1");
        assert_eq!(SecretCipher::new("k1").decrypt(&stored.value).unwrap(), "p@ss1");
    }

    #[tokio::test]
    async fn test_denied_before_any_mutation() {
        let f = fixture();
        let err = f.secrets.create(&bob(), AccountId(1), input("x")).await.unwrap_err();
        assert!(matches!(err, WardenError::AuthorizationDenied { .. }));
        assert!(f.store.is_empty());

        let anonymous = AuthContext::anonymous();
        let err = f.secrets.list(&anonymous, AccountId(1)).await.unwrap_err();
        assert_eq!(err, WardenError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_admin_bypass() {
        let f = fixture();
        let view = f.secrets.create(&alice(), AccountId(1), input("p@ss1")).await.unwrap();
        let fetched = f.secrets.get(&admin(), AccountId(1), view.id).await.unwrap();
        assert_eq!(fetched.value, "p@ss1");
    }

    #[tokio::test]
    async fn test_unknown_owner_and_secret() {
        let f = fixture();
        let err = f.secrets.list(&admin(), AccountId(42)).await.unwrap_err();
        assert_eq!(err, WardenError::account_not_found(AccountId(42)));

        let err = f.secrets.get(&alice(), AccountId(1), 77).await.unwrap_err();
        assert_eq!(err, WardenError::secret_not_found(77));
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let f = fixture();
        let mut missing = input("x");
        missing.website = Some("  ".into());
        let err = f.secrets.create(&alice(), AccountId(1), missing).await.unwrap_err();
        assert!(matches!(err, WardenError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_missing_fields_and_reencrypts() {
        let f = fixture();
        let view = f.secrets.create(&alice(), AccountId(1), input("p@ss1")).await.unwrap();
        let before = f.store.get(AccountId(1), view.id).await.unwrap().value;

        let updated = f
            .secrets
            .update(&alice(), AccountId(1), view.id, SecretInput::default())
            .await
            .unwrap();
        assert_eq!(updated.website, "example.com");
        assert_eq!(updated.value, "p@ss1");

        let after = f.store.get(AccountId(1), view.id).await.unwrap().value;
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_corrupt_record_fails_without_plaintext() {
        let f = fixture();
        let record = f
            .store
            .insert(
                AccountId(1),
                SecretDraft {
                    website: "w".into(),
                    username: "u".into(),
                    description: None,
                    value: "%%%not-base64".into(),
                },
            )
            .await;

        let err = f.secrets.get(&alice(), AccountId(1), record.id).await.unwrap_err();
        assert!(matches!(
            err,
            WardenError::Decryption(CipherError::InvalidEncoding { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_operations() {
        let f = fixture();
        assert!(f.users.list(&alice()).is_err());
        assert_eq!(f.users.list(&admin()).unwrap().len(), 2);

        assert_eq!(f.users.me(&alice()).unwrap().email, "alice@example.com");
        assert!(f.users.get(&alice(), AccountId(2)).is_err());

        let renamed = f
            .users
            .update(&alice(), AccountId(1), UserUpdate { username: Some("Alice".into()) })
            .unwrap();
        assert_eq!(renamed.username, "Alice");
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let f = fixture();
        f.secrets.create(&bob(), AccountId(2), input("b")).await.unwrap();
        f.secrets.create(&alice(), AccountId(1), input("a")).await.unwrap();

        f.users.delete(&admin(), AccountId(2)).await.unwrap();
        assert!(!f.directory.contains(AccountId(2)));
        assert_eq!(f.store.len(), 1);

        let err = f.users.delete(&admin(), AccountId(2)).await.unwrap_err();
        assert_eq!(err, WardenError::account_not_found(AccountId(2)));
    }
}

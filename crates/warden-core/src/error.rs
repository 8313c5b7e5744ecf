// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error taxonomy shared by the authority and the resource server.
//!
//! Failures are explicit values. Callers match on [`WardenError`] kinds
//! instead of inspecting messages.

use thiserror::Error;

use crate::types::AccountId;

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, WardenError>;

// =============================================================================
// TokenError
// =============================================================================

/// Failure to verify a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token could not be parsed or is missing required claims.
    #[error("Malformed token: {message}")]
    Malformed {
        /// What was wrong with the token.
        message: String,
    },

    /// The token's expiration time has passed.
    #[error("Token has expired")]
    Expired,

    /// The token signature does not match its contents.
    #[error("Token signature is invalid")]
    SignatureInvalid,
}

impl TokenError {
    /// Creates a malformed-token error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

// =============================================================================
// CipherError
// =============================================================================

/// Failure to encrypt or decrypt a stored secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The blob is not valid base64.
    #[error("Secret blob is not valid base64: {message}")]
    InvalidEncoding {
        /// Decoder message.
        message: String,
    },

    /// The decoded blob cannot hold an IV and at least one block.
    #[error("Secret blob too short: {len} bytes")]
    TooShort {
        /// Decoded length.
        len: usize,
    },

    /// Padding validation failed (corrupt blob or wrong key).
    #[error("Secret padding is invalid")]
    Padding,

    /// The decrypted bytes are not UTF-8 (corrupt blob or wrong key).
    #[error("Decrypted secret is not valid UTF-8")]
    InvalidUtf8,

    /// The operating system random source failed.
    #[error("Random source unavailable: {message}")]
    RandomSource {
        /// Source message.
        message: String,
    },
}

impl CipherError {
    /// `true` for every variant except the encryption-side `RandomSource`.
    pub fn is_decryption_failure(&self) -> bool {
        !matches!(self, Self::RandomSource { .. })
    }
}

// =============================================================================
// WardenError
// =============================================================================

/// The full failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardenError {
    /// Token verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The token authority could not be reached or answered garbage.
    #[error("Validation transport failure: {message}")]
    ValidationTransport {
        /// Transport-level detail (never shown to clients).
        message: String,
    },

    /// A stored secret could not be decrypted or encrypted.
    #[error("Cipher failure: {0}")]
    Decryption(#[from] CipherError),

    /// The caller is authenticated but may not touch the target.
    #[error("Access to account {target} denied for {subject}")]
    AuthorizationDenied {
        /// The caller's subject.
        subject: String,
        /// The targeted account.
        target: AccountId,
    },

    /// The request carries no authenticated identity.
    #[error("Authentication required")]
    Unauthenticated,

    /// The referenced account does not exist.
    #[error("Account not found: {account_id}")]
    AccountNotFound {
        /// The missing account.
        account_id: AccountId,
    },

    /// The referenced secret does not exist for that owner.
    #[error("Secret not found: {secret_id}")]
    SecretNotFound {
        /// The missing secret.
        secret_id: u64,
    },

    /// The request is structurally invalid.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },
}

impl WardenError {
    /// Creates a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::ValidationTransport {
            message: message.into(),
        }
    }

    /// Creates an authorization denial.
    pub fn denied(subject: impl Into<String>, target: AccountId) -> Self {
        Self::AuthorizationDenied {
            subject: subject.into(),
            target,
        }
    }

    /// Creates an account-not-found error.
    pub fn account_not_found(account_id: AccountId) -> Self {
        Self::AccountNotFound { account_id }
    }

    /// Creates a secret-not-found error.
    pub fn secret_not_found(secret_id: u64) -> Self {
        Self::SecretNotFound { secret_id }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_failure_classification() {
        assert!(CipherError::Padding.is_decryption_failure());
        assert!(CipherError::InvalidUtf8.is_decryption_failure());
        assert!(CipherError::TooShort { len: 3 }.is_decryption_failure());
        assert!(!CipherError::RandomSource {
            message: "x".into()
        }
        .is_decryption_failure());
    }

    #[test]
    fn test_from_token_error() {
        let err: WardenError = TokenError::Expired.into();
        assert_eq!(err, WardenError::Token(TokenError::Expired));
        assert_eq!(err.to_string(), "Token has expired");
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and verification.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Deserialize;
use warden_config::TokenConfig;
use warden_core::claims::{self, ClaimMap, Claims};
use warden_core::{Identity, TokenError};

use crate::error::{ApiError, ApiResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

// =============================================================================
// TokenAuthority
// =============================================================================

/// Issues and verifies signed identity tokens.
///
/// The only holder of the signing key. Cloning shares the same keys.
#[derive(Clone)]
pub struct TokenAuthority {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenAuthority {
    /// Creates an authority from token configuration.
    pub fn new(config: TokenConfig) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|e| ApiError::internal(e.to_string()))?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked against our own clock after the signature.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a token for `identity`, valid from now for the configured TTL.
    pub fn issue(&self, identity: &Identity) -> ApiResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> ApiResult<String> {
        let claims = self
            .ttl()
            .and_then(|ttl| Claims::new(identity, &self.config.issuer, now, ttl))
            .ok_or_else(|| {
                ApiError::internal(format!(
                    "Token lifetime of {}s is out of range",
                    self.config.ttl_secs
                ))
            })?;

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies the signature, then the expiry, and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token against the clock value `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token.trim(), &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Decodes the payload without checking the signature.
    ///
    /// For inspection only. Never base an authorization decision on it.
    pub fn extract_claims_unverified(&self, token: &str) -> Result<ClaimMap, TokenError> {
        decode_unverified(token)
    }

    /// Reports whether the expiry claim has passed, ignoring the signature.
    ///
    /// A forged token with a future expiry reports `false`. This is not a
    /// validity check.
    pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
        self.is_expired_at(token, Utc::now())
    }

    /// Expiry-only check against the clock value `now`.
    pub fn is_expired_at(&self, token: &str, now: DateTime<Utc>) -> Result<bool, TokenError> {
        #[derive(Deserialize)]
        struct ExpiryOnly {
            exp: i64,
        }

        let expiry = decode::<ExpiryOnly>(
            token.trim(),
            &self.decoding_key,
            &unverified_validation(&["exp"]),
        )
        .map_err(map_jwt_error)?;

        Ok(claims::is_expired_at(expiry.claims.exp, now))
    }

    /// Returns the token lifetime, or `None` if it does not fit a `Duration`.
    pub fn ttl(&self) -> Option<Duration> {
        Duration::try_seconds(self.config.ttl_secs)
    }

    /// Returns the token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.config.ttl_secs
    }

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &ALGORITHM)
            .field("ttl_secs", &self.config.ttl_secs)
            .finish()
    }
}

/// Decodes a token's payload without any key.
///
/// For offline inspection only. Never base an authorization decision on it.
pub fn decode_unverified(token: &str) -> Result<ClaimMap, TokenError> {
    decode::<ClaimMap>(
        token.trim(),
        &DecodingKey::from_secret(&[]),
        &unverified_validation(&[]),
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)
}

fn unverified_validation(required: &[&str]) -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(required);
    validation.insecure_disable_signature_validation();
    validation
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer => TokenError::malformed("unexpected issuer"),
        ErrorKind::InvalidAlgorithm => TokenError::malformed("unexpected algorithm"),
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::malformed(format!("missing claim '{}'", claim))
        }
        ErrorKind::InvalidToken => TokenError::malformed("not a three-part token"),
        _ => TokenError::malformed(e.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================

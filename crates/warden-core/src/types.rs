// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account identifiers, roles and identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// AccountId
// =============================================================================

/// Numeric account identifier assigned by the account store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Creates a new account identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// =============================================================================
// Role
// =============================================================================

/// Account role.
///
/// Every account has exactly one role. `Admin` bypasses ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account; may only touch its own resources.
    #[default]
    User,
    /// Administrator; may touch any account's resources.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Exact inverse of [`Role::as_str`]. Case variants and a `ROLE_` prefix
    /// are not role names.
    pub fn from_wire(name: &str) -> Option<Self> {
        [Role::User, Role::Admin]
            .into_iter()
            .find(|role| role.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The identity embedded into an issued token.
///
/// Immutable once issued: changing a role takes effect through the account
/// store, never by rewriting a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable account identifier (the account email).
    pub subject: String,
    /// Role at issuance time.
    pub role: Role,
    /// Account id at issuance time.
    pub account_id: AccountId,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(subject: impl Into<String>, role: Role, account_id: AccountId) -> Self {
        Self {
            subject: subject.into(),
            role,
            account_id,
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
    fn test_role_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serde_uses_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_role_from_wire_is_exact() {
        assert_eq!(Role::from_wire("USER"), Some(Role::User));
        assert_eq!(Role::from_wire("ADMIN"), Some(Role::Admin));
        for name in ["user", "Admin", "ROLE_USER", " USER", "USER ", ""] {
            assert_eq!(Role::from_wire(name), None, "{:?}", name);
        }
    }

    #[test]
    fn test_account_id_parse() {
        assert_eq!("42".parse::<AccountId>().unwrap(), AccountId(42));
        assert!("abc".parse::<AccountId>().is_err());
        assert_eq!(serde_json::to_string(&AccountId(7)).unwrap(), "7");
    }
}

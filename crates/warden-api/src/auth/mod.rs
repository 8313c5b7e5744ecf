// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance, accounts and password hashing for the token authority.

pub mod accounts;
mod jwt;
pub mod password;

pub use accounts::{Account, AccountStore, InMemoryAccountStore, NewAccount};
pub use jwt::{decode_unverified, TokenAuthority};
pub use password::{hash_password, verify_password, UNKNOWN_ACCOUNT_HASH};

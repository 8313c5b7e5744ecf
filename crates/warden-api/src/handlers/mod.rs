// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP handlers.
//!
//! Token authority:
//!
//! - [`auth`]: registration, login and password checks
//! - [`jwt`]: token verdicts for other services
//!
//! Resource server:
//!
//! - [`secrets`]: per-account encrypted secrets
//! - [`users`]: account profiles
//! - [`health`]: liveness

mod auth;
mod health;
mod jwt;
mod secrets;
mod users;

pub use auth::*;
pub use health::*;
pub use jwt::*;
pub use secrets::*;
pub use users::*;

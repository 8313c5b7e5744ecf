// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role and ownership authorization.
//!
//! One composite rule protects every per-account resource:
//!
//! ```text
//! allow = has_role(ctx, ADMIN) || is_resource_owner(ctx, target)
//! ```
//!
//! The guard only reads an [`AuthContext`] that was already built from an
//! authority verdict. It never looks at the raw token.

use crate::context::AuthContext;
use crate::error::{CoreResult, WardenError};
use crate::types::{AccountId, Role};

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    /// The caller owns the target account.
    Owner,
    /// The caller's role bypasses ownership.
    RoleBypass,
}

/// Stateless authorization decisions over an [`AuthContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// Returns `true` iff the caller's account id equals `owner`.
    ///
    /// Always `false` for unauthenticated contexts, whatever their fields hold.
    pub fn is_resource_owner(ctx: &AuthContext, owner: AccountId) -> bool {
        ctx.authenticated && ctx.account_id == Some(owner)
    }

    /// Returns `true` iff the caller holds exactly `role`.
    pub fn has_role(ctx: &AuthContext, role: Role) -> bool {
        ctx.authenticated && ctx.role == role
    }

    /// The composite rule: admin, or owner of `target`.
    pub fn allows(ctx: &AuthContext, target: AccountId) -> bool {
        Self::has_role(ctx, Role::Admin) || Self::is_resource_owner(ctx, target)
    }

    /// Applies the composite rule, returning a typed failure on deny.
    pub fn authorize(ctx: &AuthContext, target: AccountId) -> CoreResult<AccessGrant> {
        if !ctx.authenticated {
            return Err(WardenError::Unauthenticated);
        }
        if Self::has_role(ctx, Role::Admin) {
            return Ok(AccessGrant::RoleBypass);
        }
        if Self::is_resource_owner(ctx, target) {
            return Ok(AccessGrant::Owner);
        }

        tracing::debug!(
            subject = %ctx.subject,
            target = %target,
            "Access denied by ownership check"
        );
        Err(WardenError::denied(ctx.subject.clone(), target))
    }

    /// Requires an exact role, independent of any target.
    pub fn require_role(ctx: &AuthContext, role: Role) -> CoreResult<()> {
        if !ctx.authenticated {
            return Err(WardenError::Unauthenticated);
        }
        if Self::has_role(ctx, role) {
            Ok(())
        } else {
            Err(WardenError::AuthorizationDenied {
                subject: ctx.subject.clone(),
                target: ctx.account_id.unwrap_or_default(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

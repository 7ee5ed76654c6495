//! Tenant identity and the cross-tenant access guard.
//!
//! Every entity in the CRM belongs to exactly one team, stamped at creation
//! and immutable afterwards. The original system enforced this with an
//! implicit query scope read from ambient authentication state; here the
//! current team travels as an explicit [`TenantContext`] parameter on every
//! port and service call, so a missing tenant check is a compile error
//! rather than a data leak.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a team (the tenant boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new random team identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a team identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request caller identity, established by the authentication layer and
/// passed explicitly into every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    team: TeamId,
    user: UserId,
}

impl TenantContext {
    /// Creates a context for the given team and acting user.
    #[must_use]
    pub const fn new(team: TeamId, user: UserId) -> Self {
        Self { team, user }
    }

    /// Returns the current team.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }
}

/// Implemented by every aggregate that carries a team stamp.
pub trait TenantScoped {
    /// Returns the owning team of this entity.
    fn team_id(&self) -> TeamId;
}

/// Error raised when an operation addresses an entity outside the caller's
/// team.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cross-tenant violation: caller team {caller} cannot access entity of team {entity}")]
pub struct CrossTenantViolation {
    /// Team of the calling context.
    pub caller: TeamId,
    /// Team stamped on the addressed entity.
    pub entity: TeamId,
}

/// Verifies that `entity` belongs to the caller's team.
///
/// # Errors
///
/// Returns [`CrossTenantViolation`] when the stamps differ. Callers treat
/// this as fatal to the operation; it is never silently corrected.
pub fn ensure_scope<E: TenantScoped>(
    ctx: &TenantContext,
    entity: &E,
) -> Result<(), CrossTenantViolation> {
    let entity_team = entity.team_id();
    if entity_team == ctx.team() {
        Ok(())
    } else {
        Err(CrossTenantViolation {
            caller: ctx.team(),
            entity: entity_team,
        })
    }
}

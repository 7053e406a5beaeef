//! Store contracts for externally-owned membership, role, and grant data.
//!
//! Persistence lives outside this engine: mutations are owned by the
//! external write path, the engine only reads. Implementations must be
//! non-blocking so many authorization checks can run concurrently.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Membership, Role, UnitGrant};

pub use memory::{InMemoryMembershipStore, InMemoryRoleStore, InMemoryUnitGrantStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// The authoritative membership row for (user, organization), if any.
    async fn find_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Exact-match, case-sensitive lookup by stable role code.
    async fn find_role_by_code(&self, code: &str) -> Result<Option<Role>, StoreError>;

    async fn find_role_by_id(&self, id: Uuid) -> Result<Option<Role>, StoreError>;

    /// All roles assigned to the user within the organization. Role
    /// assignment is external state; a user may hold several roles.
    async fn find_assigned_roles(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<Role>, StoreError>;
}

#[async_trait]
pub trait UnitGrantStore: Send + Sync {
    /// Every grant attached to the user-unit pair, expired or not. The
    /// resolver owns the activity predicate.
    async fn find_grants(&self, user_unit_id: Uuid) -> Result<Vec<UnitGrant>, StoreError>;
}

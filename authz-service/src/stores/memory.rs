//! In-memory store implementations backed by dashmap. Used by the test
//! suite and for embedding the engine without an external database.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Membership, Role, UnitGrant};

use super::{MembershipStore, RoleStore, StoreError, UnitGrantStore};

#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    rows: DashMap<(Uuid, Uuid), Membership>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the authoritative row for (user, organization).
    pub fn upsert(&self, membership: Membership) {
        self.rows.insert(
            (membership.user_id, membership.organization_id),
            membership,
        );
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn find_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self
            .rows
            .get(&(user_id, organization_id))
            .map(|row| row.value().clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    by_id: DashMap<Uuid, Role>,
    by_code: DashMap<String, Uuid>,
    assignments: DashMap<(Uuid, Uuid), Vec<Uuid>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_role(&self, role: Role) {
        self.by_code.insert(role.code.clone(), role.id);
        self.by_id.insert(role.id, role);
    }

    pub fn assign_role(&self, user_id: Uuid, organization_id: Uuid, role_id: Uuid) {
        self.assignments
            .entry((user_id, organization_id))
            .or_default()
            .push(role_id);
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn find_role_by_code(&self, code: &str) -> Result<Option<Role>, StoreError> {
        let Some(role_id) = self.by_code.get(code).map(|id| *id.value()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&role_id).map(|role| role.value().clone()))
    }

    async fn find_role_by_id(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        Ok(self.by_id.get(&id).map(|role| role.value().clone()))
    }

    async fn find_assigned_roles(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<Role>, StoreError> {
        let Some(role_ids) = self
            .assignments
            .get(&(user_id, organization_id))
            .map(|ids| ids.value().clone())
        else {
            return Ok(Vec::new());
        };

        Ok(role_ids
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|role| role.clone()))
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUnitGrantStore {
    grants: DashMap<Uuid, Vec<UnitGrant>>,
}

impl InMemoryUnitGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_grant(&self, grant: UnitGrant) {
        self.grants
            .entry(grant.user_unit_id)
            .or_default()
            .push(grant);
    }
}

#[async_trait]
impl UnitGrantStore for InMemoryUnitGrantStore {
    async fn find_grants(&self, user_unit_id: Uuid) -> Result<Vec<UnitGrant>, StoreError> {
        Ok(self
            .grants
            .get(&user_unit_id)
            .map(|grants| grants.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipStatus;
    use chrono::Utc;

    #[tokio::test]
    async fn test_membership_row_is_authoritative_per_pair() {
        let store = InMemoryMembershipStore::new();
        let user_id = Uuid::new_v4();
        let organization_id = Uuid::new_v4();

        store.upsert(Membership::new(
            user_id,
            organization_id,
            MembershipStatus::Pending,
            Utc::now(),
        ));
        store.upsert(Membership::new(
            user_id,
            organization_id,
            MembershipStatus::Active,
            Utc::now(),
        ));

        let membership = store
            .find_membership(user_id, organization_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn test_role_lookup_by_code_is_case_sensitive() {
        let store = InMemoryRoleStore::new();
        store.insert_role(Role::new("Tenant", "TENANT", "Resident tenant"));

        assert!(store.find_role_by_code("TENANT").await.unwrap().is_some());
        assert!(store.find_role_by_code("tenant").await.unwrap().is_none());
        assert!(store.find_role_by_code("Tenant").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assigned_roles_returns_all_assignments() {
        let store = InMemoryRoleStore::new();
        let user_id = Uuid::new_v4();
        let organization_id = Uuid::new_v4();

        let owner = Role::new("Owner", "OWNER", "Unit owner");
        let tenant = Role::new("Tenant", "TENANT", "Resident tenant");
        let owner_id = owner.id;
        let tenant_id = tenant.id;
        store.insert_role(owner);
        store.insert_role(tenant);
        store.assign_role(user_id, organization_id, owner_id);
        store.assign_role(user_id, organization_id, tenant_id);

        let roles = store
            .find_assigned_roles(user_id, organization_id)
            .await
            .unwrap();
        assert_eq!(roles.len(), 2);
    }
}

//! Role-module resolution - maps a user's assigned roles to the set of
//! capabilities (module routes) they unlock.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::Role;
use crate::stores::{RoleStore, StoreError};

#[derive(Clone)]
pub struct RoleModuleResolver {
    store: Arc<dyn RoleStore>,
}

impl RoleModuleResolver {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// Module routes a single role unlocks.
    pub fn capabilities_for(role: &Role) -> HashSet<String> {
        role.modules.iter().map(|m| m.route.clone()).collect()
    }

    /// Union of capabilities across every role assigned to the user in the
    /// organization.
    pub async fn assigned_capabilities(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<HashSet<String>, StoreError> {
        let roles = self
            .store
            .find_assigned_roles(user_id, organization_id)
            .await?;

        Ok(roles
            .iter()
            .flat_map(|role| role.modules.iter().map(|m| m.route.clone()))
            .collect())
    }

    /// Code of the first assigned role that unlocks the capability, for the
    /// decision audit trail.
    pub async fn role_matching(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        capability: &str,
    ) -> Result<Option<String>, StoreError> {
        let roles = self
            .store
            .find_assigned_roles(user_id, organization_id)
            .await?;

        Ok(roles
            .iter()
            .find(|role| role.unlocks(capability))
            .map(|role| role.code.clone()))
    }
}

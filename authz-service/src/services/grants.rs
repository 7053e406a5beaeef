//! Unit grant resolution - the only path to a capability not implied by
//! role. Grants are additive; nothing here revokes a role-derived
//! capability.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::UnitGrant;
use crate::stores::{StoreError, UnitGrantStore};

#[derive(Clone)]
pub struct UnitGrantResolver {
    store: Arc<dyn UnitGrantStore>,
}

impl UnitGrantResolver {
    pub fn new(store: Arc<dyn UnitGrantStore>) -> Self {
        Self { store }
    }

    /// Grants for the unit that are active at `now`: `expires_at` absent or
    /// strictly in the future.
    pub async fn active_grants(
        &self,
        user_unit_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnitGrant>, StoreError> {
        let grants = self.store.find_grants(user_unit_id).await?;
        Ok(grants
            .into_iter()
            .filter(|grant| grant.is_active(now))
            .collect())
    }

    /// Id of an active grant for the capability, if one exists.
    pub async fn grant_matching(
        &self,
        user_unit_id: Uuid,
        capability: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .active_grants(user_unit_id, now)
            .await?
            .into_iter()
            .find(|grant| grant.permission_code == capability)
            .map(|grant| grant.id))
    }
}

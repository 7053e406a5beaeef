//! Membership resolution - gates organization access before any permission
//! evaluation runs.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Membership, MembershipStatus};
use crate::stores::{MembershipStore, StoreError};

/// A user's standing within an organization, as seen by authorization.
///
/// Pending and Suspended are distinct so callers can surface distinct
/// messages; Left collapses into Absent but the row stays in the store for
/// audit history.
#[derive(Debug, Clone)]
pub enum MembershipStanding {
    Active(Membership),
    Pending,
    Suspended,
    Absent,
}

#[derive(Clone)]
pub struct MembershipResolver {
    store: Arc<dyn MembershipStore>,
}

impl MembershipResolver {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    pub async fn standing(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<MembershipStanding, StoreError> {
        let membership = self.store.find_membership(user_id, organization_id).await?;

        Ok(match membership {
            None => MembershipStanding::Absent,
            Some(m) => match m.status {
                MembershipStatus::Active => MembershipStanding::Active(m),
                MembershipStatus::Pending => MembershipStanding::Pending,
                MembershipStatus::Suspended => MembershipStanding::Suspended,
                MembershipStatus::Left => MembershipStanding::Absent,
            },
        })
    }
}

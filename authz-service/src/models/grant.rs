//! Unit grant model - time-bounded permissions scoped to a specific unit,
//! granted explicitly and independent of role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An explicit permission grant attached to a user-unit pair.
///
/// `permission_code` is the capability key the grant unlocks, denormalized
/// by the store join so the engine needs no permission-catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitGrant {
    pub id: Uuid,
    pub user_unit_id: Uuid,
    pub permission_id: Uuid,
    pub permission_code: String,
    /// Must have held authority to grant at `granted_at`; not re-verified.
    pub granted_by: Uuid,
    pub granted_at: DateTime<Utc>,
    /// Absent means indefinite validity.
    pub expires_at: Option<DateTime<Utc>>,
}

impl UnitGrant {
    /// Create an indefinite grant.
    pub fn new(
        user_unit_id: Uuid,
        permission_id: Uuid,
        permission_code: impl Into<String>,
        granted_by: Uuid,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_unit_id,
            permission_id,
            permission_code: permission_code.into(),
            granted_by,
            granted_at,
            expires_at: None,
        }
    }

    /// Create a grant that expires at a fixed instant.
    pub fn expiring(
        user_unit_id: Uuid,
        permission_id: Uuid,
        permission_code: impl Into<String>,
        granted_by: Uuid,
        granted_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let mut grant = Self::new(user_unit_id, permission_id, permission_code, granted_by, granted_at);
        grant.expires_at = Some(expires_at);
        grant
    }

    /// A grant is inactive once `now >= expires_at` (exclusive bound).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires| expires > now)
    }
}

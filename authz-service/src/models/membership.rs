//! Membership model - a user's standing within an organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership status within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Pending,
    Active,
    Suspended,
    Left,
}

/// Membership entity. One authoritative row per (user, organization) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    /// Set if and only if status is Left.
    pub left_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Create a membership in a non-departed state.
    pub fn new(
        user_id: Uuid,
        organization_id: Uuid,
        status: MembershipStatus,
        joined_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(status != MembershipStatus::Left, "use departed() for Left");
        Self {
            user_id,
            organization_id,
            status,
            joined_at,
            left_at: None,
        }
    }

    /// Create a departed membership, retained for audit history.
    pub fn departed(
        user_id: Uuid,
        organization_id: Uuid,
        joined_at: DateTime<Utc>,
        left_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(left_at >= joined_at);
        Self {
            user_id,
            organization_id,
            status: MembershipStatus::Left,
            joined_at,
            left_at: Some(left_at),
        }
    }

    /// Only active memberships permit any further permission evaluation.
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    pub fn has_left(&self) -> bool {
        self.status == MembershipStatus::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_membership() {
        let m = Membership::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MembershipStatus::Active,
            Utc::now(),
        );
        assert!(m.is_active());
        assert!(!m.has_left());
        assert!(m.left_at.is_none());
    }

    #[test]
    fn test_departed_membership_carries_left_at() {
        let joined = Utc::now();
        let left = joined + chrono::Duration::days(30);
        let m = Membership::departed(Uuid::new_v4(), Uuid::new_v4(), joined, left);
        assert!(m.has_left());
        assert!(!m.is_active());
        assert_eq!(m.left_at, Some(left));
    }

    #[test]
    fn test_suspended_membership_is_not_active() {
        let m = Membership::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MembershipStatus::Suspended,
            Utc::now(),
        );
        assert!(!m.is_active());
    }
}

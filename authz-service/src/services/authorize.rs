//! Authorization engine - combines token validation, membership gating, and
//! role/grant capability resolution into a single access decision.
//!
//! Denial is a first-class result value. Only signing-key misconfiguration
//! and unreachable stores surface as errors; everything else, including
//! resolution timeouts, is a decision with a machine-readable reason.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;
use uuid::Uuid;

use crate::services::error::ServiceError;
use crate::services::grants::UnitGrantResolver;
use crate::services::membership::{MembershipResolver, MembershipStanding};
use crate::services::roles::RoleModuleResolver;
use crate::services::token::{TokenError, TokenService, TokenType};

/// Machine-readable reason attached to every decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    RoleMatched,
    GrantMatched,
    AuthFailed(TokenError),
    MembershipAbsent,
    MembershipPending,
    MembershipSuspended,
    InsufficientPermission,
    ResolutionTimeout,
}

/// One authorization evaluation. Derived fresh per request, never persisted
/// or cached across membership/grant mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_grant: Option<Uuid>,
}

impl AccessDecision {
    pub fn allowed_by_role(role_code: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::RoleMatched,
            matched_role: Some(role_code.into()),
            matched_grant: None,
        }
    }

    pub fn allowed_by_grant(grant_id: Uuid) -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::GrantMatched,
            matched_role: None,
            matched_grant: Some(grant_id),
        }
    }

    pub fn denied(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
            matched_role: None,
            matched_grant: None,
        }
    }
}

pub struct AuthorizationEngine {
    tokens: TokenService,
    memberships: MembershipResolver,
    roles: RoleModuleResolver,
    grants: UnitGrantResolver,
    resolution_timeout: Duration,
}

impl AuthorizationEngine {
    pub fn new(
        tokens: TokenService,
        memberships: MembershipResolver,
        roles: RoleModuleResolver,
        grants: UnitGrantResolver,
        resolution_timeout: Duration,
    ) -> Self {
        Self {
            tokens,
            memberships,
            roles,
            grants,
            resolution_timeout,
        }
    }

    /// Decide whether the token's bearer may perform `required_capability`
    /// within the organization, optionally scoped to a unit.
    ///
    /// Role-based allowance is checked before grant-based allowance, but
    /// either is sufficient (permissive-OR). Store resolution is bounded by
    /// the configured timeout; on timeout the decision is a denial, never an
    /// allow.
    pub async fn authorize(
        &self,
        token: &str,
        organization_id: Uuid,
        required_capability: &str,
        unit_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<AccessDecision, ServiceError> {
        let (_, decision) = self
            .authorize_identified(token, organization_id, required_capability, unit_id, now)
            .await?;
        Ok(decision)
    }

    /// Like [`authorize`](Self::authorize), additionally returning the
    /// authenticated caller. `None` only when authentication itself failed,
    /// so consumers that need the caller's identity validate the token once.
    pub async fn authorize_identified(
        &self,
        token: &str,
        organization_id: Uuid,
        required_capability: &str,
        unit_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(Option<Uuid>, AccessDecision), ServiceError> {
        // 1. Authenticate. Refresh tokens never authorize a request.
        let identity = match self.tokens.validate_typed(token, TokenType::Access, now) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                return Ok((None, AccessDecision::denied(DecisionReason::AuthFailed(e))));
            }
        };
        let caller = Some(identity.user_id);

        // 2. Membership gates everything else.
        let standing = match timeout(
            self.resolution_timeout,
            self.memberships.standing(identity.user_id, organization_id),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Ok((caller, self.timed_out(identity.user_id, "membership"))),
        };

        match standing {
            MembershipStanding::Active(_) => {}
            MembershipStanding::Pending => {
                return Ok((
                    caller,
                    self.membership_denied(identity.user_id, DecisionReason::MembershipPending),
                ));
            }
            MembershipStanding::Suspended => {
                return Ok((
                    caller,
                    self.membership_denied(identity.user_id, DecisionReason::MembershipSuspended),
                ));
            }
            MembershipStanding::Absent => {
                return Ok((
                    caller,
                    self.membership_denied(identity.user_id, DecisionReason::MembershipAbsent),
                ));
            }
        }

        // 3./4. Role and grant paths run concurrently; role wins the
        // tie-break when both match.
        let role_path = self
            .roles
            .role_matching(identity.user_id, organization_id, required_capability);
        let grant_path = async {
            match unit_id {
                Some(unit) => {
                    self.grants
                        .grant_matching(unit, required_capability, now)
                        .await
                }
                None => Ok(None),
            }
        };

        let (matched_role, matched_grant) = match timeout(
            self.resolution_timeout,
            futures::future::try_join(role_path, grant_path),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Ok((caller, self.timed_out(identity.user_id, "capabilities"))),
        };

        if let Some(role_code) = matched_role {
            return Ok((caller, AccessDecision::allowed_by_role(role_code)));
        }

        if let Some(grant_id) = matched_grant {
            return Ok((caller, AccessDecision::allowed_by_grant(grant_id)));
        }

        // 5. Nothing matched.
        tracing::warn!(
            user_id = %identity.user_id,
            required_capability = %required_capability,
            "permission denied: no role or grant matched"
        );
        Ok((
            caller,
            AccessDecision::denied(DecisionReason::InsufficientPermission),
        ))
    }

    fn membership_denied(&self, user_id: Uuid, reason: DecisionReason) -> AccessDecision {
        tracing::warn!(user_id = %user_id, reason = ?reason, "membership gate denied");
        AccessDecision::denied(reason)
    }

    fn timed_out(&self, user_id: Uuid, stage: &str) -> AccessDecision {
        tracing::warn!(
            user_id = %user_id,
            stage = %stage,
            timeout_ms = %self.resolution_timeout.as_millis(),
            "resolution timed out"
        );
        AccessDecision::denied(DecisionReason::ResolutionTimeout)
    }
}

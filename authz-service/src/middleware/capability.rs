//! Capability enforcement for entry points.
//!
//! Any decision consumer (HTTP handler, message consumer) calls
//! `require_capability` before performing the gated action. Denials map to
//! distinct client-visible error categories: 401 for authentication
//! failures, 403 for membership/permission denials, 503 for resolution
//! timeouts. Neither the signing secret nor internal grant identifiers ever
//! reach the client.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::services::authorize::{AccessDecision, DecisionReason};
use crate::services::AuthorizationEngine;

/// Context handed to a request that passed the capability check.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub decision: AccessDecision,
}

/// Check that the caller holds the required capability in the organization.
pub async fn require_capability(
    engine: &AuthorizationEngine,
    headers: &HeaderMap,
    organization_id: Uuid,
    required_capability: &str,
    unit_id: Option<Uuid>,
) -> Result<AuthContext, AppError> {
    let token = extract_bearer_token(headers)?;
    let now = Utc::now();

    let (caller, decision) = engine
        .authorize_identified(&token, organization_id, required_capability, unit_id, now)
        .await?;

    if !decision.allowed {
        return Err(deny_to_error(&decision.reason));
    }

    // An allowed decision implies the token validated, so the caller is set.
    let user_id = caller.ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!("allowed decision without an authenticated caller"))
    })?;

    Ok(AuthContext {
        user_id,
        organization_id,
        decision,
    })
}

fn deny_to_error(reason: &DecisionReason) -> AppError {
    match reason {
        DecisionReason::AuthFailed(e) => {
            AppError::AuthError(anyhow::anyhow!("unauthenticated: {}", e))
        }
        DecisionReason::MembershipAbsent => {
            AppError::Forbidden(anyhow::anyhow!("you do not belong to this organization"))
        }
        DecisionReason::MembershipPending => {
            AppError::Forbidden(anyhow::anyhow!("your membership is pending approval"))
        }
        DecisionReason::MembershipSuspended => {
            AppError::Forbidden(anyhow::anyhow!("your membership is suspended"))
        }
        DecisionReason::InsufficientPermission => {
            AppError::Forbidden(anyhow::anyhow!("insufficient permission"))
        }
        DecisionReason::ResolutionTimeout => AppError::ServiceUnavailable,
        DecisionReason::RoleMatched | DecisionReason::GrantMatched => {
            AppError::InternalError(anyhow::anyhow!("allowed decision treated as denial"))
        }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Missing authorization header")))?
        .to_str()
        .map_err(|_| AppError::AuthError(anyhow::anyhow!("Invalid authorization header encoding")))?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Invalid Bearer token format")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        let result = extract_bearer_token(&headers);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing authorization header"));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_extract_bearer_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer some.jwt.token"),
        );
        assert_eq!(extract_bearer_token(&headers).unwrap(), "some.jwt.token");
    }

    #[test]
    fn test_denial_reasons_map_to_distinct_categories() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let unauthenticated =
            deny_to_error(&DecisionReason::AuthFailed(crate::services::TokenError::Expired));
        assert_eq!(
            unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let forbidden = deny_to_error(&DecisionReason::MembershipSuspended);
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let unavailable = deny_to_error(&DecisionReason::ResolutionTimeout);
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

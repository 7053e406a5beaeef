//! Shared test fixture: an authorization engine wired against seeded
//! in-memory stores.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use authz_service::config::TokenConfig;
use authz_service::models::{Membership, MembershipStatus, Module, Role, UnitGrant};
use authz_service::services::{
    AuthorizationEngine, MembershipResolver, RoleModuleResolver, TokenService, TokenType,
    UnitGrantResolver,
};
use authz_service::stores::{InMemoryMembershipStore, InMemoryRoleStore, InMemoryUnitGrantStore};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "atlas-platform";

pub fn token_config() -> TokenConfig {
    TokenConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiration_ms: 3_600_000,
        refresh_token_expiration_ms: 86_400_000,
        issuer: TEST_ISSUER.to_string(),
    }
}

pub struct TestHarness {
    pub engine: AuthorizationEngine,
    pub tokens: TokenService,
    pub memberships: Arc<InMemoryMembershipStore>,
    pub roles: Arc<InMemoryRoleStore>,
    pub grants: Arc<InMemoryUnitGrantStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(2_000))
    }

    pub fn with_timeout(resolution_timeout: Duration) -> Self {
        let tokens = TokenService::new(&token_config()).unwrap();
        let memberships = Arc::new(InMemoryMembershipStore::new());
        let roles = Arc::new(InMemoryRoleStore::new());
        let grants = Arc::new(InMemoryUnitGrantStore::new());

        let engine = AuthorizationEngine::new(
            tokens.clone(),
            MembershipResolver::new(memberships.clone()),
            RoleModuleResolver::new(roles.clone()),
            UnitGrantResolver::new(grants.clone()),
            resolution_timeout,
        );

        Self {
            engine,
            tokens,
            memberships,
            roles,
            grants,
        }
    }

    pub fn access_token(&self, user_id: Uuid, now: DateTime<Utc>) -> String {
        self.tokens.issue(user_id, TokenType::Access, now).unwrap()
    }

    pub fn refresh_token(&self, user_id: Uuid, now: DateTime<Utc>) -> String {
        self.tokens.issue(user_id, TokenType::Refresh, now).unwrap()
    }

    pub fn seed_member(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        status: MembershipStatus,
        joined_at: DateTime<Utc>,
    ) {
        self.memberships
            .upsert(Membership::new(user_id, organization_id, status, joined_at));
    }

    pub fn seed_departed_member(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        joined_at: DateTime<Utc>,
        left_at: DateTime<Utc>,
    ) {
        self.memberships.upsert(Membership::departed(
            user_id,
            organization_id,
            joined_at,
            left_at,
        ));
    }

    /// Insert a role unlocking the given capability routes; returns its id.
    pub fn seed_role(&self, name: &str, code: &str, routes: &[&str]) -> Uuid {
        let modules = routes
            .iter()
            .map(|route| Module::new(format!("{} module", route), "", *route))
            .collect();
        let role = Role::new(name, code, "").with_modules(modules);
        let role_id = role.id;
        self.roles.insert_role(role);
        role_id
    }

    pub fn assign_role(&self, user_id: Uuid, organization_id: Uuid, role_id: Uuid) {
        self.roles.assign_role(user_id, organization_id, role_id);
    }

    /// Insert an indefinite grant; returns its id.
    pub fn seed_grant(&self, user_unit_id: Uuid, permission_code: &str, granted_at: DateTime<Utc>) -> Uuid {
        let grant = UnitGrant::new(
            user_unit_id,
            Uuid::new_v4(),
            permission_code,
            Uuid::new_v4(),
            granted_at,
        );
        let grant_id = grant.id;
        self.grants.insert_grant(grant);
        grant_id
    }

    /// Insert a grant with a fixed expiry; returns its id.
    pub fn seed_expiring_grant(
        &self,
        user_unit_id: Uuid,
        permission_code: &str,
        granted_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Uuid {
        let grant = UnitGrant::expiring(
            user_unit_id,
            Uuid::new_v4(),
            permission_code,
            Uuid::new_v4(),
            granted_at,
            expires_at,
        );
        let grant_id = grant.id;
        self.grants.insert_grant(grant);
        grant_id
    }
}

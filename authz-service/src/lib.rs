pub mod config;
pub mod middleware;
pub mod models;
pub mod services;
pub mod stores;

use std::sync::Arc;
use std::time::Duration;

use service_core::error::AppError;

use crate::config::AuthzConfig;
use crate::services::{
    AuthorizationEngine, MembershipResolver, RoleModuleResolver, TokenService, UnitGrantResolver,
};
use crate::stores::{MembershipStore, RoleStore, UnitGrantStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AuthzConfig,
    pub engine: Arc<AuthorizationEngine>,
}

impl AppState {
    /// Wire the engine from configuration and externally-owned stores.
    pub fn new(
        config: AuthzConfig,
        memberships: Arc<dyn MembershipStore>,
        roles: Arc<dyn RoleStore>,
        grants: Arc<dyn UnitGrantStore>,
    ) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.token).map_err(AppError::ConfigError)?;

        let engine = AuthorizationEngine::new(
            tokens,
            MembershipResolver::new(memberships),
            RoleModuleResolver::new(roles),
            UnitGrantResolver::new(grants),
            Duration::from_millis(config.resolver.resolution_timeout_ms),
        );

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}

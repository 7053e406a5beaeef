pub mod authorize;
pub mod error;
pub mod grants;
pub mod membership;
pub mod roles;
pub mod token;

pub use authorize::{AccessDecision, AuthorizationEngine, DecisionReason};
pub use error::ServiceError;
pub use grants::UnitGrantResolver;
pub use membership::{MembershipResolver, MembershipStanding};
pub use roles::RoleModuleResolver;
pub use token::{TokenError, TokenService, TokenType, ValidatedToken};

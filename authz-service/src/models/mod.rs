pub mod grant;
pub mod membership;
pub mod role;

pub use grant::UnitGrant;
pub use membership::{Membership, MembershipStatus};
pub use role::{Module, Role};

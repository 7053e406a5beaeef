pub mod capability;

pub use capability::{require_capability, AuthContext};

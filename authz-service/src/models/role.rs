//! Role and Module models - tenant-shared reference data mapping roles to
//! the functional capabilities they unlock.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named functional capability. The `route` is the capability key matched
/// against authorization requests (e.g. `posts.read`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub route: String,
}

impl Module {
    pub fn new(name: impl Into<String>, description: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            route: route.into(),
        }
    }
}

/// Role entity. `code` is the stable lookup identifier (e.g. `OWNER`,
/// `TENANT`); lookups are exact-match and case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
    /// Legacy single-module shortcut. Retained as data, never evaluated.
    pub module_code: Option<String>,
    /// System roles cannot be deleted or re-scoped by tenant administrators.
    /// They are still evaluated like any other role.
    pub is_system: bool,
    pub modules: Vec<Module>,
}

impl Role {
    pub fn new(name: impl Into<String>, code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            code: code.into(),
            description: description.into(),
            module_code: None,
            is_system: false,
            modules: Vec::new(),
        }
    }

    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// Whether this role's module set contains the capability.
    pub fn unlocks(&self, capability: &str) -> bool {
        self.modules.iter().any(|m| m.route == capability)
    }
}

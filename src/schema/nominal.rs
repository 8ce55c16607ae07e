//! Nominal types: named contracts made of mandatory and optional roles.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub is_mandatory: bool,
}

/// A nominal type. A TAR "is of" this type while every mandatory role is
/// implemented by one of its data elements.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    pub roles: BTreeMap<String, Role>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), roles: BTreeMap::new() }
    }

    pub fn with_role(mut self, name: impl Into<String>, is_mandatory: bool) -> Self {
        let name = name.into();
        self.roles.insert(name.clone(), Role { name, is_mandatory });
        self
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Unknown roles are treated as optional.
    pub fn is_mandatory(&self, role: &str) -> bool {
        self.roles.get(role).map_or(false, |r| r.is_mandatory)
    }
}

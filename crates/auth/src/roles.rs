use serde::{Deserialize, Serialize};

use portal_core::{Entity, Record, RoleId};

use crate::Permission;

/// Role: a named bundle of permissions.
///
/// `level` is stored for display and ordering only; no permission check
/// consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<Permission>,
    pub level: u32,
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const RESEARCHER: &'static str = "researcher";
    pub const READER: &'static str = "reader";

    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        permissions: Vec<Permission>,
        level: u32,
    ) -> Self {
        Self {
            id: RoleId::new(id),
            name: name.into(),
            permissions,
            level,
        }
    }

    /// Whether this role carries the `"all"` sentinel.
    pub fn has_all(&self) -> bool {
        self.permissions.iter().any(Permission::is_all)
    }

    /// Exact-match permission check with the `"all"` short-circuit.
    pub fn grants(&self, required: &Permission) -> bool {
        self.has_all() || self.permissions.iter().any(|p| p == required)
    }

    /// Roles seeded into an empty store.
    pub fn defaults() -> Vec<Role> {
        vec![
            Role::new(Self::ADMIN, "Administrator", vec![Permission::ALL], 10),
            Role::new(
                Self::RESEARCHER,
                "Researcher",
                vec![
                    Permission::READ_ALL,
                    Permission::CREATE_POST,
                    Permission::EDIT_POST,
                    Permission::CREATE_OBJECT,
                    Permission::EDIT_OBJECT,
                ],
                5,
            ),
            Role::new(Self::READER, "Reader", vec![Permission::READ_PUBLIC], 1),
        ]
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Role {
    const COLLECTION: &'static str = "roles";
}

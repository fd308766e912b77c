//! Process-wide role catalog.
//!
//! The catalog materializes every role's privilege set and an id index once,
//! then hands out shared references only. There is no mutator, so concurrent
//! readers need no synchronization after the first access.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::privileges::{Hierarchy, OrganizationPrivilege, PlatformPrivilege, Privilege, PrivilegeSet};
use crate::roles::{OrganizationRole, Role, UserRole};

/// Privilege sets and id index for one role hierarchy.
#[derive(Debug)]
pub struct RoleTable<R: Role> {
    privileges: Box<[PrivilegeSet<R::Privilege>]>,
    by_id: HashMap<i32, R>,
}

impl<R: Role> RoleTable<R> {
    fn build() -> Self {
        let privileges = R::ALL
            .iter()
            .map(|role| PrivilegeSet::from(role.privileges()))
            .collect();

        let by_id = R::ALL.iter().map(|role| (role.id(), *role)).collect();

        Self { privileges, by_id }
    }

    pub fn privileges_of(&self, role: R) -> &PrivilegeSet<R::Privilege> {
        &self.privileges[role.ordinal()]
    }

    pub fn role_from_id(&self, id: i32) -> Option<R> {
        self.by_id.get(&id).copied()
    }

    fn definitions(&self) -> Vec<RoleDefinition> {
        R::ALL
            .iter()
            .map(|role| RoleDefinition {
                id: role.id(),
                name: role.name().to_string(),
                hierarchy: R::HIERARCHY,
                description: role.description().to_string(),
                privileges: self.privileges_of(*role).codes(),
            })
            .collect()
    }
}

/// Roles that have a table in the [`RoleCatalog`].
pub trait Catalogued: Role {
    fn table(catalog: &RoleCatalog) -> &RoleTable<Self>;
}

impl Catalogued for UserRole {
    fn table(catalog: &RoleCatalog) -> &RoleTable<Self> {
        &catalog.platform
    }
}

impl Catalogued for OrganizationRole {
    fn table(catalog: &RoleCatalog) -> &RoleTable<Self> {
        &catalog.organization
    }
}

/// Immutable mapping from every role to its privileges, for both hierarchies.
#[derive(Debug)]
pub struct RoleCatalog {
    platform: RoleTable<UserRole>,
    organization: RoleTable<OrganizationRole>,
}

static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();

impl RoleCatalog {
    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static RoleCatalog {
        CATALOG.get_or_init(|| {
            let catalog = RoleCatalog::build();
            tracing::debug!(
                platform_roles = UserRole::ALL.len(),
                organization_roles = OrganizationRole::ALL.len(),
                "role catalog initialized"
            );
            catalog
        })
    }

    fn build() -> Self {
        Self {
            platform: RoleTable::build(),
            organization: RoleTable::build(),
        }
    }

    /// Privileges granted by `role`. Total over both hierarchies.
    pub fn privileges_of<R: Catalogued>(&self, role: R) -> &PrivilegeSet<R::Privilege> {
        R::table(self).privileges_of(role)
    }

    /// Look up a role by its stable id; `None` for ids that are not defined.
    pub fn role_from_id<R: Catalogued>(&self, id: i32) -> Option<R> {
        R::table(self).role_from_id(id)
    }

    pub fn user_role_from_id(&self, id: i32) -> Option<UserRole> {
        self.role_from_id(id)
    }

    pub fn organization_role_from_id(&self, id: i32) -> Option<OrganizationRole> {
        self.role_from_id(id)
    }

    /// Full description of both hierarchies, for audit and display.
    pub fn registry(&self) -> RoleRegistry {
        let mut privileges = privilege_definitions::<PlatformPrivilege>();
        privileges.extend(privilege_definitions::<OrganizationPrivilege>());

        RoleRegistry {
            platform_roles: self.platform.definitions(),
            organization_roles: self.organization.definitions(),
            privileges,
        }
    }
}

/// Role definition with its granted privileges (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub id: i32,
    pub name: String,
    pub hierarchy: Hierarchy,
    pub description: String,
    pub privileges: Vec<String>,
}

/// Privilege definition (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivilegeDefinition {
    pub code: String,
    pub hierarchy: Hierarchy,
    pub description: String,
}

/// Serializable snapshot of the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRegistry {
    pub platform_roles: Vec<RoleDefinition>,
    pub organization_roles: Vec<RoleDefinition>,
    pub privileges: Vec<PrivilegeDefinition>,
}

fn privilege_definitions<P: Privilege>() -> Vec<PrivilegeDefinition> {
    P::ALL
        .iter()
        .map(|p| PrivilegeDefinition {
            code: p.code().to_string(),
            hierarchy: P::HIERARCHY,
            description: p.description().to_string(),
        })
        .collect()
}

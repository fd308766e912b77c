//! `crowdfund-auth` — role/privilege authorization model (pure, no IO).
//!
//! Two independent hierarchies: platform roles ([`UserRole`]) and
//! organization-membership roles ([`OrganizationRole`]). Each role maps to a
//! fixed, ordered privilege set; a request is allowed iff the required
//! privilege is a member of the caller's set.

pub mod authorize;
pub mod catalog;
pub mod principal;
pub mod privileges;
pub mod roles;

pub use authorize::{
    AuthorizationChecker, AuthorizationExplanation, AuthzError, DenialKind, DenialReason,
    authorize_organization, authorize_platform, is_authorized,
};
pub use catalog::{Catalogued, PrivilegeDefinition, RoleCatalog, RoleDefinition, RoleRegistry};
pub use principal::{Grant, OrganizationMembership, Principal};
pub use privileges::{
    Hierarchy, OrganizationPrivilege, PlatformPrivilege, Privilege, PrivilegeSet, UnknownPrivilege,
};
pub use roles::{OrganizationRole, Role, UnknownRole, UserRole};

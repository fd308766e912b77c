use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crowdfund_core::{OrganizationId, UserId};

use crate::privileges::PrivilegeSet;
use crate::roles::{OrganizationRole, Role, UserRole};

/// What an authentication layer hands over for one hierarchy: either a
/// resolved role, or an already computed privilege set (service tokens, tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(bound(
    serialize = "R: Serialize, R::Privilege: Serialize",
    deserialize = "R: Deserialize<'de>, R::Privilege: Deserialize<'de>"
))]
pub enum Grant<R: Role> {
    Role(R),
    Privileges(PrivilegeSet<R::Privilege>),
}

impl<R: Role> Grant<R> {
    pub fn role(&self) -> Option<R> {
        match self {
            Grant::Role(role) => Some(*role),
            Grant::Privileges(_) => None,
        }
    }
}

impl<R: Role> From<R> for Grant<R> {
    fn from(role: R) -> Self {
        Grant::Role(role)
    }
}

/// A principal's membership in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub organization_id: OrganizationId,
    pub grant: Grant<OrganizationRole>,
}

/// An authenticated caller, as seen by authorization checks.
///
/// Produced per request by the authentication layer and only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub platform: Grant<UserRole>,
    #[serde(default, deserialize_with = "unique_memberships")]
    pub memberships: Vec<OrganizationMembership>,
}

/// At most one membership per organization; a duplicate would make the
/// decision depend on array order.
fn unique_memberships<'de, D>(deserializer: D) -> Result<Vec<OrganizationMembership>, D::Error>
where
    D: Deserializer<'de>,
{
    let memberships = Vec::<OrganizationMembership>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    for m in &memberships {
        if !seen.insert(m.organization_id) {
            return Err(serde::de::Error::custom(format!(
                "duplicate membership for organization {}",
                m.organization_id
            )));
        }
    }
    Ok(memberships)
}

impl Principal {
    pub fn new(user_id: UserId, platform: impl Into<Grant<UserRole>>) -> Self {
        Self {
            user_id,
            platform: platform.into(),
            memberships: Vec::new(),
        }
    }

    /// Add (or replace) the membership for `organization_id`.
    pub fn with_membership(
        mut self,
        organization_id: OrganizationId,
        grant: impl Into<Grant<OrganizationRole>>,
    ) -> Self {
        let grant = grant.into();
        match self
            .memberships
            .iter_mut()
            .find(|m| m.organization_id == organization_id)
        {
            Some(existing) => existing.grant = grant,
            None => self.memberships.push(OrganizationMembership { organization_id, grant }),
        }
        self
    }

    pub fn membership(&self, organization_id: OrganizationId) -> Option<&OrganizationMembership> {
        self.memberships
            .iter()
            .find(|m| m.organization_id == organization_id)
    }
}

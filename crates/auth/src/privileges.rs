use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The two independent authorization hierarchies.
///
/// A user holds one platform role and, per organization, one organization
/// role. Privileges of one hierarchy never grant anything in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hierarchy {
    Platform,
    Organization,
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hierarchy::Platform => f.write_str("platform"),
            Hierarchy::Organization => f.write_str("organization"),
        }
    }
}

/// A single permitted action within one hierarchy.
///
/// Privileges are closed enumerations; `ALL` lists every variant in
/// declaration order and `code` is the stable wire name.
pub trait Privilege:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const HIERARCHY: Hierarchy;
    const ALL: &'static [Self];

    fn code(self) -> &'static str;

    fn description(self) -> &'static str;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {hierarchy} privilege '{value}'")]
pub struct UnknownPrivilege {
    pub hierarchy: Hierarchy,
    pub value: String,
}

fn parse_code<P: Privilege>(s: &str) -> Result<P, UnknownPrivilege> {
    let needle = s.trim();
    P::ALL
        .iter()
        .copied()
        .find(|p| p.code().eq_ignore_ascii_case(needle))
        .ok_or_else(|| UnknownPrivilege {
            hierarchy: P::HIERARCHY,
            value: s.to_string(),
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform privileges
// ─────────────────────────────────────────────────────────────────────────────

/// Platform-wide privileges.
///
/// Naming: `PR`/`PW` read/write, then `A` (all records) or `O` (own records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformPrivilege {
    Monitoring,
    PraProfile,
    PwaProfile,
    ProProfile,
    PwoProfile,
    PraOrg,
    PwaOrgApprove,
    ProOrgInvite,
    PwoOrgInvite,
    PraProject,
    PwaProjectApprove,
    PraWallet,
    PwaWallet,
    PraDeposit,
    PwaDeposit,
    PraWithdraw,
    PwaWithdraw,
}

impl Privilege for PlatformPrivilege {
    const HIERARCHY: Hierarchy = Hierarchy::Platform;
    const ALL: &'static [Self] = &[
        Self::Monitoring,
        Self::PraProfile,
        Self::PwaProfile,
        Self::ProProfile,
        Self::PwoProfile,
        Self::PraOrg,
        Self::PwaOrgApprove,
        Self::ProOrgInvite,
        Self::PwoOrgInvite,
        Self::PraProject,
        Self::PwaProjectApprove,
        Self::PraWallet,
        Self::PwaWallet,
        Self::PraDeposit,
        Self::PwaDeposit,
        Self::PraWithdraw,
        Self::PwaWithdraw,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Monitoring => "MONITORING",
            Self::PraProfile => "PRA_PROFILE",
            Self::PwaProfile => "PWA_PROFILE",
            Self::ProProfile => "PRO_PROFILE",
            Self::PwoProfile => "PWO_PROFILE",
            Self::PraOrg => "PRA_ORG",
            Self::PwaOrgApprove => "PWA_ORG_APPROVE",
            Self::ProOrgInvite => "PRO_ORG_INVITE",
            Self::PwoOrgInvite => "PWO_ORG_INVITE",
            Self::PraProject => "PRA_PROJECT",
            Self::PwaProjectApprove => "PWA_PROJECT_APPROVE",
            Self::PraWallet => "PRA_WALLET",
            Self::PwaWallet => "PWA_WALLET",
            Self::PraDeposit => "PRA_DEPOSIT",
            Self::PwaDeposit => "PWA_DEPOSIT",
            Self::PraWithdraw => "PRA_WITHDRAW",
            Self::PwaWithdraw => "PWA_WITHDRAW",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Monitoring => "Access service health and metrics endpoints",
            Self::PraProfile => "Read any user profile",
            Self::PwaProfile => "Modify any user profile",
            Self::ProProfile => "Read own profile",
            Self::PwoProfile => "Modify own profile",
            Self::PraOrg => "Read any organization",
            Self::PwaOrgApprove => "Approve organizations",
            Self::ProOrgInvite => "Read own organization invites",
            Self::PwoOrgInvite => "Accept or decline own organization invites",
            Self::PraProject => "Read any project",
            Self::PwaProjectApprove => "Approve projects",
            Self::PraWallet => "Read any wallet",
            Self::PwaWallet => "Activate wallets",
            Self::PraDeposit => "Read any deposit",
            Self::PwaDeposit => "Approve deposits",
            Self::PraWithdraw => "Read any withdrawal",
            Self::PwaWithdraw => "Approve withdrawals",
        }
    }
}

impl fmt::Display for PlatformPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PlatformPrivilege {
    type Err = UnknownPrivilege;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Organization privileges
// ─────────────────────────────────────────────────────────────────────────────

/// Privileges granted by an organization membership, scoped to that organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationPrivilege {
    PrUsers,
    PwUsers,
    PwOrg,
    PwProject,
    PwMembers,
}

impl Privilege for OrganizationPrivilege {
    const HIERARCHY: Hierarchy = Hierarchy::Organization;
    const ALL: &'static [Self] = &[
        Self::PrUsers,
        Self::PwUsers,
        Self::PwOrg,
        Self::PwProject,
        Self::PwMembers,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::PrUsers => "PR_USERS",
            Self::PwUsers => "PW_USERS",
            Self::PwOrg => "PW_ORG",
            Self::PwProject => "PW_PROJECT",
            Self::PwMembers => "PW_MEMBERS",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::PrUsers => "List organization members",
            Self::PwUsers => "Invite users to the organization",
            Self::PwOrg => "Modify organization details",
            Self::PwProject => "Create and manage organization projects",
            Self::PwMembers => "Remove members or change their roles",
        }
    }
}

impl fmt::Display for OrganizationPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrganizationPrivilege {
    type Err = UnknownPrivilege;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Privilege set
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered, duplicate-free set of privileges from one hierarchy.
///
/// Insertion order is kept (first occurrence wins) so role definitions read
/// back in the order they were declared. Sets are tiny, so membership is a
/// linear scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrivilegeSet<P>(Vec<P>);

impl<P: Privilege> PrivilegeSet<P> {
    /// The set that authorizes nothing.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, privilege: P) -> bool {
        self.0.contains(&privilege)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.0
    }

    /// Stable codes, in set order.
    pub fn codes(&self) -> Vec<String> {
        self.iter().map(|p| p.code().to_string()).collect()
    }
}

impl<P: Privilege> Default for PrivilegeSet<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: Privilege> FromIterator<P> for PrivilegeSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut out: Vec<P> = Vec::new();
        for p in iter {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Self(out)
    }
}

impl<P: Privilege> From<&[P]> for PrivilegeSet<P> {
    fn from(value: &[P]) -> Self {
        value.iter().copied().collect()
    }
}

impl<'de, P> Deserialize<'de> for PrivilegeSet<P>
where
    P: Privilege + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<P>::deserialize(deserializer).map(Self::from_iter)
    }
}

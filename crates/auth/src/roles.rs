use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::privileges::{Hierarchy, OrganizationPrivilege, PlatformPrivilege, Privilege};

/// A statically enumerated role within one hierarchy.
///
/// `id` is the stable storage/wire representation; `name` is for display and
/// may change without breaking persisted references. `privileges` is the
/// role's definition and is total by exhaustive match.
pub trait Role: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    type Privilege: Privilege;

    const HIERARCHY: Hierarchy;

    /// Every variant, in declaration order (`ALL[r.ordinal()] == r`).
    const ALL: &'static [Self];

    fn id(self) -> i32;

    fn name(self) -> &'static str;

    fn description(self) -> &'static str;

    fn ordinal(self) -> usize;

    fn privileges(self) -> &'static [Self::Privilege];
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {hierarchy} role '{value}'")]
pub struct UnknownRole {
    pub hierarchy: Hierarchy,
    pub value: String,
}

fn parse_name<R: Role>(s: &str) -> Result<R, UnknownRole> {
    let needle = s.trim();
    R::ALL
        .iter()
        .copied()
        .find(|r| r.name().eq_ignore_ascii_case(needle))
        .ok_or_else(|| UnknownRole {
            hierarchy: R::HIERARCHY,
            value: s.to_string(),
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform roles
// ─────────────────────────────────────────────────────────────────────────────

/// Platform-wide role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
    TokenIssuer,
    PlatformManager,
}

impl Role for UserRole {
    type Privilege = PlatformPrivilege;

    const HIERARCHY: Hierarchy = Hierarchy::Platform;
    const ALL: &'static [Self] = &[
        Self::Admin,
        Self::User,
        Self::TokenIssuer,
        Self::PlatformManager,
    ];

    fn id(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::User => 2,
            Self::TokenIssuer => 3,
            Self::PlatformManager => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::TokenIssuer => "TOKEN_ISSUER",
            Self::PlatformManager => "PLATFORM_MANAGER",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Admin => "Platform administrator with every platform privilege",
            Self::User => "Registered user managing their own profile and invites",
            Self::TokenIssuer => "Operator approving deposits and withdrawals",
            Self::PlatformManager => "Operator approving organizations, projects and wallets",
        }
    }

    fn ordinal(self) -> usize {
        self as usize
    }

    fn privileges(self) -> &'static [PlatformPrivilege] {
        use PlatformPrivilege as P;

        match self {
            Self::Admin => P::ALL,
            Self::User => &[P::ProProfile, P::PwoProfile, P::ProOrgInvite, P::PwoOrgInvite],
            Self::TokenIssuer => &[
                P::ProProfile,
                P::PwoProfile,
                P::PraWallet,
                P::PraDeposit,
                P::PwaDeposit,
                P::PraWithdraw,
                P::PwaWithdraw,
            ],
            Self::PlatformManager => &[
                P::ProProfile,
                P::PwoProfile,
                P::PraProfile,
                P::PraOrg,
                P::PwaOrgApprove,
                P::PraProject,
                P::PwaProjectApprove,
                P::PraWallet,
                P::PwaWallet,
            ],
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Organization roles
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a user inside one organization.
///
/// Ids live in their own namespace: `OrganizationRole` id 1 and `UserRole`
/// id 1 are unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationRole {
    OrgAdmin,
    OrgMember,
}

impl Role for OrganizationRole {
    type Privilege = OrganizationPrivilege;

    const HIERARCHY: Hierarchy = Hierarchy::Organization;
    const ALL: &'static [Self] = &[Self::OrgAdmin, Self::OrgMember];

    fn id(self) -> i32 {
        match self {
            Self::OrgAdmin => 1,
            Self::OrgMember => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::OrgAdmin => "ORG_ADMIN",
            Self::OrgMember => "ORG_MEMBER",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::OrgAdmin => "Manages the organization, its members and projects",
            Self::OrgMember => "Sees the organization's member list",
        }
    }

    fn ordinal(self) -> usize {
        self as usize
    }

    fn privileges(self) -> &'static [OrganizationPrivilege] {
        use OrganizationPrivilege as P;

        match self {
            Self::OrgAdmin => &[P::PrUsers, P::PwUsers, P::PwOrg, P::PwProject, P::PwMembers],
            Self::OrgMember => &[P::PrUsers],
        }
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrganizationRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

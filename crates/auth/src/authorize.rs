use serde::Serialize;
use thiserror::Error;

use crowdfund_core::OrganizationId;

use crate::catalog::{Catalogued, RoleCatalog};
use crate::privileges::{
    Hierarchy, OrganizationPrivilege, PlatformPrivilege, Privilege, PrivilegeSet,
};
use crate::principal::{Grant, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not a member of organization {0}")]
    NotMember(OrganizationId),

    #[error("forbidden: missing privilege '{0}'")]
    Forbidden(String),
}

/// Pure membership check: `required` is granted iff it is in `granted`.
///
/// No privilege implies another and there are no wildcards.
pub fn is_authorized<P: Privilege>(granted: &PrivilegeSet<P>, required: P) -> bool {
    granted.contains(required)
}

/// Authorization decisions against a [`RoleCatalog`].
///
/// - No IO
/// - No panics
/// - Denials are values, never errors, at the `is_*` level
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationChecker<'c> {
    catalog: &'c RoleCatalog,
}

impl AuthorizationChecker<'static> {
    /// Checker over the process-wide catalog.
    pub fn global() -> Self {
        Self::new(RoleCatalog::global())
    }
}

impl<'c> AuthorizationChecker<'c> {
    pub fn new(catalog: &'c RoleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c RoleCatalog {
        self.catalog
    }

    pub fn is_authorized<P: Privilege>(&self, granted: &PrivilegeSet<P>, required: P) -> bool {
        is_authorized(granted, required)
    }

    pub fn is_role_authorized<R: Catalogued>(&self, role: R, required: R::Privilege) -> bool {
        is_authorized(self.catalog.privileges_of(role), required)
    }

    /// Check by stable role id. An unknown id carries no privileges, so the
    /// check fails closed.
    pub fn is_role_id_authorized<R: Catalogued>(&self, role_id: i32, required: R::Privilege) -> bool {
        match self.catalog.role_from_id::<R>(role_id) {
            Some(role) => self.is_role_authorized(role, required),
            None => {
                let hierarchy = R::HIERARCHY;
                tracing::warn!(
                    %hierarchy,
                    role_id,
                    privilege = %required,
                    "unknown role id, denying"
                );
                is_authorized(&PrivilegeSet::empty(), required)
            }
        }
    }

    /// Privileges a grant carries, resolving roles through the catalog.
    pub fn resolve<'a, R: Catalogued>(&'a self, grant: &'a Grant<R>) -> &'a PrivilegeSet<R::Privilege> {
        match grant {
            Grant::Role(role) => self.catalog.privileges_of(*role),
            Grant::Privileges(set) => set,
        }
    }

    /// Authorize a platform-level action.
    pub fn authorize_platform(
        &self,
        principal: &Principal,
        required: PlatformPrivilege,
    ) -> Result<(), AuthzError> {
        if is_authorized(self.resolve(&principal.platform), required) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %principal.user_id,
                privilege = %required,
                "platform authorization denied"
            );
            Err(AuthzError::Forbidden(required.code().to_string()))
        }
    }

    /// Authorize an action scoped to one organization.
    ///
    /// Platform privileges never count here; only the membership in
    /// `organization_id` does.
    pub fn authorize_organization(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        required: OrganizationPrivilege,
    ) -> Result<(), AuthzError> {
        let Some(membership) = principal.membership(organization_id) else {
            tracing::debug!(
                user_id = %principal.user_id,
                %organization_id,
                privilege = %required,
                "organization authorization denied: not a member"
            );
            return Err(AuthzError::NotMember(organization_id));
        };

        if is_authorized(self.resolve(&membership.grant), required) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %principal.user_id,
                %organization_id,
                privilege = %required,
                "organization authorization denied"
            );
            Err(AuthzError::Forbidden(required.code().to_string()))
        }
    }

    pub fn explain_platform(
        &self,
        principal: &Principal,
        required: PlatformPrivilege,
    ) -> AuthorizationExplanation {
        self.explain_grant(&principal.platform, required)
    }

    pub fn explain_organization(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        required: OrganizationPrivilege,
    ) -> AuthorizationExplanation {
        match principal.membership(organization_id) {
            Some(membership) => self.explain_grant(&membership.grant, required),
            None => AuthorizationExplanation {
                required_privilege: required.code().to_string(),
                hierarchy: Hierarchy::Organization,
                granted: false,
                reason: format!("Principal is not a member of organization {organization_id}"),
                role: None,
                effective_privileges: Vec::new(),
                denial_reason: Some(DenialReason {
                    kind: DenialKind::NotMember,
                    message: format!("No membership in organization {organization_id}"),
                    suggestions: vec![format!(
                        "Invite the user to organization {organization_id} with a role granting '{required}'"
                    )],
                }),
            },
        }
    }

    /// Explain a decision for one grant (role or explicit privilege set).
    pub fn explain_grant<R: Catalogued>(
        &self,
        grant: &Grant<R>,
        required: R::Privilege,
    ) -> AuthorizationExplanation {
        let effective = self.resolve(grant);
        let granted = is_authorized(effective, required);
        let role = grant.role().map(|r| r.name().to_string());

        let holder = match &role {
            Some(name) => format!("Role '{name}'"),
            None => "Explicit privilege set".to_string(),
        };

        if granted {
            return AuthorizationExplanation {
                required_privilege: required.code().to_string(),
                hierarchy: R::HIERARCHY,
                granted: true,
                reason: format!("{holder} grants '{required}'"),
                role,
                effective_privileges: effective.codes(),
                denial_reason: None,
            };
        }

        let granting_roles: Vec<&str> = R::ALL
            .iter()
            .filter(|r| self.catalog.privileges_of(**r).contains(required))
            .map(|r| r.name())
            .collect();

        let mut suggestions = vec![format!(
            "Assign one of the {} roles granting '{required}': {granting_roles:?}",
            R::HIERARCHY
        )];
        if role.is_none() {
            suggestions.push(format!("Add '{required}' to the explicit privilege set"));
        }

        AuthorizationExplanation {
            required_privilege: required.code().to_string(),
            hierarchy: R::HIERARCHY,
            granted: false,
            reason: format!("{holder} does not grant '{required}'"),
            role,
            effective_privileges: effective.codes(),
            denial_reason: Some(DenialReason {
                kind: DenialKind::MissingPrivilege,
                message: format!("Missing required privilege: '{required}'"),
                suggestions,
            }),
        }
    }
}

/// Check a platform action against the process-wide catalog.
pub fn authorize_platform(principal: &Principal, required: PlatformPrivilege) -> Result<(), AuthzError> {
    AuthorizationChecker::global().authorize_platform(principal, required)
}

/// Check an organization-scoped action against the process-wide catalog.
pub fn authorize_organization(
    principal: &Principal,
    organization_id: OrganizationId,
    required: OrganizationPrivilege,
) -> Result<(), AuthzError> {
    AuthorizationChecker::global().authorize_organization(principal, organization_id, required)
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_privilege: String,
    pub hierarchy: Hierarchy,
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Role the decision was derived from, if the grant was a role.
    pub role: Option<String>,

    pub effective_privileges: Vec<String>,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NotMember,
    MissingPrivilege,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{OrganizationRole, Role, UserRole};
    use crowdfund_core::UserId;
    use proptest::prelude::*;

    fn checker() -> AuthorizationChecker<'static> {
        AuthorizationChecker::global()
    }

    fn org_member_set() -> PrivilegeSet<OrganizationPrivilege> {
        [OrganizationPrivilege::PrUsers].into_iter().collect()
    }

    #[test]
    fn member_equivalent_set_reads_users_but_cannot_write_org() {
        let granted = org_member_set();
        assert!(!is_authorized(&granted, OrganizationPrivilege::PwOrg));
        assert!(is_authorized(&granted, OrganizationPrivilege::PrUsers));

        assert!(!checker().is_role_authorized(OrganizationRole::OrgMember, OrganizationPrivilege::PwOrg));
        assert!(checker().is_role_authorized(OrganizationRole::OrgMember, OrganizationPrivilege::PrUsers));
    }

    #[test]
    fn unknown_role_id_fails_closed() {
        assert_eq!(checker().catalog().user_role_from_id(999), None);
        for p in PlatformPrivilege::ALL {
            assert!(!checker().is_role_id_authorized::<UserRole>(999, *p));
        }
        for p in OrganizationPrivilege::ALL {
            assert!(!checker().is_role_id_authorized::<OrganizationRole>(999, *p));
        }
    }

    #[test]
    fn known_role_id_uses_role_privileges() {
        assert!(checker().is_role_id_authorized::<UserRole>(1, PlatformPrivilege::PwaWithdraw));
        assert!(!checker().is_role_id_authorized::<UserRole>(2, PlatformPrivilege::PwaWithdraw));
        assert!(checker().is_role_id_authorized::<OrganizationRole>(1, OrganizationPrivilege::PwMembers));
    }

    #[test]
    fn platform_authorization_uses_platform_grant() {
        let principal = Principal::new(UserId::new(), UserRole::TokenIssuer);
        assert_eq!(checker().authorize_platform(&principal, PlatformPrivilege::PwaDeposit), Ok(()));
        assert_eq!(
            authorize_platform(&principal, PlatformPrivilege::PwaOrgApprove),
            Err(AuthzError::Forbidden("PWA_ORG_APPROVE".to_string()))
        );
    }

    #[test]
    fn explicit_privilege_set_is_used_as_is() {
        let set: PrivilegeSet<_> = [PlatformPrivilege::Monitoring].into_iter().collect();
        let principal = Principal::new(UserId::new(), Grant::Privileges(set));
        assert!(authorize_platform(&principal, PlatformPrivilege::Monitoring).is_ok());
        assert!(authorize_platform(&principal, PlatformPrivilege::ProProfile).is_err());
    }

    #[test]
    fn platform_admin_is_not_an_organization_admin() {
        let org = OrganizationId::new();
        let admin = Principal::new(UserId::new(), UserRole::Admin);
        assert_eq!(
            authorize_organization(&admin, org, OrganizationPrivilege::PrUsers),
            Err(AuthzError::NotMember(org))
        );
    }

    #[test]
    fn organization_grants_are_scoped_per_organization() {
        let owned = OrganizationId::new();
        let joined = OrganizationId::new();
        let principal = Principal::new(UserId::new(), UserRole::User)
            .with_membership(owned, OrganizationRole::OrgAdmin)
            .with_membership(joined, OrganizationRole::OrgMember);

        assert!(authorize_organization(&principal, owned, OrganizationPrivilege::PwOrg).is_ok());
        assert_eq!(
            authorize_organization(&principal, joined, OrganizationPrivilege::PwOrg),
            Err(AuthzError::Forbidden("PW_ORG".to_string()))
        );
        assert!(authorize_organization(&principal, joined, OrganizationPrivilege::PrUsers).is_ok());
    }

    #[test]
    fn explanation_for_denied_role_lists_granting_roles() {
        let principal = Principal::new(UserId::new(), UserRole::User);
        let explanation = checker().explain_platform(&principal, PlatformPrivilege::PwaWithdraw);

        assert!(!explanation.granted);
        assert_eq!(explanation.role.as_deref(), Some("USER"));
        assert_eq!(explanation.effective_privileges, vec![
            "PRO_PROFILE".to_string(),
            "PWO_PROFILE".to_string(),
            "PRO_ORG_INVITE".to_string(),
            "PWO_ORG_INVITE".to_string(),
        ]);

        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPrivilege);
        assert!(denial.suggestions[0].contains("ADMIN"));
        assert!(denial.suggestions[0].contains("TOKEN_ISSUER"));
        assert!(!denial.suggestions[0].contains("PLATFORM_MANAGER"));
    }

    #[test]
    fn explanation_for_non_member() {
        let principal = Principal::new(UserId::new(), UserRole::Admin);
        let explanation =
            checker().explain_organization(&principal, OrganizationId::new(), OrganizationPrivilege::PrUsers);

        assert!(!explanation.granted);
        assert_eq!(explanation.hierarchy, Hierarchy::Organization);
        assert!(explanation.effective_privileges.is_empty());
        assert_eq!(explanation.denial_reason.unwrap().kind, DenialKind::NotMember);
    }

    #[test]
    fn explanation_for_granted_explicit_set() {
        let org = OrganizationId::new();
        let principal =
            Principal::new(UserId::new(), UserRole::User).with_membership(org, Grant::Privileges(org_member_set()));
        let explanation = checker().explain_organization(&principal, org, OrganizationPrivilege::PrUsers);

        assert!(explanation.granted);
        assert_eq!(explanation.role, None);
        assert_eq!(explanation.reason, "Explicit privilege set grants 'PR_USERS'");
        assert!(explanation.denial_reason.is_none());
    }

    fn platform_privilege() -> impl Strategy<Value = PlatformPrivilege> {
        prop::sample::select(PlatformPrivilege::ALL)
    }

    fn user_role() -> impl Strategy<Value = UserRole> {
        prop::sample::select(UserRole::ALL)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the role path agrees with plain set membership.
        #[test]
        fn role_check_is_membership(role in user_role(), required in platform_privilege()) {
            let expected = role.privileges().contains(&required);
            prop_assert_eq!(checker().is_role_authorized(role, required), expected);
        }

        /// Property: an arbitrary set grants exactly its own members.
        #[test]
        fn set_check_is_membership(
            granted in prop::collection::vec(platform_privilege(), 0..8),
            required in platform_privilege(),
        ) {
            let set: PrivilegeSet<_> = granted.iter().copied().collect();
            prop_assert_eq!(is_authorized(&set, required), granted.contains(&required));
        }

        /// Property: ids outside the defined range never authorize.
        #[test]
        fn undefined_ids_never_authorize(id in any::<i32>(), required in platform_privilege()) {
            prop_assume!(!(1..=4).contains(&id));
            prop_assert!(!checker().is_role_id_authorized::<UserRole>(id, required));
        }
    }
}

use std::collections::HashSet;
use std::thread;

use crowdfund_auth::{
    AuthorizationChecker, Catalogued, OrganizationPrivilege, OrganizationRole, PlatformPrivilege,
    Privilege, PrivilegeSet, Role, RoleCatalog, UserRole, is_authorized,
};

fn assert_non_empty_and_stable<R: Catalogued>() {
    let catalog = RoleCatalog::global();
    for role in R::ALL {
        let first = catalog.privileges_of(*role).clone();
        assert!(!first.is_empty(), "{role} grants nothing");
        for _ in 0..3 {
            assert_eq!(catalog.privileges_of(*role), &first);
        }
    }
}

fn assert_role_check_is_membership<R: Catalogued>() {
    let checker = AuthorizationChecker::global();
    for role in R::ALL {
        let set = checker.catalog().privileges_of(*role);
        for p in <R::Privilege as Privilege>::ALL {
            assert_eq!(checker.is_role_authorized(*role, *p), set.contains(*p), "{role} / {p}");
        }
    }
}

fn assert_ids_round_trip<R: Catalogued>() {
    let catalog = RoleCatalog::global();
    let mut seen = HashSet::new();
    for role in R::ALL {
        assert!(seen.insert(role.id()), "duplicate id {} for {role}", role.id());
        assert_eq!(catalog.role_from_id::<R>(role.id()), Some(*role));
    }
}

#[test]
fn every_role_has_a_non_empty_deterministic_set() {
    assert_non_empty_and_stable::<UserRole>();
    assert_non_empty_and_stable::<OrganizationRole>();
}

#[test]
fn role_check_equals_membership_in_role_set() {
    assert_role_check_is_membership::<UserRole>();
    assert_role_check_is_membership::<OrganizationRole>();
}

#[test]
fn platform_and_organization_privilege_codes_are_disjoint() {
    let platform: HashSet<&str> = PlatformPrivilege::ALL.iter().map(|p| p.code()).collect();
    let organization: HashSet<&str> = OrganizationPrivilege::ALL.iter().map(|p| p.code()).collect();

    assert_eq!(platform.len(), PlatformPrivilege::ALL.len());
    assert_eq!(organization.len(), OrganizationPrivilege::ALL.len());
    assert!(platform.is_disjoint(&organization));
}

#[test]
fn role_ids_are_unique_and_round_trip() {
    assert_ids_round_trip::<UserRole>();
    assert_ids_round_trip::<OrganizationRole>();
}

#[test]
fn empty_set_authorizes_nothing() {
    let none = PrivilegeSet::<PlatformPrivilege>::empty();
    assert!(PlatformPrivilege::ALL.iter().all(|p| !is_authorized(&none, *p)));

    let none = PrivilegeSet::<OrganizationPrivilege>::empty();
    assert!(OrganizationPrivilege::ALL.iter().all(|p| !is_authorized(&none, *p)));
}

#[test]
fn org_member_reads_users_but_cannot_write_org() {
    let checker = AuthorizationChecker::global();
    assert_eq!(
        OrganizationRole::OrgMember.privileges(),
        &[OrganizationPrivilege::PrUsers]
    );
    assert!(!checker.is_role_authorized(OrganizationRole::OrgMember, OrganizationPrivilege::PwOrg));
    assert!(checker.is_role_authorized(OrganizationRole::OrgMember, OrganizationPrivilege::PrUsers));
}

#[test]
fn unrecognized_role_id_is_not_found_and_denied() {
    let checker = AuthorizationChecker::global();
    assert_eq!(checker.catalog().user_role_from_id(999), None);
    assert_eq!(checker.catalog().organization_role_from_id(999), None);

    for p in PlatformPrivilege::ALL {
        assert!(!checker.is_role_id_authorized::<UserRole>(999, *p));
    }
    for p in OrganizationPrivilege::ALL {
        assert!(!checker.is_role_id_authorized::<OrganizationRole>(999, *p));
    }
}

#[test]
fn concurrent_readers_see_the_same_catalog() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                let catalog = RoleCatalog::global();
                let checker = AuthorizationChecker::new(catalog);
                let allowed = UserRole::ALL
                    .iter()
                    .filter(|r| checker.is_role_authorized(**r, PlatformPrivilege::PwaWithdraw))
                    .count();
                (catalog as *const RoleCatalog as usize, allowed)
            })
        })
        .collect();

    let results: Vec<(usize, usize)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let (first_ptr, first_allowed) = results[0];
    assert_eq!(first_allowed, 2);
    assert!(results.iter().all(|r| *r == (first_ptr, first_allowed)));
}

//! Properties of the location-scoped authorization model, checked over many
//! randomly drawn location sets rather than single hand-picked examples.

use common_security::{
    authorize, authorize_account_mutation, authorize_assignment, AccessDenied, Action,
    LocationScope, Principal, Role,
};
use uuid::Uuid;

fn locations(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

#[test]
fn staff_read_allowed_iff_location_in_scope() {
    for size in 1..6 {
        let locs = locations(size);
        let staff = Principal::new(Uuid::new_v4(), Role::Staff, locs.clone());

        for loc in &locs {
            assert!(authorize(&staff, Action::Read, *loc).is_ok());
        }
        assert_eq!(
            authorize(&staff, Action::Read, Uuid::new_v4()),
            Err(AccessDenied::LocationNotInScope)
        );
    }
}

#[test]
fn staff_writes_always_denied_regardless_of_scope() {
    let locs = locations(3);
    let staff = Principal::new(Uuid::new_v4(), Role::Staff, locs.clone());
    for loc in locs {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert_eq!(
                authorize(&staff, action, loc),
                Err(AccessDenied::RoleNotPermitted)
            );
        }
    }
}

#[test]
fn assignment_allowed_iff_requested_subset_of_scope() {
    let scope = locations(4);
    let admin = Principal::new(Uuid::new_v4(), Role::FranchiseAdmin, scope.clone());

    // every prefix of the admin's own scope is a subset
    for k in 0..=scope.len() {
        assert!(authorize_assignment(&admin, &scope[..k]).is_ok());
    }

    // adding any single foreign location denies the whole request
    for k in 0..=scope.len() {
        let mut requested = scope[..k].to_vec();
        requested.push(Uuid::new_v4());
        assert_eq!(
            authorize_assignment(&admin, &requested),
            Err(AccessDenied::LocationNotInScope),
            "foreign location must reject the entire batch"
        );
    }
}

#[test]
fn account_mutation_denied_on_any_overlap_short_of_containment() {
    let shared = locations(2);
    let admin_only = locations(2);
    let target_only = locations(1);

    let mut admin_scope = shared.clone();
    admin_scope.extend(admin_only);
    let admin = Principal::new(Uuid::new_v4(), Role::FranchiseAdmin, admin_scope);

    let mut target_locs = shared;
    target_locs.extend(target_only);
    let target = LocationScope::assigned(target_locs);

    assert_eq!(
        authorize_account_mutation(&admin, &target),
        Err(AccessDenied::SubsetViolation),
        "two shared locations still do not grant mutation"
    );
}

// Scenario from the menu-item surface: admin A is assigned only L1; creating
// in L1 succeeds, creating in unassigned L2 is denied before any write.
#[test]
fn scoped_admin_create_scenario() {
    let l1 = Uuid::new_v4();
    let l2 = Uuid::new_v4();
    let admin = Principal::new(Uuid::new_v4(), Role::FranchiseAdmin, vec![l1]);

    authorize(&admin, Action::Create, l1).expect("create in assigned location");
    assert_eq!(
        authorize(&admin, Action::Create, l2),
        Err(AccessDenied::LocationNotInScope)
    );
}

// Scenario from the staff read surface: staff assigned to L1 can fetch an
// item in L1 but not one in L2.
#[test]
fn scoped_staff_read_scenario() {
    let l1 = Uuid::new_v4();
    let l2 = Uuid::new_v4();
    let staff = Principal::new(Uuid::new_v4(), Role::Staff, vec![l1]);

    authorize(&staff, Action::Read, l1).expect("item in L1 is visible");
    assert_eq!(
        authorize(&staff, Action::Read, l2),
        Err(AccessDenied::LocationNotInScope)
    );
}

#[test]
fn decisions_are_deterministic_in_principal_and_target() {
    let l1 = Uuid::new_v4();
    let admin = Principal::new(Uuid::new_v4(), Role::FranchiseAdmin, vec![l1]);
    let target = Uuid::new_v4();
    let first = authorize(&admin, Action::Update, target);
    for _ in 0..10 {
        assert_eq!(first, authorize(&admin, Action::Update, target));
    }
}

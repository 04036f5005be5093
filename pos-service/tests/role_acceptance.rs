use common_security::{
    authorize, authorize_account_mutation, authorize_account_view, authorize_order_placement,
    ensure_role, Action, LocationScope, Principal, Role,
};
use uuid::Uuid;

fn principal(role: Role, locations: Vec<Uuid>) -> Principal {
    Principal::new(Uuid::new_v4(), role, locations)
}

#[test]
fn super_admin_accepted_everywhere() {
    let p = principal(Role::SuperAdmin, vec![]);
    let loc = Uuid::new_v4();
    for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
        authorize(&p, action, loc).expect("super admin should be allowed everywhere");
    }
    ensure_role(&p, &[Role::SuperAdmin]).expect("super admin passes the location gate");
}

#[test]
fn franchise_admin_accepted_for_scoped_menu_writes() {
    let loc = Uuid::new_v4();
    let p = principal(Role::FranchiseAdmin, vec![loc]);
    authorize(&p, Action::Create, loc).expect("scoped create should be allowed");
    authorize(&p, Action::Delete, loc).expect("scoped delete should be allowed");
}

#[test]
fn franchise_admin_rejected_for_location_creation() {
    let p = principal(Role::FranchiseAdmin, vec![Uuid::new_v4()]);
    ensure_role(&p, &[Role::SuperAdmin]).expect_err("only super admins create locations");
}

#[test]
fn staff_accepted_for_scoped_reads_only() {
    let loc = Uuid::new_v4();
    let p = principal(Role::Staff, vec![loc]);
    authorize(&p, Action::Read, loc).expect("staff read their own locations");
    authorize(&p, Action::Update, loc).expect_err("staff are read-only");
}

#[test]
fn staff_accepted_for_order_placement() {
    let loc = Uuid::new_v4();
    let p = principal(Role::Staff, vec![loc]);
    authorize_order_placement(&p, loc).expect("staff place orders at their register");
}

#[test]
fn staff_rejected_for_account_endpoints() {
    let loc = Uuid::new_v4();
    let p = principal(Role::Staff, vec![loc]);
    let target = LocationScope::assigned(vec![loc]);
    authorize_account_view(&p, &target).expect_err("staff never list accounts");
    authorize_account_mutation(&p, &target).expect_err("staff never manage accounts");
}

#[test]
fn franchise_admin_account_visibility_follows_overlap() {
    let shared = Uuid::new_v4();
    let p = principal(Role::FranchiseAdmin, vec![shared, Uuid::new_v4()]);
    let overlapping = LocationScope::assigned(vec![shared, Uuid::new_v4()]);
    let disjoint = LocationScope::assigned(vec![Uuid::new_v4()]);

    authorize_account_view(&p, &overlapping).expect("overlap reveals the account");
    authorize_account_view(&p, &disjoint).expect_err("disjoint account stays hidden");
    authorize_account_mutation(&p, &overlapping)
        .expect_err("overlap alone does not grant mutation");
}

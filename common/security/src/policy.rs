use tracing::warn;
use uuid::Uuid;

use crate::context::Principal;
use crate::error::AccessDenied;
use crate::roles::Role;
use crate::scope::LocationScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::Read)
    }
}

// Which actions each role may take on location-scoped resources. Staff are
// read-only over menu and location data; admins get the full set.
fn role_permits(role: Role, action: Action) -> bool {
    match role {
        Role::SuperAdmin | Role::FranchiseAdmin => true,
        Role::Staff => !action.is_mutation(),
    }
}

/// Decide whether `principal` may perform `action` on a resource owned by
/// `location_id`.
///
/// Evaluated in precedence order: an unrestricted scope (super admin) allows
/// everything; then the role/action table; then the location scope check.
/// The same predicate narrows list queries — there is no looser list rule.
pub fn authorize(
    principal: &Principal,
    action: Action,
    location_id: Uuid,
) -> Result<(), AccessDenied> {
    if principal.scope.is_unrestricted() {
        return Ok(());
    }
    if !role_permits(principal.role, action) {
        warn!(user_id = %principal.id, role = %principal.role, action = action.as_str(), "role_check_failed");
        return Err(AccessDenied::RoleNotPermitted);
    }
    if !principal.scope.contains(location_id) {
        warn!(user_id = %principal.id, %location_id, action = action.as_str(), "scope_check_failed");
        return Err(AccessDenied::LocationNotInScope);
    }
    Ok(())
}

/// Location sets named in a create/update payload must stay inside the
/// caller's scope. One out-of-scope id rejects the whole request; a batch is
/// never partially applied.
pub fn authorize_assignment(principal: &Principal, requested: &[Uuid]) -> Result<(), AccessDenied> {
    if principal.scope.contains_all(requested) {
        Ok(())
    } else {
        warn!(user_id = %principal.id, requested = requested.len(), "assignment_scope_check_failed");
        Err(AccessDenied::LocationNotInScope)
    }
}

/// Mutating another admin/staff account requires the target's assignment set
/// to be fully contained in the caller's scope; overlap alone is not enough.
pub fn authorize_account_mutation(
    principal: &Principal,
    target: &LocationScope,
) -> Result<(), AccessDenied> {
    if principal.scope.is_unrestricted() {
        return Ok(());
    }
    if principal.role != Role::FranchiseAdmin {
        return Err(AccessDenied::RoleNotPermitted);
    }
    if !target.is_subset_of(&principal.scope) {
        warn!(user_id = %principal.id, "account_subset_check_failed");
        return Err(AccessDenied::SubsetViolation);
    }
    Ok(())
}

/// Reading another admin/staff account only needs a shared location.
pub fn authorize_account_view(
    principal: &Principal,
    target: &LocationScope,
) -> Result<(), AccessDenied> {
    if principal.scope.is_unrestricted() {
        return Ok(());
    }
    if principal.role != Role::FranchiseAdmin {
        return Err(AccessDenied::RoleNotPermitted);
    }
    if !target.overlaps(&principal.scope) {
        return Err(AccessDenied::LocationNotInScope);
    }
    Ok(())
}

/// Order placement is open to any authenticated principal acting inside the
/// target location; staff place orders even though menu data is read-only
/// for them.
pub fn authorize_order_placement(
    principal: &Principal,
    location_id: Uuid,
) -> Result<(), AccessDenied> {
    if principal.scope.contains(location_id) {
        Ok(())
    } else {
        warn!(user_id = %principal.id, %location_id, "order_scope_check_failed");
        Err(AccessDenied::LocationNotInScope)
    }
}

/// Staff accounts must keep at least one assigned location.
pub fn require_assigned_locations(location_ids: &[Uuid]) -> Result<(), AccessDenied> {
    if location_ids.is_empty() {
        Err(AccessDenied::MissingLocations)
    } else {
        Ok(())
    }
}

/// Gate for operations reserved to specific roles, e.g. location creation.
pub fn ensure_role(principal: &Principal, allowed: &[Role]) -> Result<(), AccessDenied> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        warn!(user_id = %principal.id, role = %principal.role, ?allowed, "role_gate_failed");
        Err(AccessDenied::RoleNotPermitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn super_admin() -> Principal {
        Principal::new(Uuid::new_v4(), Role::SuperAdmin, Vec::new())
    }

    fn franchise_admin(locations: Vec<Uuid>) -> Principal {
        Principal::new(Uuid::new_v4(), Role::FranchiseAdmin, locations)
    }

    fn staff(locations: Vec<Uuid>) -> Principal {
        Principal::new(Uuid::new_v4(), Role::Staff, locations)
    }

    #[test]
    fn super_admin_is_unconditionally_allowed() {
        let p = super_admin();
        let loc = Uuid::new_v4();
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            authorize(&p, action, loc).expect("super admin should pass");
        }
        authorize_account_mutation(&p, &LocationScope::assigned(vec![loc])).expect("mutation");
        authorize_account_view(&p, &LocationScope::assigned(vec![loc])).expect("view");
    }

    #[test]
    fn staff_reads_only_inside_scope() {
        let loc = Uuid::new_v4();
        let other = Uuid::new_v4();
        let p = staff(vec![loc]);
        authorize(&p, Action::Read, loc).expect("in-scope read");
        assert_eq!(
            authorize(&p, Action::Read, other),
            Err(AccessDenied::LocationNotInScope)
        );
    }

    #[test]
    fn staff_never_mutates() {
        let loc = Uuid::new_v4();
        let p = staff(vec![loc]);
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert_eq!(
                authorize(&p, action, loc),
                Err(AccessDenied::RoleNotPermitted),
                "staff must not {action:?} even inside scope"
            );
        }
    }

    #[test]
    fn franchise_admin_acts_only_inside_scope() {
        let loc = Uuid::new_v4();
        let other = Uuid::new_v4();
        let p = franchise_admin(vec![loc]);
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            authorize(&p, action, loc).expect("in-scope action");
            assert_eq!(
                authorize(&p, action, other),
                Err(AccessDenied::LocationNotInScope)
            );
        }
    }

    #[test]
    fn assignment_is_all_or_nothing() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let p = franchise_admin(vec![a]);
        authorize_assignment(&p, &[a]).expect("subset request");
        assert_eq!(
            authorize_assignment(&p, &[a, b]),
            Err(AccessDenied::LocationNotInScope),
            "one out-of-scope location denies the whole request"
        );
    }

    #[test]
    fn account_mutation_needs_strict_subset_not_overlap() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let p = franchise_admin(vec![a, b]);

        authorize_account_mutation(&p, &LocationScope::assigned(vec![a, b]))
            .expect("equal sets are a subset");
        authorize_account_mutation(&p, &LocationScope::assigned(vec![a])).expect("proper subset");
        assert_eq!(
            authorize_account_mutation(&p, &LocationScope::assigned(vec![b, c])),
            Err(AccessDenied::SubsetViolation),
            "overlap without containment must deny"
        );
    }

    #[test]
    fn account_view_needs_only_overlap() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let p = franchise_admin(vec![a, b]);

        authorize_account_view(&p, &LocationScope::assigned(vec![b, c])).expect("overlap reveals");
        assert_eq!(
            authorize_account_view(&p, &LocationScope::assigned(vec![c])),
            Err(AccessDenied::LocationNotInScope)
        );
    }

    #[test]
    fn staff_cannot_manage_accounts() {
        let loc = Uuid::new_v4();
        let p = staff(vec![loc]);
        let target = LocationScope::assigned(vec![loc]);
        assert_eq!(
            authorize_account_mutation(&p, &target),
            Err(AccessDenied::RoleNotPermitted)
        );
        assert_eq!(
            authorize_account_view(&p, &target),
            Err(AccessDenied::RoleNotPermitted)
        );
    }

    #[test]
    fn staff_place_orders_inside_scope() {
        let loc = Uuid::new_v4();
        let p = staff(vec![loc]);
        authorize_order_placement(&p, loc).expect("staff order in scope");
        assert_eq!(
            authorize_order_placement(&p, Uuid::new_v4()),
            Err(AccessDenied::LocationNotInScope)
        );
    }

    #[test]
    fn empty_assignment_is_rejected_for_staff_accounts() {
        assert_eq!(
            require_assigned_locations(&[]),
            Err(AccessDenied::MissingLocations)
        );
        require_assigned_locations(&[Uuid::new_v4()]).expect("non-empty passes");
    }

    #[test]
    fn role_gate_denies_outsiders() {
        let p = franchise_admin(vec![Uuid::new_v4()]);
        assert_eq!(
            ensure_role(&p, &[Role::SuperAdmin]),
            Err(AccessDenied::RoleNotPermitted)
        );
        ensure_role(&p, &[Role::SuperAdmin, Role::FranchiseAdmin]).expect("listed role passes");
    }
}

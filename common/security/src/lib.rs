pub mod context;
pub mod error;
pub mod policy;
pub mod roles;
pub mod scope;

pub use context::{MaybePrincipal, Principal, PrincipalExtractor};
pub use error::AccessDenied;
pub use policy::{
    authorize, authorize_account_mutation, authorize_account_view, authorize_assignment,
    authorize_order_placement, ensure_role, require_assigned_locations, Action,
};
pub use roles::Role;
pub use scope::LocationScope;

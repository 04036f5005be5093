use common_http_errors::ApiError;
use thiserror::Error;

/// Reasons an authorization decision denies a request.
///
/// Decisions are deterministic in the principal/target pair and are produced
/// before any persistence write, so a denial never leaves partial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("caller is not authenticated")]
    NotAuthenticated,
    #[error("role does not permit this action")]
    RoleNotPermitted,
    #[error("location is outside the caller's assigned scope")]
    LocationNotInScope,
    #[error("target assignment is not a subset of the caller's scope")]
    SubsetViolation,
    #[error("at least one location must be assigned")]
    MissingLocations,
}

impl AccessDenied {
    pub fn code(&self) -> &'static str {
        match self {
            AccessDenied::NotAuthenticated => "not_authenticated",
            AccessDenied::RoleNotPermitted => "role_not_permitted",
            AccessDenied::LocationNotInScope => "location_not_in_scope",
            AccessDenied::SubsetViolation => "subset_violation",
            AccessDenied::MissingLocations => "missing_locations",
        }
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::NotAuthenticated => ApiError::Unauthorized {
                code: denied.code(),
                trace_id: None,
                message: None,
            },
            _ => ApiError::Forbidden {
                code: denied.code(),
                trace_id: None,
            },
        }
    }
}

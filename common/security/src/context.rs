use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use uuid::Uuid;

use common_auth::{AuthContext, AuthError, Claims, TokenVerifier};
use common_http_errors::ApiError;

use crate::roles::Role;
use crate::scope::LocationScope;

/// An authenticated caller: identity, role, and the location scope every
/// authorization decision is made against.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub scope: LocationScope,
}

impl Principal {
    /// Build a principal, deriving the scope from the role: super admins are
    /// unrestricted, everyone else is limited to their assigned locations.
    pub fn new(id: Uuid, role: Role, location_ids: Vec<Uuid>) -> Self {
        let scope = match role {
            Role::SuperAdmin => LocationScope::unrestricted(),
            Role::FranchiseAdmin | Role::Staff => LocationScope::assigned(location_ids),
        };
        Self { id, role, scope }
    }
}

impl TryFrom<Claims> for Principal {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AuthError::InvalidClaim("role", claims.role.clone()))?;
        Ok(Principal::new(claims.subject, role, claims.location_ids))
    }
}

/// Extracts the verified [`Principal`] for a request; rejects with 401 when
/// the bearer token is missing or invalid.
pub struct PrincipalExtractor(pub Principal);

/// Like [`PrincipalExtractor`] but yields `None` when no Authorization header
/// is present at all. A present-but-invalid token still rejects.
pub struct MaybePrincipal(pub Option<Principal>);

fn reject(err: AuthError) -> ApiError {
    let code = match err {
        AuthError::MissingAuthorization => "missing_authorization",
        AuthError::InvalidAuthorization => "invalid_authorization",
        _ => "invalid_token",
    };
    ApiError::Unauthorized {
        code,
        trace_id: None,
        message: Some(err.to_string()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PrincipalExtractor
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state)
            .await
            .map_err(reject)?;
        let principal = Principal::try_from(auth.into_claims()).map_err(reject)?;
        Ok(Self(principal))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybePrincipal
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(Self(None));
        }
        let PrincipalExtractor(principal) =
            PrincipalExtractor::from_request_parts(parts, state).await?;
        Ok(Self(Some(principal)))
    }
}

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Distinguishes access tokens from refresh tokens so neither can stand in
/// for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

impl TokenUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenUse::Access => "access",
            TokenUse::Refresh => "refresh",
        }
    }
}

/// Application-focused representation of verified JWT claims.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub subject: Uuid,
    pub role: String,
    pub location_ids: Vec<Uuid>,
    pub token_use: TokenUse,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    pub issuer: String,
}

/// Wire shape of the token payload; kept separate from [`Claims`] so claim
/// parsing failures surface per-claim errors instead of opaque serde noise.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub locs: Vec<Uuid>,
    #[serde(rename = "use")]
    pub token_use: TokenUse,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    pub iss: String,
    pub aud: String,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let subject = Uuid::parse_str(&value.sub)
            .map_err(|_| AuthError::InvalidClaim("sub", value.sub.clone()))?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| AuthError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            subject,
            role: value.role,
            location_ids: value.locs,
            token_use: value.token_use,
            expires_at,
            issued_at,
            issuer: value.iss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repr_with_bad_subject_is_rejected() {
        let repr = ClaimsRepr {
            sub: "not-a-uuid".into(),
            role: "staff".into(),
            locs: vec![],
            token_use: TokenUse::Access,
            exp: 4_000_000_000,
            iat: None,
            iss: "pos".into(),
            aud: "pos-clients".into(),
        };
        let err = Claims::try_from(repr).expect_err("bad sub should fail");
        assert!(matches!(err, AuthError::InvalidClaim("sub", _)));
    }

    #[test]
    fn repr_converts_locations_and_use() {
        let loc = Uuid::new_v4();
        let repr = ClaimsRepr {
            sub: Uuid::new_v4().to_string(),
            role: "franchise_admin".into(),
            locs: vec![loc],
            token_use: TokenUse::Refresh,
            exp: 4_000_000_000,
            iat: Some(1_700_000_000),
            iss: "pos".into(),
            aud: "pos-clients".into(),
        };
        let claims = Claims::try_from(repr).expect("claims");
        assert_eq!(claims.location_ids, vec![loc]);
        assert_eq!(claims.token_use, TokenUse::Refresh);
        assert!(claims.issued_at.is_some());
    }
}

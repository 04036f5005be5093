use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::claims::{ClaimsRepr, TokenUse};
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Identity material stamped into a token pair at login time.
pub struct TokenSubject {
    pub user_id: Uuid,
    pub role: String,
    pub location_ids: Vec<Uuid>,
}

pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub access_expires_in: i64,
    pub refresh_expires_in: i64,
    pub token_type: &'static str,
}

/// HS256 signer for the access/refresh token pair.
pub struct TokenSigner {
    config: JwtConfig,
    encoding_key: EncodingKey,
}

impl TokenSigner {
    pub fn new(config: JwtConfig, secret: &[u8]) -> Self {
        Self {
            config,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    /// Issue a fresh access/refresh pair for a subject.
    pub fn issue(&self, subject: &TokenSubject) -> AuthResult<IssuedTokens> {
        let now = Utc::now();
        let (access_token, access_expires_at) =
            self.sign(subject, TokenUse::Access, self.config.access_ttl_seconds, now)?;
        let (refresh_token, refresh_expires_at) =
            self.sign(subject, TokenUse::Refresh, self.config.refresh_ttl_seconds, now)?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            access_expires_in: self.config.access_ttl_seconds,
            refresh_expires_in: self.config.refresh_ttl_seconds,
            token_type: "Bearer",
        })
    }

    /// Issue only a new access token (token refresh path).
    pub fn issue_access(&self, subject: &TokenSubject) -> AuthResult<(String, DateTime<Utc>)> {
        self.sign(
            subject,
            TokenUse::Access,
            self.config.access_ttl_seconds,
            Utc::now(),
        )
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.config.access_ttl_seconds
    }

    fn sign(
        &self,
        subject: &TokenSubject,
        token_use: TokenUse,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let expires_at = now + Duration::seconds(ttl_seconds);
        let repr = ClaimsRepr {
            sub: subject.user_id.to_string(),
            role: subject.role.clone(),
            locs: subject.location_ids.clone(),
            token_use,
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::default(), &repr, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        Ok((token, expires_at))
    }
}

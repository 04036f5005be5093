use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::{Claims, ClaimsRepr, TokenUse};
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Verifies HS256 tokens produced by [`crate::TokenSigner`].
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig, secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = u64::from(config.leeway_seconds);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify an access token and return its claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_use(token, TokenUse::Access)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        self.verify_use(token, TokenUse::Refresh)
    }

    fn verify_use(&self, token: &str, expected: TokenUse) -> AuthResult<Claims> {
        let data = decode::<ClaimsRepr>(token, &self.decoding_key, &self.validation)?;
        let claims = Claims::try_from(data.claims)?;
        if claims.token_use != expected {
            return Err(AuthError::WrongTokenUse {
                expected: expected.as_str(),
                received: claims.token_use.as_str(),
            });
        }
        Ok(claims)
    }
}

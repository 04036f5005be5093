/// Runtime configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Issuer claim (iss) stamped on and required from every token.
    pub issuer: String,
    /// Audience claim (aud) stamped on and required from every token.
    pub audience: String,
    /// Allowable clock skew in seconds when validating exp/iat.
    pub leeway_seconds: u32,
    /// Lifetime of access tokens.
    pub access_ttl_seconds: i64,
    /// Lifetime of refresh tokens.
    pub refresh_ttl_seconds: i64,
}

impl JwtConfig {
    /// Construct config with sensible defaults (30s leeway, 15 minute access
    /// tokens, 7 day refresh tokens).
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds: 30,
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 7 * 24 * 3600,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Adjust token lifetimes.
    pub fn with_ttls(mut self, access_seconds: i64, refresh_seconds: i64) -> Self {
        self.access_ttl_seconds = access_seconds;
        self.refresh_ttl_seconds = refresh_seconds;
        self
    }
}

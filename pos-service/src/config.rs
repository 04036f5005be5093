use anyhow::{Context, Result};
use std::collections::HashSet;
use std::env;

/// Process-wide configuration, loaded once at startup and injected through
/// `AppState`. Handlers never read the environment themselves, so every
/// authorization decision stays testable with an explicit principal.
#[derive(Debug, Clone)]
pub struct PosConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub google_client_id: Option<String>,
    pub google_allowed_domains: HashSet<String>,
    pub allow_anonymous_orders: bool,
    pub host: String,
    pub port: u16,
}

impl PosConfig {
    pub fn domain_allowed(&self, domain: &str) -> bool {
        self.google_allowed_domains
            .contains(&domain.to_ascii_lowercase())
    }
}

pub fn load_pos_config() -> Result<PosConfig> {
    let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "pos-service".to_string());
    let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "pos-clients".to_string());

    let access_ttl_seconds = int_from_env("JWT_ACCESS_TTL_SECONDS")
        .context("Failed to parse JWT_ACCESS_TTL_SECONDS")?
        .unwrap_or(900);
    let refresh_ttl_seconds = int_from_env("JWT_REFRESH_TTL_SECONDS")
        .context("Failed to parse JWT_REFRESH_TTL_SECONDS")?
        .unwrap_or(7 * 24 * 3600);

    let google_client_id = env::var("GOOGLE_CLIENT_ID")
        .ok()
        .and_then(|value| normalize_optional(&value));
    let google_allowed_domains = env::var("GOOGLE_ALLOWED_DOMAINS")
        .ok()
        .map(|value| parse_domains(&value))
        .unwrap_or_default();

    let allow_anonymous_orders = bool_from_env("POS_ALLOW_ANONYMOUS_ORDERS").unwrap_or(false);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .ok()
        .map(|value| value.parse::<u16>())
        .transpose()
        .context("Failed to parse PORT")?
        .unwrap_or(8080);

    Ok(PosConfig {
        jwt_secret,
        jwt_issuer,
        jwt_audience,
        access_ttl_seconds,
        refresh_ttl_seconds,
        google_client_id,
        google_allowed_domains,
        allow_anonymous_orders,
        host,
        port,
    })
}

fn bool_from_env(key: &str) -> Option<bool> {
    env::var(key).ok().map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn int_from_env(key: &str) -> Result<Option<i64>> {
    match env::var(key) {
        Ok(value) => {
            let parsed = value
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid integer '{value}' for {key}"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

fn parse_domains(value: &str) -> HashSet<String> {
    value
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter_map(|item| {
            let domain = item.trim();
            if domain.is_empty() {
                None
            } else {
                Some(domain.to_ascii_lowercase())
            }
        })
        .collect()
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

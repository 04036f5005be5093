use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::{JwtConfig, TokenSigner, TokenVerifier};
use reqwest::Client;
use sqlx::PgPool;

use crate::config::PosConfig;
use crate::metrics::PosMetrics;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub signer: Arc<TokenSigner>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<PosConfig>,
    pub http_client: Client,
    pub metrics: Arc<PosMetrics>,
}

impl AppState {
    pub fn new(db: PgPool, config: PosConfig) -> Self {
        let jwt_config = JwtConfig::new(config.jwt_issuer.as_str(), config.jwt_audience.as_str())
            .with_ttls(config.access_ttl_seconds, config.refresh_ttl_seconds);
        let secret = config.jwt_secret.as_bytes();
        let signer = Arc::new(TokenSigner::new(jwt_config.clone(), secret));
        let verifier = Arc::new(TokenVerifier::new(&jwt_config, secret));

        Self {
            db,
            signer,
            verifier,
            config: Arc::new(config),
            http_client: Client::new(),
            metrics: Arc::new(PosMetrics::new()),
        }
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}

impl FromRef<AppState> for Arc<PosConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{error, info, warn};
use uuid::Uuid;

use common_auth::TokenSubject;
use common_http_errors::{ApiError, ApiResult};
use common_security::Role;

use crate::account_handlers::load_location_ids;
use crate::validation::{check_required, require};
use crate::AppState;

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserPayload {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub token_type: &'static str,
    pub user: UserPayload,
}

#[derive(FromRow)]
struct AuthRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    password_hash: Option<String>,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized {
        code: "invalid_credentials",
        trace_id: None,
        message: Some("Invalid credentials. Please try again.".into()),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    check_required(&[
        ("email", login.email.is_some()),
        ("password", login.password.is_some()),
    ])?;
    let email = require("email", login.email)?;
    let password = require("password", login.password)?;

    let row = sqlx::query_as::<_, AuthRow>(
        "SELECT id, email, first_name, last_name, role, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    let Some(row) = row else {
        warn!(%email, "login_failed_unknown_email");
        return Err(invalid_credentials());
    };

    // Federated accounts have no usable password; password login always fails.
    let Some(stored_hash) = row.password_hash.as_deref() else {
        warn!(user_id = %row.id, "login_failed_no_password");
        return Err(invalid_credentials());
    };

    let parsed = PasswordHash::new(stored_hash).map_err(|e| ApiError::internal(e, None))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_err()
    {
        warn!(user_id = %row.id, "login_failed_bad_password");
        return Err(invalid_credentials());
    }

    info!(user_id = %row.id, "login_succeeded");
    issue_login_response(&state, row).await
}

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    iss: String,
    email: String,
    #[serde(default)]
    email_verified: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
}

fn invalid_google_token() -> ApiError {
    ApiError::Unauthorized {
        code: "invalid_google_token",
        trace_id: None,
        message: None,
    }
}

/// Exchange a Google ID token for our own token pair. The account's email
/// domain must be on the configured allow-list; new sign-ins within it are
/// provisioned as franchise admins with no usable password.
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<GoogleLoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let token = require("token", req.token)?;

    let Some(client_id) = state.config.google_client_id.as_deref() else {
        return Err(ApiError::bad_request("google_login_disabled", None));
    };

    let response = state
        .http_client
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", token.as_str())])
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "tokeninfo_request_failed");
            ApiError::internal("Unable to verify Google token", None)
        })?;

    if !response.status().is_success() {
        return Err(invalid_google_token());
    }

    let info: GoogleTokenInfo = response.json().await.map_err(|_| invalid_google_token())?;

    if info.aud != client_id {
        warn!("google_token_audience_mismatch");
        return Err(invalid_google_token());
    }
    if !matches!(
        info.iss.as_str(),
        "accounts.google.com" | "https://accounts.google.com"
    ) {
        return Err(invalid_google_token());
    }
    if info.email_verified != "true" {
        return Err(ApiError::bad_request("email_not_verified", None));
    }

    let domain = info
        .email
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !state.config.domain_allowed(&domain) {
        warn!(%domain, "google_login_domain_rejected");
        return Err(ApiError::forbidden("domain_not_allowed", None));
    }

    let existing = sqlx::query_as::<_, AuthRow>(
        "SELECT id, email, first_name, last_name, role, password_hash FROM users WHERE email = $1",
    )
    .bind(&info.email)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    let row = match existing {
        Some(row) => row,
        None => {
            // First sign-in from an allow-listed domain provisions the
            // account; password_hash stays NULL so only federated login works.
            let created = sqlx::query_as::<_, AuthRow>(
                "INSERT INTO users (id, email, first_name, last_name, role, password_hash)
                 VALUES ($1, $2, $3, $4, $5, NULL)
                 RETURNING id, email, first_name, last_name, role, password_hash",
            )
            .bind(Uuid::new_v4())
            .bind(&info.email)
            .bind(&info.given_name)
            .bind(&info.family_name)
            .bind(Role::FranchiseAdmin.as_str())
            .fetch_one(&state.db)
            .await
            .map_err(|e| ApiError::internal(e, None))?;
            info!(user_id = %created.id, "google_account_provisioned");
            created
        }
    };

    issue_login_response(&state, row).await
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let token = require("refresh_token", req.refresh_token)?;

    let claims = state.verifier.verify_refresh(&token).map_err(|e| {
        warn!(error = %e, "refresh_token_rejected");
        ApiError::Unauthorized {
            code: "invalid_refresh_token",
            trace_id: None,
            message: None,
        }
    })?;

    // Re-read the account so a refresh picks up role/assignment changes made
    // since the pair was issued.
    let row = sqlx::query_as::<_, AuthRow>(
        "SELECT id, email, first_name, last_name, role, password_hash FROM users WHERE id = $1",
    )
    .bind(claims.subject)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    let Some(row) = row else {
        return Err(ApiError::Unauthorized {
            code: "unknown_account",
            trace_id: None,
            message: None,
        });
    };

    let location_ids = load_location_ids(&state.db, row.id)
        .await
        .map_err(|e| ApiError::internal(e, None))?;

    let subject = TokenSubject {
        user_id: row.id,
        role: row.role,
        location_ids,
    };
    let (access_token, _expires_at) = state
        .signer
        .issue_access(&subject)
        .map_err(|e| ApiError::internal(e, None))?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.signer.access_ttl_seconds(),
        token_type: "Bearer",
    }))
}

async fn issue_login_response(state: &AppState, row: AuthRow) -> ApiResult<Json<LoginResponse>> {
    let location_ids = load_location_ids(&state.db, row.id)
        .await
        .map_err(|e| ApiError::internal(e, None))?;

    let user = UserPayload {
        id: row.id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        role: row.role.clone(),
    };

    let subject = TokenSubject {
        user_id: user.id,
        role: row.role,
        location_ids,
    };
    let issued = state.signer.issue(&subject).map_err(|err| {
        error!(user_id = %user.id, error = %err, "token_issue_failed");
        ApiError::internal("Unable to issue authentication tokens", None)
    })?;

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        expires_in: issued.access_expires_in,
        refresh_expires_in: issued.refresh_expires_in,
        token_type: issued.token_type,
        user,
    }))
}

pub(crate) fn hash_password(password: &str) -> ApiResult<String> {
    if password.trim().is_empty() {
        return Err(ApiError::BadRequest {
            code: "empty_password",
            trace_id: None,
            message: Some("Password must not be empty".into()),
        });
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::internal(format!("Failed to hash password: {err}"), None))
}

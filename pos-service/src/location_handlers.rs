use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use common_http_errors::{ApiError, ApiResult};
use common_security::{authorize, ensure_role, Action, PrincipalExtractor, Role};

use crate::validation::{check_required, require};
use crate::AppState;

const LOCATION_COLUMNS: &str = "id, name, address, city, state, phone";

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LocationRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LocationName {
    pub id: Uuid,
    pub name: String,
}

#[derive(Deserialize)]
pub struct NewLocation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
}

pub async fn list_locations(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
) -> ApiResult<Json<Vec<LocationRecord>>> {
    let records = match principal.scope.narrowing_ids() {
        None => sqlx::query_as::<_, LocationRecord>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY name"
        ))
        .fetch_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?,
        Some(scope_ids) => sqlx::query_as::<_, LocationRecord>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = ANY($1) ORDER BY name"
        ))
        .bind(scope_ids)
        .fetch_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?,
    };
    Ok(Json(records))
}

/// Lightweight id/name listing for pickers, scoped like the full listing.
pub async fn list_location_names(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
) -> ApiResult<Json<Vec<LocationName>>> {
    let names = match principal.scope.narrowing_ids() {
        None => sqlx::query_as::<_, LocationName>("SELECT id, name FROM locations ORDER BY name")
            .fetch_all(&state.db)
            .await
            .map_err(|e| ApiError::internal(e, None))?,
        Some(scope_ids) => sqlx::query_as::<_, LocationName>(
            "SELECT id, name FROM locations WHERE id = ANY($1) ORDER BY name",
        )
        .bind(scope_ids)
        .fetch_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?,
    };
    Ok(Json(names))
}

pub async fn get_location(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Path(location_id): Path<Uuid>,
) -> ApiResult<Json<LocationRecord>> {
    let record = sqlx::query_as::<_, LocationRecord>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
    ))
    .bind(location_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?
    .ok_or_else(|| ApiError::not_found("location_not_found", None))?;

    authorize(&principal, Action::Read, location_id)?;
    Ok(Json(record))
}

pub async fn create_location(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Json(req): Json<NewLocation>,
) -> ApiResult<(StatusCode, Json<LocationRecord>)> {
    ensure_role(&principal, &[Role::SuperAdmin])?;
    check_required(&[
        ("name", req.name.is_some()),
        ("address", req.address.is_some()),
        ("city", req.city.is_some()),
        ("state", req.state.is_some()),
        ("phone", req.phone.is_some()),
    ])?;
    let name = require("name", req.name)?;
    let address = require("address", req.address)?;
    let city = require("city", req.city)?;
    let loc_state = require("state", req.state)?;
    let phone = require("phone", req.phone)?;

    let record = sqlx::query_as::<_, LocationRecord>(&format!(
        "INSERT INTO locations (id, name, address, city, state, phone)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {LOCATION_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(address)
    .bind(city)
    .bind(loc_state)
    .bind(phone)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    info!(location_id = %record.id, created_by = %principal.id, "location_created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_location(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Path(location_id): Path<Uuid>,
    Json(req): Json<UpdateLocation>,
) -> ApiResult<Json<LocationRecord>> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM locations WHERE id = $1")
        .bind(location_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?;
    if exists.is_none() {
        return Err(ApiError::not_found("location_not_found", None));
    }

    authorize(&principal, Action::Update, location_id)?;

    let record = sqlx::query_as::<_, LocationRecord>(&format!(
        "UPDATE locations SET
             name = COALESCE($1, name),
             address = COALESCE($2, address),
             city = COALESCE($3, city),
             state = COALESCE($4, state),
             phone = COALESCE($5, phone)
         WHERE id = $6
         RETURNING {LOCATION_COLUMNS}"
    ))
    .bind(req.name)
    .bind(req.address)
    .bind(req.city)
    .bind(req.state)
    .bind(req.phone)
    .bind(location_id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    info!(location_id = %location_id, updated_by = %principal.id, "location_updated");
    Ok(Json(record))
}

pub async fn delete_location(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Path(location_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&principal, &[Role::SuperAdmin])?;

    // Deletion cascades to the location's categories, menu items and orders.
    let result = sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(location_id)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("location_not_found", None));
    }

    warn!(location_id = %location_id, deleted_by = %principal.id, "location_deleted");
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common_http_errors::{ApiError, ApiResult};
use common_money::order_total;
use common_security::{authorize, authorize_order_placement, Action, MaybePrincipal, PrincipalExtractor};

use crate::account_handlers::LocationRef;
use crate::validation::check_required;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewOrder {
    pub location_id: Option<Uuid>,
    pub items: Option<Vec<NewOrderItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct OrderLine {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Shape-check the order lines before anything touches storage: at least one
/// line, each with a menu item id and a positive quantity (defaulting to 1).
pub fn validate_order_items(items: &[NewOrderItem]) -> ApiResult<Vec<OrderLine>> {
    if items.is_empty() {
        return Err(ApiError::BadRequest {
            code: "empty_order",
            trace_id: None,
            message: Some("No items in order".into()),
        });
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let Some(menu_item_id) = item.menu_item_id else {
            return Err(ApiError::BadRequest {
                code: "missing_fields",
                trace_id: None,
                message: Some("Missing fields: items.menu_item_id".into()),
            });
        };
        let quantity = item.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ApiError::BadRequest {
                code: "invalid_quantity",
                trace_id: None,
                message: Some(format!("Invalid quantity {quantity} for item {menu_item_id}")),
            });
        }
        lines.push(OrderLine {
            menu_item_id,
            quantity,
            notes: item.notes.clone(),
        });
    }
    Ok(lines)
}

#[derive(sqlx::FromRow)]
struct PricedItem {
    id: Uuid,
    name: String,
    price: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct OrderItemCreated {
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub items: Vec<OrderItemCreated>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    location_id: Uuid,
    order_number: String,
    order_date: DateTime<Utc>,
    total_amount: BigDecimal,
    processed_by: Option<Uuid>,
}

/// Create an order. The total is computed server-side from the menu items'
/// current prices, which are snapshotted onto the order lines; later price
/// changes never alter a stored order. Anonymous placement is a deployment
/// policy decision.
pub async fn create_order(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Json(req): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<OrderCreated>)> {
    check_required(&[
        ("location_id", req.location_id.is_some()),
        ("items", req.items.is_some()),
    ])?;
    let location_id = req.location_id.unwrap_or_default();
    let lines = validate_order_items(req.items.as_deref().unwrap_or_default())?;

    match &principal {
        Some(principal) => authorize_order_placement(principal, location_id)?,
        None => {
            if !state.config.allow_anonymous_orders {
                return Err(ApiError::Unauthorized {
                    code: "authentication_required",
                    trace_id: None,
                    message: None,
                });
            }
        }
    }

    let location_exists: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::internal(e, None))?;
    if location_exists.is_none() {
        return Err(ApiError::bad_request("invalid_location", None));
    }

    // Snapshot each line's price before the write so the stored totals are
    // independent of later menu edits.
    let mut priced = Vec::with_capacity(lines.len());
    for line in &lines {
        let item = sqlx::query_as::<_, PricedItem>(
            "SELECT id, name, price FROM menu_items WHERE id = $1",
        )
        .bind(line.menu_item_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?;
        let Some(item) = item else {
            return Err(ApiError::BadRequest {
                code: "invalid_menu_item",
                trace_id: None,
                message: Some(format!("Invalid menu item ID: {}", line.menu_item_id)),
            });
        };
        priced.push((item, line));
    }

    let total_amount = order_total(priced.iter().map(|(item, line)| (&item.price, line.quantity)));

    let order_id = Uuid::new_v4();
    let order_number = format!("ORD-{}", &order_id.simple().to_string()[..8].to_uppercase());
    let processed_by = principal.as_ref().map(|p| p.id);

    let mut tx = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, None))?;

    let order = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO orders (id, location_id, order_number, total_amount, processed_by)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, location_id, order_number, order_date, total_amount, processed_by",
    )
    .bind(order_id)
    .bind(location_id)
    .bind(&order_number)
    .bind(&total_amount)
    .bind(processed_by)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    let mut created_items = Vec::with_capacity(priced.len());
    for (item, line) in priced {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, price, notes)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(item.id)
        .bind(line.quantity)
        .bind(&item.price)
        .bind(&line.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::internal(e, None))?;

        created_items.push(OrderItemCreated {
            menu_item_id: item.id,
            menu_item_name: item.name,
            quantity: line.quantity,
            price: item.price,
            notes: line.notes.clone(),
        });
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, None))?;

    info!(order_id = %order.id, %location_id, total = %order.total_amount, "order_created");
    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            order_id: order.id,
            order_number: order.order_number,
            order_date: order.order_date,
            total_amount: order.total_amount,
            items: created_items,
        }),
    ))
}

#[derive(Deserialize)]
pub struct OrderHistoryQuery {
    pub location_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub location_id: Uuid,
    pub location_name: String,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
}

/// Role-scoped order history, newest first. The explicit `location_id`
/// filter must itself be inside the caller's scope.
pub async fn list_orders(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Query(query): Query<OrderHistoryQuery>,
) -> ApiResult<Json<Vec<OrderSummary>>> {
    if let Some(location_id) = query.location_id {
        authorize(&principal, Action::Read, location_id)?;
    }

    let scope_ids = principal.scope.narrowing_ids();
    let orders = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, o.location_id, l.name AS location_name, o.order_number, o.order_date, o.total_amount
         FROM orders o
         JOIN locations l ON l.id = o.location_id
         WHERE ($1::uuid[] IS NULL OR o.location_id = ANY($1))
           AND ($2::uuid IS NULL OR o.location_id = $2)
           AND ($3::date IS NULL OR o.order_date >= $3)
           AND ($4::date IS NULL OR o.order_date < ($4::date + 1))
         ORDER BY o.order_date DESC",
    )
    .bind(scope_ids)
    .bind(query.location_id)
    .bind(query.date_from)
    .bind(query.date_to)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    Ok(Json(orders))
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub menu_item_name: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessedBy {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub location: LocationRef,
    pub processed_by: Option<ProcessedBy>,
    pub items: Vec<OrderItemDetail>,
}

pub async fn get_order(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderDetail>> {
    let order = sqlx::query_as::<_, OrderRow>(
        "SELECT id, location_id, order_number, order_date, total_amount, processed_by
         FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?
    .ok_or_else(|| ApiError::not_found("order_not_found", None))?;

    authorize(&principal, Action::Read, order.location_id)?;

    let location = sqlx::query_as::<_, LocationRef>("SELECT id, name FROM locations WHERE id = $1")
        .bind(order.location_id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?;

    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.menu_item_id, mi.name AS menu_item_name, oi.quantity, oi.price, oi.notes
         FROM order_items oi
         LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id
         WHERE oi.order_id = $1
         ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::internal(e, None))?;

    let processed_by = match order.processed_by {
        Some(user_id) => sqlx::query_as::<_, (String, String)>(
            "SELECT first_name, last_name FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::internal(e, None))?
        .map(|(first_name, last_name)| ProcessedBy {
            id: user_id,
            name: format!("{first_name} {last_name}"),
        }),
        None => None,
    };

    Ok(Json(OrderDetail {
        id: order.id,
        order_number: order.order_number,
        order_date: order.order_date,
        total_amount: order.total_amount,
        location,
        processed_by,
        items,
    }))
}

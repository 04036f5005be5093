use anyhow::Context;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::{env, net::SocketAddr};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use pos_service::account_handlers::{
    create_franchise_admin, create_staff, delete_franchise_admin, delete_staff,
    get_franchise_admin, get_staff, list_franchise_admins, list_staff, update_franchise_admin,
    update_staff,
};
use pos_service::auth_handlers::{google_login, login, refresh};
use pos_service::category_handlers::{
    create_category, delete_category, list_categories, update_category,
};
use pos_service::config::load_pos_config;
use pos_service::location_handlers::{
    create_location, delete_location, get_location, list_location_names, list_locations,
    update_location,
};
use pos_service::menu_item_handlers::{
    create_menu_item, delete_menu_item, get_menu_item, list_menu_items, patch_menu_item,
    replace_menu_item,
};
use pos_service::metrics::{error_metrics_mw, metrics_endpoint};
use pos_service::order_handlers::{create_order, get_order, list_orders};
use pos_service::AppState;

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        )
        .init();

    let config = load_pos_config()?;

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db_pool = PgPool::connect(&database_url).await?;
    sqlx::migrate!().run(&db_pool).await?;

    let host = config.host.clone();
    let port = config.port;
    let state = AppState::new(db_pool, config);
    let metrics = state.metrics.clone();

    let allowed_origins = [
        "http://localhost:3000",
        "http://localhost:5173",
    ];
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .route("/healthz", get(health))
        .route("/auth/login", post(login))
        .route("/auth/google", post(google_login))
        .route("/auth/refresh", post(refresh))
        .route(
            "/franchise-admins",
            get(list_franchise_admins).post(create_franchise_admin),
        )
        .route(
            "/franchise-admins/:id",
            get(get_franchise_admin)
                .patch(update_franchise_admin)
                .delete(delete_franchise_admin),
        )
        .route("/staff", get(list_staff).post(create_staff))
        .route(
            "/staff/:id",
            get(get_staff).patch(update_staff).delete(delete_staff),
        )
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/names", get(list_location_names))
        .route(
            "/locations/:id",
            get(get_location)
                .patch(update_location)
                .delete(delete_location),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/menu-items", get(list_menu_items).post(create_menu_item))
        .route(
            "/menu-items/:id",
            get(get_menu_item)
                .put(replace_menu_item)
                .patch(patch_menu_item)
                .delete(delete_menu_item),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(cors);

    let ip: std::net::IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));
    info!(%addr, "starting pos-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod account_handlers;
pub mod app_state;
pub mod auth_handlers;
pub mod category_handlers;
pub mod config;
pub mod location_handlers;
pub mod menu_item_handlers;
pub mod metrics;
pub mod order_handlers;
pub mod validation;

pub use app_state::AppState;

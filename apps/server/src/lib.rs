//! # Taller Server
//!
//! HTTP/JSON API for the workshop inventory and sales ledger.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Browser ──► axum Router ──► handler ──► taller-db ──► SQLite          │
//! │                 │               │                                       │
//! │            TraceLayer       ApiError ──► { code, message, field? }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

use routes::{health, products, stats, transactions};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/api/stats", get(stats::get_stats))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

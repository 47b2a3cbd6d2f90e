//! HTTP API server with observability for the back-office inventory system.
//!
//! Provides REST endpoints for the order lifecycle and the enriched
//! listing, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use catalog::{
    InMemoryItemCatalog, InMemorySupplierDirectory, ItemCatalog, SupplierDirectory,
};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{InMemoryOrderStore, OrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<O, C, S>(state: Arc<AppState<O, C, S>>, metrics_handle: PrometheusHandle) -> Router
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<O, C, S>))
        .route("/orders", get(routes::orders::list::<O, C, S>))
        .route("/orders/{id}", patch(routes::orders::update::<O, C, S>))
        .route("/orders/{id}", delete(routes::orders::remove::<O, C, S>))
        .route("/orders/{id}/arrive", post(routes::orders::arrive::<O, C, S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the in-memory backends.
pub fn create_default_state()
-> Arc<AppState<InMemoryOrderStore, InMemoryItemCatalog, InMemorySupplierDirectory>> {
    Arc::new(AppState::new(
        InMemoryOrderStore::new(),
        InMemoryItemCatalog::new(),
        InMemorySupplierDirectory::new(),
    ))
}

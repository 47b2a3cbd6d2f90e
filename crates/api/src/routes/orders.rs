//! Order lifecycle and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{ItemCatalog, SupplierDirectory};
use common::OrderId;
use lifecycle::OrderLifecycleService;
use orders::{
    ArriveOrder, CreateOrder, CreateOrderInput, Order, OrderStore, UpdateOrder, UpdateOrderInput,
};
use projections::{EnrichmentProjector, OrderListing};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<O, C, S> {
    pub lifecycle: OrderLifecycleService<O, C>,
    pub projector: EnrichmentProjector<O, C, S>,
}

impl<O, C, S> AppState<O, C, S>
where
    O: OrderStore + Clone,
    C: ItemCatalog + Clone,
    S: SupplierDirectory,
{
    /// Builds the state by sharing the stores between the write-side
    /// service and the read-side projector.
    pub fn new(store: O, catalog: C, suppliers: S) -> Self {
        Self {
            lifecycle: OrderLifecycleService::new(store.clone(), catalog.clone()),
            projector: EnrichmentProjector::new(store, catalog, suppliers),
        }
    }
}

// -- Request types --

#[derive(Deserialize, Default)]
pub struct ArriveOrderRequest {
    pub received_by: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: i64,
    pub status: String,
}

// -- Handlers --

/// POST /orders — create a purchase order.
#[tracing::instrument(skip(state, input))]
pub async fn create<O, C, S>(
    State(state): State<Arc<AppState<O, C, S>>>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError>
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    let cmd = CreateOrder::try_new(input)?;
    let order = state.lifecycle.create(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            order_id: order.id.as_i64(),
            status: order.status.to_string(),
        }),
    ))
}

/// PATCH /orders/{id} — apply a partial patch to an order.
#[tracing::instrument(skip(state, input))]
pub async fn update<O, C, S>(
    State(state): State<Arc<AppState<O, C, S>>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateOrderInput>,
) -> Result<Json<Order>, ApiError>
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    let cmd = UpdateOrder::try_new(input)?;
    let order = state.lifecycle.update(OrderId::new(id), cmd).await?;
    Ok(Json(order))
}

/// POST /orders/{id}/arrive — mark an order as arrived.
#[tracing::instrument(skip(state, req))]
pub async fn arrive<O, C, S>(
    State(state): State<Arc<AppState<O, C, S>>>,
    Path(id): Path<i64>,
    Json(req): Json<ArriveOrderRequest>,
) -> Result<Json<Order>, ApiError>
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    let cmd = ArriveOrder::try_new(req.received_by)?;
    let order = state.lifecycle.arrive(OrderId::new(id), cmd).await?;
    Ok(Json(order))
}

/// DELETE /orders/{id} — remove an order. Never reverses stock.
#[tracing::instrument(skip(state))]
pub async fn remove<O, C, S>(
    State(state): State<Arc<AppState<O, C, S>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    state.lifecycle.delete(OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /orders — list orders newest-first, enriched when possible.
///
/// The response is either enriched rows (with `item_display_name` and
/// `supplier_name`) or raw order rows when enrichment is degraded;
/// clients must tolerate both shapes.
#[tracing::instrument(skip(state))]
pub async fn list<O, C, S>(
    State(state): State<Arc<AppState<O, C, S>>>,
) -> Result<Json<OrderListing>, ApiError>
where
    O: OrderStore + 'static,
    C: ItemCatalog + 'static,
    S: SupplierDirectory + 'static,
{
    let listing = state.projector.list_orders().await?;
    Ok(Json(listing))
}

//! Order enrichment projector.

use catalog::{CatalogError, ItemCatalog, SupplierDirectory};
use orders::{Order, OrderStore};
use serde::Serialize;

use crate::Result;

/// An order joined to its human-readable item and supplier names.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: Order,
    /// Catalog name for stock orders, `item_name` for special orders.
    pub item_display_name: Option<String>,
    /// Resolved independently of the item — suppliers can be assigned
    /// directly even on special orders.
    pub supplier_name: Option<String>,
}

/// The two shapes a listing can take. Presentation layers must tolerate
/// both: enrichment degrades to raw rows when the catalog side is down.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderListing {
    Enriched(Vec<EnrichedOrder>),
    Raw(Vec<Order>),
}

impl OrderListing {
    /// Returns the number of orders in the listing.
    pub fn len(&self) -> usize {
        match self {
            OrderListing::Enriched(rows) => rows.len(),
            OrderListing::Raw(rows) => rows.len(),
        }
    }

    /// Returns true if the listing holds no orders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the listing carries enrichment columns.
    pub fn is_enriched(&self) -> bool {
        matches!(self, OrderListing::Enriched(_))
    }
}

/// Builds the enriched order listing.
pub struct EnrichmentProjector<O, C, S> {
    store: O,
    catalog: C,
    suppliers: S,
}

impl<O, C, S> EnrichmentProjector<O, C, S>
where
    O: OrderStore,
    C: ItemCatalog,
    S: SupplierDirectory,
{
    /// Creates a new projector over the given stores.
    pub fn new(store: O, catalog: C, suppliers: S) -> Self {
        Self {
            store,
            catalog,
            suppliers,
        }
    }

    /// Lists all orders newest-first, enriched when possible.
    ///
    /// A missing item or supplier row degrades that one field to its raw
    /// fallback; a failing lookup backend degrades the whole listing to
    /// raw order rows. Only the base order read can fail the call.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<OrderListing> {
        let orders = self.store.list().await?;

        let mut enriched = Vec::with_capacity(orders.len());
        let mut degraded = false;
        for order in &orders {
            match self.enrich(order).await {
                Ok(row) => enriched.push(row),
                Err(err) => {
                    tracing::warn!(
                        order_id = %order.id,
                        error = %err,
                        "enrichment unavailable; serving raw order rows"
                    );
                    degraded = true;
                    break;
                }
            }
        }

        if degraded {
            return Ok(OrderListing::Raw(orders));
        }
        Ok(OrderListing::Enriched(enriched))
    }

    async fn enrich(&self, order: &Order) -> std::result::Result<EnrichedOrder, CatalogError> {
        let item_display_name = if order.special_order {
            order.item_name.clone()
        } else if let Some(item_id) = order.item_id {
            self.catalog
                .get(order.item_type, item_id)
                .await?
                .map(|item| item.name)
                .or_else(|| order.item_name.clone())
        } else {
            order.item_name.clone()
        };

        let supplier_name = match order.supplier_id {
            Some(supplier_id) => self
                .suppliers
                .get(supplier_id)
                .await?
                .map(|supplier| supplier.name),
            None => None,
        };

        Ok(EnrichedOrder {
            order: order.clone(),
            item_display_name,
            supplier_name,
        })
    }
}

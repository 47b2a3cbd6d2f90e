//! Typed lifecycle commands with pure validating constructors.
//!
//! Raw request shapes (`*Input`) deserialize leniently; the `try_new`
//! constructors enforce the request contract and produce canonical,
//! already-normalized commands. No command can be constructed from
//! invalid input.

use chrono::{DateTime, NaiveDate, Utc};
use common::{ItemId, ItemType, SupplierId};
use serde::{Deserialize, Deserializer};

use crate::error::ValidationError;
use crate::record::{NewOrder, OrderPatch};
use crate::status::OrderStatus;

/// Distinguishes an absent patch field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match value {
        None => Ok(None),
        // Empty string coerced to null, matching the request contract.
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::new(field, "must be an ISO date (YYYY-MM-DD)")),
    }
}

fn parse_po_number(value: Option<String>) -> Result<String, ValidationError> {
    let po_number = value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::new("po_number", "is required and must not be empty"))?;
    Ok(po_number)
}

// -- Create --

/// Raw create-order request as received on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderInput {
    pub item_type: Option<String>,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    pub supplier_id: Option<i64>,
    pub po_number: Option<String>,
    pub expected_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub backordered: bool,
    #[serde(default)]
    pub tbd_expected: bool,
    #[serde(default)]
    pub special_order: bool,
    #[serde(default)]
    pub is_return: bool,
    pub deceased_name: Option<String>,
    pub need_by_date: Option<String>,
    pub notes: Option<String>,
}

/// Validated command to create a purchase order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub item_type: ItemType,
    pub item_id: Option<ItemId>,
    pub item_name: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub po_number: String,
    pub expected_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub backordered: bool,
    pub tbd_expected: bool,
    pub special_order: bool,
    pub deceased_name: Option<String>,
    pub need_by_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_return: bool,
}

impl CreateOrder {
    /// Validates and normalizes a raw create request.
    ///
    /// Normalization: `expected_date` is nulled when the date is still
    /// TBD, and `deceased_name` only persists on special orders. When no
    /// initial status is supplied it is derived from the status rule.
    pub fn try_new(input: CreateOrderInput) -> Result<Self, ValidationError> {
        let item_type = input
            .item_type
            .as_deref()
            .and_then(ItemType::parse)
            .ok_or_else(|| ValidationError::new("item_type", "must be \"casket\" or \"urn\""))?;

        let po_number = parse_po_number(input.po_number)?;
        let expected_date = parse_date("expected_date", input.expected_date.as_deref())?;
        let need_by_date = parse_date("need_by_date", input.need_by_date.as_deref())?;

        let status = match input.status.as_deref() {
            None => OrderStatus::derive_active(input.backordered, input.item_name.as_deref()),
            Some(s) => {
                let status = OrderStatus::parse(s).ok_or_else(|| {
                    ValidationError::new(
                        "status",
                        "must be one of PENDING, BACKORDERED, SPECIAL, ARRIVED",
                    )
                })?;
                if !status.allowed_at_creation() {
                    return Err(ValidationError::new(
                        "status",
                        "an order cannot be created as ARRIVED",
                    ));
                }
                status
            }
        };

        Ok(Self {
            item_type,
            item_id: input.item_id.map(ItemId::new),
            item_name: input.item_name,
            supplier_id: input.supplier_id.map(SupplierId::new),
            po_number,
            expected_date: if input.tbd_expected { None } else { expected_date },
            status,
            backordered: input.backordered,
            tbd_expected: input.tbd_expected,
            special_order: input.special_order,
            deceased_name: if input.special_order {
                input.deceased_name
            } else {
                None
            },
            need_by_date,
            notes: input.notes,
            is_return: input.is_return,
        })
    }

    /// Converts the command into an insertable row stamped at `created_at`.
    pub fn into_new_order(self, created_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            item_type: self.item_type,
            item_id: self.item_id,
            item_name: self.item_name,
            supplier_id: self.supplier_id,
            po_number: self.po_number,
            expected_date: self.expected_date,
            status: self.status,
            backordered: self.backordered,
            tbd_expected: self.tbd_expected,
            special_order: self.special_order,
            deceased_name: self.deceased_name,
            need_by_date: self.need_by_date,
            notes: self.notes,
            is_return: self.is_return,
            return_reason: None,
            created_at,
        }
    }
}

// -- Update --

/// Raw update-order patch as received on the wire.
///
/// The double-`Option` fields distinguish "not part of the patch" from an
/// explicit `null` that clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderInput {
    pub po_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub expected_date: Option<Option<String>>,
    pub backordered: Option<bool>,
    pub tbd_expected: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub need_by_date: Option<Option<String>>,
    pub is_return: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub return_reason: Option<Option<String>>,
}

/// Validated partial patch of a purchase order.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrder {
    pub po_number: Option<String>,
    pub expected_date: Option<Option<NaiveDate>>,
    pub backordered: Option<bool>,
    pub tbd_expected: Option<bool>,
    pub need_by_date: Option<Option<NaiveDate>>,
    pub is_return: Option<bool>,
    pub return_reason: Option<Option<String>>,
}

impl UpdateOrder {
    /// Validates a raw patch request.
    pub fn try_new(input: UpdateOrderInput) -> Result<Self, ValidationError> {
        let po_number = match input.po_number {
            None => None,
            Some(value) => Some(parse_po_number(Some(value))?),
        };

        let expected_date = match input.expected_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(s)) => Some(parse_date("expected_date", Some(&s))?),
        };

        let need_by_date = match input.need_by_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(s)) => Some(parse_date("need_by_date", Some(&s))?),
        };

        Ok(Self {
            po_number,
            expected_date,
            backordered: input.backordered,
            tbd_expected: input.tbd_expected,
            need_by_date,
            is_return: input.is_return,
            return_reason: input.return_reason,
        })
    }

    /// Converts the command into a row patch.
    pub fn into_patch(self) -> OrderPatch {
        OrderPatch {
            po_number: self.po_number,
            expected_date: self.expected_date,
            backordered: self.backordered,
            tbd_expected: self.tbd_expected,
            need_by_date: self.need_by_date,
            is_return: self.is_return,
            return_reason: self.return_reason,
            ..OrderPatch::default()
        }
    }
}

// -- Arrive --

/// Validated command to mark a purchase order as arrived.
#[derive(Debug, Clone, Default)]
pub struct ArriveOrder {
    /// Who received the merchandise; when absent the order keeps its
    /// previously recorded receiver.
    pub received_by: Option<String>,
}

impl ArriveOrder {
    /// Validates the receiver name: optional, but never blank.
    pub fn try_new(received_by: Option<String>) -> Result<Self, ValidationError> {
        let received_by = match received_by {
            None => None,
            Some(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ValidationError::new("received_by", "must not be empty"));
                }
                Some(trimmed)
            }
        };
        Ok(Self { received_by })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> CreateOrderInput {
        CreateOrderInput {
            item_type: Some("casket".to_string()),
            po_number: Some("PO-1".to_string()),
            ..CreateOrderInput::default()
        }
    }

    #[test]
    fn create_minimal_is_pending() {
        let cmd = CreateOrder::try_new(minimal_input()).unwrap();
        assert_eq!(cmd.item_type, ItemType::Casket);
        assert_eq!(cmd.po_number, "PO-1");
        assert_eq!(cmd.status, OrderStatus::Pending);
        assert!(!cmd.backordered);
        assert!(!cmd.is_return);
    }

    #[test]
    fn create_requires_item_type() {
        let input = CreateOrderInput {
            item_type: None,
            ..minimal_input()
        };
        let err = CreateOrder::try_new(input).unwrap_err();
        assert_eq!(err.field, "item_type");

        let input = CreateOrderInput {
            item_type: Some("vault".to_string()),
            ..minimal_input()
        };
        assert!(CreateOrder::try_new(input).is_err());
    }

    #[test]
    fn create_requires_po_number() {
        let input = CreateOrderInput {
            po_number: None,
            ..minimal_input()
        };
        let err = CreateOrder::try_new(input).unwrap_err();
        assert_eq!(err.field, "po_number");

        let input = CreateOrderInput {
            po_number: Some("   ".to_string()),
            ..minimal_input()
        };
        assert!(CreateOrder::try_new(input).is_err());
    }

    #[test]
    fn create_rejects_arrived_status() {
        let input = CreateOrderInput {
            status: Some("ARRIVED".to_string()),
            ..minimal_input()
        };
        let err = CreateOrder::try_new(input).unwrap_err();
        assert_eq!(err.field, "status");
    }

    #[test]
    fn create_rejects_unknown_status() {
        let input = CreateOrderInput {
            status: Some("SHIPPED".to_string()),
            ..minimal_input()
        };
        assert!(CreateOrder::try_new(input).is_err());
    }

    #[test]
    fn create_derives_status_when_omitted() {
        let input = CreateOrderInput {
            item_name: Some("Custom Urn".to_string()),
            special_order: true,
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.status, OrderStatus::Special);

        let input = CreateOrderInput {
            backordered: true,
            item_name: Some("Custom Urn".to_string()),
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.status, OrderStatus::Backordered);
    }

    #[test]
    fn create_coerces_empty_date_to_null() {
        let input = CreateOrderInput {
            expected_date: Some("".to_string()),
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.expected_date, None);
    }

    #[test]
    fn create_rejects_malformed_date() {
        let input = CreateOrderInput {
            expected_date: Some("03/01/2024".to_string()),
            ..minimal_input()
        };
        let err = CreateOrder::try_new(input).unwrap_err();
        assert_eq!(err.field, "expected_date");
    }

    #[test]
    fn create_tbd_nulls_expected_date() {
        let input = CreateOrderInput {
            expected_date: Some("2024-03-01".to_string()),
            tbd_expected: true,
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.expected_date, None);
        assert!(cmd.tbd_expected);
    }

    #[test]
    fn create_drops_deceased_name_on_stock_orders() {
        let input = CreateOrderInput {
            deceased_name: Some("Jane Doe".to_string()),
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.deceased_name, None);

        let input = CreateOrderInput {
            special_order: true,
            deceased_name: Some("Jane Doe".to_string()),
            ..minimal_input()
        };
        let cmd = CreateOrder::try_new(input).unwrap();
        assert_eq!(cmd.deceased_name, Some("Jane Doe".to_string()));
    }

    #[test]
    fn update_patch_distinguishes_absent_from_null() {
        let input: UpdateOrderInput =
            serde_json::from_value(serde_json::json!({ "expected_date": null })).unwrap();
        let cmd = UpdateOrder::try_new(input).unwrap();
        assert_eq!(cmd.expected_date, Some(None));
        assert_eq!(cmd.need_by_date, None);

        let input: UpdateOrderInput =
            serde_json::from_value(serde_json::json!({ "expected_date": "2024-04-01" })).unwrap();
        let cmd = UpdateOrder::try_new(input).unwrap();
        assert_eq!(
            cmd.expected_date,
            Some(NaiveDate::from_ymd_opt(2024, 4, 1))
        );
    }

    #[test]
    fn update_rejects_blank_po_number() {
        let input = UpdateOrderInput {
            po_number: Some("  ".to_string()),
            ..UpdateOrderInput::default()
        };
        let err = UpdateOrder::try_new(input).unwrap_err();
        assert_eq!(err.field, "po_number");
    }

    #[test]
    fn update_empty_patch_is_valid() {
        let cmd = UpdateOrder::try_new(UpdateOrderInput::default()).unwrap();
        assert!(cmd.into_patch().is_empty());
    }

    #[test]
    fn arrive_trims_receiver() {
        let cmd = ArriveOrder::try_new(Some("  Alice  ".to_string())).unwrap();
        assert_eq!(cmd.received_by, Some("Alice".to_string()));

        let cmd = ArriveOrder::try_new(None).unwrap();
        assert_eq!(cmd.received_by, None);
    }

    #[test]
    fn arrive_rejects_blank_receiver() {
        let err = ArriveOrder::try_new(Some("   ".to_string())).unwrap_err();
        assert_eq!(err.field, "received_by");
    }
}

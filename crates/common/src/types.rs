use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row identifier.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying row identifier.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_type! {
    /// Unique identifier for a purchase order row.
    ///
    /// Wraps the backing store's integer key to prevent mixing up
    /// order ids with item or supplier ids.
    OrderId
}

id_type! {
    /// Unique identifier for a stock item row within one catalog kind.
    ItemId
}

id_type! {
    /// Unique identifier for a supplier row.
    SupplierId
}

/// The two kinds of merchandise tracked by the system.
///
/// Every order names exactly one kind; items of different kinds live in
/// separate catalog namespaces even when their ids collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Casket,
    Urn,
}

impl ItemType {
    /// Returns the wire/storage name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Casket => "casket",
            ItemType::Urn => "urn",
        }
    }

    /// Parses a wire/storage name back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "casket" => Some(ItemType::Casket),
            "urn" => Some(ItemType::Urn),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

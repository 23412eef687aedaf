//! Order records and status sentences

use serde::Deserialize;
use serde_json::Number;

const MISSING: &str = "n/a";

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
}

/// Order status with the fields that status carries.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderStatus {
    InTransit {
        eta_days: Option<Number>,
        carrier: Option<String>,
    },
    Delivered {
        delivered_at: Option<String>,
    },
    Processing {
        note: Option<String>,
    },
    /// Any status string the shop does not recognize.
    Unknown { raw: Option<String> },
}

/// Order as stored on disk, keyed by id in the surrounding object.
#[derive(Debug, Deserialize)]
pub(super) struct OrderRecord {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    eta_days: Option<Number>,
    #[serde(default)]
    carrier: Option<String>,
    #[serde(default)]
    delivered_at: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl OrderRecord {
    pub(super) fn into_order(self, id: String) -> Order {
        let status = match self.status.as_deref() {
            Some("in_transit") => OrderStatus::InTransit {
                eta_days: self.eta_days,
                carrier: self.carrier,
            },
            Some("delivered") => OrderStatus::Delivered {
                delivered_at: self.delivered_at,
            },
            Some("processing") => OrderStatus::Processing { note: self.note },
            _ => OrderStatus::Unknown { raw: self.status },
        };
        Order { id, status }
    }
}

/// Status sentence for `id`; `None` means the order does not exist.
pub(super) fn describe(id: &str, order: Option<&Order>) -> String {
    let Some(order) = order else {
        return format!("Order {id} was not found. Please check the order number.");
    };

    match &order.status {
        OrderStatus::InTransit { eta_days, carrier } => format!(
            "Order #{id} is in transit. Estimated delivery: {} day(s). Carrier: {}.",
            eta_days
                .as_ref()
                .map(Number::to_string)
                .unwrap_or_else(|| MISSING.to_string()),
            carrier.as_deref().unwrap_or(MISSING),
        ),
        OrderStatus::Delivered { delivered_at } => format!(
            "Order #{id} was delivered on {}.",
            delivered_at.as_deref().unwrap_or(MISSING)
        ),
        OrderStatus::Processing { note } => match note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => format!(
                "Order #{id} is being processed. {}.",
                note.trim_end_matches('.')
            ),
            _ => format!("Order #{id} is being processed."),
        },
        OrderStatus::Unknown { raw } => {
            tracing::debug!(order_id = id, status = ?raw, "unrecognized order status");
            format!("Unknown status for order #{id}.")
        }
    }
}

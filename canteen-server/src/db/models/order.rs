//! Order Models

use serde::{Deserialize, Serialize};

use crate::utils::time;

/// Order lifecycle status
///
/// Admin-transitionable; any status may follow any other (no transition
/// graph is enforced).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum OrderStatus {
    #[serde(rename = "Awaiting Approval")]
    #[sqlx(rename = "Awaiting Approval")]
    AwaitingApproval,
    #[serde(rename = "Confirmed")]
    #[sqlx(rename = "Confirmed")]
    Confirmed,
    #[serde(rename = "Completed")]
    #[sqlx(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    #[sqlx(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// All valid wire names, used in validation error messages
    pub const VALID: [&'static str; 4] =
        ["Awaiting Approval", "Confirmed", "Completed", "Cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingApproval => "Awaiting Approval",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a status from its wire representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Awaiting Approval" => Some(OrderStatus::AwaitingApproval),
            "Confirmed" => Some(OrderStatus::Confirmed),
            "Completed" => Some(OrderStatus::Completed),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order row matching the `orders` table
///
/// `total_amount` is frozen at placement time; `created_at` is unix millis
/// (UTC); `daily_order_id` restarts at 1 each UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub daily_order_id: i64,
    pub user_id: i64,
    pub total_amount: f64,
    pub created_at: i64,
    pub status: OrderStatus,
}

/// Serialized order line
///
/// Name and price are read live from the referenced menu item at
/// serialization time (not a snapshot); only `total_amount` on the order
/// itself is frozen.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemLine {
    pub menu_item_name: String,
    pub quantity: i64,
    pub price_per_item: f64,
}

/// Fully serialized order as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: i64,
    pub daily_order_id: i64,
    pub total_amount: f64,
    pub order_date: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItemLine>,
}

impl OrderDetail {
    pub fn from_parts(order: Order, items: Vec<OrderItemLine>) -> Self {
        Self {
            order_id: order.id,
            daily_order_id: order.daily_order_id,
            total_amount: order.total_amount,
            order_date: time::millis_to_rfc3339(order.created_at),
            status: order.status,
            items,
        }
    }
}

/// One requested order line
///
/// Both fields are optional so that missing values surface as validation
/// errors naming the offending line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub menu_item_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Place-order request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Option<Vec<OrderLineRequest>>,
}

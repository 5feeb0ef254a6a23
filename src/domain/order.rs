use serde::{Deserialize, Serialize};
use std::fmt;

/// The gateway's order states, normalized from whatever casing the API returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    Completed,
    Failed,
    Cancelled,
    /// Any other state, kept in its normalized (upper-cased) form.
    Unrecognized(String),
}

impl OrderState {
    /// Trims and upper-cases `raw` before matching. A missing state is
    /// `Unrecognized("")`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or_default().trim().to_ascii_uppercase();
        match normalized.as_str() {
            "PENDING" => OrderState::Pending,
            "COMPLETED" => OrderState::Completed,
            "FAILED" => OrderState::Failed,
            "CANCELLED" => OrderState::Cancelled,
            _ => OrderState::Unrecognized(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderState::Pending => "PENDING",
            OrderState::Completed => "COMPLETED",
            OrderState::Failed => "FAILED",
            OrderState::Cancelled => "CANCELLED",
            OrderState::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Revolut order as returned by `GET /api/orders/{id}` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Deprecated by API version 2024-09-01 in favour of `token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Minor units.
    #[serde(default)]
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl GatewayOrder {
    pub fn state(&self) -> OrderState {
        OrderState::normalize(self.state.as_deref())
    }

    /// Token handed to the checkout widget; falls back to `public_id`.
    pub fn client_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.public_id.as_deref().filter(|t| !t.is_empty()))
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub metadata: OrderMetadata,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OrderMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
}

/// Body of `PATCH /api/orders/{id}` and `POST /api/orders/{id}/refund`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountRequest {
    pub amount: i64,
}

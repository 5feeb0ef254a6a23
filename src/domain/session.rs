use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Keys under which a gateway order id may be stored in session data, in lookup order.
pub const ORDER_ID_KEYS: [&str; 2] = ["id", "order_id"];

/// Provider-specific payload the host stores on a payment session.
///
/// The host treats it as opaque JSON; only the keys below are interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData(pub Map<String, Value>);

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session data for a freshly created gateway order.
    ///
    /// The token is stored as both `public_key` and `token`; storefront
    /// checkout scripts read either.
    pub fn for_order(order_id: &str, token: &str, currency: &str) -> Self {
        let mut data = Self::new();
        data.insert("id", order_id);
        data.insert("public_key", token);
        data.insert("token", token);
        data.insert("currency", currency);
        data
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Non-empty string stored under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn order_id(&self) -> Option<&str> {
        ORDER_ID_KEYS.iter().find_map(|key| self.get_str(key))
    }

    pub fn currency(&self) -> Option<&str> {
        self.get_str("currency")
    }

    pub fn cart_id(&self) -> Option<&str> {
        self.get_str("cart_id")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for SessionData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Local view of a payment session's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Authorized,
    Error,
    Pending,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Authorized => write!(f, "authorized"),
            SessionStatus::Error => write!(f, "error"),
            SessionStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSession {
    pub id: String,
    pub data: SessionData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusOutcome {
    pub status: SessionStatus,
    pub data: SessionData,
}

/// Input to `initiate_payment` and `update_payment`.
///
/// `amount` is in major units, as the host platform stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub currency_code: String,
    pub data: SessionData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> SessionData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_order_id_aliases() {
        assert_eq!(data(json!({"id": "a"})).order_id(), Some("a"));
        assert_eq!(data(json!({"order_id": "b"})).order_id(), Some("b"));
        assert_eq!(data(json!({"id": "", "order_id": "b"})).order_id(), Some("b"));
        assert_eq!(data(json!({"id": 7})).order_id(), None);
        assert_eq!(SessionData::new().order_id(), None);
    }

    #[test]
    fn test_for_order_layout() {
        let data = SessionData::for_order("ord_1", "tok_1", "GBP");
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"id": "ord_1", "public_key": "tok_1", "token": "tok_1", "currency": "GBP"})
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(SessionStatus::Authorized).unwrap(),
            json!("authorized")
        );
        assert_eq!(SessionStatus::Pending.to_string(), "pending");
    }
}

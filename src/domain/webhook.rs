use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// Fields that may carry the event name, in lookup order.
pub const EVENT_FIELD_ALIASES: [&str; 3] = ["event", "event_type", "type"];

/// Fields that may carry the gateway order id, in lookup order.
pub const ORDER_ID_FIELD_ALIASES: [&str; 2] = ["order_id", "id"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    OrderCompleted,
    OrderAuthorised,
    Other(String),
}

impl WebhookEvent {
    /// Matches the vendor event names exactly; anything else is `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ORDER_COMPLETED" => WebhookEvent::OrderCompleted,
            "ORDER_AUTHORISED" => WebhookEvent::OrderAuthorised,
            _ => WebhookEvent::Other(raw.to_string()),
        }
    }

    /// Whether the event should trigger a state lookup.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            WebhookEvent::OrderCompleted | WebhookEvent::OrderAuthorised
        )
    }
}

/// The parts of a webhook delivery the provider cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookNotification {
    pub event: Option<WebhookEvent>,
    pub order_id: Option<String>,
}

fn first_string<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    })
}

/// Extracts the event and order id using the alias lists above.
///
/// Fails only when `payload` is not a JSON object.
pub fn normalize(payload: &Value) -> Result<WebhookNotification> {
    let object = payload.as_object().ok_or_else(|| {
        PaymentError::InvalidInput("webhook payload must be a JSON object".to_string())
    })?;

    Ok(WebhookNotification {
        event: first_string(object, &EVENT_FIELD_ALIASES).map(WebhookEvent::parse),
        order_id: first_string(object, &ORDER_ID_FIELD_ALIASES).map(str::to_string),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    Authorized,
    Failed,
    NotSupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookData {
    pub session_id: String,
    /// Major units.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResult {
    pub action: WebhookAction,
    pub data: WebhookData,
}

impl WebhookResult {
    pub fn new(action: WebhookAction, session_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            action,
            data: WebhookData {
                session_id: session_id.into(),
                amount,
            },
        }
    }

    pub fn not_supported(session_id: impl Into<String>) -> Self {
        Self::new(WebhookAction::NotSupported, session_id, Decimal::ZERO)
    }

    pub fn failed() -> Self {
        Self::new(WebhookAction::Failed, String::new(), Decimal::ZERO)
    }
}

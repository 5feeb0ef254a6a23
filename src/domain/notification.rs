use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Email templates known to the notification provider, selected by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailTemplate {
    InviteUser,
    OrderPlaced,
    OrderNotification,
    CustomerWelcome,
    AuthPasswordForgotReset,
    AuthPasswordReset,
}

impl EmailTemplate {
    pub const ALL: [EmailTemplate; 6] = [
        EmailTemplate::InviteUser,
        EmailTemplate::OrderPlaced,
        EmailTemplate::OrderNotification,
        EmailTemplate::CustomerWelcome,
        EmailTemplate::AuthPasswordForgotReset,
        EmailTemplate::AuthPasswordReset,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EmailTemplate::InviteUser => "invite-user",
            EmailTemplate::OrderPlaced => "order-placed",
            EmailTemplate::OrderNotification => "order-notification",
            EmailTemplate::CustomerWelcome => "customer-welcome",
            EmailTemplate::AuthPasswordForgotReset => "auth-password-forgot-reset",
            EmailTemplate::AuthPasswordReset => "auth-password-reset",
        }
    }

    /// Dotted paths that must be present in the template payload.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EmailTemplate::InviteUser => &["inviteLink"],
            EmailTemplate::OrderPlaced => &["order", "shippingAddress"],
            EmailTemplate::OrderNotification => &["order", "customerDetails", "shippingAddress"],
            EmailTemplate::CustomerWelcome => &[
                "customer.first_name",
                "customer.last_name",
                "customer.email",
            ],
            EmailTemplate::AuthPasswordForgotReset | EmailTemplate::AuthPasswordReset => {
                &["customer.email", "token"]
            }
        }
    }

    /// Checks that `data` carries every field the template renders.
    pub fn validate(&self, data: &Value) -> Result<()> {
        let missing = self
            .required_fields()
            .iter()
            .find(|path| lookup(data, path).is_none());

        match missing {
            Some(path) => Err(PaymentError::InvalidInput(format!(
                "Invalid data for template \"{}\": missing {}",
                self.key(),
                path
            ))),
            None => Ok(()),
        }
    }
}

fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(data, |node, segment| node.as_object()?.get(segment))
}

impl fmt::Display for EmailTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EmailTemplate {
    type Err = PaymentError;

    fn from_str(key: &str) -> Result<Self> {
        EmailTemplate::ALL
            .into_iter()
            .find(|template| template.key() == key)
            .ok_or_else(|| PaymentError::InvalidInput(format!("Unknown template key: \"{key}\"")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
}

/// A message handed to the notification service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub to: String,
    pub channel: Channel,
    #[serde(serialize_with = "serialize_template")]
    pub template: EmailTemplate,
    pub data: Value,
}

fn serialize_template<S>(template: &EmailTemplate, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(template.key())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderAddress {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub current_order_total: Decimal,
}

/// An order loaded with its items, summary and shipping address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub display_id: u64,
    pub email: String,
    pub currency_code: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub summary: OrderSummary,
    #[serde(default)]
    pub shipping_address: Option<OrderAddress>,
}

/// Payload of `order.placed` and `customer.created`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityEvent {
    pub id: String,
}

/// Payload of `auth.password_reset`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PasswordResetEvent {
    /// The email address the reset was requested for.
    pub entity_id: String,
    pub token: String,
    #[serde(default)]
    pub actor_type: Option<String>,
}

impl PasswordResetEvent {
    pub const LOGGED_IN_CUSTOMER: &'static str = "logged-in-customer";

    pub fn template(&self) -> EmailTemplate {
        if self.actor_type.as_deref() == Some(Self::LOGGED_IN_CUSTOMER) {
            EmailTemplate::AuthPasswordReset
        } else {
            EmailTemplate::AuthPasswordForgotReset
        }
    }
}

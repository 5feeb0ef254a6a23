use super::notification::{CustomerRecord, Notification, OrderRecord};
use super::order::{AmountRequest, CreateOrderRequest, GatewayOrder};
use super::session::{PaymentRequest, PaymentSession, SessionData, StatusOutcome};
use super::webhook::WebhookResult;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

/// The remote payment gateway's order API.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError>;
    async fn retrieve_order(&self, order_id: &str) -> std::result::Result<GatewayOrder, GatewayError>;
    async fn update_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError>;
    async fn refund_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<SessionData, GatewayError>;
    async fn cancel_order(&self, order_id: &str) -> std::result::Result<SessionData, GatewayError>;
}

/// Payment session lifecycle as driven by the host commerce platform.
///
/// Operations that return plain values rather than `Result` never fail; they
/// degrade to a valid answer instead.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn identifier(&self) -> &'static str;
    async fn initiate_payment(&self, request: PaymentRequest) -> Result<PaymentSession>;
    async fn update_payment(&self, request: PaymentRequest) -> Result<PaymentSession>;
    async fn retrieve_payment(&self, data: &SessionData) -> Result<GatewayOrder>;
    async fn authorize_payment(&self, data: SessionData) -> Result<StatusOutcome>;
    async fn capture_payment(&self, data: SessionData) -> Result<SessionData>;
    async fn refund_payment(&self, data: SessionData, amount: Decimal) -> Result<SessionData>;
    async fn cancel_payment(&self, data: SessionData) -> Result<SessionData>;
    async fn delete_payment(&self, data: SessionData) -> SessionData;
    async fn get_payment_status(&self, data: SessionData) -> StatusOutcome;
    async fn get_webhook_action_and_data(&self, payload: &Value) -> WebhookResult;
}

#[async_trait]
pub trait CustomerQuery: Send + Sync {
    async fn customer_by_id(&self, id: &str) -> Result<Option<CustomerRecord>>;
    async fn customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>>;
}

#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Loads the order with its items, summary and shipping address.
    async fn order_by_id(&self, id: &str) -> Result<Option<OrderRecord>>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn create_notification(&self, notification: Notification) -> Result<()>;
}

pub type OrderGatewayBox = Box<dyn OrderGateway>;
pub type CustomerQueryRef = Arc<dyn CustomerQuery>;
pub type OrderQueryRef = Arc<dyn OrderQuery>;
pub type NotificationServiceRef = Arc<dyn NotificationService>;

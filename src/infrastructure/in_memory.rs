use crate::domain::notification::{CustomerRecord, Notification, OrderRecord};
use crate::domain::order::{AmountRequest, CreateOrderRequest, GatewayOrder};
use crate::domain::ports::{CustomerQuery, NotificationService, OrderGateway, OrderQuery};
use crate::domain::session::SessionData;
use crate::error::{GatewayError, PaymentError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    Create,
    Retrieve,
    Update,
    Refund,
    Cancel,
}

/// A scripted stand-in for the Revolut order API.
///
/// Orders live in an `Arc<RwLock<HashMap<..>>>`, so clones share state and a
/// test can keep a handle after giving one to the provider. Each operation can
/// be made to fail, and every call is recorded.
#[derive(Default, Clone)]
pub struct InMemoryGateway {
    orders: Arc<RwLock<HashMap<String, GatewayOrder>>>,
    failures: Arc<RwLock<HashMap<GatewayOperation, GatewayError>>>,
    calls: Arc<RwLock<Vec<(GatewayOperation, String)>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, order: GatewayOrder) {
        self.orders.write().await.insert(order.id.clone(), order);
    }

    pub async fn order(&self, order_id: &str) -> Option<GatewayOrder> {
        self.orders.read().await.get(order_id).cloned()
    }

    pub async fn set_state(&self, order_id: &str, state: &str) {
        if let Some(order) = self.orders.write().await.get_mut(order_id) {
            order.state = Some(state.to_string());
        }
    }

    /// Makes every subsequent call to `operation` fail with `error`.
    pub async fn fail(&self, operation: GatewayOperation, error: GatewayError) {
        self.failures.write().await.insert(operation, error);
    }

    pub async fn calls(&self) -> Vec<(GatewayOperation, String)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self, operation: GatewayOperation) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    async fn enter(
        &self,
        operation: GatewayOperation,
        target: &str,
    ) -> std::result::Result<(), GatewayError> {
        self.calls
            .write()
            .await
            .push((operation, target.to_string()));
        match self.failures.read().await.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found(order_id: &str) -> GatewayError {
        GatewayError::Http {
            status: 404,
            code: "not_found".to_string(),
            message: format!("Order {order_id} not found"),
        }
    }
}

fn session_data(value: serde_json::Value) -> SessionData {
    match value {
        serde_json::Value::Object(map) => SessionData(map),
        _ => SessionData::new(),
    }
}

#[async_trait]
impl OrderGateway for InMemoryGateway {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        self.enter(GatewayOperation::Create, &request.currency).await?;
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let order = GatewayOrder {
            id: format!("ord_{n}"),
            token: Some(format!("tok_{n}")),
            public_id: None,
            state: Some("PENDING".to_string()),
            amount: request.amount,
            currency: Some(request.currency.clone()),
        };
        self.insert_order(order.clone()).await;
        Ok(order)
    }

    async fn retrieve_order(&self, order_id: &str) -> std::result::Result<GatewayOrder, GatewayError> {
        self.enter(GatewayOperation::Retrieve, order_id).await?;
        self.order(order_id)
            .await
            .ok_or_else(|| Self::not_found(order_id))
    }

    async fn update_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        self.enter(GatewayOperation::Update, order_id).await?;
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| Self::not_found(order_id))?;
        order.amount = request.amount;
        Ok(order.clone())
    }

    async fn refund_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<SessionData, GatewayError> {
        self.enter(GatewayOperation::Refund, order_id).await?;
        let order = self
            .order(order_id)
            .await
            .ok_or_else(|| Self::not_found(order_id))?;
        Ok(session_data(json!({
            "id": format!("ref_{order_id}"),
            "type": "refund",
            "state": "COMPLETED",
            "amount": request.amount,
            "currency": order.currency,
        })))
    }

    async fn cancel_order(&self, order_id: &str) -> std::result::Result<SessionData, GatewayError> {
        self.enter(GatewayOperation::Cancel, order_id).await?;
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| Self::not_found(order_id))?;
        order.state = Some("CANCELLED".to_string());
        serde_json::to_value(&*order)
            .map(session_data)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Customers and orders kept in memory, queried by id or email.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    customers: Arc<RwLock<HashMap<String, CustomerRecord>>>,
    orders: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(&self, customer: CustomerRecord) {
        self.customers
            .write()
            .await
            .insert(customer.id.clone(), customer);
    }

    pub async fn add_order(&self, order: OrderRecord) {
        self.orders.write().await.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl CustomerQuery for InMemoryDirectory {
    async fn customer_by_id(&self, id: &str) -> Result<Option<CustomerRecord>> {
        Ok(self.customers.read().await.get(id).cloned())
    }

    async fn customer_by_email(&self, email: &str) -> Result<Option<CustomerRecord>> {
        let customers = self.customers.read().await;
        Ok(customers
            .values()
            .find(|customer| customer.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl OrderQuery for InMemoryDirectory {
    async fn order_by_id(&self, id: &str) -> Result<Option<OrderRecord>> {
        Ok(self.orders.read().await.get(id).cloned())
    }
}

/// Notification service that keeps every delivered message.
///
/// `fail_for` makes deliveries to one recipient fail, which is how tests
/// exercise the per-event failure policies.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    failing_recipient: Arc<RwLock<Option<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_for(&self, recipient: &str) {
        *self.failing_recipient.write().await = Some(recipient.to_string());
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn create_notification(&self, notification: Notification) -> Result<()> {
        if self.failing_recipient.read().await.as_deref() == Some(notification.to.as_str()) {
            return Err(PaymentError::Notification(format!(
                "mailbox {} rejected the message",
                notification.to
            )));
        }
        notification.template.validate(&notification.data)?;
        self.sent.write().await.push(notification);
        Ok(())
    }
}

//! Handlers for commerce events that send transactional email.
//!
//! Each subscriber resolves one record, builds a template payload and hands it
//! to the notification service. Whether a delivery failure reaches the caller
//! depends on the event: checkout must not fail because of an email, while the
//! password reset flow needs to know the mail never went out.

use crate::config::NotificationSettings;
use crate::domain::notification::{
    Channel, CustomerRecord, EmailTemplate, EntityEvent, Notification, OrderAddress, OrderRecord,
    PasswordResetEvent,
};
use crate::domain::ports::{CustomerQueryRef, NotificationServiceRef, OrderQueryRef};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const CUSTOMER_CREATED: &str = "customer.created";
pub const ORDER_PLACED: &str = "order.placed";
pub const PASSWORD_RESET: &str = "auth.password_reset";

#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Name of the event this subscriber listens to.
    fn event(&self) -> &'static str;
    async fn handle(&self, data: Value) -> Result<()>;
}

fn email(to: String, template: EmailTemplate, data: Value) -> Notification {
    Notification {
        to,
        channel: Channel::Email,
        template,
        data,
    }
}

/// Sends the welcome email when a customer registers.
pub struct CustomerCreatedSubscriber {
    customers: CustomerQueryRef,
    notifications: NotificationServiceRef,
    settings: NotificationSettings,
}

impl CustomerCreatedSubscriber {
    pub fn new(
        customers: CustomerQueryRef,
        notifications: NotificationServiceRef,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            customers,
            notifications,
            settings,
        }
    }

    fn welcome(&self, customer: &CustomerRecord) -> Notification {
        email(
            customer.email.clone(),
            EmailTemplate::CustomerWelcome,
            json!({
                "emailOptions": {
                    "replyTo": self.settings.info_email,
                    "subject": format!("Welcome to {}!", self.settings.store_name),
                },
                "customer": customer,
                "preview": "We're thrilled to have you with us!",
            }),
        )
    }
}

#[async_trait]
impl Subscriber for CustomerCreatedSubscriber {
    fn event(&self) -> &'static str {
        CUSTOMER_CREATED
    }

    async fn handle(&self, data: Value) -> Result<()> {
        let event: EntityEvent = serde_json::from_value(data)?;
        let customer = self
            .customers
            .customer_by_id(&event.id)
            .await?
            .ok_or_else(|| PaymentError::RecordNotFound {
                entity: "customer",
                key: event.id.clone(),
            })?;

        match self.notifications.create_notification(self.welcome(&customer)).await {
            Ok(()) => info!(customer_id = %customer.id, "Welcome email sent"),
            Err(e) => error!(customer_id = %customer.id, error = %e, "Welcome email failed"),
        }
        Ok(())
    }
}

/// Sends the order confirmation to the customer and an alert to the store admin.
pub struct OrderPlacedSubscriber {
    orders: OrderQueryRef,
    notifications: NotificationServiceRef,
    settings: NotificationSettings,
}

impl OrderPlacedSubscriber {
    pub fn new(
        orders: OrderQueryRef,
        notifications: NotificationServiceRef,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            orders,
            notifications,
            settings,
        }
    }

    fn confirmation(&self, order: &OrderRecord, address: &OrderAddress) -> Notification {
        email(
            order.email.clone(),
            EmailTemplate::OrderPlaced,
            json!({
                "emailOptions": {
                    "replyTo": self.settings.info_email,
                    "subject": "Your order has been placed",
                },
                "order": order,
                "shippingAddress": address,
                "preview": "Thank you for your order!",
            }),
        )
    }

    fn admin_alert(&self, order: &OrderRecord, address: &OrderAddress) -> Notification {
        email(
            self.settings.admin_email.clone(),
            EmailTemplate::OrderNotification,
            json!({
                "emailOptions": {
                    "replyTo": order.email,
                    "subject": format!("New Order #{} Received", order.display_id),
                },
                "order": order,
                "customerDetails": {
                    "email": order.email,
                    "phone": address.phone,
                },
                "shippingAddress": address,
                "preview": "New Order Received!",
            }),
        )
    }

    async fn send_all(&self, order: &OrderRecord, address: &OrderAddress) -> Result<()> {
        self.notifications
            .create_notification(self.confirmation(order, address))
            .await?;
        self.notifications
            .create_notification(self.admin_alert(order, address))
            .await
    }
}

#[async_trait]
impl Subscriber for OrderPlacedSubscriber {
    fn event(&self) -> &'static str {
        ORDER_PLACED
    }

    async fn handle(&self, data: Value) -> Result<()> {
        let event: EntityEvent = serde_json::from_value(data)?;
        let order = self
            .orders
            .order_by_id(&event.id)
            .await?
            .ok_or_else(|| PaymentError::RecordNotFound {
                entity: "order",
                key: event.id.clone(),
            })?;
        let address = order
            .shipping_address
            .clone()
            .ok_or_else(|| PaymentError::RecordNotFound {
                entity: "shipping address for order",
                key: order.id.clone(),
            })?;

        match self.send_all(&order, &address).await {
            Ok(()) => info!(order_id = %order.id, display_id = order.display_id, "Order notifications sent"),
            Err(e) => error!(order_id = %order.id, error = %e, "Error sending order notifications"),
        }
        Ok(())
    }
}

/// Sends the password reset link. Delivery failures are returned to the caller.
pub struct PasswordResetSubscriber {
    customers: CustomerQueryRef,
    notifications: NotificationServiceRef,
    settings: NotificationSettings,
}

impl PasswordResetSubscriber {
    pub fn new(
        customers: CustomerQueryRef,
        notifications: NotificationServiceRef,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            customers,
            notifications,
            settings,
        }
    }
}

#[async_trait]
impl Subscriber for PasswordResetSubscriber {
    fn event(&self) -> &'static str {
        PASSWORD_RESET
    }

    async fn handle(&self, data: Value) -> Result<()> {
        let event: PasswordResetEvent = serde_json::from_value(data)?;
        // An unknown address still gets the mail, addressed by email only.
        let customer = self.customers.customer_by_email(&event.entity_id).await?;
        let (first_name, last_name) = customer
            .as_ref()
            .map(|c| (c.first_name.clone(), c.last_name.clone()))
            .unwrap_or_default();
        let to = customer
            .map(|c| c.email)
            .unwrap_or_else(|| event.entity_id.clone());

        let notification = email(
            to,
            event.template(),
            json!({
                "emailOptions": {
                    "subject": "Reset Your Password",
                    "replyTo": self.settings.support_email,
                },
                "customer": {
                    "email": event.entity_id,
                    "first_name": first_name,
                    "last_name": last_name,
                },
                "token": event.token,
                "preview": "Reset Your Password",
            }),
        );

        self.notifications
            .create_notification(notification)
            .await
            .inspect_err(|e| error!(error = %e, "Error sending password reset email"))
    }
}

/// Routes host events to the subscribers registered for them.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: HashMap<&'static str, Vec<Arc<dyn Subscriber>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the customer, order and password reset subscribers.
    pub fn with_defaults(
        customers: CustomerQueryRef,
        orders: OrderQueryRef,
        notifications: NotificationServiceRef,
        settings: NotificationSettings,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CustomerCreatedSubscriber::new(
            customers.clone(),
            notifications.clone(),
            settings.clone(),
        )));
        registry.register(Arc::new(OrderPlacedSubscriber::new(
            orders,
            notifications.clone(),
            settings.clone(),
        )));
        registry.register(Arc::new(PasswordResetSubscriber::new(
            customers,
            notifications,
            settings,
        )));
        registry
    }

    pub fn register(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers
            .entry(subscriber.event())
            .or_default()
            .push(subscriber);
    }

    pub fn events(&self) -> Vec<&'static str> {
        let mut events: Vec<_> = self.subscribers.keys().copied().collect();
        events.sort_unstable();
        events
    }

    /// Runs the subscribers for `event` in registration order, stopping at the
    /// first error. Events nobody listens to are ignored.
    pub async fn dispatch(&self, event: &str, data: Value) -> Result<()> {
        let Some(subscribers) = self.subscribers.get(event) else {
            debug!(event, "No subscriber registered");
            return Ok(());
        };
        for subscriber in subscribers {
            subscriber.handle(data.clone()).await?;
        }
        Ok(())
    }
}

mod common;

use medusa_revolut::application::subscribers::{
    CUSTOMER_CREATED, ORDER_PLACED, PASSWORD_RESET, SubscriberRegistry,
};
use medusa_revolut::config::NotificationSettings;
use medusa_revolut::domain::notification::EmailTemplate;
use medusa_revolut::error::{ErrorKind, PaymentError};
use medusa_revolut::infrastructure::in_memory::{InMemoryDirectory, RecordingNotifier};
use serde_json::json;
use std::sync::Arc;

async fn setup() -> (SubscriberRegistry, InMemoryDirectory, RecordingNotifier) {
    let directory = InMemoryDirectory::new();
    let notifier = RecordingNotifier::new();
    let shared = Arc::new(directory.clone());
    let registry = SubscriberRegistry::with_defaults(
        shared.clone(),
        shared,
        Arc::new(notifier.clone()),
        NotificationSettings::default(),
    );
    (registry, directory, notifier)
}

#[tokio::test]
async fn test_customer_created_sends_welcome() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_customer(common::customer("cus_1", "jane@example.com"))
        .await;

    registry
        .dispatch(CUSTOMER_CREATED, json!({"id": "cus_1"}))
        .await
        .unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].template, EmailTemplate::CustomerWelcome);
    assert_eq!(sent[0].data["emailOptions"]["subject"], "Welcome to Britblooms!");
    assert_eq!(sent[0].data["emailOptions"]["replyTo"], "info@britblooms.com");
    assert_eq!(sent[0].data["customer"]["first_name"], "Jane");
}

#[tokio::test]
async fn test_customer_created_swallows_delivery_failure() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_customer(common::customer("cus_1", "jane@example.com"))
        .await;
    notifier.fail_for("jane@example.com").await;

    registry
        .dispatch(CUSTOMER_CREATED, json!({"id": "cus_1"}))
        .await
        .unwrap();
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_customer_created_for_unknown_customer() {
    let (registry, _, _) = setup().await;
    let err = registry
        .dispatch(CUSTOMER_CREATED, json!({"id": "cus_404"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_order_placed_notifies_customer_then_admin() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_order(common::order("order_1", "jane@example.com"))
        .await;

    registry
        .dispatch(ORDER_PLACED, json!({"id": "order_1"}))
        .await
        .unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].template, EmailTemplate::OrderPlaced);
    assert_eq!(sent[0].data["emailOptions"]["subject"], "Your order has been placed");
    assert_eq!(sent[0].data["shippingAddress"]["city"], "London");

    assert_eq!(sent[1].to, "support@britblooms.com");
    assert_eq!(sent[1].template, EmailTemplate::OrderNotification);
    assert_eq!(sent[1].data["emailOptions"]["subject"], "New Order #1042 Received");
    assert_eq!(sent[1].data["emailOptions"]["replyTo"], "jane@example.com");
    assert_eq!(sent[1].data["customerDetails"]["phone"], "+447700900123");
}

#[tokio::test]
async fn test_order_placed_never_fails_checkout_on_email_errors() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_order(common::order("order_1", "jane@example.com"))
        .await;
    notifier.fail_for("jane@example.com").await;

    registry
        .dispatch(ORDER_PLACED, json!({"id": "order_1"}))
        .await
        .unwrap();

    // The first failure stops the sequence, so the admin is not alerted either.
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_order_placed_admin_failure_keeps_customer_mail() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_order(common::order("order_1", "jane@example.com"))
        .await;
    notifier.fail_for("support@britblooms.com").await;

    registry
        .dispatch(ORDER_PLACED, json!({"id": "order_1"}))
        .await
        .unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, EmailTemplate::OrderPlaced);
}

#[tokio::test]
async fn test_order_without_shipping_address() {
    let (registry, directory, _) = setup().await;
    let mut order = common::order("order_1", "jane@example.com");
    order.shipping_address = None;
    directory.add_order(order).await;

    let err = registry
        .dispatch(ORDER_PLACED, json!({"id": "order_1"}))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::RecordNotFound { .. }));
}

#[tokio::test]
async fn test_password_reset_for_logged_in_customer() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_customer(common::customer("cus_1", "jane@example.com"))
        .await;

    registry
        .dispatch(
            PASSWORD_RESET,
            json!({
                "entity_id": "jane@example.com",
                "token": "reset_tok",
                "actor_type": "logged-in-customer",
            }),
        )
        .await
        .unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, EmailTemplate::AuthPasswordReset);
    assert_eq!(sent[0].data["token"], "reset_tok");
    assert_eq!(sent[0].data["customer"]["last_name"], "Doe");
    assert_eq!(sent[0].data["emailOptions"]["replyTo"], "support@britblooms.com");
}

#[tokio::test]
async fn test_password_reset_for_unknown_address() {
    let (registry, _, notifier) = setup().await;

    registry
        .dispatch(
            PASSWORD_RESET,
            json!({"entity_id": "new@example.com", "token": "t", "actor_type": "customer"}),
        )
        .await
        .unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent[0].to, "new@example.com");
    assert_eq!(sent[0].template, EmailTemplate::AuthPasswordForgotReset);
    assert!(sent[0].data["customer"]["first_name"].is_null());
}

#[tokio::test]
async fn test_password_reset_propagates_delivery_failure() {
    let (registry, directory, notifier) = setup().await;
    directory
        .add_customer(common::customer("cus_1", "jane@example.com"))
        .await;
    notifier.fail_for("jane@example.com").await;

    let err = registry
        .dispatch(
            PASSWORD_RESET,
            json!({"entity_id": "jane@example.com", "token": "t"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Notification(_)));
}

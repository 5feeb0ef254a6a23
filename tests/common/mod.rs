#![allow(dead_code)]

use medusa_revolut::application::revolut::RevolutPaymentProvider;
use medusa_revolut::config::ProviderOptions;
use medusa_revolut::domain::notification::{
    CustomerRecord, OrderAddress, OrderItem, OrderRecord, OrderSummary,
};
use medusa_revolut::infrastructure::in_memory::InMemoryGateway;
use rust_decimal_macros::dec;

pub fn provider(gateway: &InMemoryGateway) -> RevolutPaymentProvider {
    RevolutPaymentProvider::new(
        Box::new(gateway.clone()),
        ProviderOptions::default().with_api_key("sk_test"),
    )
}

pub fn customer(id: &str, email: &str) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        email: email.to_string(),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
    }
}

pub fn order(id: &str, email: &str) -> OrderRecord {
    OrderRecord {
        id: id.to_string(),
        display_id: 1042,
        email: email.to_string(),
        currency_code: "gbp".to_string(),
        created_at: Some("2026-10-19T10:00:00Z".to_string()),
        items: vec![OrderItem {
            id: "item_1".to_string(),
            title: "Spring Bouquet".to_string(),
            quantity: 2,
            unit_price: dec!(35.00),
        }],
        summary: OrderSummary {
            current_order_total: dec!(74.99),
        },
        shipping_address: Some(OrderAddress {
            id: "addr_1".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            address_1: Some("1 Flower Street".to_string()),
            city: Some("London".to_string()),
            postal_code: Some("E1 6AN".to_string()),
            country_code: Some("gb".to_string()),
            phone: Some("+447700900123".to_string()),
            ..Default::default()
        }),
    }
}

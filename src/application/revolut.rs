use crate::config::ProviderOptions;
use crate::domain::money::{FALLBACK_CURRENCY, from_minor_units, to_minor_units};
use crate::domain::order::{
    AmountRequest, CreateOrderRequest, GatewayOrder, OrderMetadata, OrderState,
};
use crate::domain::policy::{lenient_authorization, status_from_state, strict_capture};
use crate::domain::ports::{OrderGatewayBox, PaymentProvider};
use crate::domain::session::{
    PaymentRequest, PaymentSession, SessionData, SessionStatus, StatusOutcome,
};
use crate::domain::webhook::{self, WebhookAction, WebhookResult};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Payment provider backed by Revolut Merchant orders.
///
/// Every operation is a single pass over the gateway; state lives in the
/// gateway and in the session data the host hands back on each call.
pub struct RevolutPaymentProvider {
    gateway: OrderGatewayBox,
    options: ProviderOptions,
}

impl RevolutPaymentProvider {
    pub const IDENTIFIER: &'static str = "revolut";

    pub fn new(gateway: OrderGatewayBox, options: ProviderOptions) -> Self {
        Self { gateway, options }
    }

    fn require_order_id<'a>(data: &'a SessionData, operation: &str) -> Result<&'a str> {
        data.order_id().ok_or_else(|| {
            PaymentError::InvalidInput(format!(
                "Revolut order ID is missing from payment session data; cannot {operation} payment"
            ))
        })
    }

    async fn patch_amount(&self, order_id: &str, request: &PaymentRequest) -> Result<()> {
        let amount = to_minor_units(request.amount, &request.currency_code)?;
        self.gateway
            .update_order(order_id, &AmountRequest { amount })
            .await
            .map_err(|e| PaymentError::gateway("Failed to update Revolut order", e))?;
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for RevolutPaymentProvider {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    async fn initiate_payment(&self, request: PaymentRequest) -> Result<PaymentSession> {
        if !self.options.has_api_key() {
            return Err(PaymentError::Misconfigured(
                "Revolut API key is not configured. Please set REVOLUT_SECRET_KEY environment variable."
                    .to_string(),
            ));
        }

        let currency = request.currency_code.trim().to_ascii_uppercase();
        let body = CreateOrderRequest {
            amount: to_minor_units(request.amount, &currency)?,
            currency: currency.clone(),
            metadata: OrderMetadata {
                cart_id: request.data.cart_id().map(str::to_string),
            },
        };

        let order = self.gateway.create_order(&body).await.map_err(|e| {
            error!(error = %e, status = ?e.status(), "Revolut order creation failed");
            PaymentError::gateway("Failed to create Revolut order", e)
        })?;

        let token = order.client_token().ok_or_else(|| {
            PaymentError::UnexpectedState(
                "Order created but token is missing from response".to_string(),
            )
        })?;

        info!(order_id = %order.id, amount = body.amount, %currency, "Revolut order created");
        Ok(PaymentSession {
            id: order.id.clone(),
            data: SessionData::for_order(&order.id, token, &currency),
        })
    }

    async fn update_payment(&self, request: PaymentRequest) -> Result<PaymentSession> {
        let Some(order_id) = request.data.order_id().map(str::to_string) else {
            return self.initiate_payment(request).await;
        };

        match self.patch_amount(&order_id, &request).await {
            Ok(()) => Ok(PaymentSession {
                id: order_id,
                data: request.data,
            }),
            Err(e) => {
                warn!(%order_id, error = %e, "Revolut order update failed, creating a new order");
                self.initiate_payment(request).await
            }
        }
    }

    async fn retrieve_payment(&self, data: &SessionData) -> Result<GatewayOrder> {
        let order_id = Self::require_order_id(data, "retrieve")?;
        self.gateway
            .retrieve_order(order_id)
            .await
            .map_err(|e| PaymentError::gateway("Failed to retrieve Revolut order", e))
    }

    async fn authorize_payment(&self, data: SessionData) -> Result<StatusOutcome> {
        let order_id = Self::require_order_id(&data, "authorize")?;

        let state = match self.gateway.retrieve_order(order_id).await {
            Ok(order) => Some(order.state()),
            Err(e) => {
                warn!(%order_id, error = %e, "Could not retrieve Revolut order; deferring to webhook");
                None
            }
        };

        let status = lenient_authorization(state.as_ref());
        debug!(%order_id, ?state, %status, "Revolut authorization");
        Ok(StatusOutcome { status, data })
    }

    async fn capture_payment(&self, data: SessionData) -> Result<SessionData> {
        let order_id = Self::require_order_id(&data, "capture")?;

        let order = self
            .gateway
            .retrieve_order(order_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PaymentError::NotFound(order_id.to_string())
                } else {
                    PaymentError::gateway("Failed to capture Revolut payment", e)
                }
            })?;

        if let Err(e) = strict_capture(&order) {
            error!(%order_id, state = ?order.state, "Revolut order not completed");
            return Err(e);
        }

        info!(%order_id, "Revolut payment captured");
        Ok(data)
    }

    async fn refund_payment(&self, data: SessionData, amount: Decimal) -> Result<SessionData> {
        let order_id = Self::require_order_id(&data, "refund")?;
        let currency = data.currency().unwrap_or(FALLBACK_CURRENCY);
        let amount = to_minor_units(amount, currency)?;

        let refund = self
            .gateway
            .refund_order(order_id, &AmountRequest { amount })
            .await
            .map_err(|e| PaymentError::gateway("Failed to refund Revolut payment", e))?;

        info!(%order_id, amount, %currency, "Revolut refund issued");
        Ok(refund)
    }

    async fn cancel_payment(&self, data: SessionData) -> Result<SessionData> {
        let Some(order_id) = data.order_id() else {
            return Ok(data);
        };

        self.gateway
            .cancel_order(order_id)
            .await
            .map_err(|e| PaymentError::gateway("Failed to cancel Revolut order", e))
    }

    async fn delete_payment(&self, data: SessionData) -> SessionData {
        if let Some(order_id) = data.order_id()
            && let Err(e) = self.gateway.cancel_order(order_id).await
        {
            warn!(%order_id, error = %e, "Revolut cancel failed while deleting session; ignoring");
        }
        data
    }

    async fn get_payment_status(&self, data: SessionData) -> StatusOutcome {
        let status = match data.order_id() {
            Some(order_id) => match self.gateway.retrieve_order(order_id).await {
                Ok(order) => status_from_state(&order.state()),
                Err(e) => {
                    warn!(%order_id, error = %e, "Revolut status lookup failed");
                    SessionStatus::Error
                }
            },
            None => SessionStatus::Error,
        };
        StatusOutcome { status, data }
    }

    async fn get_webhook_action_and_data(&self, payload: &Value) -> WebhookResult {
        let notification = match webhook::normalize(payload) {
            Ok(notification) => notification,
            Err(e) => {
                error!(error = %e, "Revolut webhook could not be processed");
                return WebhookResult::failed();
            }
        };

        let Some(order_id) = notification.order_id else {
            error!(%payload, "Revolut webhook is missing order_id");
            return WebhookResult::not_supported("");
        };

        let event = match notification.event {
            Some(event) if event.is_supported() => event,
            other => {
                info!(%order_id, event = ?other, "Ignoring unsupported Revolut webhook event");
                return WebhookResult::not_supported(order_id);
            }
        };

        let order = match self.gateway.retrieve_order(&order_id).await {
            Ok(order) => order,
            Err(e) => {
                error!(%order_id, error = %e, "Revolut webhook could not fetch order");
                return WebhookResult::not_supported(order_id);
            }
        };

        let currency = order.currency.as_deref().unwrap_or(FALLBACK_CURRENCY);
        let amount = from_minor_units(order.amount, currency);
        let action = match order.state() {
            OrderState::Completed => WebhookAction::Authorized,
            OrderState::Failed => WebhookAction::Failed,
            _ => WebhookAction::NotSupported,
        };

        info!(%order_id, ?event, ?action, %amount, "Revolut webhook processed");
        WebhookResult::new(action, order_id, amount)
    }
}

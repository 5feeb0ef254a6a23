//! Decisions about how gateway order states translate into local outcomes.
//!
//! Authorization is lenient: unless the gateway explicitly reports a failed or
//! cancelled order, the session is treated as authorized and final confirmation
//! is left to the webhook. Capture is strict: funds are only considered final
//! once the gateway reports the order as completed.

use super::order::{GatewayOrder, OrderState};
use super::session::SessionStatus;
use crate::error::{PaymentError, Result};

/// Status reported by `authorize`. `None` means the order could not be fetched.
pub fn lenient_authorization(state: Option<&OrderState>) -> SessionStatus {
    match state {
        Some(OrderState::Failed | OrderState::Cancelled) => SessionStatus::Error,
        Some(_) | None => SessionStatus::Authorized,
    }
}

/// Succeeds only when `order` is `COMPLETED`.
pub fn strict_capture(order: &GatewayOrder) -> Result<()> {
    match order.state() {
        OrderState::Completed => Ok(()),
        observed => Err(PaymentError::StateMismatch {
            order_id: order.id.clone(),
            observed: observed.to_string(),
        }),
    }
}

/// Status reported by `get_payment_status`.
pub fn status_from_state(state: &OrderState) -> SessionStatus {
    match state {
        OrderState::Completed => SessionStatus::Authorized,
        OrderState::Failed => SessionStatus::Error,
        _ => SessionStatus::Pending,
    }
}

use thiserror::Error;

/// Coarse classification of a [`PaymentError`].
///
/// Hosts use this to decide whether a failure is the caller's fault, a setup
/// problem, or something the gateway reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Misconfiguration,
    InvalidInput,
    NotFound,
    UnexpectedState,
}

/// Transport-level failure talking to the payment gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The gateway answered with a non-success status.
    #[error("{message} (code: {code}, status: {status})")]
    Http {
        status: u16,
        code: String,
        message: String,
    },
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment provider is misconfigured: {0}")]
    Misconfigured(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("gateway order {0} not found")]
    NotFound(String),
    #[error(
        "gateway order {order_id} is in {observed} state; payment must be COMPLETED to be captured"
    )]
    StateMismatch { order_id: String, observed: String },
    #[error("unexpected gateway state: {0}")]
    UnexpectedState(String),
    #[error("{context}: {source}")]
    Gateway {
        context: &'static str,
        #[source]
        source: GatewayError,
    },
    #[error("{entity} {key} not found")]
    RecordNotFound { entity: &'static str, key: String },
    #[error("notification delivery failed: {0}")]
    Notification(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PaymentError {
    pub fn gateway(context: &'static str, source: GatewayError) -> Self {
        PaymentError::Gateway { context, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::Misconfigured(_) => ErrorKind::Misconfiguration,
            PaymentError::InvalidInput(_) | PaymentError::JsonError(_) => ErrorKind::InvalidInput,
            PaymentError::NotFound(_) | PaymentError::RecordNotFound { .. } => ErrorKind::NotFound,
            PaymentError::StateMismatch { .. }
            | PaymentError::UnexpectedState(_)
            | PaymentError::Gateway { .. }
            | PaymentError::Notification(_) => ErrorKind::UnexpectedState,
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;

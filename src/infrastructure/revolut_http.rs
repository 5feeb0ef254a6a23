use crate::config::ProviderOptions;
use crate::domain::order::{AmountRequest, CreateOrderRequest, GatewayOrder};
use crate::domain::ports::OrderGateway;
use crate::domain::session::SessionData;
use crate::error::{GatewayError, PaymentError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

const API_VERSION_HEADER: HeaderName = HeaderName::from_static("revolut-api-version");

/// Error body returned by the Merchant API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> String {
        match &self.code {
            Some(Value::String(code)) => code.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// HTTP client for the Revolut Merchant order API.
///
/// Every request carries the bearer key and the `Revolut-Api-Version` header.
pub struct RevolutClient {
    client: Client,
    base_url: String,
}

impl RevolutClient {
    /// Builds a client from the provider options.
    ///
    /// A missing API key is allowed here; the provider reports it when a
    /// payment is initiated.
    pub fn new(options: &ProviderOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = options.api_key.as_deref().filter(|key| !key.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                PaymentError::Misconfigured("API key contains invalid characters".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        let version = HeaderValue::from_str(&options.api_version).map_err(|_| {
            PaymentError::Misconfigured(format!("invalid API version {}", options.api_version))
        })?;
        headers.insert(API_VERSION_HEADER, version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()
            .map_err(|e| PaymentError::Misconfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: options.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> std::result::Result<Vec<u8>, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if status.is_success() {
            debug!(%url, status = status.as_u16(), "Revolut request succeeded");
            return Ok(body.to_vec());
        }

        let error: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
        let message = error.message.clone().unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown Revolut error")
                .to_string()
        });
        warn!(%url, status = status.as_u16(), code = %error.code(), %message, "Revolut API error");
        Err(GatewayError::Http {
            status: status.as_u16(),
            code: error.code(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, GatewayError> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Like `fetch`, but an empty body yields empty session data.
    async fn fetch_data(&self, request: RequestBuilder) -> std::result::Result<SessionData, GatewayError> {
        let body = self.execute(request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(SessionData::new());
        }
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OrderGateway for RevolutClient {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        self.fetch(self.client.post(self.url("/api/orders")).json(request))
            .await
    }

    async fn retrieve_order(&self, order_id: &str) -> std::result::Result<GatewayOrder, GatewayError> {
        self.fetch(self.client.get(self.url(&format!("/api/orders/{order_id}"))))
            .await
    }

    async fn update_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        self.fetch(
            self.client
                .patch(self.url(&format!("/api/orders/{order_id}")))
                .json(request),
        )
        .await
    }

    async fn refund_order(
        &self,
        order_id: &str,
        request: &AmountRequest,
    ) -> std::result::Result<SessionData, GatewayError> {
        self.fetch_data(
            self.client
                .post(self.url(&format!("/api/orders/{order_id}/refund")))
                .json(request),
        )
        .await
    }

    async fn cancel_order(&self, order_id: &str) -> std::result::Result<SessionData, GatewayError> {
        self.fetch_data(
            self.client
                .post(self.url(&format!("/api/orders/{order_id}/cancel"))),
        )
        .await
    }
}

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://merchant.revolut.com";
pub const DEFAULT_API_VERSION: &str = "2024-09-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options for the Revolut payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOptions {
    /// Merchant secret key. The provider refuses to create orders without it.
    pub api_key: Option<String>,
    pub production_url: Option<String>,
    pub sandbox_url: Option<String>,
    /// Sent as the `Revolut-Api-Version` header.
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            production_url: None,
            sandbox_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderOptions {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_sandbox_url(mut self, url: impl Into<String>) -> Self {
        self.sandbox_url = Some(url.into());
        self
    }

    /// Production URL, then sandbox URL, then the public merchant endpoint.
    pub fn base_url(&self) -> &str {
        self.production_url
            .as_deref()
            .or(self.sandbox_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Addresses and wording used by the notification subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub store_name: String,
    /// Reply-to for customer-facing mail.
    pub info_email: String,
    /// Reply-to for account mail.
    pub support_email: String,
    /// Recipient of new-order alerts.
    pub admin_email: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            store_name: "Britblooms".to_string(),
            info_email: "info@britblooms.com".to_string(),
            support_email: "support@britblooms.com".to_string(),
            admin_email: "support@britblooms.com".to_string(),
        }
    }
}

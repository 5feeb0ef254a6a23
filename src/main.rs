use clap::{Parser, Subcommand};
use medusa_revolut::application::revolut::RevolutPaymentProvider;
use medusa_revolut::config::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS, ProviderOptions};
use medusa_revolut::domain::ports::PaymentProvider;
use medusa_revolut::domain::session::SessionData;
use medusa_revolut::infrastructure::revolut_http::RevolutClient;
use medusa_revolut::interfaces::json::payload_reader::PayloadReader;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Operate Revolut payment sessions", long_about = None)]
struct Cli {
    /// Revolut merchant secret key
    #[arg(long, env = "REVOLUT_SECRET_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Production API base URL
    #[arg(long, env = "REVOLUT_PRODUCTION_URL")]
    production_url: Option<String>,

    /// Sandbox API base URL, used when no production URL is set
    #[arg(long, env = "REVOLUT_SANDBOX_URL")]
    sandbox_url: Option<String>,

    /// Value of the Revolut-Api-Version header
    #[arg(long, env = "REVOLUT_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Request timeout in seconds
    #[arg(long, env = "REVOLUT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the session status of a gateway order
    Status { order_id: String },
    /// Verify that a gateway order is completed
    Capture { order_id: String },
    /// Refund part or all of a gateway order
    Refund {
        order_id: String,
        /// Amount in major units, e.g. 12.50
        amount: Decimal,
        #[arg(long, default_value = "GBP")]
        currency: String,
    },
    /// Cancel a gateway order
    Cancel { order_id: String },
    /// Resolve a webhook delivery read from a file, or `-` for stdin
    Webhook { payload: PathBuf },
}

impl Cli {
    fn options(&self) -> ProviderOptions {
        ProviderOptions {
            api_key: self.api_key.clone(),
            production_url: self.production_url.clone(),
            sandbox_url: self.sandbox_url.clone(),
            api_version: self.api_version.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn session(order_id: &str) -> SessionData {
    let mut data = SessionData::new();
    data.insert("id", order_id);
    data
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.options();
    let client = RevolutClient::new(&options).into_diagnostic()?;
    let provider = RevolutPaymentProvider::new(Box::new(client), options);

    match cli.command {
        Command::Status { order_id } => {
            let outcome = provider.get_payment_status(session(&order_id)).await;
            println!("{}", outcome.status);
        }
        Command::Capture { order_id } => {
            let data = provider
                .capture_payment(session(&order_id))
                .await
                .into_diagnostic()?;
            print_json(&data)?;
        }
        Command::Refund {
            order_id,
            amount,
            currency,
        } => {
            let mut data = session(&order_id);
            data.insert("currency", currency);
            let refund = provider
                .refund_payment(data, amount)
                .await
                .into_diagnostic()?;
            print_json(&refund)?;
        }
        Command::Cancel { order_id } => {
            let data = provider
                .cancel_payment(session(&order_id))
                .await
                .into_diagnostic()?;
            print_json(&data)?;
        }
        Command::Webhook { payload } => {
            let payload = if payload.as_os_str() == "-" {
                PayloadReader::new(io::stdin().lock()).payload()
            } else {
                let file = File::open(&payload).into_diagnostic()?;
                PayloadReader::new(file).payload()
            }
            .into_diagnostic()?;
            let result = provider.get_webhook_action_and_data(&payload).await;
            print_json(&result)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_onto_provider_options() {
        let cli = Cli::try_parse_from([
            "medusa-revolut",
            "--api-key",
            "sk_test",
            "--production-url",
            "https://merchant.revolut.com/",
            "--sandbox-url",
            "https://sandbox-merchant.revolut.com",
            "--api-version",
            "2025-01-01",
            "--timeout-secs",
            "5",
            "status",
            "ord_1",
        ])
        .unwrap();

        let options = cli.options();
        assert!(options.has_api_key());
        assert_eq!(options.base_url(), "https://merchant.revolut.com");
        assert_eq!(options.api_version, "2025-01-01");
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

// Nothing listens on the discard port, so every request fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!("medusa-revolut"));
    cmd.env_remove("REVOLUT_PRODUCTION_URL")
        .env("REVOLUT_SECRET_KEY", "sk_test")
        .env("REVOLUT_SANDBOX_URL", UNREACHABLE)
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_webhook_unsupported_event_is_ignored() {
    let mut payload = NamedTempFile::new().unwrap();
    writeln!(payload, r#"{{"event": "ORDER_SHIPPED", "order_id": "ord_1"}}"#).unwrap();

    cli()
        .arg("webhook")
        .arg(payload.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action": "not_supported""#))
        .stdout(predicate::str::contains(r#""session_id": "ord_1""#));
}

#[test]
fn test_webhook_missing_order_id_from_stdin() {
    cli()
        .arg("webhook")
        .arg("-")
        .write_stdin(r#"{"event": "ORDER_COMPLETED"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action": "not_supported""#))
        .stdout(predicate::str::contains(r#""session_id": """#));
}

#[test]
fn test_webhook_unreachable_gateway_is_not_supported() {
    cli()
        .arg("webhook")
        .arg("-")
        .write_stdin(r#"{"event": "ORDER_COMPLETED", "order_id": "ord_1"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action": "not_supported""#));
}

#[test]
fn test_webhook_rejects_malformed_json() {
    cli()
        .arg("webhook")
        .arg("-")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_status_degrades_to_error_when_unreachable() {
    cli()
        .arg("status")
        .arg("ord_1")
        .assert()
        .success()
        .stdout(predicate::str::diff("error\n"));
}

#[test]
fn test_capture_fails_when_unreachable() {
    cli()
        .arg("capture")
        .arg("ord_1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to capture Revolut payment"));
}

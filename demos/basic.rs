//! Basic example demonstrating the RIPS API client.
//!
//! Run with:
//! ```
//! RIPS_BASE_URI=https://api.rips.example RIPS_USERNAME=alice RIPS_PASSWORD=secret \
//!     cargo run --example basic
//! ```
//!
//! Set `RIPS_CLIENT_ID` and `RIPS_TOKEN_FILE` to authenticate with OAuth2.

use ripsapi::{RipsClient, WaitOptions};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> ripsapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Connecting to RIPS...");
    let client = RipsClient::from_env().await?;
    println!("Connected to: {}", client.base_url());

    let status = client.get_status().await?;
    println!("Server version: {:?}", status.version);

    println!("\n--- Applications ---");
    let apps = client.applications.get_all(&[], &Value::Null).await?;
    let apps = apps.as_array().cloned().unwrap_or_default();
    for app in &apps {
        println!("  [{}] {}", app["id"], app["name"]);
    }

    let Some(app_id) = apps.first().and_then(|app| app["id"].as_u64()) else {
        println!("No applications found");
        return Ok(());
    };

    println!("\n--- Finished scans of application {app_id} ---");
    let scans = client
        .scans
        .get_all(&[app_id], &json!({ "equal": { "phase": 0 }, "limit": 5 }))
        .await?;
    let scans = scans.as_array().cloned().unwrap_or_default();
    for scan in &scans {
        println!("  [{}] version {}", scan["id"], scan["version"]);
    }

    if let Some(scan_id) = scans.first().and_then(|scan| scan["id"].as_u64()) {
        client
            .block_until_done(app_id, scan_id, WaitOptions::default())
            .await?;

        let issues = client
            .issues
            .get_all(&[app_id, scan_id], &json!({ "limit": 10 }))
            .await?;
        println!(
            "\nScan {scan_id} has {} issue(s) on the first page",
            issues.as_array().map(Vec::len).unwrap_or(0)
        );
    }

    Ok(())
}

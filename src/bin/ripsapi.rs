//! RIPS API CLI binary.
//!
//! A command-line interface for interacting with the RIPS API.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ripsapi::cli::{query_from_pairs, Cli, Command, ConnectionArgs};
use ripsapi::output::PrettyPrint;
use ripsapi::{resources, AuthHeaders, RipsClient, RipsError, WaitOptions};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match connect(&cli.connection).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, RipsError::ConfigMissing(_)) {
                eprintln!("Hint: Set RIPS_USERNAME and RIPS_PASSWORD (plus RIPS_CLIENT_ID for OAuth2)");
            }
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(args: &ConnectionArgs) -> ripsapi::Result<RipsClient> {
    let config = args.client_config();

    // A pre-issued token or a token cache does not need credentials.
    let needs_credentials = config
        .oauth2
        .as_ref()
        .map(|o| o.access_token().is_none() && o.token_file_path().is_none())
        .unwrap_or(true);

    let username = args.username.clone().unwrap_or_default();
    let password = args.password.clone().unwrap_or_default();
    if needs_credentials && (username.is_empty() || password.is_empty()) {
        return Err(RipsError::ConfigMissing(
            "username and password are required".to_string(),
        ));
    }

    RipsClient::connect(&username, &password, config).await
}

async fn run(client: &RipsClient, command: Command, json: bool) -> ripsapi::Result<()> {
    match command {
        Command::Status => {
            let status = client.get_status().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", status.pretty_print());
            }
        }
        Command::Token => match client.auth_headers() {
            AuthHeaders::Bearer(token) => println!("{token}"),
            AuthHeaders::Basic { username, .. } => {
                println!("basic authentication as {username} (no token)")
            }
        },
        Command::List {
            resource,
            parents,
            query,
        } => {
            let resource = client.resource(lookup(&resource)?);
            let items = resource.get_all(&parents, &query_from_pairs(&query)?).await?;
            output(&items, json)?;
        }
        Command::Get { resource, ids } => {
            let resource = client.resource(lookup(&resource)?);
            let (id, parents) = split_item_id(&ids)?;
            let item = resource.get_by_id(parents, id, &Value::Null).await?;
            output(&item, json)?;
        }
        Command::Delete {
            resource,
            ids,
            all,
            query,
        } => {
            let resource = client.resource(lookup(&resource)?);
            let query = query_from_pairs(&query)?;
            if all {
                resource.delete_all(&ids, &query).await?;
            } else {
                let (id, parents) = split_item_id(&ids)?;
                resource.delete_by_id(parents, id, &query).await?;
            }
            eprintln!("Deleted");
        }
        Command::WaitScan {
            application,
            scan,
            wait,
            sleep,
        } => {
            let options = WaitOptions::new(Duration::from_secs(wait), Duration::from_secs(sleep));
            client.block_until_done(application, scan, options).await?;
            let progress = client.scan_progress(application, scan).await?;
            println!("{}", progress.pretty_print());
        }
        Command::Export {
            application,
            scan,
            format,
            out,
        } => {
            let bytes = client
                .export(application, scan, format, &out, &Value::Null)
                .await?;
            eprintln!("Wrote {} bytes of {} export to {}", bytes, format, out.display());
        }
    }
    Ok(())
}

fn lookup(name: &str) -> ripsapi::Result<ripsapi::ResourceSpec> {
    resources::lookup(name).ok_or_else(|| {
        let known: Vec<&str> = resources::TABLE.iter().map(|(n, _)| *n).collect();
        RipsError::InvalidPath(format!(
            "unknown resource '{name}', expected one of: {}",
            known.join(", ")
        ))
    })
}

fn split_item_id(ids: &[u64]) -> ripsapi::Result<(u64, &[u64])> {
    ids.split_last()
        .map(|(id, parents)| (*id, parents))
        .ok_or_else(|| RipsError::InvalidPath("an item id is required".to_string()))
}

fn output(value: &Value, json: bool) -> ripsapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value.pretty_print());
    }
    Ok(())
}

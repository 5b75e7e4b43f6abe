//! CLI argument parsing tests.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ripsapi::cli::{query_from_pairs, Cli, Command};
use ripsapi::ExportFormat;
use serde_json::json;

#[test]
fn test_cli_parses_status() {
    let cli = Cli::parse_from(["ripsapi", "status"]);

    assert!(!cli.json);
    assert!(matches!(cli.command, Command::Status));
}

#[test]
fn test_cli_json_flag_is_global() {
    let cli = Cli::parse_from(["ripsapi", "list", "applications", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_cli_parses_list_with_parents_and_query() {
    let cli = Cli::parse_from([
        "ripsapi",
        "list",
        "issues",
        "1",
        "7",
        "-q",
        "notEqual[phase]=1",
        "--query",
        "limit=5",
    ]);

    match cli.command {
        Command::List {
            resource,
            parents,
            query,
        } => {
            assert_eq!(resource, "issues");
            assert_eq!(parents, vec![1, 7]);
            assert_eq!(
                query_from_pairs(&query).unwrap(),
                json!({"notEqual": {"phase": "1"}, "limit": "5"})
            );
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_get_requires_ids() {
    let result = Cli::try_parse_from(["ripsapi", "get", "applications"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parses_delete_all() {
    let cli = Cli::parse_from(["ripsapi", "delete", "scans", "3", "--all"]);

    match cli.command {
        Command::Delete {
            resource, ids, all, ..
        } => {
            assert_eq!(resource, "scans");
            assert_eq!(ids, vec![3]);
            assert!(all);
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_cli_parses_wait_scan_defaults() {
    let cli = Cli::parse_from(["ripsapi", "wait-scan", "1", "2"]);

    match cli.command {
        Command::WaitScan {
            application,
            scan,
            wait,
            sleep,
        } => {
            assert_eq!((application, scan), (1, 2));
            assert_eq!(wait, 0);
            assert_eq!(sleep, 5);
        }
        _ => panic!("Expected WaitScan command"),
    }
}

#[test]
fn test_cli_parses_export() {
    let cli = Cli::parse_from([
        "ripsapi", "export", "1", "2", "--format", "jira-csv", "-o", "out.csv",
    ]);

    match cli.command {
        Command::Export {
            format, out, ..
        } => {
            assert_eq!(format, ExportFormat::JiraCsv);
            assert_eq!(out, PathBuf::from("out.csv"));
        }
        _ => panic!("Expected Export command"),
    }
}

#[test]
fn test_cli_rejects_unknown_export_format() {
    let result = Cli::try_parse_from(["ripsapi", "export", "1", "2", "--format", "xml", "-o", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_connection_flags() {
    let cli = Cli::parse_from([
        "ripsapi",
        "--base-uri",
        "https://rips.example/api",
        "--username",
        "alice",
        "--token-file",
        "/tmp/token.json",
        "--store-token",
        "--timeout",
        "30",
        "token",
    ]);

    assert_eq!(cli.connection.username.as_deref(), Some("alice"));

    let config = cli.connection.client_config();
    assert_eq!(config.base_uri, "https://rips.example/api");
    assert_eq!(config.timeout, Duration::from_secs(30));

    let oauth2 = config.oauth2.expect("oauth2 enabled by token flags");
    assert!(oauth2.store_token);
    assert_eq!(oauth2.token_file_path, Some(PathBuf::from("/tmp/token.json")));
}

#[test]
fn test_cli_without_oauth2_flags_uses_basic() {
    let cli = Cli::parse_from(["ripsapi", "--username", "alice", "status"]);
    assert!(cli.connection.client_config().oauth2.is_none());
}

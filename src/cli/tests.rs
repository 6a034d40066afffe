//! Unit tests for CLI commands

use crate::cli::{build_request, Cli, Commands};
use crate::router::InvocationMode;
use clap::Parser;

#[test]
fn test_dispatch_command_defaults() {
    let cli = Cli::try_parse_from(["switchyard", "dispatch", "cache/clear"]).unwrap();

    match cli.command {
        Commands::Dispatch {
            target,
            http,
            method,
            headers,
        } => {
            assert_eq!(target.as_deref(), Some("cache/clear"));
            assert!(!http);
            assert_eq!(method, "GET");
            assert!(headers.is_empty());
        }
        Commands::Routes => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_dispatch_command_with_flags() {
    let cli = Cli::try_parse_from([
        "switchyard",
        "dispatch",
        "--http",
        "-X",
        "post",
        "-H",
        "Authorization: Bearer demo-token",
        "--header",
        "X-Request-Id:01ARZ3NDEKTSV4RRFFQ69G5FAV",
        "/users/7",
    ])
    .unwrap();

    match cli.command {
        Commands::Dispatch {
            target,
            http,
            method,
            headers,
        } => {
            assert_eq!(target.as_deref(), Some("/users/7"));
            assert!(http);
            assert_eq!(method, "post");
            assert_eq!(
                headers,
                vec![
                    ("Authorization".to_string(), "Bearer demo-token".to_string()),
                    ("X-Request-Id".to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string()),
                ]
            );
        }
        Commands::Routes => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_dispatch_without_target() {
    let cli = Cli::try_parse_from(["switchyard", "dispatch"]).unwrap();
    assert!(matches!(cli.command, Commands::Dispatch { target: None, .. }));
}

#[test]
fn test_invalid_header_is_rejected() {
    let result = Cli::try_parse_from(["switchyard", "dispatch", "-H", "no-colon", "/"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["switchyard", "dispatch", "-H", ": value", "/"]);
    assert!(result.is_err());
}

#[test]
fn test_routes_command_with_global_config() {
    let cli = Cli::try_parse_from(["switchyard", "routes", "--config", "app.toml"]).unwrap();
    assert!(matches!(cli.command, Commands::Routes));
    assert_eq!(cli.config.unwrap().to_string_lossy(), "app.toml");
}

#[test]
fn test_unknown_command_fails() {
    assert!(Cli::try_parse_from(["switchyard", "serve"]).is_err());
}

#[test]
fn test_build_cli_request() {
    let request = build_request(Some("cache/clear/"), false, "POST", &[]);
    assert_eq!(request.mode, InvocationMode::Cli);
    // commands always resolve as GET
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/cache/clear");

    let request = build_request(None, false, "GET", &[]);
    assert_eq!(request.path, "/");
}

#[test]
fn test_build_http_request() {
    let headers = vec![("Authorization".to_string(), "Bearer t".to_string())];
    let request = build_request(Some("/users/7?tab=posts"), true, "delete", &headers);
    assert_eq!(request.mode, InvocationMode::Http);
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/users/7");
    assert_eq!(request.header("authorization"), Some("Bearer t"));

    let request = build_request(None, true, "GET", &[]);
    assert_eq!(request.path, "/");
}

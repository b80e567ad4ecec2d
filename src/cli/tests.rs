//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use clap::Parser;
use std::io::Write;

const MANIFEST: &str = r#"
root:
  entries:
    - kind: middleware
      handlers: [auth]
      doc: { security: [{ bearer: [] }] }
    - kind: route
      method: GET
      path: /pets/:id
      handlers: [get_pet]
      doc: { summary: Get a pet }
"#;

fn manifest_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["routetree", "routes", "--manifest", "m.yaml"]).unwrap();
    match cli.command {
        Commands::Routes { manifest, json } => {
            assert_eq!(manifest.to_string_lossy(), "m.yaml");
            assert!(!json);
        }
        _ => panic!("Expected Routes command"),
    }
}

#[test]
fn test_doc_command_with_flags() {
    let cli =
        Cli::try_parse_from(["routetree", "doc", "-m", "m.json", "--yaml", "--config", "c.yaml"])
            .unwrap();
    assert_eq!(cli.config.as_deref().map(|p| p.to_string_lossy().into_owned()), Some("c.yaml".into()));
    match cli.command {
        Commands::Doc { manifest, yaml } => {
            assert_eq!(manifest.to_string_lossy(), "m.json");
            assert!(yaml);
        }
        _ => panic!("Expected Doc command"),
    }
}

#[test]
fn test_manifest_is_required() {
    assert!(Cli::try_parse_from(["routetree", "routes"]).is_err());
}

#[test]
fn test_routes_prints_table() {
    let file = manifest_file();
    let output = run(&["routetree", "routes", "--manifest", file.path().to_str().unwrap()]);
    assert!(output.contains("GET"));
    assert!(output.contains("/pets/{id}"));
    assert!(output.contains("auth -> get_pet"));
}

#[test]
fn test_routes_json_includes_doc() {
    let file = manifest_file();
    let output = run(&[
        "routetree",
        "routes",
        "--manifest",
        file.path().to_str().unwrap(),
        "--json",
    ]);
    let table: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(table[0]["path"], "/pets/{id}");
    assert_eq!(table[0]["doc"]["summary"], "Get a pet");
    assert_eq!(table[0]["doc"]["security"][0]["bearer"], serde_json::json!([]));
}

#[test]
fn test_doc_prints_openapi() {
    let file = manifest_file();
    let output = run(&["routetree", "doc", "--manifest", file.path().to_str().unwrap()]);
    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["paths"]["/pets/{id}"]["get"]["summary"], "Get a pet");
}

#[test]
fn test_missing_manifest_fails() {
    let cli = Cli::try_parse_from(["routetree", "routes", "-m", "/no/such/manifest.yaml"]).unwrap();
    let mut out = Vec::new();
    let err = execute(&cli, &mut out).unwrap_err();
    assert!(err.to_string().contains("Failed to read manifest"));
}

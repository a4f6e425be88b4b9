//! Runs the `synet` binary end to end and checks exit codes and output.

use std::path::PathBuf;
use std::process::{Command, Output};

fn synet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_synet"))
        .args(args)
        .output()
        .expect("synet binary runs")
}

fn fixture(stem: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.join("fixtures")
        .join("credentials")
        .join(format!("{stem}.json"))
        .display()
        .to_string()
}

#[test]
fn validate_all_fixtures_succeeds() {
    let paths: Vec<String> = [
        "identity",
        "gateway-identity",
        "intelligence-authorization",
        "data-asset",
        "network-declaration",
        "routing",
    ]
    .iter()
    .map(|s| fixture(s))
    .collect();
    let mut args = vec!["validate"];
    args.extend(paths.iter().map(String::as_str));

    let out = synet(&args);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("6/6 valid"), "{stdout}");
}

#[test]
fn json_report_carries_the_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gw.json");
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fixture("gateway-authorization")).unwrap())
            .unwrap();
    doc["credentialSubject"]
        .as_object_mut()
        .unwrap()
        .remove("ipPoolId");
    std::fs::write(&path, doc.to_string()).unwrap();

    let out = synet(&["validate", "--json", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report[0]["valid"], false);
    assert_eq!(report[0]["failure"]["rule"], "MissingRequiredField");
    assert_eq!(report[0]["failure"]["path"], "credentialSubject.ipPoolId");
}

#[test]
fn operational_errors_exit_two() {
    let out = synet(&["validate", "/nonexistent/credential.json"]);
    assert_eq!(out.status.code(), Some(2));

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yaml");
    std::fs::write(&config, "timestamps: sometimes\n").unwrap();
    let out = synet(&[
        "--config",
        config.to_str().unwrap(),
        "validate",
        &fixture("identity"),
    ]);
    assert_eq!(out.status.code(), Some(2));

    let out = synet(&["shape", "TicketCredential"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn shape_prints_json_schema() {
    let out = synet(&["shape", "GatewayAuthorizationCredential", "--json-schema"]);
    assert_eq!(out.status.code(), Some(0));
    let schema: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(schema["title"], "GatewayAuthorizationCredential");
}

#[test]
fn classify_credential_file() {
    let out = synet(&["classify", &fixture("ip-pool-asset")]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("IpPoolAssetCredential"), "{stdout}");
}

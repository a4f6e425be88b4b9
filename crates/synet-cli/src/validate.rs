//! # Validate Subcommand
//!
//! Validates credential files with the fail-fast validator and prints one
//! line per file, or a JSON report with `--json`. `--schema` adds the
//! accumulate-all JSON Schema diagnostics for each file.
//!
//! A file that cannot be read or parsed is an operational error and stops
//! the run; a file that parses but fails validation is reported and the
//! run continues.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use synet_core::ValidationFailure;
use synet_schema::{load_document, SchemaValidationError, SchemaValidator, Violation};
use synet_vc::{CredentialType, Validator};

use crate::load_config;

/// Arguments for `synet validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Credential files (`.json`, `.yaml`, `.yml`).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Also run JSON Schema validation and list every violation.
    #[arg(long)]
    pub schema: bool,
}

/// The outcome for one file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// The file validated.
    pub path: PathBuf,
    /// Whether the validator accepted it.
    pub valid: bool,
    /// Credential type, when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<CredentialType>,
    /// Credential id, when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `sha256:<hex>` over the canonical form, when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// The first violated rule, when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ValidationFailure>,
    /// Schema violations, with `--schema`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_violations: Option<Vec<Violation>>,
}

/// Validate every path and collect the reports.
///
/// # Errors
///
/// Operational failures only: an unreadable file, a canonicalization
/// error, a schema that fails to compile.
pub fn validate_paths(
    paths: &[PathBuf],
    validator: &Validator,
    schemas: Option<&SchemaValidator>,
) -> Result<Vec<FileReport>> {
    paths
        .iter()
        .map(|path| validate_file(path, validator, schemas))
        .collect()
}

fn validate_file(
    path: &Path,
    validator: &Validator,
    schemas: Option<&SchemaValidator>,
) -> Result<FileReport> {
    let document = load_document(path)?;
    tracing::info!(path = %path.display(), "validating");

    let mut report = FileReport {
        path: path.to_path_buf(),
        valid: false,
        credential_type: None,
        id: None,
        digest: None,
        failure: None,
        schema_violations: None,
    };

    match validator.validate_credential(&document) {
        Ok(credential) => {
            let digest = credential
                .digest()
                .with_context(|| format!("failed to canonicalize {}", path.display()))?;
            report.valid = true;
            report.credential_type = Some(credential.subject_type());
            report.id = Some(credential.id.clone());
            report.digest = Some(digest.to_string());
        }
        Err(failure) => report.failure = Some(failure),
    }

    if let Some(schemas) = schemas {
        report.schema_violations = Some(match schemas.validate_credential(&document) {
            Ok(_) => Vec::new(),
            Err(SchemaValidationError::ValidationFailed { violations, .. }) => {
                violations.into_inner()
            }
            Err(SchemaValidationError::UnknownCredentialType { tags }) => vec![Violation {
                instance_path: "/type".to_string(),
                schema_path: String::new(),
                message: format!("no schema for credential type tags [{tags}]"),
            }],
            Err(other) => return Err(other.into()),
        });
    }

    Ok(report)
}

fn print_text(report: &FileReport) {
    let path = report.path.display();
    match (&report.failure, &report.credential_type) {
        (None, Some(t)) => println!(
            "OK    {path}  {t}  {}",
            report.id.as_deref().unwrap_or_default()
        ),
        (Some(failure), _) => println!("FAIL  {path}  [{}] {failure}", failure.rule()),
        (None, None) => println!("FAIL  {path}"),
    }
    for v in report.schema_violations.iter().flatten() {
        println!("      schema:{v}");
    }
}

/// Execute `synet validate`.
///
/// Returns exit code 0 when every file is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = load_config(config_path)?;
    let validator = Validator::new(config).context("invalid validator configuration")?;
    let schemas = if args.schema {
        Some(SchemaValidator::new().context("failed to compile credential schemas")?)
    } else {
        None
    };

    let reports = validate_paths(&args.paths, &validator, schemas.as_ref())?;
    let invalid = reports.iter().filter(|r| !r.valid).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_text(report);
        }
        println!("\n{}/{} valid", reports.len() - invalid, reports.len());
    }

    Ok(u8::from(invalid > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synet_core::Rule;

    fn fixture(stem: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/credentials")
            .join(format!("{stem}.json"))
    }

    fn args(paths: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            paths,
            json: true,
            schema: false,
        }
    }

    #[test]
    fn valid_fixture_reports_type_and_digest() {
        let reports = validate_paths(&[fixture("routing")], &Validator::default(), None).unwrap();
        let report = &reports[0];
        assert!(report.valid);
        assert_eq!(report.credential_type, Some(CredentialType::Routing));
        assert!(report.digest.as_deref().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn invalid_file_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(fixture("ip-asset")).unwrap()).unwrap();
        doc["credentialSubject"].as_object_mut().unwrap().remove("ip");
        std::fs::write(&path, doc.to_string()).unwrap();

        let reports = validate_paths(&[path], &Validator::default(), None).unwrap();
        let failure = reports[0].failure.as_ref().unwrap();
        assert_eq!(failure.rule(), Rule::MissingRequiredField);
        assert_eq!(failure.path().to_string(), "credentialSubject.ip");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(run_validate(&args(vec![fixture("identity")]), None).unwrap(), 0);

        let dir = tempfile::tempdir().unwrap();
        let expired = dir.path().join("expired.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(fixture("identity")).unwrap()).unwrap();
        doc["expirationDate"] = doc["issuanceDate"].clone();
        std::fs::write(&expired, doc.to_string()).unwrap();
        assert_eq!(
            run_validate(&args(vec![fixture("identity"), expired]), None).unwrap(),
            1
        );

        // Unreadable input is operational, not a validation verdict.
        assert!(run_validate(&args(vec![dir.path().join("missing.json")]), None).is_err());
    }

    #[test]
    fn config_changes_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("policy.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(fixture("policy")).unwrap()).unwrap();
        doc["credentialSubject"]["verifiableResource"]["mirrors"] =
            serde_json::json!(["https://cdn.example/policy.json"]);
        std::fs::write(&doc_path, doc.to_string()).unwrap();

        let config_path = dir.path().join("validator.yaml");
        std::fs::write(&config_path, "web2_mirrors: reject\n").unwrap();

        assert_eq!(run_validate(&args(vec![doc_path.clone()]), None).unwrap(), 0);
        assert_eq!(
            run_validate(&args(vec![doc_path]), Some(&config_path)).unwrap(),
            1
        );
    }

    #[test]
    fn schema_diagnostics_are_attached() {
        let schemas = SchemaValidator::new().unwrap();
        let reports =
            validate_paths(&[fixture("market-identity")], &Validator::default(), Some(&schemas))
                .unwrap();
        assert_eq!(reports[0].schema_violations.as_deref(), Some(&[][..]));
    }
}

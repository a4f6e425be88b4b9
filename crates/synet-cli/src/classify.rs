//! # Classify Subcommand
//!
//! Infers the credential type of a subject from its fields. Accepts either
//! a bare subject or a full credential (its `credentialSubject` is used and
//! its declared `type` is shown for comparison).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use synet_core::FieldPath;
use synet_schema::load_document;
use synet_vc::{classify, Classification, CredentialType};

/// Arguments for `synet classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// A subject or credential file (`.json`, `.yaml`, `.yml`).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Classification of one document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyReport {
    /// Tags declared in the credential's `type`, if it was a credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared: Option<Vec<CredentialType>>,
    /// The registry's verdict.
    #[serde(flatten)]
    pub classification: Classification,
}

/// Classify a decoded document.
pub fn classify_document(document: &Value) -> ClassifyReport {
    match document.get("credentialSubject") {
        Some(subject) => {
            let declared = document
                .get("type")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .filter_map(CredentialType::parse)
                        .collect()
                });
            ClassifyReport {
                declared,
                classification: classify(subject),
            }
        }
        None => ClassifyReport {
            declared: None,
            classification: classify(document),
        },
    }
}

/// Execute `synet classify`.
///
/// Returns 0 when exactly one variant wins, 1 for a tie or no match.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let document = load_document(&args.path)?;
    let report = classify_document(&document);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match report.classification.resolve(&FieldPath::root()) {
            Ok(t) => println!("{t}"),
            Err(failure) => println!("{failure}"),
        }
        if report.classification.candidates.len() > 1 {
            let all: Vec<&str> = report
                .classification
                .candidates
                .iter()
                .map(CredentialType::as_str)
                .collect();
            println!("  candidates: {}", all.join(", "));
        }
        if let Some(declared) = &report.declared {
            let tags: Vec<&str> = declared.iter().map(CredentialType::as_str).collect();
            println!("  declared:   {}", tags.join(", "));
        }
    }

    Ok(u8::from(report.classification.unique().is_none()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_subject() {
        let report = classify_document(&json!({
            "holder": {"id": "a"},
            "issuedBy": {"id": "b"},
            "networkId": "synet-main"
        }));
        assert!(report.declared.is_none());
        assert_eq!(
            report.classification.unique(),
            Some(CredentialType::GatewayIdentity)
        );
    }

    #[test]
    fn credential_uses_its_subject() {
        let report = classify_document(&json!({
            "type": ["VerifiableCredential", "PolicyCredential"],
            "credentialSubject": {
                "holder": {"id": "a"},
                "issuedBy": {"id": "b"},
                "policyId": "p"
            }
        }));
        assert_eq!(report.declared, Some(vec![CredentialType::Policy]));
        assert_eq!(report.classification.unique(), Some(CredentialType::Policy));
    }

    #[test]
    fn tie_exits_nonzero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tie.yaml");
        std::fs::write(
            &path,
            "holder: {id: a}\nissuedBy: {id: b}\nnetworkId: n\npoolCidr: 10.0.0.0/8\npolicyId: p\n",
        )
        .unwrap();
        let code = run_classify(&ClassifyArgs { path, json: false }).unwrap();
        assert_eq!(code, 1);
    }
}

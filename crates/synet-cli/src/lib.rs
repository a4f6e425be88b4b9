//! # synet-cli: Diagnostic CLI for Synet Credentials
//!
//! The `synet` binary is a thin consumer of `synet-vc` and `synet-schema`.
//! It reads credential files, hands the decoded JSON to the validator, and
//! renders the outcome.
//!
//! ## Subcommands
//!
//! - `synet validate <PATH>...`: fail-fast validation of each file, with
//!   optional accumulate-all schema diagnostics.
//! - `synet classify <PATH>`: infer the credential type of a subject.
//! - `synet shape <TAG>`: print a subject shape or its JSON Schema.
//!
//! ```bash
//! synet validate fixtures/credentials/*.json
//! synet -v validate --json --config validator.yaml cred.json
//! synet shape GatewayAuthorizationCredential --json-schema
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` a document was rejected (or a subject could not be
//! classified unambiguously), `2` operational error: unreadable input,
//! bad configuration, unknown tag on the command line.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return `anyhow::Result<u8>`.
//! - No validation logic here. Everything is delegated to the library crates.

pub mod classify;
pub mod shape;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use synet_vc::ValidatorConfig;

/// Load a validator configuration file, or the defaults when `path` is
/// `None`. YAML and JSON are both accepted (JSON is valid YAML).
pub fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    let Some(path) = path else {
        return Ok(ValidatorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    // An empty file is an empty mapping: all defaults.
    let config: ValidatorConfig = if text.trim().is_empty() {
        ValidatorConfig::default()
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?
    };
    config
        .check()
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(config = ?config, "loaded validator configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synet_vc::{TimestampPolicy, Web2MirrorPolicy};

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), ValidatorConfig::default());
    }

    #[test]
    fn yaml_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validator.yaml");
        std::fs::write(
            &path,
            "timestamps: strict\nweb2_mirrors: reject\ncontent_uri_schemes: [ipfs, ar]\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.timestamps, TimestampPolicy::Strict);
        assert_eq!(config.web2_mirrors, Web2MirrorPolicy::Reject);
        assert_eq!(config.content_uri_schemes, vec!["ipfs", "ar"]);
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), ValidatorConfig::default());
    }

    #[test]
    fn bad_configs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let typo = dir.path().join("typo.yaml");
        std::fs::write(&typo, "web2mirrors: allow\n").unwrap();
        assert!(load_config(Some(&typo)).is_err());

        let inconsistent = dir.path().join("schemes.yaml");
        std::fs::write(&inconsistent, "content_uri_schemes: []\n").unwrap();
        let err = load_config(Some(&inconsistent)).unwrap_err();
        assert!(format!("{err:#}").contains("content_uri_schemes"));

        assert!(load_config(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}

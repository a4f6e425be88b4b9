//! # Validator Configuration
//!
//! Knobs for the policies the data model leaves open. Every field has a
//! default, so an empty document (or `ValidatorConfig::default()`) is a
//! complete configuration. The core never reads files or the environment;
//! loading is the caller's business.

use serde::{Deserialize, Serialize};
use synet_core::{SynetError, Timestamp, TimestampError};

/// How timestamps in credentials are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Any RFC 3339 offset.
    #[default]
    Lenient,
    /// `Z` suffix only.
    Strict,
}

/// What to do with `http`/`https` mirrors on a verifiable resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Web2MirrorPolicy {
    /// Accept silently.
    Allow,
    /// Accept and emit a `tracing` warning.
    #[default]
    Warn,
    /// Reject as `MalformedResource`.
    Reject,
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Timestamp parsing policy.
    pub timestamps: TimestampPolicy,
    /// Web2 mirror handling.
    pub web2_mirrors: Web2MirrorPolicy,
    /// URI schemes accepted for `VerifiableResource.ipfsUri`.
    pub content_uri_schemes: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timestamps: TimestampPolicy::default(),
            web2_mirrors: Web2MirrorPolicy::default(),
            content_uri_schemes: vec!["ipfs".to_string()],
        }
    }
}

impl ValidatorConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// `SynetError::Config` when no content scheme is configured or a scheme
    /// is not a plain URI scheme name.
    pub fn check(&self) -> Result<(), SynetError> {
        if self.content_uri_schemes.is_empty() {
            return Err(SynetError::Config(
                "content_uri_schemes must name at least one scheme".to_string(),
            ));
        }
        for scheme in &self.content_uri_schemes {
            let ok = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !ok {
                return Err(SynetError::Config(format!(
                    "invalid content URI scheme {scheme:?} (write the bare name, e.g. \"ipfs\")"
                )));
            }
        }
        Ok(())
    }

    /// Parse a timestamp under the configured policy.
    pub fn parse_timestamp(&self, s: &str) -> Result<Timestamp, TimestampError> {
        match self.timestamps {
            TimestampPolicy::Lenient => Timestamp::parse_lenient(s),
            TimestampPolicy::Strict => Timestamp::parse(s),
        }
    }

    /// Whether `scheme` is an accepted content address scheme
    /// (case-insensitive).
    pub fn accepts_content_scheme(&self, scheme: &str) -> bool {
        self.content_uri_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.timestamps, TimestampPolicy::Lenient);
        assert_eq!(config.web2_mirrors, Web2MirrorPolicy::Warn);
        assert_eq!(config.content_uri_schemes, vec!["ipfs"]);
        assert!(config.check().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"web2_mirrors": "reject"}"#).unwrap();
        assert_eq!(config.web2_mirrors, Web2MirrorPolicy::Reject);
        assert_eq!(config.content_uri_schemes, vec!["ipfs"]);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = serde_json::from_str::<ValidatorConfig>(r#"{"web2": "allow"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn strict_policy_rejects_offsets() {
        let config = ValidatorConfig {
            timestamps: TimestampPolicy::Strict,
            ..ValidatorConfig::default()
        };
        assert!(config.parse_timestamp("2026-01-01T00:00:00Z").is_ok());
        assert!(config.parse_timestamp("2026-01-01T00:00:00+00:00").is_err());
        assert!(ValidatorConfig::default()
            .parse_timestamp("2026-01-01T00:00:00+00:00")
            .is_ok());
    }

    #[test]
    fn check_rejects_bad_schemes() {
        let empty = ValidatorConfig {
            content_uri_schemes: vec![],
            ..ValidatorConfig::default()
        };
        assert!(matches!(empty.check(), Err(SynetError::Config(_))));

        let with_suffix = ValidatorConfig {
            content_uri_schemes: vec!["ipfs://".to_string()],
            ..ValidatorConfig::default()
        };
        assert!(with_suffix.check().is_err());
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        let config = ValidatorConfig {
            content_uri_schemes: vec!["ipfs".into(), "ar".into()],
            ..ValidatorConfig::default()
        };
        assert!(config.accepts_content_scheme("IPFS"));
        assert!(config.accepts_content_scheme("ar"));
        assert!(!config.accepts_content_scheme("https"));
    }
}

//! # Verifiable Resources
//!
//! Externally stored content proven by a content hash. The resource names
//! one content address (`ipfsUri`), the declared digest, and any number of
//! alternate mirrors.
//!
//! ## Invariant
//!
//! Any mirror's content must hash to `hash`. That check needs the content
//! and belongs to a fetch/verify collaborator; this crate only enforces the
//! digest's well-formedness (see [`crate::normalize`]).
//!
//! Web2 (`http`/`https`) mirrors are discouraged but structurally legal.

use serde::{Deserialize, Serialize};

/// A content-addressed resource descriptor.
///
/// No open extension fields: unknown keys are a `MalformedResource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiableResource {
    /// Primary content address, e.g. `ipfs://bafy...`.
    #[serde(rename = "ipfsUri")]
    pub ipfs_uri: String,

    /// Declared digest: SHA-256 hex or a multihash.
    pub hash: String,

    /// Alternate locations. Always serialized, empty when none.
    #[serde(default)]
    pub mirrors: Vec<String>,
}

impl VerifiableResource {
    /// A resource without mirrors.
    pub fn new(ipfs_uri: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            ipfs_uri: ipfs_uri.into(),
            hash: hash.into(),
            mirrors: Vec::new(),
        }
    }

    /// Add a mirror.
    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirrors.push(mirror.into());
        self
    }

    /// Mirrors served over plain web2 transports.
    pub fn web2_mirrors(&self) -> impl Iterator<Item = &str> {
        self.mirrors
            .iter()
            .map(String::as_str)
            .filter(|m| is_web2_uri(m))
    }
}

/// Returns `true` for `http://` and `https://` URIs (scheme is
/// case-insensitive).
pub fn is_web2_uri(uri: &str) -> bool {
    uri_scheme(uri).is_some_and(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
}

/// The scheme of `scheme://rest`, if the URI has that form.
pub fn uri_scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_mirrors_decode_empty_and_serialize_empty() {
        let raw = json!({"ipfsUri": "ipfs://bafy", "hash": "00"});
        let res: VerifiableResource = serde_json::from_value(raw).unwrap();
        assert!(res.mirrors.is_empty());
        assert_eq!(serde_json::to_value(&res).unwrap()["mirrors"], json!([]));
    }

    #[test]
    fn unknown_keys_rejected() {
        let raw = json!({"ipfsUri": "ipfs://bafy", "hash": "00", "size": 12});
        assert!(serde_json::from_value::<VerifiableResource>(raw).is_err());
    }

    #[test]
    fn web2_detection() {
        let res = VerifiableResource::new("ipfs://bafy", "00")
            .with_mirror("ar://tx")
            .with_mirror("HTTPS://cdn.example/x")
            .with_mirror("http://old.example/x");
        let web2: Vec<_> = res.web2_mirrors().collect();
        assert_eq!(web2, vec!["HTTPS://cdn.example/x", "http://old.example/x"]);
    }

    #[test]
    fn scheme_extraction() {
        assert_eq!(uri_scheme("ipfs://bafy"), Some("ipfs"));
        assert_eq!(uri_scheme("ipns://name"), Some("ipns"));
        assert_eq!(uri_scheme("bafy"), None);
        assert_eq!(uri_scheme("://x"), None);
        assert_eq!(uri_scheme("1pfs://x"), None);
    }
}

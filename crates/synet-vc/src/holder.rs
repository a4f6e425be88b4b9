//! # Holder References
//!
//! A [`SynetHolder`] identifies a party by an opaque id. Subjects embed
//! holders as `holder`, `issuedBy`, `authorizedBy`, `licensedBy`, witnesses
//! and delegation endpoints. Unknown attributes are kept in `extra` and
//! round-trip unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A party referenced by a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynetHolder {
    /// Opaque identifier (usually a DID). Never empty after normalization.
    pub id: String,

    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Attributes outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SynetHolder {
    /// A holder with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_attributes_round_trip() {
        let raw = json!({"id": "did:synet:alice", "name": "Alice", "org": "synthetism"});
        let holder: SynetHolder = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(holder.id, "did:synet:alice");
        assert_eq!(holder.extra.get("org"), Some(&json!("synthetism")));
        assert_eq!(serde_json::to_value(&holder).unwrap(), raw);
    }

    #[test]
    fn name_omitted_when_absent() {
        let holder = SynetHolder::new("did:synet:bob");
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            json!({"id": "did:synet:bob"})
        );
    }
}

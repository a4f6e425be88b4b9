//! # Credential Delegation
//!
//! A time-bounded transfer of rights from one holder to another, carried by
//! asset subjects as `delegated`.
//!
//! `validFrom`/`validUntil` are kept as the issuer wrote them. The ordering
//! invariant `validFrom <= validUntil` applies only when both parse under
//! the validator's [`TimestampPolicy`](crate::config::TimestampPolicy).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use synet_core::Timestamp;

use crate::config::ValidatorConfig;
use crate::holder::SynetHolder;

/// A delegation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDelegation {
    /// Delegation identifier.
    pub id: String,

    /// Who delegated.
    #[serde(rename = "delegatedBy")]
    pub delegated_by: SynetHolder,

    /// Who received the delegation.
    #[serde(rename = "delegatedTo")]
    pub delegated_to: SynetHolder,

    /// Start of the delegation window.
    #[serde(rename = "validFrom")]
    pub valid_from: String,

    /// End of the delegation window.
    #[serde(rename = "validUntil")]
    pub valid_until: String,

    /// Attributes outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CredentialDelegation {
    /// The delegation window, if both bounds parse under `config`.
    pub fn window(&self, config: &ValidatorConfig) -> Option<(Timestamp, Timestamp)> {
        let from = config.parse_timestamp(&self.valid_from).ok()?;
        let until = config.parse_timestamp(&self.valid_until).ok()?;
        Some((from, until))
    }

    /// `false` only when both bounds resolve and `validFrom` is after
    /// `validUntil`. Agrees with the validator run under the same config.
    pub fn is_ordered(&self, config: &ValidatorConfig) -> bool {
        self.window(config)
            .map_or(true, |(from, until)| !from.is_after(&until))
    }
}

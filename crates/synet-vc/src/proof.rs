//! # Proof Envelope
//!
//! The proof attached to a credential. Generating and checking signatures
//! is the job of an external proof service; at this layer the only rule is
//! that `type` names a scheme (present and non-empty).
//!
//! The scheme identifier is an open string rather than an enum: new proof
//! suites appear without a model change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A credential proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// Signature or proof scheme identifier, e.g. `Ed25519Signature2020`.
    #[serde(rename = "type")]
    pub proof_type: String,

    /// Encoded proof value.
    #[serde(rename = "proofValue", default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    /// Creation time as written by the prover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Key reference, usually a DID URL.
    #[serde(
        rename = "verificationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verification_method: Option<String>,

    /// Purpose, e.g. `assertionMethod`.
    #[serde(rename = "proofPurpose", default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    /// Scheme-specific members.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Proof {
    /// A proof carrying only its scheme identifier.
    pub fn new(proof_type: impl Into<String>) -> Self {
        Self {
            proof_type: proof_type.into(),
            proof_value: None,
            created: None,
            verification_method: None,
            proof_purpose: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach a verification method and proof value, as a prover would.
    pub fn signed_by(
        mut self,
        verification_method: impl Into<String>,
        proof_value: impl Into<String>,
    ) -> Self {
        self.verification_method = Some(verification_method.into());
        self.proof_value = Some(proof_value.into());
        self
    }
}

//! # Verifiable Credential Envelope
//!
//! [`SynetVerifiableCredential`] wraps one subject in the W3C-style
//! envelope. It is generic over the subject: the default,
//! [`CredentialSubject`], holds any variant, and [`narrow`] produces an
//! envelope whose subject type is statically known.
//!
//! ## Security Invariants
//!
//! - `Deserialize` routes through the validator. A value of this type
//!   obtained from JSON has passed every envelope, subject, and temporal
//!   check, and its subject is normalized.
//! - The canonical form ([`to_canonical_bytes`]) and the signing input
//!   handed to external provers ([`signing_input`]) are computed through
//!   [`CanonicalBytes::new()`], never raw `serde_json::to_vec()`.
//! - Timestamps keep their source text, so re-serialization reproduces the
//!   bytes a prover signed.
//!
//! [`narrow`]: SynetVerifiableCredential::narrow
//! [`to_canonical_bytes`]: SynetVerifiableCredential::to_canonical_bytes
//! [`signing_input`]: SynetVerifiableCredential::signing_input

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use synet_core::{sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, Timestamp};

use crate::proof::Proof;
use crate::subject::{CredentialSubject, Subject};
use crate::types::CredentialType;

/// The W3C credentials v1 context, listed first in `@context`.
pub const VC_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// The base type every credential carries next to its variant tag.
pub const VC_BASE_TYPE: &str = "VerifiableCredential";

/// The credential issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issuer {
    /// Issuer identifier (usually a DID).
    pub id: String,

    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Issuer {
    /// An issuer with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Optional versioning metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialMeta {
    /// Model version, e.g. `1.0.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Schema URI for the credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A Synet verifiable credential.
///
/// ## Field Naming
///
/// Serde renames map the Rust names to the exact wire names (`@context`,
/// `issuanceDate`, `credentialSubject`, ...). Envelope members outside the
/// known set are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynetVerifiableCredential<S = CredentialSubject> {
    /// JSON-LD contexts, in order.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier.
    pub id: String,

    /// Type tags, in order. Contains exactly one recognized
    /// [`CredentialType`] tag, the one matching the subject.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// The issuer.
    pub issuer: Issuer,

    /// Issuance time.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// Expiry. Strictly after `issuance_date` when present.
    #[serde(rename = "expirationDate", default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,

    /// The claim.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: S,

    /// Proof envelope, produced by an external prover.
    pub proof: Proof,

    /// Versioning metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<CredentialMeta>,

    /// Envelope members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Everything but the subject.
struct EnvelopeParts {
    context: Vec<String>,
    id: String,
    credential_type: Vec<String>,
    issuer: Issuer,
    issuance_date: Timestamp,
    expiration_date: Option<Timestamp>,
    proof: Proof,
    meta: Option<CredentialMeta>,
    extra: BTreeMap<String, Value>,
}

impl<S: Subject> SynetVerifiableCredential<S> {
    /// Assemble a credential with the default context and the type pair
    /// `["VerifiableCredential", <subject tag>]`.
    ///
    /// Nothing is checked here. Issuers run the result through the
    /// validator (or decode it) before relying on it.
    pub fn new(
        id: impl Into<String>,
        issuer: Issuer,
        issuance_date: Timestamp,
        subject: S,
        proof: Proof,
    ) -> Self {
        let tag = subject.credential_type();
        Self {
            context: vec![VC_CONTEXT_V1.to_string()],
            id: id.into(),
            credential_type: vec![VC_BASE_TYPE.to_string(), tag.as_str().to_string()],
            issuer,
            issuance_date,
            expiration_date: None,
            credential_subject: subject,
            proof,
            meta: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the expiry.
    pub fn with_expiration(mut self, expiration_date: Timestamp) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Set the versioning metadata.
    pub fn with_meta(mut self, meta: CredentialMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The subject's credential type.
    pub fn subject_type(&self) -> CredentialType {
        self.credential_subject.credential_type()
    }

    /// Forget the static subject type.
    pub fn widen(self) -> SynetVerifiableCredential<CredentialSubject> {
        let (parts, subject) = self.into_parts();
        SynetVerifiableCredential::from_parts(parts, subject.into_subject())
    }

    /// JCS canonical bytes of the whole credential, proof included.
    pub fn to_canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// JCS canonical bytes of the credential with `proof` removed: the
    /// input an external prover signs and a verifier re-derives.
    pub fn signing_input(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("proof");
        }
        CanonicalBytes::new(&value)
    }

    /// SHA-256 over [`to_canonical_bytes`](Self::to_canonical_bytes).
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.to_canonical_bytes()?))
    }

    fn into_parts(self) -> (EnvelopeParts, S) {
        let Self {
            context,
            id,
            credential_type,
            issuer,
            issuance_date,
            expiration_date,
            credential_subject,
            proof,
            meta,
            extra,
        } = self;
        let parts = EnvelopeParts {
            context,
            id,
            credential_type,
            issuer,
            issuance_date,
            expiration_date,
            proof,
            meta,
            extra,
        };
        (parts, credential_subject)
    }

    fn from_parts(parts: EnvelopeParts, credential_subject: S) -> Self {
        Self {
            context: parts.context,
            id: parts.id,
            credential_type: parts.credential_type,
            issuer: parts.issuer,
            issuance_date: parts.issuance_date,
            expiration_date: parts.expiration_date,
            credential_subject,
            proof: parts.proof,
            meta: parts.meta,
            extra: parts.extra,
        }
    }
}

impl SynetVerifiableCredential<CredentialSubject> {
    /// The envelope with a statically typed subject.
    ///
    /// Returns the credential unchanged if its subject is a different
    /// variant.
    pub fn narrow<T: Subject>(self) -> Result<SynetVerifiableCredential<T>, Self> {
        let (parts, subject) = self.into_parts();
        match T::try_from_subject(subject) {
            Ok(typed) => Ok(SynetVerifiableCredential::from_parts(parts, typed)),
            Err(subject) => Err(Self::from_parts(parts, subject)),
        }
    }
}

impl<'de, S: Subject> Deserialize<'de> for SynetVerifiableCredential<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let credential =
            crate::validate::validate_credential(&raw).map_err(serde::de::Error::custom)?;
        credential.narrow::<S>().map_err(|other| {
            serde::de::Error::custom(format!(
                "credential subject is {}, not the requested variant",
                other.subject_type()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holder::SynetHolder;
    use crate::subject::{IdentitySubject, RoutingSubject};
    use serde_json::json;

    fn identity_vc() -> SynetVerifiableCredential<IdentitySubject> {
        let subject = IdentitySubject {
            holder: SynetHolder::new("did:synet:alice"),
            issued_by: SynetHolder::new("did:synet:root"),
            scope: Some(vec!["network".into()]),
            extra: BTreeMap::new(),
        };
        SynetVerifiableCredential::new(
            "urn:synet:vc:0001",
            Issuer::new("did:synet:root"),
            Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            subject,
            Proof::new("Ed25519Signature2020").signed_by("did:synet:root#key-1", "00"),
        )
    }

    #[test]
    fn new_sets_context_and_type_pair() {
        let vc = identity_vc();
        assert_eq!(vc.context, vec![VC_CONTEXT_V1]);
        assert_eq!(vc.credential_type, vec!["VerifiableCredential", "IdentityCredential"]);
        assert_eq!(vc.subject_type(), CredentialType::Identity);
    }

    #[test]
    fn wire_names() {
        let v = serde_json::to_value(identity_vc()).unwrap();
        assert!(v.get("@context").is_some());
        assert_eq!(v["issuanceDate"], "2026-01-15T12:00:00Z");
        assert_eq!(v["credentialSubject"]["issuedBy"]["id"], "did:synet:root");
        assert_eq!(v["issuer"], json!({"id": "did:synet:root"}));
        assert!(v.get("expirationDate").is_none());
        assert!(v.get("meta").is_none());
    }

    #[test]
    fn signing_input_excludes_proof() {
        let vc = identity_vc();
        let before = vc.signing_input().unwrap();

        let mut resigned = vc.clone();
        resigned.proof = Proof::new("Ed25519Signature2020").signed_by("did:synet:root#key-2", "ff");
        assert_eq!(before, resigned.signing_input().unwrap());
        assert_ne!(vc.digest().unwrap(), resigned.digest().unwrap());
        assert!(!before.as_str().contains("proofValue"));
    }

    #[test]
    fn widen_then_narrow() {
        let vc = identity_vc();
        let wide = vc.clone().widen();
        assert_eq!(wide.subject_type(), CredentialType::Identity);

        let wrong = wide.clone().narrow::<RoutingSubject>().unwrap_err();
        assert_eq!(wrong, wide);
        assert_eq!(wide.narrow::<IdentitySubject>().unwrap(), vc);
    }

    #[test]
    fn deserialize_runs_the_validator() {
        let mut v = serde_json::to_value(identity_vc()).unwrap();
        assert!(serde_json::from_value::<SynetVerifiableCredential>(v.clone()).is_ok());

        v["expirationDate"] = json!("2026-01-15T12:00:00Z");
        let err = serde_json::from_value::<SynetVerifiableCredential>(v).unwrap_err();
        assert!(err.to_string().contains("temporal invariant"), "{err}");
    }

    #[test]
    fn deserialize_into_wrong_static_variant_fails() {
        let v = serde_json::to_value(identity_vc()).unwrap();
        let err = serde_json::from_value::<SynetVerifiableCredential<RoutingSubject>>(v).unwrap_err();
        assert!(err.to_string().contains("IdentityCredential"), "{err}");
    }

    #[test]
    fn canonical_bytes_ignore_key_order() {
        let vc = identity_vc();
        let mut shuffled = serde_json::Map::new();
        let v = serde_json::to_value(&vc).unwrap();
        let object = v.as_object().unwrap();
        for key in object.keys().rev() {
            shuffled.insert(key.clone(), object[key].clone());
        }
        let reparsed: SynetVerifiableCredential<IdentitySubject> =
            serde_json::from_value(Value::Object(shuffled)).unwrap();
        assert_eq!(
            reparsed.to_canonical_bytes().unwrap(),
            vc.to_canonical_bytes().unwrap()
        );
    }
}

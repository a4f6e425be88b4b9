//! # Envelope Validator
//!
//! Turns an untrusted, decoded JSON value into a typed
//! [`SynetVerifiableCredential`] or the first [`ValidationFailure`] it
//! hits. Pure: the only side effect is `tracing` output.
//!
//! ## Check Order
//!
//! 1. Envelope members `@context`, `id`, `type`, `issuer`, `issuer.id`,
//!    `issuanceDate`, `credentialSubject`, `proof` are present, then each
//!    has the right kind.
//! 2. `type` holds exactly one recognized [`CredentialType`] tag. None is
//!    `UnknownCredentialType`; several distinct ones are
//!    `AmbiguousSubjectType`.
//! 3. `credentialSubject` is normalized (see [`crate::normalize`]), then
//!    checked against the registry shape for the tag: required members
//!    first, then the kind of every member present.
//! 4. `expirationDate`, when present, is strictly after `issuanceDate`.
//! 5. `proof.type` is present and non-empty.
//! 6. `meta`, when present, is kind-checked.
//!
//! Validation is fail-fast. Running it on the serialized output of a
//! successful validation returns an equal credential.

use std::sync::OnceLock;

use serde_json::{Map, Value};
use synet_core::{FieldPath, SynetError, Timestamp, ValidationFailure};

use crate::config::{TimestampPolicy, ValidatorConfig};
use crate::credential::{CredentialMeta, Issuer, SynetVerifiableCredential, VC_BASE_TYPE};
use crate::normalize::normalize_subject;
use crate::proof::Proof;
use crate::registry::{FieldKind, SubjectRegistry};
use crate::subject::{CredentialSubject, Subject, TypedSubject};
use crate::types::{CredentialType, Intelligence};

/// Envelope members that must be present, in check order.
const ENVELOPE_REQUIRED: [&str; 7] = [
    "@context",
    "id",
    "type",
    "issuer",
    "issuanceDate",
    "credentialSubject",
    "proof",
];

/// Every envelope member with a dedicated field.
const ENVELOPE_KNOWN: [&str; 9] = [
    "@context",
    "id",
    "type",
    "issuer",
    "issuanceDate",
    "expirationDate",
    "credentialSubject",
    "proof",
    "meta",
];

const PROOF_OPTIONAL_STRINGS: [&str; 4] =
    ["proofValue", "created", "verificationMethod", "proofPurpose"];

const DELEGATION_STRINGS: [&str; 3] = ["id", "validFrom", "validUntil"];

/// Validates credentials and subjects under one configuration.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    registry: &'static SubjectRegistry,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            config: ValidatorConfig::default(),
            registry: SubjectRegistry::global(),
        }
    }
}

impl Validator {
    /// A validator with the given configuration.
    ///
    /// # Errors
    ///
    /// `SynetError::Config` if the configuration is inconsistent.
    pub fn new(config: ValidatorConfig) -> Result<Self, SynetError> {
        config.check()?;
        Ok(Self {
            config,
            registry: SubjectRegistry::global(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a full credential.
    pub fn validate_credential(
        &self,
        value: &Value,
    ) -> Result<SynetVerifiableCredential, ValidationFailure> {
        tracing::debug!("validating credential");
        let result = self.check_credential(value);
        match &result {
            Ok(credential) => tracing::debug!(
                credential_type = %credential.subject_type(),
                id = %credential.id,
                "credential validated"
            ),
            Err(failure) => tracing::debug!(
                rule = %failure.rule(),
                path = %failure.path(),
                "credential rejected"
            ),
        }
        result
    }

    /// Validate a bare subject against the shape of `credential_type`.
    /// Failure paths are relative to the subject.
    pub fn validate_subject(
        &self,
        credential_type: CredentialType,
        subject: &Value,
    ) -> Result<CredentialSubject, ValidationFailure> {
        let path = FieldPath::root();
        let mut subject = subject.clone();
        self.check_subject(credential_type, &mut subject, &path)?;
        typed_subject(credential_type, subject, &path)
    }

    /// Validate a bare subject straight into its concrete record.
    ///
    /// The concrete records' own `Deserialize` is structural only; this is
    /// the checked way to obtain one from untrusted JSON.
    pub fn validate_typed<T: TypedSubject>(&self, subject: &Value) -> Result<T, ValidationFailure> {
        let resolved = self.validate_subject(T::CREDENTIAL_TYPE, subject)?;
        T::try_from_subject(resolved).map_err(|other| ValidationFailure::TypeMismatch {
            path: FieldPath::root(),
            expected: T::CREDENTIAL_TYPE.to_string(),
            found: other.credential_type().to_string(),
        })
    }

    /// Validate a bare subject whose tag may be unknown.
    ///
    /// With `declared` set, this is [`validate_subject`](Self::validate_subject).
    /// Without it, the tag comes from [`crate::registry::classify`].
    pub fn resolve_subject(
        &self,
        subject: &Value,
        declared: Option<CredentialType>,
    ) -> Result<CredentialSubject, ValidationFailure> {
        let credential_type = match declared {
            Some(t) => t,
            None => self.registry.classify(subject).resolve(&FieldPath::root())?,
        };
        tracing::debug!(credential_type = %credential_type, declared = declared.is_some(), "resolving subject");
        self.validate_subject(credential_type, subject)
    }

    fn check_credential(
        &self,
        value: &Value,
    ) -> Result<SynetVerifiableCredential, ValidationFailure> {
        let root = FieldPath::root();
        let envelope = match value {
            Value::Object(envelope) => envelope,
            other => {
                return Err(ValidationFailure::type_mismatch(
                    root,
                    "credential object",
                    other,
                ))
            }
        };

        // (1) presence, then kinds
        for key in ENVELOPE_REQUIRED {
            let member = present(envelope, key).ok_or_else(|| {
                ValidationFailure::MissingRequiredField {
                    path: root.field(key),
                }
            })?;
            if key == "issuer" {
                if let Value::Object(issuer) = member {
                    if present(issuer, "id").is_none() {
                        return Err(ValidationFailure::MissingRequiredField {
                            path: root.field("issuer").field("id"),
                        });
                    }
                }
            }
        }

        let context = string_list(&envelope["@context"], &root.field("@context"))?;
        let id = string(&envelope["id"], &root.field("id"))?;
        let types = string_list(&envelope["type"], &root.field("type"))?;
        let issuer = self.issuer(&envelope["issuer"], &root.field("issuer"))?;
        let issuance_date = self.timestamp(&envelope["issuanceDate"], &root.field("issuanceDate"))?;
        let subject_path = root.field("credentialSubject");
        let mut subject = envelope["credentialSubject"].clone();
        if !subject.is_object() {
            return Err(ValidationFailure::type_mismatch(
                subject_path,
                "subject object",
                &subject,
            ));
        }
        let proof_path = root.field("proof");
        let proof_value = &envelope["proof"];
        let Value::Object(proof_object) = proof_value else {
            return Err(ValidationFailure::type_mismatch(
                proof_path,
                "proof object",
                proof_value,
            ));
        };

        // (2) exactly one recognized tag
        let credential_type = recognized_tag(&types, &root.field("type"))?;

        // (3) subject
        self.check_subject(credential_type, &mut subject, &subject_path)?;
        let credential_subject = typed_subject(credential_type, subject, &subject_path)?;

        // (4) expiry after issuance
        let expiration_path = root.field("expirationDate");
        let expiration_date = match present(envelope, "expirationDate") {
            None => None,
            Some(v) => Some(self.timestamp(v, &expiration_path)?),
        };
        if let Some(expiration) = &expiration_date {
            if !expiration.is_after(&issuance_date) {
                return Err(ValidationFailure::TemporalInvariantViolation {
                    path: expiration_path,
                    reason: format!(
                        "expirationDate {expiration} is not after issuanceDate {issuance_date}"
                    ),
                });
            }
        }

        // (5) proof scheme
        let proof = proof_envelope(proof_object, &proof_path)?;

        // (6) meta
        let meta = match present(envelope, "meta") {
            None => None,
            Some(v) => Some(meta(v, &root.field("meta"))?),
        };

        let extra = envelope
            .iter()
            .filter(|(k, _)| !ENVELOPE_KNOWN.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(SynetVerifiableCredential {
            context,
            id,
            credential_type: types,
            issuer,
            issuance_date,
            expiration_date,
            credential_subject,
            proof,
            meta,
            extra,
        })
    }

    /// Normalize `subject` in place and check it against the shape.
    fn check_subject(
        &self,
        credential_type: CredentialType,
        subject: &mut Value,
        path: &FieldPath,
    ) -> Result<(), ValidationFailure> {
        let shape = self.registry.shape(credential_type);
        normalize_subject(subject, shape, path, &self.config)?;

        let Value::Object(object) = &*subject else {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "subject object",
                subject,
            ));
        };

        for spec in shape.required() {
            if present(object, spec.name).is_none() {
                return Err(ValidationFailure::MissingRequiredField {
                    path: path.field(spec.name),
                });
            }
        }
        for spec in &shape.fields {
            if let Some(value) = present(object, spec.name) {
                self.check_kind(spec.kind, value, &path.field(spec.name))?;
            }
        }
        Ok(())
    }

    fn check_kind(
        &self,
        kind: FieldKind,
        value: &Value,
        path: &FieldPath,
    ) -> Result<(), ValidationFailure> {
        let mismatch = || ValidationFailure::type_mismatch(path.clone(), kind.describe(), value);
        match kind {
            FieldKind::String => value.is_string().then_some(()).ok_or_else(mismatch),
            FieldKind::Number => value.is_number().then_some(()).ok_or_else(mismatch),
            FieldKind::OpenMap
            | FieldKind::Holder
            | FieldKind::HolderRef
            | FieldKind::VerifiableResource => value.is_object().then_some(()).ok_or_else(mismatch),
            FieldKind::StringList => string_list(value, path).map(|_| ()),
            FieldKind::Timestamp => self.timestamp(value, path).map(|_| ()),
            FieldKind::Intelligence => value
                .as_str()
                .and_then(Intelligence::parse)
                .map(|_| ())
                .ok_or_else(mismatch),
            FieldKind::HolderList => {
                let items = value.as_array().ok_or_else(mismatch)?;
                for (i, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        return Err(ValidationFailure::type_mismatch(
                            path.index(i),
                            "holder object",
                            item,
                        ));
                    }
                }
                Ok(())
            }
            FieldKind::Delegation => self.check_delegation(value, path),
        }
    }

    fn check_delegation(&self, value: &Value, path: &FieldPath) -> Result<(), ValidationFailure> {
        let Value::Object(object) = value else {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "delegation object",
                value,
            ));
        };
        for member in ["id", "delegatedBy", "delegatedTo", "validFrom", "validUntil"] {
            if present(object, member).is_none() {
                return Err(ValidationFailure::MissingRequiredField {
                    path: path.field(member),
                });
            }
        }
        for member in DELEGATION_STRINGS {
            string(&object[member], &path.field(member))?;
        }
        for member in ["delegatedBy", "delegatedTo"] {
            if !object[member].is_object() {
                return Err(ValidationFailure::type_mismatch(
                    path.field(member),
                    "holder object",
                    &object[member],
                ));
            }
        }

        // Ordering only binds when both bounds resolve.
        let from = object["validFrom"].as_str().map(|s| self.config.parse_timestamp(s));
        let until = object["validUntil"].as_str().map(|s| self.config.parse_timestamp(s));
        if let (Some(Ok(from)), Some(Ok(until))) = (from, until) {
            if from.is_after(&until) {
                return Err(ValidationFailure::TemporalInvariantViolation {
                    path: path.field("validUntil"),
                    reason: format!("validFrom {from} is after validUntil {until}"),
                });
            }
        }
        Ok(())
    }

    fn issuer(&self, value: &Value, path: &FieldPath) -> Result<Issuer, ValidationFailure> {
        if !value.is_object() {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "issuer object",
                value,
            ));
        }
        string(&value["id"], &path.field("id"))?;
        serde_json::from_value(value.clone()).map_err(|e| ValidationFailure::TypeMismatch {
            path: path.clone(),
            expected: "issuer object".to_string(),
            found: e.to_string(),
        })
    }

    fn timestamp(&self, value: &Value, path: &FieldPath) -> Result<Timestamp, ValidationFailure> {
        let expected = match self.config.timestamps {
            TimestampPolicy::Lenient => "RFC 3339 timestamp",
            TimestampPolicy::Strict => "RFC 3339 timestamp with Z suffix",
        };
        value
            .as_str()
            .and_then(|s| self.config.parse_timestamp(s).ok())
            .ok_or_else(|| ValidationFailure::type_mismatch(path.clone(), expected, value))
    }
}

/// A member that is present and not `null`.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn string(value: &Value, path: &FieldPath) -> Result<String, ValidationFailure> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationFailure::type_mismatch(path.clone(), "string", value))
}

fn string_list(value: &Value, path: &FieldPath) -> Result<Vec<String>, ValidationFailure> {
    let items = value.as_array().ok_or_else(|| {
        ValidationFailure::type_mismatch(path.clone(), "array of strings", value)
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| string(item, &path.index(i)))
        .collect()
}

fn recognized_tag(types: &[String], path: &FieldPath) -> Result<CredentialType, ValidationFailure> {
    let mut recognized: Vec<CredentialType> = Vec::new();
    for tag in types {
        if let Some(t) = CredentialType::parse(tag) {
            if !recognized.contains(&t) {
                recognized.push(t);
            }
        }
    }
    match recognized.as_slice() {
        [only] => Ok(*only),
        [] => {
            let offered: Vec<&str> = types
                .iter()
                .map(String::as_str)
                .filter(|t| *t != VC_BASE_TYPE)
                .collect();
            Err(ValidationFailure::UnknownCredentialType {
                path: path.clone(),
                tag: if offered.is_empty() {
                    "(no credential type tag)".to_string()
                } else {
                    offered.join(", ")
                },
            })
        }
        several => Err(ValidationFailure::AmbiguousSubjectType {
            path: path.clone(),
            candidates: several.iter().map(|t| t.as_str().to_string()).collect(),
        }),
    }
}

fn proof_envelope(object: &Map<String, Value>, path: &FieldPath) -> Result<Proof, ValidationFailure> {
    let type_path = path.field("type");
    match present(object, "type") {
        None => return Err(ValidationFailure::MissingRequiredField { path: type_path }),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationFailure::MissingRequiredField { path: type_path })
        }
        Some(Value::String(_)) => {}
        Some(other) => return Err(ValidationFailure::type_mismatch(type_path, "string", other)),
    }
    for key in PROOF_OPTIONAL_STRINGS {
        if let Some(v) = present(object, key) {
            string(v, &path.field(key))?;
        }
    }
    serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
        ValidationFailure::TypeMismatch {
            path: path.clone(),
            expected: "proof object".to_string(),
            found: e.to_string(),
        }
    })
}

fn meta(value: &Value, path: &FieldPath) -> Result<CredentialMeta, ValidationFailure> {
    let Value::Object(object) = value else {
        return Err(ValidationFailure::type_mismatch(path.clone(), "object", value));
    };
    for key in ["version", "schema"] {
        if let Some(v) = present(object, key) {
            string(v, &path.field(key))?;
        }
    }
    serde_json::from_value(value.clone()).map_err(|e| ValidationFailure::TypeMismatch {
        path: path.clone(),
        expected: "meta object".to_string(),
        found: e.to_string(),
    })
}

fn typed_subject(
    credential_type: CredentialType,
    subject: Value,
    path: &FieldPath,
) -> Result<CredentialSubject, ValidationFailure> {
    CredentialSubject::from_value(credential_type, subject).map_err(|e| {
        ValidationFailure::TypeMismatch {
            path: path.clone(),
            expected: format!("{credential_type} subject"),
            found: e.to_string(),
        }
    })
}

fn default_validator() -> &'static Validator {
    static DEFAULT: OnceLock<Validator> = OnceLock::new();
    DEFAULT.get_or_init(Validator::default)
}

/// Validate a credential with the default configuration.
pub fn validate_credential(value: &Value) -> Result<SynetVerifiableCredential, ValidationFailure> {
    default_validator().validate_credential(value)
}

/// Validate a bare subject with the default configuration.
pub fn validate_subject(
    credential_type: CredentialType,
    subject: &Value,
) -> Result<CredentialSubject, ValidationFailure> {
    default_validator().validate_subject(credential_type, subject)
}

/// Validate a bare subject into a concrete record with the default
/// configuration.
pub fn validate_typed<T: TypedSubject>(subject: &Value) -> Result<T, ValidationFailure> {
    default_validator().validate_typed(subject)
}

/// Resolve and validate a bare subject with the default configuration.
pub fn resolve_subject(
    subject: &Value,
    declared: Option<CredentialType>,
) -> Result<CredentialSubject, ValidationFailure> {
    default_validator().resolve_subject(subject, declared)
}

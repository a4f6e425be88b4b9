//! # Error Types: Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`ValidationFailure`] is the fail-fast verdict of the validator. Every
//!   variant carries the [`FieldPath`] of the first violated rule, plus
//!   enough context to render a diagnostic without re-reading the input.
//! - [`ValidationFailure`] is `Serialize`, internally tagged by `rule`, so a
//!   caller can emit it verbatim into a JSON report.
//! - [`SynetError`] wraps everything a caller outside the pure core can hit
//!   (I/O, configuration, serialization).

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::path::FieldPath;

/// Top-level error type for Synet credential handling.
#[derive(Error, Debug)]
pub enum SynetError {
    /// The credential failed validation.
    #[error("credential validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Validator configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SynetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Identifier of a validation rule, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    /// A tag is not a member of the closed `CredentialType` set.
    UnknownCredentialType,
    /// A required envelope or subject field is absent.
    MissingRequiredField,
    /// A field is present but of the wrong primitive or nested kind.
    TypeMismatch,
    /// More than one equally-specific subject variant matched.
    AmbiguousSubjectType,
    /// A holder or verifiable resource is not well-formed.
    MalformedResource,
    /// A pair of timestamps is out of order.
    TemporalInvariantViolation,
}

impl Rule {
    /// Returns the rule identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownCredentialType => "UnknownCredentialType",
            Self::MissingRequiredField => "MissingRequiredField",
            Self::TypeMismatch => "TypeMismatch",
            Self::AmbiguousSubjectType => "AmbiguousSubjectType",
            Self::MalformedResource => "MalformedResource",
            Self::TemporalInvariantViolation => "TemporalInvariantViolation",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule a credential (or one of its parts) violated.
///
/// Validation is fail-fast: exactly one failure is reported, the first one
/// encountered in the documented check order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule")]
pub enum ValidationFailure {
    /// A tag is not in the closed `CredentialType` set, or no variant's
    /// required fields are satisfied by a subject.
    #[error("unknown credential type at {path}: {tag}")]
    UnknownCredentialType {
        /// Where the tag (or untyped subject) was found.
        path: FieldPath,
        /// The unrecognized tag, or a description of what was offered.
        tag: String,
    },

    /// A required field is absent.
    #[error("missing required field {path}")]
    MissingRequiredField {
        /// Path of the absent field.
        path: FieldPath,
    },

    /// A field is present with the wrong kind.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the offending field.
        path: FieldPath,
        /// The expected kind.
        expected: String,
        /// Description of the value actually present.
        found: String,
    },

    /// Several equally-specific variants (or several recognized tags) apply.
    #[error("ambiguous subject type at {path}: {}", .candidates.join(", "))]
    AmbiguousSubjectType {
        /// Where the ambiguity was detected.
        path: FieldPath,
        /// The competing credential type tags.
        candidates: Vec<String>,
    },

    /// A holder or resource failed normalization.
    #[error("malformed resource at {path}: {reason}")]
    MalformedResource {
        /// Path of the offending field.
        path: FieldPath,
        /// What is wrong with it.
        reason: String,
    },

    /// Two timestamps are out of order.
    #[error("temporal invariant violated at {path}: {reason}")]
    TemporalInvariantViolation {
        /// Path of the later-in-document timestamp.
        path: FieldPath,
        /// The violated ordering, with both values.
        reason: String,
    },
}

impl ValidationFailure {
    /// The rule this failure violated.
    pub fn rule(&self) -> Rule {
        match self {
            Self::UnknownCredentialType { .. } => Rule::UnknownCredentialType,
            Self::MissingRequiredField { .. } => Rule::MissingRequiredField,
            Self::TypeMismatch { .. } => Rule::TypeMismatch,
            Self::AmbiguousSubjectType { .. } => Rule::AmbiguousSubjectType,
            Self::MalformedResource { .. } => Rule::MalformedResource,
            Self::TemporalInvariantViolation { .. } => Rule::TemporalInvariantViolation,
        }
    }

    /// The field path of the violation.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::UnknownCredentialType { path, .. }
            | Self::MissingRequiredField { path }
            | Self::TypeMismatch { path, .. }
            | Self::AmbiguousSubjectType { path, .. }
            | Self::MalformedResource { path, .. }
            | Self::TemporalInvariantViolation { path, .. } => path,
        }
    }

    /// Shorthand for a [`ValidationFailure::TypeMismatch`] built from the
    /// offending value.
    pub fn type_mismatch(path: FieldPath, expected: impl Into<String>, found: &Value) -> Self {
        Self::TypeMismatch {
            path,
            expected: expected.into(),
            found: describe_value(found),
        }
    }

    /// Shorthand for a [`ValidationFailure::MalformedResource`].
    pub fn malformed(path: FieldPath, reason: impl Into<String>) -> Self {
        Self::MalformedResource {
            path,
            reason: reason.into(),
        }
    }
}

/// Describe a JSON value for diagnostics: its kind plus a short excerpt.
///
/// Strings longer than 64 characters are cut; containers report their size.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => {
            if s.chars().count() > 64 {
                let head: String = s.chars().take(64).collect();
                format!("string {head:?}...")
            } else {
                format!("string {s:?}")
            }
        }
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        Value::Object(map) => format!("object with {} key(s)", map.len()),
    }
}

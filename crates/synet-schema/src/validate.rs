//! # Schema Validation
//!
//! Accumulate-all validation of credential documents against the generated
//! schemas (Draft 2020-12).
//!
//! Where `synet_vc::validate_credential` stops at the first failure, this
//! reports every structural violation at once, each with the JSON Pointer
//! of the offending instance location and of the schema keyword that
//! rejected it.
//!
//! Documents can be JSON or YAML; see [`load_document`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use synet_vc::{CredentialType, VC_BASE_TYPE};
use thiserror::Error;

use crate::codegen::{credential_schema, schema_file_name, subject_schema};

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// File name of the schema validated against.
        schema_name: String,
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The document's `type` does not select exactly one schema.
    #[error("no schema for credential type tags [{tags}]")]
    UnknownCredentialType {
        /// The tags offered, comma separated.
        tags: String,
    },

    /// A generated schema failed to compile.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// File name of the schema.
        schema_name: String,
        /// Compiler message.
        reason: String,
    },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path of the document.
        path: String,
        /// Why it could not be loaded.
        reason: String,
    },
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the violating location in the instance.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "  {at}: {}", self.message)
    }
}

/// The violations of one document, in the order the validator found them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are none.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation points at `instance_path`.
    pub fn touches(&self, instance_path: &str) -> bool {
        self.violations.iter().any(|v| v.instance_path == instance_path)
    }

    /// Consume into the inner list.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compiled validators for every credential type.
///
/// Compilation happens once in [`SchemaValidator::new`]; the value is
/// `Send + Sync` and can be shared.
pub struct SchemaValidator {
    credentials: BTreeMap<CredentialType, Validator>,
    subjects: BTreeMap<CredentialType, Validator>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("credential_types", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn compile(schema_name: &str, schema: &Value) -> Result<Validator, SchemaValidationError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(schema)
        .map_err(|e| SchemaValidationError::ValidatorBuildError {
            schema_name: schema_name.to_string(),
            reason: e.to_string(),
        })
}

fn collect(
    validator: &Validator,
    instance: &Value,
    schema_name: String,
) -> Result<(), SchemaValidationError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed {
            schema_name,
            violations: ValidationViolations { violations },
        })
    }
}

impl SchemaValidator {
    /// Generate and compile every credential and subject schema.
    ///
    /// # Errors
    ///
    /// `ValidatorBuildError` if a generated schema does not compile.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let mut credentials = BTreeMap::new();
        let mut subjects = BTreeMap::new();
        for t in CredentialType::ALL {
            let name = schema_file_name(t);
            credentials.insert(t, compile(&name, &credential_schema(t))?);
            subjects.insert(t, compile(&format!("subject/{name}"), &subject_schema(t))?);
        }
        tracing::debug!(count = credentials.len(), "compiled credential schemas");
        Ok(Self {
            credentials,
            subjects,
        })
    }

    /// Validate a credential document, selecting the schema from its
    /// `type` tags. Returns the selected type on success.
    ///
    /// # Errors
    ///
    /// `UnknownCredentialType` when `type` names no credential type or
    /// several; `ValidationFailed` with every violation otherwise.
    pub fn validate_credential(
        &self,
        instance: &Value,
    ) -> Result<CredentialType, SchemaValidationError> {
        let credential_type = select_type(instance)?;
        self.validate_as(credential_type, instance)?;
        Ok(credential_type)
    }

    /// Validate a credential document against the schema of
    /// `credential_type`, whatever its `type` says.
    pub fn validate_as(
        &self,
        credential_type: CredentialType,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        match self.credentials.get(&credential_type) {
            Some(validator) => collect(validator, instance, schema_file_name(credential_type)),
            None => Err(SchemaValidationError::UnknownCredentialType {
                tags: credential_type.to_string(),
            }),
        }
    }

    /// Validate a bare subject.
    pub fn validate_subject(
        &self,
        credential_type: CredentialType,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        match self.subjects.get(&credential_type) {
            Some(validator) => collect(
                validator,
                instance,
                format!("subject/{}", schema_file_name(credential_type)),
            ),
            None => Err(SchemaValidationError::UnknownCredentialType {
                tags: credential_type.to_string(),
            }),
        }
    }

    /// Load a JSON or YAML credential file and validate it.
    pub fn validate_file(&self, path: &Path) -> Result<CredentialType, SchemaValidationError> {
        let document = load_document(path)?;
        self.validate_credential(&document).map_err(|e| match e {
            SchemaValidationError::ValidationFailed {
                schema_name,
                violations,
            } => SchemaValidationError::ValidationFailed {
                schema_name: format!("{schema_name} ({})", path.display()),
                violations,
            },
            other => other,
        })
    }
}

fn select_type(instance: &Value) -> Result<CredentialType, SchemaValidationError> {
    let tags: Vec<&str> = instance
        .get("type")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut recognized: Vec<CredentialType> = tags
        .iter()
        .filter_map(|t| CredentialType::parse(t))
        .collect();
    recognized.sort();
    recognized.dedup();

    match recognized.as_slice() {
        [only] => Ok(*only),
        _ => Err(SchemaValidationError::UnknownCredentialType {
            tags: tags
                .iter()
                .filter(|t| **t != VC_BASE_TYPE)
                .copied()
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Read a document from disk. `.yaml`/`.yml` files are parsed as YAML,
/// everything else as JSON.
///
/// # Errors
///
/// `DocumentLoadError` if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let load_error = |reason: String| SchemaValidationError::DocumentLoadError {
        path: path.display().to_string(),
        reason,
    };
    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

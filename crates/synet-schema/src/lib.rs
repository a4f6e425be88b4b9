//! # synet-schema: JSON Schema Export & Diagnostic Validation
//!
//! Renders the subject registry of `synet-vc` as JSON Schema (Draft
//! 2020-12) for consumers outside Rust, and validates documents against
//! those schemas in accumulate-all mode.
//!
//! ## Export (`codegen`)
//!
//! - [`credential_schema`]: the envelope schema for one credential type,
//!   with the subject schema embedded.
//! - [`subject_schema`]: the bare subject schema.
//! - [`export_all`]: every credential schema keyed by file name.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaValidator`] compiles one validator per credential type and
//! reports *every* violation in a document. It complements the fail-fast
//! validator in `synet-vc`; it does not replace it. The schemas are
//! structural: normalization and temporal ordering are not expressible in
//! JSON Schema and are checked only by `synet-vc`.
//!
//! ## Crate Policy
//!
//! - Schemas are generated from the registry, never maintained by hand.
//! - Schema `$id`s are stable. Changing [`SCHEMA_ID_PREFIX`] breaks every
//!   published reference.

pub mod codegen;
pub mod validate;

pub use codegen::{
    credential_schema, export_all, schema_file_name, schema_id, subject_schema, SCHEMA_ID_PREFIX,
};
pub use validate::{
    load_document, SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
};

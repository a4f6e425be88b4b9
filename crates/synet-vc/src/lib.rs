//! # synet-vc: Verifiable Credentials for the Synet Network
//!
//! The typed data model for Synet credentials, following the shape of the
//! W3C Verifiable Credentials Data Model 1.1:
//!
//! - **Envelope** ([`SynetVerifiableCredential`]) generic over its subject,
//!   so callers can hold a credential whose variant is known statically
//!   (`SynetVerifiableCredential<GatewayIdentitySubject>`) or dynamically
//!   (`SynetVerifiableCredential<CredentialSubject>`).
//! - **Subjects** ([`subject`]): sixteen records in six families, each bound
//!   to one [`CredentialType`] tag.
//! - **Registry** ([`registry`]): the required/optional members of every
//!   subject shape, and classification of untyped subjects.
//! - **Normalizer** ([`normalize`]): holders, holder references, verifiable
//!   resources and delegations brought into canonical form.
//! - **Validator** ([`validate`]): untrusted JSON in, typed credential or
//!   the first [`ValidationFailure`](synet_core::ValidationFailure) out.
//!
//! ## Security Invariants
//!
//! - `Deserialize` for [`SynetVerifiableCredential`] and
//!   [`CredentialSubject`] runs the validator, so a typed credential or
//!   dynamic subject decoded from JSON has always been normalized.
//! - The concrete records ([`subject`] structs, [`SynetHolder`],
//!   [`VerifiableResource`], [`CredentialDelegation`]) derive a plain
//!   structural `Deserialize` and are unvalidated when decoded directly.
//!   Untrusted input goes through [`validate_typed`], [`validate_subject`]
//!   or an envelope.
//! - [`SynetVerifiableCredential::signing_input`] excludes `proof` and is
//!   computed over [`CanonicalBytes`](synet_core::CanonicalBytes).
//! - Proof values are carried, never verified. Signature checking belongs
//!   to the caller.
//!
//! ## Crate Policy
//!
//! - Pure: no I/O, no clock reads on the validation path.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod credential;
pub mod delegation;
pub mod holder;
pub mod normalize;
pub mod proof;
pub mod registry;
pub mod resource;
pub mod subject;
pub mod types;
pub mod validate;

pub use config::{TimestampPolicy, ValidatorConfig, Web2MirrorPolicy};
pub use credential::{CredentialMeta, Issuer, SynetVerifiableCredential, VC_BASE_TYPE, VC_CONTEXT_V1};
pub use delegation::CredentialDelegation;
pub use holder::SynetHolder;
pub use proof::Proof;
pub use registry::{
    classify, shape_for, Classification, FieldKind, FieldSpec, SubjectRegistry, SubjectShape,
};
pub use resource::VerifiableResource;
pub use subject::{
    AuthorizationSubject, CredentialSubject, DataAssetSubject, FungibleAssetSubject,
    GatewayAuthorizationSubject, GatewayIdentitySubject, IdentitySubject,
    IntelligenceAuthorizationSubject, IpAssetSubject, IpPoolAssetSubject, MarketIdentitySubject,
    Metadata, NetworkDeclarationSubject, NonFungibleAssetSubject, PolicySubject,
    RootIdentitySubject, RootPolicySubject, RoutingSubject, Subject, TypedSubject,
};
pub use types::{CredentialType, Intelligence, SubjectFamily};
pub use validate::{
    resolve_subject, validate_credential, validate_subject, validate_typed, Validator,
};

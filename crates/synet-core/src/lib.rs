//! # synet-core: Foundational Types for Synet Credentials
//!
//! The leaf crate of the workspace. It defines the primitives every other
//! crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One failure taxonomy.** [`ValidationFailure`] is the only shape a
//!    rejected credential takes: a rule, a [`FieldPath`], and a description
//!    of the offending value. Consumers match on it; nobody parses messages.
//!
//! 2. **Wire-faithful timestamps.** [`Timestamp`] keeps the source text next
//!    to the parsed UTC instant, so a validated credential re-serializes to
//!    the exact bytes it was decoded from.
//!
//! 3. **`CanonicalBytes` newtype.** Digest computation flows through
//!    [`CanonicalBytes::new()`] (RFC 8785 JCS). `sha256_digest()` accepts
//!    only `&CanonicalBytes`.
//!
//! 4. **Format-only digest recognition.** [`DigestFormat::recognize`] decides
//!    whether a string *looks like* a SHA-256 or multihash digest. It never
//!    fetches or re-hashes content.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `synet-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod path;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_bytes, sha256_digest, ContentDigest, DigestAlgorithm, DigestFormat};
pub use error::{describe_value, CanonicalizationError, Rule, SynetError, ValidationFailure};
pub use path::FieldPath;
pub use temporal::{Timestamp, TimestampError};

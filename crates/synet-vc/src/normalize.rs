//! # Holder/Resource Normalizer
//!
//! Rewrites the substructures of a decoded subject into canonical form
//! before the validator checks kinds. Operates in place on a
//! `serde_json::Value` and is idempotent: normalizing normalized input
//! changes nothing.
//!
//! | Input | Canonical form |
//! |---|---|
//! | `mirrors` absent or `null` | `[]` |
//! | `ipfsUri`, `hash`, mirror with surrounding whitespace | trimmed |
//! | `licensedBy: "did:..."` | `licensedBy: {"id": "did:..."}` |
//! | optional member set to `null` | member removed |
//!
//! Rejections are `MalformedResource` except where a more specific rule
//! applies (a missing member is `MissingRequiredField`, a value of the
//! wrong JSON kind is `TypeMismatch`).
//!
//! Digest checks are format-only. Nothing is fetched and no mirror content
//! is re-hashed.

use serde_json::{Map, Value};
use synet_core::{DigestFormat, FieldPath, ValidationFailure};

use crate::config::{ValidatorConfig, Web2MirrorPolicy};
use crate::registry::{FieldKind, SubjectShape};
use crate::resource::{is_web2_uri, uri_scheme};

const RESOURCE_MEMBERS: [&str; 3] = ["ipfsUri", "hash", "mirrors"];

/// Normalize a subject object against its shape.
///
/// # Errors
///
/// The first normalization failure, with its path under `path`.
pub fn normalize_subject(
    subject: &mut Value,
    shape: &SubjectShape,
    path: &FieldPath,
    config: &ValidatorConfig,
) -> Result<(), ValidationFailure> {
    let object = match subject {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "subject object",
                other,
            ))
        }
    };

    for spec in shape.optional() {
        if object.get(spec.name).is_some_and(Value::is_null) {
            object.remove(spec.name);
        }
    }

    for spec in &shape.fields {
        let Some(value) = object.get_mut(spec.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let field_path = path.field(spec.name);
        match spec.kind {
            FieldKind::Holder => normalize_holder(value, &field_path)?,
            FieldKind::HolderRef => normalize_holder_ref(value, &field_path)?,
            FieldKind::HolderList => {
                if let Some(items) = value.as_array_mut() {
                    for (i, item) in items.iter_mut().enumerate() {
                        normalize_holder(item, &field_path.index(i))?;
                    }
                }
            }
            FieldKind::VerifiableResource => normalize_resource(value, &field_path, config)?,
            FieldKind::Delegation => normalize_delegation(value, &field_path)?,
            FieldKind::String
            | FieldKind::StringList
            | FieldKind::Number
            | FieldKind::Timestamp
            | FieldKind::Intelligence
            | FieldKind::OpenMap => {}
        }
    }
    Ok(())
}

/// Check a holder object: `id` must be a non-empty string, `name` a string.
pub fn normalize_holder(holder: &mut Value, path: &FieldPath) -> Result<(), ValidationFailure> {
    let object = match holder {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "holder object",
                other,
            ))
        }
    };

    match object.get("id") {
        None | Some(Value::Null) => {
            return Err(ValidationFailure::MissingRequiredField {
                path: path.field("id"),
            })
        }
        Some(Value::String(id)) if id.trim().is_empty() => {
            return Err(ValidationFailure::malformed(
                path.field("id"),
                "holder id must be a non-empty string",
            ))
        }
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(ValidationFailure::type_mismatch(
                path.field("id"),
                "string",
                other,
            ))
        }
    }

    match object.get("name") {
        Some(Value::Null) => {
            object.remove("name");
        }
        Some(Value::String(_)) | None => {}
        Some(other) => {
            return Err(ValidationFailure::type_mismatch(
                path.field("name"),
                "string",
                other,
            ))
        }
    }
    Ok(())
}

/// Like [`normalize_holder`], but a bare string is first lifted to
/// `{"id": <string>}`.
pub fn normalize_holder_ref(holder: &mut Value, path: &FieldPath) -> Result<(), ValidationFailure> {
    if let Value::String(id) = holder {
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(std::mem::take(id)));
        *holder = Value::Object(object);
    }
    normalize_holder(holder, path)
}

/// Canonicalize a verifiable resource.
///
/// Rejects unknown members, trims `ipfsUri`, `hash` and mirrors, checks the
/// content address scheme against the configuration, checks that `hash` is
/// a recognizable digest, defaults `mirrors` to `[]`, and applies the web2
/// mirror policy.
pub fn normalize_resource(
    resource: &mut Value,
    path: &FieldPath,
    config: &ValidatorConfig,
) -> Result<(), ValidationFailure> {
    let object = match resource {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "verifiable resource object",
                other,
            ))
        }
    };

    if let Some(unknown) = object.keys().find(|k| !RESOURCE_MEMBERS.contains(&k.as_str())) {
        return Err(ValidationFailure::malformed(
            path.field(unknown),
            format!("unknown member {unknown:?}; verifiable resources have no extension fields"),
        ));
    }

    // ipfsUri
    let uri_path = path.field("ipfsUri");
    let uri = trimmed_string(object, "ipfsUri", &uri_path)?;
    match uri_scheme(&uri) {
        None => {
            return Err(ValidationFailure::malformed(
                uri_path,
                format!("{uri:?} is not a content address URI"),
            ))
        }
        Some(scheme) if !config.accepts_content_scheme(scheme) => {
            return Err(ValidationFailure::malformed(
                uri_path,
                format!(
                    "content address scheme {scheme:?} not accepted (expected one of: {})",
                    config.content_uri_schemes.join(", ")
                ),
            ))
        }
        Some(scheme) if uri.len() == scheme.len() + "://".len() => {
            return Err(ValidationFailure::malformed(
                uri_path,
                "content address has no content identifier",
            ))
        }
        Some(_) => {}
    }
    object.insert("ipfsUri".to_string(), Value::String(uri));

    // hash
    let hash_path = path.field("hash");
    let hash = trimmed_string(object, "hash", &hash_path)?;
    if DigestFormat::recognize(&hash).is_none() {
        return Err(ValidationFailure::malformed(
            hash_path,
            format!("{hash:?} is not a recognizable SHA-256 or multihash digest"),
        ));
    }
    object.insert("hash".to_string(), Value::String(hash));

    // mirrors
    let mirrors_path = path.field("mirrors");
    let mirrors = match object.remove("mirrors") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationFailure::type_mismatch(
                mirrors_path,
                "array of strings",
                &other,
            ))
        }
    };
    let mut normalized = Vec::with_capacity(mirrors.len());
    for (i, mirror) in mirrors.into_iter().enumerate() {
        let mirror_path = mirrors_path.index(i);
        let Value::String(raw) = &mirror else {
            return Err(ValidationFailure::type_mismatch(
                mirror_path,
                "string",
                &mirror,
            ));
        };
        let trimmed = raw.trim();
        if uri_scheme(trimmed).is_none() {
            return Err(ValidationFailure::malformed(
                mirror_path,
                format!("mirror {trimmed:?} is not an absolute URI"),
            ));
        }
        if is_web2_uri(trimmed) {
            match config.web2_mirrors {
                Web2MirrorPolicy::Allow => {}
                Web2MirrorPolicy::Warn => tracing::warn!(
                    path = %mirror_path,
                    mirror = trimmed,
                    "web2 mirror on verifiable resource; its content must still match the declared hash"
                ),
                Web2MirrorPolicy::Reject => {
                    return Err(ValidationFailure::malformed(
                        mirror_path,
                        format!("web2 mirror {trimmed:?} rejected by configuration"),
                    ))
                }
            }
        }
        normalized.push(Value::String(trimmed.to_string()));
    }
    object.insert("mirrors".to_string(), Value::Array(normalized));

    Ok(())
}

/// Normalize the holders inside a delegation record.
pub fn normalize_delegation(
    delegation: &mut Value,
    path: &FieldPath,
) -> Result<(), ValidationFailure> {
    let object = match delegation {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure::type_mismatch(
                path.clone(),
                "delegation object",
                other,
            ))
        }
    };
    for member in ["delegatedBy", "delegatedTo"] {
        if let Some(holder) = object.get_mut(member).filter(|v| !v.is_null()) {
            normalize_holder(holder, &path.field(member))?;
        }
    }
    Ok(())
}

/// A required, non-empty string member, trimmed.
fn trimmed_string(
    object: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<String, ValidationFailure> {
    match object.get(key) {
        None | Some(Value::Null) => Err(ValidationFailure::MissingRequiredField { path: path.clone() }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationFailure::malformed(path.clone(), "must not be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(ValidationFailure::type_mismatch(path.clone(), "string", other)),
    }
}

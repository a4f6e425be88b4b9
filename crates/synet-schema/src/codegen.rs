//! # Schema Generation
//!
//! Builds JSON Schema documents from [`SubjectShape`]s.
//!
//! Shared structures (holder, verifiable resource, delegation) live under
//! `$defs` and are referenced with `#/$defs/<name>`, so every generated
//! document is self-contained.
//!
//! `additionalProperties` follows the data model: subjects, holders,
//! delegations, the issuer and the envelope are open (unknown members are
//! carried through); a verifiable resource is closed.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use synet_vc::{CredentialType, FieldKind, Intelligence, SubjectRegistry, SubjectShape};

/// Prefix of every generated `$id`.
pub const SCHEMA_ID_PREFIX: &str = "https://schemas.synthetism.org/synet/";

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// File name of the schema for `credential_type`, e.g.
/// `GatewayIdentityCredential.schema.json`.
pub fn schema_file_name(credential_type: CredentialType) -> String {
    format!("{}.schema.json", credential_type.as_str())
}

/// The `$id` of the schema for `credential_type`.
pub fn schema_id(credential_type: CredentialType) -> String {
    format!("{SCHEMA_ID_PREFIX}{}", schema_file_name(credential_type))
}

fn non_empty_string() -> Value {
    json!({"type": "string", "minLength": 1})
}

fn timestamp() -> Value {
    json!({"type": "string", "format": "date-time"})
}

fn string_list() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

fn definitions() -> Value {
    json!({
        "holder": {
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": non_empty_string(),
                "name": {"type": "string"}
            },
            "additionalProperties": true
        },
        "verifiableResource": {
            "type": "object",
            "required": ["ipfsUri", "hash"],
            "properties": {
                "ipfsUri": non_empty_string(),
                "hash": non_empty_string(),
                "mirrors": string_list()
            },
            "additionalProperties": false
        },
        "delegation": {
            "type": "object",
            "required": ["id", "delegatedBy", "delegatedTo", "validFrom", "validUntil"],
            "properties": {
                "id": {"type": "string"},
                "delegatedBy": {"$ref": "#/$defs/holder"},
                "delegatedTo": {"$ref": "#/$defs/holder"},
                "validFrom": {"type": "string"},
                "validUntil": {"type": "string"}
            },
            "additionalProperties": true
        }
    })
}

/// The schema fragment for one member kind.
fn kind_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::StringList => string_list(),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Timestamp => timestamp(),
        FieldKind::Holder => json!({"$ref": "#/$defs/holder"}),
        FieldKind::HolderRef => json!({
            "oneOf": [{"$ref": "#/$defs/holder"}, non_empty_string()]
        }),
        FieldKind::HolderList => json!({"type": "array", "items": {"$ref": "#/$defs/holder"}}),
        FieldKind::VerifiableResource => json!({"$ref": "#/$defs/verifiableResource"}),
        FieldKind::Delegation => json!({"$ref": "#/$defs/delegation"}),
        FieldKind::Intelligence => json!({
            "enum": Intelligence::ALL.iter().map(|i| i.as_str()).collect::<Vec<_>>()
        }),
        FieldKind::OpenMap => json!({"type": "object"}),
    }
}

/// The subject object schema, without `$defs`.
fn subject_body(shape: &SubjectShape) -> Value {
    let properties: Map<String, Value> = shape
        .fields
        .iter()
        .map(|f| {
            let schema = if f.required {
                kind_schema(f.kind)
            } else {
                // Optional members may be sent as null; the normalizer drops them.
                json!({"anyOf": [kind_schema(f.kind), {"type": "null"}]})
            };
            (f.name.to_string(), schema)
        })
        .collect();
    let required: Vec<&str> = shape.required().map(|f| f.name).collect();

    json!({
        "type": "object",
        "required": required,
        "properties": properties,
        "additionalProperties": true
    })
}

/// Standalone schema for a bare subject of `credential_type`.
pub fn subject_schema(credential_type: CredentialType) -> Value {
    let shape = SubjectRegistry::global().shape(credential_type);
    let mut schema = subject_body(shape);
    if let Value::Object(object) = &mut schema {
        object.insert("$schema".into(), json!(DRAFT_2020_12));
        object.insert(
            "$id".into(),
            json!(format!(
                "{SCHEMA_ID_PREFIX}subject/{}",
                schema_file_name(credential_type)
            )),
        );
        object.insert("title".into(), json!(format!("{credential_type} subject")));
        object.insert("$defs".into(), definitions());
    }
    schema
}

/// Envelope schema for a credential of `credential_type`.
pub fn credential_schema(credential_type: CredentialType) -> Value {
    let shape = SubjectRegistry::global().shape(credential_type);
    json!({
        "$schema": DRAFT_2020_12,
        "$id": schema_id(credential_type),
        "title": credential_type.as_str(),
        "description": format!(
            "Synet {} credential ({} family).",
            credential_type.as_str(),
            credential_type.family()
        ),
        "type": "object",
        "required": [
            "@context", "id", "type", "issuer", "issuanceDate", "credentialSubject", "proof"
        ],
        "properties": {
            "@context": {"type": "array", "items": {"type": "string"}, "minItems": 1},
            "id": {"type": "string"},
            "type": {
                "type": "array",
                "items": {"type": "string"},
                "contains": {"const": credential_type.as_str()}
            },
            "issuer": {
                "type": "object",
                "required": ["id"],
                "properties": {"id": {"type": "string"}},
                "additionalProperties": true
            },
            "issuanceDate": timestamp(),
            "expirationDate": {"anyOf": [timestamp(), {"type": "null"}]},
            "credentialSubject": subject_body(shape),
            "proof": {
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": {"type": "string", "pattern": "\\S"},
                    "proofValue": {"type": "string"},
                    "created": {"type": "string"},
                    "verificationMethod": {"type": "string"},
                    "proofPurpose": {"type": "string"}
                },
                "additionalProperties": true
            },
            "meta": {
                "type": "object",
                "properties": {
                    "version": {"type": "string"},
                    "schema": {"type": "string"}
                },
                "additionalProperties": true
            }
        },
        "additionalProperties": true,
        "$defs": definitions()
    })
}

/// Every credential schema, keyed by [`schema_file_name`].
pub fn export_all() -> BTreeMap<String, Value> {
    CredentialType::ALL
        .into_iter()
        .map(|t| (schema_file_name(t), credential_schema(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_file_names() {
        assert_eq!(
            schema_file_name(CredentialType::Routing),
            "RoutingCredential.schema.json"
        );
        assert_eq!(
            schema_id(CredentialType::Routing),
            "https://schemas.synthetism.org/synet/RoutingCredential.schema.json"
        );
    }

    #[test]
    fn required_list_follows_registry() {
        let schema = credential_schema(CredentialType::GatewayAuthorization);
        let required = &schema["properties"]["credentialSubject"]["required"];
        assert_eq!(
            required,
            &json!(["holder", "authorizedBy", "networkId", "regionId", "ip", "cidr", "ipPoolId"])
        );
    }

    #[test]
    fn resource_is_closed_and_subject_open() {
        let schema = credential_schema(CredentialType::Policy);
        assert_eq!(
            schema["$defs"]["verifiableResource"]["additionalProperties"],
            json!(false)
        );
        assert_eq!(
            schema["properties"]["credentialSubject"]["additionalProperties"],
            json!(true)
        );
    }

    #[test]
    fn licensed_by_accepts_reference_forms() {
        let schema = subject_schema(CredentialType::DataAsset);
        let one_of = &schema["properties"]["licensedBy"]["oneOf"];
        assert_eq!(one_of.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn intelligence_enum_lists_every_value() {
        let schema = subject_schema(CredentialType::IntelligenceAuthorization);
        assert_eq!(
            schema["properties"]["intelligence"]["enum"],
            json!(["Human", "AI", "Hybrid", "Swarm", "Superintelligent"])
        );
    }

    #[test]
    fn export_covers_every_tag() {
        let all = export_all();
        assert_eq!(all.len(), CredentialType::ALL.len());
        assert!(all.contains_key("IpPoolAssetCredential.schema.json"));
    }
}

//! # Credential Properties
//!
//! End-to-end checks over the fixture set: every tag validates, survives a
//! serialize/validate round trip unchanged, and fails with the documented
//! rule and path when a single member is broken.

mod common;

use proptest::prelude::*;
use serde_json::{json, Value};
use synet_core::Rule;
use synet_vc::{
    validate_credential, CredentialType, GatewayAuthorizationSubject, Subject,
    SynetVerifiableCredential,
};

fn failure(value: &Value) -> (Rule, String) {
    let err = validate_credential(value).expect_err("credential should be rejected");
    (err.rule(), err.path().to_string())
}

#[test]
fn every_tag_has_a_valid_fixture() {
    let fixtures = common::credential_fixtures();
    let mut seen = Vec::new();
    for (name, value) in &fixtures {
        let vc = validate_credential(value)
            .unwrap_or_else(|e| panic!("{name} should validate: {e}"));
        seen.push(vc.subject_type());
    }
    seen.sort();
    let mut all = CredentialType::ALL.to_vec();
    all.sort();
    assert_eq!(seen, all);
}

#[test]
fn fixtures_are_already_normalized() {
    for (name, value) in common::credential_fixtures() {
        let vc = validate_credential(&value).unwrap();
        assert_eq!(serde_json::to_value(&vc).unwrap(), value, "{name}");
    }
}

#[test]
fn round_trip_through_text() {
    for (name, value) in common::credential_fixtures() {
        let vc = validate_credential(&value).unwrap();
        let text = serde_json::to_string_pretty(&vc).unwrap();
        let back: SynetVerifiableCredential = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vc, "{name}");
        assert_eq!(back.subject_type(), vc.subject_type());
    }
}

#[test]
fn static_variant_decodes_from_text() {
    let text = serde_json::to_string(&common::fixture("gateway-authorization")).unwrap();
    let vc: SynetVerifiableCredential<GatewayAuthorizationSubject> =
        serde_json::from_str(&text).unwrap();
    assert_eq!(vc.credential_subject.ip_pool_id, "pool-eu");
    assert_eq!(vc.credential_subject.holder().id, "did:synet:gw-eu-1");

    let wrong = serde_json::from_str::<SynetVerifiableCredential<GatewayAuthorizationSubject>>(
        &serde_json::to_string(&common::fixture("routing")).unwrap(),
    );
    assert!(wrong.is_err());
}

#[test]
fn gateway_authorization_requires_pool() {
    let mut value = common::fixture("gateway-authorization");
    value["credentialSubject"]
        .as_object_mut()
        .unwrap()
        .remove("ipPoolId");
    assert_eq!(
        failure(&value),
        (
            Rule::MissingRequiredField,
            "credentialSubject.ipPoolId".to_string()
        )
    );
}

#[test]
fn bad_resource_hash_is_malformed() {
    let mut value = common::fixture("policy");
    value["credentialSubject"]["verifiableResource"]["hash"] = json!("not-a-digest");
    assert_eq!(
        failure(&value),
        (
            Rule::MalformedResource,
            "credentialSubject.verifiableResource.hash".to_string()
        )
    );
}

#[test]
fn expiration_equal_to_issuance_is_rejected() {
    let mut value = common::fixture("identity");
    value["expirationDate"] = value["issuanceDate"].clone();
    assert_eq!(
        failure(&value),
        (Rule::TemporalInvariantViolation, "expirationDate".to_string())
    );

    value["expirationDate"] = json!("2026-01-15T12:00:00.000001Z");
    assert!(validate_credential(&value).is_ok());
}

#[test]
fn normalization_is_visible_in_output() {
    let mut value = common::fixture("non-fungible-asset");
    let padded = format!(
        "  {}  ",
        value["credentialSubject"]["verifiableResource"]["hash"]
            .as_str()
            .unwrap()
    );
    let resource = &mut value["credentialSubject"]["verifiableResource"];
    resource["hash"] = json!(padded);
    resource.as_object_mut().unwrap().remove("mirrors");
    value["credentialSubject"]["parentAssetId"] = Value::Null;

    let vc = validate_credential(&value).unwrap();
    let out = serde_json::to_value(&vc).unwrap();
    let resource = &out["credentialSubject"]["verifiableResource"];
    assert_eq!(resource["mirrors"], json!([]));
    assert!(!resource["hash"].as_str().unwrap().starts_with(' '));
    assert!(out["credentialSubject"].get("parentAssetId").is_none());
}

#[test]
fn canonical_bytes_ignore_input_key_order() {
    let value = common::fixture("routing");
    let text = serde_json::to_string(&value).unwrap();
    // Reverse the top-level member order in the source text.
    let object = value.as_object().unwrap();
    let reversed = format!(
        "{{{}}}",
        object
            .iter()
            .rev()
            .map(|(k, v)| format!("{}:{}", json!(k), v))
            .collect::<Vec<_>>()
            .join(",")
    );
    let a: SynetVerifiableCredential = serde_json::from_str(&text).unwrap();
    let b: SynetVerifiableCredential = serde_json::from_str(&reversed).unwrap();
    assert_eq!(
        a.to_canonical_bytes().unwrap().as_bytes(),
        b.to_canonical_bytes().unwrap().as_bytes()
    );
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
}

#[test]
fn signing_input_excludes_proof() {
    let value = common::fixture("data-asset");
    let vc = validate_credential(&value).unwrap();
    let mut resigned = vc.clone();
    resigned.proof.proof_value = Some("z-other".to_string());
    assert_eq!(
        vc.signing_input().unwrap().as_bytes(),
        resigned.signing_input().unwrap().as_bytes()
    );
    assert_ne!(vc.digest().unwrap(), resigned.digest().unwrap());
}

/// Perturbations the normalizer is expected to absorb.
fn messy_data_asset() -> impl Strategy<Value = Value> {
    (
        "[ \t]{0,3}",
        "[ \t]{0,3}",
        any::<bool>(),
        any::<bool>(),
        proptest::collection::vec("[a-z]{1,8}", 0..3),
    )
        .prop_map(|(lead, trail, lift, null_parent, mirrors)| {
            let mut value = common::fixture("data-asset");
            let subject = &mut value["credentialSubject"];
            if lift {
                subject["licensedBy"] = json!("did:synet:owner");
            }
            if null_parent {
                subject["parentAssetId"] = Value::Null;
            }
            subject["verifiableResource"] = json!({
                "ipfsUri": format!("{lead}ipfs://bafy-data{trail}"),
                "hash": format!("{lead}e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855{trail}"),
                "mirrors": mirrors
                    .iter()
                    .map(|m| format!("{lead}ar://{m}{trail}"))
                    .collect::<Vec<_>>(),
            });
            value
        })
}

proptest! {
    #[test]
    fn validation_is_idempotent(value in messy_data_asset()) {
        let first = validate_credential(&value).unwrap();
        let reencoded = serde_json::to_value(&first).unwrap();
        let second = validate_credential(&reencoded).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(serde_json::to_value(&second).unwrap(), reencoded);
    }
}

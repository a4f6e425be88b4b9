//! # Canonical Digest Vectors
//!
//! Fixed inputs with their RFC 8785 canonical text and SHA-256 digests.
//! External signers and verifiers in other languages must reproduce these
//! byte for byte; a change here breaks every issued signature.

use serde_json::json;
use synet_core::{sha256_digest, CanonicalBytes, DigestFormat};

fn check(value: serde_json::Value, canonical: &str, digest_hex: &str) {
    let cb = CanonicalBytes::new(&value).expect("canonicalization should succeed");
    assert_eq!(cb.as_str(), canonical);
    let digest = sha256_digest(&cb);
    assert_eq!(digest.to_hex(), digest_hex);
    assert_eq!(digest.to_string(), format!("sha256:{digest_hex}"));
    assert_eq!(
        DigestFormat::recognize(&digest.to_string()),
        Some(DigestFormat::Sha256Hex)
    );
    assert_eq!(
        DigestFormat::recognize(&digest.to_multihash_hex()),
        Some(DigestFormat::MultihashHex)
    );
}

#[test]
fn keys_sorted_and_whitespace_removed() {
    check(
        json!({"b": 1, "a": [true, null]}),
        r#"{"a":[true,null],"b":1}"#,
        "51705a2c9eb3e7e410a58f696a770c3ac3885a0cf43eb7fc88f5e47c11d4d30d",
    );
}

#[test]
fn nested_holder_objects() {
    check(
        json!({
            "issuedBy": {"id": "did:synet:root"},
            "holder": {"id": "did:synet:alice"}
        }),
        r#"{"holder":{"id":"did:synet:alice"},"issuedBy":{"id":"did:synet:root"}}"#,
        "5b79ef09a63a85db1e2e99a32c648107f3a99fdda3d387cf67c897b64e8289b7",
    );
}

#[test]
fn non_ascii_and_fractions() {
    check(
        json!({"s": "é", "n": 1.5}),
        "{\"n\":1.5,\"s\":\"é\"}",
        "c08cac2311443ac0018dd7fe4f2218ae7666cbc8e8868f4f88f768c64edc8588",
    );
}

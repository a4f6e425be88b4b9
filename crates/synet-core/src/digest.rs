//! # Content Digests
//!
//! Two concerns live here:
//!
//! - **Computing** SHA-256 digests, either of [`CanonicalBytes`] (credential
//!   content ids) or of raw resource bytes (what an issuer puts in a
//!   `VerifiableResource.hash`).
//! - **Recognizing** digest strings. [`DigestFormat::recognize`] decides
//!   whether a declared hash is a well-formed SHA-256 or multihash digest.
//!   This is format-only; nothing is fetched or re-hashed.

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Multihash code for sha2-256.
const MULTIHASH_SHA2_256: u8 = 0x12;

/// Single-byte multihash codes accepted in multihash digests, with the
/// digest length each one requires.
const KNOWN_MULTIHASH_CODES: &[(u8, usize)] = &[
    (MULTIHASH_SHA2_256, 32), // sha2-256
    (0x13, 64),               // sha2-512
    (0x16, 32),               // sha3-256
    (0x1e, 32),               // blake3
];

/// CID version byte for CIDv1.
const CID_V1: u8 = 0x01;

/// Longest unsigned varint accepted for a CID codec.
const MAX_VARINT_LEN: usize = 9;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Render the digest as a hex multihash (`1220` + 64 hex chars).
    pub fn to_multihash_hex(&self) -> String {
        format!("{MULTIHASH_SHA2_256:02x}{:02x}{}", self.bytes.len(), self.to_hex())
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 digest of canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256_bytes(data.as_bytes())
}

/// Compute a SHA-256 digest of raw content bytes.
///
/// This is the digest an issuer declares for externally stored content;
/// the core never calls it on fetched mirror content.
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// The recognized textual encodings of a declared resource hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestFormat {
    /// 64 hex characters, optionally prefixed with `sha256:` or `0x`.
    Sha256Hex,
    /// Hex multihash: one-byte code, one-byte length, digest.
    MultihashHex,
    /// Base58btc sha2-256 multihash (`Qm...`, 46 characters).
    MultihashBase58,
    /// Multibase-prefixed multihash or CID (`z` base58btc, `f` base16,
    /// `b` base32).
    Multibase,
}

impl DigestFormat {
    /// Classify a declared hash string, or `None` if it is not a
    /// recognizable digest.
    ///
    /// Every multihash form is decoded and its code and length header
    /// checked against the payload.
    pub fn recognize(s: &str) -> Option<Self> {
        let s = s.trim();

        let bare = s
            .strip_prefix("sha256:")
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        if bare.len() == 64 && hex::decode(bare).is_ok() {
            return Some(Self::Sha256Hex);
        }

        if hex::decode(s).is_ok_and(|bytes| is_multihash(&bytes)) {
            return Some(Self::MultihashHex);
        }

        if s.len() == 46
            && s.starts_with("Qm")
            && bs58::decode(s)
                .into_vec()
                .is_ok_and(|bytes| is_multihash(&bytes) && bytes[0] == MULTIHASH_SHA2_256)
        {
            return Some(Self::MultihashBase58);
        }

        let mut chars = s.chars();
        let prefix = chars.next()?;
        let payload = decode_multibase(prefix, chars.as_str())?;
        (is_multihash(&payload) || is_cid_v1(&payload)).then_some(Self::Multibase)
    }
}

/// Decode the payload of a multibase string with the given prefix.
fn decode_multibase(prefix: char, rest: &str) -> Option<Vec<u8>> {
    match prefix {
        'z' => bs58::decode(rest).into_vec().ok(),
        'f' => hex::decode(rest).ok(),
        // Multibase `b` is lowercase RFC 4648 base32 without padding.
        'b' if !rest.bytes().any(|c| c.is_ascii_uppercase()) => BASE32_NOPAD
            .decode(rest.to_ascii_uppercase().as_bytes())
            .ok(),
        _ => None,
    }
}

/// `<code><len><digest>` with a known code and a digest of exactly the
/// declared length.
fn is_multihash(bytes: &[u8]) -> bool {
    let [code, len, digest @ ..] = bytes else {
        return false;
    };
    let len = usize::from(*len);
    digest.len() == len
        && KNOWN_MULTIHASH_CODES
            .iter()
            .any(|&(c, l)| c == *code && l == len)
}

/// A CIDv1: version byte, varint codec, then a multihash.
fn is_cid_v1(bytes: &[u8]) -> bool {
    let Some((&CID_V1, rest)) = bytes.split_first() else {
        return false;
    };
    let Some(codec_end) = rest
        .iter()
        .take(MAX_VARINT_LEN)
        .position(|b| b & 0x80 == 0)
    else {
        return false;
    };
    is_multihash(&rest[codec_end + 1..])
}

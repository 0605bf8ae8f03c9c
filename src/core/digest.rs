//! Canonical serialization and hashing of signal records.

use crate::signals::SignalRecord;
use sha2::{Digest, Sha256};

/// Length of a fingerprint digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = DIGEST_LEN * 2;

/// Errors that prevent a fingerprint from being produced.
///
/// Unavailable signals are never an error; only a broken serializer or
/// digest primitive is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// The digest primitive is missing or produced unusable output
    DigestUnavailable(String),
    /// The record could not be serialized
    Serialization(String),
}

impl std::fmt::Display for FingerprintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintError::DigestUnavailable(e) => write!(f, "Digest unavailable: {e}"),
            FingerprintError::Serialization(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for FingerprintError {}

/// A 256-bit digest over serialized record bytes.
pub trait DigestPrimitive {
    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, FingerprintError>;
}

/// SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestPrimitive for Sha256Digest {
    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, FingerprintError> {
        Ok(Sha256::digest(data).to_vec())
    }
}

/// Canonical byte form of a record: compact JSON in declared key order.
pub fn canonical_bytes(record: &SignalRecord) -> Result<Vec<u8>, FingerprintError> {
    serde_json::to_vec(record).map_err(|e| FingerprintError::Serialization(e.to_string()))
}

/// Whether `input` is exactly the canonical form of `record`, ignoring
/// trailing whitespace.
///
/// Records read from JSON are hashed in canonical form, so input with
/// omitted keys or other formatting hashes differently from its raw bytes.
pub fn is_canonical(record: &SignalRecord, input: &[u8]) -> Result<bool, FingerprintError> {
    let end = input
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    Ok(canonical_bytes(record)? == input[..end])
}

/// Fingerprint of a record using SHA-256.
pub fn hash_record(record: &SignalRecord) -> Result<String, FingerprintError> {
    hash_record_with(record, &Sha256Digest)
}

/// Fingerprint of a record using the given digest.
///
/// The result is lowercase hex, two digits per byte, no separators.
pub fn hash_record_with<D: DigestPrimitive + ?Sized>(
    record: &SignalRecord,
    digest: &D,
) -> Result<String, FingerprintError> {
    let bytes = canonical_bytes(record)?;
    let hash = digest.digest(&bytes)?;

    if hash.len() != DIGEST_LEN {
        return Err(FingerprintError::DigestUnavailable(format!(
            "expected {DIGEST_LEN} digest bytes, got {}",
            hash.len()
        )));
    }

    Ok(hex::encode(hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{HardwareInfo, Number, TouchSupport};

    /// Digest that always fails, as when no hash implementation is present.
    struct MissingDigest;

    impl DigestPrimitive for MissingDigest {
        fn digest(&self, _data: &[u8]) -> Result<Vec<u8>, FingerprintError> {
            Err(FingerprintError::DigestUnavailable(
                "no SHA-256 provider".to_string(),
            ))
        }
    }

    /// Digest that returns too few bytes.
    struct TruncatedDigest;

    impl DigestPrimitive for TruncatedDigest {
        fn digest(&self, data: &[u8]) -> Result<Vec<u8>, FingerprintError> {
            Ok(Sha256::digest(data)[..16].to_vec())
        }
    }

    fn reference_record() -> SignalRecord {
        SignalRecord {
            user_agent: Some("X".to_string()),
            language: Some("en".to_string()),
            color_depth: Some(24),
            timezone: Some("UTC".to_string()),
            hardware: Some(HardwareInfo {
                cores: Some(4),
                memory: Some(Number(8.0)),
            }),
            touch_support: Some(TouchSupport::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_vector() {
        let record = reference_record();
        assert_eq!(
            String::from_utf8(canonical_bytes(&record).unwrap()).unwrap(),
            r#"{"userAgent":"X","language":"en","colorDepth":24,"timezone":"UTC","canvas":null,"webgl":null,"fonts":null,"audio":null,"plugins":null,"hardware":{"cores":4,"memory":8},"touchSupport":{"maxTouchPoints":0,"touchEvent":false,"touchPoints":0}}"#
        );
        assert_eq!(
            hash_record(&record).unwrap(),
            "9df640ee3479c6c83409bbb57212cace2f6f51bd6b7376e7788db5ae030678fa"
        );
    }

    #[test]
    fn test_canonical_input_detection() {
        let record = reference_record();
        let mut canonical = canonical_bytes(&record).unwrap();
        canonical.push(b'\n');
        assert!(is_canonical(&record, &canonical).unwrap());

        // JSON.stringify drops undefined members; the key comes back as null.
        let without_language = r#"{"userAgent":"X","colorDepth":24,"timezone":"UTC","canvas":null,"webgl":null,"fonts":null,"audio":null,"plugins":null,"hardware":{"cores":4,"memory":8},"touchSupport":{"maxTouchPoints":0,"touchEvent":false,"touchPoints":0}}"#;
        let parsed: SignalRecord = serde_json::from_str(without_language).unwrap();
        assert!(parsed.language.is_none());
        assert!(!is_canonical(&parsed, without_language.as_bytes()).unwrap());
    }

    #[test]
    fn test_hex_is_lowercase_and_fixed_length() {
        let hash = hash_record(&SignalRecord::default()).unwrap();
        assert_eq!(hash.len(), FINGERPRINT_HEX_LEN);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_null_and_empty_fonts_differ() {
        let with_null = reference_record();
        let with_empty = SignalRecord {
            fonts: Some(Vec::new()),
            ..reference_record()
        };

        assert_ne!(
            canonical_bytes(&with_null).unwrap(),
            canonical_bytes(&with_empty).unwrap()
        );
        assert_ne!(
            hash_record(&with_null).unwrap(),
            hash_record(&with_empty).unwrap()
        );
    }

    #[test]
    fn test_missing_digest_is_an_error() {
        let err = hash_record_with(&reference_record(), &MissingDigest).unwrap_err();
        assert!(matches!(err, FingerprintError::DigestUnavailable(_)));
    }

    #[test]
    fn test_short_digest_is_rejected() {
        let err = hash_record_with(&reference_record(), &TruncatedDigest).unwrap_err();
        assert!(matches!(err, FingerprintError::DigestUnavailable(_)));
    }
}

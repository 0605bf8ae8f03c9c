//! Core fingerprinting logic.
//!
//! This module contains:
//! - Probe isolation, turning any collector fault into an absent signal
//! - Canonical serialization and hashing of signal records
//! - The aggregator tying collection and hashing together

pub mod aggregator;
pub mod digest;
pub mod probe;

// Re-export commonly used types
pub use aggregator::{Fingerprint, FingerprintOptions, Fingerprinter};
pub use digest::{
    canonical_bytes, hash_record, hash_record_with, is_canonical, DigestPrimitive,
    FingerprintError, Sha256Digest, FINGERPRINT_HEX_LEN,
};
pub use probe::{probe, ProbeOutcome, Probed};

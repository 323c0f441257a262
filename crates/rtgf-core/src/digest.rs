//! # Content Digest — Audit Integrity Anchors
//!
//! Defines `ContentDigest` and the SHA-256 digest computation path. Every
//! artifact identity in the PPE pipeline (eval plan hashes, evaluation
//! result digests) is a content digest over canonical bytes.
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`, ensuring
//! that all digests in the system are produced through the RFC 8785
//! canonicalization pipeline. This is enforced by the signature of
//! [`sha256_digest()`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// Prefix carried by every rendered digest string.
pub const DIGEST_PREFIX: &str = "sha256:";

/// A SHA-256 content digest.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`].
/// Rendered as `sha256:<64 lowercase hex chars>` — the wire form shared
/// with the rest of the RTGF toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Render the digest value as a lowercase hex string (no prefix).
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{DIGEST_PREFIX}{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// # Security Invariant
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`. This compile-time
/// constraint prevents any code path from computing a digest over
/// non-canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest { bytes }
}

/// Canonicalize a value and render its digest as `sha256:<hex>`.
///
/// The one-call digest path used by the compiler (plan hashes) and the
/// evaluator (result digests).
///
/// # Errors
///
/// Returns [`CanonicalizationError`] if the value cannot be canonicalized
/// (non-finite numbers, unsupported kinds). A canonicalization fault here
/// is fatal to the enclosing operation — a wrong digest must never be
/// produced silently.
pub fn digest_of(value: &impl Serialize) -> Result<String, CanonicalizationError> {
    let cb = CanonicalBytes::new(value)?;
    Ok(sha256_digest(&cb).to_string())
}

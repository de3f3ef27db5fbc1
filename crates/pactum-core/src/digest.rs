//! SHA-256 digests over canonical bytes.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::PactumError;

/// 32-byte SHA-256 digest. Transition ids wrap one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse 64 hex characters, either case.
    pub fn from_hex(hex: &str) -> Result<Self, PactumError> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.is_ascii() {
            return Err(PactumError::InvalidValue(format!(
                "a digest is 64 hex characters, got {hex:?}"
            )));
        }
        let mut out = [0u8; 32];
        for (slot, pair) in out.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).unwrap_or_default();
            *slot = u8::from_str_radix(pair, 16).map_err(|_| {
                PactumError::InvalidValue(format!("{pair:?} is not a hex byte in digest {hex:?}"))
            })?;
        }
        Ok(Self(out))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Only canonical bytes can be digested, so two parties hashing the same
/// transition always agree.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    ContentDigest(Sha256::digest(data.as_bytes()).into())
}

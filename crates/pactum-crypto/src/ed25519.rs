//! # Ed25519 Keys and Signatures
//!
//! A party's owning key is an [`Ed25519PublicKey`]; co-signatures on a
//! transition are [`Ed25519Signature`]s over its canonical bytes. Both
//! travel inside session messages and YAML/JSON files as lowercase hex.
//!
//! Only `&CanonicalBytes` can be signed or verified. The private half,
//! [`Ed25519KeyPair`], is not serializable, and its `Debug` shows the
//! public key only.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use pactum_core::{CanonicalBytes, CryptoError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-size byte newtype rendered as hex in serde, `Display` and (truncated)
/// `Debug`. `$bad` wraps the parse failure.
macro_rules! hex_bytes {
    ($name:ident, $len:literal, $bad:path) => {
        impl $name {
            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex(&self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
                unhex::<$len>(s)
                    .map(Self)
                    .map_err(|e| $bad(format!("{}: {e}", stringify!($name))))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..)", stringify!($name), hex(&self.0[..4]))
            }
        }
    };
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

hex_bytes!(Ed25519PublicKey, 32, CryptoError::BadKey);
hex_bytes!(Ed25519Signature, 64, CryptoError::BadSignature);

impl Ed25519PublicKey {
    /// Fails for 32-byte strings that are not a point on the curve.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::BadKey(format!("{self} is not a valid public key: {e}")))
    }
}

/// A node's signing key.
pub struct Ed25519KeyPair(SigningKey);

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        Self(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    /// The 64-hex-character form printed by `pactum keygen` and accepted in
    /// network files.
    pub fn from_seed_hex(s: &str) -> Result<Self, CryptoError> {
        unhex::<32>(s)
            .map(|seed| Self::from_seed(&seed))
            .map_err(|e| CryptoError::BadKey(format!("seed: {e}")))
    }

    pub fn seed_hex(&self) -> String {
        hex(&self.0.to_bytes())
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.0.verifying_key().to_bytes())
    }

    pub fn sign(&self, payload: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.0.sign(payload.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ed25519KeyPair")
            .field(&self.public_key())
            .finish()
    }
}

pub fn verify(
    payload: &CanonicalBytes,
    signature: &Ed25519Signature,
    key: &VerifyingKey,
) -> Result<(), CryptoError> {
    key.verify(
        payload.as_bytes(),
        &ed25519_dalek::Signature::from_bytes(&signature.0),
    )
    .map_err(|e| CryptoError::BadSignature(e.to_string()))
}

/// Check `signature` was made over `payload` by the owner of `key`.
pub fn verify_with_public_key(
    payload: &CanonicalBytes,
    signature: &Ed25519Signature,
    key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    verify(payload, signature, &key.to_verifying_key()?)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn unhex<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let s = s.trim();
    if s.len() != 2 * N || !s.is_ascii() {
        return Err(format!("want {} hex characters, got {:?}", 2 * N, s));
    }
    let mut out = [0u8; N];
    for (slot, pair) in out.iter_mut().zip(s.as_bytes().chunks(2)) {
        let pair = std::str::from_utf8(pair).unwrap_or_default();
        *slot = u8::from_str_radix(pair, 16).map_err(|_| format!("{pair:?} is not hex"))?;
    }
    Ok(out)
}

//! Errors of the foundational types. Higher layers define their own enums
//! and wrap these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PactumError {
    /// A party name, timestamp, digest or identifier failed to parse.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// A value could not be turned into canonical bytes.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    #[error("amounts must be whole numbers; {path} is {value}")]
    FractionalNumber { path: String, value: String },

    #[error("not representable as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A signature did not verify, or could not be decoded.
    #[error("bad signature: {0}")]
    BadSignature(String),

    /// A key or seed could not be decoded.
    #[error("bad key: {0}")]
    BadKey(String),

    /// The bytes to be signed could not be produced.
    #[error("nothing to sign: {0}")]
    Payload(String),
}

impl From<CanonicalizationError> for CryptoError {
    fn from(e: CanonicalizationError) -> Self {
        Self::Payload(e.to_string())
    }
}

//! # Canonical Serialization
//!
//! Initiator and counterparty each rebuild the bytes of a transition from
//! its JSON form. Those bytes have to agree exactly, because the transition
//! id is their digest and every co-signature covers them. [`CanonicalBytes`]
//! is the one place those bytes come from.
//!
//! The encoding is RFC 8785 (JCS): object keys sorted, no insignificant
//! whitespace. Numbers must be integers. Every amount on the ledger is a
//! `u64`, and a fractional number appearing in a transition means someone
//! built it by hand; the error names the offending field.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// JCS bytes of a value that contains no fractional numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    pub fn new(value: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let tree = serde_json::to_value(value)?;
        let mut path = String::from("$");
        integers_only(&tree, &mut path)?;
        Ok(Self(serde_jcs::to_vec(&tree)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk `value`, extending `path` as `$.outputs[0].total` while descending.
fn integers_only(value: &Value, path: &mut String) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) if !(n.is_u64() || n.is_i64()) => {
            Err(CanonicalizationError::FractionalNumber {
                path: path.clone(),
                value: n.to_string(),
            })
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{i}]"));
                integers_only(item, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        Value::Object(fields) => {
            for (key, field) in fields {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                integers_only(field, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

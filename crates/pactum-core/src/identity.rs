//! # Identifier Newtypes
//!
//! - [`LinearId`]: stable identity of a versioned ledger object across all
//!   of its versions. Assigned once at creation, never changed.
//! - [`TransitionId`]: content address of a transition (SHA-256 over its
//!   canonical bytes). Serialized as 64 lowercase hex characters.
//! - [`PartyName`]: X.500-style legal name of a ledger participant,
//!   rendered `O=<organisation>, L=<locality>, C=<country>`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::ContentDigest;
use crate::error::PactumError;

// ─── LinearId ───────────────────────────────────────────────────────

/// Stable identifier of a linear (versioned) ledger object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinearId(pub Uuid);

impl LinearId {
    /// Create a new random linear id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from the hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, PactumError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| PactumError::InvalidValue(format!("invalid linear id {s:?}: {e}")))
    }
}

impl Default for LinearId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinearId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── TransitionId ───────────────────────────────────────────────────

/// Content address of a transition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransitionId(ContentDigest);

impl TransitionId {
    pub fn from_digest(digest: ContentDigest) -> Self {
        Self(digest)
    }

    pub fn digest(&self) -> &ContentDigest {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        let mut hex = self.0.to_hex();
        hex.truncate(12);
        hex
    }
}

impl TryFrom<String> for TransitionId {
    type Error = PactumError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ContentDigest::from_hex(&s).map(Self)
    }
}

impl From<TransitionId> for String {
    fn from(id: TransitionId) -> Self {
        id.to_hex()
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

// ─── PartyName ──────────────────────────────────────────────────────

/// X.500-style legal name of a party.
///
/// Serialized as its rendered string form, so it can key JSON maps and
/// appear in YAML network files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyName {
    organisation: String,
    locality: String,
    country: String,
}

impl PartyName {
    /// Build a validated name.
    ///
    /// Organisation and locality must be non-empty and must not contain
    /// `,` or `=`. Country is a two-letter uppercase ISO 3166 code.
    pub fn new(
        organisation: impl Into<String>,
        locality: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, PactumError> {
        let organisation = organisation.into().trim().to_string();
        let locality = locality.into().trim().to_string();
        let country = country.into().trim().to_string();

        for (attr, value) in [("O", &organisation), ("L", &locality)] {
            if value.is_empty() {
                return Err(PactumError::InvalidValue(format!(
                    "party name attribute {attr} must not be empty"
                )));
            }
            if value.contains(',') || value.contains('=') {
                return Err(PactumError::InvalidValue(format!(
                    "party name attribute {attr} contains a reserved character: {value:?}"
                )));
            }
        }
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(PactumError::InvalidValue(format!(
                "country must be a two-letter uppercase code, got {country:?}"
            )));
        }

        Ok(Self {
            organisation,
            locality,
            country,
        })
    }

    /// Parse the rendered form `O=.., L=.., C=..`. Attribute order is free.
    pub fn parse(s: &str) -> Result<Self, PactumError> {
        let mut organisation = None;
        let mut locality = None;
        let mut country = None;

        for part in s.split(',') {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                PactumError::InvalidValue(format!("malformed party name attribute {part:?}"))
            })?;
            let slot = match key.trim() {
                "O" => &mut organisation,
                "L" => &mut locality,
                "C" => &mut country,
                other => {
                    return Err(PactumError::InvalidValue(format!(
                        "unknown party name attribute {other:?}"
                    )))
                }
            };
            if slot.replace(value.trim().to_string()).is_some() {
                return Err(PactumError::InvalidValue(format!(
                    "duplicate party name attribute {:?}",
                    key.trim()
                )));
            }
        }

        match (organisation, locality, country) {
            (Some(o), Some(l), Some(c)) => Self::new(o, l, c),
            _ => Err(PactumError::InvalidValue(format!(
                "party name requires O, L and C attributes: {s:?}"
            ))),
        }
    }

    /// Whether the given string is a full rendered name (as opposed to a
    /// bare organisation).
    pub fn looks_qualified(s: &str) -> bool {
        s.contains("O=")
    }

    pub fn organisation(&self) -> &str {
        &self.organisation
    }

    pub fn locality(&self) -> &str {
        &self.locality
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Case-insensitive organisation match.
    pub fn matches_organisation(&self, organisation: &str) -> bool {
        self.organisation
            .to_lowercase()
            .eq(&organisation.trim().to_lowercase())
    }
}

impl TryFrom<String> for PartyName {
    type Error = PactumError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PartyName> for String {
    fn from(name: PartyName) -> Self {
        name.to_string()
    }
}

impl std::fmt::Display for PartyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "O={}, L={}, C={}",
            self.organisation, self.locality, self.country
        )
    }
}

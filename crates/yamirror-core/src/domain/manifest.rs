//! File manifests and content digests
//!
//! A [`FileManifest`] is a snapshot of a file set: a mapping from file name
//! to [`ContentDigest`]. Two manifests are comparable because both sides
//! carry SHA-256 digests in the same lowercase-hex encoding, so digest
//! equality is a byte-for-byte string comparison.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// ContentDigest
// ============================================================================

/// SHA-256 digest of a file's full byte content, lowercase hex encoded.
///
/// Validated at construction: exactly 64 characters, all lowercase hex.
/// Uppercase input is rejected rather than folded so that equality with
/// server-provided digests stays a plain string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Hex length of a 256-bit digest
    const HEX_LEN: usize = 64;

    /// Create a new ContentDigest from its hex representation
    ///
    /// # Errors
    /// Returns an error if the string is not 64 lowercase hex characters.
    pub fn new(digest: String) -> Result<Self, DomainError> {
        if digest.len() != Self::HEX_LEN {
            return Err(DomainError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                digest.len()
            )));
        }

        if !digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(DomainError::InvalidDigest(format!(
                "not lowercase hex: {digest}"
            )));
        }

        Ok(Self(digest))
    }

    /// Build a digest from raw SHA-256 output bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Get the inner hex string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentDigest {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContentDigest> for String {
    fn from(digest: ContentDigest) -> Self {
        digest.0
    }
}

// ============================================================================
// FileManifest
// ============================================================================

/// Mapping of file name to content digest, one snapshot of a file set.
///
/// File names are opaque, case-sensitive keys. Backed by a `BTreeMap`, so
/// a name can never appear twice and iteration order is deterministic,
/// which keeps the reconciler's log output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    entries: BTreeMap<String, ContentDigest>,
}

impl FileManifest {
    /// Create an empty manifest
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file's digest. A later insert for the same name wins.
    pub fn insert(&mut self, name: impl Into<String>, digest: ContentDigest) {
        self.entries.insert(name.into(), digest);
    }

    /// Digest recorded for `name`, if any
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ContentDigest> {
        self.entries.get(name)
    }

    /// Whether the manifest contains `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// File names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, digest)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentDigest)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ContentDigest)> for FileManifest {
    fn from_iter<I: IntoIterator<Item = (String, ContentDigest)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FileManifest {
    type Item = (String, ContentDigest);
    type IntoIter = btree_map::IntoIter<String, ContentDigest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ============================================================================
// Unit tests
// ============================================================================

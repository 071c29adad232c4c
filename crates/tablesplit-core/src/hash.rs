// Hash algorithms for split_on_hashed_column
//
// All algorithms produce a lowercase hex digest; batches match on a suffix
// of that digest.

use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::SplitError;

/// Supported digest algorithms for hashed-column splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFunction {
    Md5,
    Sha1,
    Sha256,
    Blake3,
}

impl HashFunction {
    pub const ALL: [HashFunction; 4] = [
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Sha256,
        HashFunction::Blake3,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashFunction::Md5 => "md5",
            HashFunction::Sha1 => "sha1",
            HashFunction::Sha256 => "sha256",
            HashFunction::Blake3 => "blake3",
        }
    }

    /// Lowercase hex digest of `input`.
    pub fn hex_digest(&self, input: &[u8]) -> String {
        match self {
            HashFunction::Md5 => hex::encode(Md5::digest(input)),
            HashFunction::Sha1 => hex::encode(Sha1::digest(input)),
            HashFunction::Sha256 => hex::encode(Sha256::digest(input)),
            HashFunction::Blake3 => blake3::hash(input).to_hex().to_string(),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashFunction {
    type Err = SplitError;

    /// Case-insensitive lookup by canonical name. The common aliases with
    /// dashes (`sha-1`, `sha-256`) are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase().replace('-', "");
        HashFunction::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lowered)
            .ok_or_else(|| SplitError::UnknownHashFunction {
                name: s.to_string(),
                supported: supported_names(),
            })
    }
}

impl Serialize for HashFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HashFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

fn supported_names() -> String {
    HashFunction::ALL
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Last `digits` characters of a hex digest.
///
/// Zero digits selects the whole digest, so a batch pinned with digits=0
/// matches on the full hash. Requests longer than the digest return the
/// digest unchanged.
pub(crate) fn hex_suffix(digest: &str, digits: usize) -> &str {
    if digits == 0 {
        return digest;
    }
    let start = digest.len().saturating_sub(digits);
    &digest[start..]
}

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Number of hex chars kept when the store mints a new id.
pub const MINTED_ID_LEN: usize = 16;

/// Minimum prefix length accepted when resolving an id by prefix.
pub const MIN_PREFIX_LEN: usize = 4;

/// Stable identifier of a task.
///
/// Ids handed in by an external store are opaque strings; ids minted by
/// `taskboard-store` are truncated SHA-256 hex digests.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Mint an id by hashing raw bytes.
    pub fn mint(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut hex = hex::encode(digest);
        hex.truncate(MINTED_ID_LEN);
        Self(hex)
    }

    /// Accept any non-empty id without inner whitespace.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidTaskId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 chars, used in compact listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

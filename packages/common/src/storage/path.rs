use std::fmt;

use uuid::Uuid;

use super::error::StorageError;

/// Opaque locator for a stored blob.
///
/// Generated fresh for every write and never derived from client input, so two
/// uploads can never share a location even when their filenames collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoragePath(Uuid);

impl StoragePath {
    /// Generate a new, unused locator.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the persisted text form of a locator.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let uuid = Uuid::try_parse(s)
            .map_err(|e| StorageError::InvalidPath(format!("{s:?}: {e}")))?;
        Ok(Self(uuid))
    }

    /// The canonical text form (lowercase, hyphenated).
    pub fn as_key(&self) -> String {
        self.0.hyphenated().to_string()
    }

    /// First two characters of the key, used as the shard directory.
    pub fn shard_prefix(&self) -> String {
        self.as_key()[..2].to_string()
    }

    /// Remainder of the key, used as the file name within the shard.
    pub fn shard_suffix(&self) -> String {
        self.as_key()[2..].to_string()
    }
}

impl fmt::Debug for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoragePath({})", self.as_key())
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

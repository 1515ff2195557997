//! Object listing entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about a stored object, as returned by a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time reported by the store
    pub last_modified: DateTime<Utc>,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }
}

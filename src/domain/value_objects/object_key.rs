use serde::{Deserialize, Serialize};
use std::fmt;

/// Object-store key under which a label's image bytes are stored
///
/// Keys built for labels always follow the `{username}/{label_name}` layout.
/// Keys read back from the metadata store are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build the key for a user's label
    #[must_use]
    pub fn for_label(username: &str, label_name: &str) -> Self {
        Self(format!("{username}/{label_name}"))
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

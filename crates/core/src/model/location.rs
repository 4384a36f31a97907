use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identity of a file inside a scanned tree.
///
/// `real_path` is the canonical path after symlink resolution and is the only
/// field used for equality, hashing and ordering. `access_path` records how the
/// resolver reached the file (e.g. through a symlink) and is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    real_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_path: Option<String>,
}

impl Location {
    /// Location reached directly through its real path.
    pub fn new(real_path: impl Into<String>) -> Self {
        Self { real_path: real_path.into(), access_path: None }
    }

    /// Location reached through a different (virtual) path.
    ///
    /// If both paths are the same the access path is dropped.
    pub fn with_access_path(real_path: impl Into<String>, access_path: impl Into<String>) -> Self {
        let real_path = real_path.into();
        let access_path = access_path.into();
        if access_path == real_path {
            Self { real_path, access_path: None }
        } else {
            Self { real_path, access_path: Some(access_path) }
        }
    }

    pub fn real_path(&self) -> &str {
        &self.real_path
    }

    /// Path the file was reached through; falls back to the real path.
    pub fn access_path(&self) -> &str {
        self.access_path.as_deref().unwrap_or(&self.real_path)
    }

    /// Final path component of the real path.
    pub fn basename(&self) -> &str {
        self.real_path.rsplit('/').next().unwrap_or(&self.real_path)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.real_path == other.real_path
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.real_path.hash(state);
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.real_path.cmp(&other.real_path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.access_path {
            Some(access) => write!(f, "{} (via {})", self.real_path, access),
            None => f.write_str(&self.real_path),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named values extracted from evidence, keyed by capture-group name.
pub type Metadata = BTreeMap<String, String>;

/// Outcome of one classifier matching one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub class: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Classification {
    pub fn new(class: impl Into<String>, metadata: Metadata) -> Self {
        Self { class: class.into(), metadata }
    }

    /// Convenience accessor for the canonical `version` capture.
    pub fn version(&self) -> Option<&str> {
        self.metadata.get("version").map(String::as_str)
    }
}

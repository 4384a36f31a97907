//! Classifier definitions and the validated classifier set.
//!
//! A classifier pairs a cheap path selector with one or more byte-level
//! evidence patterns. Named capture groups in an evidence pattern become the
//! metadata of the resulting classification.

use std::collections::HashSet;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{Classification, Location, Metadata};

mod defaults;
mod template;

pub use defaults::{default_definitions, SMALL_FILE_READ_LIMIT};
pub use template::PathCaptures;

use template::EvidenceTemplate;

/// Configuration errors raised while building classifiers.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier set is empty")]
    EmptySet,

    #[error("Classifier has an empty class name")]
    EmptyClass,

    #[error("Duplicate classifier class '{0}'")]
    DuplicateClass(String),

    #[error("Classifier '{class}' has no file patterns")]
    MissingFilePattern { class: String },

    #[error("Classifier '{class}' has no evidence patterns")]
    MissingEvidencePattern { class: String },

    #[error("Classifier '{class}': invalid file pattern '{pattern}': {source}")]
    InvalidFilePattern { class: String, pattern: String, source: regex::Error },

    #[error("Classifier '{class}': invalid evidence pattern '{pattern}': {source}")]
    InvalidEvidencePattern { class: String, pattern: String, source: regex::Error },

    /// An evidence template references a variable that some file pattern does
    /// not capture, so the template could not always be rendered.
    #[error(
        "Classifier '{class}': evidence pattern variable '{variable}' is not a named group of every file pattern"
    )]
    UnknownTemplateVariable { class: String, variable: String },

    #[error("Classifier '{class}' has a read limit of zero bytes")]
    ZeroReadLimit { class: String },
}

/// Serializable, uncompiled form of a classifier.
///
/// This is what the default table and user configuration files contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassifierDefinition {
    /// Class name copied onto every classification (e.g. `go-binary`).
    pub class: String,
    /// Regular expressions over the real path; any match selects the file.
    pub file_patterns: Vec<String>,
    /// Byte-level regular expressions, optionally templated with `{{name}}`.
    pub evidence_patterns: Vec<String>,
    /// Maximum number of bytes to read. `None` scans up to the run ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_limit: Option<u64>,
}

impl ClassifierDefinition {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            file_patterns: Vec::new(),
            evidence_patterns: Vec::new(),
            read_limit: None,
        }
    }

    pub fn file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_patterns.push(pattern.into());
        self
    }

    pub fn evidence_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.evidence_patterns.push(pattern.into());
        self
    }

    pub fn read_limit(mut self, limit: u64) -> Self {
        self.read_limit = Some(limit);
        self
    }
}

/// A compiled, immutable classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    definition: ClassifierDefinition,
    file_patterns: Vec<Regex>,
    evidence: Vec<EvidenceTemplate>,
}

impl Classifier {
    /// Compile and validate a definition.
    pub fn from_definition(definition: ClassifierDefinition) -> Result<Self, ClassifierError> {
        let class = definition.class.trim();
        if class.is_empty() {
            return Err(ClassifierError::EmptyClass);
        }
        let class = class.to_string();
        if definition.file_patterns.is_empty() {
            return Err(ClassifierError::MissingFilePattern { class });
        }
        if definition.evidence_patterns.is_empty() {
            return Err(ClassifierError::MissingEvidencePattern { class });
        }
        if definition.read_limit == Some(0) {
            return Err(ClassifierError::ZeroReadLimit { class });
        }

        let mut file_patterns = Vec::with_capacity(definition.file_patterns.len());
        for pattern in &definition.file_patterns {
            let regex = Regex::new(pattern).map_err(|source| {
                ClassifierError::InvalidFilePattern {
                    class: class.clone(),
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            file_patterns.push(regex);
        }

        let mut evidence = Vec::with_capacity(definition.evidence_patterns.len());
        for pattern in &definition.evidence_patterns {
            let template = EvidenceTemplate::compile(pattern).map_err(|source| {
                ClassifierError::InvalidEvidencePattern {
                    class: class.clone(),
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            for variable in template.variables() {
                let captured_everywhere = file_patterns
                    .iter()
                    .all(|p| p.capture_names().flatten().any(|name| name == variable));
                if !captured_everywhere {
                    return Err(ClassifierError::UnknownTemplateVariable {
                        class: class.clone(),
                        variable: variable.to_string(),
                    });
                }
            }
            evidence.push(template);
        }

        let definition = ClassifierDefinition { class, ..definition };
        Ok(Self { definition, file_patterns, evidence })
    }

    pub fn class(&self) -> &str {
        &self.definition.class
    }

    pub fn read_limit(&self) -> Option<u64> {
        self.definition.read_limit
    }

    pub fn definition(&self) -> &ClassifierDefinition {
        &self.definition
    }

    /// Cheap path filter. Returns the named path captures of the first file
    /// pattern that matches the location's real path, or `None` when the
    /// classifier does not apply. Never touches content.
    pub fn select(&self, location: &Location) -> Option<PathCaptures> {
        let path = location.real_path();
        self.file_patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(path)?;
            let captures = pattern
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name).map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect::<PathCaptures>();
            Some(captures)
        })
    }

    /// Content probe over raw bytes.
    ///
    /// Evidence patterns are tried in order; the first one that matches
    /// creates the classification and later matches merge their named groups
    /// into it. Only groups that participated in the leftmost match are kept.
    pub fn probe(&self, content: &[u8], captures: &PathCaptures) -> Option<Classification> {
        let mut result: Option<Classification> = None;
        for template in &self.evidence {
            let pattern = match template.pattern(captures) {
                Ok(Some(pattern)) => pattern,
                Ok(None) => continue,
                Err(err) => {
                    warn!(class = %self.class(), "Skipping unrenderable evidence pattern: {err}");
                    continue;
                }
            };
            let Some(metadata) = named_groups(&pattern, content) else { continue };
            match result.as_mut() {
                Some(existing) => existing.metadata.extend(metadata),
                None => result = Some(Classification::new(self.class(), metadata)),
            }
        }
        result
    }
}

fn named_groups(pattern: &BytesRegex, content: &[u8]) -> Option<Metadata> {
    let caps = pattern.captures(content)?;
    let metadata = pattern
        .capture_names()
        .flatten()
        .filter_map(|name| {
            caps.name(name)
                .map(|m| (name.to_string(), String::from_utf8_lossy(m.as_bytes()).into_owned()))
        })
        .collect();
    Some(metadata)
}

/// Ordered, validated collection of classifiers.
///
/// Built once and shared read-only (typically behind an `Arc`) by every
/// cataloger that uses it.
#[derive(Debug, Clone)]
pub struct ClassifierSet {
    classifiers: Vec<Classifier>,
}

impl ClassifierSet {
    /// Compile the given definitions, preserving their order.
    pub fn new(
        definitions: impl IntoIterator<Item = ClassifierDefinition>,
    ) -> Result<Self, ClassifierError> {
        let mut seen = HashSet::new();
        let mut classifiers = Vec::new();
        for definition in definitions {
            let classifier = Classifier::from_definition(definition)?;
            if !seen.insert(classifier.class().to_string()) {
                return Err(ClassifierError::DuplicateClass(classifier.class().to_string()));
            }
            classifiers.push(classifier);
        }
        if classifiers.is_empty() {
            return Err(ClassifierError::EmptySet);
        }
        Ok(Self { classifiers })
    }

    /// The built-in runtime fingerprints.
    pub fn defaults() -> Result<Self, ClassifierError> {
        Self::new(default_definitions())
    }

    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Classifier> {
        self.classifiers.iter()
    }

    pub fn get(&self, class: &str) -> Option<&Classifier> {
        self.classifiers.iter().find(|c| c.class() == class)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn definitions(&self) -> Vec<ClassifierDefinition> {
        self.classifiers.iter().map(|c| c.definition.clone()).collect()
    }
}

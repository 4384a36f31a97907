//! classify-core
//!
//! Core library for fingerprinting software artifacts (language runtimes,
//! interpreters, standalone binaries) inside a filesystem tree.
//!
//! This crate defines the data model, the classifier definitions, the resolver
//! abstraction over a scanned tree, the evidence matcher and the cataloger that
//! drives them. Nothing in here executes or modifies scanned files.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, other SBOM tooling, etc.).

pub mod classifiers;
pub mod config;
pub mod model;
pub mod services;
pub mod source;

pub use classifiers::{Classifier, ClassifierDefinition, ClassifierError, ClassifierSet};
pub use model::{CatalogResult, Classification, Location};
pub use services::cataloger::{CatalogError, CatalogerOptions, ClassificationCataloger};
pub use source::{FileResolver, ResolutionError, Scope};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

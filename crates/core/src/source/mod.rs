//! Resolver abstraction over a scanned tree.
//!
//! The cataloger only needs three things from a source: enumerate every
//! location, open a byte stream for a location, and a real path identity per
//! location (carried by `Location` itself). This module defines that contract
//! and ships a few resolvers:
//! - `DirectoryResolver`: a directory on the local filesystem.
//! - `MemoryResolver`: an in-memory tree, handy for tests and embedding.
//! - `SerializedResolver`: wraps a resolver that must not be called concurrently.

use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Location;

mod directory;
mod memory;
mod serialized;

pub use directory::DirectoryResolver;
pub use memory::MemoryResolver;
pub use serialized::SerializedResolver;

/// Owned byte stream for one location's content.
pub type ContentReader = Box<dyn Read + Send>;

/// Errors raised while enumerating or reading a source.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to resolve source root {path}: {source}")]
    Root { path: PathBuf, source: io::Error },

    #[error("Failed to walk {root}: {source}")]
    Walk { root: PathBuf, source: walkdir::Error },

    #[error("Failed to open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Resolver lock was poisoned by a panicking worker")]
    Poisoned,
}

/// View of the source presented by a resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// One flattened view of the tree.
    #[default]
    Squashed,
    /// Every layer individually.
    AllLayers,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Squashed => "squashed",
            Scope::AllLayers => "all-layers",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown scope '{0}' (expected 'squashed' or 'all-layers')")]
pub struct ParseScopeError(pub String);

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "squashed" => Ok(Scope::Squashed),
            "all-layers" | "alllayers" => Ok(Scope::AllLayers),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}

/// Contract between the cataloger and whatever presents the scanned tree.
///
/// `open` returns `Ok(None)` only for locations the resolver considers
/// expected-absent; every other failure is an error and aborts the run.
pub trait FileResolver {
    fn scope(&self) -> Scope;

    /// One consistent snapshot of every location in the tree.
    fn locations(&self) -> Result<Vec<Location>, ResolutionError>;

    fn open(&self, location: &Location) -> Result<Option<ContentReader>, ResolutionError>;
}

impl<R: FileResolver + ?Sized> FileResolver for &R {
    fn scope(&self) -> Scope {
        (**self).scope()
    }

    fn locations(&self) -> Result<Vec<Location>, ResolutionError> {
        (**self).locations()
    }

    fn open(&self, location: &Location) -> Result<Option<ContentReader>, ResolutionError> {
        (**self).open(location)
    }
}

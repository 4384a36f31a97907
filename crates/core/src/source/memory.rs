use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use super::{ContentReader, FileResolver, ResolutionError, Scope};
use crate::model::Location;

#[derive(Debug, Clone)]
enum Content {
    Bytes(Arc<[u8]>),
    /// Expected-absent: `open` reports no content rather than an error.
    Absent,
    /// `open` fails with the given error kind.
    Unopenable(io::ErrorKind),
    /// `open` succeeds but every read fails with the given error kind.
    Unreadable(io::ErrorKind),
}

/// In-memory resolver over a fixed set of paths.
///
/// Locations are enumerated in insertion order. A path may be enumerated
/// several times through `link`, which models a file reachable through more
/// than one virtual path.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    scope: Scope,
    order: Vec<Location>,
    contents: HashMap<String, Content>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Add a regular file.
    pub fn file(self, path: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        let bytes: Arc<[u8]> = Arc::from(content.as_ref());
        self.insert(path.into(), Content::Bytes(bytes))
    }

    /// Enumerate `real_path` again, reached through `access_path`.
    pub fn link(mut self, access_path: impl Into<String>, real_path: impl Into<String>) -> Self {
        self.order.push(Location::with_access_path(real_path, access_path));
        self
    }

    /// Add a location whose content the resolver reports as absent.
    pub fn absent(self, path: impl Into<String>) -> Self {
        self.insert(path.into(), Content::Absent)
    }

    /// Add a location that cannot be opened.
    pub fn unopenable(self, path: impl Into<String>, kind: io::ErrorKind) -> Self {
        self.insert(path.into(), Content::Unopenable(kind))
    }

    /// Add a location that opens but fails on read.
    pub fn unreadable(self, path: impl Into<String>, kind: io::ErrorKind) -> Self {
        self.insert(path.into(), Content::Unreadable(kind))
    }

    fn insert(mut self, path: String, content: Content) -> Self {
        self.order.push(Location::new(path.clone()));
        self.contents.insert(path, content);
        self
    }
}

impl FileResolver for MemoryResolver {
    fn scope(&self) -> Scope {
        self.scope
    }

    fn locations(&self) -> Result<Vec<Location>, ResolutionError> {
        Ok(self.order.clone())
    }

    fn open(&self, location: &Location) -> Result<Option<ContentReader>, ResolutionError> {
        let path = location.real_path();
        match self.contents.get(path) {
            Some(Content::Bytes(bytes)) => Ok(Some(Box::new(Cursor::new(Arc::clone(bytes))))),
            Some(Content::Absent) => Ok(None),
            Some(Content::Unopenable(kind)) => Err(ResolutionError::Open {
                path: path.to_string(),
                source: io::Error::new(*kind, "unopenable in-memory entry"),
            }),
            Some(Content::Unreadable(kind)) => Ok(Some(Box::new(FailingReader(*kind)))),
            None => Err(ResolutionError::Open {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such in-memory entry"),
            }),
        }
    }
}

struct FailingReader(io::ErrorKind);

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(self.0, "unreadable in-memory entry"))
    }
}

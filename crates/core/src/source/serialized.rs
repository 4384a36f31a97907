use std::sync::Mutex;

use super::{ContentReader, FileResolver, ResolutionError, Scope};
use crate::model::Location;

/// Makes a resolver that is not safe for concurrent use shareable across
/// cataloger workers.
///
/// Every call into the inner resolver happens under one lock. Readers returned
/// by `open` are owned, so content reads and pattern matching still run
/// concurrently.
#[derive(Debug)]
pub struct SerializedResolver<R> {
    scope: Scope,
    inner: Mutex<R>,
}

impl<R: FileResolver> SerializedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { scope: inner.scope(), inner: Mutex::new(inner) }
    }

    pub fn into_inner(self) -> Result<R, ResolutionError> {
        self.inner.into_inner().map_err(|_| ResolutionError::Poisoned)
    }
}

impl<R: FileResolver> FileResolver for SerializedResolver<R> {
    fn scope(&self) -> Scope {
        self.scope
    }

    fn locations(&self) -> Result<Vec<Location>, ResolutionError> {
        let inner = self.inner.lock().map_err(|_| ResolutionError::Poisoned)?;
        inner.locations()
    }

    fn open(&self, location: &Location) -> Result<Option<ContentReader>, ResolutionError> {
        let inner = self.inner.lock().map_err(|_| ResolutionError::Poisoned)?;
        inner.open(location)
    }
}

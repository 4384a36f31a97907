//! Classification cataloger: runs every classifier over every location of a
//! resolver and folds the matches into a `CatalogResult`.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classifiers::{ClassifierDefinition, ClassifierError, ClassifierSet};
use crate::model::{CatalogResult, Classification, Location};
use crate::services::matcher;
use crate::source::{FileResolver, ResolutionError};

/// Hard ceiling on bytes read per (location, classifier) pair.
pub const DEFAULT_MAX_READ_BYTES: u64 = 128 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Failed to start cataloging workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Read ceiling must be greater than zero bytes")]
    ZeroReadCeiling,
}

/// Tuning knobs for a cataloger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogerOptions {
    /// Worker threads; `0` uses one per CPU.
    #[serde(default)]
    pub parallelism: usize,
    /// Upper bound on bytes read for any classifier, including unbounded ones.
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,
}

fn default_max_read_bytes() -> u64 {
    DEFAULT_MAX_READ_BYTES
}

impl Default for CatalogerOptions {
    fn default() -> Self {
        Self { parallelism: 0, max_read_bytes: DEFAULT_MAX_READ_BYTES }
    }
}

/// Applies a shared, read-only classifier set to resolvers.
///
/// Locations are matched in parallel on a bounded worker pool; each worker
/// produces one location's ordered classification list and a single reducer
/// merges them in enumeration order, so results do not depend on scheduling.
#[derive(Debug, Clone)]
pub struct ClassificationCataloger {
    classifiers: Arc<ClassifierSet>,
    options: CatalogerOptions,
}

impl ClassificationCataloger {
    pub fn new(classifiers: Arc<ClassifierSet>) -> Self {
        Self { classifiers, options: CatalogerOptions::default() }
    }

    pub fn with_options(
        classifiers: Arc<ClassifierSet>,
        options: CatalogerOptions,
    ) -> Result<Self, CatalogError> {
        if options.max_read_bytes == 0 {
            return Err(CatalogError::ZeroReadCeiling);
        }
        Ok(Self { classifiers, options })
    }

    /// Compile `definitions` into a fresh set and build a cataloger over it.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ClassifierDefinition>,
    ) -> Result<Self, ClassifierError> {
        Ok(Self::new(Arc::new(ClassifierSet::new(definitions)?)))
    }

    pub fn classifiers(&self) -> &ClassifierSet {
        &self.classifiers
    }

    pub fn options(&self) -> CatalogerOptions {
        self.options
    }

    /// Catalog every location the resolver enumerates.
    ///
    /// Fails on the first enumeration or content error; no partial result is
    /// returned in that case.
    pub fn catalog<R>(&self, resolver: &R) -> Result<CatalogResult, CatalogError>
    where
        R: FileResolver + Sync + ?Sized,
    {
        let started = Instant::now();
        let locations = resolver.locations()?;
        let enumerated = locations.len();
        info!(
            scope = %resolver.scope(),
            locations = enumerated,
            classifiers = self.classifiers.len(),
            "Cataloging started"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.parallelism)
            .thread_name(|i| format!("classify-worker-{i}"))
            .build()?;

        let classified = pool.install(|| {
            locations
                .into_par_iter()
                .map(|location| {
                    let found = self.classify_location(resolver, &location)?;
                    Ok((location, found))
                })
                .collect::<Result<Vec<_>, ResolutionError>>()
        })?;

        let mut result = CatalogResult::new();
        for (location, classifications) in classified {
            result.merge(location, classifications);
        }

        info!(
            locations = enumerated,
            classified = result.len(),
            classifications = result.classification_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cataloging finished"
        );
        Ok(result)
    }

    /// Run every classifier, in definition order, against one location.
    pub fn classify_location<R>(
        &self,
        resolver: &R,
        location: &Location,
    ) -> Result<Vec<Classification>, ResolutionError>
    where
        R: FileResolver + ?Sized,
    {
        let mut found = Vec::new();
        for classifier in self.classifiers.iter() {
            if let Some(classification) =
                matcher::classify(classifier, location, resolver, self.options.max_read_bytes)?
            {
                found.push(classification);
            }
        }
        if found.len() > 1 {
            debug!(path = %location.real_path(), matches = found.len(), "Multiple classifiers matched");
        }
        Ok(found)
    }
}

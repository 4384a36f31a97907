//! Evidence matcher: evaluates one classifier against one location.

use std::io::Read;

use tracing::{debug, trace};

use crate::classifiers::Classifier;
use crate::model::{Classification, Location};
use crate::source::{FileResolver, ResolutionError};

/// Effective number of bytes to read for a classifier under a run ceiling.
pub fn read_bound(classifier: &Classifier, ceiling: u64) -> u64 {
    classifier.read_limit().map_or(ceiling, |limit| limit.min(ceiling))
}

/// Evaluate `classifier` against `location`.
///
/// Content is opened only when the classifier's path selector accepts the
/// location, and at most `read_bound(classifier, ceiling)` bytes are read. The
/// content handle is dropped before returning on every path. A location the
/// resolver reports as absent is a no-match; any other I/O failure is an error.
pub fn classify<R: FileResolver + ?Sized>(
    classifier: &Classifier,
    location: &Location,
    resolver: &R,
    ceiling: u64,
) -> Result<Option<Classification>, ResolutionError> {
    let Some(captures) = classifier.select(location) else {
        return Ok(None);
    };
    trace!(class = %classifier.class(), path = %location.real_path(), "Selected for content probe");

    let bound = read_bound(classifier, ceiling);
    let Some(content) = read_content(resolver, location, bound)? else {
        debug!(path = %location.real_path(), "Content absent, treating as no match");
        return Ok(None);
    };

    let classification = classifier.probe(&content, &captures);
    if let Some(found) = &classification {
        debug!(
            class = %found.class,
            path = %location.real_path(),
            version = found.version().unwrap_or("-"),
            "Classified location"
        );
    }
    Ok(classification)
}

/// Read at most `bound` bytes of a location's content as opaque bytes.
pub fn read_content<R: FileResolver + ?Sized>(
    resolver: &R,
    location: &Location,
    bound: u64,
) -> Result<Option<Vec<u8>>, ResolutionError> {
    let Some(reader) = resolver.open(location)? else {
        return Ok(None);
    };
    let mut content = Vec::new();
    reader.take(bound).read_to_end(&mut content).map_err(|source| ResolutionError::Read {
        path: location.real_path().to_string(),
        source,
    })?;
    Ok(Some(content))
}

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::{Classification, Location};

/// Result of one cataloging run: every location that at least one classifier
/// matched, with its classifications in classifier definition order.
///
/// A location that nothing matched is absent. Iteration and serialization are
/// ordered by real path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogResult {
    entries: BTreeMap<Location, Vec<Classification>>,
}

/// Borrowed view of one catalog entry, used for iteration and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry<'a> {
    pub location: &'a Location,
    pub classifications: &'a [Classification],
}

impl CatalogResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one location's classifications into the result.
    ///
    /// Empty lists are ignored so unmatched locations never become keys. When
    /// the same real path is merged more than once the classifications are
    /// appended in merge order, skipping classes the location already carries.
    pub fn merge(&mut self, location: Location, classifications: Vec<Classification>) {
        if classifications.is_empty() {
            return;
        }
        match self.entries.entry(location) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(classifications);
            }
            btree_map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                for classification in classifications {
                    if !existing.iter().any(|c| c.class == classification.class) {
                        existing.push(classification);
                    }
                }
            }
        }
    }

    pub fn get(&self, location: &Location) -> Option<&[Classification]> {
        self.entries.get(location).map(Vec::as_slice)
    }

    /// Look up a location by its real path.
    pub fn get_by_path(&self, real_path: &str) -> Option<&[Classification]> {
        self.get(&Location::new(real_path))
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.entries.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.entries.iter().map(|(location, classifications)| CatalogEntry {
            location,
            classifications: classifications.as_slice(),
        })
    }

    /// Total number of classifications across all locations.
    pub fn classification_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn into_inner(self) -> BTreeMap<Location, Vec<Classification>> {
        self.entries
    }
}

impl Serialize for CatalogResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

//! Core data model for classification runs.
//!
//! - `Location`: resolver-issued identity of a file, keyed by real path.
//! - `Classification`: one classifier's verdict on one location.
//! - `CatalogResult`: the aggregated mapping produced by a cataloging run.

mod catalog;
mod classification;
mod location;

pub use catalog::{CatalogEntry, CatalogResult};
pub use classification::{Classification, Metadata};
pub use location::Location;

pub mod classifiers;
pub mod config;
pub mod scan;

pub use classifiers::*;
pub use config::*;
pub use scan::*;

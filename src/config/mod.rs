//! Layered configuration: defaults → global → project → environment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CatalogConfig, Config, DetectionConfig, OutputFormat, SourcegraphConfig};

//! eventscope - Event Producer Discovery and AsyncAPI Catalog Generation
//!
//! Scans source repositories for textual patterns indicating event-producing
//! code (publish/send/emit calls across messaging broker idioms), extracts
//! lightweight metadata per call site, and renders it into AsyncAPI 3.0
//! documents plus a catalog index and a human-readable summary report.
//!
//! ## Pipeline
//!
//! Extractor consumes raw matches, produces event records; the generator
//! consumes event records, produces a document; the catalog writer persists
//! documents plus the index.
//!
//! ```ignore
//! use eventscope::corpus::LocalCorpus;
//! use eventscope::detector::EventDetector;
//! use eventscope::generator::SpecGenerator;
//!
//! let corpus = LocalCorpus::new("/path/to/checkout");
//! let detector = EventDetector::all_brokers()?;
//! let events = detector.detect("my-service", &corpus).await?;
//! let spec = SpecGenerator::new().generate("my-service", &events, "1.0.0");
//! ```
//!
//! ## Modules
//!
//! - [`detector`]: pattern library and event extraction
//! - [`corpus`]: corpus accessors (Sourcegraph API, local filesystem)
//! - [`generator`]: AsyncAPI document generation
//! - [`catalog`]: catalog persistence, index, and reports
//! - [`config`]: layered configuration

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod detector;
pub mod generator;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::error::{Result, ScopeError};

// Domain
pub use types::event::{Broker, EventRecord};

// Pipeline
pub use catalog::CatalogWriter;
pub use corpus::{CorpusAccessor, LocalCorpus, SourcegraphClient};
pub use detector::EventDetector;
pub use generator::SpecGenerator;

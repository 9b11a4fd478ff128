//! Global Constants
//!
//! Centralized constants for output layout and document generation.

/// AsyncAPI document constants
pub mod asyncapi {
    /// AsyncAPI specification version emitted by the generator
    pub const SPEC_VERSION: &str = "3.0.0";

    /// Default API version for generated documents
    pub const DEFAULT_API_VERSION: &str = "1.0.0";

    /// Content type attached to every generated message
    pub const CONTENT_TYPE: &str = "application/json";
}

/// Catalog output layout
pub mod catalog {
    /// Default catalog output directory
    pub const DEFAULT_OUTPUT_DIR: &str = "asyncapi_catalog";

    /// Subdirectory holding generated specification documents
    pub const SPECS_DIR: &str = "specs";

    /// Subdirectory holding discovery reports
    pub const REPORTS_DIR: &str = "reports";

    /// Well-known catalog index filename
    pub const INDEX_FILE: &str = "catalog-index.json";

    /// Human-readable digest filename
    pub const SUMMARY_FILE: &str = "SUMMARY.txt";
}

/// Corpus scanning constants
pub mod scan {
    /// Maximum file size considered during a local walk (1MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

    /// Default Sourcegraph request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

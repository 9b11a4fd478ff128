//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Design Principles
//!
//! - Single unified error type (ScopeError) for the entire application
//! - Structured error variants with context for better debugging
//! - No panic/unwrap - all errors are recoverable or reported to the operator

use thiserror::Error;

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ScopeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Search error: {0}")]
    Search(String),

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Specification not found for {0}")]
    SpecNotFound(String),
}

pub type Result<T> = std::result::Result<T, ScopeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ScopeError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search(message.into())
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Check whether the scan can continue past this error.
    /// Corpus-access and parse failures are recovered per repository/match;
    /// configuration errors are fatal before any scanning begins.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Search(_) | Self::Parse { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ScopeError::config("missing endpoint");
        assert_eq!(err.to_string(), "Config error: missing endpoint");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ScopeError::Parse {
            message: "missing file path".to_string(),
            path: "src/app.py".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error in src/app.py: missing file path"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ScopeError::search("timeout").is_recoverable());
        assert!(
            ScopeError::Parse {
                message: "bad match".to_string(),
                path: "x".to_string(),
            }
            .is_recoverable()
        );
        assert!(!ScopeError::config("bad").is_recoverable());
        assert!(!ScopeError::catalog("disk full").is_recoverable());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScopeError = io.into();
        assert!(matches!(err, ScopeError::Io(_)));
    }
}

//! Corpus Accessors
//!
//! The seam between the pure extraction pipeline and the places code actually
//! lives. A corpus is anything that can answer "which lines match this
//! pattern": a remote Sourcegraph instance or a local checkout.

pub mod local;
pub mod sourcegraph;

use async_trait::async_trait;

use crate::types::Result;

pub use local::LocalCorpus;
pub use sourcegraph::SourcegraphClient;

/// One matching line within a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based line number
    pub line_number: u32,
    /// Raw line text
    pub line: String,
}

/// One file that matched a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// File path within the repository
    pub file: String,
    /// Repository name
    pub repository: String,
    /// Matching lines in document order
    pub line_matches: Vec<LineMatch>,
}

/// Source of code lines for the detector.
///
/// Implementations own all blocking I/O and retry/cancellation concerns; the
/// detector only issues queries and consumes results.
#[async_trait]
pub trait CorpusAccessor: Send + Sync {
    /// Search for lines matching a regex source text, optionally scoped to one
    /// repository.
    async fn search(&self, query: &str, repository: Option<&str>) -> Result<Vec<SearchMatch>>;

    /// List repository names available in this corpus.
    async fn get_repositories(&self) -> Result<Vec<String>>;

    /// Fetch the content of a single file, or `None` if it does not exist.
    async fn get_file_content(
        &self,
        repository: &str,
        path: &str,
        revision: Option<&str>,
    ) -> Result<Option<String>>;
}

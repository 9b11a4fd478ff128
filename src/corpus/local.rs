//! Local Filesystem Corpus
//!
//! Walks a checkout on disk and applies search patterns line by line.
//! Honors gitignore files, exclusion globs, a source-extension filter, and a
//! maximum file size. Unreadable (e.g. non-UTF-8) files are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use regex::RegexBuilder;
use tracing::debug;

use super::{CorpusAccessor, LineMatch, SearchMatch};
use crate::constants::scan::DEFAULT_MAX_FILE_SIZE;
use crate::types::{Result, ScopeError};

/// Extensions considered source code during a walk
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "go", "kt", "rb", "cs", "scala", "rs",
];

/// Directories skipped regardless of gitignore state
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "build",
    "dist",
    "__pycache__",
    "vendor",
    ".venv",
    "test",
    "tests",
];

pub struct LocalCorpus {
    root: PathBuf,
    exclude: Vec<String>,
    max_file_size: u64,
}

impl LocalCorpus {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = DEFAULT_SKIP_DIRS
            .iter()
            .map(|d| format!("**/{}/**", d))
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            exclude,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude.extend(patterns);
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Repository name the corpus reports for matches: the root directory
    /// name, or the full path when it has no final component.
    pub fn repository_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.to_string_lossy().to_string())
    }

    /// Collect candidate source files under the root.
    fn source_files(&self) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        walker
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.is_file()
                    && !self.should_exclude(path)
                    && self.check_source_extension(path)
                    && self.check_size(path)
            })
            .collect()
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return true;
            }
        }

        false
    }

    fn check_size(&self, path: &Path) -> bool {
        path.metadata()
            .map(|m| m.len() <= self.max_file_size)
            .unwrap_or(false)
    }

    fn check_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

#[async_trait]
impl CorpusAccessor for LocalCorpus {
    async fn search(&self, query: &str, _repository: Option<&str>) -> Result<Vec<SearchMatch>> {
        let regex = RegexBuilder::new(query)
            .case_insensitive(true)
            .build()
            .map_err(|e| ScopeError::Pattern {
                pattern: query.to_string(),
                message: e.to_string(),
            })?;

        let repository = self.repository_name();
        let mut matches = Vec::new();

        for path in self.source_files() {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!("Skipping unreadable file {}: {}", path.display(), e);
                    continue;
                }
            };

            let line_matches: Vec<LineMatch> = content
                .lines()
                .enumerate()
                .filter(|(_, line)| regex.is_match(line))
                .map(|(idx, line)| LineMatch {
                    line_number: (idx + 1) as u32,
                    line: line.to_string(),
                })
                .collect();

            if !line_matches.is_empty() {
                matches.push(SearchMatch {
                    file: self.relative_path(&path),
                    repository: repository.clone(),
                    line_matches,
                });
            }
        }

        Ok(matches)
    }

    async fn get_repositories(&self) -> Result<Vec<String>> {
        Ok(vec![self.repository_name()])
    }

    async fn get_file_content(
        &self,
        _repository: &str,
        path: &str,
        _revision: Option<&str>,
    ) -> Result<Option<String>> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(full)?))
    }
}

// =============================================================================
// Tests
// =============================================================================

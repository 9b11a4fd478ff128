//! Sourcegraph API Client
//!
//! Remote corpus backed by a Sourcegraph instance: GraphQL code search,
//! repository listing, and raw file fetch. The access token is held in a
//! `SecretString` and never appears in logs or debug output.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{CorpusAccessor, LineMatch, SearchMatch};
use crate::config::SourcegraphConfig;
use crate::types::{Result, ScopeError};

const SEARCH_QUERY: &str = r#"
query SearchCode($query: String!) {
    search(query: $query, version: V2) {
        results {
            results {
                ... on FileMatch {
                    file { path }
                    repository { name }
                    lineMatches { lineNumber line }
                }
            }
        }
    }
}
"#;

const REPOSITORIES_QUERY: &str = r#"
query SearchRepositories($query: String!) {
    search(query: $query, version: V2) {
        results {
            repositories { name }
        }
    }
}
"#;

pub struct SourcegraphClient {
    endpoint: Url,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for SourcegraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcegraphClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SourcegraphClient {
    pub fn new(config: &SourcegraphConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.url)
            .map_err(|e| ScopeError::config(format!("Invalid Sourcegraph URL: {}", e)))?;

        if config.token.is_none() {
            warn!("No Sourcegraph token configured, some queries may be limited");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScopeError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            token: config.token.clone().map(SecretString::from),
            client,
        })
    }

    /// POST a GraphQL query and return the parsed response body.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let url = format!("{}/.api/graphql", self.endpoint.as_str().trim_end_matches('/'));

        let mut request = self.client.post(&url).json(&json!({
            "query": query,
            "variables": variables,
        }));

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token.expose_secret()));
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Convert one GraphQL FileMatch entry into a [`SearchMatch`]. Entries
    /// missing the expected fields are skipped, never fatal.
    fn parse_file_match(entry: &Value) -> Option<SearchMatch> {
        let file = entry.pointer("/file/path")?.as_str()?.to_string();
        let repository = entry.pointer("/repository/name")?.as_str()?.to_string();

        let line_matches = entry
            .pointer("/lineMatches")?
            .as_array()?
            .iter()
            .filter_map(|lm| {
                Some(LineMatch {
                    line_number: lm.get("lineNumber")?.as_u64()? as u32,
                    line: lm.get("line")?.as_str()?.to_string(),
                })
            })
            .collect();

        Some(SearchMatch {
            file,
            repository,
            line_matches,
        })
    }
}

#[async_trait]
impl CorpusAccessor for SourcegraphClient {
    async fn search(&self, query: &str, repository: Option<&str>) -> Result<Vec<SearchMatch>> {
        let scoped = match repository {
            Some(repo) => format!("repo:{} {}", repo, query),
            None => query.to_string(),
        };
        debug!("Searching code with query: {}", scoped);

        let body = self
            .graphql(SEARCH_QUERY, json!({ "query": scoped }))
            .await?;

        let entries = body
            .pointer("/data/search/results/results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut matches = Vec::with_capacity(entries.len());
        for entry in &entries {
            match Self::parse_file_match(entry) {
                Some(m) => matches.push(m),
                None => debug!("Skipping malformed search result entry"),
            }
        }

        debug!("Found {} code matches", matches.len());
        Ok(matches)
    }

    async fn get_repositories(&self) -> Result<Vec<String>> {
        debug!("Fetching repositories from Sourcegraph");

        let body = self
            .graphql(REPOSITORIES_QUERY, json!({ "query": "type:repo" }))
            .await?;

        let repositories = body
            .pointer("/data/search/results/repositories")
            .and_then(Value::as_array)
            .map(|repos| {
                repos
                    .iter()
                    .filter_map(|r| r.get("name").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(repositories)
    }

    async fn get_file_content(
        &self,
        repository: &str,
        path: &str,
        revision: Option<&str>,
    ) -> Result<Option<String>> {
        let revision = revision.unwrap_or("HEAD");
        let url = format!(
            "{}/{}/-/raw/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            repository,
            revision,
            path
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token.expose_secret()));
        }

        let response = request.send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(response.error_for_status()?.text().await?))
    }
}

// =============================================================================
// Tests
// =============================================================================

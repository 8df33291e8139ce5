/// Market Data Fetcher — pulls a handful of web search snippets for a sector.
///
/// This is enrichment data, not the deliverable: every failure path degrades
/// to a fixed sentinel string instead of aborting the request, so report
/// generation always receives some context.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const SEARCH_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const SEARCH_TIMEOUT_SECS: u64 = 10;

/// Returned in place of real context whenever retrieval fails.
pub const NO_MARKET_DATA: &str = "No recent market data found.";

/// Source of per-sector market context. Object-safe so the HTTP layer can
/// carry a mock in tests.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Infallible by signature: implementations degrade to a sentinel string
    /// on provider failure rather than propagating an error.
    async fn fetch(&self, sector: &str) -> String;
}

#[derive(Debug, Error)]
enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {0}")]
    Api(u16),

    #[error("search returned no results")]
    NoResults,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    description: String,
}

/// Web search client for the Brave Search API.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_results: usize,
}

impl SearchClient {
    pub fn new(api_key: String, max_results: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(SEARCH_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            endpoint: SEARCH_API_URL.to_string(),
            max_results,
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn try_fetch(&self, sector: &str) -> Result<String, SearchError> {
        let query = build_query(sector);
        let count = self.max_results.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query.as_str()), ("count", count.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api(status.as_u16()));
        }

        let parsed: SearchResponse = response.json().await?;
        let results = parsed.web.map(|w| w.results).unwrap_or_default();

        debug!("search returned {} results for '{query}'", results.len());

        render_context(&results, self.max_results)
    }
}

#[async_trait]
impl MarketData for SearchClient {
    async fn fetch(&self, sector: &str) -> String {
        match self.try_fetch(sector).await {
            Ok(context) => context,
            Err(e) => {
                warn!("search provider failed for sector '{sector}': {e}");
                NO_MARKET_DATA.to_string()
            }
        }
    }
}

/// Fixed query template embedding the sector name.
fn build_query(sector: &str) -> String {
    format!("{sector} sector trade opportunities India market analysis 2024")
}

/// Joins the top results as "- {title}: {snippet}" lines in provider order.
fn render_context(results: &[SearchResult], max_results: usize) -> Result<String, SearchError> {
    if results.is_empty() {
        return Err(SearchError::NoResults);
    }
    Ok(results
        .iter()
        .take(max_results)
        .map(|r| format!("- {}: {}", r.title, r.description))
        .collect::<Vec<_>>()
        .join("\n"))
}

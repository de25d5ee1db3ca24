use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const NEWSAPI_BASE: &str = "https://newsapi.org/v2";

#[derive(Error, Debug)]
pub enum NewsApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsApiError>;

/// Client for the two newsapi.org endpoints we care about.
///
/// Holds no state between calls: no retry, no response cache. Every call
/// is a single GET.
#[derive(Clone)]
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, NEWSAPI_BASE)
    }

    /// Point the client at another host (tests, proxies)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Headliner/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NewsApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Top headlines for a country code (e.g. "us")
    pub async fn top_headlines(&self, country: &str) -> Result<Vec<ApiArticle>> {
        let url = format!("{}/top-headlines", self.base_url);
        self.get_articles(&url, &[("country", country), ("apiKey", &self.api_key)])
            .await
    }

    /// Keyword search over everything, most popular first.
    ///
    /// The query is sent as-is; trimming and the empty-query guard live in
    /// the caller.
    pub async fn search_everything(&self, query: &str) -> Result<Vec<ApiArticle>> {
        let url = format!("{}/everything", self.base_url);
        self.get_articles(
            &url,
            &[
                ("sortBy", "popularity"),
                ("apiKey", &self.api_key),
                ("q", query),
            ],
        )
        .await
    }

    /// Download raw bytes from an arbitrary URL (article thumbnails)
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let parsed =
            reqwest::Url::parse(url).map_err(|_| NewsApiError::InvalidUrl(url.to_string()))?;

        debug!("Fetching image {}", parsed);
        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            return Err(NewsApiError::Status {
                status: response.status().as_u16(),
                message: format!("image download failed for {}", url),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get_articles(&self, url: &str, params: &[(&str, &str)]) -> Result<Vec<ApiArticle>> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(NewsApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&body)?;
        debug!("Decoded {} articles from {}", parsed.articles.len(), url);
        Ok(parsed.articles)
    }
}

/// newsapi.org reports failures as `{"status":"error","code":..,"message":..}`.
/// Fall back to the raw body when it's something else.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => match err.code {
            Some(code) => format!("{} ({})", err.message, code),
            None => err.message,
        },
        Err(_) => body.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub articles: Vec<ApiArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    pub source: ApiSource,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: String,
}

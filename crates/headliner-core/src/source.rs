use url::Url;

use crate::{models::Article, Result};

/// Where articles come from
///
/// Screens hold an `Arc<dyn NewsSource>` handed to them at construction, so
/// tests can swap the network out for a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn top_stories(&self) -> Result<Vec<Article>>;

    /// `query` is already trimmed and non-empty; see [`normalize_query`]
    async fn search_articles(&self, query: &str) -> Result<Vec<Article>>;
}

/// Fetches thumbnail bytes for a row
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load_image(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Trim a search query. Blank input means "don't search at all".
pub fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

// newsapi.org provider - bridges the API client with NewsSource/ImageLoader
use async_trait::async_trait;
use headliner_api::NewsApiClient;
use tracing::info;
use url::Url;

use crate::{
    config::ApiConfig,
    models::Article,
    source::{ImageLoader, NewsSource},
    Error, Result,
};

/// Wrapper around NewsApiClient that implements NewsSource
pub struct NewsApiProvider {
    client: NewsApiClient,
    country: String,
}

impl NewsApiProvider {
    pub fn new(client: NewsApiClient, country: impl Into<String>) -> Self {
        Self {
            client,
            country: country.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            Error::ConfigError(
                "No API key configured. Set NEWSAPI_KEY or api.api_key in config.toml".into(),
            )
        })?;

        let client = NewsApiClient::with_base_url(api_key, config.base_url.clone())?;
        Ok(Self::new(client, config.country.clone()))
    }
}

#[async_trait]
impl NewsSource for NewsApiProvider {
    async fn top_stories(&self) -> Result<Vec<Article>> {
        let articles = self.client.top_headlines(&self.country).await?;
        info!("Fetched {} top stories", articles.len());
        Ok(articles.into_iter().map(Article::from).collect())
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<Article>> {
        let articles = self.client.search_everything(query).await?;
        info!("Search for '{}' returned {} articles", query, articles.len());
        Ok(articles.into_iter().map(Article::from).collect())
    }
}

#[async_trait]
impl ImageLoader for NewsApiProvider {
    async fn load_image(&self, url: &Url) -> Result<Vec<u8>> {
        Ok(self.client.fetch_bytes(url.as_str()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ApiConfig {
        ApiConfig {
            api_key: Some("key".to_string()),
            base_url: server.uri(),
            country: "gb".to_string(),
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = ApiConfig::default();
        assert!(matches!(
            NewsApiProvider::from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_top_stories_maps_to_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "articles": [{
                    "source": { "name": "Wire" },
                    "title": "A",
                    "description": "first",
                    "url": "https://example.com/a",
                    "urlToImage": null,
                    "publishedAt": "2024-03-05T10:00:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let provider = NewsApiProvider::from_config(&config_for(&server)).unwrap();
        let articles = provider.top_stories().await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source_name, "Wire");
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].url.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_transport_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = NewsApiProvider::from_config(&config_for(&server)).unwrap();
        assert!(matches!(
            provider.search_articles("rust").await,
            Err(Error::ApiError(_))
        ));
    }
}

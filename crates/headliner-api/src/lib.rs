// API client for newsapi.org
pub mod newsapi;

// Re-export common types
pub use newsapi::{ApiArticle, ApiResponse, ApiSource, NewsApiClient, NewsApiError};

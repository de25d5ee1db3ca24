use chrono::DateTime;
use headliner_api::ApiArticle;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single news item, as decoded from the API
///
/// Immutable once built. Two articles are "the same favorite" when their
/// titles match; nothing else about identity is tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub source_name: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: String,
}

impl Article {
    /// `publishedAt` as `YYYY-MM-DD HH:MM`, or the raw string if it isn't RFC 3339
    pub fn published_display(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.published_at) {
            Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => self.published_at.clone(),
        }
    }
}

impl From<ApiArticle> for Article {
    fn from(api: ApiArticle) -> Self {
        Self {
            source_name: api.source.name,
            title: api.title,
            description: api.description,
            url: api.url,
            url_to_image: api.url_to_image,
            published_at: api.published_at,
        }
    }
}

/// Which list a row belongs to. Drives the row's action label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisplayMode {
    News,
    Favorites,
}

impl DisplayMode {
    pub fn action_label(&self) -> &'static str {
        match self {
            DisplayMode::News => "Add to Favorites",
            DisplayMode::Favorites => "Remove from Favorites",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::News => write!(f, "News"),
            DisplayMode::Favorites => write!(f, "Favorites"),
        }
    }
}

/// Opaque per-row token. Fresh v4 uuid for every view-model, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewModelId(uuid::Uuid);

impl ViewModelId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for ViewModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-ready projection of an Article for one list row
///
/// Owned by whichever screen built it. The Favorites screen always builds
/// its own from the Article, it never borrows the News screen's instance.
#[derive(Debug, Clone)]
pub struct ListItemViewModel {
    id: ViewModelId,
    pub title: String,
    pub subtitle: Option<String>,
    pub mode: DisplayMode,
    pub image_url: Option<Url>,
    pub image_data: Option<Vec<u8>>,
    pub page_url: Option<String>,
}

impl ListItemViewModel {
    pub fn new(
        title: String,
        subtitle: Option<String>,
        mode: DisplayMode,
        image_url: Option<Url>,
        page_url: Option<String>,
    ) -> Self {
        Self {
            id: ViewModelId::new(),
            title,
            subtitle,
            mode,
            image_url,
            image_data: None,
            page_url,
        }
    }

    /// Unparseable image URLs are dropped silently; the row just has no image.
    pub fn from_article(article: &Article, mode: DisplayMode) -> Self {
        let image_url = article
            .url_to_image
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok());

        Self::new(
            article.title.clone(),
            article.description.clone(),
            mode,
            image_url,
            article.url.clone(),
        )
    }

    pub fn id(&self) -> ViewModelId {
        self.id
    }

    pub fn action_label(&self) -> &'static str {
        self.mode.action_label()
    }
}

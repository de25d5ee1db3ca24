// Core logic: models, list state, cross-screen events, fetch coordination
pub mod browser;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod fetch;
pub mod images;
pub mod lists;
pub mod models;
pub mod providers;
pub mod screens;
pub mod source;

#[cfg(test)]
mod test_support;

pub use browser::page_target;
pub use config::Config;
pub use error::Error;
pub use event_bus::{EventBus, FavoriteBus, Subscription};
pub use fetch::{FetchToken, FetchTracker, RefreshTimer};
pub use lists::{FavoritesList, NewsList};
pub use models::{Article, DisplayMode, ListItemViewModel, ViewModelId};
pub use providers::NewsApiProvider;
pub use screens::{Applied, FavoritesScreen, FetchKind, FetchOutcome, NewsScreen, ScreenEvent};
pub use source::{normalize_query, ImageLoader, NewsSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;

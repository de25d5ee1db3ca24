// UI-agnostic controllers for the News and Favorites screens
//
// Network work runs on spawned tokio tasks and reports back through a
// ScreenEvent channel. All list mutation happens in `apply_*`, which the
// front end calls from its one UI loop.
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::{
    event_bus::{FavoriteBus, Subscription},
    fetch::{FetchToken, FetchTracker, RefreshTimer},
    images::{ImageAttacher, ImageOutcome},
    lists::{FavoritesList, NewsList},
    models::{Article, DisplayMode, ListItemViewModel},
    source::{normalize_query, ImageLoader, NewsSource},
    Result,
};

/// Everything background tasks send back to the UI loop
#[derive(Debug)]
pub enum ScreenEvent {
    Articles(FetchOutcome),
    Image(ImageOutcome),
    RefreshTick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    TopStories,
    Search(String),
}

impl std::fmt::Display for FetchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchKind::TopStories => write!(f, "top stories"),
            FetchKind::Search(q) => write!(f, "search '{}'", q),
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub token: FetchToken,
    pub kind: FetchKind,
    pub result: Result<Vec<Article>>,
}

/// What happened when a fetch result was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Loaded { kind: FetchKind, count: usize },
    Failed { kind: FetchKind, message: String },
    Stale,
}

/// The News screen: top stories, search, periodic refresh, favoriting
pub struct NewsScreen {
    source: Arc<dyn NewsSource>,
    bus: FavoriteBus,
    events: UnboundedSender<ScreenEvent>,
    list: NewsList,
    tracker: FetchTracker,
    images: ImageAttacher,
    timer: Option<RefreshTimer>,
}

impl NewsScreen {
    pub fn new(
        source: Arc<dyn NewsSource>,
        images: Arc<dyn ImageLoader>,
        bus: FavoriteBus,
        events: UnboundedSender<ScreenEvent>,
    ) -> Self {
        Self {
            source,
            bus,
            images: ImageAttacher::new(images, events.clone(), DisplayMode::News),
            events,
            list: NewsList::new(),
            tracker: FetchTracker::new(),
            timer: None,
        }
    }

    pub fn fetch_top_stories(&mut self) -> FetchToken {
        self.spawn_fetch(FetchKind::TopStories)
    }

    /// Blank queries are ignored entirely: no request, no outcome event.
    pub fn search(&mut self, query: &str) -> Option<FetchToken> {
        let query = normalize_query(query)?;
        Some(self.spawn_fetch(FetchKind::Search(query.to_string())))
    }

    fn spawn_fetch(&mut self, kind: FetchKind) -> FetchToken {
        let token = self.tracker.begin();
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        debug!("Starting fetch {:?}: {}", token, kind);

        let handle = tokio::spawn(async move {
            let result = match &kind {
                FetchKind::TopStories => source.top_stories().await,
                FetchKind::Search(query) => source.search_articles(query).await,
            };
            // Receiver gone means the screen was torn down
            let _ = events.send(ScreenEvent::Articles(FetchOutcome { token, kind, result }));
        });
        self.tracker.attach(handle);
        token
    }

    /// Apply a finished fetch. Errors keep the current rows.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> Applied {
        if !self.tracker.complete(outcome.token) {
            return Applied::Stale;
        }

        match outcome.result {
            Ok(articles) => {
                let count = articles.len();
                self.images.cancel_all();
                self.list.load(articles);
                info!("Loaded {} articles ({})", count, outcome.kind);
                Applied::Loaded {
                    kind: outcome.kind,
                    count,
                }
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", outcome.kind, e);
                Applied::Failed {
                    kind: outcome.kind,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Re-fetch top stories every `period` for as long as this screen lives
    pub fn start_auto_refresh(&mut self, period: Duration) {
        let events = self.events.clone();
        self.timer = Some(RefreshTimer::start(period, move || {
            events.send(ScreenEvent::RefreshTick).is_ok()
        }));
    }

    pub fn stop_auto_refresh(&mut self) {
        self.timer = None;
    }

    /// Publish the article behind row `index` to the favorites bus.
    /// Returns false if there is no such row.
    pub fn favorite(&self, index: usize) -> bool {
        match self.list.article_at(index) {
            Some(article) => {
                let delivered = self.bus.publish(article);
                debug!("Favorite '{}' delivered to {} subscribers", article.title, delivered);
                true
            }
            None => false,
        }
    }

    pub fn request_image(&mut self, index: usize) -> bool {
        match self.list.get(index) {
            Some(vm) => self.images.request(vm),
            None => false,
        }
    }

    pub fn apply_image(&mut self, outcome: ImageOutcome) -> bool {
        let row = self.list.find_mut(outcome.id);
        self.images.apply(outcome, row)
    }

    pub fn list(&self) -> &NewsList {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }
}

/// The Favorites screen. Populated only by favorite-added events.
pub struct FavoritesScreen {
    list: Arc<Mutex<FavoritesList>>,
    images: ImageAttacher,
    _subscription: Subscription<Article>,
}

impl FavoritesScreen {
    /// Subscribes to `bus` for the lifetime of the screen
    pub fn new(
        bus: &FavoriteBus,
        images: Arc<dyn ImageLoader>,
        events: UnboundedSender<ScreenEvent>,
    ) -> Self {
        let list = Arc::new(Mutex::new(FavoritesList::new()));
        let weak = Arc::downgrade(&list);

        let subscription = bus.subscribe(move |article: &Article| {
            let Some(list) = weak.upgrade() else {
                return;
            };
            if lock(&list).insert_favorite(article) {
                info!("Added '{}' to favorites", article.title);
            } else {
                debug!("'{}' is already a favorite", article.title);
            }
        });

        Self {
            list,
            images: ImageAttacher::new(images, events, DisplayMode::Favorites),
            _subscription: subscription,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<ListItemViewModel> {
        let removed = lock(&self.list).remove_at(index);
        if let Some(vm) = &removed {
            info!("Removed '{}' from favorites", vm.title);
        }
        removed
    }

    /// Run `f` against the current rows (rendering, lookups)
    pub fn with_list<R>(&self, f: impl FnOnce(&FavoritesList) -> R) -> R {
        f(&lock(&self.list))
    }

    pub fn len(&self) -> usize {
        lock(&self.list).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.list).is_empty()
    }

    pub fn show_placeholder(&self) -> bool {
        lock(&self.list).show_placeholder()
    }

    pub fn request_image(&mut self, index: usize) -> bool {
        let list = lock(&self.list);
        match list.get(index) {
            Some(vm) => self.images.request(vm),
            None => false,
        }
    }

    pub fn apply_image(&mut self, outcome: ImageOutcome) -> bool {
        let mut list = lock(&self.list);
        let row = list.find_mut(outcome.id);
        self.images.apply(outcome, row)
    }
}

fn lock(list: &Mutex<FavoritesList>) -> MutexGuard<'_, FavoritesList> {
    list.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MockImageLoader, MockNewsSource};
    use crate::test_support::article;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn no_images() -> Arc<dyn ImageLoader> {
        Arc::new(MockImageLoader::new())
    }

    async fn next_fetch(rx: &mut UnboundedReceiver<ScreenEvent>) -> FetchOutcome {
        match rx.recv().await {
            Some(ScreenEvent::Articles(outcome)) => outcome,
            other => panic!("expected fetch outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_top_stories_load_in_order() {
        let mut source = MockNewsSource::new();
        source
            .expect_top_stories()
            .times(1)
            .returning(|| Ok(vec![article("A"), article("B")]));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        news.fetch_top_stories();
        let applied = news.apply_fetch(next_fetch(&mut rx).await);

        assert_eq!(
            applied,
            Applied::Loaded {
                kind: FetchKind::TopStories,
                count: 2
            }
        );
        let titles: Vec<_> = news.list().view_models().iter().map(|vm| vm.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_blank_search_issues_nothing() {
        let mut source = MockNewsSource::new();
        source.expect_search_articles().times(0);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        assert!(news.search("   \t ").is_none());
        assert!(news.search("").is_none());
        drop(news);
        // Every sender is gone and nothing was sent
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_search_query_is_trimmed() {
        let mut source = MockNewsSource::new();
        source
            .expect_search_articles()
            .withf(|q| q == "rust")
            .times(1)
            .returning(|_| Ok(vec![article("Rust 2.0")]));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        assert!(news.search("  rust  ").is_some());
        let outcome = next_fetch(&mut rx).await;
        assert_eq!(outcome.kind, FetchKind::Search("rust".to_string()));
        news.apply_fetch(outcome);
        assert_eq!(news.list().get(0).unwrap().title, "Rust 2.0");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_rows() {
        let mut source = MockNewsSource::new();
        let mut calls = 0;
        source.expect_top_stories().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![article("A")])
            } else {
                Err(crate::Error::ApiError("offline".into()))
            }
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        news.fetch_top_stories();
        news.apply_fetch(next_fetch(&mut rx).await);
        news.fetch_top_stories();
        let applied = news.apply_fetch(next_fetch(&mut rx).await);

        assert!(matches!(applied, Applied::Failed { .. }));
        assert_eq!(news.list().len(), 1);
        assert_eq!(news.list().get(0).unwrap().title, "A");
    }

    #[tokio::test]
    async fn test_stale_completion_is_ignored() {
        let mut source = MockNewsSource::new();
        source
            .expect_top_stories()
            .returning(|| Ok(vec![article("old")]));

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        let first = news.fetch_top_stories();
        let second = news.fetch_top_stories();

        let late = FetchOutcome {
            token: first,
            kind: FetchKind::TopStories,
            result: Ok(vec![article("late")]),
        };
        assert_eq!(news.apply_fetch(late), Applied::Stale);
        assert!(news.list().is_empty());

        let fresh = FetchOutcome {
            token: second,
            kind: FetchKind::Search("x".into()),
            result: Ok(vec![article("fresh")]),
        };
        assert!(matches!(news.apply_fetch(fresh), Applied::Loaded { count: 1, .. }));
        assert_eq!(news.list().get(0).unwrap().title, "fresh");
    }

    #[tokio::test]
    async fn test_favorite_flows_to_favorites_screen() {
        let mut source = MockNewsSource::new();
        source
            .expect_top_stories()
            .returning(|| Ok(vec![article("A"), article("B")]));

        let bus = FavoriteBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), bus.clone(), tx.clone());
        let mut favorites = FavoritesScreen::new(&bus, no_images(), tx);
        assert!(favorites.show_placeholder());

        news.fetch_top_stories();
        news.apply_fetch(next_fetch(&mut rx).await);

        assert!(news.favorite(1));
        assert!(news.favorite(1));
        assert!(!news.favorite(9));

        assert_eq!(favorites.len(), 1);
        favorites.with_list(|list| {
            let vm = list.get(0).unwrap();
            assert_eq!(vm.title, "B");
            assert_eq!(vm.mode, DisplayMode::Favorites);
        });

        assert!(favorites.remove_at(0).is_some());
        assert!(favorites.is_empty());
        assert!(favorites.show_placeholder());
    }

    #[tokio::test]
    async fn test_torn_down_favorites_screen_unsubscribes() {
        let bus = FavoriteBus::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let favorites = FavoritesScreen::new(&bus, no_images(), tx);
        assert_eq!(bus.subscriber_count(), 1);

        drop(favorites);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&article("A")), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_ticks_until_teardown() {
        let source = MockNewsSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), no_images(), FavoriteBus::new(), tx);

        news.start_auto_refresh(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(matches!(rx.try_recv(), Ok(ScreenEvent::RefreshTick)));

        drop(news);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_image_for_reloaded_row_is_dropped() {
        let mut source = MockNewsSource::new();
        source
            .expect_top_stories()
            .returning(|| Ok(vec![article("A")]));
        let mut loader = MockImageLoader::new();
        loader.expect_load_image().returning(|_| Ok(vec![9]));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut news = NewsScreen::new(Arc::new(source), Arc::new(loader), FavoriteBus::new(), tx);

        news.fetch_top_stories();
        news.apply_fetch(next_fetch(&mut rx).await);
        let old_id = news.list().get(0).unwrap().id();

        assert!(news.request_image(0));
        let image = match rx.recv().await {
            Some(ScreenEvent::Image(outcome)) => outcome,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(image.id, old_id);

        news.fetch_top_stories();
        news.apply_fetch(next_fetch(&mut rx).await);

        assert!(!news.apply_image(image));
        assert!(news.list().get(0).unwrap().image_data.is_none());
    }
}

// TUI application state and event handling
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyCode;
use headliner_core::{
    page_target, Applied, DisplayMode, FavoriteBus, FavoritesScreen, FetchKind, ImageLoader, NewsScreen,
    NewsSource, ScreenEvent,
};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    News,
    Favorites,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Tab::News => Tab::Favorites,
            Tab::Favorites => Tab::News,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating rows
    Searching, // Typing in search box
}

/// Side effects the runner performs on the app's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenPage(Url),
}

pub struct App {
    pub should_quit: bool,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub search_input: String,
    pub news: NewsScreen,
    pub favorites: FavoritesScreen,
    pub news_state: ListState,
    pub favorites_state: ListState,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    /// Both screens share one favorites bus and report back through `events`
    pub fn new(
        source: Arc<dyn NewsSource>,
        images: Arc<dyn ImageLoader>,
        events: UnboundedSender<ScreenEvent>,
    ) -> Self {
        let bus = FavoriteBus::new();
        let news = NewsScreen::new(source, Arc::clone(&images), bus.clone(), events.clone());
        let favorites = FavoritesScreen::new(&bus, images, events);

        Self {
            should_quit: false,
            tab: Tab::News,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            news,
            favorites,
            news_state: ListState::default(),
            favorites_state: ListState::default(),
            status_message: None,
            error_message: None,
        }
    }

    /// Initial load plus the periodic refresh
    pub fn start(&mut self, refresh_every: Duration) {
        self.news.fetch_top_stories();
        self.news.start_auto_refresh(refresh_every);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn is_loading(&self) -> bool {
        self.news.is_loading()
    }

    pub fn selected_news(&self) -> Option<usize> {
        self.news_state.selected().filter(|&i| i < self.news.list().len())
    }

    pub fn selected_favorite(&self) -> Option<usize> {
        self.favorites_state
            .selected()
            .filter(|&i| i < self.favorites.len())
    }

    /// Apply something a background task finished
    pub fn handle_screen_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Articles(outcome) => match self.news.apply_fetch(outcome) {
                Applied::Loaded { kind, count } => {
                    self.error_message = None;
                    self.status_message = Some(match kind {
                        FetchKind::TopStories => format!("Loaded {} top stories", count),
                        FetchKind::Search(q) => format!("{} results for '{}'", count, q),
                    });
                    self.news_state.select(if count > 0 { Some(0) } else { None });
                    self.request_selected_image();
                }
                Applied::Failed { kind, message } => {
                    self.error_message = Some(format!("Fetching {} failed: {}", kind, message));
                }
                Applied::Stale => {}
            },
            ScreenEvent::Image(outcome) => match outcome.screen {
                DisplayMode::News => {
                    self.news.apply_image(outcome);
                }
                DisplayMode::Favorites => {
                    self.favorites.apply_image(outcome);
                }
            },
            ScreenEvent::RefreshTick => {
                info!("Periodic refresh of top stories");
                self.news.fetch_top_stories();
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<AppCommand> {
        match self.input_mode {
            InputMode::Searching => {
                self.handle_search_key(code);
                None
            }
            InputMode::Normal => self.handle_normal_key(code),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.news.search(&self.search_input).is_some() {
                    self.status_message = Some(format!("Searching '{}'...", self.search_input.trim()));
                }
            }
            KeyCode::Esc => {
                // Cancelling a search goes back to top stories
                self.search_input.clear();
                self.input_mode = InputMode::Normal;
                self.news.fetch_top_stories();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                if self.search_input.is_empty() {
                    self.news.fetch_top_stories();
                }
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Option<AppCommand> {
        match code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Tab => {
                self.tab = self.tab.toggle();
                self.request_selected_image();
            }
            KeyCode::Char('j') | KeyCode::Down => self.next_row(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_row(),
            KeyCode::Enter => return self.open_selected(),
            _ => match self.tab {
                Tab::News => self.handle_news_key(code),
                Tab::Favorites => self.handle_favorites_key(code),
            },
        }
        None
    }

    fn handle_news_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Searching;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.search_input.clear();
                self.status_message = Some("Refreshing...".to_string());
                self.news.fetch_top_stories();
            }
            KeyCode::Char('f') => {
                if let Some(index) = self.selected_news() {
                    if self.news.favorite(index) {
                        self.status_message = Some("Added to favorites".to_string());
                        if self.favorites_state.selected().is_none() {
                            self.favorites_state.select(Some(0));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_favorites_key(&mut self, code: KeyCode) {
        if let KeyCode::Char('d') | KeyCode::Delete = code {
            if let Some(index) = self.selected_favorite() {
                if let Some(vm) = self.favorites.remove_at(index) {
                    self.status_message = Some(format!("Removed '{}'", vm.title));
                }
                let len = self.favorites.len();
                self.favorites_state.select(if len == 0 {
                    None
                } else {
                    Some(index.min(len - 1))
                });
            }
        }
    }

    fn next_row(&mut self) {
        let (len, state) = self.current_list();
        if len == 0 {
            return;
        }
        let next = state.selected().map_or(0, |i| (i + 1).min(len - 1));
        state.select(Some(next));
        self.request_selected_image();
    }

    fn previous_row(&mut self) {
        let (len, state) = self.current_list();
        if len == 0 {
            return;
        }
        let prev = state.selected().map_or(0, |i| i.saturating_sub(1));
        state.select(Some(prev));
        self.request_selected_image();
    }

    fn current_list(&mut self) -> (usize, &mut ListState) {
        match self.tab {
            Tab::News => (self.news.list().len(), &mut self.news_state),
            Tab::Favorites => (self.favorites.len(), &mut self.favorites_state),
        }
    }

    fn request_selected_image(&mut self) {
        match self.tab {
            Tab::News => {
                if let Some(index) = self.selected_news() {
                    self.news.request_image(index);
                }
            }
            Tab::Favorites => {
                if let Some(index) = self.selected_favorite() {
                    self.favorites.request_image(index);
                }
            }
        }
    }

    /// Invalid or missing page URLs are skipped without complaint
    fn open_selected(&self) -> Option<AppCommand> {
        let page_url = match self.tab {
            Tab::News => self
                .selected_news()
                .and_then(|i| self.news.list().article_at(i))
                .and_then(|a| a.url.clone()),
            Tab::Favorites => self.selected_favorite().and_then(|i| {
                self.favorites
                    .with_list(|list| list.get(i).and_then(|vm| vm.page_url.clone()))
            }),
        }?;

        page_target(&page_url).map(AppCommand::OpenPage)
    }
}

// Row state for the two list screens
use crate::models::{Article, DisplayMode, ListItemViewModel, ViewModelId};

/// Rows on the News screen plus the articles they were built from
///
/// The two vectors are always the same length and in the same order, so a
/// row index maps straight back to its Article when the user favorites it.
#[derive(Debug, Default)]
pub struct NewsList {
    articles: Vec<Article>,
    items: Vec<ListItemViewModel>,
}

impl NewsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full replace, not a merge. Any cached image bytes go with the old rows.
    pub fn load(&mut self, articles: Vec<Article>) {
        self.items = articles
            .iter()
            .map(|a| ListItemViewModel::from_article(a, DisplayMode::News))
            .collect();
        self.articles = articles;
    }

    pub fn article_at(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    pub fn get(&self, index: usize) -> Option<&ListItemViewModel> {
        self.items.get(index)
    }

    pub fn find_mut(&mut self, id: ViewModelId) -> Option<&mut ListItemViewModel> {
        self.items.iter_mut().find(|vm| vm.id() == id)
    }

    pub fn view_models(&self) -> &[ListItemViewModel] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rows on the Favorites screen, most recent first
///
/// Titles are unique within the list.
#[derive(Debug, Default)]
pub struct FavoritesList {
    items: Vec<ListItemViewModel>,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh row for `article` and puts it at the front.
    ///
    /// Returns false (and changes nothing) when a row with the same title is
    /// already present.
    pub fn insert_favorite(&mut self, article: &Article) -> bool {
        if self.contains_title(&article.title) {
            return false;
        }

        let vm = ListItemViewModel::from_article(article, DisplayMode::Favorites);
        self.items.insert(0, vm);
        true
    }

    /// Out-of-range indexes leave the list untouched and return None
    pub fn remove_at(&mut self, index: usize) -> Option<ListItemViewModel> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.items.iter().any(|vm| vm.title == title)
    }

    pub fn get(&self, index: usize) -> Option<&ListItemViewModel> {
        self.items.get(index)
    }

    pub fn find_mut(&mut self, id: ViewModelId) -> Option<&mut ListItemViewModel> {
        self.items.iter_mut().find(|vm| vm.id() == id)
    }

    pub fn view_models(&self) -> &[ListItemViewModel] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Placeholder and row list are mutually exclusive
    pub fn show_placeholder(&self) -> bool {
        self.is_empty()
    }
}

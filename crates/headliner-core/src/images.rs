// Lazy per-row thumbnail loading
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    models::{DisplayMode, ListItemViewModel, ViewModelId},
    screens::ScreenEvent,
    source::ImageLoader,
    Result,
};

/// Image bytes for one row, delivered back to the UI loop
#[derive(Debug)]
pub struct ImageOutcome {
    pub screen: DisplayMode,
    pub id: ViewModelId,
    pub result: Result<Vec<u8>>,
}

/// Starts at most one image download per row and forgets about it once the
/// result is applied or the rows are replaced.
pub struct ImageAttacher {
    loader: Arc<dyn ImageLoader>,
    events: UnboundedSender<ScreenEvent>,
    screen: DisplayMode,
    pending: HashMap<ViewModelId, JoinHandle<()>>,
}

impl ImageAttacher {
    pub fn new(
        loader: Arc<dyn ImageLoader>,
        events: UnboundedSender<ScreenEvent>,
        screen: DisplayMode,
    ) -> Self {
        Self {
            loader,
            events,
            screen,
            pending: HashMap::new(),
        }
    }

    /// Kick off a download for `vm` if it has a URL, no bytes yet, and
    /// nothing already in flight. Returns whether a request was issued.
    pub fn request(&mut self, vm: &ListItemViewModel) -> bool {
        if vm.image_data.is_some() || self.pending.contains_key(&vm.id()) {
            return false;
        }
        let Some(url) = vm.image_url.clone() else {
            return false;
        };

        let id = vm.id();
        let screen = self.screen;
        let loader = Arc::clone(&self.loader);
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let result = loader.load_image(&url).await;
            // Receiver gone means the app is shutting down
            let _ = events.send(ScreenEvent::Image(ImageOutcome { screen, id, result }));
        });
        self.pending.insert(id, handle);
        true
    }

    /// Store the bytes into the row they were fetched for.
    ///
    /// `row` is whatever currently carries `outcome.id`; None means the row
    /// was replaced or removed meanwhile and the bytes are dropped.
    pub fn apply(&mut self, outcome: ImageOutcome, row: Option<&mut ListItemViewModel>) -> bool {
        self.pending.remove(&outcome.id);

        match (outcome.result, row) {
            (Ok(bytes), Some(vm)) if vm.id() == outcome.id && vm.image_data.is_none() => {
                vm.image_data = Some(bytes);
                true
            }
            (Ok(_), _) => {
                debug!("Discarding image for superseded row {}", outcome.id);
                false
            }
            (Err(e), _) => {
                debug!("Image load failed for row {}: {}", outcome.id, e);
                false
            }
        }
    }

    /// Abort everything in flight (rows are being replaced)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for ImageAttacher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

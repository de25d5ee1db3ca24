// Typed publish/subscribe channel between screens
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::debug;

use crate::models::Article;

/// The one channel the app needs: "user added this article to favorites"
pub type FavoriteBus = EventBus<Article>;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// Synchronous, in-process publish/subscribe
///
/// Handles are cheap to clone and all clones share one registry. `publish`
/// runs every handler on the caller's thread, in subscription order, before
/// returning. Nothing is queued: an event published while nobody listens is
/// gone.
pub struct EventBus<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register `handler` until the returned Subscription is dropped
    pub fn subscribe<F>(&self, handler: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));
        debug!("Subscriber {} registered", id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every current subscriber. Returns how many got it.
    pub fn publish(&self, event: &T) -> usize {
        // Snapshot so handlers can (un)subscribe without deadlocking
        let handlers: Vec<Handler<T>> = lock(&self.registry)
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in &handlers {
            handler(event);
        }

        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a handler registered. Dropping it unsubscribes.
///
/// Holds only a weak reference, so an outstanding subscription never keeps
/// a bus alive on its own.
pub struct Subscription<T> {
    id: u64,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Same as dropping, just reads better at call sites
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.retain(|(id, _)| *id != self.id);
            debug!("Subscriber {} removed", self.id);
        }
    }
}

// A panicking handler shouldn't take the bus down with it
fn lock<T>(registry: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//! Mock SD catalog and preparse engine used by this crate's own tests and
//! by `tests/scenarios.rs`.
//!
//! Grounded on `examples/original_source/src/media_source/test.c` and
//! `modules/demux/mock.c`, both of which exist in the original purely to
//! drive this subsystem's behaviour from fake backends.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::MediaSourceError;
use crate::item::MediaItem;
use crate::preparse::{CancelToken, PreparseCallbacks, PreparseEngine, PreparseNode, PreparseStatus};
use crate::sd::{SdCallbacks, SdCatalog, SdCategory, SdInstance, SdMeta};

/// A catalog of plugin names that can be `register`ed up front, then
/// `create`d like a real SD catalog would. Retains the callback sink handed
/// to `create` so test code can drive `item_added`/`item_removed` directly
/// via [`MockSdCatalog::handle_for`].
#[derive(Default)]
pub struct MockSdCatalog {
    registered: Mutex<HashMap<String, String>>,
    sinks: Mutex<HashMap<String, Arc<dyn SdCallbacks>>>,
}

impl MockSdCatalog {
    pub fn new() -> Self {
        MockSdCatalog::default()
    }

    /// Registers a plugin `name` with a human-readable `long_name`, making
    /// it constructible and listable.
    pub fn register(&self, name: &str, long_name: &str) {
        self.registered
            .lock()
            .insert(name.to_string(), long_name.to_string());
    }

    /// Returns a handle to the callback sink installed by the last
    /// `create("name", ...)` call, if any.
    pub fn handle_for(&self, name: &str) -> Option<MockSdHandle> {
        self.sinks.lock().get(name).cloned().map(MockSdHandle)
    }
}

impl SdCatalog for MockSdCatalog {
    fn create(
        &self,
        name: &str,
        callbacks: Arc<dyn SdCallbacks>,
    ) -> Result<Box<dyn SdInstance>, MediaSourceError> {
        let long_name = self
            .registered
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| MediaSourceError::NotFound(name.to_string()))?;
        self.sinks.lock().insert(name.to_string(), callbacks);
        Ok(Box::new(MockSdInstance {
            description: long_name,
        }))
    }

    fn list(&self) -> Vec<SdMeta> {
        self.registered
            .lock()
            .iter()
            .map(|(name, long_name)| SdMeta {
                name: name.clone(),
                long_name: long_name.clone(),
                category: SdCategory::Other,
            })
            .collect()
    }
}

struct MockSdInstance {
    description: String,
}

impl SdInstance for MockSdInstance {
    fn description(&self) -> &str {
        &self.description
    }
}

/// A handle to a constructed mock SD instance's callback sink, letting test
/// code play the role of the SD plugin.
#[derive(Clone)]
pub struct MockSdHandle(Arc<dyn SdCallbacks>);

impl MockSdHandle {
    pub fn item_added(&self, parent: Option<MediaItem>, media: MediaItem) {
        self.0.item_added(parent, media);
    }

    pub fn item_removed(&self, media: MediaItem) {
        self.0.item_removed(media);
    }

    /// Fires `item_added` from a background thread, returning a receiver
    /// that becomes ready once the callback has returned. Exercises the "SD
    /// callbacks arrive on arbitrary threads" contract (spec.md §5, §8
    /// scenario 6).
    pub fn item_added_async(
        &self,
        parent: Option<MediaItem>,
        media: MediaItem,
    ) -> crossbeam_channel::Receiver<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let cbs = self.0.clone();
        std::thread::spawn(move || {
            cbs.item_added(parent, media);
            let _ = tx.send(());
        });
        rx
    }
}

/// A preparse engine that holds requests in memory until test code
/// explicitly resolves them via [`MockPreparseEngine::trigger_subtree`] /
/// [`MockPreparseEngine::trigger_ended`], or cancels them.
#[derive(Default)]
pub struct MockPreparseEngine {
    next_token: Mutex<u64>,
    pending: Mutex<HashMap<u64, (MediaItem, Arc<dyn PreparseCallbacks>)>>,
    cancelled: Mutex<HashSet<u64>>,
}

impl MockPreparseEngine {
    pub fn new() -> Self {
        MockPreparseEngine::default()
    }

    /// Delivers `on_subtree_added` for a still-pending request.
    pub fn trigger_subtree(&self, token: CancelToken, subtree: &PreparseNode) {
        if let Some((media, callbacks)) = self.pending.lock().get(&token.0) {
            callbacks.on_subtree_added(media, subtree);
        }
    }

    /// Delivers `on_preparse_ended` and retires the request.
    pub fn trigger_ended(&self, token: CancelToken, status: PreparseStatus) {
        if let Some((media, callbacks)) = self.pending.lock().remove(&token.0) {
            callbacks.on_preparse_ended(&media, status);
        }
    }

    pub fn is_cancelled(&self, token: CancelToken) -> bool {
        self.cancelled.lock().contains(&token.0)
    }
}

impl PreparseEngine for MockPreparseEngine {
    fn preparse(&self, media: MediaItem, callbacks: Arc<dyn PreparseCallbacks>) -> CancelToken {
        let mut next = self.next_token.lock();
        let token = *next;
        *next += 1;
        self.pending.lock().insert(token, (media, callbacks));
        CancelToken(token)
    }

    fn cancel(&self, token: CancelToken) {
        self.pending.lock().remove(&token.0);
        self.cancelled.lock().insert(token.0);
    }
}

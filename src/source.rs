//! Media source: pairs exactly one [`MediaTree`] with exactly one live SD
//! instance identified by a name.
//!
//! Grounded on `examples/original_source/src/media_source/media_source.c`:
//! `vlc_media_source_New` (construction order: tree before SD, since
//! `vlc_sd_Create` may synchronously call back into `item_added`), and
//! `services_discovery_item_added`/`services_discovery_item_removed` (the
//! callback bodies below).

use std::sync::Arc;

use crate::error::MediaSourceError;
use crate::item::MediaItem;
use crate::sd::{SdCallbacks, SdCatalog, SdInstance};
use crate::tree::MediaTree;

/// Routes SD callbacks into a tree. Kept separate from [`MediaSourceInner`]
/// so the callback sink can exist — and be handed to the SD catalog —
/// before the SD instance it will belong to has been created, mirroring the
/// original's "the tree must be initialized first, since creating the SD
/// may call back into it immediately" ordering without needing a
/// partially-initialized self-pointer to do it.
struct TreeSink {
    tree: MediaTree,
    source_name: String,
}

impl SdCallbacks for TreeSink {
    fn item_added(&self, parent: Option<MediaItem>, media: MediaItem) {
        log::debug!(
            "{}: adding: {}",
            self.source_name,
            media.name().unwrap_or("(null)")
        );

        let mut guard = self.tree.lock();
        let parent_node = match &parent {
            Some(p) => guard
                .find(p)
                .map(|(node, _)| node)
                .unwrap_or_else(|| guard.root()),
            None => guard.root(),
        };
        if let Err(err) = guard.add(parent_node, media) {
            log::error!(
                "{}: could not allocate media tree node: {err}",
                self.source_name
            );
        }
    }

    fn item_removed(&self, media: MediaItem) {
        log::debug!(
            "{}: removing: {}",
            self.source_name,
            media.name().unwrap_or("(null)")
        );

        let mut guard = self.tree.lock();
        if !guard.remove(&media) {
            // SD plugin bug: removing an item it never added. The tree
            // stays consistent; we only log it.
            log::warn!("{}: removing item not added", self.source_name);
        }
    }
}

struct MediaSourceInner {
    name: String,
    description: String,
    tree: MediaTree,
    // Held only to keep the instance alive and destroy it (stop its
    // callbacks) on drop; its `SdCallbacks` target is `TreeSink`, not
    // `self`.
    _sd: Box<dyn SdInstance>,
}

/// A named producer: one SD instance writing into one [`MediaTree`].
///
/// `hold`/`release` are provided for API parity with the original's manual
/// refcount; they wrap `Clone`/`Drop`.
#[derive(Clone)]
pub struct MediaSource(Arc<MediaSourceInner>);

impl MediaSource {
    /// Creates an empty tree, then asks `catalog` to instantiate the named
    /// SD plugin against it. On any failure the tree (and any partial
    /// state) is torn down by ordinary `Drop`, mirroring the original's
    /// "partial state is torn down in reverse order".
    pub(crate) fn construct(
        name: &str,
        catalog: &dyn SdCatalog,
    ) -> Result<MediaSource, MediaSourceError> {
        let tree = MediaTree::new();
        let sink: Arc<dyn SdCallbacks> = Arc::new(TreeSink {
            tree: tree.clone(),
            source_name: name.to_string(),
        });
        let sd = catalog.create(name, sink)?;
        let description = sd.description().to_string();
        Ok(MediaSource(Arc::new(MediaSourceInner {
            name: name.to_string(),
            description,
            tree,
            _sd: sd,
        })))
    }

    /// Increments the handle's reference count (i.e. clones it).
    pub fn hold(&self) -> MediaSource {
        self.clone()
    }

    /// Decrements the handle's reference count (i.e. drops it).
    pub fn release(self) {
        drop(self);
    }

    /// The SD plugin key this source was constructed with.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The human-readable label the SD instance published at construction.
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// The tree this source feeds. Cloning the returned handle holds the
    /// tree independently of this source's own lifetime.
    pub fn tree(&self) -> MediaTree {
        self.0.tree.clone()
    }

    /// A non-owning handle usable as a provider registry entry (see
    /// DESIGN.md, Open Question #1).
    pub(crate) fn downgrade(&self) -> WeakMediaSource {
        WeakMediaSource(Arc::downgrade(&self.0))
    }
}

/// A non-owning reference to a [`MediaSource`], as kept by
/// [`crate::provider::MediaSourceProvider`]'s registry. Stands in for the
/// original's intrusive list link plus manual refcount coordination (see
/// DESIGN.md, Open Question #1): a dead entry simply fails to upgrade.
pub(crate) struct WeakMediaSource(std::sync::Weak<MediaSourceInner>);

impl WeakMediaSource {
    pub(crate) fn upgrade(&self) -> Option<MediaSource> {
        self.0.upgrade().map(MediaSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSdCatalog, MockSdHandle};

    #[test]
    fn construct_creates_empty_tree() {
        let catalog = MockSdCatalog::new();
        catalog.register("mock", "Mock Discovery");
        let source = MediaSource::construct("mock", &catalog).unwrap();
        assert_eq!(source.name(), "mock");
        assert_eq!(source.description(), "Mock Discovery");
        let guard = source.tree().lock();
        assert!(guard.node(guard.root()).unwrap().children().is_empty());
    }

    #[test]
    fn construct_unknown_name_fails() {
        let catalog = MockSdCatalog::new();
        let err = MediaSource::construct("nope", &catalog).unwrap_err();
        assert!(matches!(err, MediaSourceError::NotFound(_)));
    }

    #[test]
    fn sd_item_added_and_removed_mutate_tree() {
        let catalog = MockSdCatalog::new();
        catalog.register("mock", "Mock Discovery");
        let source = MediaSource::construct("mock", &catalog).unwrap();
        let handle: MockSdHandle = catalog.handle_for("mock").unwrap();

        let item = MediaItem::new("vlc://x", Some("x".into()));
        handle.item_added(None, item.clone());
        {
            let guard = source.tree().lock();
            assert_eq!(guard.node(guard.root()).unwrap().children().len(), 1);
        }

        handle.item_removed(item);
        let guard = source.tree().lock();
        assert!(guard.node(guard.root()).unwrap().children().is_empty());
    }

    #[test]
    fn sd_remove_of_unknown_item_is_absorbed() {
        let catalog = MockSdCatalog::new();
        catalog.register("mock", "Mock Discovery");
        let source = MediaSource::construct("mock", &catalog).unwrap();
        let handle = catalog.handle_for("mock").unwrap();
        // Never added; must not panic.
        handle.item_removed(MediaItem::new("vlc://ghost", None));
        let guard = source.tree().lock();
        assert!(guard.node(guard.root()).unwrap().children().is_empty());
    }
}

//! Preparse integration: fire-and-forget subtree expansion of a single item,
//! with cancellation.
//!
//! Grounded on `examples/original_source/src/media_source/media_tree.c`'s
//! `vlc_media_tree_Preparse`/`vlc_media_tree_PreparseCancel` and the
//! `media_subtree_changed`/`media_subtree_preparse_ended` callbacks they
//! install. The preparse engine itself is out of scope (spec.md §1); this
//! module is only the binding between it and a [`MediaTree`].

use std::sync::Arc;

use crate::item::MediaItem;
use crate::tree::MediaTree;

/// Outcome of a preparse request, reported via
/// [`PreparseCallbacks::on_preparse_ended`] and then, by the tree, to every
/// `on_preparse_end` listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreparseStatus {
    /// Preparsing completed successfully.
    Done,
    /// Preparsing was skipped (e.g. the item doesn't need it).
    Skipped,
    /// Preparsing timed out.
    Timeout,
    /// Preparsing failed.
    Failed,
}

/// A node of the subtree handed back by the preparse engine on completion —
/// the engine's own result tree, independent of any [`crate::tree::MediaTree`]
/// arena, deep-copied into one by [`crate::tree::TreeGuard::replace_children`].
/// Stands in for `input_item_node_t` as returned by
/// `input_preparser_callbacks_t::on_subtree_added` in the original.
pub struct PreparseNode {
    pub item: MediaItem,
    pub children: Vec<PreparseNode>,
}

impl PreparseNode {
    /// A node with no children.
    pub fn leaf(item: MediaItem) -> Self {
        PreparseNode {
            item,
            children: Vec::new(),
        }
    }

    /// A node with the given children.
    pub fn with_children(item: MediaItem, children: Vec<PreparseNode>) -> Self {
        PreparseNode { item, children }
    }
}

/// Opaque identifier for a pending preparse request, handed back by
/// [`PreparseEngine::preparse`] and passed to [`PreparseEngine::cancel`].
/// Its meaning belongs entirely to the preparse engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(pub u64);

/// The completion callbacks a preparse request registers with the engine.
/// Implemented internally by the tree that requested the preparse; not
/// meant to be implemented by callers.
pub trait PreparseCallbacks: Send + Sync {
    /// The engine expanded `media` to the given subtree (depth 1).
    fn on_subtree_added(&self, media: &MediaItem, subtree: &PreparseNode);
    /// The preparse request for `media` finished with `status`.
    fn on_preparse_ended(&self, media: &MediaItem, status: PreparseStatus);
}

/// The external preparse engine's interface, as consumed by this crate.
/// Out of scope to implement here (spec.md §1); a real binding adapts
/// whatever metadata-fetching subsystem a host application has.
pub trait PreparseEngine: Send + Sync {
    /// Requests depth-1 expansion of `media`, registering `callbacks` for
    /// completion. Returns a token usable with [`PreparseEngine::cancel`].
    fn preparse(&self, media: MediaItem, callbacks: Arc<dyn PreparseCallbacks>) -> CancelToken;

    /// Cancels a pending request previously returned by
    /// [`PreparseEngine::preparse`].
    fn cancel(&self, token: CancelToken);
}

/// Binds preparse completion callbacks back into a specific tree, exactly as
/// `userdata = tree` does in the original.
struct TreePreparseCallbacks {
    tree: MediaTree,
}

impl PreparseCallbacks for TreePreparseCallbacks {
    fn on_subtree_added(&self, media: &MediaItem, subtree: &PreparseNode) {
        let mut guard = self.tree.lock();
        if let Some((node, _parent)) = guard.find(media) {
            if let Err(err) = guard.replace_children(node, subtree) {
                log::warn!("preparse: failed to install expanded subtree: {err}");
            }
        } else {
            log::debug!("preparse: subtree arrived for an item the tree no longer has");
        }
    }

    fn on_preparse_ended(&self, media: &MediaItem, status: PreparseStatus) {
        let mut guard = self.tree.lock();
        if let Some((node, _parent)) = guard.find(media) {
            guard.notify_preparse_end(node, status);
        } else {
            log::debug!("preparse: completion arrived for an item the tree no longer has");
        }
    }
}

impl MediaTree {
    /// Requests the preparse engine to expand `item` to depth 1 within this
    /// tree. Completion and subtree-ready callbacks route back through the
    /// tree's own lock and listener list.
    pub fn preparse(&self, engine: &dyn PreparseEngine, item: MediaItem) -> CancelToken {
        let callbacks: Arc<dyn PreparseCallbacks> = Arc::new(TreePreparseCallbacks {
            tree: self.clone(),
        });
        engine.preparse(item, callbacks)
    }
}

/// Cancels a pending preparse request. A free function rather than a
/// `MediaTree` method since cancellation needs only the engine and the
/// token, not the tree (mirroring `vlc_media_tree_PreparseCancel`, which
/// takes no tree argument either).
pub fn preparse_cancel(engine: &dyn PreparseEngine, token: CancelToken) {
    engine.cancel(token);
}

//! The media tree: a mutable, lock-guarded tree of media items shared
//! between a [`crate::source::MediaSource`] (or a preparse completion) and
//! any number of UI-facing listeners.
//!
//! Ported from `examples/original_source/src/media_source/media_tree.c`.
//! The single coarse `parking_lot::Mutex` plays the role of
//! `media_tree_private_t.lock`; listener fan-out happens while it is held,
//! exactly as `vlc_media_tree_Notify` requires (spec.md §4.1, "Why a single
//! coarse lock").

mod node;
mod listener;

pub use listener::{ListenerId, MediaTreeListener};
pub use node::{NodeId, NodeRef};

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TreeError;
use crate::item::MediaItem;
use crate::preparse::PreparseNode;
use listener::ListenerEntry;
use node::Arena;

struct TreeState {
    arena: Arena,
    listeners: Vec<ListenerEntry>,
    next_listener_id: u64,
}

impl TreeState {
    fn new() -> Self {
        TreeState {
            arena: Arena::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    fn notify<F>(&self, mut f: F)
    where
        F: FnMut(&dyn MediaTreeListener, &TreeView<'_>),
    {
        let view = TreeView { arena: &self.arena };
        for entry in &self.listeners {
            f(entry.callback.as_ref(), &view);
        }
    }
}

struct TreeImpl {
    state: Mutex<TreeState>,
}

/// A reference-counted handle to a media tree.
///
/// `hold`/`release` are provided for API parity with the original's manual
/// refcount (spec.md §9); they are thin wrappers over `Clone`/`Drop`, which
/// is the idiomatic realisation the design notes call for.
#[derive(Clone)]
pub struct MediaTree(Arc<TreeImpl>);

impl MediaTree {
    /// Creates an empty tree: a sentinel root with no item, no listeners.
    pub fn new() -> Self {
        MediaTree(Arc::new(TreeImpl {
            state: Mutex::new(TreeState::new()),
        }))
    }

    /// Increments the handle's reference count (i.e. clones it).
    pub fn hold(&self) -> MediaTree {
        self.clone()
    }

    /// Decrements the handle's reference count (i.e. drops it). The last
    /// release tears down the arena and any listeners still registered.
    pub fn release(self) {
        drop(self);
    }

    /// Locks the tree for reading and mutation. `parking_lot::Mutex` is not
    /// reentrant: calling this again from the same thread while already
    /// holding the guard — e.g. from inside a listener callback that kept
    /// its own `MediaTree` clone around rather than using the `TreeView` it
    /// was handed — blocks forever rather than panicking. A listener must
    /// only read through the `TreeView` parameter, never re-lock the tree
    /// itself; see spec.md §5, "Lock ordering".
    pub fn lock(&self) -> TreeGuard<'_> {
        TreeGuard {
            state: self.0.state.lock(),
        }
    }
}

impl Default for MediaTree {
    fn default() -> Self {
        MediaTree::new()
    }
}

/// A read-only window onto a tree's state, handed to listener callbacks.
/// There is no way to reach a mutating operation through a `TreeView`.
pub struct TreeView<'a> {
    arena: &'a Arena,
}

impl<'a> TreeView<'a> {
    pub fn root(&self) -> NodeId {
        self.arena.root()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena.node(id)
    }

    pub fn find(&self, item: &MediaItem) -> Option<(NodeId, Option<NodeId>)> {
        self.arena.find(item)
    }
}

/// The lock guard returned by [`MediaTree::lock`]. All read and write
/// operations on a tree go through this type; dropping it is "unlock".
pub struct TreeGuard<'a> {
    state: parking_lot::MutexGuard<'a, TreeState>,
}

impl<'a> TreeGuard<'a> {
    pub fn root(&self) -> NodeId {
        self.state.arena.root()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.state.arena.node(id)
    }

    /// Appends a new node holding `item` under `parent` and fires
    /// `on_children_added(parent, [new_node], 1)` to every listener.
    ///
    /// `parent` must be a node currently in this tree; if it is not, the
    /// call behaves as if the root had been passed (mirroring the SD-bug
    /// handling in `services_discovery_item_added`, spec.md §4.2 step 2).
    pub fn add(&mut self, parent: NodeId, item: MediaItem) -> Result<NodeId, TreeError> {
        let parent = if self.state.arena.contains(parent) {
            parent
        } else {
            log::warn!("media tree: add() under unknown parent, appending to root");
            self.state.arena.root()
        };
        let new_node = self.state.arena.append_child(parent, item);
        log::trace!("media tree: added node under parent");
        self.state
            .notify(|cb, view| cb.on_children_added(view, parent, &[new_node]));
        Ok(new_node)
    }

    /// Depth-first search for `item`, matched by identity. Returns the
    /// found node and its parent (`None` iff the node is the root, which
    /// can never match since the root never holds an item).
    pub fn find(&self, item: &MediaItem) -> Option<(NodeId, Option<NodeId>)> {
        self.state.arena.find(item)
    }

    /// Removes the node holding `item`, firing
    /// `on_children_removed(parent, [node], 1)` before destroying the node
    /// and its subtree. Returns `false`, without firing any callback, if
    /// `item` is not present.
    pub fn remove(&mut self, item: &MediaItem) -> bool {
        let Some((node, parent)) = self.state.arena.find(item) else {
            return false;
        };
        // The root never holds an item, so `find` never returns it as a
        // match; `parent` is therefore always `Some` here.
        let parent = parent.expect("matched node is never the root");
        self.state.arena.detach(parent, node);
        log::trace!("media tree: removing node");
        self.state
            .notify(|cb, view| cb.on_children_removed(view, parent, &[node]));
        self.state.arena.destroy_subtree(node);
        true
    }

    /// Registers a listener. If `emit_initial` is true, synchronously
    /// invokes `on_children_reset(root)` on it before returning, so it sees
    /// a consistent snapshot of the current state as its first event.
    pub fn add_listener(
        &mut self,
        callback: Arc<dyn MediaTreeListener>,
        emit_initial: bool,
    ) -> ListenerId {
        let id = ListenerId::new(self.state.next_listener_id);
        self.state.next_listener_id += 1;
        self.state.listeners.push(ListenerEntry {
            id,
            callback: callback.clone(),
        });
        if emit_initial {
            let view = TreeView {
                arena: &self.state.arena,
            };
            let root = self.state.arena.root();
            callback.on_children_reset(&view, root);
        }
        id
    }

    /// Deregisters a listener. After this returns, its callbacks are
    /// guaranteed never to be invoked again for this tree.
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.state.listeners.retain(|entry| entry.id != id);
    }

    /// Fires `on_preparse_end(node, status)` to every listener. Used by the
    /// preparse completion path (spec.md §4.4); not part of the public
    /// mutator surface beyond that integration.
    pub(crate) fn notify_preparse_end(&mut self, node: NodeId, status: crate::preparse::PreparseStatus) {
        self.state
            .notify(|cb, view| cb.on_preparse_end(view, node, status));
    }

    /// Replaces `node`'s children wholesale with a deep copy of
    /// `new_subtree`, firing `on_children_reset(node)`. Used by the
    /// preparse completion path (spec.md §4.4).
    pub fn replace_children(
        &mut self,
        node: NodeId,
        new_subtree: &PreparseNode,
    ) -> Result<(), TreeError> {
        if !self.state.arena.contains(node) {
            return Ok(());
        }
        self.state.arena.clear_children(node);
        rebuild_subtree(&mut self.state.arena, node, new_subtree);
        log::trace!("media tree: replaced children (preparse result)");
        self.state
            .notify(|cb, view| cb.on_children_reset(view, node));
        Ok(())
    }
}

/// Deep-copies `source`'s children into the arena under `to`, mirroring
/// `vlc_media_tree_AddSubtree`.
fn rebuild_subtree(arena: &mut Arena, to: NodeId, source: &PreparseNode) {
    for child in &source.children {
        let node = arena.append_child(to, child.item.clone());
        rebuild_subtree(arena, node, child);
    }
}

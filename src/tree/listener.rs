//! Listener callback table.
//!
//! Mirrors `struct vlc_media_tree_callbacks` in
//! `examples/original_source/src/media_source/media_tree.h` /
//! `vlc_media_source.h`: each slot is optional (default no-op here, a null
//! function pointer there), and every invocation happens with the tree's
//! lock held.

use std::sync::Arc;

use super::{NodeId, TreeView};
use crate::preparse::PreparseStatus;

/// Observer for a single [`super::MediaTree`]. Register with
/// [`super::TreeGuard::add_listener`], deregister with
/// [`super::TreeGuard::remove_listener`].
///
/// Every method receives a [`TreeView`], a read-only window onto the tree's
/// locked state. There is no mutating method reachable from a `TreeView`, so
/// a listener implementation cannot accidentally call back into the same
/// tree's mutators and deadlock it — the pattern the original forbids only
/// by documentation (`vlc_media_tree.c`'s "it is illegal to call tree
/// mutators from within a listener callback") is here rejected by the
/// compiler instead.
pub trait MediaTreeListener: Send + Sync {
    /// `node.children` (and everything below it) should be treated as the
    /// authoritative new state.
    fn on_children_reset(&self, _tree: &TreeView<'_>, _node: NodeId) {}

    /// `children` were just appended under `parent`, in order.
    fn on_children_added(&self, _tree: &TreeView<'_>, _parent: NodeId, _children: &[NodeId]) {}

    /// `children` were just detached from `parent`. The detached subtrees
    /// are still reachable through `tree` until this call returns.
    fn on_children_removed(&self, _tree: &TreeView<'_>, _parent: NodeId, _children: &[NodeId]) {}

    /// Preparsing of the subtree rooted at `node` finished with `status`.
    fn on_preparse_end(&self, _tree: &TreeView<'_>, _node: NodeId, _status: PreparseStatus) {}
}

/// Handle returned by [`super::TreeGuard::add_listener`], used to pair it
/// with [`super::TreeGuard::remove_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(super) fn new(raw: u64) -> Self {
        ListenerId(raw)
    }
}

pub(super) struct ListenerEntry {
    pub id: ListenerId,
    pub callback: Arc<dyn MediaTreeListener>,
}

//! Arena-backed node storage for [`super::MediaTree`].
//!
//! The original (`examples/original_source/src/media_source/media_tree.c`)
//! addresses nodes with raw `input_item_node_t *` pointers compared by
//! identity. A safe Rust arena gives the same "stable handle while the tree
//! is locked" property without unsafe code: a [`NodeId`] is only meaningful
//! together with the [`super::MediaTree`] it was minted from, exactly like a
//! raw pointer would only be meaningful for its own tree.

use std::collections::HashMap;

use crate::item::MediaItem;

/// An opaque handle to a position in a media tree.
///
/// `NodeId`s from different trees are never comparable in a meaningful way;
/// using one against the wrong tree simply finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(super) const ROOT: NodeId = NodeId(0);
}

pub(super) struct NodeRecord {
    pub item: Option<MediaItem>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A read-only view of one node: its item (`None` only for the root) and its
/// children, in insertion order.
pub struct NodeRef<'a> {
    id: NodeId,
    record: &'a NodeRecord,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn item(&self) -> Option<&'a MediaItem> {
        self.record.item.as_ref()
    }

    pub fn children(&self) -> &'a [NodeId] {
        &self.record.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.record.parent
    }
}

/// The node arena plus the bookkeeping `add`/`remove`/`find`/
/// `replace_children` need. Always reached through a locked
/// [`super::TreeGuard`] or, for reads inside a listener callback, a
/// [`super::TreeView`].
pub(super) struct Arena {
    nodes: HashMap<NodeId, NodeRecord>,
    next_id: u64,
}

impl Arena {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            NodeId::ROOT,
            NodeRecord {
                item: None,
                parent: None,
                children: Vec::new(),
            },
        );
        Arena { nodes, next_id: 1 }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(&id).map(|record| NodeRef { id, record })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Depth-first search matching by item identity, exactly as
    /// `vlc_media_tree_FindNodeByMedia` does.
    pub fn find(&self, item: &MediaItem) -> Option<(NodeId, Option<NodeId>)> {
        self.find_from(NodeId::ROOT, item)
    }

    fn find_from(&self, start: NodeId, item: &MediaItem) -> Option<(NodeId, Option<NodeId>)> {
        let record = self.nodes.get(&start)?;
        for &child_id in &record.children {
            let child = self.nodes.get(&child_id)?;
            if let Some(child_item) = &child.item {
                if child_item.is(item) {
                    return Some((child_id, Some(start)));
                }
            }
            if let Some(found) = self.find_from(child_id, item) {
                return Some(found);
            }
        }
        None
    }

    /// Appends a fresh node holding `item` under `parent`. Caller is
    /// responsible for checking `parent` exists.
    pub fn append_child(&mut self, parent: NodeId, item: MediaItem) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeRecord {
                item: Some(item),
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        self.nodes
            .get_mut(&parent)
            .expect("caller checked parent exists")
            .children
            .push(id);
        id
    }

    /// Detaches `child` from `parent`'s child list without destroying it.
    /// The subtree rooted at `child` remains valid in the arena until
    /// [`Arena::destroy_subtree`] is called.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(record) = self.nodes.get_mut(&parent) {
            record.children.retain(|&id| id != child);
        }
    }

    /// Recursively removes `node` and all of its descendants from the
    /// arena.
    pub fn destroy_subtree(&mut self, node: NodeId) {
        let children = match self.nodes.remove(&node) {
            Some(record) => record.children,
            None => return,
        };
        for child in children {
            self.destroy_subtree(child);
        }
    }

    /// Clears `node`'s children without touching `node` itself.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = self
            .nodes
            .get_mut(&node)
            .map(|record| std::mem::take(&mut record.children))
            .unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }
    }
}

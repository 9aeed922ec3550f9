//! End-to-end scenarios lifted from spec.md §8, driven against the mock SD
//! catalog and preparse engine in `media_source::testing`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use media_source::preparse::{PreparseNode, PreparseStatus};
use media_source::testing::MockSdCatalog;
use media_source::{MediaItem, MediaSourceProvider, MediaTreeListener, NodeId, TreeView};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl MediaTreeListener for Recorder {
    fn on_children_reset(&self, _tree: &TreeView<'_>, _node: NodeId) {
        self.events.lock().push("reset".into());
    }
    fn on_children_added(&self, _tree: &TreeView<'_>, _parent: NodeId, children: &[NodeId]) {
        self.events
            .lock()
            .push(format!("added:{}", children.len()));
    }
    fn on_children_removed(&self, _tree: &TreeView<'_>, _parent: NodeId, children: &[NodeId]) {
        self.events
            .lock()
            .push(format!("removed:{}", children.len()));
    }
}

// Scenario 1: empty tree, then single add.
#[test]
fn scenario_empty_tree_then_single_add() {
    let tree = media_source::MediaTree::new();
    let mut guard = tree.lock();
    let root = guard.root();
    let item = MediaItem::new("vlc://a", Some("aaa".into()));
    let n = guard.add(root, item).unwrap();

    let root_ref = guard.node(root).unwrap();
    assert_eq!(root_ref.children(), &[n]);
    let n_ref = guard.node(n).unwrap();
    assert_eq!(n_ref.item().unwrap().url(), "vlc://a");
    assert!(n_ref.children().is_empty());
}

// Scenario 2: nested add + remove.
#[test]
fn scenario_nested_add_and_remove() {
    let tree = media_source::MediaTree::new();
    let mut guard = tree.lock();
    let root = guard.root();
    let p = guard
        .add(root, MediaItem::new("vlc://p", Some("p".into())))
        .unwrap();
    let c1_item = MediaItem::new("vlc://c1", Some("c1".into()));
    let c1 = guard.add(p, c1_item.clone()).unwrap();
    let c2 = guard
        .add(p, MediaItem::new("vlc://c2", Some("c2".into())))
        .unwrap();
    let _ = c1;
    assert!(guard.remove(&c1_item));
    assert_eq!(guard.node(p).unwrap().children(), &[c2]);
}

// Scenario 3: listener sees ordered fan-out.
#[test]
fn scenario_listener_sees_ordered_fanout() {
    let tree = media_source::MediaTree::new();
    let recorder = Arc::new(Recorder::default());
    let mut guard = tree.lock();
    guard.add_listener(recorder.clone(), false);

    let root = guard.root();
    let item_a = MediaItem::new("vlc://a", None);
    let item_b = MediaItem::new("vlc://b", None);
    guard.add(root, item_a.clone()).unwrap();
    guard.add(root, item_b).unwrap();
    guard.remove(&item_a);
    drop(guard);

    assert_eq!(
        *recorder.events.lock(),
        vec!["added:1", "added:1", "removed:1"]
    );
}

// Scenario 4: initial snapshot on registration.
#[test]
fn scenario_initial_snapshot_on_registration() {
    let tree = media_source::MediaTree::new();
    let mut guard = tree.lock();
    let root = guard.root();
    let m1 = MediaItem::new("vlc://m1", None);
    let m2 = MediaItem::new("vlc://m2", None);
    let n1 = guard.add(root, m1.clone()).unwrap();
    guard.add(n1, m2.clone()).unwrap();

    let recorder = Arc::new(Recorder::default());
    guard.add_listener(recorder.clone(), true);
    drop(guard);

    assert_eq!(*recorder.events.lock(), vec!["reset"]);

    let guard = tree.lock();
    let root_ref = guard.node(root).unwrap();
    let first_child = guard.node(root_ref.children()[0]).unwrap();
    assert!(first_child.item().unwrap().is(&m1));
    let grandchild = guard.node(first_child.children()[0]).unwrap();
    assert!(grandchild.item().unwrap().is(&m2));
}

// Scenario 5: provider dedup, then reuse after release.
#[test]
fn scenario_provider_dedup_and_reuse() {
    let catalog = Arc::new(MockSdCatalog::new());
    catalog.register("sd_x", "SD X");
    let provider = MediaSourceProvider::new(catalog);

    let s1 = provider.get_media_source("sd_x").unwrap();
    let s2 = provider.get_media_source("sd_x").unwrap();
    assert_eq!(s1.name(), s2.name());
    assert_eq!(s1.description(), s2.description());

    s1.release();
    s2.release();

    let s3 = provider.get_media_source("sd_x").unwrap();
    let guard = s3.tree().lock();
    assert!(guard.node(guard.root()).unwrap().children().is_empty());
}

// Scenario 6: SD callback integration, fired from a background thread.
#[test]
fn scenario_sd_callback_from_background_thread() {
    let catalog = Arc::new(MockSdCatalog::new());
    catalog.register("mock", "Mock Discovery");
    let provider = MediaSourceProvider::new(catalog.clone());

    let source = provider.get_media_source("mock").unwrap();
    let recorder = Arc::new(Recorder::default());
    source.tree().lock().add_listener(recorder.clone(), false);

    let handle = catalog.handle_for("mock").unwrap();
    let item = MediaItem::new("vlc://x", None);
    let ready = handle.item_added_async(None, item);
    ready
        .recv_timeout(Duration::from_secs(5))
        .expect("background item_added did not complete");

    assert_eq!(*recorder.events.lock(), vec!["added:1"]);
}

// Preparse completion path: subtree replacement then status fan-out.
#[test]
fn scenario_preparse_completion_replaces_subtree_and_notifies() {
    use media_source::testing::MockPreparseEngine;

    let tree = media_source::MediaTree::new();
    let dir_item = MediaItem::new("vlc://dir", Some("dir".into()));
    let node = {
        let mut guard = tree.lock();
        let root = guard.root();
        guard.add(root, dir_item.clone()).unwrap()
    };

    let recorder = Arc::new(Recorder::default());
    tree.lock().add_listener(recorder.clone(), false);

    let engine = MockPreparseEngine::new();
    let token = tree.preparse(&engine, dir_item.clone());

    let child = PreparseNode::leaf(MediaItem::new("vlc://dir/a", Some("a".into())));
    let subtree = PreparseNode::with_children(dir_item, vec![child]);
    engine.trigger_subtree(token, &subtree);

    {
        let guard = tree.lock();
        assert_eq!(guard.node(node).unwrap().children().len(), 1);
    }

    engine.trigger_ended(token, PreparseStatus::Done);
    drop(tree);

    assert_eq!(*recorder.events.lock(), vec!["reset"]);
}

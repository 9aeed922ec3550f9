//! A process-wide registry of named media sources, each owning a mutable
//! tree of media items fed by a service discovery plugin, with
//! reference-counted sharing, observer-pattern change notifications, and
//! thread-safe concurrent access by multiple clients.
//!
//! Four pieces, leaves first: [`tree`] (the mutable, listener-observed
//! tree itself), [`source`] (one SD instance writing into one tree),
//! [`provider`] (the name-keyed registry and factory for sources), and
//! [`preparse`] (the binding that lets a tree owner request recursive
//! subtree expansion of one item).
//!
//! [`sd`] defines the service-discovery seam this crate consumes; the SD
//! plugin machinery itself — plugin loading, module-name lookup,
//! per-plugin configuration — is out of scope and lives entirely behind
//! that trait boundary, same for the preparse engine behind [`preparse`]'s
//! traits.

pub mod error;
pub mod item;
pub mod preparse;
pub mod provider;
pub mod sd;
pub mod source;
pub mod tree;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{MediaSourceError, TreeError};
pub use item::MediaItem;
pub use provider::{MediaSourceProvider, MetaList};
pub use source::MediaSource;
pub use tree::{ListenerId, MediaTree, MediaTreeListener, NodeId, NodeRef, TreeGuard, TreeView};

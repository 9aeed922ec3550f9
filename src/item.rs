//! Opaque media item handles.
//!
//! A [`MediaItem`] is reference-counted and compared by identity, never by
//! content: two items with the same name and URL are still distinct unless
//! they are the same handle. This mirrors `input_item_t` in
//! `examples/original_source/src/media_source/media_source.c`, which is
//! matched throughout the tree by pointer equality (`child->p_item == media`).

use std::fmt;
use std::sync::Arc;

struct MediaItemInner {
    name: Option<String>,
    url: String,
    meta: serde_json::Map<String, serde_json::Value>,
}

/// A playable or browsable entity: a name, a URL, and arbitrary metadata.
///
/// Cloning a `MediaItem` is cheap (an `Arc` bump) and yields a handle that
/// compares equal by identity to the original, never by value.
#[derive(Clone)]
pub struct MediaItem(Arc<MediaItemInner>);

impl MediaItem {
    /// Creates a new item with the given URL and optional display name.
    pub fn new(url: impl Into<String>, name: Option<String>) -> Self {
        MediaItem(Arc::new(MediaItemInner {
            name,
            url: url.into(),
            meta: serde_json::Map::new(),
        }))
    }

    /// Creates a new item with attached metadata.
    pub fn with_meta(
        url: impl Into<String>,
        name: Option<String>,
        meta: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        MediaItem(Arc::new(MediaItemInner {
            name,
            url: url.into(),
            meta,
        }))
    }

    /// The item's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The item's URL.
    pub fn url(&self) -> &str {
        &self.0.url
    }

    /// Arbitrary metadata attached to the item.
    pub fn meta(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0.meta
    }

    /// Returns true iff `self` and `other` are the same underlying item
    /// (identity, not content, equality).
    pub fn is(&self, other: &MediaItem) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for MediaItem {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}
impl Eq for MediaItem {}

impl fmt::Debug for MediaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaItem")
            .field("name", &self.0.name)
            .field("url", &self.0.url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_content() {
        let a = MediaItem::new("vlc://a", Some("aaa".into()));
        let b = MediaItem::new("vlc://a", Some("aaa".into()));
        assert_ne!(a, b, "identical content must still compare unequal");
        assert_eq!(a, a.clone());
    }
}

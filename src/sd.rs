//! Service discovery (SD) surface: the interface this crate consumes from,
//! and supplies to, the external SD plugin machinery.
//!
//! Out of scope to implement (spec.md §1): plugin loading, module-name
//! lookup, per-plugin configuration all belong to the SD subsystem itself.
//! This module only defines the seam, grounded on
//! `examples/original_source/src/media_source/media_source.c`'s
//! `services_discovery_callbacks`/`services_discovery_owner_t` and the
//! `vlc_sd_Create`/`vlc_sd_Destroy`/`vlc_sd_GetNames` call shapes.

use std::sync::Arc;

use crate::error::MediaSourceError;
use crate::item::MediaItem;

/// Broad grouping for SD plugins, mirroring `services_discovery_category_e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdCategory {
    Devices,
    Lan,
    Internet,
    MyComputer,
    Other,
}

/// One entry of an SD plugin catalog listing: `{name, long_name, category}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdMeta {
    pub name: String,
    pub long_name: String,
    pub category: SdCategory,
}

/// The consumer surface a [`crate::source::MediaSource`] hands to the SD
/// instance it owns: "here is where newly discovered/removed items go".
/// Mirrors `struct services_discovery_callbacks`.
pub trait SdCallbacks: Send + Sync {
    /// A new item has been added to the discovery, optionally under
    /// `parent` (if `None`, it belongs directly under the tree's root).
    fn item_added(&self, parent: Option<MediaItem>, media: MediaItem);

    /// An item has been removed from the discovery.
    fn item_removed(&self, media: MediaItem);
}

/// A live, running SD instance. Destroyed (stops producing callbacks) when
/// dropped.
pub trait SdInstance: Send + Sync {
    /// Human-readable label published by the plugin at creation time.
    fn description(&self) -> &str;
}

/// The SD plugin catalog: create instances by name, and enumerate what's
/// available. Mirrors `vlc_sd_Create`/`vlc_sd_Destroy` (destruction is
/// `Drop` on the returned [`SdInstance`]) and `vlc_sd_GetNames`.
pub trait SdCatalog: Send + Sync {
    /// Instantiates the named SD plugin, wiring `callbacks` as its owner
    /// sink. Fails with [`MediaSourceError::NotFound`] if no plugin is
    /// registered under `name`, or [`MediaSourceError::SdInitFailed`] if the
    /// plugin exists but failed to start.
    fn create(
        &self,
        name: &str,
        callbacks: Arc<dyn SdCallbacks>,
    ) -> Result<Box<dyn SdInstance>, MediaSourceError>;

    /// Enumerates all plugins this catalog knows about.
    fn list(&self) -> Vec<SdMeta>;
}

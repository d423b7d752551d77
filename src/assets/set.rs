use std::collections::{HashMap, HashSet};

use crate::assets::decode::PreparedImage;
use crate::assets::loader::PatternId;
use crate::foundation::core::Side;

/// Named raster asset slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// Garment silhouette for one side.
    Silhouette(Side),
    /// Pattern swatch. Resolved patterns live in [`PatternCache`], not in an [`AssetSet`].
    Pattern(PatternId),
    /// User-supplied logo.
    Logo,
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKey::Silhouette(side) => write!(f, "{side}"),
            AssetKey::Pattern(id) => write!(f, "{id}"),
            AssetKey::Logo => f.write_str("logo"),
        }
    }
}

/// How a resolved image came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetOrigin {
    /// Fetched and decoded successfully.
    Decoded,
    /// Placeholder substituted after a fetch or decode error.
    Failed,
    /// Placeholder substituted after the load timeout elapsed.
    TimedOut,
    /// Handed in already decoded by the embedder.
    Provided,
}

impl AssetOrigin {
    pub fn is_placeholder(self) -> bool {
        matches!(self, AssetOrigin::Failed | AssetOrigin::TimedOut)
    }
}

/// A resolved image plus its provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedAsset {
    pub image: PreparedImage,
    pub origin: AssetOrigin,
}

/// Load state of one key. A key that was never requested has no slot.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetSlot {
    /// A load is in flight; only a resolution carrying `ticket` may fill the slot.
    Pending { ticket: u64 },
    /// Resolved. Later resolutions are discarded.
    Ready(LoadedAsset),
}

/// Slots for silhouettes and the logo, filled by the first resolution that arrives.
#[derive(Debug, Default)]
pub struct AssetSet {
    slots: HashMap<AssetKey, AssetSlot>,
    next_ticket: u64,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load for `key`, replacing whatever the slot held. The returned ticket identifies
    /// the only load allowed to resolve it.
    pub fn begin(&mut self, key: AssetKey) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.slots.insert(key, AssetSlot::Pending { ticket });
        ticket
    }

    /// Fill `key` if it is still unresolved.
    ///
    /// `ticket` is `None` for images provided directly; those may fill any unresolved slot. A
    /// loader resolution must carry the ticket of the pending load, so loads for a slot that has
    /// since been cleared or restarted are dropped. Returns whether the asset was stored.
    pub fn resolve(&mut self, key: AssetKey, ticket: Option<u64>, asset: LoadedAsset) -> bool {
        let accept = match (self.slots.get(&key), ticket) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(AssetSlot::Ready(_)), _) => false,
            (Some(AssetSlot::Pending { .. }), None) => true,
            (Some(AssetSlot::Pending { ticket: want }), Some(got)) => *want == got,
        };
        if accept {
            self.slots.insert(key, AssetSlot::Ready(asset));
        } else {
            tracing::warn!(%key, ?ticket, "discarding late asset resolution");
        }
        accept
    }

    pub fn slot(&self, key: AssetKey) -> Option<&AssetSlot> {
        self.slots.get(&key)
    }

    /// The resolved asset, if any.
    pub fn get(&self, key: AssetKey) -> Option<&LoadedAsset> {
        match self.slots.get(&key) {
            Some(AssetSlot::Ready(asset)) => Some(asset),
            _ => None,
        }
    }

    pub fn is_resolved(&self, key: AssetKey) -> bool {
        self.get(key).is_some()
    }

    /// Forget `key` entirely; pending loads for it will be discarded.
    pub fn clear(&mut self, key: AssetKey) {
        self.slots.remove(&key);
    }
}

/// Pattern swatches by id: filled lazily, shared across renders, never evicted.
#[derive(Debug, Default)]
pub struct PatternCache {
    images: HashMap<PatternId, PreparedImage>,
    in_flight: HashSet<PatternId>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PatternId) -> Option<&PreparedImage> {
        self.images.get(&id)
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.images.contains_key(&id)
    }

    pub fn is_in_flight(&self, id: PatternId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Mark `id` as requested. Returns `false` when it is already cached or being loaded.
    pub fn begin(&mut self, id: PatternId) -> bool {
        if self.images.contains_key(&id) {
            return false;
        }
        self.in_flight.insert(id)
    }

    /// Store a resolved pattern. The first image stored for an id is kept.
    pub fn insert(&mut self, id: PatternId, image: PreparedImage) -> bool {
        self.in_flight.remove(&id);
        if self.images.contains_key(&id) {
            tracing::warn!(pattern = %id, "pattern already cached; discarding");
            return false;
        }
        self.images.insert(id, image);
        true
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/set.rs"]
mod tests;

//! Item stacks as seen by operators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known item identifiers.
pub mod ids {
    pub const AIR: &str = "minecraft:air";
    pub const GLASS_BOTTLE: &str = "minecraft:glass_bottle";
    pub const AMETHYST_DUST: &str = "hexcast:amethyst_dust";
    pub const AMETHYST_SHARD: &str = "minecraft:amethyst_shard";
    pub const CHARGED_AMETHYST: &str = "hexcast:charged_amethyst";
    pub const BATTERY: &str = "hexcast:battery";
}

/// Namespaced item identifier, e.g. `hexcast:amethyst_dust`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    pub count: u32,
    /// Media stored on the stack itself (batteries).
    #[serde(default)]
    pub media: u64,
    /// Per-stack capacity override; crafted batteries carry their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_media: Option<u64>,
}

impl ItemStack {
    pub fn new(item: impl Into<ItemId>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            media: 0,
            max_media: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(ids::AIR, 0)
    }

    pub fn with_media(mut self, media: u64) -> Self {
        self.media = media;
        self
    }

    pub fn with_max_media(mut self, max_media: u64) -> Self {
        self.max_media = Some(max_media);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item.as_str() == ids::AIR
    }

    pub fn is(&self, id: &str) -> bool {
        !self.is_empty() && self.item.as_str() == id
    }

    pub fn shrink(&mut self, amount: u32) {
        self.count = self.count.saturating_sub(amount);
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("nothing")
        } else {
            write!(f, "{}x {}", self.count, self.item)
        }
    }
}

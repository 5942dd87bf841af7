//! The media capability: anything that can store or provide spendable media.
//!
//! Items do not implement [`MediaHolder`] themselves. Instead a
//! [`MediaRegistry`] maps item ids to a [`MediaCapability`], which hands out a
//! holder borrowing the stack. New kinds of media item are added by registering
//! a capability, not by extending a type hierarchy.
//!
//! Every mutating operation takes a `simulate` flag. With `simulate = true`
//! the holder reports what *would* happen and leaves the stack untouched; this
//! is how operators compute feasibility during evaluation.
//!
//! ```rust
//! use hexcast_core::item::{ids, ItemStack};
//! use hexcast_core::media::{MediaAmount, MediaRegistry};
//!
//! let registry = MediaRegistry::with_defaults();
//! let mut battery = ItemStack::new(ids::BATTERY, 1).with_max_media(10);
//! let mut holder = registry.find_holder(&mut battery).unwrap();
//!
//! assert_eq!(holder.insert_media(MediaAmount::Unlimited, true), 10);
//! assert_eq!(holder.insert_media(MediaAmount::Units(4), false), 4);
//! drop(holder);
//! assert_eq!(battery.media, 4);
//! ```

use crate::item::{ids, ItemId, ItemStack};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Canonical media denominations.
pub struct MediaConstants;

impl MediaConstants {
    pub const DUST_UNIT: u64 = 10_000;
    pub const SHARD_UNIT: u64 = 5 * Self::DUST_UNIT;
    pub const CRYSTAL_UNIT: u64 = 10 * Self::DUST_UNIT;
}

/// How much media an insert or withdraw asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAmount {
    Units(u64),
    /// As much as the holder can take or give.
    Unlimited,
}

impl MediaAmount {
    /// The amount actually moved when `available` is the most that can move.
    pub fn clamp(self, available: u64) -> u64 {
        match self {
            MediaAmount::Units(n) => n.min(available),
            MediaAmount::Unlimited => available,
        }
    }
}

/// Capability over something that stores spendable media.
///
/// `insert_media` and `withdraw_media` return the amount accepted or taken.
/// The rejected part of a request is `requested - accepted`.
pub trait MediaHolder {
    fn media(&self) -> u64;

    fn max_media(&self) -> u64;

    /// Whether this holder may be refilled by spells.
    fn can_recharge(&self) -> bool;

    /// Whether media may be drawn out of this holder.
    fn can_provide(&self) -> bool;

    /// Whether this holder's media may be bottled into a fresh battery.
    fn can_construct_battery(&self) -> bool {
        false
    }

    fn insert_media(&mut self, amount: MediaAmount, simulate: bool) -> u64;

    fn withdraw_media(&mut self, amount: MediaAmount, simulate: bool) -> u64;

    /// Probe how much more media this holder could take right now.
    fn free_capacity(&mut self) -> u64 {
        self.insert_media(MediaAmount::Unlimited, true)
    }
}

/// Produces a [`MediaHolder`] view over an item stack of one item type.
pub trait MediaCapability: fmt::Debug + Send + Sync {
    fn holder<'a>(&self, stack: &'a mut ItemStack) -> Box<dyn MediaHolder + 'a>;
}

// ---------------------------------------------------------------------------
// Batteries
// ---------------------------------------------------------------------------

/// Media stored on the stack, up to a capacity.
#[derive(Debug, Clone, Copy)]
pub struct Battery {
    pub max_media: u64,
    pub rechargeable: bool,
}

impl MediaCapability for Battery {
    fn holder<'a>(&self, stack: &'a mut ItemStack) -> Box<dyn MediaHolder + 'a> {
        let max_media = stack.max_media.unwrap_or(self.max_media);
        Box::new(BatteryHolder {
            stack,
            max_media,
            rechargeable: self.rechargeable,
        })
    }
}

struct BatteryHolder<'a> {
    stack: &'a mut ItemStack,
    max_media: u64,
    rechargeable: bool,
}

impl MediaHolder for BatteryHolder<'_> {
    fn media(&self) -> u64 {
        self.stack.media
    }

    fn max_media(&self) -> u64 {
        self.max_media
    }

    fn can_recharge(&self) -> bool {
        self.rechargeable
    }

    fn can_provide(&self) -> bool {
        true
    }

    fn insert_media(&mut self, amount: MediaAmount, simulate: bool) -> u64 {
        let accepted = amount.clamp(self.max_media.saturating_sub(self.stack.media));
        if !simulate {
            self.stack.media += accepted;
        }
        accepted
    }

    fn withdraw_media(&mut self, amount: MediaAmount, simulate: bool) -> u64 {
        let taken = amount.clamp(self.stack.media);
        if !simulate {
            self.stack.media -= taken;
        }
        taken
    }
}

// ---------------------------------------------------------------------------
// Consumables
// ---------------------------------------------------------------------------

/// Each item in the stack is worth `per_item` media and is consumed whole.
#[derive(Debug, Clone, Copy)]
pub struct Dust {
    pub per_item: u64,
}

impl MediaCapability for Dust {
    fn holder<'a>(&self, stack: &'a mut ItemStack) -> Box<dyn MediaHolder + 'a> {
        Box::new(DustHolder {
            stack,
            per_item: self.per_item,
        })
    }
}

struct DustHolder<'a> {
    stack: &'a mut ItemStack,
    per_item: u64,
}

impl MediaHolder for DustHolder<'_> {
    fn media(&self) -> u64 {
        u64::from(self.stack.count) * self.per_item
    }

    fn max_media(&self) -> u64 {
        self.media()
    }

    fn can_recharge(&self) -> bool {
        false
    }

    fn can_provide(&self) -> bool {
        true
    }

    fn can_construct_battery(&self) -> bool {
        true
    }

    fn insert_media(&mut self, _amount: MediaAmount, _simulate: bool) -> u64 {
        0
    }

    fn withdraw_media(&mut self, amount: MediaAmount, simulate: bool) -> u64 {
        if self.per_item == 0 {
            return 0;
        }
        let taken = amount.clamp(self.media());
        if !simulate && taken > 0 {
            // Partially used items are lost.
            let used = taken.div_ceil(self.per_item);
            self.stack.shrink(u32::try_from(used).unwrap_or(u32::MAX));
        }
        taken
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Item id → media capability lookup.
#[derive(Debug, Default, Clone)]
pub struct MediaRegistry {
    capabilities: HashMap<ItemId, Arc<dyn MediaCapability>>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock amethyst consumables and the battery.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(ids::AMETHYST_DUST, Dust { per_item: MediaConstants::DUST_UNIT })
            .register(ids::AMETHYST_SHARD, Dust { per_item: MediaConstants::SHARD_UNIT })
            .register(ids::CHARGED_AMETHYST, Dust { per_item: MediaConstants::CRYSTAL_UNIT })
            .register(
                ids::BATTERY,
                Battery {
                    max_media: 64 * MediaConstants::CRYSTAL_UNIT,
                    rechargeable: true,
                },
            );
        registry
    }

    pub fn register(
        &mut self,
        item: impl Into<ItemId>,
        capability: impl MediaCapability + 'static,
    ) -> &mut Self {
        self.capabilities.insert(item.into(), Arc::new(capability));
        self
    }

    pub fn capability(&self, item: &ItemId) -> Option<&Arc<dyn MediaCapability>> {
        self.capabilities.get(item)
    }

    /// Look up the media holder for `stack`, if its item has the capability.
    pub fn find_holder<'a>(&self, stack: &'a mut ItemStack) -> Option<Box<dyn MediaHolder + 'a>> {
        if stack.is_empty() {
            return None;
        }
        let capability = self.capabilities.get(&stack.item)?;
        Some(capability.holder(stack))
    }

    /// True if `stack` can provide a nonzero amount of media.
    pub fn is_media_item(&self, stack: &ItemStack) -> bool {
        let mut probe = stack.clone();
        let Some(mut holder) = self.find_holder(&mut probe) else {
            return false;
        };
        holder.can_provide() && holder.withdraw_media(MediaAmount::Unlimited, true) > 0
    }

    /// Draw up to `amount` media out of `stack`. Returns the amount drawn.
    pub fn extract_media(&self, stack: &mut ItemStack, amount: MediaAmount, simulate: bool) -> u64 {
        match self.find_holder(stack) {
            Some(mut holder) if holder.can_provide() => holder.withdraw_media(amount, simulate),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery(max: u64, media: u64) -> ItemStack {
        ItemStack::new(ids::BATTERY, 1)
            .with_max_media(max)
            .with_media(media)
    }

    #[test]
    fn probe_insert_does_not_mutate() {
        let registry = MediaRegistry::with_defaults();
        let mut stack = battery(10, 3);
        for amount in [MediaAmount::Unlimited, MediaAmount::Units(2), MediaAmount::Units(50)] {
            let mut holder = registry.find_holder(&mut stack).unwrap();
            holder.insert_media(amount, true);
            assert_eq!(holder.media(), 3);
        }
        assert_eq!(stack, battery(10, 3));
    }

    #[test]
    fn insert_clamps_to_capacity() {
        let registry = MediaRegistry::with_defaults();
        let mut stack = battery(10, 3);
        let mut holder = registry.find_holder(&mut stack).unwrap();
        assert_eq!(holder.free_capacity(), 7);
        assert_eq!(holder.insert_media(MediaAmount::Units(100), false), 7);
        assert_eq!(holder.free_capacity(), 0);
        drop(holder);
        assert_eq!(stack.media, 10);
    }

    #[test]
    fn dust_cannot_be_recharged() {
        let registry = MediaRegistry::with_defaults();
        let mut stack = ItemStack::new(ids::AMETHYST_DUST, 4);
        let mut holder = registry.find_holder(&mut stack).unwrap();
        assert!(!holder.can_recharge());
        assert!(holder.can_construct_battery());
        assert_eq!(holder.insert_media(MediaAmount::Unlimited, false), 0);
        assert_eq!(holder.media(), 4 * MediaConstants::DUST_UNIT);
    }

    #[test]
    fn dust_withdraw_consumes_whole_items() {
        let registry = MediaRegistry::with_defaults();
        let mut stack = ItemStack::new(ids::AMETHYST_DUST, 3);
        let taken = registry.extract_media(
            &mut stack,
            MediaAmount::Units(MediaConstants::DUST_UNIT + 1),
            false,
        );
        assert_eq!(taken, MediaConstants::DUST_UNIT + 1);
        assert_eq!(stack.count, 1);
    }

    #[test]
    fn dust_withdraw_simulated_keeps_items() {
        let registry = MediaRegistry::with_defaults();
        let mut stack = ItemStack::new(ids::AMETHYST_DUST, 3);
        let taken = registry.extract_media(&mut stack, MediaAmount::Unlimited, true);
        assert_eq!(taken, 3 * MediaConstants::DUST_UNIT);
        assert_eq!(stack.count, 3);
    }

    #[test]
    fn media_item_detection() {
        let registry = MediaRegistry::with_defaults();
        assert!(registry.is_media_item(&ItemStack::new(ids::AMETHYST_SHARD, 1)));
        assert!(registry.is_media_item(&battery(10, 1)));
        assert!(!registry.is_media_item(&battery(10, 0)));
        assert!(!registry.is_media_item(&ItemStack::new(ids::GLASS_BOTTLE, 1)));
        assert!(!registry.is_media_item(&ItemStack::empty()));
    }

    #[test]
    fn media_item_check_leaves_the_stack_alone() {
        let registry = MediaRegistry::with_defaults();
        let dust = ItemStack::new(ids::AMETHYST_DUST, 2);
        let charged = battery(10, 4);
        assert!(registry.is_media_item(&dust));
        assert!(registry.is_media_item(&charged));
        assert_eq!(dust.count, 2);
        assert_eq!(charged, battery(10, 4));
    }

    #[test]
    fn custom_capabilities_can_be_registered() {
        let mut registry = MediaRegistry::new();
        registry.register("mymod:gem", Dust { per_item: 7 });
        let mut gem = ItemStack::new("mymod:gem", 1);
        assert_eq!(registry.extract_media(&mut gem, MediaAmount::Units(10), false), 7);
        assert!(gem.is_empty());
    }

    #[test]
    fn zero_value_dust_gives_nothing() {
        let mut registry = MediaRegistry::new();
        registry.register("mymod:pebble", Dust { per_item: 0 });
        let mut pebble = ItemStack::new("mymod:pebble", 5);
        assert_eq!(registry.extract_media(&mut pebble, MediaAmount::Unlimited, false), 0);
        assert_eq!(pebble.count, 5);
    }
}

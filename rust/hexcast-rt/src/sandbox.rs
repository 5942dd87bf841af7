//! In-memory casting environment.
//!
//! [`SandboxEnv`] is a small, self-contained world: one caster with two hands
//! and a pool of media, plus a set of entities keyed by id. It backs the tests
//! and the `hexcast` CLI.

use crate::env::{CastingEnv, EntityState};
use hexcast_core::entity::{EntityKind, EntityRef, Vec3};
use hexcast_core::item::ItemStack;
use hexcast_core::media::MediaRegistry;
use hexcast_core::mishap::Hand;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SandboxEntity {
    entity: EntityRef,
    position: Vec3,
    alive: bool,
    item: Option<ItemStack>,
}

#[derive(Debug, Clone)]
pub struct SandboxEnv {
    caster_position: Vec3,
    ambit_radius: f64,
    casting_hand: Hand,
    main_hand: ItemStack,
    off_hand: ItemStack,
    caster_media: u64,
    entities: BTreeMap<Uuid, SandboxEntity>,
    registry: Arc<MediaRegistry>,
}

impl SandboxEnv {
    /// Caster at the origin with empty hands, no media, default ambit and the
    /// stock media registry.
    pub fn new() -> Self {
        Self {
            caster_position: Vec3::ZERO,
            ambit_radius: 32.0,
            casting_hand: Hand::Main,
            main_hand: ItemStack::empty(),
            off_hand: ItemStack::empty(),
            caster_media: 0,
            entities: BTreeMap::new(),
            registry: Arc::new(MediaRegistry::with_defaults()),
        }
    }

    pub fn with_registry(mut self, registry: MediaRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_ambit(mut self, radius: f64) -> Self {
        self.ambit_radius = radius;
        self
    }

    pub fn with_caster_position(mut self, pos: Vec3) -> Self {
        self.caster_position = pos;
        self
    }

    pub fn with_casting_hand(mut self, hand: Hand) -> Self {
        self.casting_hand = hand;
        self
    }

    pub fn with_media(mut self, media: u64) -> Self {
        self.caster_media = media;
        self
    }

    pub fn hold(&mut self, hand: Hand, stack: ItemStack) {
        match hand {
            Hand::Main => self.main_hand = stack,
            Hand::Off => self.off_hand = stack,
        }
    }

    pub fn caster_media(&self) -> u64 {
        self.caster_media
    }

    pub fn spawn(&mut self, kind: EntityKind, name: &str, position: Vec3) -> EntityRef {
        self.insert(EntityRef::new(Uuid::new_v4(), kind, name), position, None)
    }

    /// Drop `stack` into the world as an item entity.
    pub fn spawn_item(&mut self, name: &str, position: Vec3, stack: ItemStack) -> EntityRef {
        self.insert(
            EntityRef::new(Uuid::new_v4(), EntityKind::Item, name),
            position,
            Some(stack),
        )
    }

    fn insert(&mut self, entity: EntityRef, position: Vec3, item: Option<ItemStack>) -> EntityRef {
        self.entities.insert(
            entity.id,
            SandboxEntity {
                entity: entity.clone(),
                position,
                alive: true,
                item,
            },
        );
        entity
    }

    /// Remove an entity from the world entirely.
    pub fn despawn(&mut self, id: Uuid) -> bool {
        self.entities.remove(&id).is_some()
    }

    pub fn move_entity(&mut self, id: Uuid, position: Vec3) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.position = position;
        }
    }

    pub fn is_alive(&self, id: Uuid) -> bool {
        self.entities.get(&id).is_some_and(|e| e.alive)
    }

    pub fn entity_item(&self, id: Uuid) -> Option<&ItemStack> {
        self.entities.get(&id)?.item.as_ref()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.values().filter(|e| e.alive).count()
    }
}

impl Default for SandboxEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl CastingEnv for SandboxEnv {
    fn caster_position(&self) -> Vec3 {
        self.caster_position
    }

    fn ambit_radius(&self) -> f64 {
        self.ambit_radius
    }

    fn casting_hand(&self) -> Hand {
        self.casting_hand
    }

    fn media_registry(&self) -> Arc<MediaRegistry> {
        Arc::clone(&self.registry)
    }

    fn held_item(&self, hand: Hand) -> ItemStack {
        match hand {
            Hand::Main => self.main_hand.clone(),
            Hand::Off => self.off_hand.clone(),
        }
    }

    fn held_item_mut(&mut self, hand: Hand) -> Option<&mut ItemStack> {
        let stack = match hand {
            Hand::Main => &mut self.main_hand,
            Hand::Off => &mut self.off_hand,
        };
        (!stack.is_empty()).then_some(stack)
    }

    fn set_held_item(&mut self, hand: Hand, stack: ItemStack) {
        self.hold(hand, stack);
    }

    fn entity(&self, id: Uuid) -> Option<EntityState> {
        self.entities.get(&id).map(|e| EntityState {
            entity: e.entity.clone(),
            position: e.position,
            alive: e.alive,
            item: e.item.clone(),
        })
    }

    fn entity_item_mut(&mut self, id: Uuid) -> Option<&mut ItemStack> {
        self.entities
            .get_mut(&id)
            .filter(|e| e.alive)?
            .item
            .as_mut()
    }

    fn kill_entity(&mut self, id: Uuid) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.alive = false;
        }
    }

    fn withdraw_media(&mut self, amount: u64, simulate: bool) -> u64 {
        let taken = amount.min(self.caster_media);
        if !simulate {
            self.caster_media -= taken;
        }
        taken
    }
}

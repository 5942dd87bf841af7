//! The casting environment: everything an operator may ask of the world.
//!
//! Evaluation only ever sees `&dyn CastingEnv`; the mutating hooks are reachable
//! solely from [`RenderedSpell::cast`](crate::action::RenderedSpell::cast) and the
//! dispatcher's commit phase, which receive `&mut dyn CastingEnv`.

use hexcast_core::entity::{EntityRef, Vec3};
use hexcast_core::item::ItemStack;
use hexcast_core::media::MediaRegistry;
use hexcast_core::mishap::{Hand, Mishap};
use std::sync::Arc;
use uuid::Uuid;

/// A point-in-time view of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub entity: EntityRef,
    pub position: Vec3,
    pub alive: bool,
    /// The stack carried by an item entity.
    pub item: Option<ItemStack>,
}

/// The stack selected by [`CastingEnv::held_item_to_operate_on`] and the hand
/// it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItem {
    pub stack: ItemStack,
    pub hand: Hand,
}

pub trait CastingEnv {
    fn caster_position(&self) -> Vec3;

    fn ambit_radius(&self) -> f64;

    /// The hand holding the casting focus.
    fn casting_hand(&self) -> Hand {
        Hand::Main
    }

    /// Shared so a commit can keep it while mutating the environment.
    fn media_registry(&self) -> Arc<MediaRegistry>;

    /// A copy of the stack in `hand` (empty if nothing is held).
    fn held_item(&self, hand: Hand) -> ItemStack;

    fn held_item_mut(&mut self, hand: Hand) -> Option<&mut ItemStack>;

    fn set_held_item(&mut self, hand: Hand, stack: ItemStack);

    /// `None` once the entity no longer exists at all.
    fn entity(&self, id: Uuid) -> Option<EntityState>;

    fn entity_item_mut(&mut self, id: Uuid) -> Option<&mut ItemStack>;

    fn kill_entity(&mut self, id: Uuid);

    /// Draw media from the caster's own reserves. Returns the amount drawn
    /// (or that would be drawn, when simulating).
    fn withdraw_media(&mut self, amount: u64, simulate: bool) -> u64;

    fn is_vec_in_range(&self, pos: Vec3) -> bool {
        self.caster_position().distance_to(pos) <= self.ambit_radius()
    }

    fn is_entity_in_range(&self, entity: &EntityRef) -> bool {
        self.entity(entity.id)
            .is_some_and(|state| state.alive && self.is_vec_in_range(state.position))
    }

    fn assert_vec_in_range(&self, pos: Vec3) -> Result<(), Mishap> {
        if self.is_vec_in_range(pos) {
            Ok(())
        } else {
            Err(Mishap::LocationTooFarAway { location: pos })
        }
    }

    fn assert_entity_in_range(&self, entity: &EntityRef) -> Result<(), Mishap> {
        if self.is_entity_in_range(entity) {
            Ok(())
        } else {
            Err(Mishap::EntityTooFarAway {
                entity: entity.clone(),
            })
        }
    }

    /// Pick the held stack an operator should act on.
    ///
    /// The hand not holding the focus is tried first; if its stack does not
    /// satisfy `accept`, the casting hand's stack is returned unchecked so the
    /// operator can report it in a mishap.
    fn held_item_to_operate_on(&self, accept: &dyn Fn(&ItemStack) -> bool) -> HeldItem {
        let other = self.casting_hand().other();
        let stack = self.held_item(other);
        if accept(&stack) {
            return HeldItem { stack, hand: other };
        }
        let hand = self.casting_hand();
        HeldItem {
            stack: self.held_item(hand),
            hand,
        }
    }
}

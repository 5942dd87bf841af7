//! Recharge: pull media out of a dropped item into a rechargeable held item.
//!
//! Evaluation validates in a fixed order so the first mishap a caster sees is
//! always the most fundamental one:
//!
//! 1. the argument is an item entity (`InvalidIota`, tag `entity.item`);
//! 2. a held item can take media (`BadOffhandItem`, tag `rechargeable`);
//! 3. the target is within ambit (`EntityTooFarAway`);
//! 4. the target carries media (`BadItem`, tag `media`);
//! 5. the held item has room. If it has none the spell quietly does nothing.
//!
//! All capacity checks are probes. Media only moves in [`RechargeSpell::cast`].

use hexcast_rt::action::{RenderedSpell, SpellAction, SpellCast};
use hexcast_rt::args::ArgsExt;
use hexcast_rt::env::CastingEnv;
use hexcast_rt::iota::Iota;
use hexcast_rt::item::{ItemId, ItemStack};
use hexcast_rt::media::{MediaAmount, MediaConstants, MediaRegistry};
use hexcast_rt::mishap::{Hand, Mishap};
use hexcast_rt::particles::ParticleSpray;
use uuid::Uuid;

pub struct OpRecharge;

/// True if `stack` is a rechargeable holder with free space.
fn can_take_media(registry: &MediaRegistry, stack: &ItemStack) -> bool {
    let mut probe = stack.clone();
    registry
        .find_holder(&mut probe)
        .is_some_and(|mut holder| holder.can_recharge() && holder.free_capacity() > 0)
}

impl SpellAction for OpRecharge {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], env: &dyn CastingEnv) -> Result<Option<SpellCast>, Mishap> {
        let entity = args.get_item_entity(0, self.argc())?;

        let registry = env.media_registry();
        let held = env.held_item_to_operate_on(&|stack| can_take_media(&registry, stack));

        let mut hand_stack = held.stack.clone();
        let Some(mut holder) = registry
            .find_holder(&mut hand_stack)
            .filter(|holder| holder.can_recharge())
        else {
            return Err(Mishap::bad_offhand_item(held.stack, held.hand, "rechargeable"));
        };

        env.assert_entity_in_range(entity)?;
        let state = env.entity(entity.id).ok_or_else(|| Mishap::EntityTooFarAway {
            entity: entity.clone(),
        })?;

        let target_stack = state.item.unwrap_or_default();
        if !registry.is_media_item(&target_stack) {
            return Err(Mishap::bad_item(entity, target_stack, "media"));
        }

        if holder.free_capacity() == 0 {
            return Ok(None);
        }

        Ok(Some(SpellCast::new(
            RechargeSpell {
                target: entity.id,
                hand: held.hand,
                holder_item: held.stack.item,
            },
            MediaConstants::SHARD_UNIT,
            vec![ParticleSpray::burst(state.position, 0.5)],
        )))
    }
}

/// The captured target entity and the hand holding the item to fill.
#[derive(Debug)]
pub struct RechargeSpell {
    target: Uuid,
    hand: Hand,
    holder_item: ItemId,
}

impl RenderedSpell for RechargeSpell {
    fn cast(self: Box<Self>, env: &mut dyn CastingEnv) {
        let registry = env.media_registry();

        let Some(mut entity_stack) = env.entity_item_mut(self.target).cloned() else {
            tracing::warn!(entity = %self.target, "recharge target is gone, nothing to do");
            return;
        };

        let moved = {
            let Some(hand_stack) = env
                .held_item_mut(self.hand)
                .filter(|stack| stack.item == self.holder_item)
            else {
                tracing::warn!(hand = %self.hand, "recharge holder left the hand, nothing to do");
                return;
            };
            let Some(mut holder) = registry.find_holder(hand_stack) else {
                return;
            };
            let space = holder.free_capacity();
            let drawn = registry.extract_media(&mut entity_stack, MediaAmount::Units(space), false);
            holder.insert_media(MediaAmount::Units(drawn), false)
        };

        let emptied = entity_stack.is_empty();
        if let Some(slot) = env.entity_item_mut(self.target) {
            *slot = entity_stack;
        }
        if emptied {
            env.kill_entity(self.target);
        }
        tracing::info!(entity = %self.target, media = moved, emptied, "recharged held item");
    }
}

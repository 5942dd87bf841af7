//! Craft a battery: bottle the media of a dropped item into a held glass
//! bottle, turning it into a battery that is exactly full.

use hexcast_rt::action::{RenderedSpell, SpellAction, SpellCast};
use hexcast_rt::args::ArgsExt;
use hexcast_rt::env::CastingEnv;
use hexcast_rt::iota::Iota;
use hexcast_rt::item::{ids, ItemStack};
use hexcast_rt::media::{MediaAmount, MediaConstants, MediaRegistry};
use hexcast_rt::mishap::{Hand, Mishap};
use hexcast_rt::particles::ParticleSpray;
use uuid::Uuid;

pub struct OpCreateBattery;

/// Withdraw everything `stack` holds, if its media may go into a battery.
fn drain_for_battery(registry: &MediaRegistry, stack: &mut ItemStack, simulate: bool) -> u64 {
    match registry.find_holder(stack) {
        Some(mut holder) if holder.can_provide() && holder.can_construct_battery() => {
            holder.withdraw_media(MediaAmount::Unlimited, simulate)
        }
        _ => 0,
    }
}

impl SpellAction for OpCreateBattery {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], env: &dyn CastingEnv) -> Result<Option<SpellCast>, Mishap> {
        let entity = args.get_item_entity(0, self.argc())?;

        let held = env.held_item_to_operate_on(&|stack| stack.is(ids::GLASS_BOTTLE));
        if !held.stack.is(ids::GLASS_BOTTLE) {
            return Err(Mishap::bad_offhand_item(held.stack, held.hand, "bottle"));
        }
        if held.stack.count != 1 {
            return Err(Mishap::bad_offhand_item(held.stack, held.hand, "only_one"));
        }

        env.assert_entity_in_range(entity)?;
        let state = env.entity(entity.id).ok_or_else(|| Mishap::EntityTooFarAway {
            entity: entity.clone(),
        })?;

        let registry = env.media_registry();
        let mut target_stack = state.item.unwrap_or_default();
        if !registry.is_media_item(&target_stack)
            || drain_for_battery(&registry, &mut target_stack, true) == 0
        {
            return Err(Mishap::bad_item(entity, target_stack, "media_for_battery"));
        }

        Ok(Some(SpellCast::new(
            CreateBatterySpell {
                target: entity.id,
                hand: held.hand,
            },
            MediaConstants::CRYSTAL_UNIT,
            vec![ParticleSpray::burst(state.position, 0.5)],
        )))
    }
}

#[derive(Debug)]
pub struct CreateBatterySpell {
    target: Uuid,
    hand: Hand,
}

impl RenderedSpell for CreateBatterySpell {
    fn cast(self: Box<Self>, env: &mut dyn CastingEnv) {
        let held = env.held_item(self.hand);
        if !held.is(ids::GLASS_BOTTLE) {
            tracing::warn!(hand = %self.hand, "bottle left the hand, no battery made");
            return;
        }
        if held.count != 1 {
            tracing::warn!(
                hand = %self.hand,
                count = held.count,
                "hand holds more than one bottle, no battery made"
            );
            return;
        }
        let Some(mut entity_stack) = env.entity_item_mut(self.target).cloned() else {
            tracing::warn!(entity = %self.target, "battery source is gone, nothing to do");
            return;
        };

        let registry = env.media_registry();
        let media = drain_for_battery(&registry, &mut entity_stack, false);
        if media > 0 {
            let battery = ItemStack::new(ids::BATTERY, 1)
                .with_media(media)
                .with_max_media(media);
            env.set_held_item(self.hand, battery);
        }

        let emptied = entity_stack.is_empty();
        if let Some(slot) = env.entity_item_mut(self.target) {
            *slot = entity_stack;
        }
        if emptied {
            env.kill_entity(self.target);
        }
        tracing::info!(entity = %self.target, media, "bottled media into a battery");
    }
}

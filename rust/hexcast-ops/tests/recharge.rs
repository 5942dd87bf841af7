use hexcast_ops::spells::OpRecharge;
use hexcast_rt::action::{Action, SideEffect, Spell, SpellAction};
use hexcast_rt::config::CastingConfig;
use hexcast_rt::entity::{EntityKind, EntityRef, Vec3};
use hexcast_rt::env::CastingEnv;
use hexcast_rt::harness::{CastingHarness, Instruction};
use hexcast_rt::iota::Iota;
use hexcast_rt::item::{ids, ItemStack};
use hexcast_rt::media::{Battery, Dust, MediaAmount, MediaConstants, MediaRegistry};
use hexcast_rt::mishap::{Hand, MishapKind};
use hexcast_rt::particles::ParticleSpray;
use hexcast_rt::sandbox::SandboxEnv;

const GEM: &str = "test:gem";

/// A world where gems are worth 7 media each and batteries hold 10.
fn gem_world() -> SandboxEnv {
    let mut registry = MediaRegistry::new();
    registry.register(GEM, Dust { per_item: 7 }).register(
        ids::BATTERY,
        Battery {
            max_media: 10,
            rechargeable: true,
        },
    );
    SandboxEnv::new()
        .with_registry(registry)
        .with_media(10 * MediaConstants::SHARD_UNIT)
}

fn empty_battery() -> ItemStack {
    ItemStack::new(ids::BATTERY, 1)
}

fn drop_gem(env: &mut SandboxEnv, pos: Vec3) -> EntityRef {
    env.spawn_item("Gem", pos, ItemStack::new(GEM, 1))
}

#[test]
fn recharges_from_a_dropped_gem_end_to_end() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery());
    let target_pos = Vec3::new(2.0, 0.0, 1.0);
    let gem = drop_gem(&mut env, target_pos);

    let cast = OpRecharge
        .execute(&[Iota::Entity(gem.clone())], &env)
        .unwrap()
        .expect("recharge should go ahead");
    assert_eq!(cast.cost, MediaConstants::SHARD_UNIT);
    assert_eq!(cast.particles, vec![ParticleSpray::burst(target_pos, 0.5)]);

    // Evaluation alone changes nothing.
    assert_eq!(env.held_item(Hand::Off).media, 0);
    assert_eq!(env.entity_item(gem.id).map(|s| s.count), Some(1));

    cast.spell.cast(&mut env);

    assert_eq!(env.held_item(Hand::Off).media, 7);
    assert!(!env.is_alive(gem.id));
    assert_eq!(env.entity_count(), 0);
}

#[test]
fn harness_pays_once_and_commits() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery());
    let gem = drop_gem(&mut env, Vec3::ZERO);
    let before = env.caster_media();

    let target = Iota::Entity(gem.clone());
    let recharge = Spell(OpRecharge);
    let mut harness = CastingHarness::new(CastingConfig::default());
    let report = harness
        .cast_batch(
            &[Instruction::Literal(&target), Instruction::Operator(&recharge)],
            &mut env,
        )
        .unwrap();

    assert_eq!(report.media_spent, MediaConstants::SHARD_UNIT);
    assert_eq!(report.spells_cast, 1);
    assert!(report.stack.is_empty());
    assert_eq!(env.caster_media(), before - MediaConstants::SHARD_UNIT);
    assert_eq!(env.held_item(Hand::Off).media, 7);
}

#[test]
fn cost_does_not_depend_on_target_media() {
    let mut env = SandboxEnv::new();
    env.hold(Hand::Off, empty_battery());
    let small = env.spawn_item("Dust", Vec3::ZERO, ItemStack::new(ids::AMETHYST_DUST, 1));
    let big = env.spawn_item(
        "Crystals",
        Vec3::ZERO,
        ItemStack::new(ids::CHARGED_AMETHYST, 64),
    );

    let costs: Vec<u64> = [small, big]
        .into_iter()
        .map(|e| {
            OpRecharge
                .execute(&[Iota::Entity(e)], &env)
                .unwrap()
                .expect("spell")
                .cost
        })
        .collect();
    assert_eq!(costs, vec![MediaConstants::SHARD_UNIT; 2]);
}

#[test]
fn non_media_target_leaves_holder_untouched() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery().with_media(3));
    let bottle = env.spawn_item("Bottle", Vec3::ZERO, ItemStack::new(ids::GLASS_BOTTLE, 1));

    let err = OpRecharge
        .execute(&[Iota::Entity(bottle)], &env)
        .unwrap_err();
    assert_eq!(err.kind(), MishapKind::BadItem);
    assert_eq!(err.translation_key(), "hexcast.mishap.bad_item.media");
    assert_eq!(env.held_item(Hand::Off).media, 3);
}

#[test]
fn no_rechargeable_item_is_bad_offhand() {
    let mut env = gem_world();
    let gem = drop_gem(&mut env, Vec3::ZERO);

    // Empty hands.
    let err = OpRecharge
        .execute(&[Iota::Entity(gem.clone())], &env)
        .unwrap_err();
    assert_eq!(err.kind(), MishapKind::BadOffhandItem);
    assert_eq!(err.reason_tag(), Some("rechargeable"));

    // Consumables cannot be refilled.
    env.hold(Hand::Main, ItemStack::new(GEM, 3));
    let err = OpRecharge
        .execute(&[Iota::Entity(gem.clone())], &env)
        .unwrap_err();
    assert_eq!(err.kind(), MishapKind::BadOffhandItem);
    assert_eq!(err.hand(), Some(Hand::Main));

    // A full battery in the off hand is passed over, and the casting hand
    // holds nothing rechargeable.
    env.hold(Hand::Off, empty_battery().with_media(10));
    let err = OpRecharge
        .execute(&[Iota::Entity(gem)], &env)
        .unwrap_err();
    assert_eq!(err.kind(), MishapKind::BadOffhandItem);
}

#[test]
fn full_holder_aborts_without_cost() {
    let mut env = gem_world();
    env.hold(Hand::Main, empty_battery().with_media(10));
    let gem = drop_gem(&mut env, Vec3::ZERO);

    let outcome = OpRecharge.execute(&[Iota::Entity(gem.clone())], &env).unwrap();
    assert!(outcome.is_none());

    let mut stack = vec![Iota::Entity(gem)];
    let effects = Spell(OpRecharge).operate(&mut stack, &env).unwrap();
    assert!(effects.is_empty());
    assert!(stack.is_empty());
}

#[test]
fn out_of_range_target_is_rejected() {
    let mut env = gem_world().with_ambit(4.0);
    env.hold(Hand::Off, empty_battery());
    let gem = drop_gem(&mut env, Vec3::new(0.0, 10.0, 0.0));
    let err = OpRecharge.execute(&[Iota::Entity(gem)], &env).unwrap_err();
    assert_eq!(err.kind(), MishapKind::EntityTooFarAway);
}

#[test]
fn despawned_target_makes_commit_a_no_op() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery());
    let gem = drop_gem(&mut env, Vec3::ZERO);

    let cast = OpRecharge
        .execute(&[Iota::Entity(gem.clone())], &env)
        .unwrap()
        .expect("spell");
    assert!(env.despawn(gem.id));

    cast.spell.cast(&mut env);
    assert_eq!(env.held_item(Hand::Off), empty_battery());
}

#[test]
fn killed_target_makes_commit_a_no_op() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery());
    let gem = drop_gem(&mut env, Vec3::ZERO);

    let mut stack = vec![Iota::Entity(gem.clone())];
    let effects = Spell(OpRecharge).operate(&mut stack, &env).unwrap();
    env.kill_entity(gem.id);

    for effect in effects {
        if let SideEffect::AttemptSpell { spell, .. } = effect {
            spell.cast(&mut env);
        }
    }
    assert_eq!(env.held_item(Hand::Off).media, 0);
    assert_eq!(env.entity_item(gem.id).map(|s| s.count), Some(1));
}

#[test]
fn partial_transfer_leaves_the_rest_on_the_ground() {
    let mut env = gem_world();
    env.hold(Hand::Off, empty_battery().with_media(6));
    let gem = env.spawn_item("Gems", Vec3::ZERO, ItemStack::new(GEM, 2));

    let cast = OpRecharge
        .execute(&[Iota::Entity(gem.clone())], &env)
        .unwrap()
        .expect("spell");
    cast.spell.cast(&mut env);

    // 4 units of space: one gem is broken open, the other survives.
    assert_eq!(env.held_item(Hand::Off).media, 10);
    assert!(env.is_alive(gem.id));
    assert_eq!(env.entity_item(gem.id).map(|s| s.count), Some(1));
}

#[test]
fn probing_never_mutates_the_holder() {
    let registry = MediaRegistry::with_defaults();
    let mut stack = ItemStack::new(ids::BATTERY, 1)
        .with_max_media(100)
        .with_media(40);
    for amount in [0, 1, 60, 61, u64::MAX] {
        let mut holder = registry.find_holder(&mut stack).unwrap();
        holder.insert_media(MediaAmount::Units(amount), true);
        holder.insert_media(MediaAmount::Unlimited, true);
        assert_eq!(holder.media(), 40);
    }
}

#[test]
fn wrong_entity_kind_reports_top_of_stack() {
    let mut env = gem_world();
    let cow = env.spawn(EntityKind::Living, "Cow", Vec3::ZERO);
    let err = OpRecharge.execute(&[Iota::Entity(cow)], &env).unwrap_err();
    assert_eq!(err.kind(), MishapKind::InvalidIota);
    assert_eq!(err.reason_tag(), Some("entity.item"));
}

//! Read-only queries about the world.

use hexcast_rt::action::ConstMediaAction;
use hexcast_rt::args::ArgsExt;
use hexcast_rt::env::CastingEnv;
use hexcast_rt::iota::Iota;
use hexcast_rt::mishap::Mishap;

/// `entity → position`
pub struct OpEntityPos;

impl ConstMediaAction for OpEntityPos {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let entity = args.get_entity(0, self.argc())?;
        env.assert_entity_in_range(entity)?;
        let state = env.entity(entity.id).ok_or_else(|| Mishap::EntityTooFarAway {
            entity: entity.clone(),
        })?;
        Ok(vec![Iota::Vec3(state.position)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_rt::entity::{EntityKind, Vec3};
    use hexcast_rt::mishap::MishapKind;
    use hexcast_rt::sandbox::SandboxEnv;

    #[test]
    fn reports_position_of_entity_in_range() {
        let mut env = SandboxEnv::new();
        let pig = env.spawn(EntityKind::Living, "Pig", Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            OpEntityPos.execute(&[Iota::Entity(pig)], &env).unwrap(),
            vec![Iota::Vec3(Vec3::new(1.0, 2.0, 3.0))]
        );
    }

    #[test]
    fn far_entity_is_a_mishap() {
        let mut env = SandboxEnv::new().with_ambit(4.0);
        let pig = env.spawn(EntityKind::Living, "Pig", Vec3::new(10.0, 0.0, 0.0));
        let err = OpEntityPos.execute(&[Iota::Entity(pig)], &env).unwrap_err();
        assert_eq!(err.kind(), MishapKind::EntityTooFarAway);
    }
}

//! The operator contract.
//!
//! Every operator is a stateless singleton implementing [`Action`]. Most are
//! written against one of the two narrower traits and wrapped in an adapter:
//!
//! - [`ConstMediaAction`] (via [`Const`]) pops `argc` iotas, pushes results and
//!   charges a fixed cost. Nothing is deferred.
//! - [`SpellAction`] (via [`Spell`]) pops `argc` iotas and returns one of three
//!   outcomes: `Ok(None)` (nothing to do, costs nothing), `Err(mishap)`, or
//!   `Ok(Some(SpellCast))` carrying a deferred [`RenderedSpell`], its cost and
//!   particle hints.
//!
//! Evaluation receives `&dyn CastingEnv` and so cannot mutate the world. The
//! mutation happens later, when the dispatcher hands the spell a
//! `&mut dyn CastingEnv`.

use crate::env::CastingEnv;
use hexcast_core::iota::Iota;
use hexcast_core::mishap::Mishap;
use hexcast_core::particles::ParticleSpray;
use std::fmt;

/// A deferred effect produced by evaluation.
///
/// `cast` consumes the spell, so it runs at most once. It must work only from
/// what it captured and must quietly do nothing if a captured target has gone
/// away: by commit time the cast has already been accepted and paid for.
pub trait RenderedSpell: fmt::Debug + Send {
    fn cast(self: Box<Self>, env: &mut dyn CastingEnv);
}

/// Successful evaluation of a [`SpellAction`].
#[derive(Debug)]
pub struct SpellCast {
    pub spell: Box<dyn RenderedSpell>,
    pub cost: u64,
    pub particles: Vec<ParticleSpray>,
}

impl SpellCast {
    pub fn new(spell: impl RenderedSpell + 'static, cost: u64, particles: Vec<ParticleSpray>) -> Self {
        Self {
            spell: Box::new(spell),
            cost,
            particles,
        }
    }
}

/// What an operator asks the dispatcher to do once evaluation is accepted.
#[derive(Debug)]
pub enum SideEffect {
    ConsumeMedia(u64),
    AttemptSpell {
        spell: Box<dyn RenderedSpell>,
        has_cast_sound: bool,
    },
    Particles(ParticleSpray),
}

/// A stack operator.
pub trait Action: Send + Sync {
    /// Operate on the stack in place, returning the side effects to apply on
    /// commit. On error the stack is left in an unspecified state; the
    /// dispatcher restores its own snapshot.
    fn operate(
        &self,
        stack: &mut Vec<Iota>,
        env: &dyn CastingEnv,
    ) -> Result<Vec<SideEffect>, Mishap>;
}

pub trait SpellAction: Send + Sync {
    fn argc(&self) -> usize;

    fn has_cast_sound(&self) -> bool {
        true
    }

    fn execute(&self, args: &[Iota], env: &dyn CastingEnv) -> Result<Option<SpellCast>, Mishap>;
}

pub trait ConstMediaAction: Send + Sync {
    fn argc(&self) -> usize;

    fn media_cost(&self) -> u64 {
        0
    }

    fn execute(&self, args: &[Iota], env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap>;
}

/// Remove the top `argc` iotas, bottom-most first.
pub fn pop_args(stack: &mut Vec<Iota>, argc: usize) -> Result<Vec<Iota>, Mishap> {
    if stack.len() < argc {
        return Err(Mishap::NotEnoughArgs {
            expected: argc,
            got: stack.len(),
        });
    }
    Ok(stack.split_off(stack.len() - argc))
}

/// Adapter running a [`SpellAction`] as an [`Action`].
pub struct Spell<T>(pub T);

impl<T: SpellAction> Action for Spell<T> {
    fn operate(
        &self,
        stack: &mut Vec<Iota>,
        env: &dyn CastingEnv,
    ) -> Result<Vec<SideEffect>, Mishap> {
        let args = pop_args(stack, self.0.argc())?;
        let Some(cast) = self.0.execute(&args, env)? else {
            return Ok(Vec::new());
        };

        let mut effects = Vec::with_capacity(cast.particles.len() + 2);
        if cast.cost > 0 {
            effects.push(SideEffect::ConsumeMedia(cast.cost));
        }
        effects.push(SideEffect::AttemptSpell {
            spell: cast.spell,
            has_cast_sound: self.0.has_cast_sound(),
        });
        effects.extend(cast.particles.into_iter().map(SideEffect::Particles));
        Ok(effects)
    }
}

/// Adapter running a [`ConstMediaAction`] as an [`Action`].
pub struct Const<T>(pub T);

impl<T: ConstMediaAction> Action for Const<T> {
    fn operate(
        &self,
        stack: &mut Vec<Iota>,
        env: &dyn CastingEnv,
    ) -> Result<Vec<SideEffect>, Mishap> {
        let args = pop_args(stack, self.0.argc())?;
        let results = self.0.execute(&args, env)?;
        stack.extend(results);

        let cost = self.0.media_cost();
        Ok(if cost > 0 {
            vec![SideEffect::ConsumeMedia(cost)]
        } else {
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SandboxEnv;

    struct Pair;

    impl ConstMediaAction for Pair {
        fn argc(&self) -> usize {
            2
        }

        fn media_cost(&self) -> u64 {
            3
        }

        fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
            Ok(vec![Iota::List(args.to_vec())])
        }
    }

    #[derive(Debug)]
    struct Noop;

    impl RenderedSpell for Noop {
        fn cast(self: Box<Self>, _env: &mut dyn CastingEnv) {}
    }

    struct MaybeSpell;

    impl SpellAction for MaybeSpell {
        fn argc(&self) -> usize {
            1
        }

        fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Option<SpellCast>, Mishap> {
            if args[0].is_truthy() {
                Ok(Some(SpellCast::new(Noop, 7, vec![])))
            } else {
                Ok(None)
            }
        }
    }

    #[test]
    fn pop_args_keeps_stack_order() {
        let mut stack = vec![Iota::Double(1.0), Iota::Double(2.0), Iota::Double(3.0)];
        let args = pop_args(&mut stack, 2).unwrap();
        assert_eq!(args, vec![Iota::Double(2.0), Iota::Double(3.0)]);
        assert_eq!(stack, vec![Iota::Double(1.0)]);
    }

    #[test]
    fn pop_args_reports_short_stack() {
        let mut stack = vec![Iota::Null];
        let err = pop_args(&mut stack, 3).unwrap_err();
        assert_eq!(
            err,
            Mishap::NotEnoughArgs {
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn const_action_pushes_results_and_charges() {
        let env = SandboxEnv::new();
        let mut stack = vec![Iota::Bool(true), Iota::Double(1.0)];
        let effects = Const(Pair).operate(&mut stack, &env).unwrap();
        assert_eq!(
            stack,
            vec![Iota::List(vec![Iota::Bool(true), Iota::Double(1.0)])]
        );
        assert!(matches!(effects.as_slice(), [SideEffect::ConsumeMedia(3)]));
    }

    #[test]
    fn spell_action_abort_consumes_args_without_effects() {
        let env = SandboxEnv::new();
        let mut stack = vec![Iota::Null];
        let effects = Spell(MaybeSpell).operate(&mut stack, &env).unwrap();
        assert!(effects.is_empty());
        assert!(stack.is_empty());
    }

    #[test]
    fn spell_action_success_orders_effects() {
        let env = SandboxEnv::new();
        let mut stack = vec![Iota::Bool(true)];
        let effects = Spell(MaybeSpell).operate(&mut stack, &env).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [
                SideEffect::ConsumeMedia(7),
                SideEffect::AttemptSpell {
                    has_cast_sound: true,
                    ..
                }
            ]
        ));
    }
}

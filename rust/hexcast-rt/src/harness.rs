//! Reference dispatcher: sequences operators, accounts for media, commits.
//!
//! A cast runs in two phases. During **evaluation** every instruction runs
//! against `&dyn CastingEnv`; side effects are only queued. If any operator
//! mishaps, or the caster cannot pay for the queued effects, the stack is
//! restored and nothing in the world has changed. Otherwise the **commit**
//! phase pays the media and casts every queued spell in order.
//!
//! # Example
//!
//! ```rust
//! use hexcast_rt::action::{Const, ConstMediaAction};
//! use hexcast_rt::config::CastingConfig;
//! use hexcast_rt::env::CastingEnv;
//! use hexcast_rt::harness::{CastingHarness, Instruction};
//! use hexcast_rt::iota::Iota;
//! use hexcast_rt::mishap::Mishap;
//! use hexcast_rt::sandbox::SandboxEnv;
//!
//! struct Two;
//! impl ConstMediaAction for Two {
//!     fn argc(&self) -> usize { 0 }
//!     fn execute(&self, _: &[Iota], _: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
//!         Ok(vec![Iota::Double(2.0)])
//!     }
//! }
//!
//! let mut env = SandboxEnv::new();
//! let mut harness = CastingHarness::new(CastingConfig::default());
//! let two = Const(Two);
//! let report = harness
//!     .cast_batch(&[Instruction::Operator(&two)], &mut env)
//!     .unwrap();
//! assert_eq!(report.stack, vec![Iota::Double(2.0)]);
//! ```

use crate::action::{Action, RenderedSpell, SideEffect};
use crate::config::CastingConfig;
use crate::env::CastingEnv;
use hexcast_core::iota::Iota;
use hexcast_core::mishap::Mishap;
use hexcast_core::particles::ParticleSpray;
use serde::Serialize;
use thiserror::Error;

/// One step of a cast.
#[derive(Clone, Copy)]
pub enum Instruction<'a> {
    /// Push a literal iota.
    Literal(&'a Iota),
    Operator(&'a dyn Action),
}

/// Outcome of a committed cast.
#[derive(Debug, Clone, Serialize)]
pub struct CastReport {
    /// Total media cost of the cast.
    pub media_spent: u64,
    /// Media actually drawn from the caster; zero when payment is not required.
    pub media_drawn: u64,
    pub spells_cast: usize,
    pub particles: Vec<ParticleSpray>,
    pub stack: Vec<Iota>,
}

/// A cast that was rejected before anything was committed.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{}", describe(.index, .mishap))]
pub struct CastFailure {
    /// The instruction that mishapped; `None` for batch-level failures such
    /// as running out of media.
    pub index: Option<usize>,
    pub mishap: Mishap,
}

fn describe(index: &Option<usize>, mishap: &Mishap) -> String {
    match index {
        Some(i) => format!("instruction {i}: {mishap}"),
        None => mishap.to_string(),
    }
}

#[derive(Debug)]
struct PendingSpell {
    spell: Box<dyn RenderedSpell>,
    has_cast_sound: bool,
}

/// Effects queued by evaluation and awaiting commit.
#[derive(Debug, Default)]
struct Pending {
    media: u64,
    spells: Vec<PendingSpell>,
    particles: Vec<ParticleSpray>,
}

impl Pending {
    fn absorb(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::ConsumeMedia(amount) => {
                    self.media = self.media.saturating_add(amount);
                }
                SideEffect::AttemptSpell {
                    spell,
                    has_cast_sound,
                } => self.spells.push(PendingSpell {
                    spell,
                    has_cast_sound,
                }),
                SideEffect::Particles(spray) => self.particles.push(spray),
            }
        }
    }
}

pub struct CastingHarness {
    stack: Vec<Iota>,
    config: CastingConfig,
    op_count: usize,
}

impl CastingHarness {
    pub fn new(config: CastingConfig) -> Self {
        Self {
            stack: Vec::new(),
            config,
            op_count: 0,
        }
    }

    pub fn with_stack(mut self, stack: Vec<Iota>) -> Self {
        self.stack = stack;
        self
    }

    pub fn stack(&self) -> &[Iota] {
        &self.stack
    }

    pub fn config(&self) -> &CastingConfig {
        &self.config
    }

    pub fn push(&mut self, iota: Iota) -> Result<(), Mishap> {
        self.stack.push(iota);
        self.check_depth()
    }

    /// Evaluate a single operator against the stack, enforcing the op budget
    /// and stack depth. The returned side effects have not been applied.
    ///
    /// Every call counts against the same budget until [`reset_budget`] is
    /// called. [`cast_batch`] resets it on entry.
    ///
    /// [`reset_budget`]: CastingHarness::reset_budget
    /// [`cast_batch`]: CastingHarness::cast_batch
    pub fn evaluate(
        &mut self,
        action: &dyn Action,
        env: &dyn CastingEnv,
    ) -> Result<Vec<SideEffect>, Mishap> {
        self.op_count += 1;
        if self.op_count > self.config.max_op_count {
            return Err(Mishap::EvalTooDeep {
                limit: self.config.max_op_count,
            });
        }
        let effects = action.operate(&mut self.stack, env)?;
        self.check_depth()?;
        Ok(effects)
    }

    /// Start a fresh op budget for the next run of [`evaluate`](Self::evaluate) calls.
    pub fn reset_budget(&mut self) {
        self.op_count = 0;
    }

    fn check_depth(&self) -> Result<(), Mishap> {
        if self.stack.len() > self.config.max_stack_depth {
            return Err(Mishap::StackOverflow {
                limit: self.config.max_stack_depth,
            });
        }
        Ok(())
    }

    /// Evaluate every instruction, then pay for and commit the result.
    ///
    /// On failure the stack is exactly what it was before the call and the
    /// environment has not been touched.
    pub fn cast_batch(
        &mut self,
        program: &[Instruction<'_>],
        env: &mut dyn CastingEnv,
    ) -> Result<CastReport, CastFailure> {
        let snapshot = self.stack.clone();
        self.reset_budget();

        let pending = match self.evaluate_all(program, &*env) {
            Ok(pending) => pending,
            Err(failure) => {
                tracing::warn!(
                    index = ?failure.index,
                    kind = %failure.mishap.kind(),
                    "cast mishapped: {}",
                    failure.mishap
                );
                self.stack = snapshot;
                return Err(failure);
            }
        };

        let mut media_drawn = 0;
        if self.config.require_media && pending.media > 0 {
            let available = env.withdraw_media(pending.media, true);
            if available < pending.media {
                let mishap = Mishap::NotEnoughMedia {
                    required: pending.media,
                    available,
                };
                tracing::warn!(required = pending.media, available, "cast abandoned: {mishap}");
                self.stack = snapshot;
                return Err(CastFailure {
                    index: None,
                    mishap,
                });
            }
            media_drawn = env.withdraw_media(pending.media, false);
            if media_drawn != pending.media {
                tracing::warn!(
                    required = pending.media,
                    drawn = media_drawn,
                    "caster media changed between the check and the payment"
                );
            }
        }

        tracing::info!(
            media = pending.media,
            spells = pending.spells.len(),
            "committing cast"
        );
        let spells_cast = pending.spells.len();
        for pending_spell in pending.spells {
            tracing::debug!(
                spell = ?pending_spell.spell,
                sound = pending_spell.has_cast_sound,
                "casting"
            );
            pending_spell.spell.cast(env);
        }

        Ok(CastReport {
            media_spent: pending.media,
            media_drawn,
            spells_cast,
            particles: pending.particles,
            stack: self.stack.clone(),
        })
    }

    fn evaluate_all(
        &mut self,
        program: &[Instruction<'_>],
        env: &dyn CastingEnv,
    ) -> Result<Pending, CastFailure> {
        let mut pending = Pending::default();
        for (index, instruction) in program.iter().enumerate() {
            let result = match instruction {
                Instruction::Literal(iota) => self.push((*iota).clone()).map(|()| Vec::new()),
                Instruction::Operator(action) => self.evaluate(*action, env),
            };
            match result {
                Ok(effects) => {
                    tracing::debug!(index, effects = effects.len(), depth = self.stack.len(), "evaluated");
                    pending.absorb(effects);
                }
                Err(mishap) => {
                    return Err(CastFailure {
                        index: Some(index),
                        mishap,
                    })
                }
            }
        }
        Ok(pending)
    }
}

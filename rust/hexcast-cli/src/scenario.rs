//! Scenario files: a sandbox world plus a program to cast in it.
//!
//! ```toml
//! [caster]
//! media = 100000
//! off_hand = { item = "hexcast:battery", count = 1, max_media = 10 }
//!
//! [media."test:gem"]
//! kind = "dust"
//! per_item = 7
//!
//! [[entities]]
//! name = "gem"
//! kind = "item"
//! position = [1.0, 0.0, 0.0]
//! item = { item = "test:gem", count = 1 }
//!
//! [[program]]
//! entity = "gem"
//!
//! [[program]]
//! op = "recharge"
//! ```
//!
//! `program` steps are `push` (a literal iota), `entity` (a reference to a
//! named entity) or `op` (an operator by pattern name).

use hexcast_rt::action::Action;
use hexcast_rt::config::CastingConfig;
use hexcast_rt::entity::{EntityKind, EntityRef, Vec3};
use hexcast_rt::env::CastingEnv;
use hexcast_rt::harness::{CastFailure, CastReport, CastingHarness, Instruction};
use hexcast_rt::iota::Iota;
use hexcast_rt::item::{ItemId, ItemStack};
use hexcast_rt::media::{Battery, Dust, MediaRegistry};
use hexcast_rt::mishap::{Hand, Mishap};
use hexcast_rt::sandbox::SandboxEnv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("entity '{0}' is defined twice")]
    DuplicateEntity(String),
    #[error("program step {index} refers to unknown entity '{name}'")]
    UnknownEntity { index: usize, name: String },
    #[error("program step {index}: {mishap}")]
    Pattern {
        index: usize,
        #[source]
        mishap: Mishap,
    },
}

/// Media behaviour attached to an item id.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapabilitySpec {
    Dust {
        per_item: u64,
    },
    Battery {
        max_media: u64,
        #[serde(default = "default_true")]
        rechargeable: bool,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CasterSpec {
    pub position: [f64; 3],
    pub media: u64,
    pub casting_hand: Hand,
    /// Overrides `casting.ambit_radius` from the config.
    pub ambit: Option<f64>,
    pub main_hand: Option<ItemStack>,
    pub off_hand: Option<ItemStack>,
}

impl Default for CasterSpec {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            media: 0,
            casting_hand: Hand::Main,
            ambit: None,
            main_hand: None,
            off_hand: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySpec {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: EntityKind,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub item: Option<ItemStack>,
    #[serde(default = "default_true")]
    pub alive: bool,
}

fn default_kind() -> EntityKind {
    EntityKind::Item
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Push(Iota),
    Entity(String),
    Op(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub caster: CasterSpec,
    /// Capabilities registered on top of the stock ones.
    #[serde(default)]
    pub media: BTreeMap<ItemId, CapabilitySpec>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub program: Vec<Step>,
}

/// A step with its entity name or pattern resolved.
enum Resolved {
    Literal(Iota),
    Operator(&'static dyn Action),
}

/// A scenario turned into a live world and a runnable program.
pub struct Prepared {
    pub env: SandboxEnv,
    entities: BTreeMap<String, EntityRef>,
    program: Vec<Resolved>,
}

fn instructions(program: &[Resolved]) -> Vec<Instruction<'_>> {
    program
        .iter()
        .map(|step| match step {
            Resolved::Literal(iota) => Instruction::Literal(iota),
            Resolved::Operator(action) => Instruction::Operator(*action),
        })
        .collect()
}

impl Prepared {
    pub fn entity(&self, name: &str) -> Option<&EntityRef> {
        self.entities.get(name)
    }

    /// Cast the program once and describe the result.
    pub fn run(mut self, config: CastingConfig) -> Outcome {
        let mut harness = CastingHarness::new(config);
        let program = instructions(&self.program);
        let result = harness.cast_batch(&program, &mut self.env);
        let world = self.summarize();
        match result {
            Ok(report) => Outcome::Cast { report, world },
            Err(failure) => Outcome::Mishap { failure, world },
        }
    }

    fn summarize(&self) -> WorldSummary {
        WorldSummary {
            caster_media: self.env.caster_media(),
            main_hand: self.env.held_item(Hand::Main),
            off_hand: self.env.held_item(Hand::Off),
            entities: self
                .entities
                .iter()
                .map(|(name, entity)| EntitySummary {
                    name: name.clone(),
                    alive: self.env.is_alive(entity.id),
                    item: self.env.entity_item(entity.id).cloned(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySummary {
    pub name: String,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemStack>,
}

/// The caster and named entities after the cast.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub caster_media: u64,
    pub main_hand: ItemStack,
    pub off_hand: ItemStack,
    pub entities: Vec<EntitySummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Cast {
        report: CastReport,
        world: WorldSummary,
    },
    Mishap {
        failure: CastFailure,
        world: WorldSummary,
    },
}

impl Outcome {
    pub fn is_cast(&self) -> bool {
        matches!(self, Outcome::Cast { .. })
    }

    pub fn world(&self) -> &WorldSummary {
        match self {
            Outcome::Cast { world, .. } | Outcome::Mishap { world, .. } => world,
        }
    }
}

impl Scenario {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn registry(&self) -> MediaRegistry {
        let mut registry = MediaRegistry::with_defaults();
        for (item, spec) in &self.media {
            match *spec {
                CapabilitySpec::Dust { per_item } => {
                    registry.register(item.clone(), Dust { per_item });
                }
                CapabilitySpec::Battery {
                    max_media,
                    rechargeable,
                } => {
                    registry.register(
                        item.clone(),
                        Battery {
                            max_media,
                            rechargeable,
                        },
                    );
                }
            }
        }
        registry
    }

    /// Build the world and resolve the program. `ambit_radius` comes from
    /// the config unless the caster overrides it.
    pub fn prepare(&self, config: &CastingConfig) -> Result<Prepared, ScenarioError> {
        let caster = &self.caster;
        let mut env = SandboxEnv::new()
            .with_registry(self.registry())
            .with_ambit(caster.ambit.unwrap_or(config.ambit_radius))
            .with_caster_position(vec3(caster.position))
            .with_casting_hand(caster.casting_hand)
            .with_media(caster.media);
        if let Some(stack) = &caster.main_hand {
            env.hold(Hand::Main, stack.clone());
        }
        if let Some(stack) = &caster.off_hand {
            env.hold(Hand::Off, stack.clone());
        }

        let mut entities = BTreeMap::new();
        for spec in &self.entities {
            if entities.contains_key(&spec.name) {
                return Err(ScenarioError::DuplicateEntity(spec.name.clone()));
            }
            let position = vec3(spec.position);
            let entity = match (spec.kind, &spec.item) {
                (EntityKind::Item, item) => {
                    env.spawn_item(&spec.name, position, item.clone().unwrap_or_default())
                }
                (kind, _) => env.spawn(kind, &spec.name, position),
            };
            if !spec.alive {
                env.kill_entity(entity.id);
            }
            entities.insert(spec.name.clone(), entity);
        }

        let program = self
            .program
            .iter()
            .enumerate()
            .map(|(index, step)| match step {
                Step::Push(iota) => Ok(Resolved::Literal(iota.clone())),
                Step::Entity(name) => entities
                    .get(name)
                    .map(|entity| Resolved::Literal(Iota::Entity(entity.clone())))
                    .ok_or_else(|| ScenarioError::UnknownEntity {
                        index,
                        name: name.clone(),
                    }),
                Step::Op(name) => hexcast_ops::resolve(name)
                    .map(Resolved::Operator)
                    .map_err(|mishap| ScenarioError::Pattern { index, mishap }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            entities = entities.len(),
            steps = program.len(),
            "prepared scenario"
        );
        Ok(Prepared {
            env,
            entities,
            program,
        })
    }
}

fn vec3([x, y, z]: [f64; 3]) -> Vec3 {
    Vec3::new(x, y, z)
}

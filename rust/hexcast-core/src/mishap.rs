//! Mishaps: structured, user-facing failures raised while evaluating operators.
//!
//! A mishap is always something the caster did and should be told about. It
//! carries the offending value and enough context to render a diagnostic; the
//! dispatcher decides what to do with it. Ordinary "nothing to do" outcomes are
//! not mishaps (operators return `Ok(None)` for those).

use crate::entity::{EntityRef, Vec3};
use crate::iota::Iota;
use crate::item::ItemStack;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the caster's hands an item was taken from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Hand {
    Main,
    Off,
}

impl Hand {
    pub fn other(self) -> Hand {
        match self {
            Hand::Main => Hand::Off,
            Hand::Off => Hand::Main,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Mishap {
    #[error("expected {expected} arguments but the stack was only {got} tall")]
    NotEnoughArgs { expected: usize, got: usize },

    /// `index` counts down from the top of the stack.
    #[error("expected {expected} at index {index} of the stack, but got {got}")]
    InvalidIota {
        index: usize,
        expected: String,
        got: Iota,
    },

    #[error("needs a {wanted} item, but {entity} carries {item}")]
    BadItem {
        entity: EntityRef,
        item: ItemStack,
        wanted: String,
    },

    #[error("needs a {wanted} item in the {hand} hand, but got {item}")]
    BadOffhandItem {
        item: ItemStack,
        hand: Hand,
        wanted: String,
    },

    #[error("{entity} is out of range")]
    EntityTooFarAway { entity: EntityRef },

    #[error("{location} is out of range")]
    LocationTooFarAway { location: Vec3 },

    #[error("attempted to divide {operand1} by {operand2}")]
    DivideByZero { operand1: Iota, operand2: Iota },

    #[error("not enough media: needed {required}, only {available} available")]
    NotEnoughMedia { required: u64, available: u64 },

    #[error("evaluated more than {limit} operators in one cast")]
    EvalTooDeep { limit: usize },

    #[error("the stack grew past {limit} iotas")]
    StackOverflow { limit: usize },

    #[error("unknown pattern '{name}'")]
    InvalidPattern { name: String },
}

/// Fieldless mirror of [`Mishap`] for matching, logging and localisation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum MishapKind {
    NotEnoughArgs,
    InvalidIota,
    BadItem,
    BadOffhandItem,
    EntityTooFarAway,
    LocationTooFarAway,
    DivideByZero,
    NotEnoughMedia,
    EvalTooDeep,
    StackOverflow,
    InvalidPattern,
}

impl Mishap {
    /// Type mismatch for the argument at `idx` (counted from the bottom of the
    /// popped arguments) of an operator taking `argc` arguments.
    pub fn invalid_iota(got: &Iota, idx: usize, argc: usize, expected: impl Into<String>) -> Self {
        let index = if argc == 0 {
            idx
        } else {
            argc.saturating_sub(idx + 1)
        };
        Mishap::InvalidIota {
            index,
            expected: expected.into(),
            got: got.clone(),
        }
    }

    pub fn bad_item(entity: &EntityRef, item: ItemStack, wanted: impl Into<String>) -> Self {
        Mishap::BadItem {
            entity: entity.clone(),
            item,
            wanted: wanted.into(),
        }
    }

    pub fn bad_offhand_item(item: ItemStack, hand: Hand, wanted: impl Into<String>) -> Self {
        Mishap::BadOffhandItem {
            item,
            hand,
            wanted: wanted.into(),
        }
    }

    pub fn kind(&self) -> MishapKind {
        match self {
            Mishap::NotEnoughArgs { .. } => MishapKind::NotEnoughArgs,
            Mishap::InvalidIota { .. } => MishapKind::InvalidIota,
            Mishap::BadItem { .. } => MishapKind::BadItem,
            Mishap::BadOffhandItem { .. } => MishapKind::BadOffhandItem,
            Mishap::EntityTooFarAway { .. } => MishapKind::EntityTooFarAway,
            Mishap::LocationTooFarAway { .. } => MishapKind::LocationTooFarAway,
            Mishap::DivideByZero { .. } => MishapKind::DivideByZero,
            Mishap::NotEnoughMedia { .. } => MishapKind::NotEnoughMedia,
            Mishap::EvalTooDeep { .. } => MishapKind::EvalTooDeep,
            Mishap::StackOverflow { .. } => MishapKind::StackOverflow,
            Mishap::InvalidPattern { .. } => MishapKind::InvalidPattern,
        }
    }

    /// The short descriptive tag ("media", "rechargeable", "entity.item", ...).
    pub fn reason_tag(&self) -> Option<&str> {
        match self {
            Mishap::InvalidIota { expected, .. } => Some(expected),
            Mishap::BadItem { wanted, .. } | Mishap::BadOffhandItem { wanted, .. } => Some(wanted),
            _ => None,
        }
    }

    pub fn hand(&self) -> Option<Hand> {
        match self {
            Mishap::BadOffhandItem { hand, .. } => Some(*hand),
            _ => None,
        }
    }

    /// Localisation key, e.g. `hexcast.mishap.bad_item.media`.
    pub fn translation_key(&self) -> String {
        let base = format!("hexcast.mishap.{}", self.kind());
        match self {
            Mishap::BadItem { wanted, .. } | Mishap::BadOffhandItem { wanted, .. } => {
                format!("{base}.{wanted}")
            }
            _ => base,
        }
    }
}

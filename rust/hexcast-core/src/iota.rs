//! Iotas: the typed values flowing through the casting stack.

use crate::entity::{EntityRef, Vec3};
use crate::item::ItemStack;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Numeric tolerance used by [`Iota::tolerates`].
pub const TOLERANCE: f64 = 0.0001;

/// A value on the casting stack.
///
/// Equality is structural and exact: doubles compare by bit pattern, so `Iota`
/// is `Eq` and `Hash` and can be used as a set or map key. Use
/// [`Iota::tolerates`] for the fuzzy comparison players expect from numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Iota {
    Null,
    Double(f64),
    Bool(bool),
    Vec3(Vec3),
    List(Vec<Iota>),
    Entity(EntityRef),
    Item(ItemStack),
    /// A drawn pattern, by angle signature.
    Pattern(String),
    /// Opaque leftover of a failed operation.
    Garbage,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum IotaType {
    Null,
    Double,
    Bool,
    Vec3,
    List,
    Entity,
    Item,
    Pattern,
    Garbage,
}

impl Iota {
    pub fn kind(&self) -> IotaType {
        match self {
            Iota::Null => IotaType::Null,
            Iota::Double(_) => IotaType::Double,
            Iota::Bool(_) => IotaType::Bool,
            Iota::Vec3(_) => IotaType::Vec3,
            Iota::List(_) => IotaType::List,
            Iota::Entity(_) => IotaType::Entity,
            Iota::Item(_) => IotaType::Item,
            Iota::Pattern(_) => IotaType::Pattern,
            Iota::Garbage => IotaType::Garbage,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Iota::Null | Iota::Garbage => false,
            Iota::Bool(b) => *b,
            Iota::Double(d) => d.abs() >= TOLERANCE,
            Iota::Vec3(v) => *v != Vec3::ZERO,
            Iota::List(l) => !l.is_empty(),
            _ => true,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Iota::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Iota]> {
        match self {
            Iota::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Iota::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Like `==`, but numbers and vectors within [`TOLERANCE`] are considered
    /// the same.
    pub fn tolerates(&self, other: &Iota) -> bool {
        match (self, other) {
            (Iota::Double(a), Iota::Double(b)) => (a - b).abs() < TOLERANCE,
            (Iota::Vec3(a), Iota::Vec3(b)) => a.distance_to(*b) < TOLERANCE,
            (Iota::List(a), Iota::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.tolerates(y))
            }
            _ => self == other,
        }
    }
}

fn vec_bits(v: &Vec3) -> [u64; 3] {
    [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()]
}

impl PartialEq for Iota {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Iota::Null, Iota::Null) | (Iota::Garbage, Iota::Garbage) => true,
            (Iota::Double(a), Iota::Double(b)) => a.to_bits() == b.to_bits(),
            (Iota::Bool(a), Iota::Bool(b)) => a == b,
            (Iota::Vec3(a), Iota::Vec3(b)) => vec_bits(a) == vec_bits(b),
            (Iota::List(a), Iota::List(b)) => a == b,
            (Iota::Entity(a), Iota::Entity(b)) => a == b,
            (Iota::Item(a), Iota::Item(b)) => a == b,
            (Iota::Pattern(a), Iota::Pattern(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Iota {}

impl Hash for Iota {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Iota::Null | Iota::Garbage => {}
            Iota::Double(d) => d.to_bits().hash(state),
            Iota::Bool(b) => b.hash(state),
            Iota::Vec3(v) => vec_bits(v).hash(state),
            Iota::List(l) => l.hash(state),
            Iota::Entity(e) => e.hash(state),
            Iota::Item(i) => i.hash(state),
            Iota::Pattern(p) => p.hash(state),
        }
    }
}

impl fmt::Display for Iota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Iota::Null => f.write_str("Null"),
            Iota::Double(d) => write!(f, "{:.2}", d),
            Iota::Bool(b) => write!(f, "{}", b),
            Iota::Vec3(v) => write!(f, "{}", v),
            Iota::List(l) => {
                let items: Vec<String> = l.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Iota::Entity(e) => write!(f, "{}", e),
            Iota::Item(i) => write!(f, "{}", i),
            Iota::Pattern(sig) => write!(f, "HexPattern({})", sig),
            Iota::Garbage => f.write_str("Garbage"),
        }
    }
}

impl From<f64> for Iota {
    fn from(d: f64) -> Self {
        Iota::Double(d)
    }
}

impl From<bool> for Iota {
    fn from(b: bool) -> Self {
        Iota::Bool(b)
    }
}

impl From<Vec3> for Iota {
    fn from(v: Vec3) -> Self {
        Iota::Vec3(v)
    }
}

impl From<Vec<Iota>> for Iota {
    fn from(l: Vec<Iota>) -> Self {
        Iota::List(l)
    }
}

impl From<EntityRef> for Iota {
    fn from(e: EntityRef) -> Self {
        Iota::Entity(e)
    }
}

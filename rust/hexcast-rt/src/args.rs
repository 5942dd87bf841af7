//! Typed extraction of popped operator arguments.
//!
//! Each getter takes the argument's position in the popped slice (bottom-most
//! first) and the operator's `argc`, and on mismatch raises
//! [`Mishap::InvalidIota`] with the position counted from the top of the stack.

use hexcast_core::entity::{EntityRef, Vec3};
use hexcast_core::iota::{Iota, TOLERANCE};
use hexcast_core::mishap::Mishap;

/// A number or a vector, for operators overloaded on both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumOrVec {
    Num(f64),
    Vec(Vec3),
}

impl From<NumOrVec> for Iota {
    fn from(value: NumOrVec) -> Self {
        match value {
            NumOrVec::Num(n) => Iota::Double(n),
            NumOrVec::Vec(v) => Iota::Vec3(v),
        }
    }
}

pub trait ArgsExt {
    fn arg(&self, idx: usize, argc: usize) -> Result<&Iota, Mishap>;

    fn get_double(&self, idx: usize, argc: usize) -> Result<f64, Mishap> {
        let x = self.arg(idx, argc)?;
        x.as_double()
            .ok_or_else(|| Mishap::invalid_iota(x, idx, argc, "double"))
    }

    fn get_positive_double(&self, idx: usize, argc: usize) -> Result<f64, Mishap> {
        let x = self.arg(idx, argc)?;
        match x {
            Iota::Double(d) if *d >= 0.0 => Ok(*d),
            _ => Err(Mishap::invalid_iota(x, idx, argc, "double.positive")),
        }
    }

    /// A double that is within tolerance of an integer.
    fn get_int(&self, idx: usize, argc: usize) -> Result<i64, Mishap> {
        let x = self.arg(idx, argc)?;
        if let Iota::Double(d) = x {
            let rounded = d.round();
            if (d - rounded).abs() <= TOLERANCE && rounded.abs() < i64::MAX as f64 {
                return Ok(rounded as i64);
            }
        }
        Err(Mishap::invalid_iota(x, idx, argc, "int"))
    }

    fn get_bool(&self, idx: usize, argc: usize) -> Result<bool, Mishap> {
        let x = self.arg(idx, argc)?;
        match x {
            Iota::Bool(b) => Ok(*b),
            _ => Err(Mishap::invalid_iota(x, idx, argc, "bool")),
        }
    }

    fn get_vec3(&self, idx: usize, argc: usize) -> Result<Vec3, Mishap> {
        let x = self.arg(idx, argc)?;
        match x {
            Iota::Vec3(v) => Ok(*v),
            _ => Err(Mishap::invalid_iota(x, idx, argc, "vector")),
        }
    }

    fn get_num_or_vec(&self, idx: usize, argc: usize) -> Result<NumOrVec, Mishap> {
        let x = self.arg(idx, argc)?;
        match x {
            Iota::Double(d) => Ok(NumOrVec::Num(*d)),
            Iota::Vec3(v) => Ok(NumOrVec::Vec(*v)),
            _ => Err(Mishap::invalid_iota(x, idx, argc, "numvec")),
        }
    }

    fn get_list(&self, idx: usize, argc: usize) -> Result<&[Iota], Mishap> {
        let x = self.arg(idx, argc)?;
        x.as_list()
            .ok_or_else(|| Mishap::invalid_iota(x, idx, argc, "list"))
    }

    fn get_entity(&self, idx: usize, argc: usize) -> Result<&EntityRef, Mishap> {
        let x = self.arg(idx, argc)?;
        x.as_entity()
            .ok_or_else(|| Mishap::invalid_iota(x, idx, argc, "entity"))
    }

    /// An entity reference to a dropped item stack.
    fn get_item_entity(&self, idx: usize, argc: usize) -> Result<&EntityRef, Mishap> {
        let x = self.arg(idx, argc)?;
        match x.as_entity() {
            Some(entity) if entity.is_item() => Ok(entity),
            _ => Err(Mishap::invalid_iota(x, idx, argc, "entity.item")),
        }
    }
}

impl ArgsExt for [Iota] {
    fn arg(&self, idx: usize, argc: usize) -> Result<&Iota, Mishap> {
        self.get(idx).ok_or(Mishap::NotEnoughArgs {
            expected: argc.max(idx + 1),
            got: self.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_core::entity::EntityKind;
    use hexcast_core::mishap::MishapKind;
    use uuid::Uuid;

    fn item_entity() -> EntityRef {
        EntityRef::new(Uuid::new_v4(), EntityKind::Item, "Amethyst Dust")
    }

    #[test]
    fn extracts_typed_values() {
        let args = vec![
            Iota::Double(2.0),
            Iota::Bool(true),
            Iota::Vec3(Vec3::new(1.0, 0.0, 0.0)),
            Iota::List(vec![]),
        ];
        assert_eq!(args.get_double(0, 4).unwrap(), 2.0);
        assert_eq!(args.get_int(0, 4).unwrap(), 2);
        assert!(args.get_bool(1, 4).unwrap());
        assert_eq!(args.get_vec3(2, 4).unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert!(args.get_list(3, 4).unwrap().is_empty());
    }

    #[test]
    fn mismatch_reports_position_from_top() {
        let args = vec![Iota::Double(2.0), Iota::Null];
        match args.get_list(0, 2).unwrap_err() {
            Mishap::InvalidIota {
                index,
                expected,
                got,
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "list");
                assert_eq!(got, Iota::Double(2.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn int_rejects_fractions() {
        let args = vec![Iota::Double(2.5)];
        let err = args.get_int(0, 1).unwrap_err();
        assert_eq!(err.kind(), MishapKind::InvalidIota);
        assert_eq!(err.reason_tag(), Some("int"));
    }

    #[test]
    fn positive_double_rejects_negatives() {
        let args = vec![Iota::Double(-1.0)];
        assert_eq!(
            args.get_positive_double(0, 1).unwrap_err().reason_tag(),
            Some("double.positive")
        );
    }

    #[test]
    fn item_entity_requires_item_kind() {
        let item = item_entity();
        let player = EntityRef::new(Uuid::new_v4(), EntityKind::Player, "Caster");
        let args = vec![Iota::Entity(item.clone()), Iota::Entity(player)];
        assert_eq!(args.get_item_entity(0, 2).unwrap(), &item);
        assert_eq!(
            args.get_item_entity(1, 2).unwrap_err().reason_tag(),
            Some("entity.item")
        );
        assert!(args.get_entity(1, 2).is_ok());
    }

    #[test]
    fn missing_argument_is_not_enough_args() {
        let args: Vec<Iota> = vec![];
        assert_eq!(args.get_double(0, 1).unwrap_err().kind(), MishapKind::NotEnoughArgs);
    }
}

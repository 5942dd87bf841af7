//! Arithmetic over numbers and vectors.
//!
//! Mixing a number with a vector broadcasts the number to every component,
//! except for multiplication and division where a vector and a number scale.

use hexcast_rt::action::ConstMediaAction;
use hexcast_rt::args::{ArgsExt, NumOrVec};
use hexcast_rt::entity::Vec3;
use hexcast_rt::env::CastingEnv;
use hexcast_rt::iota::Iota;
use hexcast_rt::mishap::Mishap;
use NumOrVec::{Num, Vec as Vector};

fn splat(n: f64) -> Vec3 {
    Vec3::new(n, n, n)
}

fn operands(args: &[Iota]) -> Result<(NumOrVec, NumOrVec), Mishap> {
    Ok((args.get_num_or_vec(0, 2)?, args.get_num_or_vec(1, 2)?))
}

/// `a, b → a + b`
pub struct OpAdd;

impl ConstMediaAction for OpAdd {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let sum = match operands(args)? {
            (Num(a), Num(b)) => Num(a + b),
            (Num(n), Vector(v)) | (Vector(v), Num(n)) => Vector(v + splat(n)),
            (Vector(a), Vector(b)) => Vector(a + b),
        };
        Ok(vec![sum.into()])
    }
}

/// `a, b → a - b`
pub struct OpSub;

impl ConstMediaAction for OpSub {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let diff = match operands(args)? {
            (Num(a), Num(b)) => Num(a - b),
            (Num(n), Vector(v)) => Vector(splat(n) - v),
            (Vector(v), Num(n)) => Vector(v - splat(n)),
            (Vector(a), Vector(b)) => Vector(a - b),
        };
        Ok(vec![diff.into()])
    }
}

/// `a, b → a * b`; two vectors give their dot product.
pub struct OpMul;

impl ConstMediaAction for OpMul {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let product = match operands(args)? {
            (Num(a), Num(b)) => Num(a * b),
            (Num(n), Vector(v)) | (Vector(v), Num(n)) => Vector(v * n),
            (Vector(a), Vector(b)) => Num(a.dot(b)),
        };
        Ok(vec![product.into()])
    }
}

/// `a, b → a / b`; two vectors give their cross product.
pub struct OpDiv;

impl ConstMediaAction for OpDiv {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let divide_by_zero = || Mishap::DivideByZero {
            operand1: args[0].clone(),
            operand2: args[1].clone(),
        };
        let quotient = match operands(args)? {
            (Num(a), Num(b)) => {
                if b == 0.0 {
                    return Err(divide_by_zero());
                }
                Num(a / b)
            }
            (Vector(v), Num(n)) => {
                if n == 0.0 {
                    return Err(divide_by_zero());
                }
                Vector(v * n.recip())
            }
            (Num(n), Vector(v)) => {
                if v.x == 0.0 || v.y == 0.0 || v.z == 0.0 {
                    return Err(divide_by_zero());
                }
                Vector(Vec3::new(n / v.x, n / v.y, n / v.z))
            }
            (Vector(a), Vector(b)) => Vector(a.cross(b)),
        };
        Ok(vec![quotient.into()])
    }
}

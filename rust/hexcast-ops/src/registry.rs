//! Pattern name → operator table.

use crate::lists::{OpAppend, OpConcat, OpEmptyList, OpIndex, OpListSize, OpReverse, OpSingleton};
use crate::math::{OpAdd, OpDiv, OpMul, OpSub};
use crate::query::OpEntityPos;
use crate::spells::{OpCreateBattery, OpRecharge};
use hexcast_rt::action::{Action, Const, Spell};
use hexcast_rt::mishap::Mishap;

// (name, signature, operator)
static OPERATORS: &[(&str, &str, &dyn Action)] = &[
    ("empty_list", "→ []", &Const(OpEmptyList)),
    ("singleton", "x → [x]", &Const(OpSingleton)),
    ("append", "[..], x → [.., x]", &Const(OpAppend)),
    ("concat", "[a..], [b..] → [a.., b..]", &Const(OpConcat)),
    ("index", "[..], n → x", &Const(OpIndex)),
    ("list_size", "[..] → n", &Const(OpListSize)),
    ("reverse", "[..] → [..]", &Const(OpReverse)),
    ("add", "a, b → a + b", &Const(OpAdd)),
    ("sub", "a, b → a - b", &Const(OpSub)),
    ("mul", "a, b → a * b", &Const(OpMul)),
    ("div", "a, b → a / b", &Const(OpDiv)),
    ("entity_pos", "entity → vector", &Const(OpEntityPos)),
    ("recharge", "item entity →", &Spell(OpRecharge)),
    ("craft_battery", "item entity →", &Spell(OpCreateBattery)),
];

/// The operator registered under `name`.
pub fn lookup(name: &str) -> Option<&'static dyn Action> {
    OPERATORS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|&(_, _, action)| action)
}

/// Like [`lookup`], but an unknown name is an `InvalidPattern` mishap.
pub fn resolve(name: &str) -> Result<&'static dyn Action, Mishap> {
    lookup(name).ok_or_else(|| Mishap::InvalidPattern {
        name: name.to_string(),
    })
}

/// Registered names, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    OPERATORS.iter().map(|&(name, _, _)| name)
}

/// `(name, signature)` pairs for listings.
pub fn signatures() -> impl Iterator<Item = (&'static str, &'static str)> {
    OPERATORS.iter().map(|&(name, sig, _)| (name, sig))
}

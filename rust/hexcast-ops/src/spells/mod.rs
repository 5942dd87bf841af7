//! Spells: operators whose effect on the world is deferred to commit.

pub mod battery;
pub mod recharge;

pub use battery::OpCreateBattery;
pub use recharge::OpRecharge;

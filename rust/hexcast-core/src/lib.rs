//! Hexcast Core
//!
//! Shared iota values, entity and item references, the media capability and the
//! mishap taxonomy used across the runtime and the operator library.

pub mod entity;
pub mod iota;
pub mod item;
pub mod media;
pub mod mishap;
pub mod particles;

pub use entity::{EntityKind, EntityRef, Vec3};
pub use iota::{Iota, IotaType};
pub use item::{ItemId, ItemStack};
pub use media::{MediaAmount, MediaConstants, MediaHolder, MediaRegistry};
pub use mishap::{Hand, Mishap, MishapKind};
pub use particles::ParticleSpray;

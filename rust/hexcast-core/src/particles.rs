//! Descriptive particle hints handed to the renderer.

use crate::entity::Vec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A spray of particles. Purely observational: nothing in evaluation reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpray {
    pub pos: Vec3,
    pub vel: Vec3,
    pub fuzziness: f64,
    /// Cone half-angle, in radians.
    pub spread: f64,
    pub count: u32,
}

impl ParticleSpray {
    pub const DEFAULT_COUNT: u32 = 20;

    /// Particles flying out in every direction from `pos`.
    pub fn burst(pos: Vec3, size: f64) -> Self {
        Self::burst_with_count(pos, size, Self::DEFAULT_COUNT)
    }

    pub fn burst_with_count(pos: Vec3, size: f64, count: u32) -> Self {
        Self {
            pos,
            vel: Vec3::new(size, 0.0, 0.0),
            fuzziness: 0.0,
            spread: PI,
            count,
        }
    }

    /// The radius of a burst.
    pub fn size(&self) -> f64 {
        self.vel.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_omnidirectional() {
        let spray = ParticleSpray::burst(Vec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(spray.pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(spray.size(), 0.5);
        assert_eq!(spray.spread, PI);
        assert_eq!(spray.count, ParticleSpray::DEFAULT_COUNT);
    }
}

//! Transient render descriptors emitted by the combat phases.
//!
//! The simulation never draws. Everything a renderer needs to animate an
//! impact is described here and delivered through `Event::Visual`.

use glam::Vec2;

use crate::DamageType;

/// A single short-lived visual produced by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualEffect {
    /// Burst of particles around an impact.
    ParticleBurst {
        /// Centre of the burst.
        center: Vec2,
        /// Radius the particles spread to.
        radius: f32,
        /// Number of particles.
        count: u32,
        /// Damage type, used by renderers to pick a palette.
        damage_type: DamageType,
    },
    /// Scorch mark left on the ground.
    Decal {
        /// Centre of the decal.
        center: Vec2,
        /// Radius of the decal.
        radius: f32,
    },
    /// Full-screen flash.
    ScreenFlash {
        /// Flash intensity in `0.0..=1.0`.
        intensity: f32,
    },
    /// One segment of a chain bolt.
    BoltSegment {
        /// Start of the segment.
        from: Vec2,
        /// End of the segment.
        to: Vec2,
        /// Zero-based hop index within the chain.
        hop: u32,
    },
    /// Expanding rings drawn when an aftershock fires.
    Ripple {
        /// Centre of the rings.
        center: Vec2,
        /// Final radius of the outermost ring.
        radius: f32,
        /// Number of rings.
        rings: u32,
    },
    /// Particle dropped behind a projectile in flight.
    TrailParticle {
        /// Where the particle spawns.
        position: Vec2,
        /// Particle size in pixels.
        size: f32,
        /// Particle lifetime in seconds.
        lifetime: f32,
    },
}

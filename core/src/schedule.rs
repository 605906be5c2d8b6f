//! Entries deferred to a future simulation time.

use std::time::Duration;

use glam::Vec2;

use crate::DamageType;

/// Kind of work a scheduled entry performs when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduledEffectKind {
    /// Delayed area damage left behind by an impact.
    Aftershock,
}

/// Area damage and visuals executed by a scheduled entry.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaPayload {
    /// Centre of the affected area.
    pub center: Vec2,
    /// Radius of the affected area; damage falls off linearly to zero at it.
    pub radius: f32,
    /// Base damage before multipliers and falloff.
    pub damage: f32,
    /// Type of the damage.
    pub damage_type: DamageType,
    /// Number of ripple rings drawn when the entry executes.
    pub rings: u32,
}

/// Time-delayed effect consumed exactly once by the scheduled-effect flush.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEffect {
    /// Absolute simulation time at which the entry executes.
    pub due: Duration,
    /// Work performed by the entry.
    pub kind: ScheduledEffectKind,
    /// Parameters of the work.
    pub payload: AreaPayload,
}

impl ScheduledEffect {
    /// Creates an aftershock entry due at `due`.
    #[must_use]
    pub fn aftershock(due: Duration, payload: AreaPayload) -> Self {
        Self {
            due,
            kind: ScheduledEffectKind::Aftershock,
            payload,
        }
    }

    /// Reports whether the entry should execute at simulation time `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.due <= now
    }
}

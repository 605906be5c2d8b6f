#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Damage arithmetic shared by direct hits, area sweeps, chains and aftershocks.
//!
//! Applied damage is
//! `clamp(round(base × global × type multiplier × falloff), 0, health)`.
//! A hit that rounds to zero, or lands on an enemy that is no longer live, is
//! a no-op: nothing is recorded on the enemy and no notification is emitted.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{finite_or, CombatConfig, DamageType, Event};
use rampart_world::{Enemy, EnemyStore};

/// Base damage and type carried by a single hit before any scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Unscaled damage.
    pub damage: f32,
    /// Type used to look up the enemy's multiplier.
    pub damage_type: DamageType,
}

impl Hit {
    /// Creates a hit with the provided base damage and type.
    #[must_use]
    pub const fn new(damage: f32, damage_type: DamageType) -> Self {
        Self {
            damage,
            damage_type,
        }
    }

    /// Copy of the hit with its base damage multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            damage: self.damage * factor,
            ..self
        }
    }
}

/// Linear falloff `1 − distance/radius`, zero at and beyond the boundary.
///
/// A non-positive or non-finite radius yields zero.
#[must_use]
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if !(radius.is_finite() && radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    if distance >= radius {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// Applies damage to enemies at a fixed simulation time.
#[derive(Clone, Copy, Debug)]
pub struct DamageResolver {
    global_multiplier: f32,
    now: Duration,
}

impl DamageResolver {
    /// Creates a resolver reading the global multiplier from `config`.
    #[must_use]
    pub fn new(config: &CombatConfig, now: Duration) -> Self {
        let global_multiplier = finite_or(config.global_damage_multiplier, 1.0).max(0.0);
        Self {
            global_multiplier,
            now,
        }
    }

    /// Simulation time stamped on recorded hits.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Health `hit` would remove from `enemy` when scaled by `falloff`.
    #[must_use]
    pub fn compute(&self, enemy: &Enemy, hit: Hit, falloff: f32) -> u32 {
        let falloff = finite_or(falloff, 0.0).clamp(0.0, 1.0);
        let raw = finite_or(hit.damage, 0.0)
            * self.global_multiplier
            * enemy.multipliers().get(hit.damage_type)
            * falloff;
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }

        let rounded = raw.round();
        let health = enemy.health().get();
        if rounded >= health as f32 {
            health
        } else {
            rounded as u32
        }
    }

    /// Applies `hit` to `enemy` at full strength.
    ///
    /// Returns the health removed.
    pub fn apply(&self, enemy: &mut Enemy, hit: Hit, out_events: &mut Vec<Event>) -> u32 {
        self.apply_scaled(enemy, hit, 1.0, out_events)
    }

    /// Applies `hit` to `enemy` scaled by `falloff`.
    ///
    /// Returns the health removed.
    pub fn apply_scaled(
        &self,
        enemy: &mut Enemy,
        hit: Hit,
        falloff: f32,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        if !enemy.is_live() {
            return 0;
        }

        let amount = self.compute(enemy, hit, falloff);
        if amount == 0 {
            return 0;
        }

        let applied = enemy.take_damage(amount, self.now);
        if applied > 0 {
            tracing::trace!(
                enemy = enemy.id().get(),
                amount = applied,
                remaining = enemy.health().get(),
                "damage applied"
            );
            out_events.push(Event::EnemyDamaged {
                enemy: enemy.id(),
                position: enemy.position(),
                amount: applied,
                damage_type: hit.damage_type,
            });
        }
        applied
    }

    /// Applies `hit` to every live enemy strictly inside `radius` of `center`,
    /// scaled by the linear falloff.
    ///
    /// Returns the total health removed.
    pub fn sweep(
        &self,
        enemies: &mut EnemyStore,
        center: Vec2,
        radius: f32,
        hit: Hit,
        out_events: &mut Vec<Event>,
    ) -> u64 {
        if !(radius.is_finite() && radius > 0.0) {
            return 0;
        }

        let mut total = 0_u64;
        for enemy in enemies.iter_live_mut() {
            let scale = falloff(enemy.position().distance(center), radius);
            if scale <= 0.0 {
                continue;
            }
            total += u64::from(self.apply_scaled(enemy, hit, scale, out_events));
        }
        total
    }
}

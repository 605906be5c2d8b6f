//! Read-only combat configuration and static tower definitions.
//!
//! Every numeric field tolerates malformed input: [`CombatConfig::sanitized`]
//! and [`TowerDefinition::sanitized`] replace non-finite or out-of-range values
//! with the documented defaults instead of failing.

use serde::{Deserialize, Serialize};

use crate::{DamageType, EffectsDescriptor};

const DEFAULT_GLOBAL_DAMAGE_MULTIPLIER: f32 = 1.0;
const DEFAULT_CELL_SIZE: f32 = 40.0;
const DEFAULT_PROJECTILE_SPEED: f32 = 2.5;
const DEFAULT_STARTING_LIVES: u32 = 20;
const DEFAULT_LEAK_COST: u32 = 1;
const DEFAULT_RNG_SEED: u64 = 0x5eed_7a11_0f_c0de;

const DEFAULT_TOWER_RANGE: f32 = 120.0;
const DEFAULT_ATTACK_RATE: f32 = 1.0;
const DEFAULT_TOWER_DAMAGE: f32 = 10.0;
const DEFAULT_ROTATION_SPEED: f32 = std::f32::consts::TAU;

/// Returns `value` when it is finite, otherwise `fallback`.
#[must_use]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Returns `value` when it is finite and strictly positive, otherwise `fallback`.
#[must_use]
pub fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Global knobs read by every combat phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatConfig {
    /// Multiplier applied to every hit before rounding. Defaults to `1.0`.
    pub global_damage_multiplier: f32,
    /// Edge length of a path cell in world pixels, used to convert enemy
    /// speeds. Defaults to `40.0`.
    pub cell_size: f32,
    /// Projectile progress per second when a projectile carries no override.
    /// Defaults to `2.5`, i.e. a 0.4 s flight.
    pub default_projectile_speed: f32,
    /// Lives the player starts with. Defaults to `20`.
    pub starting_lives: u32,
    /// Gold the player starts with. Defaults to `0`.
    pub starting_gold: u64,
    /// Lives deducted per leaked enemy, bosses included. Defaults to `1`.
    pub leak_cost: u32,
    /// Seed for the simulation's random number generator.
    pub rng_seed: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            global_damage_multiplier: DEFAULT_GLOBAL_DAMAGE_MULTIPLIER,
            cell_size: DEFAULT_CELL_SIZE,
            default_projectile_speed: DEFAULT_PROJECTILE_SPEED,
            starting_lives: DEFAULT_STARTING_LIVES,
            starting_gold: 0,
            leak_cost: DEFAULT_LEAK_COST,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl CombatConfig {
    /// Replaces malformed numeric fields with their defaults.
    ///
    /// The damage multiplier may be zero (a "no damage" sandbox) but never
    /// negative or non-finite; sizes and speeds must be strictly positive.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let global_damage_multiplier =
            if self.global_damage_multiplier.is_finite() && self.global_damage_multiplier >= 0.0 {
                self.global_damage_multiplier
            } else {
                tracing::warn!(
                    value = self.global_damage_multiplier,
                    "global damage multiplier is malformed, using default"
                );
                DEFAULT_GLOBAL_DAMAGE_MULTIPLIER
            };

        let cell_size = positive_or(self.cell_size, DEFAULT_CELL_SIZE);
        if cell_size != self.cell_size {
            tracing::warn!(value = self.cell_size, "cell size is malformed, using default");
        }

        Self {
            global_damage_multiplier,
            cell_size,
            default_projectile_speed: positive_or(
                self.default_projectile_speed,
                DEFAULT_PROJECTILE_SPEED,
            ),
            ..self
        }
    }
}

/// Per-enemy damage-type multiplier table. Identity by default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamageMultipliers {
    /// Multiplier applied to [`DamageType::Physical`] hits.
    pub physical: f32,
    /// Multiplier applied to [`DamageType::Explosive`] hits.
    pub explosive: f32,
    /// Multiplier applied to [`DamageType::Lightning`] hits.
    pub lightning: f32,
    /// Multiplier applied to [`DamageType::Frost`] hits.
    pub frost: f32,
}

impl Default for DamageMultipliers {
    fn default() -> Self {
        Self {
            physical: 1.0,
            explosive: 1.0,
            lightning: 1.0,
            frost: 1.0,
        }
    }
}

impl DamageMultipliers {
    /// Multiplier for the provided damage type.
    ///
    /// Non-finite or negative entries behave as the identity multiplier.
    #[must_use]
    pub fn get(&self, damage_type: DamageType) -> f32 {
        let raw = match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Explosive => self.explosive,
            DamageType::Lightning => self.lightning,
            DamageType::Frost => self.frost,
        };
        if raw.is_finite() && raw >= 0.0 {
            raw
        } else {
            1.0
        }
    }
}

/// Static combat parameters of a tower, owned by the placement subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TowerDefinition {
    /// Targeting radius in world pixels.
    pub range: f32,
    /// Shots per second.
    pub attack_rate: f32,
    /// Base damage carried by each projectile.
    pub damage: f32,
    /// Type of the damage dealt.
    pub damage_type: DamageType,
    /// Area-of-effect radius; `None` fires single-target shots.
    pub aoe_radius: Option<f32>,
    /// Projectile progress per second; `None` uses the configured default.
    pub projectile_speed: Option<f32>,
    /// Maximum turret rotation speed in radians per second.
    pub rotation_speed: f32,
    /// Effects copied into every projectile fired by the tower.
    pub effects: EffectsDescriptor,
}

impl Default for TowerDefinition {
    fn default() -> Self {
        Self {
            range: DEFAULT_TOWER_RANGE,
            attack_rate: DEFAULT_ATTACK_RATE,
            damage: DEFAULT_TOWER_DAMAGE,
            damage_type: DamageType::Physical,
            aoe_radius: None,
            projectile_speed: None,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            effects: EffectsDescriptor::default(),
        }
    }
}

impl TowerDefinition {
    /// Replaces malformed numeric fields with their defaults.
    ///
    /// Zero damage is kept (support towers that only carry effects); a
    /// non-positive AoE radius disables the area sweep.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let damage = finite_or(self.damage, DEFAULT_TOWER_DAMAGE).max(0.0);
        let aoe_radius = self
            .aoe_radius
            .filter(|radius| radius.is_finite() && *radius > 0.0);
        let projectile_speed = self
            .projectile_speed
            .filter(|speed| speed.is_finite() && *speed > 0.0);

        Self {
            range: finite_or(self.range, DEFAULT_TOWER_RANGE).max(0.0),
            attack_rate: positive_or(self.attack_rate, DEFAULT_ATTACK_RATE),
            damage,
            aoe_radius,
            projectile_speed,
            rotation_speed: positive_or(self.rotation_speed, DEFAULT_ROTATION_SPEED),
            effects: self.effects.sanitized(),
            ..self
        }
    }

    /// Seconds between two shots.
    #[must_use]
    pub fn reload_seconds(&self) -> f32 {
        1.0 / positive_or(self.attack_rate, DEFAULT_ATTACK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let config = CombatConfig {
            global_damage_multiplier: f32::NAN,
            cell_size: -3.0,
            default_projectile_speed: f32::INFINITY,
            ..CombatConfig::default()
        }
        .sanitized();

        assert_eq!(config.global_damage_multiplier, 1.0);
        assert_eq!(config.cell_size, 40.0);
        assert_eq!(config.default_projectile_speed, 2.5);
    }

    #[test]
    fn zero_damage_multiplier_is_preserved() {
        let config = CombatConfig {
            global_damage_multiplier: 0.0,
            ..CombatConfig::default()
        }
        .sanitized();
        assert_eq!(config.global_damage_multiplier, 0.0);
    }

    #[test]
    fn multipliers_ignore_malformed_entries() {
        let multipliers = DamageMultipliers {
            frost: f32::NAN,
            explosive: 0.5,
            ..DamageMultipliers::default()
        };
        assert_eq!(multipliers.get(DamageType::Frost), 1.0);
        assert_eq!(multipliers.get(DamageType::Explosive), 0.5);
        assert_eq!(multipliers.get(DamageType::Physical), 1.0);
    }

    #[test]
    fn tower_definition_sanitises_rates_and_radius() {
        let definition = TowerDefinition {
            attack_rate: 0.0,
            aoe_radius: Some(f32::NAN),
            projectile_speed: Some(-1.0),
            damage: f32::NEG_INFINITY,
            ..TowerDefinition::default()
        }
        .sanitized();

        assert_eq!(definition.attack_rate, 1.0);
        assert_eq!(definition.aoe_radius, None);
        assert_eq!(definition.projectile_speed, None);
        assert_eq!(definition.damage, 10.0);
        assert!((definition.reload_seconds() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_config_table_uses_defaults() {
        let config: CombatConfig =
            toml::from_str("cell_size = 32.0\nleak_cost = 3").expect("parse config");
        assert_eq!(config.cell_size, 32.0);
        assert_eq!(config.leak_cost, 3);
        assert_eq!(config.starting_lives, 20);
    }
}

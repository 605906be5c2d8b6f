#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the combat systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and every phase of the simulation tick reports what
//! happened through [`Event`] values. Renderers never receive mutable state;
//! they consume snapshots and the [`VisualEffect`] descriptors carried by
//! [`Event::Visual`].

mod config;
mod effects;
mod schedule;
mod visuals;

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{finite_or, positive_or, CombatConfig, DamageMultipliers, TowerDefinition};
pub use effects::{
    AftershockParams, ChainParams, ClusterParams, EffectKind, EffectParams, EffectsDescriptor,
    ExplosionParams, KnockbackParams, TrailParams, MAX_AFTERSHOCK_DELAY, MAX_CHAIN_JUMPS,
    MAX_CLUSTER_CHILDREN,
};
pub use schedule::{AreaPayload, ScheduledEffect, ScheduledEffectKind};
pub use visuals::VisualEffect;

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Combat runs: towers fire, projectiles fly and enemies walk.
    #[default]
    Attack,
    /// Planning mode that freezes every combat phase.
    Builder,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a new combat configuration, resetting the ledger and RNG.
    ConfigureCombat {
        /// Configuration to install. It is sanitised before use.
        config: CombatConfig,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places a tower at the provided world position.
    PlaceTower {
        /// Centre of the tower in world pixels.
        position: Vec2,
        /// Static combat definition copied into the tower.
        definition: TowerDefinition,
        /// Targeting mode the tower starts with.
        targeting: TargetingMode,
    },
    /// Requests removal of an existing tower from the world.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Changes how a tower chooses its target.
    SetTargetingMode {
        /// Tower to reconfigure.
        tower: TowerId,
        /// Newly selected targeting mode.
        mode: TargetingMode,
    },
    /// Pushes a freshly spawned enemy into the live collection.
    SpawnEnemy {
        /// Stats and route of the enemy.
        spawn: EnemySpawn,
    },
}

/// Events broadcast by the world and the combat phases.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulation time after the advance.
        now: Duration,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Centre of the tower in world pixels.
        position: Vec2,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
    },
    /// Reports that a tower removal request referenced an unknown tower.
    TowerRemovalRejected {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Confirms that a tower switched targeting modes.
    TargetingModeChanged {
        /// Tower that was reconfigured.
        tower: TowerId,
        /// Mode now in effect.
        mode: TargetingMode,
    },
    /// Confirms that an enemy entered the live collection.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Position the enemy starts at.
        position: Vec2,
    },
    /// Reports that a tower launched a projectile.
    ProjectileFired {
        /// Identifier of the new projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Damage notification consumed by on-screen feedback.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Position of the enemy when the damage landed.
        position: Vec2,
        /// Health removed after clamping.
        amount: u32,
        /// Type of the damage that landed.
        damage_type: DamageType,
    },
    /// Reports that a projectile reached its destination and resolved.
    ProjectileResolved {
        /// Projectile that completed.
        projectile: ProjectileId,
        /// Point where the projectile resolved.
        position: Vec2,
    },
    /// Reports that an aftershock was queued for later execution.
    AftershockScheduled {
        /// Simulation time at which the aftershock fires.
        due: Duration,
        /// Centre of the pending aftershock.
        center: Vec2,
    },
    /// Reports that a defeated enemy was removed and its reward credited.
    EnemyKilled {
        /// Enemy that was defeated.
        enemy: EnemyId,
        /// Gold credited to the player.
        reward: u32,
    },
    /// Reports that an enemy reached the end of its path.
    EnemyLeaked {
        /// Enemy that leaked.
        enemy: EnemyId,
        /// Lives deducted from the player.
        lives_lost: u32,
    },
    /// Transient presentation descriptor for the renderer.
    Visual {
        /// Descriptor to draw.
        effect: VisualEffect,
    },
}

/// Strategy a tower uses to pick among the enemies in its range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Enemy nearest to the tower.
    #[default]
    Closest,
    /// Enemy furthest along its path.
    First,
    /// Enemy least far along its path.
    Last,
    /// Enemy with the most remaining health.
    Strongest,
    /// Enemy with the least remaining health.
    Weakest,
}

/// Category of damage carried by projectiles and effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Kinetic damage from bullets and bolts.
    #[default]
    Physical,
    /// Blast damage from shells and aftershocks.
    Explosive,
    /// Arcing damage from chain towers.
    Lightning,
    /// Cold damage from frost towers.
    Frost,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Remaining hit points of an enemy. Never negative by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw hit-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Removes up to `amount` hit points, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Ordered, shared list of points an enemy walks from spawn to goal.
///
/// Cloning is cheap: every enemy spawned onto the same route shares the
/// underlying allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointPath(Arc<[Vec2]>);

impl WaypointPath {
    /// Builds a path from the provided points.
    #[must_use]
    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self(points.into())
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.0
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Waypoint stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.0.get(index).copied()
    }

    /// Final waypoint of the route.
    #[must_use]
    pub fn last(&self) -> Option<Vec2> {
        self.0.last().copied()
    }
}

/// Stats handed over by the spawner when an enemy enters the field.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Route the enemy follows. The enemy starts on its first waypoint.
    pub path: WaypointPath,
    /// Starting and maximum health.
    pub health: u32,
    /// Walking speed in path cells per second.
    pub speed: f32,
    /// Gold credited when the enemy is defeated.
    pub reward: u32,
    /// Per-enemy damage-type multipliers.
    pub multipliers: DamageMultipliers,
}

impl EnemySpawn {
    /// Creates a spawn with identity damage multipliers.
    #[must_use]
    pub fn new(path: WaypointPath, health: u32, speed: f32, reward: u32) -> Self {
        Self {
            path,
            health,
            speed,
            reward,
            multipliers: DamageMultipliers::default(),
        }
    }

    /// Overrides the damage-type multipliers applied to the enemy.
    #[must_use]
    pub fn with_multipliers(mut self, multipliers: DamageMultipliers) -> Self {
        self.multipliers = multipliers;
        self
    }
}

/// Converts a duration into floating point seconds used by the kinematics.
#[must_use]
pub fn seconds(duration: Duration) -> f32 {
    duration.as_secs_f32()
}

#[cfg(test)]
mod tests {
    use super::{Health, TargetingMode, WaypointPath};
    use glam::Vec2;

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(5);
        assert_eq!(health.saturating_sub(3), Health::new(2));
        assert!(health.saturating_sub(9).is_zero());
    }

    #[test]
    fn targeting_mode_defaults_to_closest() {
        assert_eq!(TargetingMode::default(), TargetingMode::Closest);
    }

    #[test]
    fn cloned_paths_share_points() {
        let path = WaypointPath::from_points(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        let clone = path.clone();
        assert_eq!(clone.len(), 2);
        assert_eq!(clone.last(), Some(Vec2::new(10.0, 0.0)));
        assert!(std::ptr::eq(path.points(), clone.points()));
    }

    #[test]
    fn targeting_mode_parses_from_snake_case() {
        #[derive(serde::Deserialize)]
        struct Holder {
            mode: TargetingMode,
        }

        let holder: Holder = toml::from_str("mode = \"strongest\"").expect("parse mode");
        assert_eq!(holder.mode, TargetingMode::Strongest);
    }
}

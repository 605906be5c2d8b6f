#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for Rampart.
//!
//! The [`World`] is the single explicit simulation context: towers, enemies,
//! projectiles, scheduled effects, the player's ledger, the simulation clock
//! and the seeded random number generator all live here. External
//! collaborators mutate it through [`apply`]; the combat phases borrow its
//! parts through [`World::frame`], and presentation layers read it through
//! [`query`].

mod enemies;
mod ledger;
mod projectiles;
mod schedule;
mod towers;

use std::time::Duration;

use rampart_core::{CombatConfig, Command, Event, PlayMode};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use enemies::{
    pixel_budget, Enemy, EnemyStore, HitRecord, DEFAULT_ENEMY_SPEED, HIT_SHAKE_WINDOW,
};
pub use ledger::Ledger;
pub use projectiles::{Projectile, ProjectileLaunch, ProjectileStore};
pub use schedule::ScheduledEffectQueue;
pub use towers::{Tower, TowerRegistry};

/// Random number generator driving every stochastic effect.
pub type SimRng = ChaCha8Rng;

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    config: CombatConfig,
    play_mode: PlayMode,
    clock: Duration,
    tick_index: u64,
    towers: TowerRegistry,
    enemies: EnemyStore,
    projectiles: ProjectileStore,
    schedule: ScheduledEffectQueue,
    ledger: Ledger,
    rng: SimRng,
}

impl World {
    /// Creates a world using the default combat configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CombatConfig::default())
    }

    /// Creates a world using the provided combat configuration.
    #[must_use]
    pub fn with_config(config: CombatConfig) -> Self {
        let config = config.sanitized();
        Self {
            ledger: Ledger::new(config.starting_lives, config.starting_gold),
            rng: SimRng::seed_from_u64(config.rng_seed),
            config,
            play_mode: PlayMode::Attack,
            clock: Duration::ZERO,
            tick_index: 0,
            towers: TowerRegistry::new(),
            enemies: EnemyStore::new(),
            projectiles: ProjectileStore::new(),
            schedule: ScheduledEffectQueue::new(),
        }
    }

    /// Splits the world into the disjoint parts the combat phases mutate.
    pub fn frame(&mut self) -> WorldFrame<'_> {
        WorldFrame {
            config: &self.config,
            now: self.clock,
            play_mode: self.play_mode,
            towers: &mut self.towers,
            enemies: &mut self.enemies,
            projectiles: &mut self.projectiles,
            schedule: &mut self.schedule,
            ledger: &mut self.ledger,
            rng: &mut self.rng,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Disjoint mutable borrows of the world handed to the combat phases.
#[derive(Debug)]
pub struct WorldFrame<'a> {
    /// Active combat configuration.
    pub config: &'a CombatConfig,
    /// Simulation time of the current tick.
    pub now: Duration,
    /// Active play mode.
    pub play_mode: PlayMode,
    /// Placed towers.
    pub towers: &'a mut TowerRegistry,
    /// Live enemies.
    pub enemies: &'a mut EnemyStore,
    /// Projectiles in flight.
    pub projectiles: &'a mut ProjectileStore,
    /// Pending scheduled effects.
    pub schedule: &'a mut ScheduledEffectQueue,
    /// Player lives and gold.
    pub ledger: &'a mut Ledger,
    /// Seeded random number generator.
    pub rng: &'a mut SimRng,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureCombat { config } => {
            let config = config.sanitized();
            world.ledger = Ledger::new(config.starting_lives, config.starting_gold);
            world.rng = SimRng::seed_from_u64(config.rng_seed);
            world.config = config;
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                now: world.clock,
            });
        }
        Command::PlaceTower {
            position,
            definition,
            targeting,
        } => {
            let tower = world.towers.insert(position, definition, targeting);
            out_events.push(Event::TowerPlaced { tower, position });
        }
        Command::RemoveTower { tower } => {
            if world.towers.remove(tower).is_some() {
                out_events.push(Event::TowerRemoved { tower });
            } else {
                out_events.push(Event::TowerRemovalRejected { tower });
            }
        }
        Command::SetTargetingMode { tower, mode } => {
            if let Some(entry) = world.towers.get_mut(tower) {
                entry.set_targeting(mode);
                out_events.push(Event::TargetingModeChanged { tower, mode });
            }
        }
        Command::SpawnEnemy { spawn } => {
            let enemy = world.enemies.spawn(spawn);
            let position = world
                .enemies
                .get(enemy)
                .map(Enemy::position)
                .unwrap_or_default();
            out_events.push(Event::EnemySpawned { enemy, position });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{
        CombatConfig, EnemyId, Health, PlayMode, ProjectileId, TargetingMode, TowerId,
    };

    use super::{EnemyStore, Ledger, ProjectileStore, TowerRegistry, World};

    /// Active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Current simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Active combat configuration.
    #[must_use]
    pub fn config(world: &World) -> &CombatConfig {
        &world.config
    }

    /// Player lives, gold and tallies.
    #[must_use]
    pub fn ledger(world: &World) -> &Ledger {
        &world.ledger
    }

    /// Read-only access to the live enemy collection.
    #[must_use]
    pub fn enemies(world: &World) -> &EnemyStore {
        &world.enemies
    }

    /// Read-only access to the placed towers.
    #[must_use]
    pub fn towers(world: &World) -> &TowerRegistry {
        &world.towers
    }

    /// Read-only access to projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &ProjectileStore {
        &world.projectiles
    }

    /// Number of scheduled effects waiting to come due.
    #[must_use]
    pub fn pending_scheduled_effects(world: &World) -> usize {
        world.schedule.len()
    }

    /// Captures a read-only view of the towers for presentation.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView {
            snapshots: world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id(),
                    position: tower.position(),
                    heading: tower.heading(),
                    target: tower.target(),
                    cooldown: tower.cooldown(),
                    targeting: tower.targeting(),
                    range: tower.definition().range,
                })
                .collect(),
        }
    }

    /// Captures a read-only view of the enemies for presentation.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView {
            snapshots: world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id(),
                    position: enemy.position(),
                    health: enemy.health(),
                    max_health: enemy.max_health(),
                    waypoint_index: enemy.waypoint_index(),
                    hit_shake: enemy.hit_shake(world.clock),
                })
                .collect(),
        }
    }

    /// Captures interpolated positions of projectiles still in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .filter(|projectile| !projectile.is_complete())
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id(),
                position: projectile.position(),
                progress: projectile.progress(),
            })
            .collect()
    }

    /// Read-only snapshot describing all towers in identifier order.
    #[derive(Clone, Debug, Default)]
    pub struct TowerView {
        snapshots: Vec<TowerSnapshot>,
    }

    impl TowerView {
        /// Iterator over the captured tower snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<TowerSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single tower used by renderers.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TowerSnapshot {
        /// Identifier allocated to the tower by the world.
        pub id: TowerId,
        /// Centre of the tower.
        pub position: Vec2,
        /// Turret heading in radians, once a target was acquired.
        pub heading: Option<f32>,
        /// Current target reference.
        pub target: Option<EnemyId>,
        /// Seconds until the next shot.
        pub cooldown: f32,
        /// Active targeting mode.
        pub targeting: TargetingMode,
        /// Targeting radius.
        pub range: f32,
    }

    /// Read-only snapshot describing all enemies in insertion order.
    #[derive(Clone, Debug, Default)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured enemy snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy used by renderers.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier allocated to the enemy.
        pub id: EnemyId,
        /// Current position.
        pub position: Vec2,
        /// Remaining health.
        pub health: Health,
        /// Health at spawn.
        pub max_health: Health,
        /// Index of the waypoint the enemy walks toward.
        pub waypoint_index: usize,
        /// Hit-shake intensity at the current simulation time.
        pub hit_shake: f32,
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier allocated to the projectile.
        pub id: ProjectileId,
        /// Interpolated position.
        pub position: Vec2,
        /// Travel progress in `0.0..=1.0`.
        pub progress: f32,
    }
}

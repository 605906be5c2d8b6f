#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single entry point advancing a Rampart world by one frame.
//!
//! A tick advances the simulation clock and then runs the combat phases in a
//! fixed order:
//!
//! 1. targeting and aim
//! 2. cooldowns and firing
//! 3. projectile travel and impacts
//! 4. scheduled-effect flush
//! 5. enemy movement and leaks
//! 6. cleanup of defeated and leaked enemies and finished projectiles
//!
//! Every phase observes the clock at the end of the tick, so aftershocks
//! scheduled during the projectile phase are due relative to that instant.

use std::time::Duration;

use rampart_core::{seconds, Command, Event};
use rampart_system_damage::DamageResolver;
use rampart_system_effects::EffectRegistry;
use rampart_system_lifecycle::{Cleanup, Lifecycle};
use rampart_system_movement::Movement;
use rampart_system_projectiles::ProjectileSimulator;
use rampart_system_scheduled_effects::ScheduledEffects;
use rampart_system_tower_combat::TowerCombat;
use rampart_system_tower_targeting::TowerTargeting;
use rampart_world::{self as world, query, World};

/// Owns every combat phase and the effect registry they dispatch through.
#[derive(Debug)]
pub struct Simulation {
    registry: EffectRegistry,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: ProjectileSimulator,
    scheduled: ScheduledEffects,
    movement: Movement,
    lifecycle: Lifecycle,
}

impl Simulation {
    /// Creates a simulation dispatching the built-in effects.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(EffectRegistry::standard())
    }

    /// Creates a simulation dispatching the handlers in `registry`.
    #[must_use]
    pub fn with_registry(registry: EffectRegistry) -> Self {
        Self {
            registry,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            projectiles: ProjectileSimulator::new(),
            scheduled: ScheduledEffects::new(),
            movement: Movement::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Effect registry used for travel and impact dispatch.
    #[must_use]
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Mutable access for registering additional effect handlers.
    pub fn registry_mut(&mut self) -> &mut EffectRegistry {
        &mut self.registry
    }

    /// Advances `world` by `dt`, appending everything that happened to
    /// `out_events`.
    ///
    /// In builder mode only the clock moves.
    pub fn tick(&mut self, world: &mut World, dt: Duration, out_events: &mut Vec<Event>) -> Cleanup {
        world::apply(world, Command::Tick { dt }, out_events);
        let span = tracing::debug_span!(
            "tick",
            index = query::tick_index(world),
            dt_ms = dt.as_millis() as u64
        );
        let _entered = span.enter();

        let dt_seconds = seconds(dt);
        let mut frame = world.frame();

        self.targeting.handle(
            frame.play_mode,
            &mut *frame.towers,
            &*frame.enemies,
            dt_seconds,
        );
        self.combat.handle(
            frame.play_mode,
            &mut *frame.towers,
            &*frame.enemies,
            &mut *frame.projectiles,
            dt_seconds,
            out_events,
        );
        self.projectiles
            .handle(&mut frame, &self.registry, dt_seconds, out_events);

        let resolver = DamageResolver::new(frame.config, frame.now);
        self.scheduled.handle(
            frame.play_mode,
            &mut *frame.schedule,
            &mut *frame.enemies,
            &resolver,
            out_events,
        );
        self.movement.handle(
            frame.play_mode,
            frame.config,
            &mut *frame.enemies,
            &mut *frame.ledger,
            dt_seconds,
            out_events,
        );
        let cleanup = self.lifecycle.handle(
            frame.play_mode,
            &mut *frame.enemies,
            &mut *frame.towers,
            &mut *frame.projectiles,
            &mut *frame.ledger,
            out_events,
        );

        tracing::trace!(
            killed = cleanup.killed,
            leaked = cleanup.leaked,
            discarded = cleanup.discarded,
            projectiles = cleanup.projectiles,
            "tick finished"
        );
        cleanup
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{Command, EnemySpawn, Event, PlayMode, WaypointPath};
    use rampart_world::{self as world, query, World};

    use super::Simulation;

    #[test]
    fn builder_mode_only_moves_the_clock() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                spawn: EnemySpawn::new(
                    WaypointPath::from_points(vec![Vec2::ZERO, Vec2::new(400.0, 0.0)]),
                    10,
                    1.0,
                    0,
                ),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Builder,
            },
            &mut events,
        );
        events.clear();

        let mut simulation = Simulation::new();
        let _ = simulation.tick(&mut world, Duration::from_millis(500), &mut events);

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(500),
                now: Duration::from_millis(500),
            }]
        );
        assert_eq!(query::clock(&world), Duration::from_millis(500));
        assert_eq!(query::enemy_view(&world).into_vec()[0].position, Vec2::ZERO);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! End-of-tick cleanup of defeated and leaked enemies and finished projectiles.

use rampart_core::{Event, PlayMode};
use rampart_world::{Enemy, EnemyStore, Ledger, ProjectileStore, TowerRegistry};

/// Lifecycle phase that reuses its removal buffer across ticks.
#[derive(Debug, Default)]
pub struct Lifecycle {
    removed: Vec<Enemy>,
}

/// Entities discarded by one cleanup pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cleanup {
    /// Enemies defeated this tick.
    pub killed: usize,
    /// Leaked enemies removed this tick.
    pub leaked: usize,
    /// Dead enemies removed without ever being hit.
    pub discarded: usize,
    /// Completed projectiles removed this tick.
    pub projectiles: usize,
}

impl Lifecycle {
    /// Creates a lifecycle phase with an empty removal buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every enemy that is no longer live and every completed
    /// projectile.
    ///
    /// Defeated enemies credit their reward once, on removal. Leaked enemies
    /// were charged by the movement phase and are dropped silently, as are
    /// dead enemies that never took damage. Tower targets pointing at removed
    /// enemies are cleared.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        enemies: &mut EnemyStore,
        towers: &mut TowerRegistry,
        projectiles: &mut ProjectileStore,
        ledger: &mut Ledger,
        out_events: &mut Vec<Event>,
    ) -> Cleanup {
        if play_mode != PlayMode::Attack {
            return Cleanup::default();
        }

        let mut cleanup = Cleanup::default();
        self.removed.clear();
        enemies.drain_where(|enemy| !enemy.is_live(), &mut self.removed);
        for enemy in self.removed.drain(..) {
            if enemy.has_reached_end() {
                cleanup.leaked += 1;
                continue;
            }
            if enemy.last_hit().is_none() {
                cleanup.discarded += 1;
                tracing::debug!(enemy = enemy.id().get(), "enemy discarded unhit");
                continue;
            }

            cleanup.killed += 1;
            ledger.record_kill(enemy.reward());
            tracing::info!(
                enemy = enemy.id().get(),
                reward = enemy.reward(),
                gold = ledger.gold(),
                "enemy killed"
            );
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id(),
                reward: enemy.reward(),
            });
        }

        for tower in towers.iter_mut() {
            if let Some(target) = tower.target() {
                if enemies.live(target).is_none() {
                    tower.set_target(None);
                }
            }
        }

        cleanup.projectiles = projectiles.remove_completed();
        cleanup
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{
        DamageType, EffectsDescriptor, EnemyId, EnemySpawn, TargetingMode, TowerDefinition,
        WaypointPath,
    };
    use rampart_world::ProjectileLaunch;

    use super::*;

    struct Fixture {
        enemies: EnemyStore,
        towers: TowerRegistry,
        projectiles: ProjectileStore,
        ledger: Ledger,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                enemies: EnemyStore::new(),
                towers: TowerRegistry::new(),
                projectiles: ProjectileStore::new(),
                ledger: Ledger::new(10, 0),
            }
        }

        fn spawn(&mut self, health: u32, reward: u32) -> EnemyId {
            self.enemies.spawn(EnemySpawn::new(
                WaypointPath::from_points(vec![Vec2::ZERO, Vec2::new(100.0, 0.0)]),
                health,
                1.0,
                reward,
            ))
        }

        fn run(&mut self, lifecycle: &mut Lifecycle) -> (Cleanup, Vec<Event>) {
            let mut events = Vec::new();
            let cleanup = lifecycle.handle(
                PlayMode::Attack,
                &mut self.enemies,
                &mut self.towers,
                &mut self.projectiles,
                &mut self.ledger,
                &mut events,
            );
            (cleanup, events)
        }
    }

    #[test]
    fn defeated_enemies_pay_out_once() {
        let mut fixture = Fixture::new();
        let doomed = fixture.spawn(5, 12);
        let survivor = fixture.spawn(5, 3);
        let applied = fixture
            .enemies
            .get_mut(doomed)
            .map(|enemy| enemy.take_damage(9, Duration::ZERO));
        assert_eq!(applied, Some(5));

        let mut lifecycle = Lifecycle::new();
        let (cleanup, events) = fixture.run(&mut lifecycle);
        assert_eq!(cleanup.killed, 1);
        assert_eq!(
            events,
            vec![Event::EnemyKilled {
                enemy: doomed,
                reward: 12
            }]
        );
        assert_eq!(fixture.ledger.gold(), 12);

        let (again, events) = fixture.run(&mut lifecycle);
        assert_eq!(again, Cleanup::default());
        assert!(events.is_empty());
        assert_eq!(fixture.ledger.gold(), 12);
        assert!(fixture.enemies.get(survivor).is_some());
        assert_eq!(fixture.enemies.len(), 1);
    }

    #[test]
    fn zero_health_spawn_is_discarded_without_reward() {
        let mut fixture = Fixture::new();
        let stillborn = fixture.spawn(0, 25);
        assert!(fixture
            .enemies
            .get(stillborn)
            .is_some_and(|enemy| !enemy.is_live()));

        let (cleanup, events) = fixture.run(&mut Lifecycle::new());

        assert_eq!(
            cleanup,
            Cleanup {
                discarded: 1,
                ..Cleanup::default()
            }
        );
        assert!(events.is_empty());
        assert_eq!(fixture.ledger.gold(), 0);
        assert_eq!(fixture.ledger.kills(), 0);
        assert!(fixture.enemies.is_empty());
    }

    #[test]
    fn leaked_enemies_leave_without_reward() {
        let mut fixture = Fixture::new();
        let leaked = fixture.spawn(5, 40);
        let _ = fixture
            .enemies
            .get_mut(leaked)
            .map(|enemy| enemy.mark_reached_end());

        let (cleanup, events) = fixture.run(&mut Lifecycle::new());

        assert_eq!(cleanup.leaked, 1);
        assert!(events.is_empty());
        assert_eq!(fixture.ledger.gold(), 0);
        assert!(fixture.enemies.is_empty());
    }

    #[test]
    fn stale_tower_targets_are_cleared() {
        let mut fixture = Fixture::new();
        let doomed = fixture.spawn(5, 0);
        let tower = fixture.towers.insert(
            Vec2::ZERO,
            TowerDefinition::default(),
            TargetingMode::Closest,
        );
        if let Some(tower) = fixture.towers.get_mut(tower) {
            tower.set_target(Some(doomed));
        }
        if let Some(enemy) = fixture.enemies.get_mut(doomed) {
            enemy.mark_dead();
        }

        let _ = fixture.run(&mut Lifecycle::new());

        assert_eq!(fixture.towers.get(tower).and_then(|tower| tower.target()), None);
    }

    #[test]
    fn completed_projectiles_are_removed() {
        let mut fixture = Fixture::new();
        let launch = ProjectileLaunch {
            source: None,
            origin: Vec2::ZERO,
            target_point: Vec2::new(10.0, 0.0),
            target: None,
            damage: 1.0,
            damage_type: DamageType::Physical,
            aoe_radius: None,
            speed: None,
            effects: EffectsDescriptor::new(),
            cluster_child: false,
        };
        let finished = fixture.projectiles.launch(launch.clone());
        let _ = fixture.projectiles.launch(launch);
        if let Some(projectile) = fixture
            .projectiles
            .iter_mut()
            .find(|projectile| projectile.id() == finished)
        {
            projectile.mark_complete();
        }

        let (cleanup, _) = fixture.run(&mut Lifecycle::new());

        assert_eq!(cleanup.projectiles, 1);
        assert_eq!(fixture.projectiles.len(), 1);
        assert!(fixture.projectiles.get(finished).is_none());
    }

    #[test]
    fn builder_mode_keeps_everything() {
        let mut fixture = Fixture::new();
        let doomed = fixture.spawn(5, 1);
        if let Some(enemy) = fixture.enemies.get_mut(doomed) {
            enemy.mark_dead();
        }
        let mut events = Vec::new();

        let cleanup = Lifecycle::new().handle(
            PlayMode::Builder,
            &mut fixture.enemies,
            &mut fixture.towers,
            &mut fixture.projectiles,
            &mut fixture.ledger,
            &mut events,
        );

        assert_eq!(cleanup, Cleanup::default());
        assert_eq!(fixture.enemies.len(), 1);
    }
}

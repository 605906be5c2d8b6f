#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fire phase: cooldown bookkeeping and projectile launches for ready towers.

use rampart_core::{EnemyId, Event, PlayMode, TowerId};
use rampart_world::{EnemyStore, ProjectileLaunch, ProjectileStore, TowerRegistry};

/// Tower combat system that launches projectiles for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<(TowerId, EnemyId, ProjectileLaunch)>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every cooldown down by `dt_seconds` and fires ready towers at
    /// their current target.
    ///
    /// A target reference is re-validated before use; a tower whose target is
    /// gone stays ready without firing. Firing snapshots the target's current
    /// position and restarts the cooldown at `1 / attack_rate`.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        towers: &mut TowerRegistry,
        enemies: &EnemyStore,
        projectiles: &mut ProjectileStore,
        dt_seconds: f32,
        out_events: &mut Vec<Event>,
    ) {
        if play_mode != PlayMode::Attack {
            return;
        }

        self.scratch.clear();
        for tower in towers.iter_mut() {
            tower.cool_down(dt_seconds);
            if !tower.is_ready() {
                continue;
            }

            let Some(target) = tower.target() else {
                continue;
            };
            let Some(enemy) = enemies.live(target) else {
                tower.set_target(None);
                continue;
            };

            let definition = tower.definition();
            self.scratch.push((
                tower.id(),
                target,
                ProjectileLaunch {
                    source: Some(tower.id()),
                    origin: tower.position(),
                    target_point: enemy.position(),
                    target: Some(target),
                    damage: definition.damage,
                    damage_type: definition.damage_type,
                    aoe_radius: definition.aoe_radius,
                    speed: definition.projectile_speed,
                    effects: definition.effects.clone(),
                    cluster_child: false,
                },
            ));
            tower.reset_cooldown();
        }

        for (tower, target, launch) in self.scratch.drain(..) {
            let projectile = projectiles.launch(launch);
            tracing::trace!(
                tower = tower.get(),
                target = target.get(),
                projectile = projectile.get(),
                "projectile fired"
            );
            out_events.push(Event::ProjectileFired {
                projectile,
                tower,
                target,
            });
        }
    }
}

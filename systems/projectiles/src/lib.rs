#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile travel and impact resolution.
//!
//! Every tick a projectile advances its progress by `dt × speed` and is drawn
//! at the linear interpolation between its origin and the point snapshotted
//! when it was fired. While in flight it runs its travel effects. On reaching
//! the destination it takes exactly one damage path, an area sweep when it
//! carries an AoE radius and a direct hit on its still-live target otherwise,
//! then dispatches its impact effects and completes.

use rampart_core::{positive_or, Event, PlayMode};
use rampart_system_damage::{DamageResolver, Hit};
use rampart_system_effects::{EffectRegistry, Impact, ImpactContext};
use rampart_world::{Projectile, ProjectileLaunch, WorldFrame};

/// Projectile phase that reuses its launch buffer across ticks.
#[derive(Debug, Default)]
pub struct ProjectileSimulator {
    pending: Vec<ProjectileLaunch>,
}

impl ProjectileSimulator {
    /// Creates a projectile phase with an empty launch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every projectile in flight by `dt_seconds`.
    ///
    /// Projectiles forked during the pass are put into flight after it and
    /// first move on the next tick.
    pub fn handle(
        &mut self,
        frame: &mut WorldFrame<'_>,
        registry: &EffectRegistry,
        dt_seconds: f32,
        out_events: &mut Vec<Event>,
    ) {
        if frame.play_mode != PlayMode::Attack || frame.projectiles.is_empty() {
            return;
        }

        let resolver = DamageResolver::new(frame.config, frame.now);
        let default_speed = frame.config.default_projectile_speed;
        self.pending.clear();

        for projectile in frame.projectiles.iter_mut() {
            if projectile.is_complete() {
                continue;
            }

            let speed = projectile
                .launch()
                .speed
                .map_or(default_speed, |speed| positive_or(speed, default_speed));
            if projectile.advance(dt_seconds * speed) < 1.0 {
                registry.dispatch_travel(projectile, dt_seconds, out_events);
                continue;
            }

            let mut context = ImpactContext {
                enemies: &mut *frame.enemies,
                resolver: &resolver,
                schedule: &mut *frame.schedule,
                rng: &mut *frame.rng,
                launches: &mut self.pending,
                events: &mut *out_events,
            };
            resolve(projectile, registry, &mut context);
        }

        for launch in self.pending.drain(..) {
            let _ = frame.projectiles.launch(launch);
        }
    }
}

fn resolve(projectile: &mut Projectile, registry: &EffectRegistry, context: &mut ImpactContext<'_>) {
    let launch = projectile.launch();
    let hit = Hit::new(launch.damage, launch.damage_type);

    let dealt = match launch.aoe_radius {
        Some(radius) => context.resolver.sweep(
            context.enemies,
            launch.target_point,
            radius,
            hit,
            context.events,
        ),
        None => {
            let target = match launch.target {
                Some(target) => context.enemies.live_mut(target),
                None => None,
            };
            if let Some(enemy) = target {
                u64::from(context.resolver.apply(enemy, hit, context.events))
            } else {
                0
            }
        }
    };

    let impact = Impact {
        point: launch.target_point,
        hit,
        aoe_radius: launch.aoe_radius,
        target: launch.target,
        cluster_child: launch.cluster_child,
    };
    registry.dispatch_impact(&launch.effects, &impact, context);

    tracing::debug!(
        projectile = projectile.id().get(),
        dealt,
        aoe = launch.aoe_radius.is_some(),
        "projectile resolved"
    );
    context.events.push(Event::ProjectileResolved {
        projectile: projectile.id(),
        position: impact.point,
    });
    projectile.mark_complete();
}

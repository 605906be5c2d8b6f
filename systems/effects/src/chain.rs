use glam::Vec2;
use rampart_core::{
    ChainParams, EffectKind, EffectParams, EnemyId, Event, VisualEffect, MAX_CHAIN_JUMPS,
};
use rampart_world::EnemyStore;

use crate::{Impact, ImpactContext, ImpactHandler};

/// Hops damage between nearby enemies, decaying it after every hop.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChainHandler;

impl ImpactHandler for ChainHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Chain
    }

    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>) {
        let EffectParams::Chain(params) = params else {
            return;
        };

        let mut visited: Vec<EnemyId> = Vec::new();
        let mut origin = impact.point;
        let mut hit = impact.hit;

        for hop in 0..params.max_jumps.min(MAX_CHAIN_JUMPS) {
            let Some(next) = next_hop(context.enemies, origin, &visited, impact.target, params)
            else {
                break;
            };
            let Some(enemy) = context.enemies.get_mut(next) else {
                break;
            };
            if context.resolver.compute(enemy, hit, 1.0) == 0 {
                break;
            }

            let position = enemy.position();
            let applied = context.resolver.apply(enemy, hit, context.events);
            context.events.push(Event::Visual {
                effect: VisualEffect::BoltSegment {
                    from: origin,
                    to: position,
                    hop,
                },
            });
            tracing::trace!(hop, enemy = next.get(), applied, "chain hop");

            visited.push(next);
            origin = position;
            hit = hit.scaled(params.damage_falloff);
        }
    }
}

/// Nearest unvisited live enemy within the jump radius of `origin`.
///
/// When new targets are preferred, the projectile's own target is only
/// chosen if no other enemy qualifies. Ties go to the enemy met first in
/// insertion order.
fn next_hop(
    enemies: &EnemyStore,
    origin: Vec2,
    visited: &[EnemyId],
    primary: Option<EnemyId>,
    params: &ChainParams,
) -> Option<EnemyId> {
    let mut best: Option<(f32, EnemyId)> = None;
    let mut fallback: Option<EnemyId> = None;

    for enemy in enemies.iter_live() {
        if visited.contains(&enemy.id()) {
            continue;
        }
        let distance = enemy.position().distance(origin);
        if distance > params.jump_radius {
            continue;
        }
        if params.prefer_new_targets && primary == Some(enemy.id()) {
            fallback = Some(enemy.id());
            continue;
        }
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, enemy.id()));
        }
    }

    best.map(|(_, id)| id).or(fallback)
}

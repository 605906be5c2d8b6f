use std::f32::consts::TAU;

use glam::Vec2;
use rampart_core::{EffectKind, EffectParams};
use rampart_system_damage::falloff;
use rampart_world::{Enemy, SimRng};
use rand::Rng;

use crate::{Impact, ImpactContext, ImpactHandler};

/// Pushes live enemies around the impact point along their direction of travel.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnockbackHandler;

impl ImpactHandler for KnockbackHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Knockback
    }

    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>) {
        let EffectParams::Knockback(params) = params else {
            return;
        };

        let radius = impact.area_radius(params.radius);
        for enemy in context.enemies.iter_live_mut() {
            let impulse = params.max_push * falloff(enemy.position().distance(impact.point), radius);
            if impulse <= 0.0 {
                continue;
            }

            let direction = push_direction(enemy, impact.point, context.rng);
            enemy.displace(direction * impulse);
            tracing::trace!(enemy = enemy.id().get(), impulse, "knockback");
        }
    }
}

/// Unit vector along which `enemy` is pushed by an impact at `center`.
///
/// The first non-zero vector of, in order: the enemy's velocity, the vector
/// toward its next waypoint, and its previous-tick displacement. When all
/// three are zero and the enemy is off-centre the push is radial away from
/// `center`; an enemy sitting exactly on `center` is pushed in a random
/// direction.
pub(crate) fn push_direction(enemy: &Enemy, center: Vec2, rng: &mut SimRng) -> Vec2 {
    if let Some(travel) = travel_direction(enemy) {
        return travel;
    }
    if let Some(radial) = (enemy.position() - center).try_normalize() {
        return radial;
    }
    Vec2::from_angle(rng.gen_range(0.0..TAU))
}

fn travel_direction(enemy: &Enemy) -> Option<Vec2> {
    enemy
        .velocity()
        .try_normalize()
        .or_else(|| {
            enemy
                .next_waypoint()
                .and_then(|waypoint| (waypoint - enemy.position()).try_normalize())
        })
        .or_else(|| (enemy.position() - enemy.previous_position()).try_normalize())
}

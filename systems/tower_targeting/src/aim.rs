//! Bounded-rate turret rotation.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rampart_world::Tower;

/// Wraps `angle` into `(−π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `(−π, π]`.
#[must_use]
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Turns `tower` toward `target` by at most `rotation_speed × dt_seconds`.
///
/// The first acquisition snaps the heading. Without a target the heading is
/// left as is.
pub fn aim_tower(tower: &mut Tower, target: Option<Vec2>, dt_seconds: f32) {
    let Some(target) = target else {
        return;
    };

    let offset = target - tower.position();
    let desired = offset.y.atan2(offset.x);
    let Some(current) = tower.heading() else {
        tower.set_heading(desired);
        return;
    };

    let max_step = (tower.definition().rotation_speed * dt_seconds).max(0.0);
    let step = shortest_angle(current, desired).clamp(-max_step, max_step);
    tower.set_heading(wrap_angle(current + step));
}

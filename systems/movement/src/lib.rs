#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along their waypoint paths.
//!
//! An enemy's speed is expressed in path cells per second. Each tick it is
//! turned into a pixel budget that is spent across as many waypoints as it
//! covers, so fast enemies and long frames never cut corners or overshoot.

use glam::Vec2;
use rampart_core::{CombatConfig, Event, PlayMode};
use rampart_world::{pixel_budget, Enemy, EnemyStore, Ledger};

/// Outcome of spending a movement budget on one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stride {
    /// The budget ran out before the final waypoint.
    Walking,
    /// The enemy stands on its final waypoint.
    ReachedEnd,
}

/// Movement phase advancing every live enemy once per tick.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates the movement phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Walks every live enemy for `dt_seconds` and charges leaks to `ledger`.
    ///
    /// A leaking enemy is flagged once; only that first flag deducts lives.
    /// Leaked enemies are no longer live and are skipped on later ticks.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        config: &CombatConfig,
        enemies: &mut EnemyStore,
        ledger: &mut Ledger,
        dt_seconds: f32,
        out_events: &mut Vec<Event>,
    ) {
        if play_mode != PlayMode::Attack {
            return;
        }

        for enemy in enemies.iter_live_mut() {
            enemy.begin_motion();
            let budget = pixel_budget(enemy.speed(), config.cell_size, dt_seconds);
            let stride = walk(enemy, budget);
            enemy.finish_motion(dt_seconds);

            if stride == Stride::ReachedEnd && enemy.mark_reached_end() {
                let lives_lost = ledger.record_leak(config.leak_cost);
                tracing::info!(
                    enemy = enemy.id().get(),
                    lives_lost,
                    lives = ledger.lives(),
                    "enemy leaked"
                );
                out_events.push(Event::EnemyLeaked {
                    enemy: enemy.id(),
                    lives_lost,
                });
            }
        }
    }
}

/// Spends `budget` pixels moving `enemy` along its path.
///
/// While budget remains the enemy snaps to every waypoint it can reach,
/// subtracting the covered distance, and otherwise moves the remaining
/// distance straight toward the current waypoint. The waypoint index stays
/// pinned at the final waypoint. An empty path counts as already walked.
pub fn walk(enemy: &mut Enemy, budget: f32) -> Stride {
    let mut remaining = budget.max(0.0);
    loop {
        let Some(waypoint) = enemy.path().get(enemy.waypoint_index()) else {
            return Stride::ReachedEnd;
        };

        let offset: Vec2 = waypoint - enemy.position();
        let distance = offset.length();
        if distance <= remaining {
            enemy.move_to(waypoint);
            remaining -= distance;
            if enemy.waypoint_index() + 1 >= enemy.path().len() {
                return Stride::ReachedEnd;
            }
            enemy.advance_waypoint();
        } else {
            enemy.move_to(enemy.position() + offset * (remaining / distance));
            return Stride::Walking;
        }
    }
}

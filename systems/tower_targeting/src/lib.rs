#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic target selection and turret aiming for every placed tower.
//!
//! Each tick every tower re-selects among the live enemies inside its range
//! according to its [`TargetingMode`], stores the choice as a non-owning
//! reference and turns its turret toward it at a bounded angular rate.
//! Ties resolve to the enemy met first in insertion (spawn) order.

mod aim;

use glam::Vec2;
use rampart_core::{EnemyId, PlayMode, TargetingMode};
use rampart_world::{EnemyStore, Tower, TowerRegistry};

pub use aim::{aim_tower, shortest_angle, wrap_angle};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-selects the target of every tower and rotates its turret.
    ///
    /// Towers without an eligible enemy drop their target and keep their
    /// heading.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        towers: &mut TowerRegistry,
        enemies: &EnemyStore,
        dt_seconds: f32,
    ) {
        if play_mode != PlayMode::Attack || towers.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter_mut() {
            let selected = select_from(
                tower.position(),
                tower.definition().range,
                tower.targeting(),
                &self.enemy_workspace,
            );
            tower.set_target(selected.map(|candidate| candidate.id));
            aim_tower(tower, selected.map(|candidate| candidate.position), dt_seconds);
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyStore) {
        self.enemy_workspace.clear();
        self.enemy_workspace
            .extend(enemies.iter_live().map(|enemy| EnemyCandidate {
                id: enemy.id(),
                position: enemy.position(),
                progress: enemy.waypoint_index(),
                health: enemy.health().get(),
            }));
    }
}

/// Chooses the enemy `tower` should engage, if any is live and in range.
#[must_use]
pub fn select_target(tower: &Tower, enemies: &EnemyStore) -> Option<EnemyId> {
    let candidates: Vec<_> = enemies
        .iter_live()
        .map(|enemy| EnemyCandidate {
            id: enemy.id(),
            position: enemy.position(),
            progress: enemy.waypoint_index(),
            health: enemy.health().get(),
        })
        .collect();
    select_from(
        tower.position(),
        tower.definition().range,
        tower.targeting(),
        &candidates,
    )
    .map(|candidate| candidate.id)
}

fn select_from(
    origin: Vec2,
    range: f32,
    mode: TargetingMode,
    candidates: &[EnemyCandidate],
) -> Option<EnemyCandidate> {
    let max_distance_sq = range * range;
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        let distance_sq = candidate.position.distance_squared(origin);
        if !(distance_sq <= max_distance_sq) {
            continue;
        }

        let current = BestCandidate {
            candidate: *candidate,
            distance_sq,
        };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing, mode) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|best| best.candidate)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    progress: usize,
    health: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    candidate: EnemyCandidate,
    distance_sq: f32,
}

impl BestCandidate {
    /// Strict ordering: an equal candidate never displaces the incumbent, so
    /// the first one met wins ties.
    fn precedes(&self, other: &Self, mode: TargetingMode) -> bool {
        match mode {
            TargetingMode::Closest => self.distance_sq < other.distance_sq,
            TargetingMode::First => self.candidate.progress > other.candidate.progress,
            TargetingMode::Last => self.candidate.progress < other.candidate.progress,
            TargetingMode::Strongest => self.candidate.health > other.candidate.health,
            TargetingMode::Weakest => self.candidate.health < other.candidate.health,
        }
    }
}

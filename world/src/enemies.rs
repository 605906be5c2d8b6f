//! Authoritative enemy state and the live enemy collection.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{positive_or, DamageMultipliers, EnemyId, EnemySpawn, Health, WaypointPath};

/// Speed used when a spawner hands over a malformed value, in cells per second.
pub const DEFAULT_ENEMY_SPEED: f32 = 1.0;

/// Window over which the hit-shake feedback decays to zero.
pub const HIT_SHAKE_WINDOW: Duration = Duration::from_millis(250);

/// Most recent hit landed on an enemy. Presentation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitRecord {
    /// Simulation time of the hit.
    pub at: Duration,
    /// Health removed by the hit.
    pub amount: u32,
}

/// A single enemy walking its waypoint path.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    position: Vec2,
    previous_position: Vec2,
    velocity: Vec2,
    path: WaypointPath,
    waypoint_index: usize,
    speed: f32,
    health: Health,
    max_health: Health,
    reward: u32,
    multipliers: DamageMultipliers,
    marked_dead: bool,
    reached_end: bool,
    last_hit: Option<HitRecord>,
}

impl Enemy {
    fn from_spawn(id: EnemyId, spawn: EnemySpawn) -> Self {
        let position = spawn.path.get(0).unwrap_or(Vec2::ZERO);
        let speed = if spawn.speed.is_finite() && spawn.speed >= 0.0 {
            spawn.speed
        } else {
            tracing::warn!(enemy = id.get(), speed = spawn.speed, "malformed enemy speed");
            DEFAULT_ENEMY_SPEED
        };
        let health = Health::new(spawn.health);

        Self {
            id,
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            path: spawn.path,
            waypoint_index: 0,
            speed,
            health,
            max_health: health,
            reward: spawn.reward,
            multipliers: spawn.multipliers,
            marked_dead: spawn.health == 0,
            reached_end: false,
            last_hit: None,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Current position in world pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Position at the start of the latest movement phase.
    #[must_use]
    pub const fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Displacement per second measured over the latest movement phase.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Route the enemy follows.
    #[must_use]
    pub const fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Index of the waypoint the enemy is walking toward.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Waypoint the enemy is walking toward, if the path is not exhausted.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<Vec2> {
        if self.reached_end {
            return None;
        }
        self.path.get(self.waypoint_index)
    }

    /// Walking speed in path cells per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Gold credited when the enemy is defeated.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Damage-type multipliers of the enemy.
    #[must_use]
    pub const fn multipliers(&self) -> &DamageMultipliers {
        &self.multipliers
    }

    /// Reports whether the enemy was defeated.
    #[must_use]
    pub const fn is_marked_dead(&self) -> bool {
        self.marked_dead
    }

    /// Reports whether the enemy leaked.
    #[must_use]
    pub const fn has_reached_end(&self) -> bool {
        self.reached_end
    }

    /// Reports whether the enemy can still be targeted, hit or moved.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.marked_dead && !self.reached_end && !self.health.is_zero()
    }

    /// Most recent hit, if any.
    #[must_use]
    pub const fn last_hit(&self) -> Option<HitRecord> {
        self.last_hit
    }

    /// Hit-shake intensity in `0.0..=1.0` at simulation time `now`.
    #[must_use]
    pub fn hit_shake(&self, now: Duration) -> f32 {
        let Some(hit) = self.last_hit else {
            return 0.0;
        };
        let elapsed = now.saturating_sub(hit.at);
        if elapsed >= HIT_SHAKE_WINDOW {
            return 0.0;
        }
        1.0 - elapsed.as_secs_f32() / HIT_SHAKE_WINDOW.as_secs_f32()
    }

    /// Removes `amount` health, clamped to what remains.
    ///
    /// Returns the health actually removed. A zero result records nothing.
    /// Reaching zero health marks the enemy dead.
    pub fn take_damage(&mut self, amount: u32, now: Duration) -> u32 {
        let applied = amount.min(self.health.get());
        if applied == 0 {
            return 0;
        }

        self.health = self.health.saturating_sub(applied);
        self.last_hit = Some(HitRecord { at: now, amount: applied });
        if self.health.is_zero() {
            self.marked_dead = true;
        }
        applied
    }

    /// Flags the enemy as defeated regardless of its health.
    pub fn mark_dead(&mut self) {
        self.marked_dead = true;
    }

    /// Flags the enemy as leaked. Returns `true` only on the first call.
    pub fn mark_reached_end(&mut self) -> bool {
        if self.reached_end {
            return false;
        }
        self.reached_end = true;
        true
    }

    /// Moves the enemy by `offset` without touching its path progress.
    pub fn displace(&mut self, offset: Vec2) {
        if offset.is_finite() {
            self.position += offset;
        }
    }

    /// Starts a movement phase, remembering where the enemy stood.
    pub fn begin_motion(&mut self) {
        self.previous_position = self.position;
    }

    /// Places the enemy at `position` during a movement phase.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Advances the waypoint cursor. The cursor never moves past the last waypoint.
    pub fn advance_waypoint(&mut self) {
        if self.waypoint_index + 1 < self.path.len() {
            self.waypoint_index += 1;
        }
    }

    /// Ends a movement phase, deriving the velocity from the covered distance.
    pub fn finish_motion(&mut self, dt_seconds: f32) {
        self.velocity = if dt_seconds > 0.0 {
            (self.position - self.previous_position) / dt_seconds
        } else {
            Vec2::ZERO
        };
    }
}

/// Live enemies in insertion order.
///
/// Identifiers are allocated monotonically, so insertion order equals
/// identifier order and lookups can binary search.
#[derive(Clone, Debug, Default)]
pub struct EnemyStore {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a new enemy and returns its identifier.
    pub fn spawn(&mut self, spawn: EnemySpawn) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.enemies.push(Enemy::from_spawn(id, spawn));
        id
    }

    /// Number of stored enemies, including ones awaiting cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Enemy with the provided identifier, live or not.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.index_of(id).map(|index| &self.enemies[index])
    }

    /// Mutable enemy with the provided identifier, live or not.
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.index_of(id).map(|index| &mut self.enemies[index])
    }

    /// Enemy with the provided identifier if it can still be targeted.
    #[must_use]
    pub fn live(&self, id: EnemyId) -> Option<&Enemy> {
        self.get(id).filter(|enemy| enemy.is_live())
    }

    /// Mutable enemy with the provided identifier if it can still be hit.
    pub fn live_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.get_mut(id).filter(|enemy| enemy.is_live())
    }

    /// Iterator over every stored enemy in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Mutable iterator over every stored enemy in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Iterator over live enemies in insertion order.
    pub fn iter_live(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.is_live())
    }

    /// Mutable iterator over live enemies in insertion order.
    pub fn iter_live_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut().filter(|enemy| enemy.is_live())
    }

    /// Removes every enemy matching `predicate`, appending them to `out` in
    /// insertion order.
    pub fn drain_where<F>(&mut self, mut predicate: F, out: &mut Vec<Enemy>)
    where
        F: FnMut(&Enemy) -> bool,
    {
        let mut kept = Vec::with_capacity(self.enemies.len());
        for enemy in self.enemies.drain(..) {
            if predicate(&enemy) {
                out.push(enemy);
            } else {
                kept.push(enemy);
            }
        }
        self.enemies = kept;
    }

    fn index_of(&self, id: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
    }
}

/// Converts a speed in path cells per second into a pixel budget for `dt_seconds`.
#[must_use]
pub fn pixel_budget(speed: f32, cell_size: f32, dt_seconds: f32) -> f32 {
    let speed = if speed.is_finite() && speed >= 0.0 {
        speed
    } else {
        DEFAULT_ENEMY_SPEED
    };
    let budget = speed * positive_or(cell_size, 1.0) * dt_seconds;
    if budget.is_finite() {
        budget.max(0.0)
    } else {
        0.0
    }
}

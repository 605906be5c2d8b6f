//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use rampart_core::{EnemyId, TargetingMode, TowerDefinition, TowerId};

/// A placed tower as seen by the combat phases.
///
/// The placement subsystem owns the tower's existence and definition; the
/// simulation only mutates cooldown, heading and target.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    position: Vec2,
    definition: TowerDefinition,
    targeting: TargetingMode,
    heading: Option<f32>,
    cooldown: f32,
    target: Option<EnemyId>,
}

impl Tower {
    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Centre of the tower in world pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Static combat definition.
    #[must_use]
    pub const fn definition(&self) -> &TowerDefinition {
        &self.definition
    }

    /// Active targeting mode.
    #[must_use]
    pub const fn targeting(&self) -> TargetingMode {
        self.targeting
    }

    /// Turret heading in radians; `None` until the first target is acquired.
    #[must_use]
    pub const fn heading(&self) -> Option<f32> {
        self.heading
    }

    /// Seconds until the tower may fire again. Zero or below means ready.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Non-owning reference to the current target. Validate before use.
    #[must_use]
    pub const fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Reports whether the cooldown elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Replaces the current target reference.
    pub fn set_target(&mut self, target: Option<EnemyId>) {
        self.target = target;
    }

    /// Replaces the turret heading.
    pub fn set_heading(&mut self, heading: f32) {
        if heading.is_finite() {
            self.heading = Some(heading);
        }
    }

    /// Counts the cooldown down by `dt_seconds`, resting at zero.
    pub fn cool_down(&mut self, dt_seconds: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt_seconds).max(0.0);
        }
    }

    /// Restarts the cooldown after a shot.
    pub fn reset_cooldown(&mut self) {
        self.cooldown = self.definition.reload_seconds();
    }

    pub(crate) fn set_targeting(&mut self, targeting: TargetingMode) {
        self.targeting = targeting;
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug, Default)]
pub struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new tower, returning its identifier.
    ///
    /// The definition is sanitised; a fresh tower is ready to fire.
    pub fn insert(
        &mut self,
        position: Vec2,
        definition: TowerDefinition,
        targeting: TargetingMode,
    ) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        let tower = Tower {
            id,
            position,
            definition: definition.sanitized(),
            targeting,
            heading: None,
            cooldown: 0.0,
            target: None,
        };
        let _ = self.entries.insert(id, tower);
        id
    }

    /// Removes the tower with the provided identifier.
    pub fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    /// Tower with the provided identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Mutable tower with the provided identifier.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Towers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Mutable towers in identifier order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Number of placed towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no tower is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

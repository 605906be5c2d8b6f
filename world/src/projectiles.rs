//! Projectiles in flight.

use glam::Vec2;
use rampart_core::{DamageType, EffectsDescriptor, EnemyId, ProjectileId, TowerId};

/// Everything needed to put a projectile into flight.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Tower that fired, if any. Cluster children have none.
    pub source: Option<TowerId>,
    /// Launch point.
    pub origin: Vec2,
    /// Destination snapshotted at fire time.
    pub target_point: Vec2,
    /// Enemy the projectile was aimed at. May die while the projectile flies.
    pub target: Option<EnemyId>,
    /// Base damage.
    pub damage: f32,
    /// Type of the damage.
    pub damage_type: DamageType,
    /// Area sweep radius on impact; `None` resolves as a direct hit.
    pub aoe_radius: Option<f32>,
    /// Progress per second; `None` uses the configured default.
    pub speed: Option<f32>,
    /// Effects dispatched during flight and on impact.
    pub effects: EffectsDescriptor,
    /// Marks children forked by a cluster, which never fork again.
    pub cluster_child: bool,
}

/// A projectile interpolating from its origin to a snapshotted point.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    launch: ProjectileLaunch,
    progress: f32,
    trail_elapsed: f32,
    complete: bool,
}

impl Projectile {
    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Parameters the projectile was launched with.
    #[must_use]
    pub const fn launch(&self) -> &ProjectileLaunch {
        &self.launch
    }

    /// Travel progress in `0.0..=1.0`.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Current interpolated position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.launch
            .origin
            .lerp(self.launch.target_point, self.progress.clamp(0.0, 1.0))
    }

    /// Reports whether the projectile resolved and awaits removal.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Adds `delta` to the progress, clamped to `1.0`. Returns the new progress.
    ///
    /// Negative or non-finite deltas leave the progress untouched.
    pub fn advance(&mut self, delta: f32) -> f32 {
        if delta.is_finite() && delta > 0.0 {
            self.progress = (self.progress + delta).min(1.0);
        }
        self.progress
    }

    /// Flags the projectile as resolved.
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Seconds of flight accumulated toward the next trail particle.
    pub fn trail_elapsed_mut(&mut self) -> &mut f32 {
        &mut self.trail_elapsed
    }
}

/// Projectiles in launch order.
#[derive(Clone, Debug, Default)]
pub struct ProjectileStore {
    projectiles: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a projectile into flight and returns its identifier.
    pub fn launch(&mut self, launch: ProjectileLaunch) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.projectiles.push(Projectile {
            id,
            launch,
            progress: 0.0,
            trail_elapsed: 0.0,
            complete: false,
        });
        id
    }

    /// Projectile with the provided identifier.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles
            .binary_search_by_key(&id, |projectile| projectile.id)
            .ok()
            .map(|index| &self.projectiles[index])
    }

    /// Projectiles in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Mutable projectiles in launch order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.projectiles.iter_mut()
    }

    /// Number of stored projectiles, including resolved ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Drops resolved projectiles, returning how many were removed.
    pub fn remove_completed(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|projectile| !projectile.complete);
        before - self.projectiles.len()
    }
}

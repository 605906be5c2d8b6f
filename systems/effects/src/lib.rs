#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Registry-dispatched projectile effects.
//!
//! An [`EffectsDescriptor`] enables an effect by carrying its key. The
//! [`EffectRegistry`] maps each key to a small handler and dispatches the
//! enabled ones: travel handlers every tick a projectile is in flight, impact
//! handlers once when it resolves. Adding an effect means registering a new
//! handler; no projectile or tower code branches on effect names.

mod aftershock;
mod chain;
mod cluster;
mod explosion;
mod knockback;
mod trail;

use std::fmt;

use glam::Vec2;
use rampart_core::{EffectKind, EffectParams, EffectsDescriptor, EnemyId, Event};
use rampart_system_damage::{DamageResolver, Hit};
use rampart_world::{EnemyStore, Projectile, ProjectileLaunch, ScheduledEffectQueue, SimRng};

pub use aftershock::AftershockHandler;
pub use chain::ChainHandler;
pub use cluster::ClusterHandler;
pub use explosion::ExplosionHandler;
pub use knockback::KnockbackHandler;
pub use trail::TrailHandler;

/// Radius used by area effects when neither the effect nor the projectile
/// configures one.
pub const FALLBACK_EFFECT_RADIUS: f32 = 32.0;

/// Description of a resolving projectile handed to impact handlers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Point where the projectile resolved.
    pub point: Vec2,
    /// Damage the projectile carried.
    pub hit: Hit,
    /// Area radius of the projectile, if it had one.
    pub aoe_radius: Option<f32>,
    /// Enemy the projectile was aimed at. Not validated.
    pub target: Option<EnemyId>,
    /// Whether the projectile was itself forked by a cluster.
    pub cluster_child: bool,
}

impl Impact {
    /// Radius for an area effect: the explicit value, else the projectile's.
    #[must_use]
    pub fn area_radius(&self, explicit: Option<f32>) -> f32 {
        explicit
            .or(self.aoe_radius)
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(FALLBACK_EFFECT_RADIUS)
    }
}

/// Mutable state impact handlers may touch.
#[derive(Debug)]
pub struct ImpactContext<'a> {
    /// Live enemy collection.
    pub enemies: &'a mut EnemyStore,
    /// Damage arithmetic stamped with the current simulation time.
    pub resolver: &'a DamageResolver,
    /// Queue receiving delayed effects.
    pub schedule: &'a mut ScheduledEffectQueue,
    /// Simulation random number generator.
    pub rng: &'a mut SimRng,
    /// Projectiles to launch once the current projectile pass ends.
    pub launches: &'a mut Vec<ProjectileLaunch>,
    /// Event sink.
    pub events: &'a mut Vec<Event>,
}

/// Handler invoked once when a projectile carrying its key resolves.
pub trait ImpactHandler: fmt::Debug {
    /// Key the handler is registered under.
    fn kind(&self) -> EffectKind;

    /// Applies the effect. Parameters of another kind are ignored.
    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>);
}

/// Handler invoked every tick a projectile carrying its key is in flight.
pub trait TravelHandler: fmt::Debug {
    /// Key the handler is registered under.
    fn kind(&self) -> EffectKind;

    /// Applies the effect for `dt_seconds` of flight.
    fn apply(
        &self,
        projectile: &mut Projectile,
        dt_seconds: f32,
        params: &EffectParams,
        out_events: &mut Vec<Event>,
    );
}

/// Ordered collection of effect handlers.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    impact: Vec<Box<dyn ImpactHandler>>,
    travel: Vec<Box<dyn TravelHandler>>,
}

impl EffectRegistry {
    /// Creates a registry without handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in handler.
    ///
    /// Impact handlers run explosion, knockback, cluster, chain, aftershock.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_travel(Box::new(TrailHandler));
        registry.register_impact(Box::new(ExplosionHandler));
        registry.register_impact(Box::new(KnockbackHandler));
        registry.register_impact(Box::new(ClusterHandler));
        registry.register_impact(Box::new(ChainHandler));
        registry.register_impact(Box::new(AftershockHandler));
        registry
    }

    /// Appends an impact handler, replacing one registered under the same key
    /// in place.
    pub fn register_impact(&mut self, handler: Box<dyn ImpactHandler>) {
        let kind = handler.kind();
        match self.impact.iter_mut().find(|existing| existing.kind() == kind) {
            Some(slot) => *slot = handler,
            None => self.impact.push(handler),
        }
    }

    /// Appends a travel handler, replacing one registered under the same key
    /// in place.
    pub fn register_travel(&mut self, handler: Box<dyn TravelHandler>) {
        let kind = handler.kind();
        match self.travel.iter_mut().find(|existing| existing.kind() == kind) {
            Some(slot) => *slot = handler,
            None => self.travel.push(handler),
        }
    }

    /// Keys of the impact handlers in dispatch order.
    pub fn impact_order(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.impact.iter().map(|handler| handler.kind())
    }

    /// Runs every impact handler whose key `descriptor` carries.
    pub fn dispatch_impact(
        &self,
        descriptor: &EffectsDescriptor,
        impact: &Impact,
        context: &mut ImpactContext<'_>,
    ) {
        for handler in &self.impact {
            if let Some(params) = descriptor.get(handler.kind()) {
                tracing::trace!(effect = handler.kind().name(), "impact effect");
                handler.apply(impact, params, context);
            }
        }
    }

    /// Runs every travel handler whose key the projectile carries.
    pub fn dispatch_travel(
        &self,
        projectile: &mut Projectile,
        dt_seconds: f32,
        out_events: &mut Vec<Event>,
    ) {
        for handler in &self.travel {
            let Some(params) = projectile.launch().effects.get(handler.kind()).cloned() else {
                continue;
            };
            handler.apply(projectile, dt_seconds, &params, out_events);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{CombatConfig, EnemySpawn, WaypointPath};
    use rampart_world::EnemyStore;
    use rand::SeedableRng;

    use super::*;

    pub(crate) struct Harness {
        pub(crate) enemies: EnemyStore,
        pub(crate) resolver: DamageResolver,
        pub(crate) schedule: ScheduledEffectQueue,
        pub(crate) rng: SimRng,
        pub(crate) launches: Vec<ProjectileLaunch>,
        pub(crate) events: Vec<Event>,
    }

    impl Harness {
        pub(crate) fn new(now: Duration) -> Self {
            Self {
                enemies: EnemyStore::new(),
                resolver: DamageResolver::new(&CombatConfig::default(), now),
                schedule: ScheduledEffectQueue::new(),
                rng: SimRng::seed_from_u64(7),
                launches: Vec::new(),
                events: Vec::new(),
            }
        }

        pub(crate) fn spawn_at(&mut self, position: Vec2, health: u32) -> EnemyId {
            self.spawn_on(vec![position], health)
        }

        pub(crate) fn spawn_on(&mut self, points: Vec<Vec2>, health: u32) -> EnemyId {
            self.enemies.spawn(EnemySpawn::new(
                WaypointPath::from_points(points),
                health,
                1.0,
                0,
            ))
        }

        pub(crate) fn context(&mut self) -> ImpactContext<'_> {
            ImpactContext {
                enemies: &mut self.enemies,
                resolver: &self.resolver,
                schedule: &mut self.schedule,
                rng: &mut self.rng,
                launches: &mut self.launches,
                events: &mut self.events,
            }
        }

        pub(crate) fn damage_log(&self) -> Vec<(u32, u32)> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    Event::EnemyDamaged { enemy, amount, .. } => Some((enemy.get(), *amount)),
                    _ => None,
                })
                .collect()
        }
    }
}

//! Name-keyed effects descriptors carried by towers and projectiles.
//!
//! A descriptor maps an [`EffectKind`] to its parameters. Presence of a key is
//! what enables an effect; the effects engine dispatches each present key to
//! the handler registered for it. In configuration files a descriptor is a
//! table whose keys are effect names:
//!
//! ```toml
//! [effects.explosion]
//! radius = 60.0
//!
//! [effects.chain]
//! max_jumps = 3
//! damage_falloff = 0.6
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{finite_or, positive_or};

/// Largest number of hops a chain may take.
pub const MAX_CHAIN_JUMPS: u32 = 64;

/// Largest number of children a cluster may fork.
pub const MAX_CLUSTER_CHILDREN: u32 = 64;

/// Longest aftershock delay in seconds.
pub const MAX_AFTERSHOCK_DELAY: f32 = 3_600.0;

fn at_most(value: u32, max: u32, field: &'static str) -> u32 {
    if value > max {
        tracing::warn!(field, value, max, "effect parameter too large, clamping");
        max
    } else {
        value
    }
}

/// Names of every effect understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Particles left behind while a projectile travels.
    Trail,
    /// Particle, decal and flash burst on impact.
    Explosion,
    /// Radial push applied to nearby enemies on impact.
    Knockback,
    /// Sub-projectiles forked from the impact point.
    Cluster,
    /// Damage hopping between nearby enemies.
    Chain,
    /// Delayed area damage at the impact point.
    Aftershock,
}

impl EffectKind {
    /// Order in which impact handlers run when several co-occur.
    pub const IMPACT_ORDER: [EffectKind; 5] = [
        EffectKind::Explosion,
        EffectKind::Knockback,
        EffectKind::Cluster,
        EffectKind::Chain,
        EffectKind::Aftershock,
    ];

    /// Configuration key of the effect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trail => "trail",
            Self::Explosion => "explosion",
            Self::Knockback => "knockback",
            Self::Cluster => "cluster",
            Self::Chain => "chain",
            Self::Aftershock => "aftershock",
        }
    }

    /// Reports whether the effect runs while the projectile is in flight.
    #[must_use]
    pub const fn is_travel(self) -> bool {
        matches!(self, Self::Trail)
    }
}

/// Parameters of a single effect entry.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectParams {
    /// Parameters of [`EffectKind::Trail`].
    Trail(TrailParams),
    /// Parameters of [`EffectKind::Explosion`].
    Explosion(ExplosionParams),
    /// Parameters of [`EffectKind::Knockback`].
    Knockback(KnockbackParams),
    /// Parameters of [`EffectKind::Cluster`].
    Cluster(ClusterParams),
    /// Parameters of [`EffectKind::Chain`].
    Chain(ChainParams),
    /// Parameters of [`EffectKind::Aftershock`].
    Aftershock(AftershockParams),
}

impl EffectParams {
    /// Key under which the parameters are stored.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Trail(_) => EffectKind::Trail,
            Self::Explosion(_) => EffectKind::Explosion,
            Self::Knockback(_) => EffectKind::Knockback,
            Self::Cluster(_) => EffectKind::Cluster,
            Self::Chain(_) => EffectKind::Chain,
            Self::Aftershock(_) => EffectKind::Aftershock,
        }
    }

    fn sanitized(self) -> Self {
        match self {
            Self::Trail(params) => Self::Trail(params.sanitized()),
            Self::Explosion(params) => Self::Explosion(params.sanitized()),
            Self::Knockback(params) => Self::Knockback(params.sanitized()),
            Self::Cluster(params) => Self::Cluster(params.sanitized()),
            Self::Chain(params) => Self::Chain(params.sanitized()),
            Self::Aftershock(params) => Self::Aftershock(params.sanitized()),
        }
    }
}

/// Mapping of effect name to parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "EffectsTable", into = "EffectsTable")]
pub struct EffectsDescriptor {
    entries: BTreeMap<EffectKind, EffectParams>,
}

impl EffectsDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor with `params` inserted under its own key.
    #[must_use]
    pub fn with(mut self, params: EffectParams) -> Self {
        let _ = self.insert(params);
        self
    }

    /// Inserts `params`, returning any entry previously stored under the key.
    pub fn insert(&mut self, params: EffectParams) -> Option<EffectParams> {
        self.entries.insert(params.kind(), params)
    }

    /// Removes the entry stored under `kind`.
    pub fn remove(&mut self, kind: EffectKind) -> Option<EffectParams> {
        self.entries.remove(&kind)
    }

    /// Parameters stored under `kind`, if the effect is enabled.
    #[must_use]
    pub fn get(&self, kind: EffectKind) -> Option<&EffectParams> {
        self.entries.get(&kind)
    }

    /// Reports whether `kind` is enabled.
    #[must_use]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Reports whether no effect is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled effects ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &EffectParams> {
        self.entries.values()
    }

    /// Copy of the descriptor with `kind` disabled.
    #[must_use]
    pub fn without(&self, kind: EffectKind) -> Self {
        let mut copy = self.clone();
        let _ = copy.remove(kind);
        copy
    }

    /// Replaces malformed parameters with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(kind, params)| (kind, params.sanitized()))
                .collect(),
        }
    }
}

/// Particles dropped behind a projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailParams {
    /// Seconds of flight between two particles.
    pub spacing: f32,
    /// Particle size in pixels.
    pub size: f32,
    /// Particle lifetime in seconds.
    pub lifetime: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            spacing: 0.03,
            size: 3.0,
            lifetime: 0.3,
        }
    }
}

impl TrailParams {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            spacing: positive_or(self.spacing, defaults.spacing),
            size: positive_or(self.size, defaults.size),
            lifetime: positive_or(self.lifetime, defaults.lifetime),
        }
    }
}

/// Purely visual burst on impact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplosionParams {
    /// Visual radius; falls back to the projectile's AoE radius.
    pub radius: Option<f32>,
    /// Number of particles in the burst.
    pub particles: u32,
    /// Whether a scorch decal is left behind.
    pub decal: bool,
    /// Screen flash intensity in `0.0..=1.0`; zero disables the flash.
    pub flash: f32,
}

impl Default for ExplosionParams {
    fn default() -> Self {
        Self {
            radius: None,
            particles: 16,
            decal: true,
            flash: 0.0,
        }
    }
}

impl ExplosionParams {
    fn sanitized(self) -> Self {
        Self {
            radius: self.radius.filter(|radius| radius.is_finite() && *radius > 0.0),
            flash: finite_or(self.flash, 0.0).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Distance-scaled push applied around the impact point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnockbackParams {
    /// Radius of the push; falls back to the projectile's AoE radius.
    pub radius: Option<f32>,
    /// Displacement in pixels applied at the very centre.
    pub max_push: f32,
}

impl Default for KnockbackParams {
    fn default() -> Self {
        Self {
            radius: None,
            max_push: 12.0,
        }
    }
}

impl KnockbackParams {
    fn sanitized(self) -> Self {
        Self {
            radius: self.radius.filter(|radius| radius.is_finite() && *radius > 0.0),
            max_push: finite_or(self.max_push, Self::default().max_push).max(0.0),
        }
    }
}

/// One-level fork of child projectiles from the impact point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterParams {
    /// Number of children, at most [`MAX_CLUSTER_CHILDREN`].
    pub count: u32,
    /// Total angular spread of the fan in radians.
    pub spread: f32,
    /// Distance from the impact point to each child's destination.
    pub distance: f32,
    /// Maximum random deviation applied to `distance`.
    pub jitter: f32,
    /// Share of the parent's damage carried by each child.
    pub damage_fraction: f32,
    /// AoE radius of each child; falls back to the parent's radius.
    pub aoe_radius: Option<f32>,
    /// Progress per second of the children; falls back to the default speed.
    pub speed: Option<f32>,
    /// Effects carried by the children. A nested cluster entry is ignored.
    pub effects: EffectsDescriptor,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            count: 4,
            spread: std::f32::consts::FRAC_PI_2,
            distance: 48.0,
            jitter: 12.0,
            damage_fraction: 0.35,
            aoe_radius: None,
            speed: None,
            effects: EffectsDescriptor::default(),
        }
    }
}

impl ClusterParams {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            count: at_most(self.count, MAX_CLUSTER_CHILDREN, "cluster.count"),
            spread: finite_or(self.spread, defaults.spread).clamp(0.0, std::f32::consts::TAU),
            distance: finite_or(self.distance, defaults.distance).max(0.0),
            jitter: finite_or(self.jitter, defaults.jitter).max(0.0),
            damage_fraction: finite_or(self.damage_fraction, defaults.damage_fraction).max(0.0),
            aoe_radius: self.aoe_radius.filter(|radius| radius.is_finite() && *radius > 0.0),
            speed: self.speed.filter(|speed| speed.is_finite() && *speed > 0.0),
            effects: self.effects.without(EffectKind::Cluster).sanitized(),
        }
    }
}

/// Greedy nearest-neighbour damage hop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainParams {
    /// Maximum number of enemies hit by one chain, at most [`MAX_CHAIN_JUMPS`].
    pub max_jumps: u32,
    /// Search radius around the previous hop.
    pub jump_radius: f32,
    /// Factor applied to the damage after every hop.
    pub damage_falloff: f32,
    /// Prefer enemies other than the projectile's original target.
    pub prefer_new_targets: bool,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            max_jumps: 3,
            jump_radius: 90.0,
            damage_falloff: 0.6,
            prefer_new_targets: true,
        }
    }
}

impl ChainParams {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            max_jumps: at_most(self.max_jumps, MAX_CHAIN_JUMPS, "chain.max_jumps"),
            jump_radius: finite_or(self.jump_radius, defaults.jump_radius).max(0.0),
            damage_falloff: finite_or(self.damage_falloff, defaults.damage_falloff)
                .clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Area damage re-applied at the impact point after a delay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AftershockParams {
    /// Seconds between the impact and the aftershock, at most
    /// [`MAX_AFTERSHOCK_DELAY`].
    pub delay: f32,
    /// Radius of the aftershock; falls back to the projectile's AoE radius.
    pub radius: Option<f32>,
    /// Share of the original damage dealt by the aftershock.
    pub damage_scale: f32,
    /// Number of ripple rings drawn when it fires.
    pub rings: u32,
}

impl Default for AftershockParams {
    fn default() -> Self {
        Self {
            delay: 0.6,
            radius: None,
            damage_scale: 0.5,
            rings: 2,
        }
    }
}

impl AftershockParams {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            delay: sanitized_delay(self.delay, defaults.delay),
            radius: self.radius.filter(|radius| radius.is_finite() && *radius > 0.0),
            damage_scale: finite_or(self.damage_scale, defaults.damage_scale).max(0.0),
            rings: self.rings,
        }
    }
}

fn sanitized_delay(delay: f32, fallback: f32) -> f32 {
    let delay = finite_or(delay, fallback).max(0.0);
    if delay > MAX_AFTERSHOCK_DELAY {
        tracing::warn!(delay, max = MAX_AFTERSHOCK_DELAY, "aftershock delay too long, clamping");
        MAX_AFTERSHOCK_DELAY
    } else {
        delay
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EffectsTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    trail: Option<TrailParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explosion: Option<ExplosionParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    knockback: Option<KnockbackParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster: Option<ClusterParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<ChainParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aftershock: Option<AftershockParams>,
}

impl From<EffectsTable> for EffectsDescriptor {
    fn from(table: EffectsTable) -> Self {
        let entries = [
            table.trail.map(EffectParams::Trail),
            table.explosion.map(EffectParams::Explosion),
            table.knockback.map(EffectParams::Knockback),
            table.cluster.map(EffectParams::Cluster),
            table.chain.map(EffectParams::Chain),
            table.aftershock.map(EffectParams::Aftershock),
        ]
        .into_iter()
        .flatten()
        .map(|params| (params.kind(), params))
        .collect();

        Self { entries }
    }
}

impl From<EffectsDescriptor> for EffectsTable {
    fn from(descriptor: EffectsDescriptor) -> Self {
        let mut table = Self::default();
        for params in descriptor.entries.into_values() {
            match params {
                EffectParams::Trail(params) => table.trail = Some(params),
                EffectParams::Explosion(params) => table.explosion = Some(params),
                EffectParams::Knockback(params) => table.knockback = Some(params),
                EffectParams::Cluster(params) => table.cluster = Some(params),
                EffectParams::Chain(params) => table.chain = Some(params),
                EffectParams::Aftershock(params) => table.aftershock = Some(params),
            }
        }
        table
    }
}

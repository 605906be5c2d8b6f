use std::f32::consts::TAU;

use glam::Vec2;
use rampart_core::{EffectKind, EffectParams, MAX_CLUSTER_CHILDREN};
use rampart_world::ProjectileLaunch;
use rand::Rng;

use crate::{Impact, ImpactContext, ImpactHandler};

/// Forks child projectiles fanned around a random base angle.
///
/// Children never fork again: they are launched with the cluster key removed
/// and flagged as cluster children.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClusterHandler;

impl ImpactHandler for ClusterHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Cluster
    }

    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>) {
        let EffectParams::Cluster(params) = params else {
            return;
        };
        if impact.cluster_child || params.count == 0 {
            return;
        }

        let base_angle = context.rng.gen_range(0.0..TAU);
        let effects = params.effects.without(EffectKind::Cluster);
        let aoe_radius = params.aoe_radius.or(impact.aoe_radius);
        let hit = impact.hit.scaled(params.damage_fraction);
        let count = params.count.min(MAX_CLUSTER_CHILDREN);

        for index in 0..count {
            let angle = base_angle + fan_offset(index, count, params.spread);
            let jitter = if params.jitter > 0.0 {
                context.rng.gen_range(-params.jitter..=params.jitter)
            } else {
                0.0
            };
            let distance = (params.distance + jitter).max(0.0);

            context.launches.push(ProjectileLaunch {
                source: None,
                origin: impact.point,
                target_point: impact.point + Vec2::from_angle(angle) * distance,
                target: None,
                damage: hit.damage,
                damage_type: hit.damage_type,
                aoe_radius,
                speed: params.speed,
                effects: effects.clone(),
                cluster_child: true,
            });
        }
        tracing::debug!(children = count, "cluster forked");
    }
}

/// Angle of child `index` relative to the base angle, spreading `count`
/// children evenly across `spread` radians centred on the base.
fn fan_offset(index: u32, count: u32, spread: f32) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    let step = spread / (count - 1) as f32;
    -spread / 2.0 + step * index as f32
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rampart_core::{ClusterParams, DamageType, EffectsDescriptor, ExplosionParams};
    use rampart_system_damage::Hit;

    use super::*;
    use crate::test_support::Harness;

    fn impact(cluster_child: bool) -> Impact {
        Impact {
            point: Vec2::new(100.0, 100.0),
            hit: Hit::new(40.0, DamageType::Explosive),
            aoe_radius: Some(30.0),
            target: None,
            cluster_child,
        }
    }

    #[test]
    fn fan_is_centred_on_base_angle() {
        assert_eq!(fan_offset(0, 1, 1.0), 0.0);
        assert!((fan_offset(0, 3, 1.0) + 0.5).abs() < 1e-6);
        assert!(fan_offset(1, 3, 1.0).abs() < 1e-6);
        assert!((fan_offset(2, 3, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn children_carry_fraction_of_damage_and_never_fork() {
        let mut harness = Harness::new(Duration::ZERO);
        let params = EffectParams::Cluster(ClusterParams {
            count: 5,
            distance: 50.0,
            jitter: 10.0,
            damage_fraction: 0.25,
            effects: EffectsDescriptor::new()
                .with(EffectParams::Explosion(ExplosionParams::default()))
                .with(EffectParams::Cluster(ClusterParams::default())),
            ..ClusterParams::default()
        });

        ClusterHandler.apply(&impact(false), &params, &mut harness.context());

        assert_eq!(harness.launches.len(), 5);
        for child in &harness.launches {
            assert!(child.cluster_child);
            assert_eq!(child.origin, Vec2::new(100.0, 100.0));
            assert!((child.damage - 10.0).abs() < 1e-6);
            assert_eq!(child.aoe_radius, Some(30.0));
            assert!(child.effects.contains(EffectKind::Explosion));
            assert!(!child.effects.contains(EffectKind::Cluster));
            let reach = child.origin.distance(child.target_point);
            assert!((40.0 - 1e-3..=60.0 + 1e-3).contains(&reach), "reach {reach}");
        }
    }

    #[test]
    fn cluster_children_do_not_fork_again() {
        let mut harness = Harness::new(Duration::ZERO);
        let params = EffectParams::Cluster(ClusterParams::default());

        ClusterHandler.apply(&impact(true), &params, &mut harness.context());

        assert!(harness.launches.is_empty());
    }

    #[test]
    fn oversized_fan_is_capped() {
        let mut harness = Harness::new(Duration::ZERO);
        let params = EffectParams::Cluster(ClusterParams {
            count: u32::MAX,
            ..ClusterParams::default()
        });

        ClusterHandler.apply(&impact(false), &params, &mut harness.context());

        assert_eq!(harness.launches.len(), MAX_CLUSTER_CHILDREN as usize);
    }

    #[test]
    fn same_seed_forks_identically() {
        let params = EffectParams::Cluster(ClusterParams::default());
        let mut first = Harness::new(Duration::ZERO);
        let mut second = Harness::new(Duration::ZERO);

        ClusterHandler.apply(&impact(false), &params, &mut first.context());
        ClusterHandler.apply(&impact(false), &params, &mut second.context());

        assert_eq!(first.launches, second.launches);
    }
}

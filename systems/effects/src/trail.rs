use rampart_core::{positive_or, EffectKind, EffectParams, Event, TrailParams, VisualEffect};
use rampart_world::Projectile;

use crate::TravelHandler;

/// Drops a particle behind a projectile every `spacing` seconds of flight.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrailHandler;

impl TravelHandler for TrailHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Trail
    }

    fn apply(
        &self,
        projectile: &mut Projectile,
        dt_seconds: f32,
        params: &EffectParams,
        out_events: &mut Vec<Event>,
    ) {
        let EffectParams::Trail(params) = params else {
            return;
        };
        if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
            return;
        }

        let spacing = positive_or(params.spacing, TrailParams::default().spacing);
        let elapsed = projectile.trail_elapsed_mut();
        *elapsed += dt_seconds;
        if *elapsed < spacing {
            return;
        }
        // One particle per tick at most; the remainder carries over.
        *elapsed %= spacing;

        out_events.push(Event::Visual {
            effect: VisualEffect::TrailParticle {
                position: projectile.position(),
                size: params.size,
                lifetime: params.lifetime,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rampart_core::{DamageType, EffectsDescriptor};
    use rampart_world::{ProjectileLaunch, ProjectileStore};

    use super::*;

    #[test]
    fn particles_follow_spacing() {
        let mut store = ProjectileStore::new();
        let _ = store.launch(ProjectileLaunch {
            source: None,
            origin: Vec2::ZERO,
            target_point: Vec2::new(100.0, 0.0),
            target: None,
            damage: 1.0,
            damage_type: DamageType::Physical,
            aoe_radius: None,
            speed: None,
            effects: EffectsDescriptor::new(),
            cluster_child: false,
        });
        let projectile = store.iter_mut().next().expect("projectile");
        let params = EffectParams::Trail(TrailParams {
            spacing: 0.05,
            ..TrailParams::default()
        });
        let mut events = Vec::new();

        TrailHandler.apply(projectile, 0.03, &params, &mut events);
        assert!(events.is_empty());

        let _ = projectile.advance(0.5);
        TrailHandler.apply(projectile, 0.03, &params, &mut events);
        assert_eq!(
            events,
            vec![Event::Visual {
                effect: VisualEffect::TrailParticle {
                    position: Vec2::new(50.0, 0.0),
                    size: 3.0,
                    lifetime: 0.3,
                }
            }]
        );
    }
}

use rampart_core::{EffectKind, EffectParams, Event, VisualEffect};

use crate::{Impact, ImpactContext, ImpactHandler};

/// Emits the particle burst, decal and flash of an impact. Deals no damage.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplosionHandler;

impl ImpactHandler for ExplosionHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Explosion
    }

    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>) {
        let EffectParams::Explosion(params) = params else {
            return;
        };

        let radius = impact.area_radius(params.radius);
        context.events.push(Event::Visual {
            effect: VisualEffect::ParticleBurst {
                center: impact.point,
                radius,
                count: params.particles,
                damage_type: impact.hit.damage_type,
            },
        });
        if params.decal {
            context.events.push(Event::Visual {
                effect: VisualEffect::Decal {
                    center: impact.point,
                    radius,
                },
            });
        }
        if params.flash > 0.0 {
            context.events.push(Event::Visual {
                effect: VisualEffect::ScreenFlash {
                    intensity: params.flash,
                },
            });
        }
    }
}

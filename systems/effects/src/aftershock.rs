use std::time::Duration;

use rampart_core::{AreaPayload, EffectKind, EffectParams, Event, ScheduledEffect};

use crate::{Impact, ImpactContext, ImpactHandler};

/// Queues delayed area damage at the impact point.
#[derive(Clone, Copy, Debug, Default)]
pub struct AftershockHandler;

impl ImpactHandler for AftershockHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Aftershock
    }

    fn apply(&self, impact: &Impact, params: &EffectParams, context: &mut ImpactContext<'_>) {
        let EffectParams::Aftershock(params) = params else {
            return;
        };

        let delay = Duration::try_from_secs_f32(params.delay.max(0.0)).unwrap_or(Duration::MAX);
        let due = context.resolver.now().saturating_add(delay);
        let hit = impact.hit.scaled(params.damage_scale);

        context.schedule.push(ScheduledEffect::aftershock(
            due,
            AreaPayload {
                center: impact.point,
                radius: impact.area_radius(params.radius),
                damage: hit.damage,
                damage_type: hit.damage_type,
                rings: params.rings,
            },
        ));
        context.events.push(Event::AftershockScheduled {
            due,
            center: impact.point,
        });
    }
}

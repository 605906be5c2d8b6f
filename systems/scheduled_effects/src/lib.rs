#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flushes scheduled effects whose due time has been reached.

use rampart_core::{Event, PlayMode, ScheduledEffectKind, VisualEffect};
use rampart_system_damage::{DamageResolver, Hit};
use rampart_world::{EnemyStore, ScheduledEffectQueue};

/// Scheduled-effect flush phase that reuses its scratch buffer across ticks.
#[derive(Debug, Default)]
pub struct ScheduledEffects {
    due: Vec<rampart_core::ScheduledEffect>,
}

impl ScheduledEffects {
    /// Creates a flush phase with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes every entry due at the resolver's time, exactly once and in
    /// insertion order. Entries not yet due stay queued.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        schedule: &mut ScheduledEffectQueue,
        enemies: &mut EnemyStore,
        resolver: &DamageResolver,
        out_events: &mut Vec<Event>,
    ) {
        if play_mode != PlayMode::Attack {
            return;
        }

        self.due.clear();
        schedule.take_due(resolver.now(), &mut self.due);
        for entry in self.due.drain(..) {
            match entry.kind {
                ScheduledEffectKind::Aftershock => {
                    let payload = entry.payload;
                    let dealt = resolver.sweep(
                        enemies,
                        payload.center,
                        payload.radius,
                        Hit::new(payload.damage, payload.damage_type),
                        out_events,
                    );
                    out_events.push(Event::Visual {
                        effect: VisualEffect::Ripple {
                            center: payload.center,
                            radius: payload.radius,
                            rings: payload.rings,
                        },
                    });
                    tracing::debug!(
                        due_ms = entry.due.as_millis() as u64,
                        dealt,
                        "aftershock fired"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{AreaPayload, CombatConfig, DamageType, EnemySpawn, ScheduledEffect, WaypointPath};

    use super::*;

    fn aftershock(due_ms: u64, damage: f32) -> ScheduledEffect {
        ScheduledEffect::aftershock(
            Duration::from_millis(due_ms),
            AreaPayload {
                center: Vec2::ZERO,
                radius: 50.0,
                damage,
                damage_type: DamageType::Explosive,
                rings: 1,
            },
        )
    }

    fn enemies() -> EnemyStore {
        let mut store = EnemyStore::new();
        let _ = store.spawn(EnemySpawn::new(
            WaypointPath::from_points(vec![Vec2::ZERO]),
            100,
            1.0,
            0,
        ));
        store
    }

    fn damage(events: &[Event]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDamaged { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn entries_fire_once_when_due() {
        let mut phase = ScheduledEffects::new();
        let mut schedule = ScheduledEffectQueue::new();
        let mut store = enemies();
        schedule.push(aftershock(500, 10.0));
        let config = CombatConfig::default();
        let mut events = Vec::new();

        let early = DamageResolver::new(&config, Duration::from_millis(400));
        phase.handle(PlayMode::Attack, &mut schedule, &mut store, &early, &mut events);
        assert!(events.is_empty());
        assert_eq!(schedule.len(), 1);

        let due = DamageResolver::new(&config, Duration::from_millis(500));
        phase.handle(PlayMode::Attack, &mut schedule, &mut store, &due, &mut events);
        phase.handle(PlayMode::Attack, &mut schedule, &mut store, &due, &mut events);

        assert_eq!(damage(&events), vec![10]);
        assert!(schedule.is_empty());
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Visual {
                effect: VisualEffect::Ripple { rings: 1, .. }
            }
        )));
    }

    #[test]
    fn same_tick_entries_fire_in_insertion_order() {
        let mut phase = ScheduledEffects::new();
        let mut schedule = ScheduledEffectQueue::new();
        let mut store = enemies();
        schedule.push(aftershock(300, 7.0));
        schedule.push(aftershock(100, 3.0));
        schedule.push(aftershock(900, 50.0));
        let resolver = DamageResolver::new(&CombatConfig::default(), Duration::from_millis(300));
        let mut events = Vec::new();

        phase.handle(PlayMode::Attack, &mut schedule, &mut store, &resolver, &mut events);

        assert_eq!(damage(&events), vec![7, 3]);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn builder_mode_holds_entries() {
        let mut phase = ScheduledEffects::new();
        let mut schedule = ScheduledEffectQueue::new();
        let mut store = enemies();
        schedule.push(aftershock(0, 10.0));
        let resolver = DamageResolver::new(&CombatConfig::default(), Duration::from_secs(1));
        let mut events = Vec::new();

        phase.handle(PlayMode::Builder, &mut schedule, &mut store, &resolver, &mut events);

        assert!(events.is_empty());
        assert_eq!(schedule.len(), 1);
    }
}

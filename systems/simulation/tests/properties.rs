//! Property tests for the combat invariants that must hold for any scenario.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use glam::Vec2;
use proptest::prelude::*;
use rampart_core::{
    AftershockParams, ChainParams, ClusterParams, Command, EffectParams, EffectsDescriptor,
    EnemyId, EnemySpawn, Event, KnockbackParams, TargetingMode, TowerDefinition, WaypointPath,
};
use rampart_simulation::Simulation;
use rampart_world::{self as world, query, World};

#[derive(Clone, Debug)]
struct TowerPlan {
    position: Vec2,
    damage: f32,
    attack_rate: f32,
    aoe_radius: Option<f32>,
    effects: EffectsDescriptor,
    mode: TargetingMode,
}

#[derive(Clone, Debug)]
struct Scenario {
    towers: Vec<TowerPlan>,
    enemies: Vec<(u32, f32)>,
    frames: Vec<u64>,
}

fn targeting_mode() -> impl Strategy<Value = TargetingMode> {
    prop_oneof![
        Just(TargetingMode::Closest),
        Just(TargetingMode::First),
        Just(TargetingMode::Last),
        Just(TargetingMode::Strongest),
        Just(TargetingMode::Weakest),
    ]
}

fn effects() -> impl Strategy<Value = EffectsDescriptor> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(chain, cluster, knockback, aftershock)| {
            let mut descriptor = EffectsDescriptor::new();
            if chain {
                let _ = descriptor.insert(EffectParams::Chain(ChainParams::default()));
            }
            if cluster {
                let _ = descriptor.insert(EffectParams::Cluster(ClusterParams::default()));
            }
            if knockback {
                let _ = descriptor.insert(EffectParams::Knockback(KnockbackParams::default()));
            }
            if aftershock {
                let _ = descriptor.insert(EffectParams::Aftershock(AftershockParams::default()));
            }
            descriptor
        },
    )
}

fn tower(with_effects: bool) -> impl Strategy<Value = TowerPlan> {
    let effects = if with_effects {
        effects().boxed()
    } else {
        Just(EffectsDescriptor::new()).boxed()
    };
    let aoe = if with_effects {
        proptest::option::of(8.0_f32..80.0).boxed()
    } else {
        Just(None).boxed()
    };
    (
        (0.0_f32..400.0, -80.0_f32..80.0),
        1.0_f32..120.0,
        0.5_f32..6.0,
        aoe,
        effects,
        targeting_mode(),
    )
        .prop_map(
            |((x, y), damage, attack_rate, aoe_radius, effects, mode)| TowerPlan {
                position: Vec2::new(x, y),
                damage,
                attack_rate,
                aoe_radius,
                effects,
                mode,
            },
        )
}

fn scenario(with_effects: bool) -> impl Strategy<Value = Scenario> {
    (
        proptest::collection::vec(tower(with_effects), 1..4),
        proptest::collection::vec((1_u32..200, 0.0_f32..4.0), 1..8),
        proptest::collection::vec(1_u64..200, 1..60),
    )
        .prop_map(|(towers, enemies, frames)| Scenario {
            towers,
            enemies,
            frames,
        })
}

struct Outcome {
    spawned: BTreeMap<EnemyId, u32>,
    events: Vec<Event>,
    overhealed: bool,
}

fn run(scenario: &Scenario) -> Outcome {
    let mut world = World::new();
    let mut events = Vec::new();
    let path = WaypointPath::from_points(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(200.0, 0.0),
        Vec2::new(200.0, 60.0),
        Vec2::new(400.0, 60.0),
    ]);

    for plan in &scenario.towers {
        world::apply(
            &mut world,
            Command::PlaceTower {
                position: plan.position,
                definition: TowerDefinition {
                    damage: plan.damage,
                    attack_rate: plan.attack_rate,
                    aoe_radius: plan.aoe_radius,
                    effects: plan.effects.clone(),
                    ..TowerDefinition::default()
                },
                targeting: plan.mode,
            },
            &mut events,
        );
    }

    let mut spawned = BTreeMap::new();
    for &(health, speed) in &scenario.enemies {
        let mut spawn_events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                spawn: EnemySpawn::new(path.clone(), health, speed, 1),
            },
            &mut spawn_events,
        );
        for event in &spawn_events {
            if let Event::EnemySpawned { enemy, .. } = event {
                let _ = spawned.insert(*enemy, health);
            }
        }
    }

    let mut simulation = Simulation::new();
    let mut overhealed = false;
    events.clear();
    for &millis in &scenario.frames {
        let _ = simulation.tick(&mut world, Duration::from_millis(millis), &mut events);
        overhealed |= query::enemy_view(&world)
            .iter()
            .any(|enemy| enemy.health > enemy.max_health);
    }

    Outcome {
        spawned,
        events,
        overhealed,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn damage_never_exceeds_spawn_health(scenario in scenario(true)) {
        let outcome = run(&scenario);
        prop_assert!(!outcome.overhealed);

        let mut dealt: BTreeMap<EnemyId, u32> = BTreeMap::new();
        for event in &outcome.events {
            if let Event::EnemyDamaged { enemy, amount, .. } = event {
                prop_assert!(*amount > 0, "zero-damage hits are not reported");
                *dealt.entry(*enemy).or_default() += *amount;
            }
        }
        for (enemy, total) in dealt {
            let health = outcome.spawned.get(&enemy).copied().unwrap_or_default();
            prop_assert!(total <= health, "{enemy:?} took {total} of {health}");
        }
    }

    #[test]
    fn projectiles_resolve_at_most_once(scenario in scenario(true)) {
        let outcome = run(&scenario);

        let mut resolved = BTreeSet::new();
        for event in &outcome.events {
            if let Event::ProjectileResolved { projectile, .. } = event {
                prop_assert!(resolved.insert(*projectile), "{projectile:?} resolved twice");
            }
        }
    }

    #[test]
    fn plain_projectiles_damage_at_most_once(scenario in scenario(false)) {
        let outcome = run(&scenario);

        let hits = outcome
            .events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDamaged { .. }))
            .count();
        let resolved = outcome
            .events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileResolved { .. }))
            .count();
        prop_assert!(hits <= resolved, "{hits} hits from {resolved} projectiles");
    }

    #[test]
    fn killed_enemies_are_rewarded_once(scenario in scenario(true)) {
        let outcome = run(&scenario);

        let mut killed = BTreeSet::new();
        for event in &outcome.events {
            if let Event::EnemyKilled { enemy, .. } = event {
                prop_assert!(killed.insert(*enemy));
            }
        }
    }
}

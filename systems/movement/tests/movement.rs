use glam::Vec2;
use rampart_core::{CombatConfig, Command, EnemyId, EnemySpawn, Event, WaypointPath};
use rampart_system_movement::Movement;
use rampart_world::{self as world, query, World};

fn world_with_enemy(points: Vec<Vec2>, speed: f32) -> (World, EnemyId) {
    let mut world = World::with_config(CombatConfig {
        cell_size: 40.0,
        starting_lives: 5,
        leak_cost: 2,
        ..CombatConfig::default()
    });
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            spawn: EnemySpawn::new(WaypointPath::from_points(points), 10, speed, 0),
        },
        &mut events,
    );
    let enemy = match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected events: {other:?}"),
    };
    (world, enemy)
}

fn step(world: &mut World, movement: &mut Movement, dt_seconds: f32) -> Vec<Event> {
    let mut events = Vec::new();
    let frame = world.frame();
    movement.handle(
        frame.play_mode,
        frame.config,
        frame.enemies,
        frame.ledger,
        dt_seconds,
        &mut events,
    );
    events
}

fn corner_path() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(40.0, 0.0),
        Vec2::new(40.0, 40.0),
        Vec2::new(40.0, 120.0),
    ]
}

#[test]
fn single_tick_crosses_two_waypoints_and_stops_partway_to_third() {
    // 2.5 cells/s × 40 px × 1 s = 100 px: 40 + 40 to the corners, 20 beyond.
    let (mut world, enemy) = world_with_enemy(corner_path(), 2.5);
    let mut movement = Movement::new();

    let events = step(&mut world, &mut movement, 1.0);

    assert!(events.is_empty());
    let enemy = query::enemies(&world).get(enemy).expect("enemy");
    assert!((enemy.position() - Vec2::new(40.0, 60.0)).length() < 1e-4);
    assert_eq!(enemy.waypoint_index(), 3);
}

#[test]
fn frame_rate_does_not_change_the_route() {
    let (mut coarse, coarse_id) = world_with_enemy(corner_path(), 2.5);
    let (mut fine, fine_id) = world_with_enemy(corner_path(), 2.5);
    let mut movement = Movement::new();

    let _ = step(&mut coarse, &mut movement, 1.0);
    for _ in 0..64 {
        let _ = step(&mut fine, &mut movement, 1.0 / 64.0);
    }

    let coarse = query::enemies(&coarse).get(coarse_id).expect("enemy").position();
    let fine = query::enemies(&fine).get(fine_id).expect("enemy").position();
    assert!((coarse - fine).length() < 1e-3, "{coarse:?} vs {fine:?}");
    assert!((fine.x - 40.0).abs() < 1e-3, "the corner was cut: {fine:?}");
}

#[test]
fn leak_costs_lives_exactly_once() {
    let (mut world, enemy) = world_with_enemy(vec![Vec2::ZERO, Vec2::new(20.0, 0.0)], 1.0);
    let mut movement = Movement::new();

    let mut leaks = Vec::new();
    for _ in 0..10 {
        leaks.extend(
            step(&mut world, &mut movement, 0.25)
                .into_iter()
                .filter(|event| matches!(event, Event::EnemyLeaked { .. })),
        );
    }

    assert_eq!(
        leaks,
        vec![Event::EnemyLeaked {
            enemy,
            lives_lost: 2
        }]
    );
    assert_eq!(query::ledger(&world).lives(), 3);
    assert_eq!(query::ledger(&world).leaks(), 1);

    let leaked = query::enemies(&world).get(enemy).expect("enemy");
    assert!(leaked.has_reached_end());
    assert_eq!(leaked.position(), Vec2::new(20.0, 0.0));
    assert_eq!(leaked.waypoint_index(), 1);
}

#[test]
fn velocity_tracks_last_movement() {
    let (mut world, enemy) = world_with_enemy(vec![Vec2::ZERO, Vec2::new(400.0, 0.0)], 1.0);
    let mut movement = Movement::new();

    let _ = step(&mut world, &mut movement, 0.5);

    let enemy = query::enemies(&world).get(enemy).expect("enemy");
    assert_eq!(enemy.position(), Vec2::new(20.0, 0.0));
    assert!((enemy.velocity() - Vec2::new(40.0, 0.0)).length() < 1e-4);
    assert_eq!(enemy.previous_position(), Vec2::ZERO);
}

#[test]
fn dead_enemies_do_not_walk() {
    let (mut world, enemy) = world_with_enemy(vec![Vec2::ZERO, Vec2::new(400.0, 0.0)], 1.0);
    if let Some(enemy) = world.frame().enemies.get_mut(enemy) {
        enemy.mark_dead();
    }
    let mut movement = Movement::new();

    let _ = step(&mut world, &mut movement, 1.0);

    assert_eq!(
        query::enemies(&world).get(enemy).map(|enemy| enemy.position()),
        Some(Vec2::ZERO)
    );
}

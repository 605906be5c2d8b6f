//! Headless session runner producing an end-of-run summary.

use std::{fmt, time::Duration};

use rampart_core::{Command, Event};
use rampart_simulation::Simulation;
use rampart_world::{self as world, query, World};
use serde::Serialize;

use crate::scenario::Scenario;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Outcome {
    /// Every wave was spawned and resolved with lives to spare.
    Cleared,
    /// The player ran out of lives.
    Defeated,
    /// The tick budget ran out first.
    TimedOut,
}

/// Totals reported after a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Summary {
    pub(crate) scenario: String,
    pub(crate) outcome: Outcome,
    pub(crate) ticks: u64,
    pub(crate) elapsed_ms: u64,
    pub(crate) spawned: usize,
    pub(crate) shots: u64,
    pub(crate) damage_dealt: u64,
    pub(crate) kills: u32,
    pub(crate) leaks: u32,
    pub(crate) lives: u32,
    pub(crate) gold: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario:     {}", self.scenario)?;
        writeln!(f, "outcome:      {:?}", self.outcome)?;
        writeln!(f, "ticks:        {} ({} ms)", self.ticks, self.elapsed_ms)?;
        writeln!(f, "spawned:      {}", self.spawned)?;
        writeln!(f, "shots:        {}", self.shots)?;
        writeln!(f, "damage dealt: {}", self.damage_dealt)?;
        writeln!(f, "kills:        {}", self.kills)?;
        writeln!(f, "leaks:        {}", self.leaks)?;
        writeln!(f, "lives:        {}", self.lives)?;
        write!(f, "gold:         {}", self.gold)
    }
}

/// Runs `scenario` for at most `max_ticks` frames of `dt` each.
///
/// Spawns are released at the start of the first frame whose clock has
/// reached their due time. The run stops early once the player is out of
/// lives or every spawned enemy, projectile and aftershock has resolved.
pub(crate) fn run(scenario: &Scenario, max_ticks: u64, dt: Duration) -> Summary {
    let mut world = World::new();
    let mut simulation = Simulation::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureCombat {
            config: scenario.config.clone(),
        },
        &mut events,
    );
    for tower in &scenario.towers {
        world::apply(
            &mut world,
            Command::PlaceTower {
                position: tower.position,
                definition: tower.definition.clone(),
                targeting: tower.targeting,
            },
            &mut events,
        );
    }

    let timetable = scenario.timetable();
    let mut pending = timetable.into_iter().peekable();
    let mut spawned = 0;
    let mut shots = 0_u64;
    let mut damage_dealt = 0_u64;
    let mut ticks = 0;
    let mut outcome = Outcome::TimedOut;

    while ticks < max_ticks {
        events.clear();
        let now = query::clock(&world);
        while let Some(entry) = pending.next_if(|entry| entry.due <= now) {
            world::apply(
                &mut world,
                Command::SpawnEnemy { spawn: entry.spawn },
                &mut events,
            );
            spawned += 1;
        }

        let _ = simulation.tick(&mut world, dt, &mut events);
        ticks += 1;

        for event in &events {
            match event {
                Event::ProjectileFired { .. } => shots += 1,
                Event::EnemyDamaged { amount, .. } => damage_dealt += u64::from(*amount),
                _ => {}
            }
        }

        if query::ledger(&world).lives() == 0 {
            outcome = Outcome::Defeated;
            break;
        }
        if pending.peek().is_none() && is_settled(&world) {
            outcome = Outcome::Cleared;
            break;
        }
    }

    let ledger = query::ledger(&world);
    let summary = Summary {
        scenario: scenario.name.clone(),
        outcome,
        ticks,
        elapsed_ms: query::clock(&world).as_millis() as u64,
        spawned,
        shots,
        damage_dealt,
        kills: ledger.kills(),
        leaks: ledger.leaks(),
        lives: ledger.lives(),
        gold: ledger.gold(),
    };
    tracing::info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        kills = summary.kills,
        leaks = summary.leaks,
        "session finished"
    );
    summary
}

fn is_settled(world: &World) -> bool {
    query::enemies(world).is_empty()
        && query::projectiles(world).is_empty()
        && query::pending_scheduled_effects(world) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(50);

    #[test]
    fn demo_run_resolves_every_spawn() {
        let scenario = Scenario::demo().expect("demo scenario");
        let summary = run(&scenario, 20_000, FRAME);

        assert_ne!(summary.outcome, Outcome::TimedOut);
        assert_eq!(summary.spawned, 12);
        assert_eq!(summary.kills + summary.leaks, 12);
        assert!(summary.shots > 0);
        assert!(summary.damage_dealt > 0);
        assert!(summary.gold >= 100 + u64::from(summary.kills) * 3);
        assert_eq!(summary.lives, 20 - summary.leaks);
    }

    #[test]
    fn identical_runs_match() {
        let scenario = Scenario::demo().expect("demo scenario");
        assert_eq!(run(&scenario, 400, FRAME), run(&scenario, 400, FRAME));
    }

    #[test]
    fn undefended_path_leaks_until_defeat() {
        let scenario = Scenario::parse(
            r#"
            name = "open gate"
            path = [[0.0, 0.0], [80.0, 0.0]]

            [config]
            starting_lives = 3

            [[waves]]
            count = 5
            interval_ms = 100
            health = 10
            speed = 4.0
            "#,
        )
        .expect("scenario");

        let summary = run(&scenario, 1_000, FRAME);

        assert_eq!(summary.outcome, Outcome::Defeated);
        assert_eq!(summary.lives, 0);
        assert_eq!(summary.leaks, 3);
        assert_eq!(summary.kills, 0);
        assert_eq!(summary.shots, 0);
    }

    #[test]
    fn tick_budget_bounds_the_run() {
        let scenario = Scenario::demo().expect("demo scenario");
        let summary = run(&scenario, 10, FRAME);

        assert_eq!(summary.outcome, Outcome::TimedOut);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.elapsed_ms, 500);
    }
}

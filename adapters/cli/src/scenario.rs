//! Scenario files describing a headless combat session.
//!
//! A scenario is a TOML document holding the combat configuration, the
//! waypoint path every enemy walks, the towers to place and the waves the
//! runner spawns on a timetable.

use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use glam::Vec2;
use rampart_core::{
    CombatConfig, DamageMultipliers, EnemySpawn, TargetingMode, TowerDefinition, WaypointPath,
};
use serde::Deserialize;
use thiserror::Error;

/// Built-in scenario used when no file is given.
pub(crate) const DEMO_SCENARIO: &str = include_str!("../scenarios/demo.toml");

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario at {path}")]
    Read {
        /// Location of the scenario file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The document is not a valid scenario.
    #[error("failed to parse scenario toml")]
    Parse(#[from] toml::de::Error),
    /// The path has no waypoints.
    #[error("scenario path has no waypoints")]
    EmptyPath,
    /// A waypoint is not a finite point.
    #[error("waypoint {index} is not finite")]
    NonFiniteWaypoint {
        /// Index of the offending waypoint.
        index: usize,
    },
    /// A tower is placed at a non-finite position.
    #[error("tower {index} is placed at a non-finite position")]
    NonFiniteTower {
        /// Index of the offending tower.
        index: usize,
    },
    /// A wave spawns nothing.
    #[error("wave {index} spawns no enemies")]
    EmptyWave {
        /// Index of the offending wave.
        index: usize,
    },
}

/// Parsed scenario document.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Display name used in summaries.
    #[serde(default = "default_name")]
    pub(crate) name: String,
    /// Combat configuration installed before the first tick.
    #[serde(default)]
    pub(crate) config: CombatConfig,
    /// Waypoints shared by every spawned enemy.
    pub(crate) path: Vec<Vec2>,
    /// Towers placed before the first tick.
    #[serde(default)]
    pub(crate) towers: Vec<TowerEntry>,
    /// Spawn timetable.
    #[serde(default)]
    pub(crate) waves: Vec<Wave>,
}

/// Tower placement entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TowerEntry {
    pub(crate) position: Vec2,
    #[serde(default)]
    pub(crate) targeting: TargetingMode,
    #[serde(default)]
    pub(crate) definition: TowerDefinition,
}

/// Group of identical enemies released at a fixed interval.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Wave {
    /// Simulation time of the first spawn, in milliseconds.
    #[serde(default)]
    pub(crate) at_ms: u64,
    pub(crate) count: u32,
    #[serde(default)]
    pub(crate) interval_ms: u64,
    pub(crate) health: u32,
    pub(crate) speed: f32,
    #[serde(default)]
    pub(crate) reward: u32,
    #[serde(default)]
    pub(crate) multipliers: DamageMultipliers,
}

/// Spawn due at a given simulation time.
#[derive(Clone, Debug)]
pub(crate) struct TimedSpawn {
    pub(crate) due: Duration,
    pub(crate) spawn: EnemySpawn,
}

fn default_name() -> String {
    "unnamed".to_owned()
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates a scenario document.
    pub(crate) fn parse(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// The built-in demo scenario.
    pub(crate) fn demo() -> Result<Self, ScenarioError> {
        Self::parse(DEMO_SCENARIO)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.path.is_empty() {
            return Err(ScenarioError::EmptyPath);
        }
        if let Some(index) = self.path.iter().position(|point| !point.is_finite()) {
            return Err(ScenarioError::NonFiniteWaypoint { index });
        }
        if let Some(index) = self
            .towers
            .iter()
            .position(|tower| !tower.position.is_finite())
        {
            return Err(ScenarioError::NonFiniteTower { index });
        }
        if let Some(index) = self.waves.iter().position(|wave| wave.count == 0) {
            return Err(ScenarioError::EmptyWave { index });
        }
        Ok(())
    }

    /// Every spawn of every wave, ordered by due time.
    ///
    /// Spawns due at the same instant keep their wave order.
    pub(crate) fn timetable(&self) -> Vec<TimedSpawn> {
        let path = WaypointPath::from_points(self.path.clone());
        let mut timetable: Vec<TimedSpawn> = self
            .waves
            .iter()
            .flat_map(|wave| {
                let path = path.clone();
                (0..wave.count).map(move |index| TimedSpawn {
                    due: Duration::from_millis(
                        wave.at_ms
                            .saturating_add(wave.interval_ms.saturating_mul(u64::from(index))),
                    ),
                    spawn: EnemySpawn::new(path.clone(), wave.health, wave.speed, wave.reward)
                        .with_multipliers(wave.multipliers),
                })
            })
            .collect();
        timetable.sort_by_key(|entry| entry.due);
        timetable
    }
}

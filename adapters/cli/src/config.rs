//! Arena configuration loading and validation.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use runner_arena_core::ArenaConfig;
use thiserror::Error;

/// Arena settings that would break the simulation's invariants.
#[derive(Clone, Debug, PartialEq, Error)]
pub(crate) enum ConfigError {
    /// The arena needs an obstacle to aim at from the first tick.
    #[error("at least one opening obstacle is required")]
    NoOpeningObstacles,
    /// Opening obstacles must be listed front to back.
    #[error("opening obstacle {index} at x={x} lies ahead of the one before it")]
    UnsortedOpening {
        /// Position of the offending entry.
        index: usize,
        /// Its horizontal position.
        x: f32,
    },
    /// Spawns could land ahead of the previous obstacle.
    #[error("base gap {base_gap} must exceed spawn jitter {jitter}")]
    GapTooNarrow {
        /// Configured base gap.
        base_gap: f32,
        /// Configured jitter spread.
        jitter: i32,
    },
    /// Scores and speeds are measured per tick.
    #[error("ticks per second must be positive")]
    ZeroTickRate,
    /// The kind roll needs at least one face.
    #[error("obstacle kind roll needs at least one side")]
    EmptyRoll,
}

/// Reads the arena from `path`, or returns the defaults when no path is given.
pub(crate) fn load_arena(path: Option<&Path>) -> Result<ArenaConfig> {
    let arena = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read arena config at {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse arena config {}", path.display()))?
        }
        None => ArenaConfig::default(),
    };

    validate(&arena).context("invalid arena config")?;
    Ok(arena)
}

/// Checks the settings the session would otherwise reject with a panic.
pub(crate) fn validate(arena: &ArenaConfig) -> Result<(), ConfigError> {
    let opening = &arena.obstacles.opening;
    if opening.is_empty() {
        return Err(ConfigError::NoOpeningObstacles);
    }
    if let Some(index) = (1..opening.len()).find(|&index| opening[index].x < opening[index - 1].x)
    {
        return Err(ConfigError::UnsortedOpening {
            index,
            x: opening[index].x,
        });
    }

    let spawn = &arena.spawn;
    if spawn.base_gap <= spawn.jitter.saturating_abs() as f32 {
        return Err(ConfigError::GapTooNarrow {
            base_gap: spawn.base_gap,
            jitter: spawn.jitter,
        });
    }
    if arena.ticks_per_second == 0 {
        return Err(ConfigError::ZeroTickRate);
    }
    if spawn.roll_sides == 0 {
        return Err(ConfigError::EmptyRoll);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runner_arena_core::ObstacleSeed;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate(&ArenaConfig::default()), Ok(()));
    }

    #[test]
    fn empty_opening_is_rejected() {
        let mut arena = ArenaConfig::default();
        arena.obstacles.opening.clear();
        assert_eq!(validate(&arena), Err(ConfigError::NoOpeningObstacles));
    }

    #[test]
    fn unsorted_opening_is_rejected() {
        let mut arena = ArenaConfig::default();
        arena.obstacles.opening = vec![
            ObstacleSeed::ground(500.0),
            ObstacleSeed::ground(900.0),
            ObstacleSeed::ground(700.0),
        ];
        assert_eq!(
            validate(&arena),
            Err(ConfigError::UnsortedOpening { index: 2, x: 700.0 })
        );
    }

    #[test]
    fn jitter_wider_than_gap_is_rejected() {
        let mut arena = ArenaConfig::default();
        arena.spawn.jitter = 500;
        assert!(matches!(
            validate(&arena),
            Err(ConfigError::GapTooNarrow { jitter: 500, .. })
        ));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let mut arena = ArenaConfig::default();
        arena.ticks_per_second = 0;
        assert_eq!(validate(&arena), Err(ConfigError::ZeroTickRate));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_arena(Some(Path::new("/nonexistent/arena.toml")))
            .expect_err("missing file must fail");
        assert!(format!("{error:#}").contains("/nonexistent/arena.toml"));
    }

    #[test]
    fn loads_overrides_from_file() {
        let path = std::env::temp_dir().join(format!("runner-arena-{}.toml", std::process::id()));
        fs::write(&path, "ticks_per_second = 60\n[spawn]\njitter = 50\n").expect("write temp config");

        let arena = load_arena(Some(&path)).expect("valid config");
        let _ = fs::remove_file(&path);

        assert_eq!(arena.ticks_per_second, 60);
        assert_eq!(arena.spawn.jitter, 50);
        assert_eq!(arena.spawn.base_gap, 500.0);
    }
}

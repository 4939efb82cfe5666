#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic obstacle generator that extends the sequence as runners advance.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runner_arena_core::{Command, Event, HeightBand, ObstacleKind, Score, SpawnTuning};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tuning: SpawnTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and seed.
    #[must_use]
    pub const fn new(tuning: SpawnTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Position of the current last obstacle and the score it should be spaced for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnAnchor {
    /// Horizontal position of the last obstacle in the sequence.
    pub last_x: f32,
    /// Score of the running session.
    pub score: Score,
}

/// Pure system that emits one spawn command each time the nearest obstacle is passed.
#[derive(Debug)]
pub struct Spawning {
    tuning: SpawnTuning,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and the current anchor to emit spawn commands.
    ///
    /// Nothing is emitted without an anchor; the world always holds at least
    /// one obstacle while runners are alive.
    pub fn handle(
        &mut self,
        events: &[Event],
        anchor: Option<SpawnAnchor>,
        out: &mut Vec<Command>,
    ) {
        let Some(mut anchor) = anchor else {
            return;
        };

        for event in events {
            if !matches!(event, Event::NearestObstacleAdvanced { .. }) {
                continue;
            }

            let kind = self.roll_kind();
            let jitter = self.roll_jitter();
            let kind = match kind {
                RolledKind::Ground => ObstacleKind::Ground,
                RolledKind::Aerial => ObstacleKind::Aerial(self.roll_band()),
            };
            let x = spawn_x(anchor.last_x, anchor.score, jitter, &self.tuning);

            out.push(Command::SpawnObstacle { kind, x });
            anchor.last_x = x;
        }
    }

    fn roll_kind(&mut self) -> RolledKind {
        let sides = self.tuning.roll_sides.max(1);
        let roll = self.rng.gen_range(1..=sides);
        if roll <= self.tuning.ground_roll_max {
            RolledKind::Ground
        } else {
            RolledKind::Aerial
        }
    }

    fn roll_jitter(&mut self) -> i32 {
        let spread = self.tuning.jitter.saturating_abs();
        self.rng.gen_range(-spread..=spread)
    }

    fn roll_band(&mut self) -> HeightBand {
        HeightBand::ALL[self.rng.gen_range(0..HeightBand::ALL.len())]
    }
}

/// Horizontal position for the obstacle that follows one at `last_x`.
///
/// The gap widens by `score_gap_factor` pixels per second of score.
#[must_use]
pub fn spawn_x(last_x: f32, score: Score, jitter: i32, tuning: &SpawnTuning) -> f32 {
    let score_gap = tuning.score_gap_factor * score.as_secs_f64() as f32;
    last_x + tuning.base_gap + score_gap + jitter as f32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RolledKind {
    Ground,
    Aerial,
}

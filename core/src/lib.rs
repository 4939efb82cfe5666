#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Runner Arena simulation.
//!
//! This crate defines the message surface that connects the session loop,
//! the authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Controllers plug in through the [`Controller`] trait and presentation
//! adapters through [`FrameObserver`]; neither may mutate the world.

mod config;
mod geometry;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{AgentTuning, ArenaConfig, BoxSize, ObstacleSeed, ObstacleTuning, SpawnTuning};
pub use geometry::{collides, Hitbox};

/// Number of values in a sensor feature vector.
pub const FEATURE_COUNT: usize = 6;

/// Number of actions a controller scores.
pub const ACTION_COUNT: usize = 3;

/// Unique identifier assigned to a runner when its session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Movement decisions a controller can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Stand upright and keep running.
    Run,
    /// Duck into the low sliding pose.
    Slide,
    /// Leave the ground; cannot be interrupted until landing.
    Jump,
}

impl Action {
    /// Actions in controller output order.
    pub const ALL: [Action; ACTION_COUNT] = [Action::Run, Action::Slide, Action::Jump];

    /// Maps a controller output index to its action.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Movement state of a runner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Feet on the ground, upright.
    #[default]
    Running,
    /// Airborne and following the jump arc.
    Jumping,
    /// Feet on the ground, crouched.
    Sliding,
}

/// Altitude bands that aerial obstacles fly in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightBand {
    /// Just above the ground; jump over it.
    Low,
    /// Skims the ground; jump over it.
    Medium,
    /// Head height; slide under it.
    High,
    /// Above a running runner; keep running.
    Highest,
}

impl HeightBand {
    /// Every band, in draw order used by the generator.
    pub const ALL: [HeightBand; 4] = [
        HeightBand::Low,
        HeightBand::Medium,
        HeightBand::High,
        HeightBand::Highest,
    ];
}

/// Variants of obstacles that advance toward the runners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Runs along the ground line with an inset hitbox.
    Ground,
    /// Flies in a fixed band with a hitbox equal to its sprite.
    Aerial(HeightBand),
}

/// Fixed-order sensor vector handed to controllers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
    values: [f32; FEATURE_COUNT],
}

impl Features {
    /// Assembles the vector from its named components.
    #[must_use]
    pub const fn new(
        gap: f32,
        obstacle_speed: f32,
        obstacle_top: f32,
        obstacle_bottom: f32,
        agent_top: f32,
        agent_bottom: f32,
    ) -> Self {
        Self {
            values: [
                gap,
                obstacle_speed,
                obstacle_top,
                obstacle_bottom,
                agent_top,
                agent_bottom,
            ],
        }
    }

    /// Horizontal distance from the runner's trailing edge to the obstacle's leading edge.
    #[must_use]
    pub const fn gap(&self) -> f32 {
        self.values[0]
    }

    /// Obstacle speed expressed in pixels per second.
    #[must_use]
    pub const fn obstacle_speed(&self) -> f32 {
        self.values[1]
    }

    /// Top edge of the obstacle hitbox.
    #[must_use]
    pub const fn obstacle_top(&self) -> f32 {
        self.values[2]
    }

    /// Bottom edge of the obstacle hitbox.
    #[must_use]
    pub const fn obstacle_bottom(&self) -> f32 {
        self.values[3]
    }

    /// Top edge of the runner hitbox.
    #[must_use]
    pub const fn agent_top(&self) -> f32 {
        self.values[4]
    }

    /// Bottom edge of the runner hitbox.
    #[must_use]
    pub const fn agent_bottom(&self) -> f32 {
        self.values[5]
    }

    /// Values in controller input order.
    #[must_use]
    pub const fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }
}

/// Decision capability paired with a single runner.
///
/// Implementations receive the runner's sensor vector once per tick while it
/// is on the ground and return one score per [`Action`], in [`Action::ALL`]
/// order. They must return promptly; the whole simulation waits on them.
pub trait Controller {
    /// Scores each action for the provided sensor reading.
    fn evaluate(&mut self, features: &Features) -> Vec<f32>;
}

impl<F> Controller for F
where
    F: FnMut(&Features) -> Vec<f32>,
{
    fn evaluate(&mut self, features: &Features) -> Vec<f32> {
        self(features)
    }
}

/// Elapsed simulated time, stored in whole hundredths of a second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Score(u64);

impl Score {
    /// Score of a session that has not ticked yet.
    pub const ZERO: Score = Score(0);

    /// Converts a tick count into seconds rounded to two decimals.
    #[must_use]
    pub fn from_ticks(ticks: u64, ticks_per_second: u32) -> Self {
        let rate = u64::from(ticks_per_second.max(1));
        Self(ticks.saturating_mul(100).saturating_add(rate / 2) / rate)
    }

    /// Creates a score from hundredths of a second.
    #[must_use]
    pub const fn from_centis(centis: u64) -> Self {
        Self(centis)
    }

    /// Hundredths of a second contained in the score.
    #[must_use]
    pub const fn centis(&self) -> u64 {
        self.0
    }

    /// Score expressed in seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves the nearest-obstacle pointer forward if the lead runner passed it.
    AdvanceNearestObstacle,
    /// Appends a new obstacle behind the current last one.
    SpawnObstacle {
        /// Variant of the obstacle to create.
        kind: ObstacleKind,
        /// Horizontal spawn position of the obstacle sprite.
        x: f32,
    },
    /// Retires every runner whose hitbox collides with the nearest obstacle.
    ResolveCollisions,
    /// Credits one tick of survival to every living runner.
    RewardSurvivors,
    /// Requests that a runner switch to the provided action.
    Act {
        /// Runner receiving the decision.
        agent: AgentId,
        /// Decision selected by the runner's controller.
        action: Action,
    },
    /// Advances every runner's movement by one tick.
    MoveAgents,
    /// Advances every obstacle by one tick and drops expired ones.
    AdvanceObstacles,
    /// Advances the simulation clock and score by one tick.
    AdvanceClock,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The lead runner passed the nearest obstacle; the next one in spawn order is now nearest.
    NearestObstacleAdvanced {
        /// Obstacle that was just passed.
        passed: ObstacleId,
    },
    /// An obstacle joined the sequence.
    ObstacleSpawned {
        /// Identifier assigned to the obstacle.
        obstacle: ObstacleId,
        /// Variant of the obstacle.
        kind: ObstacleKind,
        /// Horizontal spawn position.
        x: f32,
        /// Speed inherited from the previous obstacle.
        speed: f32,
    },
    /// An obstacle drifted past the expiry threshold and was removed.
    ObstacleExpired {
        /// Identifier of the removed obstacle.
        obstacle: ObstacleId,
    },
    /// A runner collided and was removed together with its controller.
    AgentRetired {
        /// Identifier of the retired runner.
        agent: AgentId,
        /// Fitness accumulated before the collision; frozen from now on.
        fitness: u64,
        /// Zero-based tick during which the collision happened.
        tick: u64,
    },
    /// The last runner was retired.
    PopulationExtinct,
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks completed so far.
        ticks: u64,
        /// Score after the tick.
        score: Score,
    },
}

/// Immutable representation of a single runner used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Identifier assigned to the runner.
    pub id: AgentId,
    /// Current movement state.
    pub pose: Pose,
    /// Collision rectangle derived from position and pose.
    pub hitbox: Hitbox,
    /// Fitness accumulated so far.
    pub fitness: u64,
    /// Presentation-only animation counter.
    pub animation_frame: u32,
}

/// Immutable representation of a single obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Identifier assigned to the obstacle.
    pub id: ObstacleId,
    /// Variant of the obstacle.
    pub kind: ObstacleKind,
    /// Full sprite footprint.
    pub bounds: Hitbox,
    /// Collision rectangle.
    pub hitbox: Hitbox,
    /// Current speed in pixels per tick.
    pub speed: f32,
    /// Whether the obstacle is the sole collision and sensor target.
    pub nearest: bool,
    /// Presentation-only animation counter.
    pub animation_frame: u32,
}

/// Debug overlays shown while a session is young.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugOverlay {
    /// Outline every hitbox.
    pub hitboxes: bool,
    /// Highlight the nearest obstacle.
    pub nearest: bool,
    /// Show the colour legend.
    pub legend: bool,
}

impl DebugOverlay {
    /// Enables every overlay while `score` is within the first `window_secs` seconds.
    #[must_use]
    pub fn for_score(score: Score, window_secs: f64) -> Self {
        let active = score.as_secs_f64() <= window_secs;
        Self {
            hitboxes: active,
            nearest: active,
            legend: active,
        }
    }
}

/// Read-only view of one completed tick handed to presentation adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Number of ticks completed in the session.
    pub ticks: u64,
    /// Living runners ordered by identifier.
    pub agents: Vec<AgentSnapshot>,
    /// Obstacles ordered by ascending x.
    pub obstacles: Vec<ObstacleSnapshot>,
    /// Score of the current session.
    pub score: Score,
    /// Best score observed across the campaign.
    pub high_score: Score,
    /// One-based generation number of the session.
    pub generation: u32,
    /// Debug overlays active for this frame.
    pub overlay: DebugOverlay,
}

/// Receives a snapshot after every completed tick.
pub trait FrameObserver {
    /// Consumes the snapshot of the tick that just completed.
    fn observe(&mut self, frame: &FrameSnapshot);
}

impl<F> FrameObserver for F
where
    F: FnMut(&FrameSnapshot),
{
    fn observe(&mut self, frame: &FrameSnapshot) {
        self(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, DebugOverlay, Score};

    #[test]
    fn score_rounds_ticks_to_hundredths() {
        assert_eq!(Score::from_ticks(0, 30), Score::ZERO);
        assert_eq!(Score::from_ticks(1, 30).centis(), 3);
        assert_eq!(Score::from_ticks(2, 30).centis(), 7);
        assert_eq!(Score::from_ticks(30, 30).centis(), 100);
        assert_eq!(Score::from_ticks(51, 30).to_string(), "1.70");
    }

    #[test]
    fn score_tolerates_zero_rate() {
        assert_eq!(Score::from_ticks(3, 0).centis(), 300);
    }

    #[test]
    fn action_indices_follow_controller_order() {
        assert_eq!(Action::from_index(0), Some(Action::Run));
        assert_eq!(Action::from_index(1), Some(Action::Slide));
        assert_eq!(Action::from_index(2), Some(Action::Jump));
        assert_eq!(Action::from_index(3), None);
    }

    #[test]
    fn overlay_switches_off_after_window() {
        let early = DebugOverlay::for_score(Score::from_centis(1_000), 10.0);
        assert!(early.hitboxes && early.nearest && early.legend);

        let late = DebugOverlay::for_score(Score::from_centis(1_001), 10.0);
        assert_eq!(late, DebugOverlay::default());
    }
}

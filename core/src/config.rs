//! Static arena constants supplied once at startup.

use serde::{Deserialize, Serialize};

use crate::{HeightBand, ObstacleKind, Pose};

/// Width and height of an axis-aligned box measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    /// Horizontal extent in pixels.
    pub width: f32,
    /// Vertical extent in pixels.
    pub height: f32,
}

impl BoxSize {
    /// Creates a new box size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Obstacle placed into the arena before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSeed {
    /// Variant of the obstacle.
    pub kind: ObstacleKind,
    /// Horizontal spawn position of the obstacle sprite.
    pub x: f32,
}

impl ObstacleSeed {
    /// Creates a ground obstacle seed at the provided x.
    #[must_use]
    pub const fn ground(x: f32) -> Self {
        Self {
            kind: ObstacleKind::Ground,
            x,
        }
    }

    /// Creates an aerial obstacle seed flying in the provided band.
    #[must_use]
    pub const fn aerial(band: HeightBand, x: f32) -> Self {
        Self {
            kind: ObstacleKind::Aerial(band),
            x,
        }
    }
}

/// Runner geometry and jump physics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    /// Fixed horizontal position of every runner.
    pub x: f32,
    /// Box occupied while running.
    pub running: BoxSize,
    /// Box occupied while airborne.
    pub jumping: BoxSize,
    /// Box occupied while sliding.
    pub sliding: BoxSize,
    /// Vertical velocity applied when a jump starts; negative is upwards.
    pub jump_velocity: f32,
    /// Velocity added every tick while airborne.
    pub gravity: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            x: 100.0,
            running: BoxSize::new(34.0, 42.0),
            jumping: BoxSize::new(33.0, 44.0),
            sliding: BoxSize::new(35.0, 24.0),
            jump_velocity: -20.0,
            gravity: 3.0,
        }
    }
}

/// Obstacle geometry, motion and lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Sprite footprint of ground obstacles.
    pub ground: BoxSize,
    /// Distance ground sprites sink below the ground line.
    pub ground_sink: f32,
    /// Fraction of the ground sprite width trimmed from the front of its hitbox.
    pub ground_front_inset: f32,
    /// Pixels trimmed from the bottom of the ground hitbox.
    pub ground_bottom_trim: f32,
    /// Sprite footprint and hitbox of aerial obstacles.
    pub aerial: BoxSize,
    /// Speed in pixels per tick given to opening obstacles.
    pub initial_speed: f32,
    /// Speed gained by every obstacle each tick.
    pub speed_increment: f32,
    /// Obstacles whose x falls below this value are removed.
    pub expiry_x: f32,
    /// Obstacles placed before the first tick, sorted by x.
    pub opening: Vec<ObstacleSeed>,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            ground: BoxSize::new(68.0, 52.0),
            ground_sink: 5.0,
            ground_front_inset: 0.3,
            ground_bottom_trim: 5.0,
            aerial: BoxSize::new(73.0, 33.0),
            initial_speed: 14.0,
            speed_increment: 0.005,
            expiry_x: -1_000.0,
            opening: vec![ObstacleSeed::ground(1_000.0), ObstacleSeed::ground(1_500.0)],
        }
    }
}

/// Knobs of the procedural obstacle generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Minimum spacing between consecutive obstacles before jitter.
    pub base_gap: f32,
    /// Extra spacing added per second of score; grows gaps as the run lasts.
    pub score_gap_factor: f32,
    /// Jitter is drawn uniformly from `-jitter..=jitter` whole pixels.
    pub jitter: i32,
    /// Number of faces on the kind roll.
    pub roll_sides: u32,
    /// Rolls up to and including this value spawn ground obstacles.
    pub ground_roll_max: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_gap: 500.0,
            score_gap_factor: 10.0,
            jitter: 100,
            roll_sides: 10,
            ground_roll_max: 6,
        }
    }
}

/// Complete set of static constants describing the arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Width of the visible arena.
    pub screen_width: f32,
    /// Height of the visible arena.
    pub screen_height: f32,
    /// Height of the ground strip above the bottom of the screen.
    pub ground_offset: f32,
    /// Nominal simulation rate used for scoring and speed features.
    pub ticks_per_second: u32,
    /// Seconds of score during which debug overlays stay visible.
    pub debug_overlay_secs: f64,
    /// Runner geometry and physics.
    pub agent: AgentTuning,
    /// Obstacle geometry and motion.
    pub obstacles: ObstacleTuning,
    /// Obstacle generator knobs.
    pub spawn: SpawnTuning,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            screen_width: 960.0,
            screen_height: 300.0,
            ground_offset: 20.0,
            ticks_per_second: 30,
            debug_overlay_secs: 10.0,
            agent: AgentTuning::default(),
            obstacles: ObstacleTuning::default(),
            spawn: SpawnTuning::default(),
        }
    }
}

impl ArenaConfig {
    /// Y coordinate of the ground line that runners stand on.
    #[must_use]
    pub fn ground_line(&self) -> f32 {
        self.screen_height - self.ground_offset
    }

    /// Box occupied by a runner in the provided pose.
    #[must_use]
    pub fn pose_size(&self, pose: Pose) -> BoxSize {
        match pose {
            Pose::Running => self.agent.running,
            Pose::Jumping => self.agent.jumping,
            Pose::Sliding => self.agent.sliding,
        }
    }

    /// Top edge of an aerial obstacle flying in the provided band.
    ///
    /// `Low` and `Medium` sit close to the ground and must be jumped, `High`
    /// clips a running runner's head and must be slid under, and `Highest`
    /// clears a running runner entirely.
    #[must_use]
    pub fn band_top(&self, band: HeightBand) -> f32 {
        let ground = self.ground_line();
        let plane = self.obstacles.aerial.height;
        let runner = self.agent.running.height;
        match band {
            HeightBand::Low => ground - plane - 5.0,
            HeightBand::Medium => ground - 35.0,
            HeightBand::High => ground - runner - plane + 1.0,
            HeightBand::Highest => ground - runner - plane * 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_match_arena_layout() {
        let config = ArenaConfig::default();
        assert_eq!(config.ground_line(), 280.0);
        assert_eq!(config.band_top(HeightBand::Low), 242.0);
        assert_eq!(config.band_top(HeightBand::Medium), 245.0);
        assert_eq!(config.band_top(HeightBand::High), 206.0);
        assert_eq!(config.band_top(HeightBand::Highest), 188.5);
    }

    #[test]
    fn partial_toml_overrides_keep_remaining_defaults() {
        let config: ArenaConfig = toml::from_str(
            r#"
            ticks_per_second = 60

            [spawn]
            ground_roll_max = 10
            "#,
        )
        .expect("valid arena toml");

        assert_eq!(config.ticks_per_second, 60);
        assert_eq!(config.spawn.ground_roll_max, 10);
        assert_eq!(config.spawn.base_gap, 500.0);
        assert_eq!(config.agent, AgentTuning::default());
        assert_eq!(config.obstacles.opening.len(), 2);
    }

    #[test]
    fn opening_obstacles_parse_from_toml() {
        let config: ArenaConfig = toml::from_str(
            r#"
            [[obstacles.opening]]
            kind = "Ground"
            x = 600.0

            [[obstacles.opening]]
            kind = { Aerial = "High" }
            x = 1200.0
            "#,
        )
        .expect("valid opening list");

        assert_eq!(
            config.obstacles.opening,
            vec![
                ObstacleSeed::ground(600.0),
                ObstacleSeed::aerial(HeightBand::High, 1_200.0),
            ]
        );
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ready-made controllers that can drive runners.
//!
//! The simulation only sees the [`Controller`] trait; this crate supplies a
//! few concrete decision makers for demos, tests and the command-line driver.

mod network;

use runner_arena_core::{Action, ArenaConfig, Controller, Features, ACTION_COUNT};

pub use network::{FeedForward, NetworkError};

/// Scores `action` highest and every other action zero.
#[must_use]
pub fn one_hot(action: Action) -> Vec<f32> {
    let mut scores = vec![0.0; ACTION_COUNT];
    if let Some(index) = Action::ALL.iter().position(|candidate| *candidate == action) {
        scores[index] = 1.0;
    }
    scores
}

/// Always picks the same action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constant(pub Action);

impl Controller for Constant {
    fn evaluate(&mut self, _features: &Features) -> Vec<f32> {
        one_hot(self.0)
    }
}

/// Jumps once the nearest obstacle is closer than `threshold`, otherwise runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapThreshold {
    /// Gap in pixels below which the runner jumps.
    pub threshold: f32,
}

impl Controller for GapThreshold {
    fn evaluate(&mut self, features: &Features) -> Vec<f32> {
        if features.gap() < self.threshold {
            one_hot(Action::Jump)
        } else {
            one_hot(Action::Run)
        }
    }
}

/// Hand-written policy that reads the obstacle's altitude before reacting.
///
/// Obstacles that end above a running runner's head are ignored, those that
/// end above a sliding runner's head are ducked, and everything else is
/// jumped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reflex {
    threshold: f32,
    run_line: f32,
    duck_line: f32,
}

impl Reflex {
    /// Builds a reflex policy for the provided arena that reacts within `threshold` pixels.
    #[must_use]
    pub fn for_arena(config: &ArenaConfig, threshold: f32) -> Self {
        let ground = config.ground_line();
        Self {
            threshold,
            run_line: ground - config.agent.running.height,
            duck_line: ground - config.agent.sliding.height,
        }
    }
}

impl Controller for Reflex {
    fn evaluate(&mut self, features: &Features) -> Vec<f32> {
        let action = if features.gap() >= self.threshold
            || features.obstacle_bottom() <= self.run_line
        {
            Action::Run
        } else if features.obstacle_bottom() <= self.duck_line {
            Action::Slide
        } else {
            Action::Jump
        };
        one_hot(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runner_arena_core::HeightBand;

    fn facing(gap: f32, top: f32, bottom: f32) -> Features {
        Features::new(gap, 420.0, top, bottom, 238.0, 280.0)
    }

    #[test]
    fn one_hot_marks_single_action() {
        assert_eq!(one_hot(Action::Run), vec![1.0, 0.0, 0.0]);
        assert_eq!(one_hot(Action::Slide), vec![0.0, 1.0, 0.0]);
        assert_eq!(one_hot(Action::Jump), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn gap_threshold_jumps_only_when_close() {
        let mut controller = GapThreshold { threshold: 70.0 };
        assert_eq!(
            controller.evaluate(&facing(200.0, 233.0, 280.0)),
            one_hot(Action::Run)
        );
        assert_eq!(
            controller.evaluate(&facing(69.0, 233.0, 280.0)),
            one_hot(Action::Jump)
        );
    }

    #[test]
    fn reflex_matches_each_band_to_its_escape() {
        let config = ArenaConfig::default();
        let mut controller = Reflex::for_arena(&config, 70.0);
        let plane = config.obstacles.aerial.height;
        let band = |band: HeightBand| {
            let top = config.band_top(band);
            facing(30.0, top, top + plane)
        };

        assert_eq!(controller.evaluate(&band(HeightBand::Highest)), one_hot(Action::Run));
        assert_eq!(controller.evaluate(&band(HeightBand::High)), one_hot(Action::Slide));
        assert_eq!(controller.evaluate(&band(HeightBand::Medium)), one_hot(Action::Jump));
        assert_eq!(controller.evaluate(&band(HeightBand::Low)), one_hot(Action::Jump));
        assert_eq!(
            controller.evaluate(&facing(30.0, 233.0, 280.0)),
            one_hot(Action::Jump)
        );
        assert_eq!(
            controller.evaluate(&facing(300.0, 233.0, 280.0)),
            one_hot(Action::Run)
        );
    }
}

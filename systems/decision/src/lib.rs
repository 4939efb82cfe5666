#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sensor and decision pipeline that turns controller scores into runner actions.
//!
//! Every tick the pipeline reads each grounded runner's sensors against the
//! nearest obstacle, asks that runner's controller for action scores, and
//! emits one [`Command::Act`] per valid decision. Airborne runners are skipped
//! because a jump cannot be interrupted.

use runner_arena_core::{
    Action, AgentId, AgentSnapshot, Command, Features, ObstacleSnapshot, Pose, ACTION_COUNT,
};
use thiserror::Error;
use tracing::warn;

/// Reasons a controller's output was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ControllerFault {
    /// The controller returned the wrong number of scores.
    #[error("controller returned {actual} scores, expected {expected}")]
    WrongLength {
        /// Number of scores the pipeline expects.
        expected: usize,
        /// Number of scores the controller produced.
        actual: usize,
    },
    /// A score was NaN or infinite.
    #[error("controller score {index} is not finite ({value})")]
    NonFinite {
        /// Position of the offending score.
        index: usize,
        /// Offending value.
        value: f32,
    },
}

/// Builds the sensor vector for `agent` facing `obstacle`.
#[must_use]
pub fn sense(agent: &AgentSnapshot, obstacle: &ObstacleSnapshot, ticks_per_second: u32) -> Features {
    let target = obstacle.hitbox;
    Features::new(
        target.left() - agent.hitbox.right(),
        obstacle.speed * ticks_per_second as f32,
        target.top(),
        target.bottom(),
        agent.hitbox.top(),
        agent.hitbox.bottom(),
    )
}

/// Normalises scores into probabilities.
///
/// The maximum is subtracted before exponentiating so large scores cannot overflow.
#[must_use]
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|score| (score - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}

/// Selects an action from raw controller scores.
///
/// Scores are softmax-normalised and divided by their maximum; the first
/// action whose ratio equals exactly one wins, so ties resolve to the lowest
/// index.
///
/// # Errors
///
/// Returns [`ControllerFault`] when the output has the wrong length or holds
/// a non-finite value.
pub fn select_action(scores: &[f32]) -> Result<Action, ControllerFault> {
    if scores.len() != ACTION_COUNT {
        return Err(ControllerFault::WrongLength {
            expected: ACTION_COUNT,
            actual: scores.len(),
        });
    }
    if let Some((index, &value)) = scores
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(ControllerFault::NonFinite { index, value });
    }

    let probabilities = softmax(scores);
    let peak = probabilities.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let index = probabilities
        .iter()
        .position(|probability| probability / peak == 1.0)
        .unwrap_or(0);

    Ok(Action::from_index(index).unwrap_or(Action::Run))
}

/// Decision system that queues actions for grounded runners.
#[derive(Debug)]
pub struct Decision {
    ticks_per_second: u32,
    scratch: Vec<Command>,
}

impl Decision {
    /// Creates a decision system that reports obstacle speed per second at the provided rate.
    #[must_use]
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second,
            scratch: Vec::new(),
        }
    }

    /// Emits `Command::Act` entries for every grounded runner.
    ///
    /// The `evaluate` closure runs the controller paired with a runner and
    /// returns `None` when that runner is gone. Rejected outputs leave the
    /// runner's pose unchanged for this tick.
    pub fn handle<F>(
        &mut self,
        agents: &[AgentSnapshot],
        nearest: Option<&ObstacleSnapshot>,
        mut evaluate: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(AgentId, &Features) -> Option<Vec<f32>>,
    {
        let Some(nearest) = nearest else {
            return;
        };

        self.scratch.clear();

        for agent in agents {
            if agent.pose == Pose::Jumping {
                continue;
            }

            let features = sense(agent, nearest, self.ticks_per_second);
            let Some(scores) = evaluate(agent.id, &features) else {
                continue;
            };

            match select_action(&scores) {
                Ok(action) => self.scratch.push(Command::Act {
                    agent: agent.id,
                    action,
                }),
                Err(fault) => warn!(agent = agent.id.get(), %fault, "controller output rejected"),
            }
        }

        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let probabilities = softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probabilities[2] > probabilities[1]);
    }

    #[test]
    fn softmax_handles_large_scores() {
        let probabilities = softmax(&[1_000.0, 0.0, 1_000.0]);
        assert!(probabilities.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn ties_between_run_and_jump_choose_run() {
        assert_eq!(select_action(&[2.0, -1.0, 2.0]), Ok(Action::Run));
    }

    #[test]
    fn tie_between_slide_and_jump_chooses_slide() {
        assert_eq!(select_action(&[0.0, 5.0, 5.0]), Ok(Action::Slide));
    }

    #[test]
    fn clear_winner_is_selected() {
        assert_eq!(select_action(&[0.1, 0.2, 3.0]), Ok(Action::Jump));
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            select_action(&[1.0, 2.0]),
            Err(ControllerFault::WrongLength {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        assert!(matches!(
            select_action(&[0.0, f32::NAN, 1.0]),
            Err(ControllerFault::NonFinite { index: 1, .. })
        ));
        assert!(matches!(
            select_action(&[f32::INFINITY, 0.0, 1.0]),
            Err(ControllerFault::NonFinite { index: 0, .. })
        ));
    }
}

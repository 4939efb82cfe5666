//! Small feed-forward network: features → hidden (tanh) → action scores.

use rand::Rng;
use runner_arena_core::{Controller, Features, ACTION_COUNT, FEATURE_COUNT};
use thiserror::Error;

/// Reasons a network layout is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The hidden layer must hold at least one unit.
    #[error("network needs at least one hidden unit")]
    NoHiddenUnits,
    /// The flat weight vector does not fit the requested layout.
    #[error("network with {hidden} hidden units needs {expected} weights, got {actual}")]
    WeightCount {
        /// Requested hidden layer width.
        hidden: usize,
        /// Number of weights the layout requires.
        expected: usize,
        /// Number of weights supplied.
        actual: usize,
    },
}

/// Fully connected network with a single tanh hidden layer and linear outputs.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedForward {
    hidden: usize,
    // input→hidden (FEATURE_COUNT × hidden), hidden bias, hidden→output (hidden × ACTION_COUNT), output bias
    weights: Vec<f32>,
}

impl FeedForward {
    /// Number of weights needed for a network with `hidden` hidden units.
    #[must_use]
    pub const fn weight_count(hidden: usize) -> usize {
        FEATURE_COUNT * hidden + hidden + hidden * ACTION_COUNT + ACTION_COUNT
    }

    /// Builds a network from a flat weight vector in layer order.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NoHiddenUnits`] when `hidden` is zero and
    /// [`NetworkError::WeightCount`] when `weights` does not hold exactly
    /// [`FeedForward::weight_count`] values.
    pub fn from_weights(hidden: usize, weights: Vec<f32>) -> Result<Self, NetworkError> {
        if hidden == 0 {
            return Err(NetworkError::NoHiddenUnits);
        }
        let expected = Self::weight_count(hidden);
        if weights.len() != expected {
            return Err(NetworkError::WeightCount {
                hidden,
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { hidden, weights })
    }

    /// Draws every weight uniformly from `-1.0..1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NoHiddenUnits`] when `hidden` is zero.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, hidden: usize) -> Result<Self, NetworkError> {
        let weights = (0..Self::weight_count(hidden))
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        Self::from_weights(hidden, weights)
    }

    /// Forward pass returning one score per action.
    #[must_use]
    pub fn forward(&self, input: &[f32; FEATURE_COUNT]) -> [f32; ACTION_COUNT] {
        let (w_ih, rest) = self.weights.split_at(FEATURE_COUNT * self.hidden);
        let (b_h, rest) = rest.split_at(self.hidden);
        let (w_ho, b_o) = rest.split_at(self.hidden * ACTION_COUNT);

        let mut hidden = b_h.to_vec();
        for (row, &x) in w_ih.chunks_exact(self.hidden).zip(input) {
            for (h, &w) in hidden.iter_mut().zip(row) {
                *h += x * w;
            }
        }
        for h in &mut hidden {
            *h = h.tanh();
        }

        let mut output = [0.0; ACTION_COUNT];
        output.copy_from_slice(b_o);
        for (row, &h) in w_ho.chunks_exact(ACTION_COUNT).zip(&hidden) {
            for (o, &w) in output.iter_mut().zip(row) {
                *o += h * w;
            }
        }
        output
    }
}

impl Controller for FeedForward {
    fn evaluate(&mut self, features: &Features) -> Vec<f32> {
        self.forward(features.as_array()).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn weight_count_matches_layout() {
        assert_eq!(FeedForward::weight_count(4), 6 * 4 + 4 + 4 * 3 + 3);
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        assert_eq!(
            FeedForward::from_weights(4, vec![0.0; 5]),
            Err(NetworkError::WeightCount {
                hidden: 4,
                expected: 43,
                actual: 5,
            })
        );
    }

    #[test]
    fn empty_hidden_layer_is_rejected() {
        assert_eq!(
            FeedForward::random(&mut ChaCha8Rng::seed_from_u64(1), 0),
            Err(NetworkError::NoHiddenUnits)
        );
        assert_eq!(
            FeedForward::from_weights(0, vec![0.0; ACTION_COUNT]),
            Err(NetworkError::NoHiddenUnits)
        );
    }

    #[test]
    fn zero_weights_score_every_action_zero() {
        let network =
            FeedForward::from_weights(3, vec![0.0; FeedForward::weight_count(3)]).expect("layout");
        assert_eq!(network.forward(&[10.0; FEATURE_COUNT]), [0.0; ACTION_COUNT]);
    }

    #[test]
    fn output_bias_passes_through_idle_hidden_layer() {
        let hidden = 2;
        let mut weights = vec![0.0; FeedForward::weight_count(hidden)];
        let len = weights.len();
        weights[len - ACTION_COUNT..].copy_from_slice(&[0.5, -1.0, 2.0]);
        let network = FeedForward::from_weights(hidden, weights).expect("layout");
        assert_eq!(network.forward(&[1.0; FEATURE_COUNT]), [0.5, -1.0, 2.0]);
    }

    #[test]
    fn random_networks_are_seeded() {
        let first = FeedForward::random(&mut ChaCha8Rng::seed_from_u64(3), 5).expect("layout");
        let second = FeedForward::random(&mut ChaCha8Rng::seed_from_u64(3), 5).expect("layout");
        let other = FeedForward::random(&mut ChaCha8Rng::seed_from_u64(4), 5).expect("layout");
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.weights.iter().all(|w| (-1.0..1.0).contains(w)));
    }

    #[test]
    fn evaluate_returns_one_score_per_action() {
        let mut network =
            FeedForward::random(&mut ChaCha8Rng::seed_from_u64(9), 4).expect("layout");
        let features = Features::new(120.0, 420.0, 233.0, 280.0, 238.0, 280.0);
        let scores = network.evaluate(&features);
        assert_eq!(scores.len(), ACTION_COUNT);
        assert!(scores.iter().all(|score| score.is_finite()));
    }
}

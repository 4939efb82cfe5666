//! State that outlives a single session.

use runner_arena_core::Score;

/// Generation counter, best score and score history shared by every session of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Campaign {
    generation: u32,
    high_score: Score,
    history: Vec<Score>,
    max_generations: Option<u32>,
}

impl Campaign {
    /// Creates a campaign without a generation limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a campaign that is complete after `max_generations` sessions.
    #[must_use]
    pub fn with_generation_limit(max_generations: u32) -> Self {
        Self {
            max_generations: Some(max_generations),
            ..Self::default()
        }
    }

    /// One-based number of the most recently started session; zero before the first.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Best score reached by any session so far.
    #[must_use]
    pub const fn high_score(&self) -> Score {
        self.high_score
    }

    /// Final scores of completed sessions, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Score] {
        &self.history
    }

    /// Generation bound supplied at construction.
    #[must_use]
    pub const fn max_generations(&self) -> Option<u32> {
        self.max_generations
    }

    /// Reports whether the generation bound has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.max_generations
            .is_some_and(|limit| self.generation >= limit)
    }

    pub(crate) fn begin_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn observe_score(&mut self, score: Score) {
        if score > self.high_score {
            self.high_score = score;
        }
    }

    pub(crate) fn record(&mut self, score: Score) {
        self.history.push(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_only_rises() {
        let mut campaign = Campaign::new();
        campaign.observe_score(Score::from_centis(300));
        campaign.observe_score(Score::from_centis(120));
        assert_eq!(campaign.high_score(), Score::from_centis(300));
    }

    #[test]
    fn generation_limit_completes_campaign() {
        let mut campaign = Campaign::with_generation_limit(2);
        assert!(!campaign.is_complete());
        assert_eq!(campaign.begin_generation(), 1);
        assert!(!campaign.is_complete());
        assert_eq!(campaign.begin_generation(), 2);
        assert!(campaign.is_complete());
    }

    #[test]
    fn unlimited_campaign_never_completes() {
        let mut campaign = Campaign::new();
        for _ in 0..1_000 {
            let _ = campaign.begin_generation();
        }
        assert!(!campaign.is_complete());
    }
}

//! Wall-clock pacing for live sessions.

use std::{
    thread,
    time::{Duration, Instant},
};

/// How a session relates simulated ticks to wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Holds a fixed tick rate by sleeping between ticks.
    RealTime {
        /// Target number of ticks per wall-clock second.
        ticks_per_second: u32,
    },
    /// Runs ticks back to back.
    #[default]
    Headless,
}

/// Sleeps until each tick's deadline; never tries to catch up on missed ticks.
#[derive(Debug)]
pub(crate) struct Pacer {
    interval: Option<Duration>,
    deadline: Option<Instant>,
}

impl Pacer {
    pub(crate) fn new(pacing: Pacing) -> Self {
        let interval = match pacing {
            Pacing::RealTime { ticks_per_second } if ticks_per_second > 0 => {
                Some(Duration::from_secs(1) / ticks_per_second)
            }
            Pacing::RealTime { .. } | Pacing::Headless => None,
        };
        Self {
            interval,
            deadline: None,
        }
    }

    pub(crate) fn wait(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };

        let now = Instant::now();
        let deadline = self.deadline.unwrap_or(now + interval);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.deadline = Some(deadline.max(now) + interval);
    }
}

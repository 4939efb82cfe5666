//! Rendering backend that reports scenes through the log instead of a window.

use anyhow::Result;
use runner_arena_rendering::{Presentation, RenderingBackend, Scene};
use tracing::{debug, info};

/// Logs the heads-up text of every `interval`-th scene.
#[derive(Debug)]
pub(crate) struct LogBackend {
    interval: u64,
    presented: u64,
}

impl LogBackend {
    pub(crate) fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            presented: 0,
        }
    }
}

impl RenderingBackend for LogBackend {
    fn present(&mut self, presentation: &Presentation, scene: &Scene) -> Result<()> {
        self.presented += 1;
        debug!(
            window = %presentation.window_title,
            sprites = scene.sprites.len(),
            outlines = scene.outlines.len(),
            "scene presented"
        );
        if self.presented % self.interval == 0 {
            info!("{}", scene.hud.join(" | "));
        }
        Ok(())
    }
}

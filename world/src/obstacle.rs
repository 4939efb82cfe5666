//! Obstacle state and motion.

use runner_arena_core::{ArenaConfig, Hitbox, ObstacleId, ObstacleKind};

const TICKS_PER_IMAGE: u32 = 3;
const GROUND_IMAGES: u32 = 8;
const AERIAL_IMAGES: u32 = 2;

/// Obstacle stored inside the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Obstacle {
    pub(crate) id: ObstacleId,
    pub(crate) kind: ObstacleKind,
    pub(crate) bounds: Hitbox,
    pub(crate) hitbox_offset: Hitbox,
    pub(crate) speed: f32,
    pub(crate) animation: u32,
}

impl Obstacle {
    /// Builds an obstacle of the provided kind with its sprite anchored at `x`.
    ///
    /// Ground hitboxes cover the back of the sprite and stop short of its feet;
    /// aerial hitboxes cover the whole sprite.
    pub(crate) fn spawn(
        id: ObstacleId,
        kind: ObstacleKind,
        x: f32,
        speed: f32,
        config: &ArenaConfig,
    ) -> Self {
        let tuning = &config.obstacles;
        let (bounds, hitbox_offset) = match kind {
            ObstacleKind::Ground => {
                let size = tuning.ground;
                let y = config.ground_line() - size.height + tuning.ground_sink;
                let inset = size.width * tuning.ground_front_inset;
                (
                    Hitbox::new(x, y, size.width, size.height),
                    Hitbox::new(
                        inset,
                        0.0,
                        size.width - inset,
                        size.height - tuning.ground_bottom_trim,
                    ),
                )
            }
            ObstacleKind::Aerial(band) => {
                let size = tuning.aerial;
                (
                    Hitbox::new(x, config.band_top(band), size.width, size.height),
                    Hitbox::new(0.0, 0.0, size.width, size.height),
                )
            }
        };

        Self {
            id,
            kind,
            bounds,
            hitbox_offset,
            speed,
            animation: 0,
        }
    }

    pub(crate) const fn x(&self) -> f32 {
        self.bounds.left()
    }

    /// Right edge of the sprite; runners beyond it have passed the obstacle.
    pub(crate) fn trailing_edge(&self) -> f32 {
        self.bounds.right()
    }

    pub(crate) fn hitbox(&self) -> Hitbox {
        Hitbox::new(
            self.bounds.left() + self.hitbox_offset.left(),
            self.bounds.top() + self.hitbox_offset.top(),
            self.hitbox_offset.width(),
            self.hitbox_offset.height(),
        )
    }

    /// Moves left by the current speed, then accelerates.
    pub(crate) fn advance(&mut self, speed_increment: f32) {
        self.bounds = Hitbox::new(
            self.bounds.left() - self.speed,
            self.bounds.top(),
            self.bounds.width(),
            self.bounds.height(),
        );
        self.speed += speed_increment;

        let images = match self.kind {
            ObstacleKind::Ground => GROUND_IMAGES,
            ObstacleKind::Aerial(_) => AERIAL_IMAGES,
        };
        self.animation = (self.animation + 1) % (TICKS_PER_IMAGE * images);
    }
}

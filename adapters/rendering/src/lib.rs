#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Runner Arena adapters.
//!
//! Frames published by a session are translated into a backend-agnostic
//! [`Scene`]: sprites keyed by what they depict, debug outlines, a legend and
//! the heads-up text. Backends only need to draw what the scene lists.

use anyhow::Result as AnyResult;
use glam::Vec2;
use runner_arena_core::{ArenaConfig, FrameObserver, FrameSnapshot, Hitbox, ObstacleKind, Pose};
use thiserror::Error;
use tracing::warn;

/// Ticks each animation image stays on screen.
pub const TICKS_PER_IMAGE: u32 = 3;

/// Pixels the nearest-obstacle highlight extends beyond the hitbox.
pub const NEAREST_MARGIN: f32 = 5.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            1.0,
        )
    }
}

/// Outline color of every hitbox.
pub const HITBOX_COLOR: Color = Color::from_rgb_u8(255, 0, 0);
/// Outline color of the nearest-obstacle highlight.
pub const NEAREST_COLOR: Color = Color::from_rgb_u8(0, 0, 255);
/// Color of heads-up text.
pub const TEXT_COLOR: Color = Color::from_rgb_u8(0, 0, 0);

/// Artwork a sprite should be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Runner animation strip for the provided pose.
    Runner(Pose),
    /// Ground obstacle animation strip.
    Dinosaur,
    /// Aerial obstacle animation strip.
    Plane,
}

/// Animated image placed in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Artwork to draw.
    pub key: SpriteKey,
    /// Zero-based image within the animation strip.
    pub frame: u32,
    /// Top-left corner in screen pixels.
    pub position: Vec2,
    /// Width and height in screen pixels.
    pub size: Vec2,
}

/// Unfilled rectangle drawn over the sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    /// Top-left corner in screen pixels.
    pub position: Vec2,
    /// Width and height in screen pixels.
    pub size: Vec2,
    /// Stroke color.
    pub color: Color,
}

impl Outline {
    fn around(hitbox: Hitbox, color: Color) -> Self {
        Self {
            position: Vec2::new(hitbox.left(), hitbox.top()),
            size: Vec2::new(hitbox.width(), hitbox.height()),
            color,
        }
    }
}

/// Legend line explaining an outline color.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Text shown next to the swatch.
    pub label: String,
    /// Swatch color.
    pub color: Color,
}

/// Scene description of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Visible arena size in pixels.
    pub size: Vec2,
    /// Y coordinate of the ground line.
    pub ground_y: f32,
    /// Sprites in draw order: obstacles first, runners on top.
    pub sprites: Vec<Sprite>,
    /// Debug outlines drawn after the sprites.
    pub outlines: Vec<Outline>,
    /// Legend entries; empty once the debug overlay switches off.
    pub legend: Vec<LegendEntry>,
    /// Heads-up text lines, top to bottom.
    pub hud: Vec<String>,
}

impl Scene {
    /// Translates a frame into drawable content for the provided arena.
    #[must_use]
    pub fn from_frame(frame: &FrameSnapshot, config: &ArenaConfig) -> Self {
        let mut sprites = Vec::with_capacity(frame.obstacles.len() + frame.agents.len());
        let mut outlines = Vec::new();

        for obstacle in &frame.obstacles {
            let key = match obstacle.kind {
                ObstacleKind::Ground => SpriteKey::Dinosaur,
                ObstacleKind::Aerial(_) => SpriteKey::Plane,
            };
            sprites.push(sprite(key, obstacle.animation_frame, obstacle.bounds));

            if frame.overlay.hitboxes {
                outlines.push(Outline::around(obstacle.hitbox, HITBOX_COLOR));
            }
            if frame.overlay.nearest && obstacle.nearest {
                outlines.push(Outline::around(
                    obstacle.hitbox.inflate(NEAREST_MARGIN),
                    NEAREST_COLOR,
                ));
            }
        }

        for agent in &frame.agents {
            sprites.push(sprite(
                SpriteKey::Runner(agent.pose),
                agent.animation_frame,
                agent.hitbox,
            ));
            if frame.overlay.hitboxes {
                outlines.push(Outline::around(agent.hitbox, HITBOX_COLOR));
            }
        }

        let legend = if frame.overlay.legend {
            vec![
                LegendEntry {
                    label: "hitbox".to_owned(),
                    color: HITBOX_COLOR,
                },
                LegendEntry {
                    label: "nearest".to_owned(),
                    color: NEAREST_COLOR,
                },
            ]
        } else {
            Vec::new()
        };

        Self {
            size: Vec2::new(config.screen_width, config.screen_height),
            ground_y: config.ground_line(),
            sprites,
            outlines,
            legend,
            hud: vec![
                format!("Score: {}", frame.score),
                format!("High score: {}", frame.high_score),
                format!("Generation: {}", frame.generation),
                format!("Alive: {}", frame.agents.len()),
            ],
        }
    }
}

fn sprite(key: SpriteKey, animation_frame: u32, bounds: Hitbox) -> Sprite {
    Sprite {
        key,
        frame: animation_frame / TICKS_PER_IMAGE,
        position: Vec2::new(bounds.left(), bounds.top()),
        size: Vec2::new(bounds.width(), bounds.height()),
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The arena must have a positive area to be drawn.
    #[error("arena size must be positive (received {width}x{height})")]
    InvalidArenaSize {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Window size in pixels.
    pub size: Vec2,
}

impl Presentation {
    /// Constructs a presentation sized to the arena.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidArenaSize`] when the arena has no area.
    pub fn for_arena<T>(
        window_title: T,
        clear_color: Color,
        config: &ArenaConfig,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        let (width, height) = (config.screen_width, config.screen_height);
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidArenaSize { width, height });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            size: Vec2::new(width, height),
        })
    }
}

/// Rendering backend capable of presenting Runner Arena scenes.
pub trait RenderingBackend {
    /// Draws one scene.
    fn present(&mut self, presentation: &Presentation, scene: &Scene) -> AnyResult<()>;
}

/// Frame observer that draws every frame through a backend.
///
/// Backend failures are logged and counted; the simulation keeps running.
#[derive(Debug)]
pub struct ScenePresenter<B> {
    backend: B,
    presentation: Presentation,
    config: ArenaConfig,
    failures: u64,
}

impl<B> ScenePresenter<B>
where
    B: RenderingBackend,
{
    /// Creates a presenter drawing frames of the provided arena.
    #[must_use]
    pub fn new(backend: B, presentation: Presentation, config: ArenaConfig) -> Self {
        Self {
            backend,
            presentation,
            config,
            failures: 0,
        }
    }

    /// Number of frames the backend failed to present.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    /// Gives back the backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B> FrameObserver for ScenePresenter<B>
where
    B: RenderingBackend,
{
    fn observe(&mut self, frame: &FrameSnapshot) {
        let scene = Scene::from_frame(frame, &self.config);
        if let Err(error) = self.backend.present(&self.presentation, &scene) {
            self.failures += 1;
            warn!(ticks = frame.ticks, %error, "failed to present frame");
        }
    }
}

//! Runner movement state machine.

use runner_arena_core::{Action, ArenaConfig, Hitbox, Pose};

/// Ticks each animation image stays on screen.
const TICKS_PER_IMAGE: u32 = 3;
/// Images in every runner animation strip.
const IMAGES_PER_POSE: u32 = 10;

/// Physical state of a single runner.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Agent {
    x: f32,
    y: f32,
    pose: Pose,
    /// Only meaningful while `pose` is `Jumping`.
    velocity: f32,
    animation: u32,
}

impl Agent {
    /// Places a runner on the ground in the running pose.
    pub(crate) fn new(config: &ArenaConfig) -> Self {
        Self {
            x: config.agent.x,
            y: config.ground_line() - config.agent.running.height,
            pose: Pose::Running,
            velocity: 0.0,
            animation: 0,
        }
    }

    pub(crate) const fn pose(&self) -> Pose {
        self.pose
    }

    pub(crate) const fn x(&self) -> f32 {
        self.x
    }

    pub(crate) const fn animation(&self) -> u32 {
        self.animation
    }

    pub(crate) fn hitbox(&self, config: &ArenaConfig) -> Hitbox {
        let size = config.pose_size(self.pose);
        Hitbox::new(self.x, self.y, size.width, size.height)
    }

    /// Switches pose according to `action`. Ignored mid-jump.
    pub(crate) fn apply(&mut self, action: Action, config: &ArenaConfig) {
        if self.pose == Pose::Jumping {
            return;
        }

        let next = match action {
            Action::Run => Pose::Running,
            Action::Slide => Pose::Sliding,
            Action::Jump => Pose::Jumping,
        };

        if next != self.pose {
            self.animation = 0;
        }
        if next == Pose::Jumping {
            self.velocity = config.agent.jump_velocity;
        }
        self.pose = next;
    }

    /// Advances the runner by one tick.
    pub(crate) fn advance(&mut self, config: &ArenaConfig) {
        let ground = config.ground_line();
        match self.pose {
            Pose::Running | Pose::Sliding => {
                self.y = ground - config.pose_size(self.pose).height;
            }
            Pose::Jumping => {
                self.y += self.velocity;
                self.velocity += config.agent.gravity;

                if self.y + config.agent.jumping.height >= ground {
                    self.pose = Pose::Running;
                    self.velocity = 0.0;
                    self.y = ground - config.agent.running.height;
                    self.animation = 0;
                }
            }
        }

        self.animation = (self.animation + 1) % (TICKS_PER_IMAGE * IMAGES_PER_POSE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ArenaConfig {
        ArenaConfig::default()
    }

    #[test]
    fn new_agent_stands_on_ground() {
        let config = config();
        let agent = Agent::new(&config);
        assert_eq!(agent.pose(), Pose::Running);
        assert_eq!(agent.hitbox(&config).bottom(), config.ground_line());
    }

    #[test]
    fn slide_keeps_feet_on_ground_after_advance() {
        let config = config();
        let mut agent = Agent::new(&config);
        agent.apply(Action::Slide, &config);
        agent.advance(&config);

        let hitbox = agent.hitbox(&config);
        assert_eq!(agent.pose(), Pose::Sliding);
        assert_eq!(hitbox.height(), config.agent.sliding.height);
        assert_eq!(hitbox.bottom(), config.ground_line());
    }

    #[test]
    fn jump_follows_arc_and_lands_on_ground_line() {
        let config = config();
        let mut agent = Agent::new(&config);
        agent.apply(Action::Jump, &config);

        let mut heights = Vec::new();
        let mut ticks = 0;
        while agent.pose() == Pose::Jumping {
            agent.advance(&config);
            heights.push(agent.hitbox(&config).top());
            ticks += 1;
            assert!(ticks < 100, "jump never landed");
        }

        assert_eq!(&heights[..3], &[218.0, 201.0, 187.0]);
        assert_eq!(ticks, 15);
        assert_eq!(agent.hitbox(&config).bottom(), config.ground_line());
    }

    #[test]
    fn jump_cannot_be_interrupted() {
        let config = config();
        let mut agent = Agent::new(&config);
        agent.apply(Action::Jump, &config);
        agent.advance(&config);

        agent.apply(Action::Slide, &config);
        assert_eq!(agent.pose(), Pose::Jumping);
        agent.apply(Action::Run, &config);
        assert_eq!(agent.pose(), Pose::Jumping);
    }

    #[test]
    fn animation_wraps_after_full_strip() {
        let config = config();
        let mut agent = Agent::new(&config);
        for _ in 0..30 {
            agent.advance(&config);
        }
        assert_eq!(agent.animation(), 0);
    }
}

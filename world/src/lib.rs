#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Runner Arena.

mod agent;
mod obstacle;

use std::fmt;

use runner_arena_core::{
    collides, AgentId, ArenaConfig, Command, Controller, Event, Features, ObstacleId,
    ObstacleKind, Score,
};
use tracing::{debug, trace};

use self::{agent::Agent, obstacle::Obstacle};

/// Runner paired with its controller and fitness counter.
///
/// Keeping all three in one entry means retiring a runner can never leave a
/// controller or a fitness value behind.
struct Runner {
    id: AgentId,
    agent: Agent,
    controller: Box<dyn Controller>,
    fitness: u64,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("id", &self.id)
            .field("agent", &self.agent)
            .field("fitness", &self.fitness)
            .finish_non_exhaustive()
    }
}

/// Represents the authoritative Runner Arena world state.
#[derive(Debug)]
pub struct World {
    config: ArenaConfig,
    runners: Vec<Runner>,
    obstacles: Vec<Obstacle>,
    nearest: usize,
    next_obstacle_id: u32,
    ticks: u64,
    score: Score,
}

impl World {
    /// Creates a world with one runner per controller and the configured opening obstacles.
    ///
    /// Runners receive identifiers `0..controllers.len()` in supply order.
    ///
    /// # Panics
    ///
    /// Panics when the configuration provides no opening obstacles or lists
    /// them out of order; the nearest-obstacle pointer would be invalid.
    #[must_use]
    pub fn new(config: ArenaConfig, controllers: Vec<Box<dyn Controller>>) -> Self {
        let runners = controllers
            .into_iter()
            .zip(0_u32..)
            .map(|(controller, id)| Runner {
                id: AgentId::new(id),
                agent: Agent::new(&config),
                controller,
                fitness: 0,
            })
            .collect();

        let mut world = Self {
            runners,
            obstacles: Vec::new(),
            nearest: 0,
            next_obstacle_id: 0,
            ticks: 0,
            score: Score::ZERO,
            config,
        };

        let initial_speed = world.config.obstacles.initial_speed;
        for seed in world.config.obstacles.opening.clone() {
            let _ = world.push_obstacle(seed.kind, seed.x, initial_speed);
        }
        assert!(
            !world.obstacles.is_empty(),
            "arena requires at least one opening obstacle"
        );
        world.assert_sorted();
        world
    }

    fn push_obstacle(&mut self, kind: ObstacleKind, x: f32, speed: f32) -> ObstacleId {
        let id = ObstacleId::new(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        self.obstacles
            .push(Obstacle::spawn(id, kind, x, speed, &self.config));
        id
    }

    fn nearest_obstacle(&self) -> &Obstacle {
        assert!(
            self.nearest < self.obstacles.len(),
            "nearest obstacle index {} out of range for {} obstacles",
            self.nearest,
            self.obstacles.len()
        );
        &self.obstacles[self.nearest]
    }

    fn lead_x(&self) -> Option<f32> {
        self.runners
            .iter()
            .map(|runner| runner.agent.x())
            .reduce(f32::max)
    }

    fn assert_sorted(&self) {
        assert!(
            self.obstacles
                .windows(2)
                .all(|pair| pair[0].x() <= pair[1].x()),
            "obstacle sequence must stay sorted by x"
        );
    }

    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        if self.runners.is_empty() {
            return;
        }

        let target = self.nearest_obstacle().hitbox();
        let config = &self.config;
        let tick = self.ticks;
        self.runners.retain(|runner| {
            if !collides(&runner.agent.hitbox(config), &target) {
                return true;
            }
            debug!(
                agent = runner.id.get(),
                fitness = runner.fitness,
                tick,
                "runner retired after collision"
            );
            out_events.push(Event::AgentRetired {
                agent: runner.id,
                fitness: runner.fitness,
                tick,
            });
            false
        });

        if self.runners.is_empty() {
            out_events.push(Event::PopulationExtinct);
        }
    }

    fn advance_obstacles(&mut self, out_events: &mut Vec<Event>) {
        let increment = self.config.obstacles.speed_increment;
        for obstacle in &mut self.obstacles {
            obstacle.advance(increment);
        }

        let expiry = self.config.obstacles.expiry_x;
        let nearest = self.nearest;
        let mut index = 0;
        let mut removed_ahead = 0;
        self.obstacles.retain(|obstacle| {
            let keep = obstacle.x() >= expiry;
            if !keep {
                assert!(
                    index != nearest,
                    "nearest obstacle {} expired before being passed",
                    obstacle.id.get()
                );
                if index < nearest {
                    removed_ahead += 1;
                }
                out_events.push(Event::ObstacleExpired {
                    obstacle: obstacle.id,
                });
            }
            index += 1;
            keep
        });
        self.nearest -= removed_ahead;
        self.assert_sorted();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when a command would break the obstacle ordering or leave the
/// nearest-obstacle pointer outside the sequence.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceNearestObstacle => {
            let Some(lead_x) = world.lead_x() else {
                return;
            };
            if lead_x <= world.nearest_obstacle().trailing_edge() {
                return;
            }

            let passed = world.nearest_obstacle().id;
            world.nearest += 1;
            out_events.push(Event::NearestObstacleAdvanced { passed });
        }
        Command::SpawnObstacle { kind, x } => {
            let speed = world
                .obstacles
                .last()
                .map_or(world.config.obstacles.initial_speed, |last| last.speed);
            if let Some(last) = world.obstacles.last() {
                assert!(
                    x >= last.x(),
                    "obstacle spawned at {x} ahead of last obstacle at {}",
                    last.x()
                );
            }

            let obstacle = world.push_obstacle(kind, x, speed);
            trace!(obstacle = obstacle.get(), ?kind, x, speed, "obstacle spawned");
            out_events.push(Event::ObstacleSpawned {
                obstacle,
                kind,
                x,
                speed,
            });
        }
        Command::ResolveCollisions => world.resolve_collisions(out_events),
        Command::RewardSurvivors => {
            for runner in &mut world.runners {
                runner.fitness += 1;
            }
        }
        Command::Act { agent, action } => {
            let config = &world.config;
            if let Some(runner) = world.runners.iter_mut().find(|runner| runner.id == agent) {
                runner.agent.apply(action, config);
            }
        }
        Command::MoveAgents => {
            let config = &world.config;
            for runner in &mut world.runners {
                runner.agent.advance(config);
            }
        }
        Command::AdvanceObstacles => world.advance_obstacles(out_events),
        Command::AdvanceClock => {
            world.ticks += 1;
            world.score = Score::from_ticks(world.ticks, world.config.ticks_per_second);
            out_events.push(Event::TimeAdvanced {
                ticks: world.ticks,
                score: world.score,
            });
        }
    }
}

/// Runs the controller paired with `agent` on the provided sensor reading.
///
/// Returns `None` when the runner has been retired.
pub fn evaluate(world: &mut World, agent: AgentId, features: &Features) -> Option<Vec<f32>> {
    world
        .runners
        .iter_mut()
        .find(|runner| runner.id == agent)
        .map(|runner| runner.controller.evaluate(features))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use runner_arena_core::{AgentId, AgentSnapshot, ArenaConfig, ObstacleSnapshot, Score};

    use super::{Obstacle, World};

    /// Provides read-only access to the arena constants.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Captures the living runners in identifier order.
    #[must_use]
    pub fn agents(world: &World) -> Vec<AgentSnapshot> {
        world
            .runners
            .iter()
            .map(|runner| AgentSnapshot {
                id: runner.id,
                pose: runner.agent.pose(),
                hitbox: runner.agent.hitbox(&world.config),
                fitness: runner.fitness,
                animation_frame: runner.agent.animation(),
            })
            .collect()
    }

    /// Captures every obstacle in ascending x order.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<ObstacleSnapshot> {
        world
            .obstacles
            .iter()
            .enumerate()
            .map(|(index, obstacle)| snapshot(obstacle, index == world.nearest))
            .collect()
    }

    /// Captures the obstacle that is the sole collision and sensor target.
    #[must_use]
    pub fn nearest_obstacle(world: &World) -> Option<ObstacleSnapshot> {
        world
            .obstacles
            .get(world.nearest)
            .map(|obstacle| snapshot(obstacle, true))
    }

    /// Horizontal position of the most recently spawned obstacle.
    #[must_use]
    pub fn last_obstacle_x(world: &World) -> Option<f32> {
        world.obstacles.last().map(Obstacle::x)
    }

    /// Number of runners still alive.
    #[must_use]
    pub fn alive_count(world: &World) -> usize {
        world.runners.len()
    }

    /// Fitness of a living runner.
    #[must_use]
    pub fn fitness(world: &World, agent: AgentId) -> Option<u64> {
        world
            .runners
            .iter()
            .find(|runner| runner.id == agent)
            .map(|runner| runner.fitness)
    }

    /// Number of ticks completed.
    #[must_use]
    pub fn ticks(world: &World) -> u64 {
        world.ticks
    }

    /// Score derived from the completed ticks.
    #[must_use]
    pub fn score(world: &World) -> Score {
        world.score
    }

    fn snapshot(obstacle: &Obstacle, nearest: bool) -> ObstacleSnapshot {
        ObstacleSnapshot {
            id: obstacle.id,
            kind: obstacle.kind,
            bounds: obstacle.bounds,
            hitbox: obstacle.hitbox(),
            speed: obstacle.speed,
            nearest,
            animation_frame: obstacle.animation,
        }
    }
}

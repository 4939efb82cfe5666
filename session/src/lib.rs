#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick loop that evaluates one population against the obstacle course.
//!
//! A [`Session`] owns the world and the pure systems for a single generation.
//! Each tick it routes commands through the world in a fixed order, feeds the
//! resulting events to the systems, publishes a [`FrameSnapshot`], and stops
//! once the population is extinct or the quit signal fires. Cross-session
//! state lives in a borrowed [`Campaign`].

mod campaign;
mod pacing;

use runner_arena_core::{
    AgentId, ArenaConfig, Command, Controller, DebugOverlay, Event, FrameObserver, FrameSnapshot,
    Score,
};
use runner_arena_system_decision::Decision;
use runner_arena_system_spawning::{self as spawning, SpawnAnchor, Spawning};
use runner_arena_world::{self as world, query, World};
use tracing::info;

pub use campaign::Campaign;
pub use pacing::Pacing;

use self::pacing::Pacer;

/// Parameters that configure a single session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    arena: ArenaConfig,
    seed: u64,
    pacing: Pacing,
}

impl SessionConfig {
    /// Creates a headless configuration for the provided arena and generator seed.
    #[must_use]
    pub fn new(arena: ArenaConfig, seed: u64) -> Self {
        Self {
            arena,
            seed,
            pacing: Pacing::Headless,
        }
    }

    /// Replaces the pacing mode.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed but not ticked yet.
    Initializing,
    /// At least one tick completed and runners remain.
    Running,
    /// No further ticks will run.
    Terminated,
}

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every runner was retired.
    Extinct,
    /// The quit signal fired before the population died out.
    Quit,
}

/// Final fitness of one runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentFitness {
    /// Runner identifier; matches the position of its controller in the supplied list.
    pub agent: AgentId,
    /// Ticks survived.
    pub fitness: u64,
}

/// Summary returned once a session terminates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Generation number the session ran as.
    pub generation: u32,
    /// Why the session stopped.
    pub termination: Termination,
    /// Ticks completed.
    pub ticks: u64,
    /// Final score.
    pub score: Score,
    /// Fitness per runner, in the order the controllers were supplied.
    pub fitness: Vec<AgentFitness>,
}

/// External request to stop a session; polled once per tick.
pub trait QuitSignal {
    /// Returns `true` once the session should stop.
    fn should_quit(&mut self) -> bool;
}

impl<F> QuitSignal for F
where
    F: FnMut() -> bool,
{
    fn should_quit(&mut self) -> bool {
        self()
    }
}

/// Quit signal that never fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Never;

impl QuitSignal for Never {
    fn should_quit(&mut self) -> bool {
        false
    }
}

/// One generation of runners racing the obstacle course.
#[derive(Debug)]
pub struct Session<'c> {
    campaign: &'c mut Campaign,
    world: World,
    spawning: Spawning,
    decision: Decision,
    pacer: Pacer,
    generation: u32,
    state: SessionState,
    termination: Option<Termination>,
    fitness: Vec<u64>,
}

impl<'c> Session<'c> {
    /// Starts a new generation with one runner per controller.
    ///
    /// The campaign's generation counter advances immediately.
    #[must_use]
    pub fn new(
        campaign: &'c mut Campaign,
        config: SessionConfig,
        controllers: Vec<Box<dyn Controller>>,
    ) -> Self {
        let generation = campaign.begin_generation();
        let population = controllers.len();
        let SessionConfig {
            arena,
            seed,
            pacing,
        } = config;

        let spawning = Spawning::new(spawning::Config::new(arena.spawn, seed));
        let decision = Decision::new(arena.ticks_per_second);
        let world = World::new(arena, controllers);

        info!(generation, population, seed, "session started");

        Self {
            campaign,
            world,
            spawning,
            decision,
            pacer: Pacer::new(pacing),
            generation,
            state: SessionState::Initializing,
            termination: None,
            fitness: vec![0; population],
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Generation number of this session.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Runs ticks until the population is extinct or `quit` fires.
    pub fn run<O, Q>(mut self, observer: &mut O, mut quit: Q) -> SessionOutcome
    where
        O: FrameObserver + ?Sized,
        Q: QuitSignal,
    {
        while self.state != SessionState::Terminated {
            if quit.should_quit() {
                self.terminate(Termination::Quit);
                break;
            }
            let _ = self.step(observer);
            if self.state != SessionState::Terminated {
                self.pacer.wait();
            }
        }
        self.outcome()
    }

    /// Executes a single tick and returns the resulting state.
    ///
    /// Does nothing once the session has terminated.
    pub fn step<O>(&mut self, observer: &mut O) -> SessionState
    where
        O: FrameObserver + ?Sized,
    {
        if self.state == SessionState::Terminated {
            return self.state;
        }
        if query::alive_count(&self.world) == 0 {
            self.terminate(Termination::Extinct);
            return self.state;
        }
        self.state = SessionState::Running;

        let mut events = Vec::new();
        let mut commands = Vec::new();

        self.apply(Command::AdvanceNearestObstacle, &mut events);
        let anchor = query::last_obstacle_x(&self.world).map(|last_x| SpawnAnchor {
            last_x,
            score: query::score(&self.world),
        });
        self.spawning.handle(&events, anchor, &mut commands);
        self.apply_all(&mut commands, &mut events);

        self.apply(Command::ResolveCollisions, &mut events);
        self.apply(Command::RewardSurvivors, &mut events);

        let agents = query::agents(&self.world);
        let nearest = query::nearest_obstacle(&self.world);
        let runners = &mut self.world;
        self.decision.handle(
            &agents,
            nearest.as_ref(),
            |agent, features| world::evaluate(runners, agent, features),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);
        self.apply(Command::MoveAgents, &mut events);

        self.apply(Command::AdvanceObstacles, &mut events);
        self.apply(Command::AdvanceClock, &mut events);

        let score = query::score(&self.world);
        self.campaign.observe_score(score);
        observer.observe(&self.frame());

        if query::alive_count(&self.world) == 0 {
            self.terminate(Termination::Extinct);
        }
        self.state
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        let start = events.len();
        world::apply(&mut self.world, command, events);
        for event in &events[start..] {
            if let Event::AgentRetired { agent, fitness, .. } = event {
                if let Some(slot) = self.fitness.get_mut(agent.get() as usize) {
                    *slot = *fitness;
                }
            }
        }
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            self.apply(command, events);
        }
    }

    fn frame(&self) -> FrameSnapshot {
        let score = query::score(&self.world);
        FrameSnapshot {
            ticks: query::ticks(&self.world),
            agents: query::agents(&self.world),
            obstacles: query::obstacles(&self.world),
            score,
            high_score: self.campaign.high_score(),
            generation: self.generation,
            overlay: DebugOverlay::for_score(
                score,
                query::config(&self.world).debug_overlay_secs,
            ),
        }
    }

    fn terminate(&mut self, termination: Termination) {
        for agent in query::agents(&self.world) {
            if let Some(slot) = self.fitness.get_mut(agent.id.get() as usize) {
                *slot = agent.fitness;
            }
        }

        let score = query::score(&self.world);
        if termination == Termination::Extinct {
            self.campaign.record(score);
        }
        self.state = SessionState::Terminated;
        self.termination = Some(termination);

        info!(
            generation = self.generation,
            ?termination,
            ticks = query::ticks(&self.world),
            %score,
            high_score = %self.campaign.high_score(),
            "session ended"
        );
    }

    fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            generation: self.generation,
            termination: self.termination.unwrap_or(Termination::Quit),
            ticks: query::ticks(&self.world),
            score: query::score(&self.world),
            fitness: self
                .fitness
                .iter()
                .zip(0_u32..)
                .map(|(&fitness, id)| AgentFitness {
                    agent: AgentId::new(id),
                    fitness,
                })
                .collect(),
        }
    }
}

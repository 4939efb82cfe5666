#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Runner Arena campaigns.

mod config;
mod log_backend;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runner_arena_controllers::{FeedForward, GapThreshold, Reflex};
use runner_arena_core::{ArenaConfig, Controller};
use runner_arena_rendering::{Color, Presentation, ScenePresenter};
use runner_arena_session::{Campaign, Pacing, Session, SessionConfig, Termination};
use tracing::info;

use self::log_backend::LogBackend;

/// Gap in pixels at which the rule controllers react.
const RULE_THRESHOLD: f32 = 70.0;

#[derive(Parser, Debug)]
#[command(name = "runner-arena")]
#[command(about = "Runs populations of runners against a procedural obstacle course")]
struct Cli {
    /// Number of generations to run
    #[arg(long, default_value_t = 500)]
    generations: u32,

    /// Runners per generation
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    population: u32,

    /// Seed for controllers and obstacle generation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Decision policy given to every runner
    #[arg(long, value_enum, default_value_t = ControllerChoice::Network)]
    controller: ControllerChoice,

    /// Hidden units of generated networks
    #[arg(
        long,
        default_value_t = 8,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    hidden: usize,

    /// Hold the arena tick rate instead of running as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Stop a session after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Log the heads-up display every N frames
    #[arg(long, default_value_t = 300)]
    log_every: u64,

    /// Arena config file (TOML) overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ControllerChoice {
    /// Randomly initialised feed-forward networks
    Network,
    /// Altitude-aware reflexes
    Rule,
    /// Jump at every obstacle
    Jumper,
}

/// Entry point for the Runner Arena command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let arena = config::load_arena(cli.config.as_deref())?;

    let presentation = Presentation::for_arena(
        "Runner Arena",
        Color::from_rgb_u8(255, 255, 255),
        &arena,
    )?;
    let mut presenter = ScenePresenter::new(
        LogBackend::new(cli.log_every),
        presentation,
        arena.clone(),
    );
    let pacing = if cli.realtime {
        Pacing::RealTime {
            ticks_per_second: arena.ticks_per_second,
        }
    } else {
        Pacing::Headless
    };

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let mut campaign = Campaign::with_generation_limit(cli.generations);
    info!(
        max_generations = ?campaign.max_generations(),
        population = cli.population,
        controller = ?cli.controller,
        "campaign started"
    );

    while !campaign.is_complete() {
        let controllers = population(&cli, &arena, &mut rng)?;
        let config = SessionConfig::new(arena.clone(), rng.gen()).with_pacing(pacing);
        let outcome = Session::new(&mut campaign, config, controllers)
            .run(&mut presenter, tick_cap(cli.max_ticks));

        let best = outcome
            .fitness
            .iter()
            .map(|entry| entry.fitness)
            .max()
            .unwrap_or(0);
        info!(
            generation = outcome.generation,
            score = %outcome.score,
            best_fitness = best,
            capped = outcome.termination == Termination::Quit,
            "generation finished"
        );
    }

    info!(
        generations = campaign.generation(),
        high_score = %campaign.high_score(),
        failed_frames = presenter.failures(),
        "campaign finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Quit signal that fires once a session has run `limit` ticks.
fn tick_cap(limit: Option<u64>) -> impl FnMut() -> bool {
    let mut polls = 0_u64;
    move || {
        polls += 1;
        limit.is_some_and(|limit| polls > limit)
    }
}

fn population(
    cli: &Cli,
    arena: &ArenaConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Box<dyn Controller>>> {
    (0..cli.population)
        .map(|_| -> Result<Box<dyn Controller>> {
            let controller: Box<dyn Controller> = match cli.controller {
                ControllerChoice::Network => Box::new(
                    FeedForward::random(&mut *rng, cli.hidden)
                        .context("failed to build runner network")?,
                ),
                ControllerChoice::Rule => Box::new(Reflex::for_arena(arena, RULE_THRESHOLD)),
                ControllerChoice::Jumper => Box::new(GapThreshold {
                    threshold: RULE_THRESHOLD,
                }),
            };
            Ok(controller)
        })
        .collect()
}

use runner_arena_core::{
    ArenaConfig, Command, Controller, Event, Features, HeightBand, ObstacleId, ObstacleKind,
    ObstacleSeed, Score, SpawnTuning,
};
use runner_arena_system_spawning::{spawn_x, Config, SpawnAnchor, Spawning};
use runner_arena_world::{self as world, query, World};

fn passed(id: u32) -> Event {
    Event::NearestObstacleAdvanced {
        passed: ObstacleId::new(id),
    }
}

fn anchor(last_x: f32, score: Score) -> Option<SpawnAnchor> {
    Some(SpawnAnchor { last_x, score })
}

fn spawned(commands: &[Command]) -> Vec<(ObstacleKind, f32)> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnObstacle { kind, x } => (*kind, *x),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn emits_one_spawn_per_passed_obstacle() {
    let mut spawning = Spawning::new(Config::new(SpawnTuning::default(), 0x1234_5678));
    let mut commands = Vec::new();

    spawning.handle(
        &[
            Event::TimeAdvanced {
                ticks: 1,
                score: Score::from_ticks(1, 30),
            },
            passed(0),
            Event::PopulationExtinct,
        ],
        anchor(1_500.0, Score::ZERO),
        &mut commands,
    );

    assert_eq!(spawned(&commands).len(), 1);
}

#[test]
fn ignores_ticks_without_a_passed_obstacle() {
    let mut spawning = Spawning::new(Config::new(SpawnTuning::default(), 7));
    let mut commands = Vec::new();

    spawning.handle(
        &[Event::TimeAdvanced {
            ticks: 1,
            score: Score::from_ticks(1, 30),
        }],
        anchor(1_500.0, Score::ZERO),
        &mut commands,
    );
    spawning.handle(&[passed(0)], None, &mut commands);

    assert!(commands.is_empty(), "no spawn without a passed obstacle and anchor");
}

#[test]
fn spawn_positions_stay_within_jitter_of_the_gap() {
    let tuning = SpawnTuning::default();
    let mut spawning = Spawning::new(Config::new(tuning, 0xdead_beef));
    let score = Score::from_centis(1_250);

    for _ in 0..200 {
        let mut commands = Vec::new();
        spawning.handle(&[passed(0)], anchor(2_000.0, score), &mut commands);
        let spawns = spawned(&commands);
        assert_eq!(spawns.len(), 1, "expected exactly one spawn");
        let x = spawns[0].1;

        let centre = 2_000.0 + 500.0 + 125.0;
        assert!(
            (centre - 100.0..=centre + 100.0).contains(&x),
            "spawn at {x} outside jitter window around {centre}"
        );
    }
}

#[test]
fn gap_grows_with_score() {
    let tuning = SpawnTuning {
        jitter: 0,
        ..SpawnTuning::default()
    };

    let early = spawn_x(0.0, Score::ZERO, 0, &tuning);
    let later = spawn_x(0.0, Score::from_centis(3_000), 0, &tuning);

    assert_eq!(early, 500.0);
    assert_eq!(later, 800.0);
    assert!(later > early);
}

#[test]
fn full_ground_roll_spawns_only_ground_obstacles() {
    let tuning = SpawnTuning {
        ground_roll_max: 10,
        ..SpawnTuning::default()
    };
    let mut spawning = Spawning::new(Config::new(tuning, 99));
    let mut commands = Vec::new();

    for _ in 0..100 {
        spawning.handle(&[passed(0)], anchor(0.0, Score::ZERO), &mut commands);
    }

    assert!(spawned(&commands)
        .iter()
        .all(|(kind, _)| *kind == ObstacleKind::Ground));
}

#[test]
fn empty_ground_roll_spawns_aerial_obstacles_in_every_band() {
    let tuning = SpawnTuning {
        ground_roll_max: 0,
        ..SpawnTuning::default()
    };
    let mut spawning = Spawning::new(Config::new(tuning, 2024));
    let mut commands = Vec::new();

    for _ in 0..200 {
        spawning.handle(&[passed(0)], anchor(0.0, Score::ZERO), &mut commands);
    }

    let kinds: Vec<ObstacleKind> = spawned(&commands).into_iter().map(|(kind, _)| kind).collect();
    for band in HeightBand::ALL {
        assert!(
            kinds.contains(&ObstacleKind::Aerial(band)),
            "band {band:?} never spawned"
        );
    }
    assert!(!kinds.contains(&ObstacleKind::Ground));
}

#[test]
fn same_seed_replays_same_sequence() {
    let run = |seed: u64| {
        let mut spawning = Spawning::new(Config::new(SpawnTuning::default(), seed));
        let mut commands = Vec::new();
        let mut last_x = 1_500.0;
        for _ in 0..50 {
            let start = commands.len();
            spawning.handle(&[passed(0)], anchor(last_x, Score::ZERO), &mut commands);
            last_x = spawned(&commands[start..])[0].1;
        }
        commands
    };

    assert_eq!(run(0xabcd), run(0xabcd));
    assert_ne!(run(0xabcd), run(0xabce));
}

#[test]
fn spawned_obstacle_inherits_speed_of_last_obstacle() {
    let mut config = ArenaConfig::default();
    config.obstacles.opening = vec![ObstacleSeed::ground(0.0), ObstacleSeed::ground(600.0)];
    let tuning = config.spawn;
    let runner: Box<dyn Controller> = Box::new(|_: &Features| vec![1.0, 0.0, 0.0]);
    let mut world = World::new(config, vec![runner]);
    let mut events = Vec::new();

    world::apply(&mut world, Command::AdvanceObstacles, &mut events);
    world::apply(&mut world, Command::AdvanceObstacles, &mut events);
    events.clear();

    world::apply(&mut world, Command::AdvanceNearestObstacle, &mut events);
    assert_eq!(events, vec![passed(0)]);

    let last_speed = query::obstacles(&world)
        .last()
        .map(|obstacle| obstacle.speed)
        .expect("obstacles present");
    let last_x = query::last_obstacle_x(&world).expect("obstacles present");

    let mut spawning = Spawning::new(Config::new(tuning, 5));
    let mut commands = Vec::new();
    spawning.handle(&events, anchor(last_x, query::score(&world)), &mut commands);
    assert_eq!(commands.len(), 1);

    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    match events.as_slice() {
        [Event::ObstacleSpawned { x, speed, .. }] => {
            assert_eq!(*speed, last_speed);
            assert!(*x >= last_x);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(query::obstacles(&world).len(), 3);
}

use asteroids_core::{AsteroidSnapshot, Bounds, Command, Event, Rotation, ShipSnapshot};
use asteroids_world::{self as world, query, Config, World};

#[test]
fn same_seed_replays_identically() {
    let first = replay(0xfeed, scripted_commands());
    let second = replay(0xfeed, scripted_commands());

    assert_eq!(first.events, second.events, "event log diverged between runs");
    assert_eq!(first.asteroids, second.asteroids);
    assert_eq!(first.ship, second.ship);
}

#[test]
fn different_seeds_place_waves_differently() {
    let first = replay(1, scripted_commands());
    let second = replay(2, scripted_commands());

    let positions = |outcome: &ReplayOutcome| {
        outcome
            .asteroids
            .iter()
            .map(|asteroid| asteroid.body.position)
            .collect::<Vec<_>>()
    };
    assert_ne!(positions(&first), positions(&second));
}

#[test]
fn scripted_session_moves_the_ship_and_its_bullets() {
    let outcome = replay(7, scripted_commands());

    assert_eq!(outcome.asteroids.len(), 3);
    assert!(outcome
        .events
        .iter()
        .any(|event| matches!(event, Event::BulletFired { .. })));
    assert_ne!(outcome.ship.body.position, Bounds::CLASSIC.center());
}

struct ReplayOutcome {
    events: Vec<Event>,
    asteroids: Vec<AsteroidSnapshot>,
    ship: ShipSnapshot,
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(Config::new(Bounds::CLASSIC, 3, seed));
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        asteroids: query::asteroid_view(&world).into_vec(),
        ship: query::ship(&world),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::NewGame,
        Command::SpawnWave { level: 1, count: 3 },
    ];

    for frame in 0..90 {
        commands.push(Command::SteerShip {
            thrust: frame % 3 != 0,
            rotation: (frame % 4 == 0).then_some(Rotation::Right),
        });
        if frame % 30 == 0 {
            commands.push(Command::FireBullet);
        }
        commands.push(Command::Tick);
    }

    commands
}

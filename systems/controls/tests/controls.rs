use tron_rider_core::{Command, Direction, GamePhase, InputSignal, Velocity};
use tron_rider_system_controls::{AxisState, Controls};
use tron_rider_world::{self as world, query, World};

const PLAYER_SPEED: f32 = 7.0;

fn drive(world: &mut World, controls: &mut Controls, signals: &[InputSignal]) -> Vec<Command> {
    let mut commands = Vec::new();
    controls.handle(signals, query::phase(world), PLAYER_SPEED, &mut commands);
    for command in commands.iter().cloned() {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
    }
    commands
}

#[test]
fn held_direction_moves_bike_each_step() {
    let mut world = World::new();
    let mut controls = Controls::new();

    let _ = drive(
        &mut world,
        &mut controls,
        &[InputSignal::Press(Direction::Right)],
    );
    let mut events = Vec::new();
    world::apply(&mut world, Command::Simulate, &mut events);
    world::apply(&mut world, Command::Simulate, &mut events);

    assert!((query::player(&world).rect().x() - 114.0).abs() < f32::EPSILON);
}

#[test]
fn last_press_wins_and_release_of_owner_stops() {
    let mut world = World::new();
    let mut controls = Controls::new();

    let commands = drive(
        &mut world,
        &mut controls,
        &[
            InputSignal::Press(Direction::Up),
            InputSignal::Press(Direction::Down),
        ],
    );
    assert_eq!(
        commands,
        vec![Command::SetPlayerVelocity {
            velocity: Velocity::new(0.0, PLAYER_SPEED),
        }]
    );

    let commands = drive(
        &mut world,
        &mut controls,
        &[InputSignal::Release(Direction::Up)],
    );
    assert!(commands.is_empty(), "releasing the overridden key is inert");
    assert_eq!(
        query::player(&world).velocity(),
        Velocity::new(0.0, PLAYER_SPEED)
    );

    let commands = drive(
        &mut world,
        &mut controls,
        &[InputSignal::Release(Direction::Down)],
    );
    assert_eq!(
        commands,
        vec![Command::SetPlayerVelocity {
            velocity: Velocity::ZERO,
        }]
    );
}

#[test]
fn axes_are_independent() {
    let mut controls = Controls::new();
    let mut commands = Vec::new();
    controls.handle(
        &[
            InputSignal::Press(Direction::Left),
            InputSignal::Press(Direction::Up),
        ],
        GamePhase::Playing,
        PLAYER_SPEED,
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::SetPlayerVelocity {
            velocity: Velocity::new(-PLAYER_SPEED, -PLAYER_SPEED),
        }]
    );
}

#[test]
fn directional_input_is_ignored_after_crash() {
    let mut controls = Controls::new();
    let mut commands = Vec::new();
    controls.handle(
        &[InputSignal::Press(Direction::Right)],
        GamePhase::GameOver,
        PLAYER_SPEED,
        &mut commands,
    );
    assert!(commands.is_empty());
    assert_eq!(
        controls.axis(tron_rider_core::Axis::Horizontal),
        AxisState::Idle
    );
}

#[test]
fn restart_is_honoured_only_after_crash() {
    let mut controls = Controls::new();
    let mut commands = Vec::new();
    controls.handle(
        &[InputSignal::Restart],
        GamePhase::Playing,
        PLAYER_SPEED,
        &mut commands,
    );
    assert!(commands.is_empty());

    controls.handle(
        &[InputSignal::Press(Direction::Right)],
        GamePhase::Playing,
        PLAYER_SPEED,
        &mut commands,
    );
    commands.clear();

    controls.handle(
        &[InputSignal::Restart, InputSignal::Press(Direction::Down)],
        GamePhase::GameOver,
        PLAYER_SPEED,
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![
            Command::Restart,
            Command::SetPlayerVelocity {
                velocity: Velocity::new(0.0, PLAYER_SPEED),
            },
        ]
    );
}

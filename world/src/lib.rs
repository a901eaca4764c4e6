#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tron Rider.

mod obstacles;
mod simulation;

use std::time::Duration;

use tron_rider_core::{Command, DifficultyState, Event, GamePhase, Rect, Tuning, Velocity};

use self::obstacles::ObstacleSet;

/// Bike controlled by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    rect: Rect,
    velocity: Velocity,
}

impl Player {
    fn at_start(tuning: &Tuning) -> Self {
        Self {
            rect: tuning.player_start(),
            velocity: Velocity::ZERO,
        }
    }

    /// Rectangle occupied by the bike.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Velocity applied on the next step.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }
}

/// Represents the authoritative Tron Rider world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    clock: Duration,
    phase: GamePhase,
    player: Player,
    obstacles: ObstacleSet,
    score: u32,
    difficulty: DifficultyState,
    last_spawn: Duration,
    background_offset: f32,
}

impl World {
    /// Creates a world using the default tuning, ready for play.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates a world using the provided tuning, ready for play.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        let clock = Duration::ZERO;
        Self {
            player: Player::at_start(&tuning),
            obstacles: ObstacleSet::new(),
            score: 0,
            difficulty: DifficultyState::new(tuning.initial_speed, clock),
            last_spawn: clock,
            background_offset: 0.0,
            phase: GamePhase::Playing,
            clock,
            tuning,
        }
    }

    fn reset_session(&mut self) {
        self.player = Player::at_start(&self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.difficulty = DifficultyState::new(self.tuning.initial_speed, self.clock);
        self.last_spawn = self.clock;
        self.background_offset = 0.0;
        self.phase = GamePhase::Playing;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceClock { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                now: world.clock,
            });
        }
        Command::Simulate => simulation::step(world, out_events),
        Command::SetPlayerVelocity { velocity } => {
            world.player.velocity = velocity;
        }
        Command::RaiseSpeed => {
            if world.phase != GamePhase::Playing {
                return;
            }
            let raised = world.difficulty.raise(
                world.clock,
                world.tuning.speed_increment,
                world.tuning.max_speed,
            );
            if raised {
                let speed = world.difficulty.current_speed();
                tracing::debug!(speed, "scroll speed raised");
                out_events.push(Event::SpeedRaised { speed });
            }
        }
        Command::SpawnObstacle { top } => {
            if world.phase != GamePhase::Playing {
                return;
            }
            let rect = Rect::new(
                world.tuning.obstacle_spawn_x(),
                top,
                world.tuning.obstacle_width,
                world.tuning.obstacle_height,
            );
            let obstacle = world.obstacles.push(rect);
            world.last_spawn = world.clock;
            out_events.push(Event::ObstacleSpawned { obstacle, rect });
        }
        Command::Restart => {
            world.reset_session();
            out_events.push(Event::SessionStarted { now: world.clock });
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Playing,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Player, World};
    use tron_rider_core::{
        DifficultyState, GamePhase, ObstacleSnapshot, PlayerSnapshot, Rect, Tuning,
    };

    /// Provides read-only access to the tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Current session clock.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Phase the game is currently in.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Provides read-only access to the player's bike.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Captures an immutable snapshot of the player's bike.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            rect: world.player.rect(),
            velocity: world.player.velocity(),
        }
    }

    /// Captures the active obstacles in spawn order.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<ObstacleSnapshot> {
        world.obstacles.snapshots()
    }

    /// Rectangles of the active obstacles in spawn order.
    #[must_use]
    pub fn obstacle_rects(world: &World) -> Vec<Rect> {
        world.obstacles.iter().map(|obstacle| obstacle.rect).collect()
    }

    /// Score accumulated in the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Provides read-only access to the scroll speed state.
    #[must_use]
    pub fn difficulty(world: &World) -> &DifficultyState {
        &world.difficulty
    }

    /// Current scroll speed in pixels per tick.
    #[must_use]
    pub fn speed(world: &World) -> f32 {
        world.difficulty.current_speed()
    }

    /// Session time at which the latest obstacle spawned.
    #[must_use]
    pub fn last_spawn(world: &World) -> Duration {
        world.last_spawn
    }

    /// Horizontal offset of the tiling backdrop, in `(-screen_width, 0]`.
    #[must_use]
    pub fn background_offset(world: &World) -> f32 {
        world.background_offset
    }
}

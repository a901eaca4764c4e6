#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tron Rider engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate device input into
//! [`InputSignal`] values, systems turn signals and [`Event`] streams into
//! [`Command`] batches, and the world executes those commands via its `apply`
//! entry point before broadcasting new events. Nothing in this crate performs
//! I/O; durable storage is reached only through the [`ScoreStore`] seam.

use std::{error::Error, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caption shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "TRON RIDER: SURVIVAL MODE";

/// Coarse state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The bike is moving and obstacles are scrolling.
    Playing,
    /// The bike crashed; the session waits for an explicit restart.
    GameOver,
}

/// Axis affected by a directional input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/right movement.
    Horizontal,
    /// Up/down movement.
    Vertical,
}

/// Sign of a direction along its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisSign {
    /// Toward decreasing coordinates.
    Negative,
    /// Toward increasing coordinates.
    Positive,
}

impl AxisSign {
    /// Multiplier applied to a magnitude travelling in this direction.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }
}

/// Directional controls available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward the top of the screen.
    Up,
    /// Movement toward the bottom of the screen.
    Down,
    /// Movement toward the left edge of the screen.
    Left,
    /// Movement toward the right edge of the screen.
    Right,
}

impl Direction {
    /// Axis the direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Sign of the direction along its axis in screen coordinates.
    #[must_use]
    pub const fn sign(self) -> AxisSign {
        match self {
            Self::Up | Self::Left => AxisSign::Negative,
            Self::Down | Self::Right => AxisSign::Positive,
        }
    }
}

/// Device-independent input observed by an adapter during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSignal {
    /// A directional control was pressed.
    Press(Direction),
    /// A directional control was released.
    Release(Direction),
    /// The player asked to start a new session after crashing.
    Restart,
    /// The player asked to leave the game.
    Quit,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock by the provided delta time.
    AdvanceClock {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Runs one simulation step: movement, scrolling, collisions and scoring.
    Simulate,
    /// Replaces the player's velocity with the provided value.
    SetPlayerVelocity {
        /// Velocity applied on each subsequent step.
        velocity: Velocity,
    },
    /// Raises the scroll speed by one increment, saturating at the cap.
    RaiseSpeed,
    /// Introduces a new obstacle just beyond the right edge of the screen.
    SpawnObstacle {
        /// Vertical coordinate of the obstacle's top edge.
        top: f32,
    },
    /// Resets the session to its initial state and resumes play.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Session clock after the advance.
        now: Duration,
    },
    /// Announces that the scroll speed increased.
    SpeedRaised {
        /// Scroll speed after the increase.
        speed: f32,
    },
    /// Confirms that an obstacle entered the world.
    ObstacleSpawned {
        /// Identifier assigned to the obstacle.
        obstacle: ObstacleId,
        /// Rectangle occupied by the obstacle when it spawned.
        rect: Rect,
    },
    /// Reports that an obstacle left the screen without hitting the player.
    ObstacleCleared {
        /// Identifier of the obstacle that was removed.
        obstacle: ObstacleId,
        /// Score after crediting the obstacle.
        score: u32,
    },
    /// Reports that the player collided with an obstacle.
    Crashed {
        /// Identifier of the obstacle that was hit.
        obstacle: ObstacleId,
    },
    /// Announces that a session finished, carrying the score to persist.
    SessionEnded {
        /// Score accumulated during the session.
        final_score: u32,
    },
    /// Announces that a fresh session began.
    SessionStarted {
        /// Session clock when the session began.
        now: Duration,
    },
    /// Announces that the game entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Per-axis velocity measured in pixels per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Horizontal component; negative values move left.
    pub x: f32,
    /// Vertical component; negative values move up.
    pub y: f32,
}

impl Velocity {
    /// Velocity of a stationary body.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen coordinates (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal coordinate of the left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the rectangle moved by the provided offsets.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Reports whether the interiors of two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Pushes the rectangle back inside `[0, width]` horizontally and the
    /// road band vertically.
    ///
    /// The top and left edges are corrected first, then the bottom and right
    /// edges, so a rectangle larger than the bounds ends up flush with the
    /// far edge.
    #[must_use]
    pub fn clamped_to(self, road: RoadBand, screen_width: f32) -> Self {
        let mut clamped = self;
        if clamped.top() < road.top() {
            clamped.y = road.top();
        }
        if clamped.bottom() > road.bottom() {
            clamped.y = road.bottom() - clamped.height;
        }
        if clamped.left() < 0.0 {
            clamped.x = 0.0;
        }
        if clamped.right() > screen_width {
            clamped.x = screen_width - clamped.width;
        }
        clamped
    }
}

/// Vertical pixel range that constrains the player and obstacle spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadBand {
    top: f32,
    bottom: f32,
}

impl RoadBand {
    /// Creates a road band spanning `top..=bottom`.
    #[must_use]
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Upper boundary of the band.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Lower boundary of the band.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Vertical extent of the band.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Rectangle occupied by the bike.
    pub rect: Rect,
    /// Velocity applied on the next step.
    pub velocity: Velocity,
}

/// Immutable representation of a single obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Identifier assigned to the obstacle.
    pub id: ObstacleId,
    /// Rectangle occupied by the obstacle.
    pub rect: Rect,
}

/// Scroll speed and the time it last changed.
///
/// Speed only ever grows within a session and saturates at the configured
/// cap. Increments arrive in fixed quanta, one per elapsed interval, no
/// matter how far past the interval the clock has run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyState {
    speed: f32,
    last_increment: Duration,
}

impl DifficultyState {
    /// Creates a difficulty state starting at `initial_speed` at time `now`.
    #[must_use]
    pub const fn new(initial_speed: f32, now: Duration) -> Self {
        Self {
            speed: initial_speed,
            last_increment: now,
        }
    }

    /// Scroll speed in pixels per tick.
    #[must_use]
    pub const fn current_speed(&self) -> f32 {
        self.speed
    }

    /// Session time at which the interval counter last restarted.
    #[must_use]
    pub const fn last_increment(&self) -> Duration {
        self.last_increment
    }

    /// Reports whether at least `interval` elapsed since the last increment.
    #[must_use]
    pub fn is_due(&self, now: Duration, interval: Duration) -> bool {
        now.saturating_sub(self.last_increment) >= interval
    }

    /// Adds one `increment` without exceeding `max_speed` and restarts the
    /// interval counter at `now`.
    ///
    /// Returns `true` when the speed changed. A capped speed still restarts
    /// the counter.
    pub fn raise(&mut self, now: Duration, increment: f32, max_speed: f32) -> bool {
        self.last_increment = now;
        if self.speed >= max_speed {
            return false;
        }
        self.speed = (self.speed + increment).min(max_speed);
        true
    }
}

/// Durable storage for the single best score.
///
/// Loading never fails: missing or unreadable records read as zero.
pub trait ScoreStore {
    /// Error reported when a new record cannot be written.
    type Error: Error + Send + Sync + 'static;

    /// Returns the stored best score, or zero when no valid record exists.
    fn load_best_score(&self) -> u32;

    /// Stores `candidate` if it beats the currently stored value.
    ///
    /// Implementations re-read the stored value rather than trusting a cache.
    /// Returns `Ok(true)` when the record was overwritten.
    fn save_best_score(&mut self, candidate: u32) -> Result<bool, Self::Error>;
}

/// Fixed-at-startup tuning parameters for a game session.
///
/// Every field has a default, so configuration files only need to list the
/// values they override. Distances are measured in pixels and speeds in
/// pixels per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Width of the playfield.
    pub screen_width: f32,
    /// Height of the playfield.
    pub screen_height: f32,
    /// Upper boundary of the road band.
    pub road_top: f32,
    /// Lower boundary of the road band.
    pub road_bottom: f32,
    /// Scroll speed at the start of every session.
    pub initial_speed: f32,
    /// Cap on the scroll speed.
    pub max_speed: f32,
    /// Amount added to the scroll speed on each increment.
    pub speed_increment: f32,
    /// Milliseconds between scroll speed increments.
    pub speed_up_interval_ms: u64,
    /// Distance the bike moves per tick while a direction is held.
    pub player_speed: f32,
    /// Width of the bike sprite.
    pub player_width: f32,
    /// Height of the bike sprite.
    pub player_height: f32,
    /// Left edge of the bike when a session starts.
    pub player_start_x: f32,
    /// Top edge of the bike when a session starts.
    pub player_start_y: f32,
    /// Width of a wall obstacle.
    pub obstacle_width: f32,
    /// Height of a wall obstacle.
    pub obstacle_height: f32,
    /// Distance beyond the right edge at which obstacles appear.
    pub obstacle_spawn_offset: f32,
    /// Simulation ticks per second.
    pub tick_rate: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            road_top: 420.0,
            road_bottom: 620.0,
            initial_speed: 5.0,
            max_speed: 25.0,
            speed_increment: 0.5,
            speed_up_interval_ms: 5_000,
            player_speed: 7.0,
            player_width: 100.0,
            player_height: 60.0,
            player_start_x: 100.0,
            player_start_y: 500.0,
            obstacle_width: 50.0,
            obstacle_height: 50.0,
            obstacle_spawn_offset: 50.0,
            tick_rate: 60,
        }
    }
}

impl Tuning {
    /// Road band derived from the configured boundaries.
    #[must_use]
    pub const fn road(&self) -> RoadBand {
        RoadBand::new(self.road_top, self.road_bottom)
    }

    /// Interval between scroll speed increments.
    #[must_use]
    pub const fn speed_up_interval(&self) -> Duration {
        Duration::from_millis(self.speed_up_interval_ms)
    }

    /// Duration of a single simulation tick.
    ///
    /// A zero tick rate is rejected by [`Tuning::validate`], as is a rate
    /// fast enough to truncate the tick to zero nanoseconds. Callers that skip
    /// validation and pass zero receive one tick per second.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    /// Rectangle occupied by the bike when a session starts.
    #[must_use]
    pub const fn player_start(&self) -> Rect {
        Rect::new(
            self.player_start_x,
            self.player_start_y,
            self.player_width,
            self.player_height,
        )
    }

    /// Horizontal coordinate of the left edge of freshly spawned obstacles.
    #[must_use]
    pub fn obstacle_spawn_x(&self) -> f32 {
        self.screen_width + self.obstacle_spawn_offset
    }

    /// Checks that the parameters describe a playable session.
    pub fn validate(&self) -> Result<(), TuningError> {
        if let Some(field) = self.first_non_finite_field() {
            return Err(TuningError::NonFinite { field });
        }
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(TuningError::EmptyScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.road_top < 0.0
            || self.road_bottom > self.screen_height
            || self.road_top >= self.road_bottom
        {
            return Err(TuningError::RoadOutsideScreen {
                top: self.road_top,
                bottom: self.road_bottom,
            });
        }
        let road_height = self.road().height();
        if self.player_width <= 0.0
            || self.player_height <= 0.0
            || self.player_height > road_height
            || self.player_width > self.screen_width
        {
            return Err(TuningError::PlayerDoesNotFit {
                width: self.player_width,
                height: self.player_height,
            });
        }
        if self.obstacle_width <= 0.0
            || self.obstacle_height <= 0.0
            || self.obstacle_height > road_height
        {
            return Err(TuningError::ObstacleDoesNotFit {
                width: self.obstacle_width,
                height: self.obstacle_height,
            });
        }
        if self.initial_speed < 0.0 || self.max_speed < self.initial_speed {
            return Err(TuningError::SpeedRange {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }
        if self.player_speed <= 0.0 {
            return Err(TuningError::NonPositivePlayerSpeed {
                speed: self.player_speed,
            });
        }
        if self.speed_increment < 0.0 {
            return Err(TuningError::NegativeIncrement {
                increment: self.speed_increment,
            });
        }
        if self.speed_up_interval_ms == 0 {
            return Err(TuningError::ZeroSpeedUpInterval);
        }
        if self.tick_rate == 0 {
            return Err(TuningError::ZeroTickRate);
        }
        if self.tick_duration().is_zero() {
            return Err(TuningError::TickRateTooHigh {
                rate: self.tick_rate,
            });
        }
        Ok(())
    }

    fn first_non_finite_field(&self) -> Option<&'static str> {
        [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("road_top", self.road_top),
            ("road_bottom", self.road_bottom),
            ("initial_speed", self.initial_speed),
            ("max_speed", self.max_speed),
            ("speed_increment", self.speed_increment),
            ("player_speed", self.player_speed),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_start_x", self.player_start_x),
            ("player_start_y", self.player_start_y),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("obstacle_spawn_offset", self.obstacle_spawn_offset),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

/// Reasons a [`Tuning`] is rejected at startup.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// A numeric parameter is NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
    },
    /// The playfield has no area.
    #[error("screen must have a positive size (got {width}x{height})")]
    EmptyScreen {
        /// Configured screen width.
        width: f32,
        /// Configured screen height.
        height: f32,
    },
    /// The road band is empty or extends past the screen.
    #[error("road band {top}..{bottom} must be a non-empty range inside the screen")]
    RoadOutsideScreen {
        /// Configured road top.
        top: f32,
        /// Configured road bottom.
        bottom: f32,
    },
    /// The bike cannot fit inside the road band or the screen.
    #[error("player size {width}x{height} does not fit inside the road band")]
    PlayerDoesNotFit {
        /// Configured player width.
        width: f32,
        /// Configured player height.
        height: f32,
    },
    /// Obstacles cannot fit inside the road band.
    #[error("obstacle size {width}x{height} does not fit inside the road band")]
    ObstacleDoesNotFit {
        /// Configured obstacle width.
        width: f32,
        /// Configured obstacle height.
        height: f32,
    },
    /// The speed range is empty or negative.
    #[error("max speed {max} must be at least the non-negative initial speed {initial}")]
    SpeedRange {
        /// Configured initial speed.
        initial: f32,
        /// Configured maximum speed.
        max: f32,
    },
    /// The bike could not move, or would move against the pressed key.
    #[error("player speed {speed} must be positive")]
    NonPositivePlayerSpeed {
        /// Configured player speed.
        speed: f32,
    },
    /// Speed increments would slow the game down.
    #[error("speed increment {increment} must not be negative")]
    NegativeIncrement {
        /// Configured increment.
        increment: f32,
    },
    /// Speed would increase on every tick.
    #[error("speed-up interval must be positive")]
    ZeroSpeedUpInterval,
    /// The simulation would never advance.
    #[error("tick rate must be positive")]
    ZeroTickRate,
    /// Ticks would be shorter than the clock resolution.
    #[error("tick rate {rate} is too high for a nanosecond clock")]
    TickRateTooHigh {
        /// Configured tick rate.
        rate: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{AxisSign, DifficultyState, Direction, Rect, RoadBand, Tuning, TuningError};
    use std::time::Duration;

    #[test]
    fn overlapping_rectangles_are_detected() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn clamping_pulls_rectangle_into_road_band() {
        let road = RoadBand::new(420.0, 620.0);
        let above = Rect::new(-5.0, 400.0, 100.0, 60.0).clamped_to(road, 1280.0);
        assert_eq!(above, Rect::new(0.0, 420.0, 100.0, 60.0));

        let below = Rect::new(1200.0, 600.0, 100.0, 60.0).clamped_to(road, 1280.0);
        assert_eq!(below, Rect::new(1180.0, 560.0, 100.0, 60.0));
    }

    #[test]
    fn directions_map_to_screen_axes() {
        assert_eq!(Direction::Up.sign(), AxisSign::Negative);
        assert_eq!(Direction::Right.sign(), AxisSign::Positive);
        assert_ne!(Direction::Left.axis(), Direction::Down.axis());
    }

    #[test]
    fn difficulty_raises_in_fixed_quanta_until_capped() {
        let mut difficulty = DifficultyState::new(24.0, Duration::ZERO);
        assert!(difficulty.raise(Duration::from_secs(5), 0.5, 25.0));
        assert!((difficulty.current_speed() - 24.5).abs() < f32::EPSILON);
        assert!(difficulty.raise(Duration::from_secs(10), 0.75, 25.0));
        assert!((difficulty.current_speed() - 25.0).abs() < f32::EPSILON);
        assert!(!difficulty.raise(Duration::from_secs(15), 0.5, 25.0));
        assert_eq!(difficulty.last_increment(), Duration::from_secs(15));
    }

    #[test]
    fn difficulty_is_due_once_interval_elapsed() {
        let difficulty = DifficultyState::new(5.0, Duration::from_millis(1_000));
        let interval = Duration::from_millis(5_000);
        assert!(!difficulty.is_due(Duration::from_millis(5_999), interval));
        assert!(difficulty.is_due(Duration::from_millis(6_000), interval));
    }

    #[test]
    fn default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert_eq!(tuning.validate(), Ok(()));
        assert_eq!(tuning.speed_up_interval(), Duration::from_secs(5));
        assert!((tuning.obstacle_spawn_x() - 1330.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_configuration_keeps_defaults() {
        let tuning: Tuning = toml::from_str("max_speed = 30.0\ntick_rate = 120\n")
            .expect("partial tuning should parse");
        assert!((tuning.max_speed - 30.0).abs() < f32::EPSILON);
        assert_eq!(tuning.tick_rate, 120);
        assert!((tuning.road_top - 420.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_configuration_keys_are_rejected() {
        let parsed: Result<Tuning, _> = toml::from_str("warp_factor = 9\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_rejects_player_taller_than_road() {
        let tuning = Tuning {
            player_height: 250.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::PlayerDoesNotFit { .. })
        ));
    }

    #[test]
    fn validation_rejects_inverted_speed_range() {
        let tuning = Tuning {
            initial_speed: 10.0,
            max_speed: 5.0,
            ..Tuning::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::SpeedRange { .. })));
    }

    #[test]
    fn validation_rejects_non_finite_and_non_positive_player_speed() {
        let nan_speed: Tuning =
            toml::from_str("player_speed = nan\n").expect("nan is valid toml");
        assert_eq!(
            nan_speed.validate(),
            Err(TuningError::NonFinite {
                field: "player_speed"
            })
        );

        let nan_initial = Tuning {
            initial_speed: f32::NAN,
            ..Tuning::default()
        };
        assert_eq!(
            nan_initial.validate(),
            Err(TuningError::NonFinite {
                field: "initial_speed"
            })
        );

        let infinite_road = Tuning {
            road_bottom: f32::INFINITY,
            ..Tuning::default()
        };
        assert!(matches!(
            infinite_road.validate(),
            Err(TuningError::NonFinite { field: "road_bottom" })
        ));

        for speed in [-7.0, 0.0] {
            let tuning = Tuning {
                player_speed: speed,
                ..Tuning::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::NonPositivePlayerSpeed { .. })
            ));
        }
    }

    #[test]
    fn validation_rejects_tick_rate_below_clock_resolution() {
        let tuning = Tuning {
            tick_rate: 2_000_000_000,
            ..Tuning::default()
        };
        assert!(tuning.tick_duration().is_zero());
        assert_eq!(
            tuning.validate(),
            Err(TuningError::TickRateTooHigh {
                rate: 2_000_000_000
            })
        );

        let fastest = Tuning {
            tick_rate: 1_000_000_000,
            ..Tuning::default()
        };
        assert_eq!(fastest.validate(), Ok(()));
    }
}

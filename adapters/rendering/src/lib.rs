#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tron Rider adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use tron_rider_core::InputSignal;

/// Font size used for the score, speed and secondary game-over lines.
pub const BODY_FONT_SIZE: f32 = 30.0;
/// Font size used for the game-over headline.
pub const HEADLINE_FONT_SIZE: f32 = 60.0;
/// Opacity of the dimming layer drawn over a crashed session.
pub const GAME_OVER_DIM_ALPHA: f32 = 150.0 / 255.0;

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
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);
    /// Light-cycle cyan used for the speed readout and restart hint.
    pub const CYAN: Self = Self::from_rgb_u8(0, 255, 255);
    /// Warning red used for the crash headline.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Gold used for the best score.
    pub const GOLD: Self = Self::from_rgb_u8(255, 215, 0);

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
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Identifies sprites that backends may draw instead of primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Full-screen backdrop that tiles horizontally.
    Background,
    /// The player's light cycle.
    Bike,
    /// A wall obstacle.
    Wall,
}

/// Logical playfield size that backends scale onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport of the provided logical size.
    ///
    /// Returns an error when either dimension is not a positive finite value.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Logical width of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Logical height of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Logical centre of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned rectangle expressed in logical playfield units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPresentation {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl RectPresentation {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Horizontal band the bike is confined to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadPresentation {
    /// Upper boundary of the band.
    pub top: f32,
    /// Lower boundary of the band.
    pub bottom: f32,
}

/// Point of a label that its position refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// The position is the top-left corner of the text.
    TopLeft,
    /// The position is the centre of the text.
    Center,
}

/// Line of text laid out in logical playfield units.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Text content.
    pub text: String,
    /// Anchor position.
    pub position: Vec2,
    /// Which point of the text sits on `position`.
    pub anchor: TextAnchor,
    /// Font size in logical units.
    pub font_size: f32,
    /// Fill color.
    pub color: Color,
}

impl Label {
    fn new(
        text: String,
        position: Vec2,
        anchor: TextAnchor,
        font_size: f32,
        color: Color,
    ) -> Self {
        Self {
            text,
            position,
            anchor,
            font_size,
            color,
        }
    }
}

/// Score and speed readout shown while playing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Score of the current session.
    pub score: u32,
    /// Current scroll speed.
    pub speed: f32,
}

impl HudPresentation {
    /// Labels drawn in the top-left corner of the playfield.
    ///
    /// The speed readout shows the whole part of the scroll speed.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        vec![
            Label::new(
                format!("Score: {}", self.score),
                Vec2::new(20.0, 20.0),
                TextAnchor::TopLeft,
                BODY_FONT_SIZE,
                Color::WHITE,
            ),
            Label::new(
                format!("Speed: {} MPH", self.speed.trunc() as i64),
                Vec2::new(20.0, 60.0),
                TextAnchor::TopLeft,
                BODY_FONT_SIZE,
                Color::CYAN,
            ),
        ]
    }
}

/// Overlay shown once the bike has crashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverPresentation {
    /// Score reached in the session that ended.
    pub final_score: u32,
    /// Best score on record.
    pub best_score: u32,
}

impl GameOverPresentation {
    /// Labels centred on the playfield, top to bottom.
    #[must_use]
    pub fn labels(&self, viewport: Viewport) -> Vec<Label> {
        let center = viewport.center();
        let line = |text: String, offset: f32, font_size: f32, color: Color| {
            Label::new(
                text,
                Vec2::new(center.x, center.y + offset),
                TextAnchor::Center,
                font_size,
                color,
            )
        };

        vec![
            line("CRASHED!".to_owned(), -50.0, HEADLINE_FONT_SIZE, Color::RED),
            line(
                format!("Final Score: {}", self.final_score),
                10.0,
                BODY_FONT_SIZE,
                Color::WHITE,
            ),
            line(
                format!("High Score: {}", self.best_score),
                50.0,
                BODY_FONT_SIZE,
                Color::GOLD,
            ),
            line(
                "Press SPACE to Restart".to_owned(),
                100.0,
                BODY_FONT_SIZE,
                Color::CYAN,
            ),
        ]
    }
}

/// Scene description combining the backdrop, the bike, walls and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Logical playfield size.
    pub viewport: Viewport,
    /// Band the bike is confined to.
    pub road: RoadPresentation,
    /// Horizontal offset of the tiling backdrop.
    pub background_offset: f32,
    /// Rectangle occupied by the bike.
    pub player: RectPresentation,
    /// Rectangles occupied by walls.
    pub obstacles: Vec<RectPresentation>,
    /// Score and speed readout.
    pub hud: HudPresentation,
    /// Crash overlay, present only while the game is over.
    pub game_over: Option<GameOverPresentation>,
}

impl Scene {
    /// Creates an empty scene for the provided playfield.
    #[must_use]
    pub fn new(viewport: Viewport, road: RoadPresentation, player: RectPresentation) -> Self {
        Self {
            viewport,
            road,
            background_offset: 0.0,
            player,
            obstacles: Vec::new(),
            hud: HudPresentation {
                score: 0,
                speed: 0.0,
            },
            game_over: None,
        }
    }

    /// Horizontal positions at which the backdrop is drawn so that it covers
    /// the playfield seamlessly.
    #[must_use]
    pub fn background_tiles(&self) -> [f32; 2] {
        [
            self.background_offset,
            self.background_offset + self.viewport.width(),
        ]
    }

    /// Every label that should be drawn for the current frame.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        match self.game_over {
            Some(game_over) => game_over.labels(self.viewport),
            None => self.hud.labels(),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Signals observed since the previous frame, in the order they occurred.
    pub signals: Vec<InputSignal>,
}

/// Timing and control information reported by the scene update closure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the simulation.
    pub simulation: Duration,
    /// Time spent translating the simulation into the scene.
    pub scene_population: Duration,
    /// Whether the backend should close after this frame.
    pub exit: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tron Rider scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and mutates the scene before it is
    /// rendered. The backend stops once the closure reports `exit`.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The playfield must have a positive, finite size.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport must have a positive size (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

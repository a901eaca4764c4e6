#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Tron Rider.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The logical playfield is letterboxed onto whatever window size the
//! platform provides. Sprites are optional: when no manifest is supplied the
//! backdrop, bike and walls are drawn as primitives.

mod input;
mod sprites;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};
use tron_rider_rendering::{
    Color, FrameInput, FrameSimulationBreakdown, Label, Presentation, RectPresentation,
    RenderingBackend, Scene, SpriteKey, TextAnchor, GAME_OVER_DIM_ALPHA,
};

use self::input::KeyTracker;
use self::sprites::{DrawParams, SpriteAtlas};

pub use self::sprites::SpriteManifest;

const GRID_SPACING: f32 = 80.0;
const GRID_COLOR: Color = Color::new(0.0, 0.55, 0.65, 0.35);
const ROAD_EDGE_COLOR: Color = Color::CYAN;
const BIKE_COLOR: Color = Color::CYAN;
const WALL_FILL_COLOR: Color = Color::from_rgb_u8(255, 110, 0);
const WALL_EDGE_COLOR: Color = Color::from_rgb_u8(255, 210, 120);

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    sprite_manifest: Option<SpriteManifest>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Supplies the sprites drawn in place of primitives.
    ///
    /// Passing `None` keeps the primitive renderer.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest: Option<SpriteManifest>) -> Self {
        self.sprite_manifest = manifest;
        self
    }
}

/// Time spent in each stage of one rendered frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.viewport.width().round() as i32,
            window_height: scene.viewport.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = match sprite_manifest.as_ref().map(SpriteAtlas::load).transpose() {
                Ok(atlas) => atlas,
                Err(error) => {
                    let _ = atlas_init_sender.send(Err(error.context("failed to load sprites")));
                    return;
                }
            };
            let _ = atlas_init_sender.send(Ok(()));
            tracing::debug!(sprites = sprite_atlas.is_some(), "render loop started");

            macroquad::input::prevent_quit();
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut keys = KeyTracker::default();

            loop {
                let frame_input = FrameInput {
                    signals: keys.poll(),
                };
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);
                if simulation_breakdown.exit {
                    break;
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_backdrop(&scene, &metrics, sprite_atlas.as_ref());
                draw_walls(&scene.obstacles, &metrics, sprite_atlas.as_ref());
                draw_bike(scene.player, &metrics, sprite_atlas.as_ref());
                if scene.game_over.is_some() {
                    draw_game_over_dim(&metrics);
                }
                draw_labels(&scene.labels(), &metrics);
                draw_letterbox(&metrics, clear_color);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        tracing::info!(
                            fps = metrics.per_second,
                            fps_10s = metrics.trailing_ten_seconds,
                            sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            scene_ms = metrics.avg_scene_population.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timings"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver
            .recv()
            .unwrap_or_else(|_| Ok(()))
            .context("sprite initialisation failed")?;

        Ok(())
    }
}

/// Maps the logical playfield onto the window, preserving its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    width: f32,
    height: f32,
    screen_width: f32,
    screen_height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.viewport.width();
        let world_height = scene.viewport.height();
        let scale = (screen_width / world_width)
            .min(screen_height / world_height)
            .max(0.0);

        let width = world_width * scale;
        let height = world_height * scale;
        Self {
            scale,
            offset_x: ((screen_width - width) * 0.5).max(0.0),
            offset_y: ((screen_height - height) * 0.5).max(0.0),
            width,
            height,
            screen_width,
            screen_height,
        }
    }

    fn to_screen(&self, position: Vec2) -> MacroquadVec2 {
        MacroquadVec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn rect(&self, rect: RectPresentation) -> (MacroquadVec2, MacroquadVec2) {
        (
            self.to_screen(rect.origin),
            MacroquadVec2::new(rect.size.x * self.scale, rect.size.y * self.scale),
        )
    }
}

fn draw_backdrop(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let size = MacroquadVec2::new(metrics.width, metrics.height);
    let tiles = scene.background_tiles();

    if let Some(atlas) = sprite_atlas {
        let mut drawn = true;
        for tile_x in tiles {
            let position = metrics.to_screen(Vec2::new(tile_x, 0.0));
            drawn &= atlas.draw(SpriteKey::Background, DrawParams::new(position, size));
        }
        if drawn {
            return;
        }
    }

    let grid = to_macroquad_color(GRID_COLOR);
    for tile_x in tiles {
        for line_x in grid_lines(tile_x, scene.viewport.width()) {
            let top = metrics.to_screen(Vec2::new(line_x, 0.0));
            macroquad::shapes::draw_line(top.x, top.y, top.x, top.y + metrics.height, 1.0, grid);
        }
    }
    let mut line_y = GRID_SPACING;
    while line_y < scene.viewport.height() {
        let left = metrics.to_screen(Vec2::new(0.0, line_y));
        macroquad::shapes::draw_line(left.x, left.y, left.x + metrics.width, left.y, 1.0, grid);
        line_y += GRID_SPACING;
    }

    let edge = to_macroquad_color(ROAD_EDGE_COLOR);
    for band_y in [scene.road.top, scene.road.bottom] {
        let left = metrics.to_screen(Vec2::new(0.0, band_y));
        macroquad::shapes::draw_line(
            left.x,
            left.y,
            left.x + metrics.width,
            left.y,
            2.0 * metrics.scale,
            edge,
        );
    }
}

/// Logical x positions of the vertical grid lines inside one backdrop tile.
fn grid_lines(tile_x: f32, tile_width: f32) -> impl Iterator<Item = f32> {
    let count = (tile_width / GRID_SPACING).floor() as u32;
    (0..count).map(move |index| tile_x + index as f32 * GRID_SPACING)
}

fn draw_bike(player: RectPresentation, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let (position, size) = metrics.rect(player);
    if let Some(atlas) = sprite_atlas {
        // The bike artwork faces left; the playfield scrolls towards the player.
        if atlas.draw(SpriteKey::Bike, DrawParams::new(position, size).flipped()) {
            return;
        }
    }

    macroquad::shapes::draw_rectangle(
        position.x,
        position.y,
        size.x,
        size.y,
        to_macroquad_color(BIKE_COLOR),
    );
}

fn draw_walls(
    walls: &[RectPresentation],
    metrics: &SceneMetrics,
    sprite_atlas: Option<&SpriteAtlas>,
) {
    let fill = to_macroquad_color(WALL_FILL_COLOR);
    let edge = to_macroquad_color(WALL_EDGE_COLOR);
    for wall in walls {
        let (position, size) = metrics.rect(*wall);
        if let Some(atlas) = sprite_atlas {
            if atlas.draw(SpriteKey::Wall, DrawParams::new(position, size)) {
                continue;
            }
        }
        macroquad::shapes::draw_rectangle(position.x, position.y, size.x, size.y, fill);
        macroquad::shapes::draw_rectangle_lines(
            position.x,
            position.y,
            size.x,
            size.y,
            2.0 * metrics.scale,
            edge,
        );
    }
}

fn draw_game_over_dim(metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.width,
        metrics.height,
        to_macroquad_color(Color::BLACK.with_alpha(GAME_OVER_DIM_ALPHA)),
    );
}

/// Size of a rendered line of text in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TextExtent {
    width: f32,
    height: f32,
    /// Distance from the top of the text to its baseline.
    baseline: f32,
}

/// Screen position of the baseline origin that places `label` as anchored.
fn label_baseline(label: &Label, extent: TextExtent, metrics: &SceneMetrics) -> MacroquadVec2 {
    let anchor = metrics.to_screen(label.position);
    let top_left = match label.anchor {
        TextAnchor::TopLeft => anchor,
        TextAnchor::Center => MacroquadVec2::new(
            anchor.x - extent.width * 0.5,
            anchor.y - extent.height * 0.5,
        ),
    };
    MacroquadVec2::new(top_left.x, top_left.y + extent.baseline)
}

fn draw_labels(labels: &[Label], metrics: &SceneMetrics) {
    for label in labels {
        let font_size = (label.font_size * metrics.scale).round().max(1.0);
        let dimensions = macroquad::text::measure_text(&label.text, None, font_size as u16, 1.0);
        let extent = TextExtent {
            width: dimensions.width,
            height: dimensions.height,
            baseline: dimensions.offset_y,
        };
        let origin = label_baseline(label, extent, metrics);
        macroquad::text::draw_text(
            &label.text,
            origin.x,
            origin.y,
            font_size,
            to_macroquad_color(label.color),
        );
    }
}

/// Covers whatever the playfield spilled into the letterbox bars.
fn draw_letterbox(metrics: &SceneMetrics, clear_color: Color) {
    let color = to_macroquad_color(clear_color);
    for (x, y, width, height) in letterbox_bars(metrics) {
        macroquad::shapes::draw_rectangle(x, y, width, height, color);
    }
}

fn letterbox_bars(metrics: &SceneMetrics) -> Vec<(f32, f32, f32, f32)> {
    let right = metrics.offset_x + metrics.width;
    let bottom = metrics.offset_y + metrics.height;
    let bars = [
        (0.0, 0.0, metrics.offset_x, metrics.screen_height),
        (right, 0.0, metrics.screen_width - right, metrics.screen_height),
        (0.0, 0.0, metrics.screen_width, metrics.offset_y),
        (0.0, bottom, metrics.screen_width, metrics.screen_height - bottom),
    ];
    bars.into_iter()
        .filter(|&(_, _, width, height)| width > f32::EPSILON && height > f32::EPSILON)
        .collect()
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tron_rider_rendering::{GameOverPresentation, RoadPresentation, Viewport};

    fn scene() -> Scene {
        Scene::new(
            Viewport::new(1280.0, 720.0).expect("valid viewport"),
            RoadPresentation {
                top: 420.0,
                bottom: 620.0,
            },
            RectPresentation::new(Vec2::new(100.0, 500.0), Vec2::new(100.0, 60.0)),
        )
    }

    fn assert_macroquad_vec2_close(actual: MacroquadVec2, expected: MacroquadVec2) {
        let delta = (actual - expected).abs();
        assert!(
            delta.x <= 1e-4 && delta.y <= 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn scene_metrics_are_identity_at_native_size() {
        let metrics = SceneMetrics::from_scene(&scene(), 1280.0, 720.0);
        assert_eq!(metrics.scale, 1.0);
        assert_eq!((metrics.offset_x, metrics.offset_y), (0.0, 0.0));
        assert!(letterbox_bars(&metrics).is_empty());
    }

    #[test]
    fn scene_metrics_letterbox_tall_windows() {
        let metrics = SceneMetrics::from_scene(&scene(), 640.0, 720.0);
        assert!((metrics.scale - 0.5).abs() <= 1e-6);
        assert_eq!(metrics.offset_x, 0.0);
        assert!((metrics.offset_y - 180.0).abs() <= 1e-4);

        let (position, size) = metrics.rect(scene().player);
        assert_macroquad_vec2_close(position, MacroquadVec2::new(50.0, 430.0));
        assert_macroquad_vec2_close(size, MacroquadVec2::new(50.0, 30.0));
        assert_eq!(letterbox_bars(&metrics).len(), 2);
    }

    #[test]
    fn scene_metrics_pillarbox_wide_windows() {
        let metrics = SceneMetrics::from_scene(&scene(), 1920.0, 720.0);
        assert_eq!(metrics.scale, 1.0);
        assert!((metrics.offset_x - 320.0).abs() <= 1e-4);
        assert_eq!(
            letterbox_bars(&metrics),
            vec![(0.0, 0.0, 320.0, 720.0), (1600.0, 0.0, 320.0, 720.0)]
        );
    }

    #[test]
    fn grid_lines_scroll_with_the_backdrop() {
        let lines: Vec<f32> = grid_lines(-30.0, 400.0).collect();
        assert_eq!(lines, vec![-30.0, 50.0, 130.0, 210.0, 290.0]);
    }

    #[test]
    fn top_left_labels_sit_below_their_anchor() {
        let metrics = SceneMetrics::from_scene(&scene(), 1280.0, 720.0);
        let label = &scene().labels()[0];
        let extent = TextExtent {
            width: 90.0,
            height: 20.0,
            baseline: 16.0,
        };
        assert_macroquad_vec2_close(
            label_baseline(label, extent, &metrics),
            MacroquadVec2::new(20.0, 36.0),
        );
    }

    #[test]
    fn centred_labels_are_balanced_around_their_anchor() {
        let mut scene = scene();
        scene.game_over = Some(GameOverPresentation {
            final_score: 3,
            best_score: 9,
        });
        let metrics = SceneMetrics::from_scene(&scene, 2560.0, 1440.0);
        let headline = &scene.labels()[0];
        let extent = TextExtent {
            width: 300.0,
            height: 80.0,
            baseline: 64.0,
        };

        let origin = label_baseline(headline, extent, &metrics);
        assert_macroquad_vec2_close(origin, MacroquadVec2::new(1130.0, 644.0));
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_averages_stage_timings() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(500),
            simulation: Duration::from_millis(4),
            scene_population: Duration::from_millis(2),
            render: Duration::from_millis(6),
        };
        assert!(counter.record_frame(frame).is_none());
        let metrics = counter
            .record_frame(FrameBreakdown {
                simulation: Duration::from_millis(2),
                ..frame
            })
            .expect("one second elapsed");

        assert_eq!(metrics.avg_simulation, Duration::from_millis(3));
        assert_eq!(metrics.avg_scene_population, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(6));
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(frame(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(frame(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}

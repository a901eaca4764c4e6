use anyhow::{Context, Result};
use glam::Vec2;
use tron_rider_core::{Rect, Tuning};
use tron_rider_game_loop::FrameSnapshot;
use tron_rider_rendering::{
    GameOverPresentation, HudPresentation, RectPresentation, RoadPresentation, Scene, Viewport,
};

/// Builds the scene shown before the first frame is simulated.
pub(crate) fn initial_scene(tuning: &Tuning) -> Result<Scene> {
    let viewport = Viewport::new(tuning.screen_width, tuning.screen_height)
        .context("invalid playfield size")?;
    let road = RoadPresentation {
        top: tuning.road_top,
        bottom: tuning.road_bottom,
    };
    Ok(Scene::new(
        viewport,
        road,
        rect_presentation(tuning.player_start()),
    ))
}

/// Copies the simulation state of one frame into the scene.
pub(crate) fn populate(scene: &mut Scene, snapshot: &FrameSnapshot) {
    scene.background_offset = snapshot.background_offset;
    scene.player = rect_presentation(snapshot.player);
    scene.obstacles.clear();
    scene
        .obstacles
        .extend(snapshot.obstacles.iter().copied().map(rect_presentation));
    scene.hud = HudPresentation {
        score: snapshot.score,
        speed: snapshot.speed,
    };
    scene.game_over = snapshot.game_over.map(|summary| GameOverPresentation {
        final_score: summary.final_score,
        best_score: summary.best_score,
    });
}

fn rect_presentation(rect: Rect) -> RectPresentation {
    RectPresentation::new(
        Vec2::new(rect.x(), rect.y()),
        Vec2::new(rect.width(), rect.height()),
    )
}

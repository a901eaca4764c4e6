use tron_rider_core::{Event, GamePhase};

use crate::World;

/// Runs one step of play: movement, scrolling, collision and scoring.
///
/// Outside of [`GamePhase::Playing`] the step is a no-op, so a crashed
/// session neither moves nor scores until it is restarted.
pub(crate) fn step(world: &mut World, out_events: &mut Vec<Event>) {
    if world.phase != GamePhase::Playing {
        return;
    }

    let road = world.tuning.road();
    let screen_width = world.tuning.screen_width;
    let velocity = world.player.velocity;
    world.player.rect = world
        .player
        .rect
        .translated(velocity.x, velocity.y)
        .clamped_to(road, screen_width);

    let speed = world.difficulty.current_speed();
    world.obstacles.scroll(speed);
    world.background_offset -= speed;
    if world.background_offset <= -screen_width {
        world.background_offset = 0.0;
    }

    let collided = world.obstacles.first_overlapping(&world.player.rect);
    if let Some(obstacle) = collided {
        world.phase = GamePhase::GameOver;
        tracing::info!(
            obstacle = obstacle.get(),
            score = world.score,
            "bike crashed"
        );
        out_events.push(Event::Crashed { obstacle });
        out_events.push(Event::PhaseChanged {
            phase: GamePhase::GameOver,
        });
    }

    for obstacle in world.obstacles.remove_exited(collided) {
        world.score = world.score.saturating_add(1);
        out_events.push(Event::ObstacleCleared {
            obstacle,
            score: world.score,
        });
    }

    if collided.is_some() {
        out_events.push(Event::SessionEnded {
            final_score: world.score,
        });
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting obstacle spawn commands.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tron_rider_core::{Command, Event, GamePhase, RoadBand};

/// Spawn gap in milliseconds when the scroll speed is zero.
pub const BASE_SPAWN_INTERVAL_MS: f32 = 1_500.0;
/// Milliseconds removed from the spawn gap per unit of scroll speed.
pub const SPAWN_INTERVAL_MS_PER_SPEED: f32 = 20.0;
/// Shortest spawn gap in milliseconds, reached at high speeds.
pub const MIN_SPAWN_INTERVAL_MS: f32 = 400.0;

/// Minimum gap between consecutive spawns at the provided scroll speed.
#[must_use]
pub fn spawn_interval(speed: f32) -> Duration {
    let millis =
        (BASE_SPAWN_INTERVAL_MS - speed * SPAWN_INTERVAL_MS_PER_SPEED).max(MIN_SPAWN_INTERVAL_MS);
    Duration::from_micros((millis * 1_000.0).round() as u64)
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    obstacle_height: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for obstacles of the provided height.
    #[must_use]
    pub const fn new(obstacle_height: f32, rng_seed: u64) -> Self {
        Self {
            obstacle_height,
            rng_seed,
        }
    }
}

/// Outcome of a spawn check that produced an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnDecision {
    /// Vertical coordinate of the new obstacle's top edge.
    pub top: f32,
    /// Session time that becomes the new last spawn time.
    pub spawned_at: Duration,
}

/// Pure system that spawns obstacles on a speed-dependent cadence.
#[derive(Debug)]
pub struct Spawning {
    obstacle_height: f32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            obstacle_height: config.obstacle_height,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Decides whether an obstacle spawns at `now`.
    ///
    /// A spawn happens once strictly more than [`spawn_interval`] has passed
    /// since `last_spawn`. The obstacle's top is sampled uniformly so that the
    /// whole obstacle lies inside the road band.
    pub fn maybe_spawn(
        &mut self,
        now: Duration,
        last_spawn: Duration,
        speed: f32,
        road: RoadBand,
    ) -> Option<SpawnDecision> {
        if now.saturating_sub(last_spawn) <= spawn_interval(speed) {
            return None;
        }

        let lowest = road.top();
        let highest = road.bottom() - self.obstacle_height;
        let top = if highest > lowest {
            self.rng.gen_range(lowest..=highest)
        } else {
            lowest
        };

        Some(SpawnDecision {
            top,
            spawned_at: now,
        })
    }

    /// Consumes events and the current spawn state to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        last_spawn: Duration,
        speed: f32,
        road: RoadBand,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Playing {
            return;
        }

        let Some(now) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { now, .. } => Some(*now),
            _ => None,
        }) else {
            return;
        };

        if let Some(decision) = self.maybe_spawn(now, last_spawn, speed, road) {
            tracing::debug!(top = decision.top, speed, "spawning obstacle");
            out.push(Command::SpawnObstacle { top: decision.top });
        }
    }
}

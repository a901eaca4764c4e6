#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrator that drives the Tron Rider world at a fixed tick rate.
//!
//! [`GameLoop`] owns the authoritative world, the pure systems and the score
//! store. Adapters submit [`InputSignal`]s as they observe them and call
//! [`GameLoop::advance_frame`] once per rendered frame; the loop converts the
//! frame time into whole ticks and sequences every system within each tick.

mod scheduler;

use std::{mem, time::Duration};

use tron_rider_core::{Command, Event, GamePhase, InputSignal, Rect, ScoreStore, Tuning};
use tron_rider_system_controls::Controls;
use tron_rider_system_difficulty::Difficulty;
use tron_rider_system_spawning::{Config as SpawningConfig, Spawning};
use tron_rider_world::{self as world, query, World};

pub use scheduler::{FixedStep, StepBudget, MAX_TICKS_PER_FRAME};

/// Scores presented while the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    /// Score reached in the session that just ended.
    pub final_score: u32,
    /// Best score on record after the session was persisted.
    pub best_score: u32,
}

/// Read-only view of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Horizontal offset of the tiling backdrop.
    pub background_offset: f32,
    /// Rectangle occupied by the bike.
    pub player: Rect,
    /// Rectangles of the active obstacles in spawn order.
    pub obstacles: Vec<Rect>,
    /// Score of the current session.
    pub score: u32,
    /// Current scroll speed.
    pub speed: f32,
    /// Phase the game is in.
    pub phase: GamePhase,
    /// Final and best scores, present only while the game is over.
    pub game_over: Option<GameOverSummary>,
}

/// Drives the world, its systems and the best-score store.
#[derive(Debug)]
pub struct GameLoop<S: ScoreStore> {
    world: World,
    controls: Controls,
    difficulty: Difficulty,
    spawning: Spawning,
    scheduler: FixedStep,
    store: S,
    best_score: u32,
    pending_signals: Vec<InputSignal>,
    quit_requested: bool,
}

impl<S: ScoreStore> GameLoop<S> {
    /// Creates a loop for a fresh session using the provided tuning, store
    /// and spawn seed.
    #[must_use]
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Self {
        let best_score = store.load_best_score();
        tracing::info!(best_score, seed, "session started");
        Self {
            controls: Controls::new(),
            difficulty: Difficulty::new(tuning.speed_up_interval()),
            spawning: Spawning::new(SpawningConfig::new(tuning.obstacle_height, seed)),
            scheduler: FixedStep::new(tuning.tick_duration(), MAX_TICKS_PER_FRAME),
            world: World::with_tuning(tuning),
            store,
            best_score,
            pending_signals: Vec::new(),
            quit_requested: false,
        }
    }

    /// Queues an input signal for the next tick.
    ///
    /// A quit request takes effect immediately: no further ticks run.
    pub fn submit(&mut self, signal: InputSignal) {
        if signal == InputSignal::Quit {
            if !self.quit_requested {
                tracing::info!(score = query::score(&self.world), "quit requested");
            }
            self.quit_requested = true;
            return;
        }
        self.pending_signals.push(signal);
    }

    /// Reports whether the player asked to leave the game.
    #[must_use]
    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Converts real frame time into ticks and runs them.
    pub fn advance_frame(&mut self, frame_dt: Duration) -> StepBudget {
        if self.quit_requested {
            return StepBudget::default();
        }

        let budget = self.scheduler.advance(frame_dt);
        if !budget.dropped.is_zero() {
            tracing::debug!(
                dropped_ms = budget.dropped.as_secs_f64() * 1_000.0,
                "frame exceeded tick budget"
            );
        }
        for _ in 0..budget.ticks {
            self.tick();
        }
        budget
    }

    /// Runs exactly one simulation tick.
    pub fn tick(&mut self) {
        let mut events = Vec::new();
        let mut commands = Vec::new();
        let player_speed = query::tuning(&self.world).player_speed;
        let road = query::tuning(&self.world).road();

        let signals = mem::take(&mut self.pending_signals);
        self.controls.handle(
            &signals,
            query::phase(&self.world),
            player_speed,
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        world::apply(
            &mut self.world,
            Command::AdvanceClock {
                dt: self.scheduler.tick(),
            },
            &mut events,
        );

        self.difficulty.handle(
            &events,
            query::phase(&self.world),
            query::difficulty(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        if query::phase(&self.world) == GamePhase::Playing {
            world::apply(&mut self.world, Command::Simulate, &mut events);
        }

        self.spawning.handle(
            &events,
            query::phase(&self.world),
            query::last_spawn(&self.world),
            query::speed(&self.world),
            road,
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        self.settle(&events);
    }

    /// Captures the state a renderer needs for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let phase = query::phase(&self.world);
        let score = query::score(&self.world);
        let game_over = (phase == GamePhase::GameOver).then_some(GameOverSummary {
            final_score: score,
            best_score: self.best_score,
        });

        FrameSnapshot {
            background_offset: query::background_offset(&self.world),
            player: query::player(&self.world).rect(),
            obstacles: query::obstacle_rects(&self.world),
            score,
            speed: query::speed(&self.world),
            phase,
            game_over,
        }
    }

    /// Best score known to the loop.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Provides read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Provides read-only access to the score store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn settle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::SessionStarted { .. } => {
                    self.best_score = self.store.load_best_score();
                    tracing::info!(best_score = self.best_score, "session restarted");
                }
                Event::SessionEnded { final_score } => self.persist(*final_score),
                _ => {}
            }
        }
    }

    fn persist(&mut self, final_score: u32) {
        match self.store.save_best_score(final_score) {
            Ok(true) => tracing::info!(score = final_score, "new best score"),
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(%error, score = final_score, "failed to save best score");
            }
        }
        self.best_score = self.store.load_best_score();
    }
}

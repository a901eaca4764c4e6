#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty system that ramps the scroll speed on a fixed cadence.

use std::time::Duration;

use tron_rider_core::{Command, DifficultyState, Event, GamePhase};

/// Pure system that requests a speed increase once per elapsed interval.
#[derive(Debug)]
pub struct Difficulty {
    interval: Duration,
}

impl Difficulty {
    /// Creates a difficulty system that raises speed every `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Consumes events and the current speed state to emit speed commands.
    ///
    /// Time is ignored while the game is over. At most one raise is requested
    /// per call, and the world restarts the interval counter when it applies
    /// the raise, so increments arrive in single quanta.
    pub fn handle(
        &self,
        events: &[Event],
        phase: GamePhase,
        state: &DifficultyState,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Playing || self.interval.is_zero() {
            return;
        }

        let now = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { now, .. } => Some(*now),
            _ => None,
        });

        if let Some(now) = now {
            if state.is_due(now, self.interval) {
                out.push(Command::RaiseSpeed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced(now_ms: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
            now: Duration::from_millis(now_ms),
        }
    }

    #[test]
    fn waits_for_full_interval() {
        let difficulty = Difficulty::new(Duration::from_millis(5_000));
        let state = DifficultyState::new(5.0, Duration::ZERO);
        let mut commands = Vec::new();

        difficulty.handle(&[advanced(4_999)], GamePhase::Playing, &state, &mut commands);
        assert!(commands.is_empty());

        difficulty.handle(&[advanced(5_000)], GamePhase::Playing, &state, &mut commands);
        assert_eq!(commands, vec![Command::RaiseSpeed]);
    }

    #[test]
    fn ignores_time_after_crash() {
        let difficulty = Difficulty::new(Duration::from_millis(5_000));
        let state = DifficultyState::new(5.0, Duration::ZERO);
        let mut commands = Vec::new();

        difficulty.handle(
            &[advanced(60_000)],
            GamePhase::GameOver,
            &state,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn events_without_time_are_ignored() {
        let difficulty = Difficulty::new(Duration::from_millis(5_000));
        let state = DifficultyState::new(5.0, Duration::ZERO);
        let mut commands = Vec::new();

        difficulty.handle(
            &[Event::SpeedRaised { speed: 5.5 }],
            GamePhase::Playing,
            &state,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}

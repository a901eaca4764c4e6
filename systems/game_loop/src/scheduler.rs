use std::time::Duration;

/// Upper bound on simulation ticks executed for a single rendered frame.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Number of ticks granted to a frame by [`FixedStep::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepBudget {
    /// Whole ticks that should run before the frame is presented.
    pub ticks: u32,
    /// Real time discarded because the frame exceeded the tick cap.
    pub dropped: Duration,
}

/// Fixed-rate scheduler that converts variable frame time into whole ticks.
#[derive(Clone, Debug)]
pub struct FixedStep {
    tick: Duration,
    accumulator: Duration,
    max_ticks: u32,
}

impl FixedStep {
    /// Creates a scheduler that runs ticks of `tick` length, at most
    /// `max_ticks` per frame.
    #[must_use]
    pub const fn new(tick: Duration, max_ticks: u32) -> Self {
        Self {
            tick,
            accumulator: Duration::ZERO,
            max_ticks,
        }
    }

    /// Length of a single tick.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        self.tick
    }

    /// Real time accumulated but not yet consumed by a tick.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Accumulates `frame_dt` and reports how many ticks are due.
    ///
    /// When more than `max_ticks` ticks are due the surplus time is dropped,
    /// so a long stall never triggers a burst of catch-up work.
    pub fn advance(&mut self, frame_dt: Duration) -> StepBudget {
        if self.tick.is_zero() {
            return StepBudget::default();
        }

        self.accumulator = self.accumulator.saturating_add(frame_dt);
        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < self.max_ticks {
            self.accumulator -= self.tick;
            ticks += 1;
        }

        let mut dropped = Duration::ZERO;
        if self.accumulator >= self.tick {
            dropped = self.accumulator;
            self.accumulator = Duration::ZERO;
        }

        StepBudget { ticks, dropped }
    }
}

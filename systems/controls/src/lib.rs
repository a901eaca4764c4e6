#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Controls system that turns directional key transitions into bike velocity.
//!
//! Each axis is tracked by an explicit state machine. Pressing a direction
//! takes over its axis even if the opposite direction is still held, and only
//! releasing the direction that currently owns the axis brings it back to
//! idle. Releasing a key that was overridden therefore leaves the bike moving.

use tron_rider_core::{Axis, AxisSign, Command, Direction, GamePhase, InputSignal, Velocity};

/// Movement state of a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisState {
    /// No direction on this axis is in effect.
    #[default]
    Idle,
    /// The direction toward decreasing coordinates owns the axis.
    HeldNegative,
    /// The direction toward increasing coordinates owns the axis.
    HeldPositive,
}

impl AxisState {
    const fn held(sign: AxisSign) -> Self {
        match sign {
            AxisSign::Negative => Self::HeldNegative,
            AxisSign::Positive => Self::HeldPositive,
        }
    }

    /// Applies a press of a direction with the provided sign.
    #[must_use]
    pub const fn press(self, sign: AxisSign) -> Self {
        Self::held(sign)
    }

    /// Applies a release of a direction with the provided sign.
    #[must_use]
    pub fn release(self, sign: AxisSign) -> Self {
        if self == Self::held(sign) {
            Self::Idle
        } else {
            self
        }
    }

    /// Multiplier applied to the player speed along this axis.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Idle => 0.0,
            Self::HeldNegative => AxisSign::Negative.factor(),
            Self::HeldPositive => AxisSign::Positive.factor(),
        }
    }
}

/// Pure system that maps input signals onto player velocity and restarts.
#[derive(Debug, Default)]
pub struct Controls {
    horizontal: AxisState,
    vertical: AxisState,
}

impl Controls {
    /// Creates a controls system with both axes idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the signals observed since the previous tick and emits commands.
    ///
    /// Directional signals are ignored while the game is over. A restart
    /// request is honoured only while the game is over; it clears both axes
    /// and subsequent signals in the same batch apply to the new session.
    pub fn handle(
        &mut self,
        signals: &[InputSignal],
        phase: GamePhase,
        player_speed: f32,
        out: &mut Vec<Command>,
    ) {
        let mut phase = phase;
        let mut pending = false;

        for signal in signals {
            match *signal {
                InputSignal::Press(direction) if phase == GamePhase::Playing => {
                    pending |= self.update(direction, AxisState::press);
                }
                InputSignal::Release(direction) if phase == GamePhase::Playing => {
                    pending |= self.update(direction, AxisState::release);
                }
                InputSignal::Restart if phase == GamePhase::GameOver => {
                    self.reset();
                    out.push(Command::Restart);
                    phase = GamePhase::Playing;
                    pending = false;
                }
                _ => {}
            }
        }

        if pending {
            out.push(Command::SetPlayerVelocity {
                velocity: self.velocity(player_speed),
            });
        }
    }

    /// State of the provided axis.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> AxisState {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Velocity implied by the held directions.
    #[must_use]
    pub fn velocity(&self, player_speed: f32) -> Velocity {
        Velocity::new(
            self.horizontal.factor() * player_speed,
            self.vertical.factor() * player_speed,
        )
    }

    /// Forgets every held direction.
    pub fn reset(&mut self) {
        self.horizontal = AxisState::Idle;
        self.vertical = AxisState::Idle;
    }

    fn update(
        &mut self,
        direction: Direction,
        transition: impl FnOnce(AxisState, AxisSign) -> AxisState,
    ) -> bool {
        let slot = match direction.axis() {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        };
        let next = transition(*slot, direction.sign());
        let changed = next != *slot;
        *slot = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_of_overridden_key_keeps_axis_held() {
        let state = AxisState::Idle
            .press(AxisSign::Negative)
            .press(AxisSign::Positive)
            .release(AxisSign::Negative);
        assert_eq!(state, AxisState::HeldPositive);
        assert_eq!(state.release(AxisSign::Positive), AxisState::Idle);
    }

    #[test]
    fn unchanged_state_emits_nothing() {
        let mut controls = Controls::new();
        let mut commands = Vec::new();
        controls.handle(
            &[InputSignal::Release(Direction::Up)],
            GamePhase::Playing,
            7.0,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}

use std::collections::HashSet;

use macroquad::input::{is_key_pressed, is_key_released, is_quit_requested, KeyCode};
use tron_rider_core::{Direction, InputSignal};

/// Action bound to a physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    Steer(Direction),
    Restart,
    Quit,
}

/// Edge observed on a key during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyTransition {
    Pressed,
    Released,
}

const BOUND_KEYS: [KeyCode; 10] = [
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Up,
    KeyCode::Left,
    KeyCode::Down,
    KeyCode::Right,
    KeyCode::Space,
    KeyCode::Escape,
];

pub(crate) fn binding_for(key: KeyCode) -> Option<Binding> {
    match key {
        KeyCode::W | KeyCode::Up => Some(Binding::Steer(Direction::Up)),
        KeyCode::S | KeyCode::Down => Some(Binding::Steer(Direction::Down)),
        KeyCode::A | KeyCode::Left => Some(Binding::Steer(Direction::Left)),
        KeyCode::D | KeyCode::Right => Some(Binding::Steer(Direction::Right)),
        KeyCode::Space => Some(Binding::Restart),
        KeyCode::Escape => Some(Binding::Quit),
        _ => None,
    }
}

/// Key state carried across frames so that two keys bound to one direction
/// behave like a single held key.
#[derive(Debug, Default)]
pub(crate) struct KeyTracker {
    held: HashSet<KeyCode>,
}

impl KeyTracker {
    /// Polls macroquad for the key edges of the current frame.
    pub(crate) fn poll(&mut self) -> Vec<InputSignal> {
        let mut transitions = Vec::new();
        for key in BOUND_KEYS {
            if is_key_pressed(key) {
                transitions.push((key, KeyTransition::Pressed));
            }
            if is_key_released(key) {
                transitions.push((key, KeyTransition::Released));
            }
        }

        let mut signals = self.signals(&transitions);
        if is_quit_requested() {
            signals.push(InputSignal::Quit);
        }
        signals
    }

    /// Translates one frame of key edges into device-independent signals.
    ///
    /// Polling does not reveal the order of edges within a frame, so keys held
    /// from an earlier frame are released first, then new presses apply, then
    /// keys tapped during the frame are released. A direction is released only
    /// once no held key steers it. Restart and quit fire on the press edge only.
    pub(crate) fn signals(
        &mut self,
        transitions: &[(KeyCode, KeyTransition)],
    ) -> Vec<InputSignal> {
        let held_before = self.held.clone();
        let phase = |&(key, transition): &(KeyCode, KeyTransition)| match transition {
            KeyTransition::Released if held_before.contains(&key) => 0,
            KeyTransition::Pressed => 1,
            KeyTransition::Released => 2,
        };
        let mut ordered = transitions.to_vec();
        ordered.sort_by_key(phase);

        let mut signals = Vec::with_capacity(ordered.len());
        for (key, transition) in ordered {
            let Some(binding) = binding_for(key) else {
                continue;
            };
            match transition {
                KeyTransition::Pressed => {
                    let _ = self.held.insert(key);
                    match binding {
                        Binding::Steer(direction) => signals.push(InputSignal::Press(direction)),
                        Binding::Restart => signals.push(InputSignal::Restart),
                        Binding::Quit => signals.push(InputSignal::Quit),
                    }
                }
                KeyTransition::Released => {
                    if !self.held.remove(&key) {
                        continue;
                    }
                    if let Binding::Steer(direction) = binding {
                        if !self.steers(direction) {
                            signals.push(InputSignal::Release(direction));
                        }
                    }
                }
            }
        }
        signals
    }

    fn steers(&self, direction: Direction) -> bool {
        self.held
            .iter()
            .any(|&key| binding_for(key) == Some(Binding::Steer(direction)))
    }
}

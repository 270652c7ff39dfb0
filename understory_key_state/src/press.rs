// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pressed-key tracking and key-down throttling.
//!
//! [`KeyState`] sits between the platform's key events and the navigation engine.
//! For every key-down it decides whether the press should reach the engine, and it
//! counts how many times each action has fired since its key went down, so handlers
//! can distinguish a fresh press (count 1) from auto-repeat (count > 1).
//!
//! ## Throttling
//!
//! Throttling is leading-edge: the first key-down always dispatches, and subsequent
//! key-downs are dropped until `throttle` milliseconds have elapsed since the last
//! dispatched one. Releasing a key cancels the window, so tapping quickly is never
//! throttled, only holding.
//!
//! - `throttle_repeats == false`: one window shared by every action.
//! - `throttle_repeats == true`: the window only applies to repeats of an action that is
//!   still held. A different action always dispatches.
//!
//! ```
//! use understory_key_state::key_map::Action;
//! use understory_key_state::press::{KeyDown, KeyState};
//! use understory_spatial::Direction;
//!
//! let mut keys = KeyState::with_throttle(100, false);
//! let down = Action::Arrow(Direction::Down);
//!
//! assert_eq!(keys.on_down(40, 0), KeyDown::Dispatch(down));
//! // Auto-repeat inside the window is dropped.
//! assert_eq!(keys.on_down(40, 30), KeyDown::Throttled(down));
//! assert_eq!(keys.on_down(40, 100), KeyDown::Dispatch(down));
//! assert_eq!(keys.pressed().get(down), 2);
//!
//! // Key-up cancels the window.
//! keys.on_up(40);
//! assert_eq!(keys.on_down(40, 110), KeyDown::Dispatch(down));
//! ```
//!
//! Timestamps are supplied by the host in milliseconds and only need to be monotonic.

use alloc::collections::BTreeMap;

use crate::key_map::{Action, KeyCode, KeyMap};

/// Per-action counts of dispatched key-downs since the key went down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PressedKeys {
    counts: BTreeMap<Action, u32>,
}

impl PressedKeys {
    /// Number of dispatched key-downs for `action` since it was last released.
    pub fn get(&self, action: Action) -> u32 {
        self.counts.get(&action).copied().unwrap_or(0)
    }

    /// Iterate over held actions and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (Action, u32)> + '_ {
        self.counts.iter().map(|(action, count)| (*action, *count))
    }

    /// True if no action is held.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn bump(&mut self, action: Action) {
        let count = self.counts.entry(action).or_insert(0);
        *count = count.saturating_add(1);
    }

    fn release(&mut self, action: Action) {
        self.counts.remove(&action);
    }
}

/// Result of feeding a key-down to [`KeyState::on_down`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyDown {
    /// The press should be handled as `Action`.
    Dispatch(Action),
    /// The press mapped to `Action` but fell inside the throttle window.
    Throttled(Action),
    /// No action is bound to the key code.
    Unmapped,
}

/// Key-down/key-up state machine.
#[derive(Clone, Debug)]
pub struct KeyState {
    /// Bindings used to decode key codes.
    pub key_map: KeyMap,
    /// Throttle interval in milliseconds, `None` to dispatch every key-down.
    pub throttle: Option<u64>,
    /// Restrict throttling to repeats of a held action.
    pub throttle_repeats: bool,
    pressed: PressedKeys,
    /// Time of the last dispatched key-down of any action.
    last_any: Option<u64>,
    /// Time of the last dispatched key-down per action.
    last_dispatch: BTreeMap<Action, u64>,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyState {
    /// Create a key state with the default key map and no throttling.
    pub fn new() -> Self {
        Self {
            key_map: KeyMap::default(),
            throttle: None,
            throttle_repeats: false,
            pressed: PressedKeys::default(),
            last_any: None,
            last_dispatch: BTreeMap::new(),
        }
    }

    /// Create a key state that throttles key-downs to one per `interval` milliseconds.
    ///
    /// An `interval` of zero disables throttling.
    pub fn with_throttle(interval: u64, throttle_repeats: bool) -> Self {
        Self {
            throttle: (interval > 0).then_some(interval),
            throttle_repeats,
            ..Self::new()
        }
    }

    /// Record a key-down at `time` and decide whether it should be dispatched.
    ///
    /// Throttled presses do not bump the pressed count.
    pub fn on_down(&mut self, code: KeyCode, time: u64) -> KeyDown {
        let Some(action) = self.key_map.action_for(code) else {
            return KeyDown::Unmapped;
        };

        if let Some(interval) = self.throttle {
            let last = if self.throttle_repeats {
                if self.pressed.get(action) > 0 {
                    self.last_dispatch.get(&action).copied()
                } else {
                    None
                }
            } else {
                self.last_any
            };
            if last.is_some_and(|last| time.saturating_sub(last) < interval) {
                return KeyDown::Throttled(action);
            }
        }

        self.last_any = Some(time);
        self.last_dispatch.insert(action, time);
        self.pressed.bump(action);
        KeyDown::Dispatch(action)
    }

    /// Record a key-up, clearing the action's count and the throttle window.
    ///
    /// Returns the released action, or `None` if the code is unbound.
    pub fn on_up(&mut self, code: KeyCode) -> Option<Action> {
        let action = self.key_map.action_for(code)?;
        self.pressed.release(action);
        self.last_dispatch.remove(&action);
        self.last_any = None;
        Some(action)
    }

    /// Currently held actions.
    pub fn pressed(&self) -> &PressedKeys {
        &self.pressed
    }

    /// Forget all held keys and throttle windows.
    ///
    /// Use this when the host loses keyboard focus and key-ups may never arrive.
    pub fn clear(&mut self) {
        self.pressed = PressedKeys::default();
        self.last_any = None;
        self.last_dispatch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_spatial::Direction;

    const LEFT: KeyCode = 37;
    const RIGHT: KeyCode = 39;
    const ENTER: KeyCode = 13;

    fn arrow(direction: Direction) -> Action {
        Action::Arrow(direction)
    }

    #[test]
    fn counts_repeats_until_release() {
        let mut keys = KeyState::new();
        for t in 0..4 {
            assert_eq!(
                keys.on_down(RIGHT, t * 10),
                KeyDown::Dispatch(arrow(Direction::Right))
            );
        }
        assert_eq!(keys.pressed().get(arrow(Direction::Right)), 4);
        assert_eq!(keys.pressed().get(arrow(Direction::Left)), 0);

        assert_eq!(keys.on_up(RIGHT), Some(arrow(Direction::Right)));
        assert!(keys.pressed().is_empty());
    }

    #[test]
    fn counts_are_per_action() {
        let mut keys = KeyState::new();
        keys.on_down(RIGHT, 0);
        keys.on_down(RIGHT, 10);
        keys.on_down(ENTER, 20);

        let held: alloc::vec::Vec<_> = keys.pressed().iter().collect();
        assert_eq!(held, [(arrow(Direction::Right), 2), (Action::Enter, 1)]);

        keys.on_up(ENTER);
        assert_eq!(keys.pressed().get(Action::Enter), 0);
        assert_eq!(keys.pressed().get(arrow(Direction::Right)), 2);
    }

    #[test]
    fn unmapped_codes_leave_state_alone() {
        let mut keys = KeyState::with_throttle(100, false);
        assert_eq!(keys.on_down(65, 0), KeyDown::Unmapped);
        assert_eq!(keys.on_up(65), None);
        assert!(keys.pressed().is_empty());
        // No window was opened.
        assert_eq!(keys.on_down(LEFT, 1), KeyDown::Dispatch(arrow(Direction::Left)));
    }

    #[test]
    fn global_window_spans_actions() {
        let mut keys = KeyState::with_throttle(100, false);
        assert_eq!(keys.on_down(RIGHT, 0), KeyDown::Dispatch(arrow(Direction::Right)));
        assert_eq!(keys.on_down(LEFT, 50), KeyDown::Throttled(arrow(Direction::Left)));
        assert_eq!(keys.pressed().get(arrow(Direction::Left)), 0);
        assert_eq!(keys.on_down(LEFT, 100), KeyDown::Dispatch(arrow(Direction::Left)));
    }

    #[test]
    fn release_cancels_window() {
        let mut keys = KeyState::with_throttle(500, false);
        keys.on_down(RIGHT, 0);
        assert_eq!(keys.on_down(RIGHT, 10), KeyDown::Throttled(arrow(Direction::Right)));
        keys.on_up(RIGHT);
        assert_eq!(keys.on_down(RIGHT, 20), KeyDown::Dispatch(arrow(Direction::Right)));
        assert_eq!(keys.pressed().get(arrow(Direction::Right)), 1);
    }

    #[test]
    fn repeat_only_window_lets_other_actions_through() {
        let mut keys = KeyState::with_throttle(100, true);
        assert_eq!(keys.on_down(RIGHT, 0), KeyDown::Dispatch(arrow(Direction::Right)));
        // A different action is a fresh press.
        assert_eq!(keys.on_down(LEFT, 10), KeyDown::Dispatch(arrow(Direction::Left)));
        // Holding right repeats inside the window.
        assert_eq!(keys.on_down(RIGHT, 20), KeyDown::Throttled(arrow(Direction::Right)));
        assert_eq!(keys.on_down(RIGHT, 100), KeyDown::Dispatch(arrow(Direction::Right)));
    }

    #[test]
    fn zero_interval_disables_throttle() {
        let mut keys = KeyState::with_throttle(0, false);
        assert_eq!(keys.throttle, None);
        assert_eq!(keys.on_down(RIGHT, 0), KeyDown::Dispatch(arrow(Direction::Right)));
        assert_eq!(keys.on_down(RIGHT, 0), KeyDown::Dispatch(arrow(Direction::Right)));
    }

    #[test]
    fn clock_going_backwards_is_throttled_not_panicking() {
        let mut keys = KeyState::with_throttle(100, false);
        keys.on_down(RIGHT, 1000);
        assert_eq!(keys.on_down(RIGHT, 900), KeyDown::Throttled(arrow(Direction::Right)));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut keys = KeyState::with_throttle(100, false);
        keys.on_down(RIGHT, 0);
        keys.clear();
        assert!(keys.pressed().is_empty());
        assert_eq!(keys.on_down(RIGHT, 1), KeyDown::Dispatch(arrow(Direction::Right)));
    }

    #[test]
    fn remapped_codes_are_honored() {
        let mut keys = KeyState::new();
        keys.key_map.merge([(Action::Enter, [29443_u32])]);
        assert_eq!(keys.on_down(ENTER, 0), KeyDown::Unmapped);
        assert_eq!(keys.on_down(29443, 0), KeyDown::Dispatch(Action::Enter));
    }
}

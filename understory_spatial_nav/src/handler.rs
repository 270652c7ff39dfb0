// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node callbacks.
//!
//! Every registered node may carry a [`FocusHandler`]. All methods have no-op defaults,
//! so a handler only implements what it cares about. Handlers are owned by the engine
//! and never see it, which means they cannot re-enter navigation from inside a callback;
//! hosts that want to react by moving focus should queue the request and apply it after
//! the engine call returns.

use understory_key_state::key_map::Action;
use understory_key_state::press::PressedKeys;
use understory_spatial::Direction;

use crate::types::{FocusDetails, Layout, Outcome};

/// Key state passed to enter and arrow callbacks.
#[derive(Copy, Clone, Debug)]
pub struct KeyDetails<'a> {
    pressed: &'a PressedKeys,
}

impl<'a> KeyDetails<'a> {
    pub(crate) fn new(pressed: &'a PressedKeys) -> Self {
        Self { pressed }
    }

    /// Live pressed-key counts.
    ///
    /// A count above one means the key is auto-repeating.
    pub fn pressed_keys(&self) -> &'a PressedKeys {
        self.pressed
    }

    /// Dispatched key-downs of `action` since it went down.
    pub fn count(&self, action: Action) -> u32 {
        self.pressed.get(action)
    }
}

/// Callbacks for a single focusable node.
pub trait FocusHandler {
    /// The node is focused and "enter" was pressed.
    fn on_enter_press(&mut self, _details: &KeyDetails<'_>) {}

    /// The node is focused and an arrow was pressed.
    ///
    /// Return [`Outcome::Stop`] to keep the engine from navigating.
    fn on_arrow_press(&mut self, _direction: Direction, _details: &KeyDetails<'_>) -> Outcome {
        Outcome::Continue
    }

    /// The node gained (`true`) or lost (`false`) focus.
    fn on_focus_changed(&mut self, _focused: bool) {}

    /// A descendant gained or lost focus. Only sent to nodes with
    /// [`TRACK_CHILDREN`](crate::FocusFlags::TRACK_CHILDREN).
    fn on_has_focused_descendant_changed(&mut self, _has_focused_descendant: bool) {}

    /// The node, or a branch on the way to the focused node, became focused.
    fn on_became_focused(&mut self, _layout: &Layout, _details: &FocusDetails) {}

    /// The node, or a branch that contained the focused node, was blurred.
    fn on_became_blurred(&mut self, _layout: &Layout, _details: &FocusDetails) {}
}

/// Handler that ignores every callback.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopHandler;

impl FocusHandler for NoopHandler {}

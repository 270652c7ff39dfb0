// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine value: lifecycle, key input, registration, and queries.
//!
//! Focus commits, descent and directional moves are implemented in their own modules.

use alloc::vec::Vec;

use tracing::debug;
use understory_key_state::key_map::{Action, KeyCode, KeyMap};
use understory_key_state::press::{KeyDown, KeyState, PressedKeys};
use understory_spatial::Direction;

use crate::config::EngineConfig;
use crate::error::StructuralError;
use crate::handler::KeyDetails;
use crate::node::{FocusableDescriptor, FocusableUpdate};
use crate::registry::{KeyChain, Registry};
use crate::trace::NavigationTrace;
use crate::types::{FocusCause, FocusDetails, FocusFlags, FocusKey, Layout, Outcome};

/// What [`NavigationEngine::on_key_down`] did with a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The engine is disabled or paused.
    Ignored,
    /// No action is bound to the key code. Hosts usually let these propagate.
    Unmapped,
    /// The press fell inside the throttle window.
    Throttled(Action),
    /// "Enter" was delivered to the focused node, or to nobody if nothing navigable
    /// is focused.
    Entered(Option<FocusKey>),
    /// The focused node's [`on_arrow_press`](crate::FocusHandler::on_arrow_press)
    /// returned [`Outcome::Stop`].
    Stopped(Direction),
    /// Directional navigation ran; `moved` tells whether focus changed.
    Navigated {
        /// Direction of travel.
        direction: Direction,
        /// Whether the focus key changed.
        moved: bool,
    },
}

/// A spatial navigation engine.
///
/// The engine owns every registered node, the current focus key, and key input state.
/// It starts disabled: nodes can be registered right away, but nothing moves focus
/// until [`init`](Self::init) is called.
#[derive(Debug)]
pub struct NavigationEngine {
    pub(crate) registry: Registry,
    pub(crate) current: Option<FocusKey>,
    /// Registered ancestors of `current`, nearest first.
    pub(crate) ancestors: KeyChain,
    pub(crate) keys: KeyState,
    pub(crate) config: EngineConfig,
    pub(crate) enabled: bool,
    pub(crate) paused: bool,
    pub(crate) trace: Option<NavigationTrace>,
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationEngine {
    /// Create a disabled engine with the default key map.
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
            current: None,
            ancestors: KeyChain::new(),
            keys: KeyState::new(),
            config: EngineConfig::default(),
            enabled: false,
            paused: false,
            trace: None,
        }
    }

    /// Enable the engine with `config`.
    ///
    /// Calling this again replaces the configuration and clears any pause.
    pub fn init(&mut self, config: EngineConfig) {
        self.keys.throttle = (config.throttle_ms > 0).then_some(config.throttle_ms);
        self.keys.throttle_repeats = config.throttle_repeats;
        self.config = config;
        self.enabled = true;
        self.paused = false;
        debug!(
            native_mode = config.native_mode,
            throttle_ms = config.throttle_ms,
            "spatial navigation enabled"
        );
    }

    /// Disable the engine and clear all of its state.
    ///
    /// Registered nodes, focus, key bindings and the pause flag are all reset, leaving
    /// the engine as [`new`](Self::new) made it apart from the configuration.
    pub fn destroy(&mut self) {
        self.enabled = false;
        self.paused = false;
        self.registry = Registry::default();
        self.current = None;
        self.ancestors.clear();
        self.keys = KeyState::new();
        self.trace = None;
        debug!("spatial navigation disabled");
    }

    /// Ignore key input and directional navigation until [`resume`](Self::resume).
    ///
    /// Programmatic focus changes still apply.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Undo [`pause`](Self::pause).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the engine is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether [`init`](Self::init) has been called without a matching [`destroy`](Self::destroy).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the engine runs in native mode.
    pub fn is_native_mode(&self) -> bool {
        self.config.native_mode
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the codes of the actions named in `entries`, keeping every other binding.
    pub fn set_key_map<I, C>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Action, C)>,
        C: AsRef<[KeyCode]>,
    {
        self.keys.key_map.merge(entries);
    }

    /// The active key bindings.
    pub fn key_map(&self) -> &KeyMap {
        &self.keys.key_map
    }

    /// Live pressed-key counts.
    pub fn pressed_keys(&self) -> &PressedKeys {
        self.keys.pressed()
    }

    /// Handle a platform key-down at host time `now_ms`.
    pub fn on_key_down(&mut self, code: KeyCode, now_ms: u64) -> KeyOutcome {
        if !self.enabled || self.paused {
            return KeyOutcome::Ignored;
        }
        let action = match self.keys.on_down(code, now_ms) {
            KeyDown::Unmapped => return KeyOutcome::Unmapped,
            KeyDown::Throttled(action) => return KeyOutcome::Throttled(action),
            KeyDown::Dispatch(action) => action,
        };

        let details = KeyDetails::new(self.keys.pressed());
        let focused = self
            .current
            .as_ref()
            .and_then(|key| self.registry.get_mut(key))
            .filter(|node| node.is_focusable());

        match action {
            Action::Enter => {
                let Some(node) = focused else {
                    return KeyOutcome::Entered(None);
                };
                node.handler.on_enter_press(&details);
                KeyOutcome::Entered(Some(node.key.clone()))
            }
            Action::Arrow(direction) => {
                let outcome = focused.map_or(Outcome::Continue, |node| {
                    node.handler.on_arrow_press(direction, &details)
                });
                if outcome == Outcome::Stop {
                    return KeyOutcome::Stopped(direction);
                }
                let moved = self.navigate(direction, None);
                KeyOutcome::Navigated { direction, moved }
            }
        }
    }

    /// Handle a platform key-up, clearing the action's pressed count and the throttle
    /// window.
    pub fn on_key_up(&mut self, code: KeyCode) -> Option<Action> {
        self.keys.on_up(code)
    }

    /// Register a node.
    ///
    /// Registration works whether or not the engine is enabled. If the host already
    /// asked to focus this key before it existed, focus is applied now (except in
    /// native mode).
    pub fn add_focusable(&mut self, descriptor: FocusableDescriptor) -> Result<(), StructuralError> {
        let key = descriptor.key.clone();
        self.registry.insert(descriptor)?;
        debug!("registered focusable {key}");

        if !self.config.native_mode && self.current.as_ref() == Some(&key) {
            self.transition(
                key.as_str(),
                FocusDetails::new(FocusCause::Registration),
                true,
            );
        }
        Ok(())
    }

    /// Unregister a node. Returns `false` if `key` wasn't registered.
    ///
    /// If the node was focused and its parent has
    /// [`AUTO_RESTORE_FOCUS`](FocusFlags::AUTO_RESTORE_FOCUS), focus moves into the
    /// parent. Otherwise the focus key is left pointing at the removed node.
    pub fn remove_focusable(&mut self, key: &str) -> bool {
        let Some(node) = self.registry.remove(key) else {
            return false;
        };
        debug!("removed focusable {key}");

        let parent = node
            .parent
            .as_ref()
            .and_then(|parent| self.registry.get_mut(parent));
        let Some(parent) = parent else {
            return true;
        };
        if parent.last_focused_child.as_ref() == Some(&node.key) {
            parent.last_focused_child = None;
        }

        let was_focused = self.current.as_ref() == Some(&node.key);
        if was_focused && !self.config.native_mode && parent.has(FocusFlags::AUTO_RESTORE_FOCUS) {
            let parent_key = parent.key.clone();
            debug!("restoring focus from removed {key} to {parent_key}");
            self.transition(
                parent_key.as_str(),
                FocusDetails::new(FocusCause::Restore),
                false,
            );
        }
        true
    }

    /// Patch a registered node. Returns `false` if `key` wasn't registered.
    pub fn update_focusable(&mut self, key: &str, update: FocusableUpdate) -> bool {
        let native_mode = self.config.native_mode;
        let Some(node) = self.registry.get_mut(key) else {
            return false;
        };
        if let Some(layout) = update.layout
            && !native_mode
        {
            node.layout = layout;
        }
        if let Some(preferred_child) = update.preferred_child {
            node.preferred_child = preferred_child;
        }
        if let Some(focusable) = update.focusable {
            node.flags.set(FocusFlags::FOCUSABLE, focusable);
        }
        if let Some(block) = update.block_navigation_out {
            node.flags.set(FocusFlags::BLOCK_NAVIGATION_OUT, block);
        }
        if let Some(handler) = update.handler {
            node.handler = handler;
        }
        true
    }

    /// Set the geometry of one node. Ignored in native mode.
    pub fn update_layout(&mut self, key: &str, layout: Layout) -> bool {
        if self.config.native_mode {
            return false;
        }
        match self.registry.get_mut(key) {
            Some(node) => {
                node.layout = layout;
                true
            }
            None => false,
        }
    }

    /// Re-measure every node with a host-supplied function. Ignored in native mode.
    ///
    /// Nodes for which `measure` returns `None` keep their current geometry.
    pub fn update_all_layouts(&mut self, mut measure: impl FnMut(&FocusKey) -> Option<Layout>) {
        if self.config.native_mode {
            return;
        }
        for node in self.registry.nodes_mut() {
            if let Some(layout) = measure(&node.key) {
                node.layout = layout;
            }
        }
    }

    /// The focus key, if any.
    ///
    /// This can name a node that isn't registered (yet): focus requested before
    /// registration, or a removed node whose parent didn't restore focus.
    pub fn current_focus_key(&self) -> Option<&FocusKey> {
        self.current.as_ref()
    }

    /// Whether `key` is the focus key.
    pub fn is_focused(&self, key: &str) -> bool {
        self.current.as_ref().is_some_and(|current| current.as_str() == key)
    }

    /// Whether the focused node is somewhere below `key`.
    pub fn has_focused_descendant(&self, key: &str) -> bool {
        self.ancestors.iter().any(|ancestor| ancestor.as_str() == key)
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains(key)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no node is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Geometry of a registered node.
    pub fn layout_of(&self, key: &str) -> Option<Layout> {
        self.registry.get(key).map(|node| node.layout)
    }

    /// Parent of a registered node. `None` for top-level or unknown nodes.
    pub fn parent_of(&self, key: &str) -> Option<&FocusKey> {
        self.registry.get(key).and_then(|node| node.parent.as_ref())
    }

    /// Registered ancestors of `key`, nearest first.
    pub fn ancestors_of(&self, key: &str) -> Vec<FocusKey> {
        self.registry.ancestors_of(key).into_vec()
    }

    /// The remembered child of a registered branch.
    pub fn last_focused_child_of(&self, key: &str) -> Option<&FocusKey> {
        self.registry
            .get(key)
            .and_then(|node| node.last_focused_child.as_ref())
    }

    /// Flags of a registered node.
    pub fn flags_of(&self, key: &str) -> Option<FocusFlags> {
        self.registry.get(key).map(|node| node.flags)
    }

    /// The last ranking step, when [`EngineConfig::visual_debug`] is set.
    pub fn last_trace(&self) -> Option<&NavigationTrace> {
        self.trace.as_ref()
    }
}

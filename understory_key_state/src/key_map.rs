// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between navigation actions and platform key codes.
//!
//! Every action can be bound to several codes (remotes often send different codes for
//! the same arrow). [`KeyMap::merge`] replaces the codes of the actions it names and
//! leaves every other binding alone, so partial overrides never lose the defaults.
//!
//! ```
//! use understory_key_state::key_map::{Action, KeyMap};
//! use understory_spatial::Direction;
//!
//! let mut map = KeyMap::default();
//! assert_eq!(map.action_for(13), Some(Action::Enter));
//!
//! // Bind "enter" to OK on a remote as well as the Enter key.
//! map.merge([(Action::Enter, [13_u32, 29443])]);
//! assert_eq!(map.action_for(29443), Some(Action::Enter));
//! assert_eq!(map.action_for(37), Some(Action::Arrow(Direction::Left)));
//! ```

use alloc::collections::BTreeMap;
use smallvec::SmallVec;
use understory_spatial::Direction;

/// Platform key code, as reported by the host.
pub type KeyCode = u32;

/// Codes bound to a single action.
pub type KeyCodes = SmallVec<[KeyCode; 2]>;

/// Something a key press can ask the navigation engine to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Move focus in a direction.
    Arrow(Direction),
    /// Activate the focused element.
    Enter,
}

impl Action {
    /// All actions, in lookup order.
    pub const ALL: [Self; 5] = [
        Self::Arrow(Direction::Up),
        Self::Arrow(Direction::Down),
        Self::Arrow(Direction::Left),
        Self::Arrow(Direction::Right),
        Self::Enter,
    ];

    /// The direction of an arrow action.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Arrow(direction) => Some(direction),
            Self::Enter => None,
        }
    }

    /// Lower-case name (`"left"`, …, `"enter"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrow(direction) => direction.as_str(),
            Self::Enter => "enter",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bidirectional mapping between [`Action`]s and [`KeyCode`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMap {
    bindings: BTreeMap<Action, KeyCodes>,
}

impl Default for KeyMap {
    /// Browser-style arrow codes (37 to 40) and Enter (13).
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert(Action::Arrow(Direction::Left), KeyCodes::from_slice(&[37]));
        bindings.insert(Action::Arrow(Direction::Up), KeyCodes::from_slice(&[38]));
        bindings.insert(Action::Arrow(Direction::Right), KeyCodes::from_slice(&[39]));
        bindings.insert(Action::Arrow(Direction::Down), KeyCodes::from_slice(&[40]));
        bindings.insert(Action::Enter, KeyCodes::from_slice(&[13]));
        Self { bindings }
    }
}

impl KeyMap {
    /// A map with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Replace the codes of every action named in `entries`.
    ///
    /// Actions not named keep their current codes. An empty code list unbinds the action.
    pub fn merge<I, C>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Action, C)>,
        C: AsRef<[KeyCode]>,
    {
        for (action, codes) in entries {
            let codes = codes.as_ref();
            if codes.is_empty() {
                self.bindings.remove(&action);
            } else {
                self.bindings.insert(action, KeyCodes::from_slice(codes));
            }
        }
    }

    /// Reverse lookup: the action bound to `code`, if any.
    ///
    /// When several actions share a code, the first in [`Action::ALL`] order wins.
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, codes)| codes.contains(&code))
            .map(|(action, _)| *action)
    }

    /// Codes bound to `action` (empty when unbound).
    pub fn codes(&self, action: Action) -> &[KeyCode] {
        self.bindings.get(&action).map_or(&[], |codes| codes.as_slice())
    }

    /// Iterate over all bindings in [`Action::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &[KeyCode])> + '_ {
        self.bindings
            .iter()
            .map(|(action, codes)| (*action, codes.as_slice()))
    }
}

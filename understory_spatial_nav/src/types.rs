// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the navigation engine: focus keys, layouts, flags, and callback details.

use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

use kurbo::Rect;
use understory_spatial::Direction;

/// Parent key that stands for "no parent".
///
/// Descriptors may name this key as their parent instead of leaving the parent unset;
/// both register a top-level node.
pub const ROOT_FOCUS_KEY: &str = "SN:ROOT";

/// Unique identifier of a focusable node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FocusKey(String);

impl FocusKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is [`ROOT_FOCUS_KEY`].
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_FOCUS_KEY
    }
}

impl fmt::Display for FocusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FocusKey {
    fn from(key: &str) -> Self {
        Self(key.into())
    }
}

impl From<String> for FocusKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&Self> for FocusKey {
    fn from(key: &Self) -> Self {
        key.clone()
    }
}

impl Borrow<str> for FocusKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FocusKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Measured geometry of a focusable node.
///
/// `left`, `top`, `width` and `height` are in the coordinate space shared by every
/// node and drive directional ranking. `x` and `y` are relative to the parent and
/// are only passed through to callbacks.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Horizontal offset relative to the parent.
    pub x: f64,
    /// Vertical offset relative to the parent.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Horizontal offset in the shared coordinate space.
    pub left: f64,
    /// Vertical offset in the shared coordinate space.
    pub top: f64,
}

impl Layout {
    /// Layout of a top-level rectangle, where parent-relative and shared offsets coincide.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            left: rect.x0,
            top: rect.y0,
        }
    }

    /// Bounds in the shared coordinate space.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }
}

bitflags::bitflags! {
    /// Capability flags of a focusable node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FocusFlags: u8 {
        /// Node can take focus and is visible to navigation and descent.
        const FOCUSABLE                 = 0b0000_0001;
        /// Node is told when a descendant gains or loses focus.
        const TRACK_CHILDREN            = 0b0000_0010;
        /// Descent into this node ignores the remembered child.
        const FORGET_LAST_FOCUSED_CHILD = 0b0000_0100;
        /// Directional navigation never climbs out of this node.
        const BLOCK_NAVIGATION_OUT      = 0b0000_1000;
        /// Removing the focused child moves focus back to this node.
        const AUTO_RESTORE_FOCUS        = 0b0001_0000;
    }
}

impl Default for FocusFlags {
    fn default() -> Self {
        Self::FOCUSABLE | Self::AUTO_RESTORE_FOCUS
    }
}

/// What triggered a focus change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusCause {
    /// The host called `set_focus`, `set_focus_with` or `steal_focus`.
    Programmatic,
    /// Directional navigation in the given direction.
    Navigation(Direction),
    /// The focused node was removed and focus moved to its parent.
    Restore,
    /// The focus key was set before its node registered.
    Registration,
}

/// Extra information passed to focus and blur callbacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusDetails {
    /// What triggered the change.
    pub cause: FocusCause,
}

impl FocusDetails {
    /// Details for a change with the given cause.
    pub const fn new(cause: FocusCause) -> Self {
        Self { cause }
    }
}

impl Default for FocusDetails {
    fn default() -> Self {
        Self::new(FocusCause::Programmatic)
    }
}

/// Whether default handling should continue after a callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Run the default handling.
    #[default]
    Continue,
    /// Skip the default handling.
    Stop,
}

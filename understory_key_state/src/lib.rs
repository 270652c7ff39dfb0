// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Key State: key input state for remote-control style navigation.
//!
//! This crate turns raw platform key codes into navigation [`Action`](key_map::Action)s
//! and keeps the small amount of state needed across key events:
//!
//! - [`key_map`]: a mergeable mapping from actions (four arrows plus "enter") to one or
//!   more platform key codes, with reverse lookup.
//! - [`press`]: live pressed-key counts (so handlers can tell a fresh press from an
//!   auto-repeat) and an optional leading-edge throttle on key-down.
//!
//! Neither module dispatches anything. They accept pre-decoded key codes and host
//! timestamps and report what should happen, leaving focus changes to the caller.
//!
//! ```rust
//! use understory_key_state::key_map::Action;
//! use understory_key_state::press::{KeyDown, KeyState};
//! use understory_spatial::Direction;
//!
//! let mut keys = KeyState::new();
//!
//! // 39 is the default code for "right".
//! assert_eq!(keys.on_down(39, 1000), KeyDown::Dispatch(Action::Arrow(Direction::Right)));
//! // Auto-repeat while held bumps the count.
//! keys.on_down(39, 1040);
//! assert_eq!(keys.pressed().get(Action::Arrow(Direction::Right)), 2);
//!
//! // Release clears it.
//! keys.on_up(39);
//! assert_eq!(keys.pressed().get(Action::Arrow(Direction::Right)), 0);
//!
//! // Unknown codes are reported, not dispatched.
//! assert_eq!(keys.on_down(65, 1100), KeyDown::Unmapped);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod key_map;
pub mod press;

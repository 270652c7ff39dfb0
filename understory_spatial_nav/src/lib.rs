// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Spatial Nav: directional focus management for remote-control style UIs.
//!
//! ## Overview
//!
//! TVs, set-top boxes and kiosks have no pointer. Users move focus with four arrows and
//! activate things with "enter". This crate keeps track of which element is focused and
//! decides where focus goes next.
//!
//! The host registers every focusable element with a [`FocusableDescriptor`], forming a
//! forest: leaves are things like buttons, branches group them (rows, menus, pages).
//! The host measures elements and pushes their [`Layout`]s in; the engine never measures
//! anything itself.
//!
//! ## Moving focus
//!
//! - **Directional**: [`NavigationEngine::navigate_by_direction`] (or an arrow key fed to
//!   [`NavigationEngine::on_key_down`]) ranks the focused node's siblings with
//!   [`DirectionalPolicy`]. When none lies ahead it climbs to the parent and tries
//!   again, unless the parent has [`FocusFlags::BLOCK_NAVIGATION_OUT`].
//! - **Descent**: focusing a branch resolves to one of its leaves: the child it last
//!   held focus through, else its preferred child, else the child nearest the origin.
//! - **Programmatic**: [`NavigationEngine::set_focus`] and its variants
//!   [`set_focus_with`](NavigationEngine::set_focus_with) and
//!   [`steal_focus`](NavigationEngine::steal_focus) all descend.
//!
//! Every focus change notifies the old and new node through their [`FocusHandler`]s,
//! and tells ancestors with [`FocusFlags::TRACK_CHILDREN`] when focus enters or leaves
//! them.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_spatial_nav::{
//!     Direction, EngineConfig, FocusableDescriptor, KeyOutcome, Layout, NavigationEngine,
//! };
//!
//! let mut engine = NavigationEngine::new();
//! engine.init(EngineConfig::default());
//!
//! // A side menu with two entries, and a content row to its right.
//! let cell = |x: f64, y: f64| Layout::from_rect(Rect::new(x, y, x + 100.0, y + 40.0));
//! engine.add_focusable(FocusableDescriptor::new("menu").layout(cell(0.0, 0.0))).unwrap();
//! engine.add_focusable(FocusableDescriptor::new("home").parent("menu").layout(cell(0.0, 0.0))).unwrap();
//! engine.add_focusable(FocusableDescriptor::new("search").parent("menu").layout(cell(0.0, 50.0))).unwrap();
//! engine.add_focusable(FocusableDescriptor::new("content").layout(cell(150.0, 0.0))).unwrap();
//! engine.add_focusable(FocusableDescriptor::new("movie").parent("content").layout(cell(150.0, 0.0))).unwrap();
//!
//! // Focusing a branch lands on a leaf.
//! engine.set_focus("menu");
//! assert!(engine.is_focused("home"));
//!
//! // 40 is "down" in the default key map.
//! assert!(matches!(engine.on_key_down(40, 0), KeyOutcome::Navigated { moved: true, .. }));
//! assert!(engine.is_focused("search"));
//!
//! // Nothing to the right inside the menu, so focus climbs out and into the content.
//! assert!(engine.navigate_by_direction(Direction::Right));
//! assert!(engine.is_focused("movie"));
//!
//! // Coming back remembers where focus left the menu.
//! engine.navigate_by_direction(Direction::Left);
//! assert!(engine.is_focused("search"));
//! ```
//!
//! ## Logging
//!
//! The engine logs through [`tracing`]: focus commits, climbs and registry changes at
//! `debug`, per-candidate scores at `trace` when [`EngineConfig::debug`] is set, and
//! structural problems at `warn`.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod engine;
mod error;
mod handler;
mod navigate;
mod node;
mod registry;
mod resolve;
mod trace;
mod transition;
mod types;

#[cfg(test)]
mod test_util;

pub use config::EngineConfig;
pub use engine::{KeyOutcome, NavigationEngine};
pub use error::StructuralError;
pub use handler::{FocusHandler, KeyDetails, NoopHandler};
pub use node::{FocusableDescriptor, FocusableUpdate};
pub use trace::NavigationTrace;
pub use types::{FocusCause, FocusDetails, FocusFlags, FocusKey, Layout, Outcome, ROOT_FOCUS_KEY};

pub use understory_key_state::key_map::{Action, KeyCode};
pub use understory_spatial::{Direction, DirectionalPolicy};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A TV home screen driven by simulated remote key presses.
//!
//! The screen has a side menu and a content area with two rails of tiles:
//!
//! ```text
//! +------+  +----+ +----+ +----+
//! | home |  | a1 | | a2 | | a3 |   rail "featured"
//! | tv   |  +----+ +----+ +----+
//! | apps |  +----+ +----+
//! +------+  | b1 | | b2 |          rail "recent"
//!           +----+ +----+
//! ```
//!
//! Each branch remembers the child focus last left from, so moving back into the
//! content area from the menu lands on the tile the user was on. The last tile of
//! the first rail stops further presses to the right in its handler.
//!
//! Run:
//! - `RUST_LOG=understory_spatial_nav=debug cargo run -p understory_demos --example tv_grid`

use kurbo::Rect;
use tracing::info;
use understory_spatial_nav::{
    Action, Direction, EngineConfig, FocusDetails, FocusHandler, FocusKey,
    FocusableDescriptor, KeyDetails, KeyOutcome, Layout, NavigationEngine, Outcome,
    StructuralError,
};

const LEFT: u32 = 37;
const UP: u32 = 38;
const RIGHT: u32 = 39;
const DOWN: u32 = 40;
const ENTER: u32 = 13;
/// Remote "OK" button on a common set-top box.
const REMOTE_OK: u32 = 0xE0;

/// Logs what happens to one node.
#[derive(Debug)]
struct Tile {
    key: FocusKey,
}

impl Tile {
    fn new(key: &str) -> Self {
        Self { key: key.into() }
    }
}

impl FocusHandler for Tile {
    fn on_enter_press(&mut self, details: &KeyDetails<'_>) {
        info!(key = %self.key, pressed = ?details.pressed_keys(), "enter");
    }

    fn on_arrow_press(&mut self, direction: Direction, _details: &KeyDetails<'_>) -> Outcome {
        // The last tile of a rail swallows further presses to the right.
        if direction == Direction::Right && self.key.as_str() == "a3" {
            info!(key = %self.key, "end of rail");
            return Outcome::Stop;
        }
        Outcome::Continue
    }

    fn on_focus_changed(&mut self, focused: bool) {
        info!(key = %self.key, focused, "focus changed");
    }

    fn on_has_focused_descendant_changed(&mut self, has_focused_descendant: bool) {
        info!(key = %self.key, has_focused_descendant, "descendant focus changed");
    }

    fn on_became_focused(&mut self, layout: &Layout, details: &FocusDetails) {
        info!(key = %self.key, x = layout.x, y = layout.y, cause = ?details.cause, "became focused");
    }
}

fn cell(key: &str, left: f64, top: f64, width: f64, height: f64) -> FocusableDescriptor {
    FocusableDescriptor::new(key)
        .layout(Layout::from_rect(Rect::new(
            left,
            top,
            left + width,
            top + height,
        )))
        .handler(Tile::new(key))
}

fn build(engine: &mut NavigationEngine) -> Result<(), StructuralError> {
    engine.add_focusable(cell("menu", 0.0, 0.0, 200.0, 720.0).track_children(true))?;
    for (i, key) in ["home", "tv", "apps"].into_iter().enumerate() {
        engine.add_focusable(cell(key, 20.0, 40.0 + i as f64 * 80.0, 160.0, 60.0).parent("menu"))?;
    }

    engine.add_focusable(
        cell("content", 240.0, 0.0, 1040.0, 720.0).track_children(true),
    )?;
    engine.add_focusable(cell("featured", 240.0, 40.0, 1040.0, 200.0).parent("content"))?;
    engine.add_focusable(cell("recent", 240.0, 280.0, 1040.0, 200.0).parent("content"))?;
    for (i, key) in ["a1", "a2", "a3"].into_iter().enumerate() {
        let left = 260.0 + i as f64 * 320.0;
        engine.add_focusable(cell(key, left, 60.0, 300.0, 160.0).parent("featured"))?;
    }
    for (i, key) in ["b1", "b2"].into_iter().enumerate() {
        let left = 260.0 + i as f64 * 320.0;
        engine.add_focusable(cell(key, left, 300.0, 300.0, 160.0).parent("recent"))?;
    }
    Ok(())
}

fn main() -> Result<(), StructuralError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut engine = NavigationEngine::new();
    engine.init(EngineConfig {
        throttle_ms: 150,
        ..EngineConfig::default()
    });
    engine.set_key_map([(Action::Enter, [ENTER, REMOTE_OK])]);

    build(&mut engine)?;
    engine.set_focus("menu");
    info!(focus = ?engine.current_focus_key(), "initial focus");

    let mut now = 0_u64;
    let presses = [DOWN, RIGHT, RIGHT, RIGHT, RIGHT, DOWN, LEFT, LEFT, UP, REMOTE_OK];
    for code in presses {
        now += 500;
        let outcome = engine.on_key_down(code, now);
        engine.on_key_up(code);
        match &outcome {
            KeyOutcome::Navigated { moved: false, direction } => {
                info!(?direction, "nothing to move to");
            }
            KeyOutcome::Throttled(action) => info!(?action, "throttled"),
            _ => {}
        }
        info!(focus = ?engine.current_focus_key(), ?outcome, "after key {code}");
    }

    // A held key auto-repeats faster than the throttle allows.
    engine.set_focus("b1");
    for step in 0..4 {
        let outcome = engine.on_key_down(RIGHT, now + step * 50);
        info!(?outcome, "repeat {step}");
    }
    engine.on_key_up(RIGHT);

    // Removing the focused tile hands focus back through its rail.
    engine.remove_focusable("b2");
    info!(focus = ?engine.current_focus_key(), "after removing b2");

    engine.destroy();
    Ok(())
}

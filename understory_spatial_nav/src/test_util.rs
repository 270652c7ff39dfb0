// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the engine tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;
use understory_key_state::key_map::Action;
use understory_spatial::Direction;

use crate::engine::NavigationEngine;
use crate::handler::{FocusHandler, KeyDetails};
use crate::node::FocusableDescriptor;
use crate::types::{FocusCause, FocusDetails, FocusKey, Layout, Outcome};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    Focus(FocusKey, bool),
    Descendant(FocusKey, bool),
    Became(FocusKey, FocusCause),
    Blurred(FocusKey, FocusCause),
    Enter(FocusKey, u32),
    Arrow(FocusKey, Direction, u32),
}

/// Shared log written by every handler it hands out.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recorder {
    log: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn handler(&self, key: &str) -> RecordingHandler {
        RecordingHandler {
            key: key.into(),
            log: self.log.clone(),
            stop_arrows: false,
        }
    }

    pub(crate) fn stopping_handler(&self, key: &str) -> RecordingHandler {
        RecordingHandler {
            stop_arrows: true,
            ..self.handler(key)
        }
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

#[derive(Debug)]
pub(crate) struct RecordingHandler {
    key: FocusKey,
    log: Rc<RefCell<Vec<Event>>>,
    stop_arrows: bool,
}

impl RecordingHandler {
    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl FocusHandler for RecordingHandler {
    fn on_enter_press(&mut self, details: &KeyDetails<'_>) {
        self.push(Event::Enter(self.key.clone(), details.count(Action::Enter)));
    }

    fn on_arrow_press(&mut self, direction: Direction, details: &KeyDetails<'_>) -> Outcome {
        self.push(Event::Arrow(
            self.key.clone(),
            direction,
            details.count(Action::Arrow(direction)),
        ));
        if self.stop_arrows {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    }

    fn on_focus_changed(&mut self, focused: bool) {
        self.push(Event::Focus(self.key.clone(), focused));
    }

    fn on_has_focused_descendant_changed(&mut self, has_focused_descendant: bool) {
        self.push(Event::Descendant(self.key.clone(), has_focused_descendant));
    }

    fn on_became_focused(&mut self, _layout: &Layout, details: &FocusDetails) {
        self.push(Event::Became(self.key.clone(), details.cause));
    }

    fn on_became_blurred(&mut self, _layout: &Layout, details: &FocusDetails) {
        self.push(Event::Blurred(self.key.clone(), details.cause));
    }
}

/// Descriptor for a node at `(left, top)` with the given size.
pub(crate) fn at(key: &str, left: f64, top: f64, width: f64, height: f64) -> FocusableDescriptor {
    FocusableDescriptor::new(key).layout(Layout::from_rect(Rect::new(
        left,
        top,
        left + width,
        top + height,
    )))
}

/// Register `keys` as 100x50 cells laid out left to right with a 10 unit gap.
pub(crate) fn row(engine: &mut NavigationEngine, parent: Option<&str>, keys: &[&str]) {
    for (i, key) in keys.iter().enumerate() {
        let mut descriptor = at(key, i as f64 * 110.0, 0.0, 100.0, 50.0);
        if let Some(parent) = parent {
            descriptor = descriptor.parent(parent);
        }
        engine
            .add_focusable(descriptor)
            .expect("test fixture keys are unique");
    }
}

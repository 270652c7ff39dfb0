// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug record of a directional ranking step.
//!
//! Hosts that draw a debug overlay read the last trace after each key press and paint
//! the anchor's reference corners, every candidate's corners, and the winner.

use alloc::vec::Vec;

use understory_spatial::{Direction, Ranked, RefCorners};

use crate::types::{FocusKey, Layout};

/// One ranking step, recorded when [`EngineConfig::visual_debug`](crate::EngineConfig::visual_debug) is set.
#[derive(Clone, Debug)]
pub struct NavigationTrace {
    /// Direction of travel.
    pub direction: Direction,
    /// Node navigation started from at this step (the focused node, or an ancestor
    /// after climbing).
    pub anchor: FocusKey,
    /// The anchor's geometry.
    pub anchor_layout: Layout,
    /// The anchor's leading-edge corners.
    pub anchor_corners: RefCorners,
    /// Eligible siblings, best first.
    pub candidates: Vec<Ranked<FocusKey>>,
}

impl NavigationTrace {
    /// The winning candidate, if any sibling was eligible.
    pub fn chosen(&self) -> Option<&FocusKey> {
        self.candidates.first().map(|r| &r.id)
    }
}

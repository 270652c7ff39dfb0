// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional navigation.
//!
//! Focus moves among siblings first. When no sibling lies ahead, the anchor becomes its
//! parent's remembered child and the search repeats one level up, unless the parent
//! blocks navigation out of itself.

use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::{debug, trace, warn};
use understory_spatial::{
    Direction, FocusEntry, FocusPolicy, FocusSpace, Ranked, Role, ref_corners,
};

use crate::engine::NavigationEngine;
use crate::trace::NavigationTrace;
use crate::types::{FocusCause, FocusDetails, FocusFlags, FocusKey};

impl NavigationEngine {
    /// Move focus from the focused node in `direction`.
    ///
    /// Returns whether focus changed. Does nothing while paused, disabled, or in native
    /// mode.
    pub fn navigate_by_direction(&mut self, direction: Direction) -> bool {
        if self.paused {
            return false;
        }
        self.navigate(direction, None)
    }

    /// Move focus in `direction`, starting from `from` instead of the focused node.
    ///
    /// Gated by [`pause`](Self::pause) like
    /// [`navigate_by_direction`](Self::navigate_by_direction).
    pub fn navigate_from(&mut self, from: &str, direction: Direction) -> bool {
        if self.paused {
            return false;
        }
        self.navigate(direction, Some(from))
    }

    pub(crate) fn navigate(&mut self, direction: Direction, from: Option<&str>) -> bool {
        if !self.enabled || self.config.native_mode {
            return false;
        }
        let Some(mut anchor) = from.map(FocusKey::from).or_else(|| self.current.clone()) else {
            return false;
        };

        let mut visited: HashSet<FocusKey> = HashSet::new();
        loop {
            if !visited.insert(anchor.clone()) {
                warn!("navigation {direction} revisited {anchor}; stopping");
                return false;
            }
            let Some(node) = self.registry.get(&anchor) else {
                return false;
            };
            let parent = node.parent.clone();

            if let Some(next) = self.best_sibling(&anchor, direction) {
                debug!("navigate {direction}: {anchor} -> {next}");
                return self.transition(
                    next.as_str(),
                    FocusDetails::new(FocusCause::Navigation(direction)),
                    false,
                );
            }

            let Some(parent_node) = parent.and_then(|p| self.registry.get_mut(&p)) else {
                debug!("navigate {direction}: nothing beyond {anchor}");
                return false;
            };
            parent_node.last_focused_child = Some(anchor.clone());
            if parent_node.has(FocusFlags::BLOCK_NAVIGATION_OUT) {
                debug!(
                    "navigate {direction}: {} blocks navigation out",
                    parent_node.key
                );
                return false;
            }
            debug!("navigate {direction}: climbing from {anchor} to {}", parent_node.key);
            anchor = parent_node.key.clone();
        }
    }

    /// Best-ranked navigable sibling of `anchor` in `direction`.
    fn best_sibling(&mut self, anchor: &FocusKey, direction: Direction) -> Option<FocusKey> {
        let node = self.registry.get(anchor)?;
        let anchor_layout = node.layout;
        let siblings = self.registry.children_of(node.parent.as_ref());
        let entries: Vec<FocusEntry<&FocusKey>> = siblings
            .iter()
            .map(|sibling| FocusEntry {
                id: &sibling.key,
                rect: sibling.layout.rect(),
                enabled: sibling.is_focusable(),
            })
            .collect();
        let space = FocusSpace { nodes: &entries };
        let policy = self.config.policy;

        if !self.config.debug && !self.config.visual_debug {
            return policy.next(anchor, direction, &space).cloned();
        }

        let ranked = policy.rank(anchor, direction, &space);
        if self.config.debug {
            for candidate in &ranked {
                trace!(
                    slice = ?candidate.priority.slice,
                    primary = candidate.priority.primary,
                    secondary = candidate.priority.secondary,
                    score = candidate.priority.score,
                    "candidate {} for {direction} from {anchor}",
                    candidate.id
                );
            }
        }
        let candidates: Vec<Ranked<FocusKey>> = ranked
            .into_iter()
            .map(|r| Ranked {
                id: r.id.clone(),
                corners: r.corners,
                priority: r.priority,
            })
            .collect();
        let best = candidates.first().map(|r| r.id.clone());

        if self.config.visual_debug {
            self.trace = Some(NavigationTrace {
                direction,
                anchor: anchor.clone(),
                anchor_layout,
                anchor_corners: ref_corners(direction, Role::Origin, anchor_layout.rect()),
                candidates,
            });
        }
        best
    }
}

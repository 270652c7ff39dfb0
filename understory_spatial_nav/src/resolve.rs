// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descent: turning a focus request into the node that actually takes focus.
//!
//! A request for a branch descends into one of its focusable children, preferring in
//! order the remembered child, the preferred child, and the child nearest the origin
//! of the coordinate space. Descent repeats until it reaches a node with no focusable
//! children. Each branch passed through gets an intermediate
//! [`on_became_focused`](crate::FocusHandler::on_became_focused).

use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::warn;
use understory_spatial::{FocusEntry, FocusSpace, closest_to_origin};

use crate::engine::NavigationEngine;
use crate::error::StructuralError;
use crate::types::{FocusCause, FocusDetails, FocusFlags, FocusKey};

impl NavigationEngine {
    /// Resolve `key` to the node that would receive focus.
    ///
    /// Unknown keys resolve to themselves, as does every key in native mode. Branches
    /// passed through are notified exactly as they would be by
    /// [`set_focus`](Self::set_focus). A malformed graph is logged and resolves to the
    /// last node reached; use [`try_resolve`](Self::try_resolve) to see the error.
    pub fn resolve(&mut self, key: &str) -> FocusKey {
        self.resolve_with(key, &FocusDetails::new(FocusCause::Programmatic))
    }

    /// Like [`resolve`](Self::resolve), but reports a cycle instead of degrading.
    pub fn try_resolve(&mut self, key: &str) -> Result<FocusKey, StructuralError> {
        self.descend(key, &FocusDetails::new(FocusCause::Programmatic))
            .map_err(|(err, _)| err)
    }

    pub(crate) fn resolve_with(&mut self, key: &str, details: &FocusDetails) -> FocusKey {
        match self.descend(key, details) {
            Ok(resolved) => resolved,
            Err((err, reached)) => {
                warn!("descent from {key} stopped at {reached}: {err}");
                reached
            }
        }
    }

    /// On error, also returns the last key reached before the repeat.
    fn descend(
        &mut self,
        key: &str,
        details: &FocusDetails,
    ) -> Result<FocusKey, (StructuralError, FocusKey)> {
        let mut current = FocusKey::from(key);
        if self.config.native_mode {
            return Ok(current);
        }

        let mut visited: HashSet<FocusKey> = HashSet::new();
        loop {
            visited.insert(current.clone());
            let Some(next) = self.next_hop(&current) else {
                return Ok(current);
            };
            self.notify_intermediate_focus(&current, details);
            if visited.contains(&next) {
                let err = StructuralError::Cycle {
                    key: next,
                    via: current.clone(),
                };
                return Err((err, current));
            }
            current = next;
        }
    }

    /// The child descent would move into from `key`, or `None` if `key` is a leaf
    /// (or unknown).
    fn next_hop(&self, key: &FocusKey) -> Option<FocusKey> {
        let node = self.registry.get(key)?;
        let children = self.registry.focusable_children_of(key);
        if children.is_empty() {
            return None;
        }

        if !node.has(FocusFlags::FORGET_LAST_FOCUSED_CHILD)
            && let Some(last) = &node.last_focused_child
            && self.registry.is_navigable(last)
        {
            return Some(last.clone());
        }
        if let Some(preferred) = &node.preferred_child
            && self.registry.is_navigable(preferred)
        {
            return Some(preferred.clone());
        }

        let entries: Vec<FocusEntry<&FocusKey>> = children
            .iter()
            .map(|child| FocusEntry {
                id: &child.key,
                rect: child.layout.rect(),
                enabled: true,
            })
            .collect();
        closest_to_origin(&FocusSpace { nodes: &entries }).cloned()
    }

    pub(crate) fn notify_intermediate_focus(&mut self, key: &FocusKey, details: &FocusDetails) {
        if let Some(node) = self.registry.get_mut(key)
            && node.is_focusable()
        {
            node.handler.on_became_focused(&node.layout, details);
        }
    }

    pub(crate) fn notify_intermediate_blur(&mut self, key: &FocusKey, details: &FocusDetails) {
        if let Some(node) = self.registry.get_mut(key)
            && node.is_focusable()
        {
            node.handler.on_became_blurred(&node.layout, details);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::node::{FocusableDescriptor, FocusableUpdate};
    use crate::test_util::{Event, Recorder, at, row};
    use crate::types::Layout;
    use alloc::vec;
    use kurbo::Rect;
    use understory_spatial::Direction;

    fn started() -> NavigationEngine {
        let mut engine = NavigationEngine::new();
        engine.init(EngineConfig::default());
        engine
    }

    #[test]
    fn leaf_resolves_to_itself() {
        let mut engine = started();
        row(&mut engine, None, &["a", "b"]);
        assert_eq!(engine.resolve("a"), FocusKey::from("a"));
        assert_eq!(engine.resolve("missing"), FocusKey::from("missing"));
    }

    #[test]
    fn branch_descends_to_child_nearest_origin() {
        let mut engine = started();
        engine.add_focusable(FocusableDescriptor::new("b")).unwrap();
        for (key, left, top) in [
            ("far", 222.0, -11.43),
            ("one", 1.0, 0.0),
            ("near", 0.2, -0.00001),
            ("low", 12.0, 10.0),
        ] {
            engine
                .add_focusable(at(key, left, top, 10.0, 10.0).parent("b"))
                .unwrap();
        }
        assert_eq!(engine.resolve("b"), FocusKey::from("near"));
    }

    #[test]
    fn descent_skips_non_focusable_children() {
        let mut engine = started();
        engine.add_focusable(FocusableDescriptor::new("b")).unwrap();
        engine
            .add_focusable(at("hidden", 0.0, 0.0, 10.0, 10.0).parent("b").focusable(false))
            .unwrap();
        engine
            .add_focusable(at("shown", 50.0, 0.0, 10.0, 10.0).parent("b"))
            .unwrap();
        assert_eq!(engine.resolve("b"), FocusKey::from("shown"));

        // A branch whose children are all non-focusable is a leaf.
        engine.update_focusable(
            "shown",
            FocusableUpdate {
                focusable: Some(false),
                ..FocusableUpdate::default()
            },
        );
        assert_eq!(engine.resolve("b"), FocusKey::from("b"));
    }

    #[test]
    fn preferred_child_beats_geometry() {
        let mut engine = started();
        engine
            .add_focusable(FocusableDescriptor::new("b").preferred_child("y"))
            .unwrap();
        row(&mut engine, Some("b"), &["x", "y"]);
        assert_eq!(engine.resolve("b"), FocusKey::from("y"));
    }

    #[test]
    fn remembered_child_beats_preferred_unless_forgotten() {
        let mut engine = started();
        engine
            .add_focusable(FocusableDescriptor::new("b").preferred_child("x"))
            .unwrap();
        row(&mut engine, Some("b"), &["x", "y", "z"]);
        engine.set_focus("y");
        engine.add_focusable(FocusableDescriptor::new("away")).unwrap();
        engine.set_focus("away");
        assert_eq!(engine.last_focused_child_of("b"), Some(&FocusKey::from("y")));
        assert_eq!(engine.resolve("b"), FocusKey::from("y"));

        let mut engine = started();
        engine
            .add_focusable(
                FocusableDescriptor::new("b")
                    .preferred_child("x")
                    .forget_last_focused_child(true),
            )
            .unwrap();
        row(&mut engine, Some("b"), &["x", "y"]);
        engine.set_focus("y");
        engine.add_focusable(FocusableDescriptor::new("away")).unwrap();
        engine.set_focus("away");
        assert_eq!(engine.resolve("b"), FocusKey::from("x"));
    }

    #[test]
    fn descent_recurses_through_nested_branches() {
        let mut engine = started();
        let log = Recorder::new();
        engine
            .add_focusable(FocusableDescriptor::new("page").handler(log.handler("page")))
            .unwrap();
        engine
            .add_focusable(
                FocusableDescriptor::new("menu")
                    .parent("page")
                    .handler(log.handler("menu")),
            )
            .unwrap();
        row(&mut engine, Some("menu"), &["m1", "m2"]);

        assert_eq!(engine.resolve("page"), FocusKey::from("m1"));
        assert_eq!(
            log.events(),
            vec![
                Event::Became("page".into(), FocusCause::Programmatic),
                Event::Became("menu".into(), FocusCause::Programmatic),
            ]
        );
    }

    #[test]
    fn self_referencing_preferred_child_is_a_cycle() {
        let mut engine = started();
        engine
            .add_focusable(FocusableDescriptor::new("b").preferred_child("b"))
            .unwrap();
        row(&mut engine, Some("b"), &["x"]);

        assert_eq!(
            engine.try_resolve("b"),
            Err(StructuralError::Cycle {
                key: "b".into(),
                via: "b".into(),
            })
        );
        // The lenient form degrades instead of looping.
        assert_eq!(engine.resolve("b"), FocusKey::from("b"));
    }

    #[test]
    fn native_mode_resolves_to_itself() {
        let mut engine = NavigationEngine::new();
        engine.init(EngineConfig {
            native_mode: true,
            ..EngineConfig::default()
        });
        engine.add_focusable(FocusableDescriptor::new("b")).unwrap();
        row(&mut engine, Some("b"), &["x"]);
        assert_eq!(engine.resolve("b"), FocusKey::from("b"));
    }

    #[test]
    fn descent_after_navigation_returns_to_breadcrumb() {
        let mut engine = started();
        engine.add_focusable(FocusableDescriptor::new("b")).unwrap();
        engine
            .add_focusable(at("c", 200.0, 200.0, 50.0, 50.0).parent("b"))
            .unwrap();
        // Closer to the origin, so geometry alone would pick it.
        engine
            .add_focusable(at("d", 0.0, 0.0, 50.0, 50.0).parent("b"))
            .unwrap();
        engine
            .add_focusable(at("other", 400.0, 200.0, 50.0, 50.0))
            .unwrap();
        engine.update_layout("b", Layout::from_rect(Rect::new(0.0, 0.0, 250.0, 250.0)));

        engine.set_focus("c");
        assert!(engine.navigate_by_direction(Direction::Right));
        assert!(engine.is_focused("other"));
        assert_eq!(engine.last_focused_child_of("b"), Some(&FocusKey::from("c")));
        assert_eq!(engine.resolve("b"), FocusKey::from("c"));
    }
}

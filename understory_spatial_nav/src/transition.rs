// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Committing focus changes.
//!
//! A commit runs in a fixed order so observers never see two focused nodes:
//!
//! 1. the old node is told it lost focus and its parent remembers it;
//! 2. the focus key changes;
//! 3. ancestors that no longer contain focus are notified (inner to outer), then
//!    ancestors that now contain it (outer to inner);
//! 4. the new node is told it gained focus;
//! 5. every branch above the old node remembers the child it was reached through.

use tracing::debug;

use crate::engine::NavigationEngine;
use crate::registry::KeyChain;
use crate::types::{FocusCause, FocusDetails, FocusFlags, FocusKey};

impl NavigationEngine {
    /// Focus `key`, descending into it if it's a branch.
    ///
    /// Returns whether the focus key changed. Does nothing while the engine is disabled.
    /// Unknown keys are accepted: focus moves to them once they register.
    pub fn set_focus(&mut self, key: &str) -> bool {
        self.set_focus_with(key, None)
    }

    /// Like [`set_focus`](Self::set_focus), but focus `overwrite` instead of `key` when
    /// it is given.
    ///
    /// Hosts bind `key` to an element once and pass `overwrite` to redirect a request
    /// made on that element's behalf.
    pub fn set_focus_with(&mut self, key: &str, overwrite: Option<&str>) -> bool {
        let target = overwrite.unwrap_or(key);
        self.transition(target, FocusDetails::new(FocusCause::Programmatic), false)
    }

    /// Focus `key` on behalf of the element registered under it.
    ///
    /// Same as `set_focus_with(key, Some(key))`: branches still descend. This also works
    /// in native mode, where descent is the identity, and is how the host reports
    /// which element the platform focused.
    pub fn steal_focus(&mut self, key: &str) -> bool {
        self.set_focus_with(key, Some(key))
    }

    /// Resolve `target` and commit. With `force`, a commit that leaves the key unchanged
    /// still refreshes ancestors and notifies the node.
    pub(crate) fn transition(&mut self, target: &str, details: FocusDetails, force: bool) -> bool {
        if !self.enabled {
            return false;
        }
        let resolved = self.resolve_with(target, &details);
        self.commit(resolved, &details, force)
    }

    fn commit(&mut self, next: FocusKey, details: &FocusDetails, force: bool) -> bool {
        let changed = self.current.as_ref() != Some(&next);
        if !changed && !force {
            return false;
        }

        let previous = if changed { self.current.take() } else { None };
        if let Some(old) = &previous {
            self.blur_node(old, details);
        }

        debug!(
            from = previous.as_ref().map(FocusKey::as_str),
            cause = ?details.cause,
            "focus -> {next}"
        );
        self.current = Some(next.clone());
        self.update_ancestors(details);
        self.focus_node(&next, details);

        if let Some(old) = &previous {
            self.remember_path(old);
        }
        changed
    }

    fn blur_node(&mut self, key: &FocusKey, details: &FocusDetails) {
        let Some(node) = self.registry.get_mut(key) else {
            return;
        };
        if node.is_focusable() {
            node.handler.on_focus_changed(false);
            node.handler.on_became_blurred(&node.layout, details);
        }
        let parent = node.parent.clone();
        if let Some(parent) = parent.and_then(|p| self.registry.get_mut(&p)) {
            parent.last_focused_child = Some(key.clone());
        }
    }

    fn focus_node(&mut self, key: &FocusKey, details: &FocusDetails) {
        if let Some(node) = self.registry.get_mut(key)
            && node.is_focusable()
        {
            node.handler.on_focus_changed(true);
            node.handler.on_became_focused(&node.layout, details);
        }
    }

    /// Diff the ancestor chain of the new focus against the stored one.
    fn update_ancestors(&mut self, details: &FocusDetails) {
        let entered = match &self.current {
            Some(key) => self.registry.ancestors_of(key),
            None => KeyChain::new(),
        };
        let vacated = core::mem::replace(&mut self.ancestors, entered.clone());

        for key in vacated.iter().filter(|k| !entered.contains(k)) {
            if let Some(node) = self.registry.get_mut(key)
                && node.has(FocusFlags::TRACK_CHILDREN)
            {
                node.handler.on_has_focused_descendant_changed(false);
            }
            self.notify_intermediate_blur(key, details);
        }
        for key in entered.iter().rev().filter(|k| !vacated.contains(k)) {
            if let Some(node) = self.registry.get_mut(key)
                && node.has(FocusFlags::TRACK_CHILDREN)
            {
                node.handler.on_has_focused_descendant_changed(true);
            }
            self.notify_intermediate_focus(key, details);
        }
    }

    /// Point every ancestor of `key` at the child on the path down to `key`.
    fn remember_path(&mut self, key: &FocusKey) {
        if !self.registry.contains(key) {
            return;
        }
        let mut child = key.clone();
        for parent in self.registry.ancestors_of(key) {
            if let Some(node) = self.registry.get_mut(&parent) {
                node.last_focused_child = Some(child);
            }
            child = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::node::FocusableDescriptor;
    use crate::test_util::{Event, Recorder, at, row};
    use alloc::vec;
    use alloc::vec::Vec;

    const PROGRAMMATIC: FocusCause = FocusCause::Programmatic;

    fn started() -> NavigationEngine {
        let mut engine = NavigationEngine::new();
        engine.init(EngineConfig::default());
        engine
    }

    /// Two tracked sections under a tracked page, each with two items.
    fn sections(log: &Recorder) -> NavigationEngine {
        let mut engine = started();
        engine
            .add_focusable(
                FocusableDescriptor::new("page")
                    .track_children(true)
                    .handler(log.handler("page")),
            )
            .unwrap();
        for (section, top) in [("s1", 0.0), ("s2", 100.0)] {
            engine
                .add_focusable(
                    at(section, 0.0, top, 300.0, 80.0)
                        .parent("page")
                        .track_children(true)
                        .handler(log.handler(section)),
                )
                .unwrap();
            for (i, item) in ["a", "b"].iter().enumerate() {
                let key = alloc::format!("{section}{item}");
                engine
                    .add_focusable(
                        at(&key, i as f64 * 150.0, top, 100.0, 80.0)
                            .parent(section)
                            .handler(log.handler(&key)),
                    )
                    .unwrap();
            }
        }
        engine
    }

    fn descendant_events(log: &Recorder) -> Vec<Event> {
        log.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Descendant(..)))
            .collect()
    }

    #[test]
    fn set_focus_reports_change() {
        let mut engine = started();
        row(&mut engine, None, &["a", "b"]);
        assert!(engine.set_focus("a"));
        assert!(!engine.set_focus("a"));
        assert!(engine.set_focus("b"));
        assert_eq!(engine.current_focus_key(), Some(&FocusKey::from("b")));
    }

    #[test]
    fn commit_order_is_blur_then_ancestors_then_focus() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        engine.set_focus("s1a");
        log.clear();

        engine.set_focus("s2b");
        assert_eq!(
            log.events(),
            vec![
                Event::Focus("s1a".into(), false),
                Event::Blurred("s1a".into(), PROGRAMMATIC),
                Event::Descendant("s1".into(), false),
                Event::Blurred("s1".into(), PROGRAMMATIC),
                Event::Descendant("s2".into(), true),
                Event::Became("s2".into(), PROGRAMMATIC),
                Event::Focus("s2b".into(), true),
                Event::Became("s2b".into(), PROGRAMMATIC),
            ]
        );
    }

    #[test]
    fn tracked_ancestors_notified_once_per_change() {
        let log = Recorder::new();
        let mut engine = sections(&log);

        engine.set_focus("s1a");
        assert_eq!(
            descendant_events(&log),
            vec![
                Event::Descendant("page".into(), true),
                Event::Descendant("s1".into(), true),
            ]
        );
        assert!(engine.has_focused_descendant("page"));
        assert!(engine.has_focused_descendant("s1"));
        assert!(!engine.has_focused_descendant("s2"));

        // Moving within a section notifies nobody.
        log.clear();
        engine.set_focus("s1b");
        assert!(descendant_events(&log).is_empty());

        // Moving across sections leaves the common ancestor alone.
        log.clear();
        engine.set_focus("s2a");
        assert_eq!(
            descendant_events(&log),
            vec![
                Event::Descendant("s1".into(), false),
                Event::Descendant("s2".into(), true),
            ]
        );
        assert!(engine.has_focused_descendant("page"));
    }

    #[test]
    fn untracked_ancestors_get_no_descendant_events() {
        let log = Recorder::new();
        let mut engine = started();
        engine
            .add_focusable(FocusableDescriptor::new("menu").handler(log.handler("menu")))
            .unwrap();
        row(&mut engine, Some("menu"), &["a"]);
        engine.set_focus("a");
        assert!(descendant_events(&log).is_empty());
        assert!(engine.has_focused_descendant("menu"));
    }

    #[test]
    fn leaving_a_branch_records_breadcrumbs_all_the_way_up() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        engine.add_focusable(FocusableDescriptor::new("footer")).unwrap();

        engine.set_focus("s2b");
        engine.set_focus("footer");
        assert_eq!(engine.last_focused_child_of("s2"), Some(&FocusKey::from("s2b")));
        assert_eq!(engine.last_focused_child_of("page"), Some(&FocusKey::from("s2")));

        // Coming back lands where focus left.
        engine.set_focus("page");
        assert!(engine.is_focused("s2b"));
    }

    #[test]
    fn branch_target_resolves_before_commit() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        assert!(engine.set_focus("page"));
        assert!(engine.is_focused("s1a"));
    }

    #[test]
    fn steal_focus_descends_like_set_focus() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        assert!(engine.steal_focus("s2"));
        assert!(engine.is_focused("s2a"));
        assert!(engine.has_focused_descendant("s2"));

        // Leaves are taken as-is.
        assert!(engine.steal_focus("s1b"));
        assert!(engine.is_focused("s1b"));
    }

    #[test]
    fn overwrite_key_replaces_target() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        assert!(engine.set_focus_with("s1a", Some("s2")));
        assert!(engine.is_focused("s2a"));
        assert!(engine.set_focus_with("s1b", None));
        assert!(engine.is_focused("s1b"));
    }

    #[test]
    fn steal_focus_in_native_mode_takes_the_key_itself() {
        let mut engine = NavigationEngine::new();
        engine.init(EngineConfig {
            native_mode: true,
            ..EngineConfig::default()
        });
        engine.add_focusable(FocusableDescriptor::new("menu")).unwrap();
        row(&mut engine, Some("menu"), &["a", "b"]);
        assert!(engine.steal_focus("menu"));
        assert!(engine.is_focused("menu"));
    }

    #[test]
    fn non_focusable_nodes_get_no_focus_callbacks() {
        let log = Recorder::new();
        let mut engine = started();
        engine
            .add_focusable(
                FocusableDescriptor::new("hidden")
                    .focusable(false)
                    .handler(log.handler("hidden")),
            )
            .unwrap();
        engine
            .add_focusable(FocusableDescriptor::new("shown").handler(log.handler("shown")))
            .unwrap();

        assert!(engine.set_focus("hidden"));
        assert!(engine.is_focused("hidden"));
        assert!(log.events().is_empty());

        // Leaving it sends no blur either.
        assert!(engine.set_focus("shown"));
        assert_eq!(
            log.events(),
            vec![
                Event::Focus("shown".into(), true),
                Event::Became("shown".into(), PROGRAMMATIC),
            ]
        );
    }

    #[test]
    fn focus_before_registration_applies_on_registration() {
        let log = Recorder::new();
        let mut engine = started();
        assert!(engine.set_focus("late"));
        assert!(engine.is_focused("late"));

        engine
            .add_focusable(FocusableDescriptor::new("late").handler(log.handler("late")))
            .unwrap();
        assert_eq!(
            log.events(),
            vec![
                Event::Focus("late".into(), true),
                Event::Became("late".into(), FocusCause::Registration),
            ]
        );
    }

    #[test]
    fn late_branch_registration_descends() {
        let mut engine = started();
        engine.set_focus("menu");
        row(&mut engine, Some("menu"), &["a", "b"]);
        // Children registered first; focus stays on the unregistered key.
        assert!(engine.is_focused("menu"));

        engine.add_focusable(FocusableDescriptor::new("menu")).unwrap();
        assert!(engine.is_focused("a"));
        assert!(engine.has_focused_descendant("menu"));
    }

    #[test]
    fn removing_focused_node_restores_to_parent() {
        let log = Recorder::new();
        let mut engine = sections(&log);
        engine.set_focus("s1b");
        log.clear();

        assert!(engine.remove_focusable("s1b"));
        assert!(engine.is_focused("s1a"));
        assert!(log.events().contains(&Event::Became("s1a".into(), FocusCause::Restore)));
        assert_eq!(engine.last_focused_child_of("s1"), None);
    }

    #[test]
    fn removal_without_auto_restore_leaves_focus_key() {
        let mut engine = started();
        engine
            .add_focusable(FocusableDescriptor::new("menu").auto_restore_focus(false))
            .unwrap();
        row(&mut engine, Some("menu"), &["a", "b"]);
        engine.set_focus("b");

        assert!(engine.remove_focusable("b"));
        assert!(engine.is_focused("b"));
        assert!(!engine.contains("b"));
        assert!(!engine.remove_focusable("b"));
    }

    #[test]
    fn removal_clears_stale_breadcrumb() {
        let mut engine = started();
        engine.add_focusable(FocusableDescriptor::new("menu")).unwrap();
        row(&mut engine, Some("menu"), &["a", "b"]);
        engine.add_focusable(FocusableDescriptor::new("away")).unwrap();
        engine.set_focus("b");
        engine.set_focus("away");
        assert_eq!(engine.last_focused_child_of("menu"), Some(&FocusKey::from("b")));

        engine.remove_focusable("b");
        assert_eq!(engine.last_focused_child_of("menu"), None);
        assert!(engine.is_focused("away"));
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node records, registration descriptors, and update patches.

use alloc::boxed::Box;
use core::fmt;

use crate::handler::{FocusHandler, NoopHandler};
use crate::types::{FocusFlags, FocusKey, Layout};

/// A registered focusable node.
pub(crate) struct FocusNode {
    pub(crate) key: FocusKey,
    /// `None` for top-level nodes.
    pub(crate) parent: Option<FocusKey>,
    pub(crate) layout: Layout,
    pub(crate) flags: FocusFlags,
    pub(crate) preferred_child: Option<FocusKey>,
    /// Breadcrumb: the child that held focus when focus last left this branch.
    pub(crate) last_focused_child: Option<FocusKey>,
    pub(crate) handler: Box<dyn FocusHandler>,
    /// Registration order, for deterministic tie-breaking.
    pub(crate) seq: u64,
}

impl FocusNode {
    pub(crate) fn is_focusable(&self) -> bool {
        self.flags.contains(FocusFlags::FOCUSABLE)
    }

    pub(crate) fn has(&self, flag: FocusFlags) -> bool {
        self.flags.contains(flag)
    }
}

impl fmt::Debug for FocusNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusNode")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("layout", &self.layout)
            .field("flags", &self.flags)
            .field("preferred_child", &self.preferred_child)
            .field("last_focused_child", &self.last_focused_child)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

/// Everything needed to register a node.
///
/// ```
/// use understory_spatial_nav::{FocusableDescriptor, FocusFlags};
///
/// let row = FocusableDescriptor::new("row-1")
///     .parent("menu")
///     .track_children(true)
///     .preferred_child("row-1-item-3");
/// assert!(row.flags().contains(FocusFlags::TRACK_CHILDREN | FocusFlags::FOCUSABLE));
/// ```
pub struct FocusableDescriptor {
    pub(crate) key: FocusKey,
    pub(crate) parent: Option<FocusKey>,
    pub(crate) flags: FocusFlags,
    pub(crate) preferred_child: Option<FocusKey>,
    pub(crate) layout: Option<Layout>,
    pub(crate) handler: Box<dyn FocusHandler>,
}

impl FocusableDescriptor {
    /// Describe a top-level node with default flags.
    pub fn new(key: impl Into<FocusKey>) -> Self {
        Self {
            key: key.into(),
            parent: None,
            flags: FocusFlags::default(),
            preferred_child: None,
            layout: None,
            handler: Box::new(NoopHandler),
        }
    }

    /// Set the parent. [`ROOT_FOCUS_KEY`](crate::ROOT_FOCUS_KEY) means top-level.
    pub fn parent(mut self, parent: impl Into<FocusKey>) -> Self {
        let parent = parent.into();
        self.parent = (!parent.is_root()).then_some(parent);
        self
    }

    /// Replace all capability flags.
    pub fn with_flags(mut self, flags: FocusFlags) -> Self {
        self.flags = flags;
        self
    }

    /// See [`FocusFlags::FOCUSABLE`].
    pub fn focusable(self, on: bool) -> Self {
        self.with_flag(FocusFlags::FOCUSABLE, on)
    }

    /// See [`FocusFlags::TRACK_CHILDREN`].
    pub fn track_children(self, on: bool) -> Self {
        self.with_flag(FocusFlags::TRACK_CHILDREN, on)
    }

    /// See [`FocusFlags::FORGET_LAST_FOCUSED_CHILD`].
    pub fn forget_last_focused_child(self, on: bool) -> Self {
        self.with_flag(FocusFlags::FORGET_LAST_FOCUSED_CHILD, on)
    }

    /// See [`FocusFlags::BLOCK_NAVIGATION_OUT`].
    pub fn block_navigation_out(self, on: bool) -> Self {
        self.with_flag(FocusFlags::BLOCK_NAVIGATION_OUT, on)
    }

    /// See [`FocusFlags::AUTO_RESTORE_FOCUS`].
    pub fn auto_restore_focus(self, on: bool) -> Self {
        self.with_flag(FocusFlags::AUTO_RESTORE_FOCUS, on)
    }

    /// Child to descend into when no remembered child applies.
    pub fn preferred_child(mut self, child: impl Into<FocusKey>) -> Self {
        self.preferred_child = Some(child.into());
        self
    }

    /// Geometry to start with instead of a zeroed layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Callbacks for this node.
    pub fn handler(mut self, handler: impl FocusHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// The key being registered.
    pub fn key(&self) -> &FocusKey {
        &self.key
    }

    /// The flags the node will start with.
    pub fn flags(&self) -> FocusFlags {
        self.flags
    }

    fn with_flag(mut self, flag: FocusFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    pub(crate) fn into_node(self, seq: u64) -> FocusNode {
        FocusNode {
            key: self.key,
            parent: self.parent,
            layout: self.layout.unwrap_or_default(),
            flags: self.flags,
            preferred_child: self.preferred_child,
            last_focused_child: None,
            handler: self.handler,
            seq,
        }
    }
}

impl fmt::Debug for FocusableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusableDescriptor")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("flags", &self.flags)
            .field("preferred_child", &self.preferred_child)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Patch applied by [`NavigationEngine::update_focusable`](crate::NavigationEngine::update_focusable).
///
/// Fields left as `None` are not touched. Identity, parent and breadcrumb can't be patched.
#[derive(Default)]
pub struct FocusableUpdate {
    /// New geometry. Ignored in native mode.
    pub layout: Option<Layout>,
    /// New preferred child; `Some(None)` clears it.
    pub preferred_child: Option<Option<FocusKey>>,
    /// New value for [`FocusFlags::FOCUSABLE`].
    pub focusable: Option<bool>,
    /// New value for [`FocusFlags::BLOCK_NAVIGATION_OUT`].
    pub block_navigation_out: Option<bool>,
    /// Replacement callbacks.
    pub handler: Option<Box<dyn FocusHandler>>,
}

impl fmt::Debug for FocusableUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusableUpdate")
            .field("layout", &self.layout)
            .field("preferred_child", &self.preferred_child)
            .field("focusable", &self.focusable)
            .field("block_navigation_out", &self.block_navigation_out)
            .field("handler", &self.handler.as_ref().map(|_| "..."))
            .finish()
    }
}

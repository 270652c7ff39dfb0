// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storage for registered nodes.
//!
//! Parent links are the only structure; children are found by scanning. Every list
//! returned here is in registration order so that ranking ties resolve the same way
//! on every run.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::StructuralError;
use crate::node::{FocusNode, FocusableDescriptor};
use crate::types::FocusKey;

/// Ancestor chains are short; keep typical ones inline.
pub(crate) type KeyChain = SmallVec<[FocusKey; 8]>;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    nodes: HashMap<FocusKey, FocusNode>,
    next_seq: u64,
}

impl Registry {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        FocusKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains_key(key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&FocusNode>
    where
        FocusKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get(key)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut FocusNode>
    where
        FocusKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get_mut(key)
    }

    /// Present and focusable. The one predicate used by descent, ranking and dispatch.
    pub(crate) fn is_navigable<Q>(&self, key: &Q) -> bool
    where
        FocusKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get(key).is_some_and(FocusNode::is_focusable)
    }

    pub(crate) fn insert(&mut self, descriptor: FocusableDescriptor) -> Result<(), StructuralError> {
        if self.nodes.contains_key(&descriptor.key) {
            return Err(StructuralError::DuplicateKey(descriptor.key));
        }
        if descriptor.parent.as_ref() == Some(&descriptor.key) {
            return Err(StructuralError::SelfParent(descriptor.key));
        }

        // Parents may register after their children, so the new key can already be
        // somewhere above its parent.
        let mut child = &descriptor.key;
        let mut cursor = descriptor.parent.as_ref();
        let mut steps = 0;
        while let Some(parent) = cursor {
            if *parent == descriptor.key {
                return Err(StructuralError::Cycle {
                    key: descriptor.key.clone(),
                    via: child.clone(),
                });
            }
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            child = parent;
            cursor = self.nodes.get(parent).and_then(|n| n.parent.as_ref());
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let node = descriptor.into_node(seq);
        self.nodes.insert(node.key.clone(), node);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<FocusNode> {
        self.nodes.remove(key)
    }

    /// Nodes whose parent is `parent` (`None` for top-level nodes), in registration order.
    pub(crate) fn children_of(&self, parent: Option<&FocusKey>) -> Vec<&FocusNode> {
        let mut children: Vec<&FocusNode> = self
            .nodes
            .values()
            .filter(|n| n.parent.as_ref() == parent)
            .collect();
        children.sort_by_key(|n| n.seq);
        children
    }

    /// Focusable children of `parent`, in registration order.
    pub(crate) fn focusable_children_of(&self, parent: &FocusKey) -> Vec<&FocusNode> {
        let mut children = self.children_of(Some(parent));
        children.retain(|n| n.is_focusable());
        children
    }

    /// Registered ancestors of `key`, nearest first.
    ///
    /// Stops at the first parent that isn't registered.
    pub(crate) fn ancestors_of<Q>(&self, key: &Q) -> KeyChain
    where
        FocusKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut chain = KeyChain::new();
        let mut cursor = self.nodes.get(key).and_then(|n| n.parent.as_ref());
        while let Some(parent) = cursor {
            let Some(node) = self.nodes.get(parent) else {
                break;
            };
            // Registration rejects cycles; bound the walk regardless.
            if chain.len() >= self.nodes.len() {
                tracing::warn!("ancestor walk exceeded registry size");
                break;
            }
            chain.push(node.key.clone());
            cursor = node.parent.as_ref();
        }
        chain
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut FocusNode> + '_ {
        self.nodes.values_mut()
    }
}

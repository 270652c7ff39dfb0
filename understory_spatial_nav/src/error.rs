// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for registry changes and descent.

use thiserror::Error;

use crate::types::FocusKey;

/// The node graph would stop being a forest, or already isn't.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StructuralError {
    /// A node with this key is already registered.
    #[error("focus key already registered: {0}")]
    DuplicateKey(FocusKey),

    /// A node names itself as its parent.
    #[error("focus key is its own parent: {0}")]
    SelfParent(FocusKey),

    /// Following parents or remembered children from `key` leads back to `key`.
    #[error("cycle through focus key {key} (via {via})")]
    Cycle {
        /// Key that was reached twice.
        key: FocusKey,
        /// Key the walk was at when the repeat was detected.
        via: FocusKey,
    },
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use understory_spatial::DirectionalPolicy;

/// Options passed to [`NavigationEngine::init`](crate::NavigationEngine::init).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Emit per-candidate scores at `trace` level.
    pub debug: bool,
    /// Keep a [`NavigationTrace`](crate::NavigationTrace) of the last ranking step.
    pub visual_debug: bool,
    /// Let the platform's own focus engine drive focus.
    ///
    /// Descent becomes the identity, directional navigation and layout updates do
    /// nothing, and registration or removal never moves focus.
    pub native_mode: bool,
    /// Minimum milliseconds between dispatched key-downs. Zero disables throttling.
    pub throttle_ms: u64,
    /// Only throttle repeats of a held key instead of every key-down.
    pub throttle_repeats: bool,
    /// Ranking weights.
    pub policy: DirectionalPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            visual_debug: false,
            native_mode: false,
            throttle_ms: 0,
            throttle_repeats: false,
            policy: DirectionalPolicy::default(),
        }
    }
}

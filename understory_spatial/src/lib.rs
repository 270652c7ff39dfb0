// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Spatial: directional focus geometry for remote-control style navigation.
//!
//! This crate answers one question: given a focused rectangle and a direction, which
//! sibling rectangle should receive focus next? It models that as:
//! - **Directions** ([`Direction`]) for the four arrow keys of a remote or D-pad.
//! - **Reference corners** ([`ref_corners`]) on the edge of each rectangle facing the
//!   direction of travel: the leading edge for the origin, the trailing edge for a
//!   candidate ([`Role`]).
//! - **Slices** ([`Slice`]): a candidate whose cross-axis extent overlaps enough of the
//!   origin's is "in lane" (adjacent); anything else is diagonal.
//! - A **spatial view of candidates** ([`FocusEntry`] / [`FocusSpace`]) in one shared
//!   coordinate space.
//! - Pluggable **policies** ([`FocusPolicy`]); [`DirectionalPolicy`] implements the
//!   weighted corner-distance ranking.
//!
//! ## Ranking
//!
//! For each candidate, [`DirectionalPolicy`] measures the primary-axis gap between the
//! two reference edges and the closest corner-to-corner gap on the cross axis. The
//! score is `(primary * 5 + secondary + 1) / weight`, where the two distances trade
//! places for diagonal candidates and `weight` is 5 for adjacent slices and 1 for
//! diagonal ones. Lower wins; equal scores keep entry order.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_spatial::{
//!     Direction, DirectionalPolicy, FocusEntry, FocusPolicy, FocusSpace,
//! };
//!
//! let entries = vec![
//!     FocusEntry { id: 1_u32, rect: Rect::new(0.0, 0.0, 10.0, 10.0), enabled: true },
//!     // Same row, a little further away.
//!     FocusEntry { id: 2_u32, rect: Rect::new(20.0, 0.0, 30.0, 10.0), enabled: true },
//!     // Closer along x, but well below the origin's lane.
//!     FocusEntry { id: 3_u32, rect: Rect::new(12.0, 30.0, 22.0, 40.0), enabled: true },
//! ];
//!
//! let space = FocusSpace { nodes: &entries };
//! let policy = DirectionalPolicy::default();
//!
//! assert_eq!(policy.next(1, Direction::Right, &space), Some(2));
//! assert_eq!(policy.next(1, Direction::Left, &space), None);
//! ```
//!
//! The core types are generic over the node identifier `K`, so callers can use any small,
//! copyable handle (for example a borrowed key from their own registry).
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::{Point, Rect};

/// Fraction of the origin's cross-axis extent a candidate must overlap to count as
/// an adjacent slice.
pub const ADJACENT_SLICE_THRESHOLD: f64 = 0.2;

/// Weight applied to the primary distance when combining the two axis distances.
pub const MAIN_AXIS_WEIGHT: f64 = 5.0;

/// Divisor applied to adjacent-slice scores.
pub const ADJACENT_SLICE_WEIGHT: f64 = 5.0;

/// Divisor applied to diagonal-slice scores.
pub const DIAGONAL_SLICE_WEIGHT: f64 = 1.0;

/// Direction of spatial navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// Towards smaller `y`.
    Up,
    /// Towards larger `y`.
    Down,
    /// Towards smaller `x`.
    Left,
    /// Towards larger `x`.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Whether travel happens along the `y` axis.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Whether travel moves towards larger coordinates.
    pub const fn is_incremental(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }

    /// Lower-case name, as used in key maps and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a comparison a rectangle is on.
///
/// The origin is measured at its leading edge (the edge facing the direction of
/// travel); candidates are measured at their trailing edge (the edge facing back
/// towards the origin).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The currently focused rectangle.
    Origin,
    /// A rectangle being considered as the next focus target.
    Candidate,
}

/// The two corners of the edge used for directional measurements.
///
/// For vertical travel both corners share a `y` and `a` is the left corner; for
/// horizontal travel both corners share an `x` and `a` is the top corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RefCorners {
    /// First corner (left or top).
    pub a: Point,
    /// Second corner (right or bottom).
    pub b: Point,
}

impl RefCorners {
    /// Coordinate of the edge along the travel axis.
    pub fn primary(&self, direction: Direction) -> f64 {
        if direction.is_vertical() {
            self.a.y
        } else {
            self.a.x
        }
    }

    /// The edge's extent on the cross axis, as `(start, end)`.
    pub fn cross_span(&self, direction: Direction) -> (f64, f64) {
        if direction.is_vertical() {
            (self.a.x, self.b.x)
        } else {
            (self.a.y, self.b.y)
        }
    }
}

/// Compute the reference corners of `rect` for travel in `direction`.
pub fn ref_corners(direction: Direction, role: Role, rect: Rect) -> RefCorners {
    let candidate = role == Role::Candidate;
    match direction {
        Direction::Up => {
            let y = if candidate { rect.y1 } else { rect.y0 };
            RefCorners {
                a: Point::new(rect.x0, y),
                b: Point::new(rect.x1, y),
            }
        }
        Direction::Down => {
            let y = if candidate { rect.y0 } else { rect.y1 };
            RefCorners {
                a: Point::new(rect.x0, y),
                b: Point::new(rect.x1, y),
            }
        }
        Direction::Left => {
            let x = if candidate { rect.x1 } else { rect.x0 };
            RefCorners {
                a: Point::new(x, rect.y0),
                b: Point::new(x, rect.y1),
            }
        }
        Direction::Right => {
            let x = if candidate { rect.x0 } else { rect.x1 };
            RefCorners {
                a: Point::new(x, rect.y0),
                b: Point::new(x, rect.y1),
            }
        }
    }
}

/// Coordinate of the edge used to decide whether a rectangle lies ahead of the origin.
///
/// This is the origin's leading edge or a candidate's trailing edge along the travel axis.
pub fn cutoff_coordinate(direction: Direction, role: Role, rect: Rect) -> f64 {
    ref_corners(direction, role, rect).primary(direction)
}

/// Whether `candidate` is not behind `origin` for travel in `direction`.
///
/// A candidate qualifies when its trailing edge lies at or beyond the origin's leading
/// edge, so touching neighbours are included and overlapping ones are not.
pub fn is_ahead(direction: Direction, origin: Rect, candidate: Rect) -> bool {
    let origin_cutoff = cutoff_coordinate(direction, Role::Origin, origin);
    let candidate_cutoff = cutoff_coordinate(direction, Role::Candidate, candidate);
    if direction.is_incremental() {
        candidate_cutoff >= origin_cutoff
    } else {
        candidate_cutoff <= origin_cutoff
    }
}

/// Whether a candidate is "in lane" with the origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slice {
    /// The cross-axis projections overlap by at least the threshold fraction.
    Adjacent,
    /// Anything else.
    Diagonal,
}

/// Classify a candidate's slice relative to the origin.
///
/// `threshold` is the fraction of the origin's cross-axis extent that must be overlapped
/// ([`ADJACENT_SLICE_THRESHOLD`] by default).
pub fn slice_of(
    direction: Direction,
    origin: &RefCorners,
    candidate: &RefCorners,
    threshold: f64,
) -> Slice {
    let (origin_a, origin_b) = origin.cross_span(direction);
    let (candidate_a, candidate_b) = candidate.cross_span(direction);
    let required = (origin_b - origin_a) * threshold;
    let overlap = (origin_b.min(candidate_b) - origin_a.max(candidate_a)).max(0.0);
    if overlap >= required {
        Slice::Adjacent
    } else {
        Slice::Diagonal
    }
}

/// Absolute gap between the two reference edges along the travel axis.
pub fn primary_axis_distance(
    direction: Direction,
    origin: &RefCorners,
    candidate: &RefCorners,
) -> f64 {
    (candidate.primary(direction) - origin.primary(direction)).abs()
}

/// Closest corner-to-corner gap on the cross axis.
pub fn secondary_axis_distance(
    direction: Direction,
    origin: &RefCorners,
    candidate: &RefCorners,
) -> f64 {
    let (origin_a, origin_b) = origin.cross_span(direction);
    let (candidate_a, candidate_b) = candidate.cross_span(direction);
    (candidate_a - origin_a)
        .abs()
        .min((candidate_a - origin_b).abs())
        .min((candidate_b - origin_a).abs())
        .min((candidate_b - origin_b).abs())
}

/// A candidate's score and the measurements that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Priority {
    /// Lane classification.
    pub slice: Slice,
    /// Distance weighted by the main-axis weight (after the diagonal swap).
    pub primary: f64,
    /// The other distance (after the diagonal swap).
    pub secondary: f64,
    /// Final score; lower is better.
    pub score: f64,
}

/// A single focusable candidate within a [`FocusSpace`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this candidate.
    pub id: K,
    /// Bounds in the coordinate space shared by every entry of the surrounding space.
    pub rect: Rect,
    /// Whether this candidate can take focus.
    ///
    /// Disabled entries are never selected, but they may still act as the origin.
    pub enabled: bool,
}

/// A read-only view of focus candidates.
///
/// Entry order is significant: when two candidates score the same, the earlier one wins.
#[derive(Clone, Debug)]
pub struct FocusSpace<'a, K> {
    /// Candidates visible to the current policy, usually the siblings of the origin.
    pub nodes: &'a [FocusEntry<K>],
}

/// Trait for directional focus policies.
pub trait FocusPolicy<K>
where
    K: Copy + Eq,
{
    /// Compute the next focus target given an origin, a direction, and a focus space.
    ///
    /// Returns `None` when the origin is not part of `space` or nothing lies ahead.
    fn next(&self, origin: K, direction: Direction, space: &FocusSpace<'_, K>) -> Option<K>;
}

/// One ranked candidate, as reported by [`DirectionalPolicy::rank`].
#[derive(Clone, Debug)]
pub struct Ranked<K> {
    /// The candidate.
    pub id: K,
    /// The candidate's reference corners.
    pub corners: RefCorners,
    /// The candidate's score.
    pub priority: Priority,
}

/// Weighted corner-distance policy tuned for remote-control navigation.
///
/// Staying in lane matters far more than raw distance: adjacent-slice candidates are
/// divided by [`adjacent_weight`](Self::adjacent_weight) and diagonal ones are judged
/// first by how far they sit off the origin's lane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalPolicy {
    /// Fraction of the origin's cross-axis extent that must overlap for an adjacent slice.
    pub adjacent_threshold: f64,
    /// Multiplier for the primary distance.
    pub main_axis_weight: f64,
    /// Divisor for adjacent-slice scores.
    pub adjacent_weight: f64,
    /// Divisor for diagonal-slice scores.
    pub diagonal_weight: f64,
}

impl Default for DirectionalPolicy {
    fn default() -> Self {
        Self {
            adjacent_threshold: ADJACENT_SLICE_THRESHOLD,
            main_axis_weight: MAIN_AXIS_WEIGHT,
            adjacent_weight: ADJACENT_SLICE_WEIGHT,
            diagonal_weight: DIAGONAL_SLICE_WEIGHT,
        }
    }
}

impl DirectionalPolicy {
    /// Score `candidate` against already computed origin corners.
    pub fn priority(
        &self,
        direction: Direction,
        origin: &RefCorners,
        candidate: &RefCorners,
    ) -> Priority {
        let slice = slice_of(direction, origin, candidate, self.adjacent_threshold);
        let along = primary_axis_distance(direction, origin, candidate);
        let across = secondary_axis_distance(direction, origin, candidate);
        // Diagonal candidates are judged first by how far off-lane they are.
        let (primary, secondary, weight) = match slice {
            Slice::Adjacent => (along, across, self.adjacent_weight),
            Slice::Diagonal => (across, along, self.diagonal_weight),
        };
        let score = (primary * self.main_axis_weight + secondary + 1.0) / weight;
        Priority {
            slice,
            primary,
            secondary,
            score,
        }
    }

    /// Score every eligible candidate for travel from `origin` and return them best first.
    ///
    /// Eligible candidates are enabled, are not the origin, and lie ahead of it (see
    /// [`is_ahead`]). Equal scores keep entry order.
    pub fn rank<K>(&self, origin: K, direction: Direction, space: &FocusSpace<'_, K>) -> Vec<Ranked<K>>
    where
        K: Copy + Eq,
    {
        let Some(origin_entry) = space.nodes.iter().find(|e| e.id == origin) else {
            return Vec::new();
        };
        let origin_corners = ref_corners(direction, Role::Origin, origin_entry.rect);

        let mut ranked: Vec<Ranked<K>> = space
            .nodes
            .iter()
            .filter(|e| e.enabled && e.id != origin && is_ahead(direction, origin_entry.rect, e.rect))
            .map(|e| {
                let corners = ref_corners(direction, Role::Candidate, e.rect);
                Ranked {
                    id: e.id,
                    corners,
                    priority: self.priority(direction, &origin_corners, &corners),
                }
            })
            .filter(|r| r.priority.score.is_finite())
            .collect();

        // `sort_by` is stable, so ties keep entry order.
        ranked.sort_by(|a, b| {
            a.priority
                .score
                .partial_cmp(&b.priority.score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}

impl<K> FocusPolicy<K> for DirectionalPolicy
where
    K: Copy + Eq,
{
    fn next(&self, origin: K, direction: Direction, space: &FocusSpace<'_, K>) -> Option<K> {
        let origin_entry = space.nodes.iter().find(|e| e.id == origin)?;
        let origin_corners = ref_corners(direction, Role::Origin, origin_entry.rect);

        let mut best: Option<K> = None;
        let mut best_score = f64::INFINITY;
        for candidate in space.nodes {
            if !candidate.enabled
                || candidate.id == origin
                || !is_ahead(direction, origin_entry.rect, candidate.rect)
            {
                continue;
            }
            let corners = ref_corners(direction, Role::Candidate, candidate.rect);
            let score = self.priority(direction, &origin_corners, &corners).score;
            // Strictly lower so the first of several equal scores wins.
            if score < best_score {
                best_score = score;
                best = Some(candidate.id);
            }
        }
        best
    }
}

/// Pick the enabled entry nearest to the origin of the coordinate space.
///
/// Distance is `|left| + |top|`. Equal distances keep entry order.
pub fn closest_to_origin<K>(space: &FocusSpace<'_, K>) -> Option<K>
where
    K: Copy,
{
    let mut best: Option<K> = None;
    let mut best_distance = f64::INFINITY;
    for entry in space.nodes.iter().filter(|e| e.enabled) {
        let distance = entry.rect.x0.abs() + entry.rect.y0.abs();
        if distance < best_distance {
            best_distance = distance;
            best = Some(entry.id);
        }
    }
    best
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core routing types: phases, outcomes, dispatch entries, and parent lookup.

use smallvec::SmallVec;

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Ancestors, root first, excluding the target.
    Capture,
    /// The target itself, exactly once.
    #[default]
    Target,
    /// Ancestors again, nearest first, excluding the target. Only for bubbling events.
    Bubble,
}

/// Result of a handler invocation.
///
/// Only controls propagation. "Default prevented" lives on the event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Stop immediately; no later listeners or phases run.
    Stop,
}

/// One step of a responder sequence: which node, in which phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose listeners run in this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase entry.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target-phase entry.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase entry.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Root→target chain of nodes an event travels through.
pub type EventPath<K> = SmallVec<[K; 8]>;

/// Capture → target → bubble sequence for one event.
pub type DispatchSeq<K> = SmallVec<[Dispatch<K>; 16]>;

/// Parent relation used to reconstruct a root→target path.
pub trait ParentLookup<K> {
    /// Parent of `node` as seen by event routing, or `None` at the root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A parent lookup that treats every node as a root.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs root→target paths and emits dispatch steps.
//! Produces a capture → target → bubble sequence for a target that has already
//! been selected (by hit testing, focus, or an active drag).
//!
//! ## Rules
//!
//! - Capture walks the path forward, excluding the target.
//! - Target fires exactly once, on the last element of the path.
//! - Bubble walks the path backward, excluding the target, and is emitted only for
//!   bubbling events.
//! - An empty path emits nothing.

use crate::types::{Dispatch, DispatchSeq, EventPath, NoParent, ParentLookup};

/// Deterministic responder chain router.
///
/// Construct with a [`ParentLookup`] that defines which ancestors take part in
/// routing. With [`NoParent`] every target is routed on its own.
pub struct Router<K, P: ParentLookup<K> = NoParent> {
    parent: P,
    _phantom: core::marker::PhantomData<fn() -> K>,
}

impl<K, P: ParentLookup<K>> core::fmt::Debug for Router<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl<K: Copy, P: ParentLookup<K>> Router<K, P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self {
            parent,
            _phantom: core::marker::PhantomData,
        }
    }

    /// Root→target path of `target` according to the parent lookup.
    pub fn path_for(&self, target: K) -> EventPath<K> {
        let mut out = EventPath::new();
        let mut cur = target;
        // Collect to root; caller ensures acyclic ancestry.
        loop {
            out.push(cur);
            match self.parent.parent_of(&cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Emit a dispatch sequence for `target` by reconstructing its path.
    pub fn dispatch_for(&self, target: K, bubbles: bool) -> DispatchSeq<K> {
        emit_path(&self.path_for(target), bubbles)
    }
}

impl<K: Copy> Router<K, NoParent> {
    /// Create a router that treats every target as a root.
    pub fn new() -> Self {
        Self::with_parent(NoParent)
    }
}

impl<K: Copy> Default for Router<K, NoParent> {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit the capture → target → bubble sequence for a root→target `path`.
pub fn emit_path<K: Copy>(path: &[K], bubbles: bool) -> DispatchSeq<K> {
    let mut out = DispatchSeq::new();
    // Split into ancestors and target. If path is empty, nothing to emit.
    let Some((target, ancestors)) = path.split_last() else {
        return out;
    };

    // Capture: root→(excluding target)
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));

    // Target: only the target element
    out.push(Dispatch::target(*target));

    // Bubble: parent→root (excluding target)
    if bubbles {
        out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::types::{Outcome, Phase};
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                4 => Some(Node(3)),
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    fn phases(seq: &[Dispatch<Node>]) -> Vec<(Phase, u32)> {
        seq.iter().map(|d| (d.phase, d.node.0)).collect()
    }

    #[test]
    fn path_is_root_to_target() {
        let router = Router::with_parent(Parents);
        assert_eq!(
            router.path_for(Node(4)).as_slice(),
            &[Node(1), Node(2), Node(3), Node(4)]
        );
    }

    #[test]
    fn bubbling_sequence_visits_ancestors_twice_target_once() {
        let router = Router::with_parent(Parents);
        let seq = router.dispatch_for(Node(4), true);
        assert_eq!(
            phases(&seq),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Capture, 3),
                (Phase::Target, 4),
                (Phase::Bubble, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn non_bubbling_sequence_skips_bubble_phase() {
        let router = Router::with_parent(Parents);
        let seq = router.dispatch_for(Node(3), false);
        assert_eq!(
            phases(&seq),
            vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]
        );
    }

    #[test]
    fn dispatch_for_singleton_without_parent() {
        let router: Router<Node> = Router::new();
        let seq = router.dispatch_for(Node(42), true);
        assert_eq!(phases(&seq), vec![(Phase::Target, 42)]);
    }

    #[test]
    fn empty_path_emits_nothing() {
        assert!(emit_path::<Node>(&[], true).is_empty());
    }

    #[test]
    fn target_element_receives_event_only_once() {
        let router = Router::with_parent(Parents);
        let seq = router.dispatch_for(Node(2), true);
        let mut targets = 0;
        let stopped = dispatcher::run(&seq, &mut (), |d, _| {
            if d.node == Node(2) {
                targets += 1;
            }
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(targets, 1, "target must fire exactly once");
    }

    #[test]
    fn router_dispatch_and_dispatcher_stop_skips_bubble() {
        let router = Router::with_parent(Parents);
        let seq = router.dispatch_for(Node(3), true);
        let mut seen = Vec::new();
        let stopped = dispatcher::run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node.0));
            if d.phase == Phase::Target {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped.map(|d| d.node), Some(Node(3)));
        assert_eq!(
            seen,
            vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]
        );
    }
}

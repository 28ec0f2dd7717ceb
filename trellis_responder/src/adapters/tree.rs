// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Trellis Tree.
//!
//! ## Feature
//!
//! Enable with `tree_adapter`.
//!
//! ## Notes
//!
//! Event paths contain only interactive nodes. [`InteractiveParents`] skips
//! non-interactive ancestors, so a router built on it yields the chain of
//! interactive ancestors from the root down to the target. The target itself is
//! always part of the path, interactive or not.
//!
//! Event boundaries only affect hit testing. Paths always reach the root, so an
//! event that starts inside a scroll viewport bubbles to ancestors outside it.

use kurbo::Point;
use trellis_tree::{NodeId, QueryFilter, Tree};

use crate::router::Router;
use crate::types::{EventPath, ParentLookup};

/// Parent lookup over a [`Tree`] that returns the nearest interactive ancestor.
#[derive(Clone, Copy, Debug)]
pub struct InteractiveParents<'a>(pub &'a Tree);

impl ParentLookup<NodeId> for InteractiveParents<'_> {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        let tree = self.0;
        let parent = tree.parent_of(*node)?;
        tree.find_ancestor(parent, |t, n| t.is_interactive(n))
    }
}

/// A router whose paths are interactive ancestor chains in `tree`.
pub fn router(tree: &Tree) -> Router<NodeId, InteractiveParents<'_>> {
    Router::with_parent(InteractiveParents(tree))
}

/// Interactive root→target path of `target`.
pub fn event_path(tree: &Tree, target: NodeId) -> EventPath<NodeId> {
    router(tree).path_for(target)
}

/// Topmost interactive node under `pt` in the subtree of `root`.
pub fn interactive_at(tree: &Tree, root: NodeId, pt: Point) -> Option<NodeId> {
    tree.hit_test(root, pt, QueryFilter::new().interactive())
        .map(|hit| hit.node)
}

/// Topmost scrollable viewport under `pt` in the subtree of `root`.
pub fn scrollable_at(tree: &Tree, root: NodeId, pt: Point) -> Option<NodeId> {
    tree.hit_test(root, pt, QueryFilter::new().scrollable())
        .map(|hit| hit.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec::Vec;
    use kurbo::Size;
    use trellis_tree::{NodeDesc, Position};

    #[test]
    fn path_skips_non_interactive_ancestors() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            NodeDesc::new(Position::absolute(0.0, 0.0), Size::new(100.0, 100.0)).interactive(),
        );
        let layout = tree.insert(
            Some(root),
            NodeDesc::new(Position::relative(0.0, 0.0), Size::new(100.0, 100.0)),
        );
        let panel = tree.insert(
            Some(layout),
            NodeDesc::new(Position::relative(0.0, 0.0), Size::new(50.0, 50.0)).interactive(),
        );
        let button = tree.insert(
            Some(panel),
            NodeDesc::new(Position::relative(5.0, 5.0), Size::new(10.0, 10.0)).interactive(),
        );

        assert_eq!(event_path(&tree, button).as_slice(), &[root, panel, button]);
        assert_eq!(
            interactive_at(&tree, root, Point::new(7.0, 7.0)),
            Some(button)
        );

        let seq = router(&tree).dispatch_for(button, true);
        let phases: Vec<_> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            phases,
            [
                (Phase::Capture, root),
                (Phase::Capture, panel),
                (Phase::Target, button),
                (Phase::Bubble, panel),
                (Phase::Bubble, root),
            ]
        );
    }

    #[test]
    fn non_interactive_target_is_still_included() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            NodeDesc::new(Position::absolute(0.0, 0.0), Size::new(100.0, 100.0)).interactive(),
        );
        let label = tree.insert(
            Some(root),
            NodeDesc::new(Position::relative(0.0, 0.0), Size::new(10.0, 10.0)),
        );
        assert_eq!(event_path(&tree, label).as_slice(), &[root, label]);
    }
}

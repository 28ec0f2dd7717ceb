// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw traversal.
//!
//! Trellis does not render anything itself. [`Ui::draw`](crate::Ui::draw) walks
//! the visible tree in paint order and hands each node's absolute geometry to a
//! [`Surface`], which owns the actual drawing.

use kurbo::Rect;
use trellis_tree::{NodeDesc, NodeId, Tree};

/// Receiver of the draw traversal.
///
/// Calls arrive in paint order: a node, then its children (back to front), then
/// the node's scroll bar if it has one. Clip pushes and pops are balanced.
pub trait Surface {
    /// Restrict drawing to `rect` (already intersected with the enclosing clip).
    fn push_clip(&mut self, rect: Rect);
    /// Undo the matching [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);
    /// Draw `node` at absolute `bounds`.
    fn draw_node(&mut self, node: NodeId, bounds: Rect, desc: &NodeDesc);
    /// Draw the scroll bar of viewport `node`.
    fn draw_scroll_bar(&mut self, node: NodeId, track: Rect, thumb: Rect) {
        let _ = (node, track, thumb);
    }
}

pub(crate) fn draw_tree(tree: &Tree, root: NodeId, surface: &mut impl Surface) {
    if tree.is_alive(root) {
        draw_node(tree, root, None, surface);
    }
}

fn draw_node(tree: &Tree, id: NodeId, clip: Option<Rect>, surface: &mut impl Surface) {
    let (Some(desc), Some(bounds)) = (tree.desc(id), tree.bounds(id)) else {
        return;
    };
    if desc.flags.contains(trellis_tree::NodeFlags::HIDDEN) {
        return;
    }
    surface.draw_node(id, bounds, desc);

    let children = tree.paint_order(id);
    if !children.is_empty() {
        let inner = tree
            .boundary(id)
            .map(|b| clip.map_or(b, |c| c.intersect(b)));
        if let Some(rect) = inner {
            surface.push_clip(rect);
        }
        for child in children {
            draw_node(tree, child, inner.or(clip), surface);
        }
        if inner.is_some() {
            surface.pop_clip();
        }
    }

    if tree.needs_scroll_bar(id) {
        let (Some(track), Some(thumb)) = (tree.scroll_track_rect(id), tree.scroll_thumb_rect(id))
        else {
            return;
        };
        assert!(
            track.height() > 0.0,
            "scroll bar of {id:?} drawn for a viewport with non-positive height"
        );
        surface.draw_scroll_bar(id, track, thumb);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, geometry, hit testing.

use alloc::vec::Vec;
use kurbo::{Insets, Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::scroll::{ScrollMetrics, ScrollState};
use crate::types::{ChildOrder, NodeDesc, NodeFlags, NodeId, Position};
use crate::util::{contains_inclusive, deflate};
use crate::window::WindowState;

/// Root→node chain of identifiers. Most UI trees are shallow.
pub type NodePath = SmallVec<[NodeId; 8]>;

/// Arena of UI nodes.
///
/// The tree owns structure (one parent per node, ordered children) and the
/// per-node description. It never caches resolved geometry: absolute positions
/// are recomputed from the parent chain on every query, so moving a node is
/// immediately visible to hit testing.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use trellis_tree::{NodeDesc, Position, QueryFilter, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, NodeDesc::new(Position::absolute(0.0, 0.0), Size::new(200.0, 200.0)));
/// let button = tree.insert(
///     Some(root),
///     NodeDesc::new(Position::relative(10.0, 10.0), Size::new(50.0, 20.0)).interactive(),
/// );
///
/// let hit = tree.hit_test(root, Point::new(20.0, 15.0), QueryFilter::new().interactive()).unwrap();
/// assert_eq!(hit.node, button);
/// assert_eq!(hit.path.as_slice(), &[root, button]);
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: NodePath,
}

/// Filters applied during hit testing.
///
/// A node matches when it carries all required flags and every required
/// capability. Disabled and hidden subtrees never match regardless of filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// Bitfield of required node flags.
    pub required_flags: NodeFlags,
    /// Require the node to be a scrollable viewport.
    pub scrollable: bool,
    /// Require the node to be a window.
    pub window: bool,
}

impl QueryFilter {
    /// Create a new empty filter (includes all nodes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only interactive nodes.
    pub fn interactive(mut self) -> Self {
        self.required_flags |= NodeFlags::INTERACTIVE;
        self
    }

    /// Filter to only focusable nodes.
    pub fn focusable(mut self) -> Self {
        self.required_flags |= NodeFlags::FOCUSABLE;
        self
    }

    /// Filter to only scrollable viewports.
    pub fn scrollable(mut self) -> Self {
        self.scrollable = true;
        self
    }

    /// Filter to only windows.
    pub fn window(mut self) -> Self {
        self.window = true;
        self
    }

    fn matches(&self, node: &Node) -> bool {
        node.desc.flags.contains(self.required_flags)
            && (!self.scrollable || node.desc.scroll.is_some())
            && (!self.window || node.desc.window.is_some())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    desc: NodeDesc,
}

impl Node {
    fn new(generation: u32, desc: NodeDesc) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            desc,
        }
    }

    fn is_excluded(&self) -> bool {
        self.desc
            .flags
            .intersects(NodeFlags::DISABLED | NodeFlags::HIDDEN)
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// # Panics
    ///
    /// Panics if the identifier space is exhausted (more than `u32::MAX` slots,
    /// or a slot reused `u32::MAX` times).
    pub fn insert(&mut self, parent: Option<NodeId>, desc: NodeDesc) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx]
                .checked_add(1)
                .expect("node generation counter overflowed");
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, desc));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, desc)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        let idx = u32::try_from(idx).expect("node slot counter overflowed");
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
            self.reclamp_scroll(p);
        }
        id
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// Handles to removed nodes become stale; every query on them returns `None`.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let parent = self.node(id).parent;
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
        if let Some(parent) = parent {
            self.reclamp_scroll(parent);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Append `child` to `parent`'s children, detaching it from any previous parent.
    ///
    /// Returns `false` if either handle is stale or if the move would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
            self.reclamp_scroll(old);
        }
        self.link_parent(child, parent);
        self.reclamp_scroll(parent);
        true
    }

    /// Detach `child` from `parent`, preserving the order of the remaining children.
    ///
    /// The detached node stays alive as a root. Returns `false` if `child` was not
    /// a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent) || self.parent_of(child) != Some(parent) {
            return false;
        }
        self.unlink_parent(child, parent);
        self.reclamp_scroll(parent);
        true
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node in insertion order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Children in paint order: bottom first, topmost last.
    ///
    /// For [`ChildOrder::ZIndex`] containers this is a stable sort by z-index;
    /// otherwise it is insertion order.
    pub fn paint_order(&self, id: NodeId) -> NodePath {
        let Some(node) = self.node_opt(id) else {
            return NodePath::new();
        };
        let mut out: NodePath = node.children.iter().copied().collect();
        if node.desc.child_order == ChildOrder::ZIndex {
            // `sort_by_key` is stable, so equal z keeps insertion order.
            out.sort_by_key(|c| self.node(*c).desc.position.z_index);
        }
        out
    }

    /// Path from the root of `id`'s tree down to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> NodePath {
        let mut path = NodePath::new();
        let mut current = Some(id).filter(|id| self.is_alive(*id));
        while let Some(node) = current {
            path.push(node);
            current = self.parent_of(node);
        }
        path.reverse();
        path
    }

    /// Walk from `id` up to the root and return the first node (self included)
    /// satisfying `pred`.
    pub fn find_ancestor(&self, id: NodeId, pred: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut current = Some(id).filter(|id| self.is_alive(*id));
        while let Some(node) = current {
            if pred(self, node) {
                return Some(node);
            }
            current = self.parent_of(node);
        }
        None
    }

    // --- description accessors ---

    /// Returns the description of a live node.
    pub fn desc(&self, id: NodeId) -> Option<&NodeDesc> {
        self.node_opt(id).map(|n| &n.desc)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.desc(id).map(|d| d.flags)
    }

    /// Returns the z-index of a node if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.desc(id).map(|d| d.position.z_index)
    }

    /// Returns the tab index of a node if the identifier is live.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.desc(id).map(|d| d.tab_index)
    }

    /// Whether the node carries [`NodeFlags::INTERACTIVE`].
    pub fn is_interactive(&self, id: NodeId) -> bool {
        self.has_flags(id, NodeFlags::INTERACTIVE)
    }

    /// Whether the node can currently take focus: focusable, and neither it nor
    /// any ancestor is disabled or hidden.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.has_flags(id, NodeFlags::FOCUSABLE) && self.is_enabled(id)
    }

    /// Whether neither the node nor any of its ancestors is disabled or hidden.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.is_alive(id)
            && self
                .find_ancestor(id, |t, n| t.node(n).is_excluded())
                .is_none()
    }

    /// Whether the node is a scrollable viewport.
    pub fn is_scrollable(&self, id: NodeId) -> bool {
        self.desc(id).is_some_and(|d| d.scroll.is_some())
    }

    /// Whether the node is a window.
    pub fn is_window(&self, id: NodeId) -> bool {
        self.desc(id).is_some_and(|d| d.window.is_some())
    }

    fn has_flags(&self, id: NodeId, flags: NodeFlags) -> bool {
        self.flags(id).is_some_and(|f| f.contains(flags))
    }

    // --- mutation ---

    /// Update the position.
    pub fn set_position(&mut self, id: NodeId, position: Position) {
        if let Some(n) = self.node_opt_mut(id)
            && n.desc.position != position
        {
            n.desc.position = position;
            if let Some(parent) = n.parent {
                self.reclamp_scroll(parent);
            }
        }
    }

    /// Update the z-index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.position.z_index = z;
        }
    }

    /// Update the size.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id)
            && n.desc.size != size
        {
            n.desc.size = size;
            let parent = n.parent;
            self.reclamp_scroll(id);
            if let Some(parent) = parent {
                self.reclamp_scroll(parent);
            }
        }
    }

    /// Update the padding.
    pub fn set_padding(&mut self, id: NodeId, padding: Insets) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.padding = padding;
            self.reclamp_scroll(id);
        }
    }

    /// Replace the node's flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.flags = flags;
            let parent = n.parent;
            self.reclamp_parent(parent);
        }
    }

    /// Set or clear [`NodeFlags::DISABLED`].
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.flags.set(NodeFlags::DISABLED, disabled);
        }
    }

    /// Set or clear [`NodeFlags::HIDDEN`].
    ///
    /// Hidden children do not count towards a viewport's content, so the parent's
    /// scroll offset is re-clamped.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.flags.set(NodeFlags::HIDDEN, hidden);
            let parent = n.parent;
            self.reclamp_parent(parent);
        }
    }

    /// Update the tab index.
    pub fn set_tab_index(&mut self, id: NodeId, tab_index: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.desc.tab_index = tab_index;
        }
    }

    // --- geometry ---

    /// Resolve the absolute position of a node.
    ///
    /// A relative node adds its parent's resolved position, minus the parent's
    /// scroll offset if the parent is a scrollable viewport. Nothing is cached.
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let node = self.node_opt(id)?;
        let mut pos = node.desc.position;
        let mut acc = Vec2::new(pos.x, pos.y);
        let mut parent = node.parent;
        while pos.relative {
            let Some(parent_id) = parent else { break };
            let p = self.node(parent_id);
            if let Some(scroll) = &p.desc.scroll {
                acc.y -= scroll.offset();
            }
            pos = p.desc.position;
            acc += Vec2::new(pos.x, pos.y);
            parent = p.parent;
        }
        Some(acc.to_point())
    }

    /// Absolute bounds of a node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        let origin = self.absolute_position(id)?;
        Some(Rect::from_origin_size(origin, self.node(id).desc.size))
    }

    /// Absolute bounds shrunk by the node's padding.
    pub fn content_rect(&self, id: NodeId) -> Option<Rect> {
        let bounds = self.bounds(id)?;
        Some(deflate(bounds, self.node(id).desc.padding))
    }

    /// Edge-inclusive containment test of an absolute point against the node's bounds.
    pub fn contains(&self, id: NodeId, pt: Point) -> bool {
        self.bounds(id).is_some_and(|b| contains_inclusive(b, pt))
    }

    /// The region outside of which hit testing must not descend into this node's
    /// children, if the node is an event boundary.
    ///
    /// Scrollable viewports permit their visible rect (content rect minus the
    /// scroll bar); [`NodeFlags::CLIP`] nodes permit their own bounds.
    pub fn boundary(&self, id: NodeId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        if node.desc.scroll.is_some() {
            return self.visible_rect(id);
        }
        if node.desc.flags.contains(NodeFlags::CLIP) {
            return self.bounds(id);
        }
        None
    }

    /// Whether `pt` lies inside the boundary region of every boundary ancestor of `id`.
    pub fn is_point_visible(&self, id: NodeId, pt: Point) -> bool {
        let mut current = self.parent_of(id);
        while let Some(ancestor) = current {
            if let Some(region) = self.boundary(ancestor)
                && !contains_inclusive(region, pt)
            {
                return false;
            }
            current = self.parent_of(ancestor);
        }
        true
    }

    // --- hit testing ---

    /// Find the topmost node under `pt` in the subtree rooted at `root` that satisfies `pred`.
    ///
    /// The search is depth-first, visiting children topmost first, so the first
    /// match is authoritative. For each node, in order:
    ///
    /// 1. Disabled or hidden nodes skip their whole subtree.
    /// 2. If the node is an event boundary and `pt` lies outside its region, its
    ///    children are skipped.
    /// 3. Children are searched, topmost first.
    /// 4. The node itself is tested against `pred` and its own bounds.
    pub fn find_topmost_at(
        &self,
        root: NodeId,
        pt: Point,
        pred: &dyn Fn(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        let node = self.node_opt(root)?;
        if node.is_excluded() {
            return None;
        }
        let descend = self
            .boundary(root)
            .is_none_or(|region| contains_inclusive(region, pt));
        if descend {
            for &child in self.paint_order(root).iter().rev() {
                if let Some(hit) = self.find_topmost_at(child, pt, pred) {
                    return Some(hit);
                }
            }
        }
        (pred(self, root) && self.contains(root, pt)).then_some(root)
    }

    /// Hit test an absolute point and, if any node matches `filter`, return the
    /// topmost node and its path from the tree root.
    pub fn hit_test(&self, root: NodeId, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let node = self.find_topmost_at(root, pt, &|tree: &Self, id: NodeId| {
            filter.matches(tree.node(id))
        })?;
        Some(Hit {
            node,
            path: self.path_to(node),
        })
    }

    // --- focus discovery ---

    /// Focusable nodes under `root` in discovery (pre-order, insertion) order,
    /// paired with their tab index. Disabled and hidden subtrees are skipped.
    pub fn focusable_nodes(&self, root: NodeId) -> Vec<(NodeId, i32)> {
        let mut out = Vec::new();
        let mut stack: NodePath = NodePath::new();
        if self.is_alive(root) {
            stack.push(root);
        }
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_excluded() {
                continue;
            }
            if node.desc.flags.contains(NodeFlags::FOCUSABLE) {
                out.push((id, node.desc.tab_index));
            }
            // Push in reverse so children are visited in insertion order.
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // --- scrolling ---

    /// Scroll state of a scrollable viewport.
    pub fn scroll_state(&self, id: NodeId) -> Option<&ScrollState> {
        self.desc(id)?.scroll.as_ref()
    }

    /// Measured height of a viewport's content.
    ///
    /// This is the lowest bottom edge among visible, parent-relative children
    /// plus the bottom padding. Absolutely positioned children do not scroll and
    /// do not count.
    pub fn content_height(&self, id: NodeId) -> Option<f64> {
        let node = self.node_opt(id)?;
        let bottom = node
            .children
            .iter()
            .map(|c| &self.node(*c).desc)
            .filter(|d| d.position.relative && !d.flags.contains(NodeFlags::HIDDEN))
            .map(|d| d.position.y + d.size.height)
            .fold(0.0_f64, f64::max);
        Some(bottom + node.desc.padding.y1)
    }

    /// Viewport and content extents of a scrollable.
    pub fn scroll_metrics(&self, id: NodeId) -> Option<ScrollMetrics> {
        self.scroll_state(id)?;
        Some(ScrollMetrics {
            viewport: self.node(id).desc.size.height,
            content: self.content_height(id)?,
        })
    }

    /// Whether the viewport currently shows a scroll bar.
    pub fn needs_scroll_bar(&self, id: NodeId) -> bool {
        match (self.scroll_state(id), self.scroll_metrics(id)) {
            (Some(s), Some(m)) => s.needs_scroll_bar(m),
            _ => false,
        }
    }

    /// Visible rect of a scrollable viewport: content rect minus the scroll bar.
    pub fn visible_rect(&self, id: NodeId) -> Option<Rect> {
        let scroll = self.scroll_state(id)?;
        let mut rect = self.content_rect(id)?;
        if self.needs_scroll_bar(id) {
            rect.x1 -= scroll.config().bar_width;
        }
        Some(rect)
    }

    /// Absolute rect of the scroll bar track, if the bar is shown.
    pub fn scroll_track_rect(&self, id: NodeId) -> Option<Rect> {
        if !self.needs_scroll_bar(id) {
            return None;
        }
        let bar = self.scroll_state(id)?.config().bar_width;
        let b = self.bounds(id)?;
        Some(Rect::new(b.x1 - bar, b.y0, b.x1, b.y1))
    }

    /// Absolute rect of the scroll bar thumb, if the bar is shown.
    pub fn scroll_thumb_rect(&self, id: NodeId) -> Option<Rect> {
        let track = self.scroll_track_rect(id)?;
        let state = self.scroll_state(id)?;
        let metrics = self.scroll_metrics(id)?;
        let min = state.config().min_thumb;
        let y0 = track.y0 + metrics.thumb_offset(state.offset(), min);
        Some(Rect::new(
            track.x0,
            y0,
            track.x1,
            y0 + metrics.thumb_height(min),
        ))
    }

    /// Whether `pt` is over the thumb of a shown scroll bar.
    pub fn is_over_thumb(&self, id: NodeId, pt: Point) -> bool {
        self.scroll_thumb_rect(id)
            .is_some_and(|r| contains_inclusive(r, pt))
    }

    /// Apply `f` to a scrollable's state with its current metrics.
    ///
    /// Returns `None` if `id` is stale or not scrollable.
    pub fn with_scroll<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ScrollState, ScrollMetrics) -> R,
    ) -> Option<R> {
        let metrics = self.scroll_metrics(id)?;
        let state = self.node_opt_mut(id)?.desc.scroll.as_mut()?;
        Some(f(state, metrics))
    }

    /// Set a scrollable's offset; returns the clamped offset.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: f64) -> Option<f64> {
        self.with_scroll(id, |s, m| s.set_offset(offset, m))
    }

    /// Scroll a scrollable by `delta`; returns the clamped offset.
    pub fn scroll_by(&mut self, id: NodeId, delta: f64) -> Option<f64> {
        self.with_scroll(id, |s, m| s.scroll_by(delta, m))
    }

    /// Scroll to the top.
    pub fn scroll_to_top(&mut self, id: NodeId) -> Option<f64> {
        self.set_scroll_offset(id, 0.0)
    }

    /// Scroll to the bottom.
    pub fn scroll_to_bottom(&mut self, id: NodeId) -> Option<f64> {
        self.with_scroll(id, |s, m| s.set_offset(m.max_offset(), m))
    }

    /// Hide or show a scrollable's bar.
    pub fn set_scroll_bar_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(state) = self
            .node_opt_mut(id)
            .and_then(|n| n.desc.scroll.as_mut())
        {
            state.set_bar_hidden(hidden);
        }
    }

    fn reclamp_scroll(&mut self, id: NodeId) {
        let _ = self.with_scroll(id, |s, m| s.reclamp(m));
    }

    fn reclamp_parent(&mut self, parent: Option<NodeId>) {
        if let Some(parent) = parent {
            self.reclamp_scroll(parent);
        }
    }

    // --- windows ---

    /// Window data of a window node.
    pub fn window_state(&self, id: NodeId) -> Option<&WindowState> {
        self.desc(id)?.window.as_ref()
    }

    /// Whether `pt` is over the header strip of a window.
    pub fn is_over_header(&self, id: NodeId, pt: Point) -> bool {
        match (self.window_state(id), self.bounds(id)) {
            (Some(w), Some(b)) => contains_inclusive(w.header_rect(b), pt),
            _ => false,
        }
    }

    /// Raise a node above its siblings: its z-index becomes the maximum z-index
    /// among all of its parent's children (itself included) plus one. A node that
    /// is already strictly above every sibling keeps its z-index. Returns the
    /// resulting z-index.
    pub fn raise_to_front(&mut self, id: NodeId) -> Option<i32> {
        let own = self.z_index(id)?;
        let parent = self.parent_of(id);
        let siblings = parent.map_or(&[][..], |p| self.children_of(p));
        let others = siblings
            .iter()
            .filter(|s| **s != id)
            .filter_map(|s| self.z_index(*s))
            .max();
        if others.is_some_and(|max| own > max) {
            return Some(own);
        }
        let z = others.unwrap_or(0).max(own).saturating_add(1);
        self.set_z_index(id, z);
        Some(z)
    }

    /// Move a window so that its absolute origin becomes `origin`, clamped so its
    /// header stays inside the parent container. Returns the stored position.
    pub fn move_window_to(&mut self, id: NodeId, origin: Point) -> Option<Position> {
        let window = *self.window_state(id)?;
        let node = self.node(id);
        let mut position = node.desc.position;
        let size = node.desc.size;
        let (container_origin, container_size) = match node.parent {
            Some(parent) => {
                let origin = self.absolute_position(parent)?
                    - Vec2::new(0.0, self.scroll_state(parent).map_or(0.0, ScrollState::offset));
                (origin, Some(self.node(parent).desc.size))
            }
            None => (Point::ZERO, None),
        };
        let mut local = origin - container_origin.to_vec2();
        if let Some(container) = container_size {
            local = window.clamp_origin(local, size, container);
        }
        let stored = if position.relative {
            local
        } else {
            local + container_origin.to_vec2()
        };
        position.x = stored.x;
        position.y = stored.y;
        self.set_position(id, position);
        Some(position)
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.find_ancestor(id, |_, n| n == ancestor).is_some()
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        // Identity-based, order-preserving removal.
        if let Some(pos) = p.children.iter().position(|c| *c == id) {
            p.children.remove(pos);
        }
        self.node_mut(id).parent = None;
    }
}

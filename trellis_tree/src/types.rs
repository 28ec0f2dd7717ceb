// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the node tree: identifiers, flags, positions, and node descriptions.

use kurbo::{Insets, Size};

use crate::scroll::ScrollState;
use crate::window::WindowState;

/// Identifier for a node in the tree (generational).
///
/// Slots are reused after removal, but every reuse bumps the slot's generation,
/// so a handle is never handed out twice over the lifetime of a [`Tree`](crate::Tree).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this handle.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of this handle's slot at the time it was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Structural capabilities and state flags of a node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node owns a handler registry and is a hit-test/dispatch candidate.
        const INTERACTIVE = 0b0000_0001;
        /// Node takes part in keyboard focus traversal.
        const FOCUSABLE   = 0b0000_0010;
        /// Node and its subtree ignore input and are skipped by focus discovery.
        const DISABLED    = 0b0000_0100;
        /// Node and its subtree are not drawn and not hit.
        const HIDDEN      = 0b0000_1000;
        /// Node's bounds act as an event boundary for its descendants.
        const CLIP        = 0b0001_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Position of a node.
///
/// When `relative` is set the coordinates are an offset from the parent's
/// resolved absolute position (minus the parent's scroll offset, if the parent
/// scrolls). Otherwise they are absolute surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
    /// Whether `x`/`y` are relative to the parent.
    pub relative: bool,
    /// Stacking order among siblings of a [`ChildOrder::ZIndex`] container.
    pub z_index: i32,
}

impl Position {
    /// Absolute surface coordinates.
    pub const fn absolute(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            relative: false,
            z_index: 0,
        }
    }

    /// Coordinates relative to the parent.
    pub const fn relative(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            relative: true,
            z_index: 0,
        }
    }

    /// Returns a copy with the given z-index.
    #[must_use]
    pub const fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// How a container orders its children for hit testing and drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChildOrder {
    /// Insertion order: the last-added child is topmost.
    #[default]
    Insertion,
    /// Stable ascending z-index order: the highest z-index is topmost, ties keep insertion order.
    ZIndex,
}

/// Description of a node: geometry, flags, and optional capability data.
#[derive(Clone, Debug, Default)]
pub struct NodeDesc {
    /// Position, relative flag, and z-index.
    pub position: Position,
    /// Size of the node's box.
    pub size: Size,
    /// Inner padding.
    pub padding: Insets,
    /// Capability and state flags.
    pub flags: NodeFlags,
    /// Tab index used when [`NodeFlags::FOCUSABLE`] is set. Lower comes first.
    pub tab_index: i32,
    /// Ordering policy for this node's children.
    pub child_order: ChildOrder,
    /// Present if the node is a scrollable viewport.
    pub scroll: Option<ScrollState>,
    /// Present if the node is a movable window.
    pub window: Option<WindowState>,
}

impl NodeDesc {
    /// A plain, non-interactive box at `position` with `size`.
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    /// Adds flags to this description.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Marks the node interactive.
    #[must_use]
    pub fn interactive(self) -> Self {
        self.with_flags(NodeFlags::INTERACTIVE)
    }

    /// Marks the node interactive and focusable with the given tab index.
    #[must_use]
    pub fn focusable(mut self, tab_index: i32) -> Self {
        self.tab_index = tab_index;
        self.with_flags(NodeFlags::INTERACTIVE | NodeFlags::FOCUSABLE)
    }

    /// Sets the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the child ordering policy.
    #[must_use]
    pub fn with_child_order(mut self, order: ChildOrder) -> Self {
        self.child_order = order;
        self
    }

    /// Makes the node a scrollable viewport. Scrollables are interactive.
    #[must_use]
    pub fn scrollable(mut self, scroll: ScrollState) -> Self {
        self.scroll = Some(scroll);
        self.with_flags(NodeFlags::INTERACTIVE)
    }

    /// Makes the node a window. Windows are interactive.
    #[must_use]
    pub fn window(mut self, window: WindowState) -> Self {
        self.window = Some(window);
        self.with_flags(NodeFlags::INTERACTIVE)
    }
}

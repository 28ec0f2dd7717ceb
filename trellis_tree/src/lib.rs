// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_tree --heading-base-level=0

//! Trellis Tree: a Kurbo-native node tree for immediate-feeling UIs.
//!
//! Trellis Tree owns the structure and geometry of a UI: an arena of nodes, each with a
//! position (absolute or relative to its parent), a size, padding, flags, and optional
//! capabilities (scrollable viewport, movable window).
//!
//! - Resolves absolute positions through the parent chain on every query; nothing is cached,
//!   so a moved container is immediately reflected in hit testing.
//! - Answers "which node is topmost under this point?" honoring paint order, z-ordered
//!   containers, and event boundaries (scroll viewports and clipping nodes).
//! - Keeps scroll offsets clamped as content changes, and computes scroll bar geometry.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange. Positions and sizes are supplied by the caller.
//! The only measurement it does is the content height of a scrollable viewport, which is
//! derived from the children the caller placed inside it.
//!
//! ## Hit testing
//!
//! [`Tree::find_topmost_at`] is a depth-first search that visits children topmost first and
//! tests a node itself only after its children, so the first match is the topmost one.
//! Disabled and hidden subtrees are skipped entirely. An event boundary (see
//! [`Tree::boundary`]) keeps the search out of its children when the point lies outside the
//! boundary region, but the boundary node itself is still tested against its own bounds.
//! That is what lets a press on a viewport's scroll bar reach the viewport.
//!
//! ## API overview
//!
//! - [`Tree`]: arena of nodes with structure, geometry, and hit testing.
//! - [`NodeDesc`]: per-node description (position, size, padding, flags, capabilities).
//! - [`NodeFlags`]: interactive, focusable, disabled, hidden, and clip controls.
//! - [`NodeId`]: generational handle of a node.
//! - [`QueryFilter`]: restricts hit results by flags or capability.
//! - [`ScrollState`] / [`ScrollMetrics`] / [`ScrollConfig`]: viewport scrolling and scroll bar math.
//! - [`WindowState`]: header height and movability of a window.
//!
//! Key operations:
//! - [`Tree::insert`] → [`NodeId`], [`Tree::remove`], [`Tree::add_child`], [`Tree::remove_child`]
//! - [`Tree::absolute_position`], [`Tree::bounds`], [`Tree::content_rect`], [`Tree::contains`]
//! - [`Tree::hit_test`] and [`Tree::find_topmost_at`]
//! - [`Tree::focusable_nodes`] for keyboard focus discovery
//! - [`Tree::set_scroll_offset`], [`Tree::scroll_thumb_rect`], [`Tree::raise_to_front`],
//!   [`Tree::move_window_to`]
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod scroll;
mod tree;
mod types;
mod util;
mod window;

pub use scroll::{ScrollConfig, ScrollMetrics, ScrollState};
pub use tree::{Hit, NodePath, QueryFilter, Tree};
pub use types::{ChildOrder, NodeDesc, NodeFlags, NodeId, Position};
pub use window::WindowState;

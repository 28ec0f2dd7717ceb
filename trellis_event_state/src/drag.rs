// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic element drag session.
//!
//! A session is either idle or dragging a source node. While dragging, every
//! `drag` event targets the source no matter where the pointer is; the node
//! under the pointer only ever receives `drag-over` and `drop`.

use kurbo::Point;

/// Drag session state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState<K> {
    /// No drag in progress.
    Idle,
    /// Dragging `source`.
    Dragging {
        /// Node that accepted `drag-start`.
        source: K,
        /// Pointer position when the drag started.
        origin: Point,
        /// Node other than the source that was last under the pointer.
        over: Option<K>,
    },
}

// Not derived: the derive would require `K: Default`.
impl<K> Default for DragState<K> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<K: Copy + PartialEq> DragState<K> {
    /// Start dragging `source` from `origin`.
    pub fn begin(&mut self, source: K, origin: Point) {
        *self = Self::Dragging {
            source,
            origin,
            over: None,
        };
    }

    /// Drag source, if dragging.
    pub fn source(&self) -> Option<K> {
        match self {
            Self::Idle => None,
            Self::Dragging { source, .. } => Some(*source),
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Record the node currently under the pointer. Returns it if it should
    /// receive `drag-over`, i.e. it is a node other than the source.
    pub fn hover(&mut self, under: Option<K>) -> Option<K> {
        let Self::Dragging { source, over, .. } = self else {
            return None;
        };
        let source = *source;
        *over = under.filter(|n| *n != source);
        *over
    }

    /// Node other than the source last passed to [`hover`](Self::hover).
    pub fn over(&self) -> Option<K> {
        match self {
            Self::Idle => None,
            Self::Dragging { over, .. } => *over,
        }
    }

    /// End the session. Returns the source if a drag was in progress.
    pub fn end(&mut self) -> Option<K> {
        let source = self.source();
        *self = Self::Idle;
        source
    }
}

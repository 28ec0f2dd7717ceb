// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: keyboard focus primitives.
//!
//! This crate models focus as a combination of:
//! - **Navigation intents** ([`Navigation`]): Tab ([`Navigation::Next`]) and
//!   Shift+Tab ([`Navigation::Prev`]).
//! - A **tab order** ([`FocusOrder`]): focusable candidates sorted by tab index. The sort is
//!   stable, so candidates with equal tab indices keep their discovery order.
//! - Pluggable **policies** ([`FocusPolicy`]) that pick the next candidate given the current
//!   focus and a direction. [`TabOrderPolicy`] is the linear, wrapping policy.
//! - A **focus state machine** ([`FocusState`]) that tracks the focused node and reports
//!   blur/focus transitions, and can be disabled as a whole.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_focus::{FocusOrder, FocusState, Navigation, TabOrderPolicy};
//!
//! // Discovery order a, b, c with tab indices 0, 2, 1.
//! let order = FocusOrder::from_discovery([('a', 0), ('b', 2), ('c', 1)]);
//! assert_eq!(order.as_slice(), &['a', 'c', 'b']);
//!
//! let policy = TabOrderPolicy::default();
//! let mut focus = FocusState::new();
//!
//! // With nothing focused, Tab picks the first entry.
//! let change = focus.navigate(Navigation::Next, &order, &policy).unwrap();
//! assert_eq!((change.blur, change.focus), (None, Some('a')));
//!
//! // Shift+Tab from the first entry wraps to the last.
//! focus.navigate(Navigation::Prev, &order, &policy);
//! assert_eq!(focus.current(), Some('b'));
//! ```
//!
//! The core types are generic over the node identifier `K`, so callers can use any small,
//! copyable handle (for example `trellis_tree::NodeId`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in tab order (Tab).
    Next,
    /// Move to the previous candidate in tab order (Shift+Tab).
    Prev,
}

/// Wrap mode configuration for focus traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the sequence yields no next candidate.
    Never,
    /// Wrap from the last candidate to the first and vice versa.
    #[default]
    Wrap,
}

/// Focusable candidates in tab order.
///
/// Built from a discovery walk of the tree each time it is needed; it is a
/// snapshot and is not kept in sync with later tree changes.
#[derive(Clone, Debug)]
pub struct FocusOrder<K> {
    nodes: Vec<K>,
}

impl<K> Default for FocusOrder<K> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<K: Copy + Eq> FocusOrder<K> {
    /// Sort `(node, tab_index)` pairs given in discovery order by tab index.
    ///
    /// Lower tab indices come first; ties keep discovery order.
    pub fn from_discovery(candidates: impl IntoIterator<Item = (K, i32)>) -> Self {
        let mut entries: Vec<(K, i32)> = candidates.into_iter().collect();
        entries.sort_by_key(|&(_, tab_index)| tab_index);
        Self {
            nodes: entries.into_iter().map(|(node, _)| node).collect(),
        }
    }

    /// Candidates in tab order.
    pub fn as_slice(&self) -> &[K] {
        &self.nodes
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of `node` in tab order.
    pub fn position(&self, node: K) -> Option<usize> {
        self.nodes.iter().position(|n| *n == node)
    }

    /// Whether `node` is a candidate.
    pub fn contains(&self, node: K) -> bool {
        self.position(node).is_some()
    }
}

/// Trait for focus traversal policies.
pub trait FocusPolicy<K>
where
    K: Copy + Eq,
{
    /// Compute the next focus target given the current focus (if any), a
    /// navigation intent, and the tab order.
    fn next(&self, origin: Option<K>, direction: Navigation, order: &FocusOrder<K>) -> Option<K>;
}

/// Linear tab-order traversal.
///
/// With no origin (or an origin that is no longer a candidate), [`Navigation::Next`]
/// selects the first candidate and [`Navigation::Prev`] the last.
#[derive(Copy, Clone, Debug, Default)]
pub struct TabOrderPolicy {
    /// Wrap behavior at the ends of the order.
    pub wrap: WrapMode,
}

impl<K> FocusPolicy<K> for TabOrderPolicy
where
    K: Copy + Eq,
{
    fn next(&self, origin: Option<K>, direction: Navigation, order: &FocusOrder<K>) -> Option<K> {
        let nodes = order.as_slice();
        let last = nodes.len().checked_sub(1)?;
        let pos = origin.and_then(|o| order.position(o));
        let wrap = self.wrap == WrapMode::Wrap;
        let idx = match (direction, pos) {
            (Navigation::Next, None) => 0,
            (Navigation::Prev, None) => last,
            (Navigation::Next, Some(p)) if p < last => p + 1,
            (Navigation::Next, Some(_)) => wrap.then_some(0)?,
            (Navigation::Prev, Some(p)) if p > 0 => p - 1,
            (Navigation::Prev, Some(_)) => wrap.then_some(last)?,
        };
        nodes.get(idx).copied()
    }
}

/// A focus transition: `blur` is dispatched to the old node (related: new),
/// then `focus` to the new node (related: old).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusChange<K> {
    /// Node losing focus.
    pub blur: Option<K>,
    /// Node gaining focus.
    pub focus: Option<K>,
}

/// Focus state machine: {no focus} ⇄ {node focused}, plus an enabled toggle.
///
/// While disabled, every operation is ignored and reports no change.
#[derive(Clone, Debug)]
pub struct FocusState<K> {
    current: Option<K>,
    enabled: bool,
}

impl<K> Default for FocusState<K> {
    fn default() -> Self {
        Self {
            current: None,
            enabled: true,
        }
    }
}

impl<K: Copy + Eq> FocusState<K> {
    /// Enabled, with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Focused node.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Whether focus operations are honored.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Focus `next` (or clear focus with `None`).
    ///
    /// Returns the transition, or `None` if nothing changed or the state is disabled.
    pub fn set_focus(&mut self, next: Option<K>) -> Option<FocusChange<K>> {
        if !self.enabled || self.current == next {
            return None;
        }
        let blur = core::mem::replace(&mut self.current, next);
        Some(FocusChange { blur, focus: next })
    }

    /// Clear focus.
    pub fn clear(&mut self) -> Option<FocusChange<K>> {
        self.set_focus(None)
    }

    /// Move focus in `direction` through `order` using `policy`.
    ///
    /// An empty order is a no-op.
    pub fn navigate(
        &mut self,
        direction: Navigation,
        order: &FocusOrder<K>,
        policy: &impl FocusPolicy<K>,
    ) -> Option<FocusChange<K>> {
        if !self.enabled {
            return None;
        }
        let target = policy.next(self.current, direction, order)?;
        self.set_focus(Some(target))
    }

    /// Enable or disable focus handling.
    ///
    /// Disabling blurs the focused node; the returned change reports it.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<FocusChange<K>> {
        if self.enabled == enabled {
            return None;
        }
        let change = if enabled { None } else { self.clear() };
        self.enabled = enabled;
        change
    }

    /// Drop the focused node without a transition, e.g. because it no longer exists.
    pub fn forget(&mut self) -> Option<K> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> FocusOrder<u32> {
        // Node ids double as discovery order; tab indices [0, 1, 2].
        FocusOrder::from_discovery([(10, 0), (11, 1), (12, 2)])
    }

    #[test]
    fn tab_wraps_forward_and_backward() {
        let policy = TabOrderPolicy::default();
        let order = order();
        assert_eq!(policy.next(Some(12), Navigation::Next, &order), Some(10));
        assert_eq!(policy.next(Some(10), Navigation::Prev, &order), Some(12));
        assert_eq!(policy.next(None, Navigation::Next, &order), Some(10));
        assert_eq!(policy.next(Some(10), Navigation::Next, &order), Some(11));
    }

    #[test]
    fn never_wrap_stops_at_ends() {
        let policy = TabOrderPolicy {
            wrap: WrapMode::Never,
        };
        let order = order();
        assert_eq!(policy.next(Some(12), Navigation::Next, &order), None);
        assert_eq!(policy.next(Some(10), Navigation::Prev, &order), None);
    }

    #[test]
    fn stale_origin_restarts_from_the_ends() {
        let policy = TabOrderPolicy::default();
        let order = order();
        assert_eq!(policy.next(Some(99), Navigation::Next, &order), Some(10));
        assert_eq!(policy.next(Some(99), Navigation::Prev, &order), Some(12));
    }

    #[test]
    fn sort_is_stable_for_equal_tab_indices() {
        let order = FocusOrder::from_discovery([(1, 5), (2, 0), (3, 5), (4, 0)]);
        assert_eq!(order.as_slice(), &[2, 4, 1, 3]);
    }

    #[test]
    fn empty_order_is_a_no_op() {
        let mut state = FocusState::new();
        let empty = FocusOrder::<u32>::default();
        assert_eq!(
            state.navigate(Navigation::Next, &empty, &TabOrderPolicy::default()),
            None
        );
        assert_eq!(state.current(), None);
    }

    #[test]
    fn transitions_report_blur_then_focus() {
        let mut state = FocusState::new();
        assert_eq!(
            state.set_focus(Some(1)),
            Some(FocusChange {
                blur: None,
                focus: Some(1)
            })
        );
        assert_eq!(state.set_focus(Some(1)), None, "refocusing is not a change");
        assert_eq!(
            state.set_focus(Some(2)),
            Some(FocusChange {
                blur: Some(1),
                focus: Some(2)
            })
        );
        assert_eq!(
            state.clear(),
            Some(FocusChange {
                blur: Some(2),
                focus: None
            })
        );
    }

    #[test]
    fn disabling_blurs_and_ignores_operations() {
        let mut state = FocusState::new();
        let order = order();
        let policy = TabOrderPolicy::default();
        state.set_focus(Some(11));
        assert_eq!(
            state.set_enabled(false),
            Some(FocusChange {
                blur: Some(11),
                focus: None
            })
        );
        assert_eq!(state.set_focus(Some(10)), None);
        assert_eq!(state.navigate(Navigation::Next, &order, &policy), None);
        assert_eq!(state.current(), None);

        assert_eq!(state.set_enabled(true), None);
        assert!(state.navigate(Navigation::Next, &order, &policy).is_some());
        assert_eq!(state.current(), Some(10));
    }
}

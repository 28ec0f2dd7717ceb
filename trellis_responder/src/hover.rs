// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: edge-triggered enter/leave transitions.
//!
//! Feed the node under the pointer to [`HoverState::update`] once per tick. It
//! reports a transition only when the hovered node changes, so holding the
//! pointer still never repeats `enter`.

/// A change of hovered node. `leave` is dispatched before `enter`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HoverTransition<K> {
    /// Node the pointer left, if any.
    pub leave: Option<K>,
    /// Node the pointer entered, if any.
    pub enter: Option<K>,
}

/// The currently hovered node.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    current: Option<K>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Copy + PartialEq> HoverState<K> {
    /// Nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered node.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Record the node now under the pointer and return the transition, if any.
    pub fn update(&mut self, next: Option<K>) -> Option<HoverTransition<K>> {
        if self.current == next {
            return None;
        }
        let leave = core::mem::replace(&mut self.current, next);
        Some(HoverTransition { leave, enter: next })
    }

    /// Forget the hovered node without a transition, e.g. when it was removed.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_edge_triggered() {
        let mut hover = HoverState::new();
        assert_eq!(
            hover.update(Some(1)),
            Some(HoverTransition {
                leave: None,
                enter: Some(1)
            })
        );
        assert_eq!(hover.update(Some(1)), None, "no repeat while held");
        assert_eq!(
            hover.update(Some(2)),
            Some(HoverTransition {
                leave: Some(1),
                enter: Some(2)
            })
        );
        assert_eq!(
            hover.update(None),
            Some(HoverTransition {
                leave: Some(2),
                enter: None
            })
        );
        assert_eq!(hover.update(None), None);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge detection over polled, level-triggered input.
//!
//! Hosts report which buttons or keys are held *now*. [`EdgeTracker`] compares
//! that with the previous tick and reports only the transitions, so holding a
//! button produces one press and one release, never a stream of them.
//!
//! ```
//! use trellis_event_state::edges::EdgeTracker;
//!
//! let mut keys = EdgeTracker::new();
//! let edges = keys.update(['a', 'b']);
//! assert_eq!(edges.pressed.as_slice(), &['a', 'b']);
//!
//! // Still held: nothing to report.
//! assert!(keys.update(['a', 'b']).is_empty());
//!
//! let edges = keys.update(['b']);
//! assert_eq!(edges.released.as_slice(), &['a']);
//! assert!(keys.is_down('b'));
//! ```

use smallvec::SmallVec;

/// Transitions observed in one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edges<T> {
    /// Went from released to held, in the order the host reported them.
    pub pressed: SmallVec<[T; 4]>,
    /// Went from held to released, in the order they were first pressed.
    pub released: SmallVec<[T; 4]>,
}

impl<T> Default for Edges<T> {
    fn default() -> Self {
        Self {
            pressed: SmallVec::new(),
            released: SmallVec::new(),
        }
    }
}

impl<T> Edges<T> {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty() && self.released.is_empty()
    }
}

/// Held set from the previous tick.
#[derive(Clone, Debug)]
pub struct EdgeTracker<T> {
    held: SmallVec<[T; 8]>,
}

impl<T> Default for EdgeTracker<T> {
    fn default() -> Self {
        Self {
            held: SmallVec::new(),
        }
    }
}

impl<T: Copy + Eq> EdgeTracker<T> {
    /// Nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held set with `now` and return the transitions.
    pub fn update(&mut self, now: impl IntoIterator<Item = T>) -> Edges<T> {
        let mut next: SmallVec<[T; 8]> = SmallVec::new();
        for item in now {
            if !next.contains(&item) {
                next.push(item);
            }
        }
        let edges = Edges {
            pressed: next
                .iter()
                .filter(|t| !self.held.contains(t))
                .copied()
                .collect(),
            released: self
                .held
                .iter()
                .filter(|t| !next.contains(t))
                .copied()
                .collect(),
        };
        // Keep first-press order for items that stay held.
        let mut held: SmallVec<[T; 8]> = self
            .held
            .iter()
            .filter(|t| next.contains(t))
            .copied()
            .collect();
        held.extend(edges.pressed.iter().copied());
        self.held = held;
        edges
    }

    /// Whether `item` was held at the last update.
    pub fn is_down(&self, item: T) -> bool {
        self.held.contains(&item)
    }

    /// Everything held at the last update, in first-press order.
    pub fn held(&self) -> &[T] {
        &self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_are_reported_once() {
        let mut t = EdgeTracker::new();
        let e = t.update([1_u8]);
        assert_eq!(e.pressed.as_slice(), &[1]);
        assert!(e.released.is_empty());
        for _ in 0..3 {
            assert!(t.update([1_u8]).is_empty(), "held is level, not edge");
        }
        let e = t.update([]);
        assert_eq!(e.released.as_slice(), &[1]);
        assert!(!t.is_down(1));
    }

    #[test]
    fn duplicates_in_one_report_are_collapsed() {
        let mut t = EdgeTracker::new();
        let e = t.update([3_u8, 3, 4]);
        assert_eq!(e.pressed.as_slice(), &[3, 4]);
        assert_eq!(t.held(), &[3, 4]);
    }

    #[test]
    fn held_keeps_first_press_order() {
        let mut t = EdgeTracker::new();
        t.update([1_u8]);
        t.update([2_u8, 1]);
        assert_eq!(t.held(), &[1, 2]);
        let e = t.update([2_u8]);
        assert_eq!(e.released.as_slice(), &[1]);
        assert_eq!(t.held(), &[2]);
    }
}

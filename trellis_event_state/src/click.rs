// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition.
//!
//! A click is reported on release when the release lands on the node that was
//! pressed. If it lands elsewhere (the node moved or the pointer slipped), the
//! click is still reported as long as the pointer stayed within a movement
//! threshold and the release came within a time threshold of the press.
//!
//! ```
//! use trellis_event_state::click::{ClickResult, ClickState};
//! use kurbo::Point;
//!
//! let mut state: ClickState<u32, u8> = ClickState::new();
//! state.on_down(0, 42, Point::new(10.0, 20.0), 1_000);
//!
//! // Same target clicks regardless of movement.
//! let result = state.on_up(0, Some(&42), Point::new(100.0, 200.0), 2_000);
//! assert_eq!(result, ClickResult::Click(42));
//!
//! // A different target only clicks within the thresholds (5px / 100ms by default).
//! state.on_down(0, 42, Point::new(10.0, 20.0), 3_000);
//! let result = state.on_up(0, Some(&7), Point::new(12.0, 21.0), 3_050);
//! assert_eq!(result, ClickResult::Click(42));
//! ```

use alloc::collections::BTreeMap;
use kurbo::Point;

/// Press/release bookkeeping for click recognition, keyed by button `B`.
#[derive(Clone, Debug)]
pub struct ClickState<K, B> {
    presses: BTreeMap<B, Press<K>>,
    /// Max pointer travel (pixels) for a release on a different target to still click.
    /// `None` disables the distance check.
    pub total_pointer_moved_threshold: Option<f64>,
    /// Max press duration (milliseconds) for a release on a different target to still click.
    /// `None` disables the time check.
    pub time_threshold: Option<u64>,
    last_click: Option<Press<K>>,
}

/// An active press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Node that received the press.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Host timestamp at press time.
    pub down_time: u64,
    /// Whether the pointer has moved beyond the distance threshold since the press.
    pub distance_exceeded: bool,
}

/// Outcome of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// The press target was clicked.
    Click(K),
    /// No click. Carries the press target, if there was a press.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone, B: Ord + Copy> ClickState<K, B> {
    /// Default thresholds: 5px of travel, 100ms.
    pub fn new() -> Self {
        Self::with_thresholds(Some(5.0), Some(100))
    }

    /// Custom thresholds.
    pub fn with_thresholds(
        total_pointer_moved_threshold: Option<f64>,
        time_threshold: Option<u64>,
    ) -> Self {
        Self {
            presses: BTreeMap::new(),
            total_pointer_moved_threshold,
            time_threshold,
            last_click: None,
        }
    }

    /// Record a press of `button` on `target`.
    pub fn on_down(&mut self, button: B, target: K, position: Point, timestamp: u64) {
        self.presses.insert(
            button,
            Press {
                target,
                down_position: position,
                down_time: timestamp,
                distance_exceeded: false,
            },
        );
    }

    /// Resolve a release of `button` over `current_target` (or over nothing).
    pub fn on_up(
        &mut self,
        button: B,
        current_target: Option<&K>,
        position: Point,
        timestamp: u64,
    ) -> ClickResult<K> {
        let Some(press) = self.presses.remove(&button) else {
            return ClickResult::Suppressed(None);
        };

        if current_target == Some(&press.target) {
            self.last_click = Some(press.clone());
            return ClickResult::Click(press.target);
        }

        let thresholds_set =
            self.total_pointer_moved_threshold.is_some() || self.time_threshold.is_some();
        if current_target.is_none() || !thresholds_set || press.distance_exceeded {
            return ClickResult::Suppressed(Some(press.target));
        }

        let distance_ok = self
            .total_pointer_moved_threshold
            .is_none_or(|t| press.down_position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| timestamp.saturating_sub(press.down_time) <= t);

        if distance_ok && time_ok {
            self.last_click = Some(press.clone());
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Track pointer movement. Returns the press target of every press that has
    /// just exceeded the distance threshold.
    pub fn on_move(&mut self, position: Point) -> impl Iterator<Item = K> + '_ {
        let threshold = self.total_pointer_moved_threshold;
        self.presses.values_mut().filter_map(move |press| {
            let t = threshold?;
            if press.distance_exceeded || press.down_position.distance(position) <= t {
                return None;
            }
            press.distance_exceeded = true;
            Some(press.target.clone())
        })
    }

    /// Forget the press of `button`. Returns whether there was one.
    pub fn cancel(&mut self, button: B) -> bool {
        self.presses.remove(&button).is_some()
    }

    /// Whether `button` has an active press.
    pub fn is_pressed(&self, button: B) -> bool {
        self.presses.contains_key(&button)
    }

    /// Active press of `button`.
    pub fn press(&self, button: B) -> Option<&Press<K>> {
        self.presses.get(&button)
    }

    /// Forget all presses.
    pub fn clear(&mut self) {
        self.presses.clear();
    }

    /// Target of the most recent click.
    pub fn last_click_target(&self) -> Option<&K> {
        self.last_click.as_ref().map(|p| &p.target)
    }
}

impl<K: PartialEq + Clone, B: Ord + Copy> Default for ClickState<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const PRIMARY: u8 = 0;
    const SECONDARY: u8 = 1;

    #[test]
    fn same_target_generates_click() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(PRIMARY, 42, Point::new(10.0, 20.0), 1000);
        let result = state.on_up(PRIMARY, Some(&42), Point::new(12.0, 22.0), 1050);
        assert_eq!(result, ClickResult::Click(42));
        assert!(!state.is_pressed(PRIMARY));
        assert_eq!(state.last_click_target(), Some(&42));
    }

    #[test]
    fn release_without_press_is_suppressed() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        let result = state.on_up(PRIMARY, Some(&42), Point::ZERO, 0);
        assert_eq!(result, ClickResult::Suppressed(None));
    }

    #[test]
    fn buttons_are_tracked_independently() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(PRIMARY, 1, Point::ZERO, 0);
        state.on_down(SECONDARY, 2, Point::ZERO, 0);
        assert_eq!(
            state.on_up(SECONDARY, Some(&2), Point::ZERO, 10),
            ClickResult::Click(2)
        );
        assert!(state.is_pressed(PRIMARY));
        assert_eq!(state.press(PRIMARY).map(|p| p.target), Some(1));
    }

    #[test]
    fn different_target_without_thresholds_is_suppressed() {
        let mut state: ClickState<u32, u8> = ClickState::with_thresholds(None, None);
        state.on_down(PRIMARY, 42, Point::new(10.0, 20.0), 1000);
        let result = state.on_up(PRIMARY, Some(&99), Point::new(10.0, 20.0), 1050);
        assert_eq!(result, ClickResult::Suppressed(Some(42)));
    }

    #[test]
    fn release_over_nothing_is_suppressed() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(PRIMARY, 42, Point::ZERO, 0);
        assert_eq!(
            state.on_up(PRIMARY, None, Point::ZERO, 1),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn thresholds_apply_to_different_targets() {
        let mut state: ClickState<u32, u8> = ClickState::with_thresholds(Some(10.0), Some(500));
        state.on_down(PRIMARY, 42, Point::new(0.0, 0.0), 1000);
        assert_eq!(
            state.on_up(PRIMARY, Some(&99), Point::new(6.0, 8.0), 1500),
            ClickResult::Click(42),
            "exactly at both thresholds still clicks"
        );

        state.on_down(PRIMARY, 42, Point::new(0.0, 0.0), 1000);
        assert_eq!(
            state.on_up(PRIMARY, Some(&99), Point::new(20.0, 0.0), 1100),
            ClickResult::Suppressed(Some(42))
        );

        state.on_down(PRIMARY, 42, Point::new(0.0, 0.0), 1000);
        assert_eq!(
            state.on_up(PRIMARY, Some(&99), Point::new(1.0, 0.0), 1600),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn distance_exceeded_during_move_blocks_different_target_click() {
        let mut state: ClickState<u32, u8> = ClickState::with_thresholds(Some(10.0), None);
        state.on_down(PRIMARY, 42, Point::new(0.0, 0.0), 0);
        let exceeded: Vec<u32> = state.on_move(Point::new(50.0, 0.0)).collect();
        assert_eq!(exceeded, [42]);
        // Reported only once.
        assert_eq!(state.on_move(Point::new(60.0, 0.0)).count(), 0);
        // Coming back does not restore click intent on a different target.
        assert_eq!(
            state.on_up(PRIMARY, Some(&99), Point::new(0.0, 0.0), 10),
            ClickResult::Suppressed(Some(42))
        );
    }

    #[test]
    fn distance_exceeded_still_allows_same_target_click() {
        let mut state: ClickState<u32, u8> = ClickState::with_thresholds(Some(10.0), None);
        state.on_down(PRIMARY, 42, Point::new(0.0, 0.0), 0);
        let _ = state.on_move(Point::new(50.0, 0.0)).count();
        assert_eq!(
            state.on_up(PRIMARY, Some(&42), Point::new(50.0, 0.0), 10),
            ClickResult::Click(42)
        );
    }

    #[test]
    fn cancel_and_clear_remove_presses() {
        let mut state: ClickState<u32, u8> = ClickState::new();
        state.on_down(PRIMARY, 1, Point::ZERO, 0);
        state.on_down(SECONDARY, 2, Point::ZERO, 0);
        assert!(state.cancel(PRIMARY));
        assert!(!state.cancel(PRIMARY));
        state.clear();
        assert!(!state.is_pressed(SECONDARY));
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollable viewport state and scroll bar math.
//!
//! A viewport needs a scroll bar only when its content is taller than the
//! viewport. The thumb is sized proportionally to the visible fraction of the
//! content, but never smaller than [`ScrollConfig::min_thumb`]:
//!
//! ```rust
//! use trellis_tree::{ScrollMetrics, ScrollState};
//!
//! let metrics = ScrollMetrics { viewport: 100.0, content: 400.0 };
//! let mut state = ScrollState::default();
//! assert!(metrics.needs_bar());
//! assert_eq!(metrics.thumb_height(state.config().min_thumb), 25.0);
//!
//! // Offsets are always clamped into `[0, content - viewport]`.
//! assert_eq!(state.set_offset(1_000.0, metrics), 300.0);
//! assert_eq!(state.set_offset(-5.0, metrics), 0.0);
//! ```

/// Tunable constants for scrollable viewports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Width of the scroll bar track in pixels.
    pub bar_width: f64,
    /// Minimum thumb height in pixels.
    pub min_thumb: f64,
    /// Pixels scrolled per unit of wheel delta.
    pub wheel_step: f64,
    /// Pixels scrolled per arrow key step.
    pub line_step: f64,
    /// Pixels scrolled per arrow key step while Shift is held.
    pub fast_line_step: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            bar_width: 12.0,
            min_thumb: 20.0,
            wheel_step: 10.0,
            line_step: 20.0,
            fast_line_step: 100.0,
        }
    }
}

/// Measured extents of a viewport along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Height of the viewport.
    pub viewport: f64,
    /// Height of the content inside it.
    pub content: f64,
}

impl ScrollMetrics {
    /// Largest valid offset, `max(0, content - viewport)`.
    pub fn max_offset(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    /// Whether the content overflows the viewport.
    pub fn needs_bar(&self) -> bool {
        self.content > self.viewport
    }

    /// Thumb height: `max(viewport * viewport / content, min_thumb)`.
    pub fn thumb_height(&self, min_thumb: f64) -> f64 {
        if self.content <= 0.0 {
            return self.viewport.max(min_thumb);
        }
        (self.viewport * (self.viewport / self.content)).max(min_thumb)
    }

    /// Distance of the thumb from the top of the track for `offset`.
    pub fn thumb_offset(&self, offset: f64, min_thumb: f64) -> f64 {
        let max = self.max_offset();
        if max <= 0.0 {
            return 0.0;
        }
        let travel = (self.viewport - self.thumb_height(min_thumb)).max(0.0);
        travel * (offset / max).clamp(0.0, 1.0)
    }

    /// Content pixels scrolled per pixel of thumb movement.
    ///
    /// Zero when the thumb cannot travel (it fills the whole track).
    pub fn drag_ratio(&self, min_thumb: f64) -> f64 {
        let travel = self.viewport - self.thumb_height(min_thumb);
        if travel <= 0.0 {
            return 0.0;
        }
        (self.content - self.viewport) / travel
    }

    /// Clamp `offset` into `[0, max_offset]`.
    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }
}

/// Anchor recorded when a thumb drag starts.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ThumbDrag {
    start_y: f64,
    start_offset: f64,
}

/// Per-viewport scroll session: offset, bar visibility, and thumb drag anchor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    offset: f64,
    bar_hidden: bool,
    thumb_drag: Option<ThumbDrag>,
    config: ScrollConfig,
}

impl ScrollState {
    /// A fresh viewport scrolled to the top.
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            offset: 0.0,
            bar_hidden: false,
            thumb_drag: None,
            config,
        }
    }

    /// Current vertical offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Configuration of this viewport.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Set the offset and return the clamped value actually stored.
    pub fn set_offset(&mut self, offset: f64, metrics: ScrollMetrics) -> f64 {
        self.offset = metrics.clamp(offset);
        self.offset
    }

    /// Scroll by `delta` pixels (positive scrolls content up) and return the new offset.
    pub fn scroll_by(&mut self, delta: f64, metrics: ScrollMetrics) -> f64 {
        self.set_offset(self.offset + delta, metrics)
    }

    /// Apply a wheel delta. Positive wheel deltas scroll towards the top.
    pub fn wheel(&mut self, wheel_y: f64, metrics: ScrollMetrics) -> f64 {
        self.scroll_by(-wheel_y * self.config.wheel_step, metrics)
    }

    /// Re-apply the clamp, e.g. after the content or viewport changed size.
    pub fn reclamp(&mut self, metrics: ScrollMetrics) -> f64 {
        self.set_offset(self.offset, metrics)
    }

    /// Whether a scroll bar should be shown for `metrics`.
    pub fn needs_scroll_bar(&self, metrics: ScrollMetrics) -> bool {
        !self.bar_hidden && metrics.needs_bar()
    }

    /// Whether the bar has been hidden explicitly.
    pub fn is_bar_hidden(&self) -> bool {
        self.bar_hidden
    }

    /// Hide or show the scroll bar. A hidden bar never starts a thumb drag.
    pub fn set_bar_hidden(&mut self, hidden: bool) {
        self.bar_hidden = hidden;
        if hidden {
            self.thumb_drag = None;
        }
    }

    /// Start a thumb drag anchored at pointer `y`.
    pub fn begin_thumb_drag(&mut self, y: f64) {
        self.thumb_drag = Some(ThumbDrag {
            start_y: y,
            start_offset: self.offset,
        });
    }

    /// Move an active thumb drag to pointer `y`; returns the new offset, or `None`
    /// if no drag is active.
    ///
    /// `offset = start_offset + (y - start_y) * drag_ratio`, then clamped.
    pub fn drag_thumb_to(&mut self, y: f64, metrics: ScrollMetrics) -> Option<f64> {
        let drag = self.thumb_drag?;
        let ratio = metrics.drag_ratio(self.config.min_thumb);
        Some(self.set_offset(drag.start_offset + (y - drag.start_y) * ratio, metrics))
    }

    /// End any active thumb drag.
    pub fn end_thumb_drag(&mut self) {
        self.thumb_drag = None;
    }

    /// Whether a thumb drag is active.
    pub fn is_dragging_thumb(&self) -> bool {
        self.thumb_drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: ScrollMetrics = ScrollMetrics {
        viewport: 100.0,
        content: 400.0,
    };

    #[test]
    fn scenario_thumb_and_drag_ratio() {
        let min = ScrollConfig::default().min_thumb;
        assert!(SCENARIO.needs_bar());
        assert_eq!(SCENARIO.thumb_height(min), 25.0);
        assert_eq!(SCENARIO.drag_ratio(min), 300.0 / 75.0);

        let mut state = ScrollState::default();
        state.begin_thumb_drag(50.0);
        let offset = state.drag_thumb_to(60.0, SCENARIO).unwrap();
        assert_eq!(offset, 10.0 * 300.0 / 75.0);
        // Dragging far past the end clamps.
        assert_eq!(state.drag_thumb_to(10_000.0, SCENARIO), Some(300.0));
        state.end_thumb_drag();
        assert_eq!(state.drag_thumb_to(70.0, SCENARIO), None);
    }

    #[test]
    fn min_thumb_applies_to_long_content() {
        let m = ScrollMetrics {
            viewport: 100.0,
            content: 10_000.0,
        };
        assert_eq!(m.thumb_height(20.0), 20.0);
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut state = ScrollState::default();
        for v in [400.0, 401.0, 1e9] {
            assert_eq!(state.set_offset(v, SCENARIO), 300.0);
            assert_eq!(state.reclamp(SCENARIO), 300.0, "second clamp must be a no-op");
        }
        for v in [-0.5, -300.0] {
            assert_eq!(state.set_offset(v, SCENARIO), 0.0);
        }
    }

    #[test]
    fn short_content_never_scrolls() {
        let m = ScrollMetrics {
            viewport: 100.0,
            content: 40.0,
        };
        let mut state = ScrollState::default();
        assert!(!state.needs_scroll_bar(m));
        assert_eq!(state.set_offset(50.0, m), 0.0);
        assert_eq!(m.drag_ratio(20.0), 0.0);
    }

    #[test]
    fn wheel_scrolls_against_delta() {
        let mut state = ScrollState::default();
        assert_eq!(state.wheel(-2.0, SCENARIO), 20.0);
        assert_eq!(state.wheel(1.0, SCENARIO), 10.0);
    }

    #[test]
    fn hidden_bar_cancels_drag() {
        let mut state = ScrollState::default();
        state.begin_thumb_drag(0.0);
        state.set_bar_hidden(true);
        assert!(!state.is_dragging_thumb());
        assert!(!state.needs_scroll_bar(SCENARIO));
    }

    #[test]
    fn thumb_offset_tracks_offset() {
        let mut state = ScrollState::default();
        state.set_offset(300.0, SCENARIO);
        assert_eq!(SCENARIO.thumb_offset(state.offset(), 20.0), 75.0);
        assert_eq!(SCENARIO.thumb_offset(0.0, 20.0), 0.0);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window capability data.

use kurbo::{Point, Rect, Size};

/// A movable, raisable window.
///
/// Only the top `header_height` pixels of a window start a move gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowState {
    /// Height of the draggable header strip.
    pub header_height: f64,
    /// Static windows can be raised but not moved.
    pub movable: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            header_height: 30.0,
            movable: true,
        }
    }
}

impl WindowState {
    /// Header strip of a window whose absolute bounds are `bounds`.
    pub fn header_rect(&self, bounds: Rect) -> Rect {
        Rect::new(
            bounds.x0,
            bounds.y0,
            bounds.x1,
            (bounds.y0 + self.header_height).min(bounds.y1),
        )
    }

    /// Clamp a window origin (in its container's local space) so that at least
    /// half of the window stays inside the container horizontally and the header
    /// stays inside it vertically.
    pub fn clamp_origin(&self, origin: Point, window: Size, container: Size) -> Point {
        let min_x = -window.width / 2.0;
        let max_x = container.width - window.width / 2.0;
        let max_y = container.height - self.header_height;
        Point::new(
            origin.x.max(min_x).min(max_x),
            origin.y.max(0.0).min(max_y.max(0.0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_top_strip() {
        let w = WindowState::default();
        let header = w.header_rect(Rect::new(10.0, 20.0, 210.0, 220.0));
        assert_eq!(header, Rect::new(10.0, 20.0, 210.0, 50.0));
    }

    #[test]
    fn clamp_keeps_header_reachable() {
        let w = WindowState::default();
        let window = Size::new(200.0, 100.0);
        let container = Size::new(800.0, 600.0);
        assert_eq!(
            w.clamp_origin(Point::new(-500.0, -50.0), window, container),
            Point::new(-100.0, 0.0)
        );
        assert_eq!(
            w.clamp_origin(Point::new(2_000.0, 2_000.0), window, container),
            Point::new(700.0, 570.0)
        );
        assert_eq!(
            w.clamp_origin(Point::new(50.0, 60.0), window, container),
            Point::new(50.0, 60.0)
        );
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Insets, Point, Rect};

/// Edge-inclusive containment: a point on the border of `rect` is inside it.
pub(crate) fn contains_inclusive(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

/// Shrink `rect` by `padding` on each side.
pub(crate) fn deflate(rect: Rect, padding: Insets) -> Rect {
    Rect::new(
        rect.x0 + padding.x0,
        rect.y0 + padding.y0,
        rect.x1 - padding.x1,
        rect.y1 - padding.y1,
    )
}

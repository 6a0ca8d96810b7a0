// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry used by the solver: points, sizes, rectangles, and the viewport region.
//!
//! All coordinates are in viewport (screen/window) space, with `y` growing downwards.
//! Rectangles are half-open for point containment, matching pixel grids:
//! a point on the right or bottom edge is outside.

/// A point in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Width and height of some content. Never negative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a size; negative extents are clamped to zero.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }
}

/// Axis-aligned rectangle with integer edges.
///
/// Construction normalizes the edges so that `left <= right` and `top <= bottom`
/// always hold; the fields are public for reading and pattern matching but
/// callers should go through [`Rect::new`] when building from untrusted values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Create a rectangle from its edges, swapping inverted pairs.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let (left, right) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        let (top, bottom) = if top <= bottom {
            (top, bottom)
        } else {
            (bottom, top)
        };
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    /// The degenerate rectangle covering a single point.
    pub const fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Horizontal extent.
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Width and height.
    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Horizontal center, rounded towards negative infinity.
    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    /// Vertical center, rounded towards negative infinity.
    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    /// Center point.
    pub const fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// True if the rectangle has no area.
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Whether `p` lies inside the half-open rectangle.
    pub const fn contains_point(&self, p: Point) -> bool {
        self.left <= p.x && p.x < self.right && self.top <= p.y && p.y < self.bottom
    }

    /// Whether `other` lies entirely inside this rectangle. Edges may touch.
    ///
    /// An empty `self` contains nothing.
    pub const fn contains_rect(&self, other: &Self) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Whether the two rectangles share any area.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// The overlapping region, or `None` when the rectangles do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        ))
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// The region content may be drawn into.
///
/// `bounds` is the visible screen or window rectangle. `top_inset` reserves a
/// band at the top of `bounds` (for example a system or action bar) that
/// placed content must stay below.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewportRegion {
    /// Visible screen/window rectangle.
    pub bounds: Rect,
    /// Height of the reserved band at the top of `bounds`.
    pub top_inset: i32,
}

impl ViewportRegion {
    /// Create a viewport region.
    pub const fn new(bounds: Rect, top_inset: i32) -> Self {
        Self {
            bounds,
            top_inset: if top_inset < 0 { 0 } else { top_inset },
        }
    }

    /// First row content may occupy.
    pub const fn content_top(&self) -> i32 {
        self.bounds.top + self.top_inset
    }

    /// The drawable area: `bounds` minus the reserved top band.
    pub const fn content_bounds(&self) -> Rect {
        let top = self.content_top();
        Rect::new(
            self.bounds.left,
            if top > self.bounds.bottom {
                self.bounds.bottom
            } else {
                top
            },
            self.bounds.right,
            self.bounds.bottom,
        )
    }

    /// Whether `rect` fits entirely inside the drawable area.
    pub const fn fits(&self, rect: &Rect) -> bool {
        self.content_bounds().contains_rect(rect)
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    use super::{Point, Rect, Size};

    impl Point {
        /// Convert a Kurbo point, truncating towards zero.
        ///
        /// This is the rule used for pointer coordinates.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pointer coordinates are truncated to whole pixels."
        )]
        pub fn from_kurbo(p: kurbo::Point) -> Self {
            Self::new(p.x as i32, p.y as i32)
        }

        /// This point as a Kurbo translation vector.
        pub fn to_vec2(self) -> kurbo::Vec2 {
            kurbo::Vec2::new(f64::from(self.x), f64::from(self.y))
        }
    }

    impl From<Point> for kurbo::Point {
        fn from(p: Point) -> Self {
            Self::new(f64::from(p.x), f64::from(p.y))
        }
    }

    impl Rect {
        /// Convert a Kurbo rectangle, rounding each edge to the nearest integer.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Edges are rounded to whole pixels first."
        )]
        pub fn from_kurbo(r: kurbo::Rect) -> Self {
            let r = r.round();
            Self::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
        }
    }

    impl From<Rect> for kurbo::Rect {
        fn from(r: Rect) -> Self {
            Self::new(
                f64::from(r.left),
                f64::from(r.top),
                f64::from(r.right),
                f64::from(r.bottom),
            )
        }
    }

    impl Size {
        /// Convert a Kurbo size, rounding up so content is never cut off.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Extents are rounded up to whole pixels first."
        )]
        pub fn from_kurbo(s: kurbo::Size) -> Self {
            let s = s.ceil();
            Self::new(s.width as i32, s.height as i32)
        }
    }

    impl From<Size> for kurbo::Size {
        fn from(s: Size) -> Self {
            Self::new(f64::from(s.width), f64::from(s.height))
        }
    }
}

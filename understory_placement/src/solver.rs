// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement solver.
//!
//! ## Overview
//!
//! [`solve`] walks a preference list of [`Side`]s and returns the first side whose
//! candidate rectangle can be made to fit the viewport. Each side is handled by the
//! same two steps:
//!
//! 1. [`candidate_rect`]: put the content against the anchor on that side, centered on the
//!    anchor along the other axis. Content size is preserved exactly.
//! 2. [`fit`]: when edge clamping is on, slide the candidate along the anchored edge to bring
//!    it on screen, then check the axis that decides whether the side has room at all.
//!
//! With clamping off the first side in the list is accepted as is.
//!
//! ## Preference override
//!
//! When [`Side::Left`] is rejected because the content would cross the viewport's left edge,
//! the returned [`Solution`] carries `preference_override: Some(Side::Right)`. Callers that keep a
//! persistent preferred side should adopt it for later solves. The reverse case (Right failing
//! towards Left) does not produce an override.

use thiserror::Error;
use tracing::trace;

use crate::side::{Axis, Side, Sides};
use crate::types::{Point, Rect, Size, ViewportRegion};

/// Inputs to [`solve`].
#[derive(Clone, Debug)]
pub struct PlacementRequest<'a> {
    /// Anchor rectangle in viewport coordinates.
    pub anchor: Rect,
    /// Measured size of the content to place.
    pub content: Size,
    /// Sides to try, in order. Duplicates are skipped.
    pub preference: &'a [Side],
    /// Region the content must stay inside when `clamp_to_edges` is set.
    pub viewport: ViewportRegion,
    /// Whether to fit the content into the viewport and fall back through sides.
    pub clamp_to_edges: bool,
    /// Padding of the directional indicator, or `None` when the indicator is hidden.
    pub arrow_padding: Option<i32>,
}

/// A resolved placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Side the content was placed on.
    pub side: Side,
    /// Content bounds in viewport coordinates.
    pub draw_rect: Rect,
    /// Where the indicator attaches, relative to `draw_rect`'s origin.
    pub attach: Point,
}

/// No side in the preference list could fit the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("no side fits inside the viewport (tried {tried:?})")]
pub struct NoFit {
    /// Sides that were tried and rejected.
    pub tried: Sides,
}

/// Why [`fit`] rejected a side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Not enough space between the anchor and the viewport edge on this side.
    NoRoom,
    /// Content is longer than the viewport along the slide axis.
    TooLarge,
}

/// Result of [`solve`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// The accepted placement, or the sides that were exhausted.
    pub outcome: Result<Placement, NoFit>,
    /// A new persistent preferred side the caller should use for later solves.
    pub preference_override: Option<Side>,
}

/// Try each side of `request.preference` in order and return the first that fits.
pub fn solve(request: &PlacementRequest<'_>) -> Solution {
    let mut tried = Sides::empty();
    let mut preference_override = None;

    for &side in request.preference {
        let bit = Sides::from(side);
        if tried.contains(bit) {
            continue;
        }
        tried |= bit;

        let candidate = candidate_rect(side, request.anchor, request.content);
        let draw_rect = if request.clamp_to_edges {
            match fit(side, candidate, &request.viewport) {
                Ok(rect) => rect,
                Err(rejection) => {
                    trace!(?side, ?rejection, ?candidate, "placement side rejected");
                    if side == Side::Left && rejection == Rejection::NoRoom {
                        preference_override = Some(Side::Right);
                    }
                    continue;
                }
            }
        } else {
            candidate
        };

        let attach = anchor_point(side, request.anchor, draw_rect, request.arrow_padding);
        return Solution {
            outcome: Ok(Placement {
                side,
                draw_rect,
                attach,
            }),
            preference_override,
        };
    }

    Solution {
        outcome: Err(NoFit { tried }),
        preference_override,
    }
}

/// Position `content` against `anchor` on `side`, centered on the anchor's other axis.
pub fn candidate_rect(side: Side, anchor: Rect, content: Size) -> Rect {
    let (w, h) = (content.width, content.height);
    let origin = match side {
        Side::Bottom => Point::new(anchor.center_x() - w / 2, anchor.bottom),
        Side::Top => Point::new(anchor.center_x() - w / 2, anchor.top - h),
        Side::Right => Point::new(anchor.right, anchor.center_y() - h / 2),
        Side::Left => Point::new(anchor.left - w, anchor.center_y() - h / 2),
        Side::Center => Point::new(anchor.center_x() - w / 2, anchor.center_y() - h / 2),
    };
    Rect::from_origin_size(origin, content)
}

/// Fit a candidate for `side` into `viewport` without changing its size.
///
/// A candidate that already fits is returned unchanged. Otherwise it slides along the
/// anchored edge to stay on screen. It is then checked on the perpendicular axis: overflow
/// on the far edge (away from the anchor) rejects the side, while overflow on the near edge
/// (including into the reserved top band) slides the content back on screen.
/// [`Side::Center`] slides on both axes and is only rejected when the content is larger
/// than the viewport.
pub fn fit(side: Side, candidate: Rect, viewport: &ViewportRegion) -> Result<Rect, Rejection> {
    if viewport.fits(&candidate) {
        return Ok(candidate);
    }

    let (Some(slide_axis), Some(cross_axis)) = (side.slide_axis(), side.perpendicular_axis())
    else {
        let rect = slide_along(candidate, Axis::Horizontal, viewport)?;
        return slide_along(rect, Axis::Vertical, viewport);
    };

    let rect = slide_along(candidate, slide_axis, viewport)?;
    let (lo, hi) = span(&rect, cross_axis);
    let (min, max) = limits(viewport, cross_axis);
    let delta = if side.grows_forward() {
        if hi > max {
            return Err(Rejection::NoRoom);
        }
        if lo < min { min - lo } else { 0 }
    } else {
        if lo < min {
            return Err(Rejection::NoRoom);
        }
        if hi > max { max - hi } else { 0 }
    };
    // Sliding off the near edge can push the far edge out when space is tight.
    if lo + delta < min || hi + delta > max {
        return Err(Rejection::NoRoom);
    }
    Ok(shift(rect, cross_axis, delta))
}

/// Where the directional indicator attaches, relative to `draw_rect`'s origin.
///
/// This is the midpoint of the anchor edge facing the content (the anchor center for
/// [`Side::Center`]). With an indicator, the point moves back by half the padding along the
/// anchored edge so the glyph centers on it.
pub fn anchor_point(side: Side, anchor: Rect, draw_rect: Rect, arrow_padding: Option<i32>) -> Point {
    let edge = match side {
        Side::Bottom => Point::new(anchor.center_x(), anchor.bottom),
        Side::Top => Point::new(anchor.center_x(), anchor.top),
        Side::Right => Point::new(anchor.right, anchor.center_y()),
        Side::Left => Point::new(anchor.left, anchor.center_y()),
        Side::Center => anchor.center(),
    };
    let local = edge.offset(-draw_rect.left, -draw_rect.top);
    let Some(padding) = arrow_padding else {
        return local;
    };
    let inset = padding / 2;
    match side {
        Side::Left | Side::Right => local.offset(0, -inset),
        Side::Top | Side::Bottom => local.offset(-inset, 0),
        Side::Center => local,
    }
}

fn span(rect: &Rect, axis: Axis) -> (i32, i32) {
    match axis {
        Axis::Horizontal => (rect.left, rect.right),
        Axis::Vertical => (rect.top, rect.bottom),
    }
}

fn limits(viewport: &ViewportRegion, axis: Axis) -> (i32, i32) {
    match axis {
        Axis::Horizontal => (viewport.bounds.left, viewport.bounds.right),
        Axis::Vertical => (viewport.content_top(), viewport.bounds.bottom),
    }
}

fn shift(rect: Rect, axis: Axis, delta: i32) -> Rect {
    match axis {
        Axis::Horizontal => rect.offset(delta, 0),
        Axis::Vertical => rect.offset(0, delta),
    }
}

fn slide_along(rect: Rect, axis: Axis, viewport: &ViewportRegion) -> Result<Rect, Rejection> {
    let (lo, hi) = span(&rect, axis);
    let (min, max) = limits(viewport, axis);
    if hi - lo > max - min {
        return Err(Rejection::TooLarge);
    }
    let delta = if hi > max {
        max - hi
    } else if lo < min {
        min - lo
    } else {
        0
    };
    Ok(shift(rect, axis, delta))
}

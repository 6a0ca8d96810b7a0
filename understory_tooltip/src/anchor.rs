// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor tracking: keep the anchor rectangle in sync with a moving host view.
//!
//! ## Signals
//!
//! Two notifications with different granularity feed the tracker:
//!
//! - [`AnchorTracker::region_changed`]: coarse. The anchor's visible region was laid out again.
//!   A new rectangle replaces the old one and the caller re-runs the placement solver.
//! - [`AnchorTracker::about_to_redraw`]: fine. Called every frame before drawing. The tracker
//!   reads the anchor's current location and returns the translation since the last reading,
//!   which the caller applies to the existing placement without solving again. Readings are
//!   skipped while the anchor itself is mid-redraw (not settled), since its bounds may be stale.
//!
//! ## Liveness
//!
//! The tracker never owns the anchor. It holds an [`AnchorLookup`] that resolves to a fresh
//! [`AnchorSnapshot`] or to `None` once the anchor is gone. A `None` lookup, or an explicit
//! [`AnchorTracker::detach`], makes the tracker stale: the rectangle freezes at its last known
//! value and all later signals are ignored.

use understory_placement::{Point, Rect, ViewportRegion};

use crate::host::Subscription;

/// A reading of the anchor view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnchorSnapshot {
    /// Visible bounds in viewport coordinates.
    pub visible_rect: Rect,
    /// Top-left corner of the view in viewport coordinates, ignoring clipping.
    pub location: Point,
    /// False while the view has pending redraw work.
    pub settled: bool,
}

/// Resolves the anchor view without owning it.
pub trait AnchorLookup {
    /// Read the anchor, or `None` if it is no longer reachable.
    fn resolve(&self) -> Option<AnchorSnapshot>;

    /// Register for layout and redraw notifications on the anchor.
    ///
    /// The subscription is held until the tooltip closes or the anchor detaches.
    fn observe(&mut self) -> Subscription {
        Subscription::empty()
    }
}

/// Anchor lookup for tooltips that point at a fixed position.
///
/// Used as the default lookup type of [`Tooltip`](crate::tooltip::Tooltip). Always resolves
/// to `None`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAnchor;

impl AnchorLookup for NoAnchor {
    #[inline]
    fn resolve(&self) -> Option<AnchorSnapshot> {
        None
    }
}

/// What a tooltip points at.
#[derive(Clone, Debug)]
pub enum AnchorTarget<L> {
    /// A view resolved through a lookup.
    View(L),
    /// A fixed point, measured from the viewport's content top.
    Point(Point),
}

/// Outcome of [`AnchorTracker::region_changed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionUpdate {
    /// The anchor rectangle changed; re-run placement.
    Moved,
    /// Same rectangle as before.
    Unchanged,
    /// The new rectangle lies outside the viewport and was ignored.
    Offscreen,
    /// The tracker is stale or anchored to a point; nothing changed.
    Ignored,
}

/// Owns the anchor rectangle for one tooltip.
#[derive(Clone, Debug)]
pub struct AnchorTracker<L> {
    target: Option<AnchorTarget<L>>,
    rect: Rect,
}

impl<L: AnchorLookup> AnchorTracker<L> {
    /// Create a tracker and take the initial measurement.
    ///
    /// Point anchors have no rectangle until [`capture`](Self::capture). A view that does not
    /// resolve starts out stale.
    pub fn new(target: AnchorTarget<L>) -> Self {
        let mut tracker = Self {
            target: Some(target),
            rect: Rect::ZERO,
        };
        tracker.refresh();
        tracker
    }

    /// Current anchor rectangle in viewport coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// True once the anchor became unreachable. The rectangle is frozen.
    pub fn is_stale(&self) -> bool {
        self.target.is_none()
    }

    /// Measure against a newly captured viewport.
    pub fn capture(&mut self, viewport: &ViewportRegion) {
        match &self.target {
            Some(AnchorTarget::Point(p)) => {
                self.rect = Rect::from_point(p.offset(0, viewport.content_top()));
            }
            Some(AnchorTarget::View(_)) => self.refresh(),
            None => {}
        }
    }

    /// Re-read the anchor's visible rectangle. Goes stale if the view is gone.
    pub fn refresh(&mut self) {
        let Some(AnchorTarget::View(lookup)) = &self.target else {
            return;
        };
        match lookup.resolve() {
            Some(snapshot) => self.rect = snapshot.visible_rect,
            None => self.detach(),
        }
    }

    /// Register for anchor notifications, if the anchor is a live view.
    pub fn observe(&mut self) -> Option<Subscription> {
        match &mut self.target {
            Some(AnchorTarget::View(lookup)) => Some(lookup.observe()),
            _ => None,
        }
    }

    /// Coarse signal: the anchor's visible region is now `rect`.
    pub fn region_changed(&mut self, rect: Rect, viewport: &ViewportRegion) -> RegionUpdate {
        if !matches!(self.target, Some(AnchorTarget::View(_))) {
            return RegionUpdate::Ignored;
        }
        if !rect.intersects(&viewport.bounds) {
            return RegionUpdate::Offscreen;
        }
        if rect == self.rect {
            return RegionUpdate::Unchanged;
        }
        self.rect = rect;
        RegionUpdate::Moved
    }

    /// Fine signal: the anchor is about to redraw.
    ///
    /// Returns the `(dx, dy)` the anchor moved since the last reading, after applying it to the
    /// tracked rectangle. `None` when nothing moved, the anchor is not settled, or the tracker
    /// is stale.
    pub fn about_to_redraw(&mut self) -> Option<(i32, i32)> {
        let Some(AnchorTarget::View(lookup)) = &self.target else {
            return None;
        };
        let Some(snapshot) = lookup.resolve() else {
            self.detach();
            return None;
        };
        if !snapshot.settled {
            return None;
        }
        let dx = snapshot.location.x - self.rect.left;
        let dy = snapshot.location.y - self.rect.top;
        if dx == 0 && dy == 0 {
            return None;
        }
        self.rect = self.rect.offset(dx, dy);
        Some((dx, dy))
    }

    /// The anchor left the render tree. Freeze the rectangle and drop the lookup.
    ///
    /// Point anchors are never stale and ignore this.
    pub fn detach(&mut self) {
        if matches!(self.target, Some(AnchorTarget::View(_))) {
            self.target = None;
        }
    }
}

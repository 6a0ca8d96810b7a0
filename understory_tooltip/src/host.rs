// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities the tooltip consumes: the content surface, animations, timers,
//! and observer subscriptions.
//!
//! ## Callback routing
//!
//! The tooltip never stores closures inside the host. Instead, [`Animator::animate`] and
//! [`Scheduler::schedule`] return handles, and the host reports progress by calling back into
//! the tooltip with the same handle:
//!
//! - [`Tooltip::on_animation_start`](crate::tooltip::Tooltip::on_animation_start),
//!   [`on_animation_end`](crate::tooltip::Tooltip::on_animation_end), and
//!   [`on_animation_cancel`](crate::tooltip::Tooltip::on_animation_cancel).
//! - [`Tooltip::on_timer`](crate::tooltip::Tooltip::on_timer) when a timer fires.
//!
//! Handles the tooltip no longer tracks (because it cancelled or replaced them) are ignored,
//! so a late callback from a cancelled unit of work has no effect.

use alloc::boxed::Box;
use core::time::Duration;

use kurbo::Vec2;
use understory_placement::{Point, Side, Size};

/// Identifies one animation started by [`Animator::animate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u64);

/// Identifies one timer started by [`Scheduler::schedule`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// An alpha transition of the content surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fade {
    /// Starting alpha.
    pub from: f32,
    /// Final alpha.
    pub to: f32,
    /// Length of the transition.
    pub duration: Duration,
    /// Wait before the transition starts.
    pub delay: Duration,
}

/// Content parameters handed to the surface once, on attach.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContentSpec<'a> {
    /// Tooltip text.
    pub text: &'a str,
    /// Padding around the text.
    pub padding: i32,
    /// Maximum text width, if limited.
    pub max_width: Option<i32>,
}

/// Where and how the surface draws its directional indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Indicator {
    /// Side the content sits on.
    pub side: Side,
    /// Inset of the indicator from the content edge; zero without an indicator.
    pub inset: i32,
    /// Attach point relative to the content origin; `None` without an indicator.
    pub attach: Option<Point>,
}

/// The tooltip's content node in the host render tree.
pub trait Surface {
    /// Build the content. Called once, on attach.
    fn prepare(&mut self, content: &ContentSpec<'_>);

    /// Replace the text of prepared content.
    fn set_text(&mut self, text: &str);

    /// Current measured content size.
    fn content_size(&self) -> Size;

    /// Translate the content to `offset` in viewport coordinates.
    fn set_translation(&mut self, offset: Vec2);

    /// Update the directional indicator.
    fn set_indicator(&mut self, indicator: Indicator);

    /// Show or hide the content without animating.
    fn set_visible(&mut self, visible: bool);

    /// Current alpha; fade-outs start from here.
    fn alpha(&self) -> f32 {
        1.0
    }

    /// Remove the content from the render tree.
    fn detach(&mut self);
}

/// Starts and cancels alpha transitions of the surface.
pub trait Animator {
    /// Start `fade` and return a handle the host echoes back in completion calls.
    fn animate(&mut self, fade: Fade) -> AnimationHandle;

    /// Cancel a running transition. Unknown handles are ignored.
    fn cancel(&mut self, handle: AnimationHandle);
}

/// Deferred, cancellable callbacks.
pub trait Scheduler {
    /// Fire after `delay`; the host then calls [`Tooltip::on_timer`](crate::tooltip::Tooltip::on_timer).
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a pending timer. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// A registered observer. Dropping it unregisters.
#[must_use = "dropping a subscription unregisters it"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap an unregister action.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Unregister now.
    pub fn release(mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.release.take() {
            f();
        }
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for tooltips: identifiers, lifecycle states, dismissal policies,
//! configuration, and listener callbacks.
//!
//! These are referenced by the [`tooltip`](crate::tooltip) state machine and by hosts.

use alloc::string::String;
use core::time::Duration;

use understory_placement::Side;

use crate::error::TooltipError;

/// Caller-chosen identifier, reported back in callbacks and log records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TooltipId(pub u32);

/// Lifecycle of a tooltip.
///
/// - `Idle → Attached` on attach.
/// - `Attached → Showing` on show; `Showing → Visible` when the fade-in ends.
/// - `Visible → Activated` when the activation delay elapses.
/// - `Showing | Visible | Activated → Hiding` on hide, auto-hide, dismissal, or placement failure.
/// - `Hiding → Closed` when the fade-out ends, or `Hiding → Attached` for `hide(false)`.
/// - Any state `→ Closed` on forced detach.
///
/// [`Closed`](Self::Closed) is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet in the render tree.
    Idle,
    /// In the render tree with content prepared, not shown.
    Attached,
    /// Fade-in in flight.
    Showing,
    /// Shown; dismissal gestures are still ignored.
    Visible,
    /// Shown and honoring dismissal gestures.
    Activated,
    /// Fade-out in flight.
    Hiding,
    /// Detached and discarded. All calls are no-ops.
    Closed,
}

impl LifecycleState {
    /// True while the tooltip is on screen or fading in.
    pub const fn is_showing(self) -> bool {
        matches!(self, Self::Showing | Self::Visible | Self::Activated)
    }

    /// True between attach and close.
    pub const fn is_attached(self) -> bool {
        !matches!(self, Self::Idle | Self::Closed)
    }
}

/// Which pointer-down gestures close the tooltip.
///
/// See [`dismiss::evaluate`](crate::dismiss::evaluate) for the full decision table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DismissPolicy {
    /// Never close on touch.
    #[default]
    None,
    /// Close when touched inside the content.
    TouchInside,
    /// Close when touched inside; swallow every pointer-down.
    TouchInsideExclusive,
    /// Close on any touch; inside touches are swallowed.
    TouchOutside,
    /// Close on any touch; swallow every pointer-down.
    TouchOutsideExclusive,
    /// Close on any touch and let it through.
    TouchAnywhere,
}

/// Phase of a pointer event delivered to [`Tooltip::on_pointer`](crate::tooltip::Tooltip::on_pointer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Initial contact of a gesture.
    Down,
    /// Movement during a gesture.
    Move,
    /// End of a gesture.
    Up,
    /// Gesture aborted by the platform.
    Cancel,
}

/// Reported to the close callback just before a close starts hiding the tooltip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CloseEvent {
    /// The closing tooltip.
    pub id: TooltipId,
    /// True when a pointer gesture caused the close.
    pub from_user: bool,
    /// True when that gesture started inside the content bounds.
    pub inside: bool,
}

/// Completion notifications.
///
/// All methods default to no-ops. A missing listener never blocks a transition.
pub trait TooltipListener {
    /// Fade-in finished without being cancelled.
    fn on_show_completed(&mut self, _id: TooltipId) {}
    /// Fade-out finished and the tooltip is about to detach.
    fn on_hide_completed(&mut self, _id: TooltipId) {}
    /// Placement failed; the tooltip will not be shown.
    fn on_show_failed(&mut self, _id: TooltipId, _error: &TooltipError) {}
}

/// Tooltip configuration. Immutable once handed to [`Tooltip::new`](crate::tooltip::Tooltip::new).
///
/// Build with struct-update syntax over [`Default`]:
///
/// ```
/// use core::time::Duration;
/// use understory_tooltip::types::{DismissPolicy, TooltipConfig, TooltipId};
/// use understory_placement::Side;
///
/// let config = TooltipConfig {
///     id: TooltipId(7),
///     text: "Saved".into(),
///     side: Side::Top,
///     dismiss_policy: DismissPolicy::TouchOutside,
///     show_duration: Some(Duration::from_secs(3)),
///     ..Default::default()
/// };
/// assert_eq!(config.padding, 30);
/// ```
#[derive(Clone, Debug)]
pub struct TooltipConfig {
    /// Identifier reported in callbacks.
    pub id: TooltipId,
    /// Initial text handed to the surface.
    pub text: String,
    /// Preferred placement side.
    pub side: Side,
    /// Touch dismissal policy.
    pub dismiss_policy: DismissPolicy,
    /// Fade-in and fade-out duration. Zero shows and hides instantly.
    pub fade_duration: Duration,
    /// Delay before the fade-in starts.
    pub show_delay: Duration,
    /// Grace period after showing before dismissal gestures are honored.
    pub activate_delay: Duration,
    /// Hide automatically this long after the fade-in completes.
    pub show_duration: Option<Duration>,
    /// Keep the content inside the viewport, falling back through sides.
    pub clamp_to_edges: bool,
    /// Suppress the directional indicator.
    pub hide_arrow: bool,
    /// Content padding; the indicator takes half of it.
    pub padding: i32,
    /// Maximum content width handed to the surface.
    pub max_width: Option<i32>,
    /// Close immediately when the anchor leaves the render tree.
    pub dismiss_on_anchor_detach: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            id: TooltipId::default(),
            text: String::new(),
            side: Side::Bottom,
            dismiss_policy: DismissPolicy::None,
            fade_duration: Duration::from_millis(200),
            show_delay: Duration::ZERO,
            activate_delay: Duration::ZERO,
            show_duration: None,
            clamp_to_edges: true,
            hide_arrow: false,
            padding: 30,
            max_width: None,
            dismiss_on_anchor_detach: false,
        }
    }
}

impl TooltipConfig {
    /// Padding applied around the content: half when the indicator is hidden.
    pub fn content_padding(&self) -> i32 {
        if self.hide_arrow {
            self.padding / 2
        } else {
            self.padding
        }
    }

    /// Indicator padding fed to the solver, or `None` without an indicator.
    pub fn arrow_padding(&self) -> Option<i32> {
        (!self.hide_arrow).then_some(self.padding)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip lifecycle: attach, show, activate, hide, and close.
//!
//! ## Driving a tooltip
//!
//! [`Tooltip`] is a state machine. It never blocks and never calls back into itself; the host
//! drives it with three kinds of input:
//!
//! - Commands: [`show`](Tooltip::show), [`hide`](Tooltip::hide), [`detach`](Tooltip::detach),
//!   [`set_offset`](Tooltip::set_offset), [`set_text`](Tooltip::set_text).
//! - Completions: [`on_animation_start`](Tooltip::on_animation_start),
//!   [`on_animation_end`](Tooltip::on_animation_end),
//!   [`on_animation_cancel`](Tooltip::on_animation_cancel), [`on_timer`](Tooltip::on_timer),
//!   echoing the handles returned by the host's [`Animator`] and [`Scheduler`].
//! - Observations: [`on_anchor_region_changed`](Tooltip::on_anchor_region_changed),
//!   [`on_anchor_about_to_redraw`](Tooltip::on_anchor_about_to_redraw),
//!   [`on_anchor_detached`](Tooltip::on_anchor_detached),
//!   [`on_viewport_changed`](Tooltip::on_viewport_changed), and
//!   [`on_pointer`](Tooltip::on_pointer).
//!
//! At most one fade is in flight. Starting a fade cancels the other, and a cancelled fade never
//! runs its completion effects. Timers are keyed by handle; scheduling one replaces and cancels
//! the previous timer of the same kind.
//!
//! ## Placement
//!
//! Every show and every coarse anchor or viewport change re-runs
//! [`solve`](understory_placement::solve) with the persistent preferred side first. A placement
//! is either applied in full (translation and indicator) or, on failure, the tooltip hides and
//! reports [`TooltipError::Placement`] to the listener. Fine per-frame anchor movement shifts the
//! current placement without solving again.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use tracing::{debug, trace, warn};
use understory_placement::{
    Placement, PlacementRequest, Point, Rect, Side, ViewportRegion, preference_order, solve,
};

use crate::anchor::{AnchorLookup, AnchorTarget, AnchorTracker, NoAnchor, RegionUpdate};
use crate::dismiss::evaluate;
use crate::error::TooltipError;
use crate::host::{
    AnimationHandle, Animator, ContentSpec, Fade, Indicator, Scheduler, Subscription, Surface,
    TimerHandle,
};
use crate::types::{
    CloseEvent, DismissPolicy, LifecycleState, PointerPhase, TooltipConfig, TooltipId,
    TooltipListener,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FadeKind {
    In,
    Out,
}

/// What happens once the fade-out ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum HideOutcome {
    /// Back to `Attached`, silently.
    Rest,
    /// Notify hide-completed and close.
    Remove,
    /// Notify show-failed and close.
    Fail(TooltipError),
}

/// An anchored tooltip bound to a host surface, animator, and scheduler.
///
/// `L` resolves the anchor view. Tooltips anchored to a fixed point use the default
/// [`NoAnchor`] and are built with [`Tooltip::at_point`].
pub struct Tooltip<S, A, T, L = NoAnchor> {
    config: TooltipConfig,
    state: LifecycleState,
    surface: S,
    animator: A,
    scheduler: T,
    tracker: AnchorTracker<L>,
    viewport: Option<ViewportRegion>,
    preferred: Side,
    placement: Option<Placement>,
    // Content origin in viewport coordinates, as last pushed to the surface.
    translation: Point,
    fade: Option<(AnimationHandle, FadeKind)>,
    activate_timer: Option<TimerHandle>,
    auto_hide_timer: Option<TimerHandle>,
    hide_outcome: HideOutcome,
    listener: Option<Box<dyn TooltipListener>>,
    on_close: Option<Box<dyn FnMut(CloseEvent)>>,
    subscriptions: Vec<Subscription>,
}

impl<S, A, T, L> core::fmt::Debug for Tooltip<S, A, T, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tooltip")
            .field("id", &self.config.id)
            .field("state", &self.state)
            .field("preferred", &self.preferred)
            .field("placement", &self.placement)
            .field("translation", &self.translation)
            .field("fade", &self.fade)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, A: Animator, T: Scheduler> Tooltip<S, A, T, NoAnchor> {
    /// Create a tooltip pointing at a fixed position.
    ///
    /// `point.y` is measured from the top of the viewport's content area; the reserved top band
    /// is added on [`attach`](Self::attach).
    pub fn at_point(
        config: TooltipConfig,
        point: Point,
        surface: S,
        animator: A,
        scheduler: T,
    ) -> Self {
        Self::new(config, AnchorTarget::Point(point), surface, animator, scheduler)
    }
}

impl<S: Surface, A: Animator, T: Scheduler, L: AnchorLookup> Tooltip<S, A, T, L> {
    /// Create a tooltip in [`LifecycleState::Idle`]. The anchor is measured immediately.
    pub fn new(
        config: TooltipConfig,
        anchor: AnchorTarget<L>,
        surface: S,
        animator: A,
        scheduler: T,
    ) -> Self {
        let preferred = config.side;
        Self {
            config,
            state: LifecycleState::Idle,
            surface,
            animator,
            scheduler,
            tracker: AnchorTracker::new(anchor),
            viewport: None,
            preferred,
            placement: None,
            translation: Point::ZERO,
            fade: None,
            activate_timer: None,
            auto_hide_timer: None,
            hide_outcome: HideOutcome::Remove,
            listener: None,
            on_close: None,
            subscriptions: Vec::new(),
        }
    }

    /// Register completion notifications. Replaces any previous listener.
    pub fn set_listener(&mut self, listener: impl TooltipListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Register the close callback, invoked before a close starts hiding the tooltip.
    pub fn set_close_callback(&mut self, callback: impl FnMut(CloseEvent) + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    /// Identifier from the configuration.
    pub fn id(&self) -> TooltipId {
        self.config.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// True while fading in or shown.
    pub fn is_showing(&self) -> bool {
        self.state.is_showing()
    }

    /// True between attach and close.
    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    /// Latest applied placement.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Tracked anchor rectangle in viewport coordinates.
    pub fn anchor_rect(&self) -> Rect {
        self.tracker.rect()
    }

    /// Side tried first on the next solve.
    pub fn preferred_side(&self) -> Side {
        self.preferred
    }

    /// Content bounds as currently translated, if placed.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.placement
            .map(|p| Rect::from_origin_size(self.translation, p.draw_rect.size()))
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.config.text
    }

    /// The host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Enter the render tree: capture the viewport, measure the anchor, prepare content.
    pub fn attach(&mut self, viewport: ViewportRegion) {
        if self.state != LifecycleState::Idle {
            debug!(id = self.config.id.0, state = ?self.state, "attach ignored");
            return;
        }
        self.viewport = Some(viewport);
        self.tracker.capture(&viewport);
        if let Some(sub) = self.tracker.observe() {
            self.subscriptions.push(sub);
        }
        self.surface.prepare(&ContentSpec {
            text: &self.config.text,
            padding: self.config.content_padding(),
            max_width: self.config.max_width,
        });
        self.surface.set_visible(false);
        self.state = LifecycleState::Attached;
        debug!(id = self.config.id.0, anchor = ?self.tracker.rect(), "attached");
    }

    /// Place the tooltip and start the fade-in.
    ///
    /// No-op unless attached and not already showing. Calling it while hiding cancels the
    /// fade-out and shows again.
    pub fn show(&mut self) {
        match self.state {
            LifecycleState::Attached | LifecycleState::Hiding => {}
            LifecycleState::Showing | LifecycleState::Visible | LifecycleState::Activated => {
                trace!(id = self.config.id.0, "already showing");
                return;
            }
            LifecycleState::Idle | LifecycleState::Closed => {
                debug!(id = self.config.id.0, error = %TooltipError::Detached, "show ignored");
                return;
            }
        }
        self.tracker.refresh();
        if self.tracker.is_stale() {
            warn!(id = self.config.id.0, error = %TooltipError::StaleAnchor, "show ignored");
            return;
        }

        let resuming = self.state == LifecycleState::Hiding;
        self.cancel_fade();
        self.cancel_timers();

        if let Err(error) = self.place() {
            warn!(id = self.config.id.0, %error, "show failed");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_show_failed(self.config.id, &error);
            }
            self.close(true);
            return;
        }

        self.state = LifecycleState::Showing;
        let from = if resuming { self.surface.alpha() } else { 0.0 };
        debug!(id = self.config.id.0, placement = ?self.placement, "show");
        if self.config.fade_duration.is_zero() && self.config.show_delay.is_zero() {
            self.surface.set_visible(true);
            self.fade_in_completed();
        } else {
            let handle = self.animator.animate(Fade {
                from,
                to: 1.0,
                duration: self.config.fade_duration,
                delay: self.config.show_delay,
            });
            trace!(id = self.config.id.0, ?handle, "fade-in started");
            self.fade = Some((handle, FadeKind::In));
        }
    }

    /// Start hiding.
    ///
    /// With `remove_after`, the tooltip closes once the fade-out ends and hide-completed fires.
    /// Otherwise it returns to [`LifecycleState::Attached`] and can be shown again. No-op while
    /// already hiding or closed.
    pub fn hide(&mut self, remove_after: bool) {
        match self.state {
            LifecycleState::Showing | LifecycleState::Visible | LifecycleState::Activated => {
                let outcome = if remove_after {
                    HideOutcome::Remove
                } else {
                    HideOutcome::Rest
                };
                self.begin_hide(outcome, false);
            }
            LifecycleState::Hiding => {
                if remove_after && self.hide_outcome == HideOutcome::Rest {
                    self.hide_outcome = HideOutcome::Remove;
                }
                trace!(id = self.config.id.0, "already hiding");
            }
            LifecycleState::Attached => {
                if remove_after {
                    debug!(id = self.config.id.0, "removed before showing");
                    self.close(true);
                }
            }
            LifecycleState::Idle | LifecycleState::Closed => {
                debug!(id = self.config.id.0, error = %TooltipError::Detached, "hide ignored");
            }
        }
    }

    /// The host removed the tooltip from the render tree.
    ///
    /// Cancels any fade and all timers and goes straight to [`LifecycleState::Closed`] without
    /// completion callbacks. Idempotent.
    pub fn detach(&mut self) {
        if self.state == LifecycleState::Closed {
            return;
        }
        debug!(id = self.config.id.0, state = ?self.state, "forced detach");
        self.close(false);
    }

    /// Shift the content as if the anchor's origin were at `(x, y)`.
    ///
    /// The next re-placement replaces the shift.
    pub fn set_offset(&mut self, x: i32, y: i32) {
        if !self.state.is_attached() {
            debug!(id = self.config.id.0, error = %TooltipError::Detached, "offset ignored");
            return;
        }
        let Some(placement) = self.placement else {
            return;
        };
        let anchor = self.tracker.rect();
        self.translation = Point::new(
            x - anchor.left + placement.draw_rect.left,
            y - anchor.top + placement.draw_rect.top,
        );
        self.surface.set_translation(self.translation.to_vec2());
    }

    /// Replace the text and forward it to the surface.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.config.text = text.into();
        if self.state.is_attached() {
            self.surface.set_text(&self.config.text);
        }
    }

    /// Coarse signal: the anchor's visible region changed.
    pub fn on_anchor_region_changed(&mut self, rect: Rect) {
        let Some(viewport) = self.viewport else {
            return;
        };
        if !self.state.is_attached() {
            return;
        }
        match self.tracker.region_changed(rect, &viewport) {
            RegionUpdate::Moved => {
                trace!(id = self.config.id.0, ?rect, "anchor moved");
                self.replace_while_showing();
            }
            RegionUpdate::Offscreen => {
                trace!(id = self.config.id.0, ?rect, "anchor region outside viewport");
            }
            RegionUpdate::Unchanged | RegionUpdate::Ignored => {}
        }
    }

    /// Fine signal: the anchor is about to redraw. Shifts the placement by the anchor's delta.
    pub fn on_anchor_about_to_redraw(&mut self) {
        if !self.state.is_attached() {
            return;
        }
        let Some((dx, dy)) = self.tracker.about_to_redraw() else {
            return;
        };
        if let Some(placement) = self.placement.as_mut() {
            placement.draw_rect = placement.draw_rect.offset(dx, dy);
            self.translation = placement.draw_rect.origin();
            self.surface.set_translation(self.translation.to_vec2());
        }
    }

    /// The anchor left the render tree.
    ///
    /// The anchor rectangle freezes and observers are released. With
    /// [`dismiss_on_anchor_detach`](TooltipConfig::dismiss_on_anchor_detach), a shown tooltip
    /// closes at once.
    pub fn on_anchor_detached(&mut self) {
        if !self.state.is_attached() {
            return;
        }
        debug!(id = self.config.id.0, anchor = ?self.tracker.rect(), "anchor detached");
        self.tracker.detach();
        self.subscriptions.clear();
        if self.config.dismiss_on_anchor_detach {
            self.request_close(false, false, true);
        }
    }

    /// The viewport changed, for example on rotation or window resize.
    pub fn on_viewport_changed(&mut self, viewport: ViewportRegion) {
        if !self.state.is_attached() {
            return;
        }
        self.viewport = Some(viewport);
        self.tracker.capture(&viewport);
        if self.tracker.is_stale() {
            trace!(id = self.config.id.0, "anchor frozen; placement kept");
            return;
        }
        self.replace_while_showing();
    }

    /// The host started the animation identified by `handle`.
    pub fn on_animation_start(&mut self, handle: AnimationHandle) {
        if self.fade == Some((handle, FadeKind::In)) {
            self.surface.set_visible(true);
        }
    }

    /// The animation identified by `handle` ran to completion.
    pub fn on_animation_end(&mut self, handle: AnimationHandle) {
        match self.fade {
            Some((h, kind)) if h == handle => {
                self.fade = None;
                match kind {
                    FadeKind::In => self.fade_in_completed(),
                    FadeKind::Out => self.fade_out_completed(),
                }
            }
            _ => trace!(id = self.config.id.0, ?handle, "stale animation end"),
        }
    }

    /// The host cancelled the animation identified by `handle`. No completion effects run.
    pub fn on_animation_cancel(&mut self, handle: AnimationHandle) {
        if matches!(self.fade, Some((h, _)) if h == handle) {
            trace!(id = self.config.id.0, ?handle, "fade cancelled by host");
            self.fade = None;
        }
    }

    /// The timer identified by `handle` fired.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.activate_timer == Some(handle) {
            self.activate_timer = None;
            self.activate();
        } else if self.auto_hide_timer == Some(handle) {
            self.auto_hide_timer = None;
            debug!(id = self.config.id.0, "auto-hide");
            self.request_close(false, false, false);
        }
    }

    /// Route a pointer event. Returns true when the event is consumed.
    ///
    /// Before activation every phase is swallowed (unless the policy is
    /// [`DismissPolicy::None`]). After activation only pointer-down is considered, against the
    /// [`evaluate`] table.
    pub fn on_pointer(&mut self, phase: PointerPhase, position: kurbo::Point) -> bool {
        if !self.state.is_showing() {
            return false;
        }
        let activated = self.state == LifecycleState::Activated;
        if phase != PointerPhase::Down {
            return !activated && self.config.dismiss_policy != DismissPolicy::None;
        }
        let inside = self
            .content_bounds()
            .is_some_and(|r| r.contains_point(Point::from_kurbo(position)));
        let decision = evaluate(self.config.dismiss_policy, activated, inside);
        trace!(id = self.config.id.0, inside, ?decision, "pointer down");
        if decision.should_close {
            self.request_close(true, inside, false);
        }
        decision.consume_event
    }

    fn place(&mut self) -> Result<Placement, TooltipError> {
        let viewport = self.viewport.ok_or(TooltipError::Detached)?;
        let order = preference_order(self.preferred);
        let solution = solve(&PlacementRequest {
            anchor: self.tracker.rect(),
            content: self.surface.content_size(),
            preference: &order,
            viewport,
            clamp_to_edges: self.config.clamp_to_edges,
            arrow_padding: self.config.arrow_padding(),
        });
        if let Some(side) = solution.preference_override
            && side != self.preferred
        {
            debug!(id = self.config.id.0, from = ?self.preferred, to = ?side, "preferred side changed");
            self.preferred = side;
        }
        let placement = solution.outcome?;
        self.apply(placement);
        Ok(placement)
    }

    fn apply(&mut self, placement: Placement) {
        self.placement = Some(placement);
        self.translation = placement.draw_rect.origin();
        self.surface.set_translation(self.translation.to_vec2());
        let indicator = if self.config.hide_arrow {
            Indicator {
                side: placement.side,
                inset: 0,
                attach: None,
            }
        } else {
            Indicator {
                side: placement.side,
                inset: self.config.padding / 2,
                attach: Some(placement.attach),
            }
        };
        self.surface.set_indicator(indicator);
    }

    fn replace_while_showing(&mut self) {
        if !self.state.is_showing() {
            return;
        }
        if let Err(error) = self.place() {
            warn!(id = self.config.id.0, %error, "re-placement failed");
            self.begin_hide(HideOutcome::Fail(error), false);
        }
    }

    fn fade_in_completed(&mut self) {
        self.state = LifecycleState::Visible;
        debug!(id = self.config.id.0, "visible");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_show_completed(self.config.id);
        }
        if self.config.activate_delay.is_zero() {
            self.activate();
        } else {
            self.activate_timer = Some(self.scheduler.schedule(self.config.activate_delay));
        }
        if let Some(duration) = self.config.show_duration {
            self.auto_hide_timer = Some(self.scheduler.schedule(duration));
        }
    }

    fn activate(&mut self) {
        if self.state == LifecycleState::Visible {
            self.state = LifecycleState::Activated;
            debug!(id = self.config.id.0, "activated");
        }
    }

    fn request_close(&mut self, from_user: bool, inside: bool, immediate: bool) {
        if !self.state.is_showing() {
            return;
        }
        let event = CloseEvent {
            id: self.config.id,
            from_user,
            inside,
        };
        debug!(id = self.config.id.0, from_user, inside, "closing");
        if let Some(callback) = self.on_close.as_mut() {
            callback(event);
        }
        self.begin_hide(HideOutcome::Remove, immediate);
    }

    fn begin_hide(&mut self, outcome: HideOutcome, immediate: bool) {
        self.cancel_fade();
        self.cancel_timers();
        self.state = LifecycleState::Hiding;
        self.hide_outcome = outcome;
        debug!(id = self.config.id.0, ?outcome, "hide");
        if immediate || self.config.fade_duration.is_zero() {
            self.fade_out_completed();
            return;
        }
        let handle = self.animator.animate(Fade {
            from: self.surface.alpha(),
            to: 0.0,
            duration: self.config.fade_duration,
            delay: Duration::ZERO,
        });
        trace!(id = self.config.id.0, ?handle, "fade-out started");
        self.fade = Some((handle, FadeKind::Out));
    }

    fn fade_out_completed(&mut self) {
        self.surface.set_visible(false);
        match self.hide_outcome {
            HideOutcome::Rest => {
                self.state = LifecycleState::Attached;
                debug!(id = self.config.id.0, "hidden");
            }
            HideOutcome::Remove => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_hide_completed(self.config.id);
                }
                self.close(true);
            }
            HideOutcome::Fail(error) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_show_failed(self.config.id, &error);
                }
                self.close(true);
            }
        }
    }

    fn cancel_fade(&mut self) {
        if let Some((handle, kind)) = self.fade.take() {
            trace!(id = self.config.id.0, ?handle, ?kind, "fade cancelled");
            self.animator.cancel(handle);
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.activate_timer.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.auto_hide_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Terminal teardown. `remove_surface` asks the surface to leave the render tree.
    fn close(&mut self, remove_surface: bool) {
        self.cancel_fade();
        self.cancel_timers();
        self.subscriptions.clear();
        if remove_surface {
            self.surface.detach();
        }
        self.listener = None;
        self.on_close = None;
        self.state = LifecycleState::Closed;
        debug!(id = self.config.id.0, "closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSnapshot;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Vec2;
    use understory_placement::{NoFit, Sides, Size};

    #[derive(Clone, Debug, PartialEq)]
    enum Note {
        ShowCompleted,
        HideCompleted,
        ShowFailed(TooltipError),
        Close(CloseEvent),
    }

    #[derive(Default)]
    struct Journal {
        size: Size,
        alpha: f32,
        visible: bool,
        translation: Vec2,
        indicator: Option<Indicator>,
        prepared: Option<(String, i32, Option<i32>)>,
        text: Option<String>,
        detached: u32,
        next_handle: u64,
        animations: Vec<(AnimationHandle, Fade)>,
        cancelled_animations: Vec<AnimationHandle>,
        timers: Vec<(TimerHandle, Duration)>,
        cancelled_timers: Vec<TimerHandle>,
        notes: Vec<Note>,
        observers: u32,
    }

    #[derive(Clone, Default)]
    struct Host(Rc<RefCell<Journal>>);

    impl Host {
        fn with_size(w: i32, h: i32) -> Self {
            let host = Self::default();
            host.0.borrow_mut().size = Size::new(w, h);
            host.0.borrow_mut().alpha = 1.0;
            host
        }

        fn last_animation(&self) -> (AnimationHandle, Fade) {
            *self.0.borrow().animations.last().unwrap()
        }

        fn last_timer(&self) -> (TimerHandle, Duration) {
            *self.0.borrow().timers.last().unwrap()
        }

        fn notes(&self) -> Vec<Note> {
            self.0.borrow().notes.clone()
        }
    }

    impl Surface for Host {
        fn prepare(&mut self, content: &ContentSpec<'_>) {
            self.0.borrow_mut().prepared =
                Some((content.text.into(), content.padding, content.max_width));
        }
        fn set_text(&mut self, text: &str) {
            self.0.borrow_mut().text = Some(text.into());
        }
        fn content_size(&self) -> Size {
            self.0.borrow().size
        }
        fn set_translation(&mut self, offset: Vec2) {
            self.0.borrow_mut().translation = offset;
        }
        fn set_indicator(&mut self, indicator: Indicator) {
            self.0.borrow_mut().indicator = Some(indicator);
        }
        fn set_visible(&mut self, visible: bool) {
            self.0.borrow_mut().visible = visible;
        }
        fn alpha(&self) -> f32 {
            self.0.borrow().alpha
        }
        fn detach(&mut self) {
            self.0.borrow_mut().detached += 1;
        }
    }

    impl Animator for Host {
        fn animate(&mut self, fade: Fade) -> AnimationHandle {
            let mut j = self.0.borrow_mut();
            j.next_handle += 1;
            let handle = AnimationHandle(j.next_handle);
            j.animations.push((handle, fade));
            handle
        }
        fn cancel(&mut self, handle: AnimationHandle) {
            self.0.borrow_mut().cancelled_animations.push(handle);
        }
    }

    impl Scheduler for Host {
        fn schedule(&mut self, delay: Duration) -> TimerHandle {
            let mut j = self.0.borrow_mut();
            j.next_handle += 1;
            let handle = TimerHandle(j.next_handle);
            j.timers.push((handle, delay));
            handle
        }
        fn cancel(&mut self, handle: TimerHandle) {
            self.0.borrow_mut().cancelled_timers.push(handle);
        }
    }

    impl TooltipListener for Host {
        fn on_show_completed(&mut self, _id: TooltipId) {
            self.0.borrow_mut().notes.push(Note::ShowCompleted);
        }
        fn on_hide_completed(&mut self, _id: TooltipId) {
            self.0.borrow_mut().notes.push(Note::HideCompleted);
        }
        fn on_show_failed(&mut self, _id: TooltipId, error: &TooltipError) {
            self.0.borrow_mut().notes.push(Note::ShowFailed(*error));
        }
    }

    #[derive(Clone)]
    struct View {
        snapshot: Rc<RefCell<Option<AnchorSnapshot>>>,
        host: Host,
    }

    impl View {
        fn at(rect: Rect, host: &Host) -> Self {
            let view = Self {
                snapshot: Rc::new(RefCell::new(None)),
                host: host.clone(),
            };
            view.move_to(rect);
            view
        }

        fn move_to(&self, rect: Rect) {
            *self.snapshot.borrow_mut() = Some(AnchorSnapshot {
                visible_rect: rect,
                location: rect.origin(),
                settled: true,
            });
        }
    }

    impl AnchorLookup for View {
        fn resolve(&self) -> Option<AnchorSnapshot> {
            *self.snapshot.borrow()
        }

        fn observe(&mut self) -> Subscription {
            self.host.0.borrow_mut().observers += 1;
            let host = self.host.clone();
            Subscription::new(move || host.0.borrow_mut().observers -= 1)
        }
    }

    type ViewTooltip = Tooltip<Host, Host, Host, View>;

    fn viewport() -> ViewportRegion {
        ViewportRegion::new(Rect::new(0, 0, 400, 800), 0)
    }

    fn tooltip_with(config: TooltipConfig, anchor: Rect, host: &Host) -> (ViewTooltip, View) {
        let view = View::at(anchor, host);
        let mut tooltip = Tooltip::new(
            config,
            AnchorTarget::View(view.clone()),
            host.clone(),
            host.clone(),
            host.clone(),
        );
        tooltip.set_listener(host.clone());
        let closes = host.clone();
        tooltip.set_close_callback(move |event| {
            closes.0.borrow_mut().notes.push(Note::Close(event));
        });
        tooltip.attach(viewport());
        (tooltip, view)
    }

    fn config() -> TooltipConfig {
        TooltipConfig {
            id: TooltipId(1),
            text: "Hello".into(),
            ..Default::default()
        }
    }

    fn instant() -> TooltipConfig {
        TooltipConfig {
            fade_duration: Duration::ZERO,
            ..config()
        }
    }

    /// Show and run the fade-in to completion.
    fn shown(tooltip: &mut ViewTooltip, host: &Host) {
        tooltip.show();
        let (handle, _) = host.last_animation();
        tooltip.on_animation_start(handle);
        tooltip.on_animation_end(handle);
    }

    #[test]
    fn attach_prepares_content_and_observes_anchor() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            hide_arrow: true,
            max_width: Some(120),
            ..config()
        };
        let (tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        assert_eq!(tooltip.state(), LifecycleState::Attached);
        let j = host.0.borrow();
        assert_eq!(j.prepared, Some(("Hello".into(), 15, Some(120))));
        assert_eq!(j.observers, 1);
        assert!(!j.visible);
    }

    #[test]
    fn show_places_and_fades_in() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Showing);
        assert!(tooltip.is_showing());

        let placement = tooltip.placement().unwrap();
        assert_eq!(placement.side, Side::Bottom);
        assert_eq!(placement.draw_rect, Rect::new(100, 120, 140, 140));
        {
            let j = host.0.borrow();
            assert_eq!(j.translation, Vec2::new(100.0, 120.0));
            assert_eq!(
                j.indicator,
                Some(Indicator {
                    side: Side::Bottom,
                    inset: 15,
                    attach: Some(Point::new(5, 0)),
                })
            );
        }

        let (handle, fade) = host.last_animation();
        assert_eq!(fade.from, 0.0);
        assert_eq!(fade.to, 1.0);
        assert_eq!(fade.duration, Duration::from_millis(200));
        assert!(!host.0.borrow().visible);
        tooltip.on_animation_start(handle);
        assert!(host.0.borrow().visible);
        tooltip.on_animation_end(handle);
        assert_eq!(tooltip.state(), LifecycleState::Activated);
        assert_eq!(host.notes(), vec![Note::ShowCompleted]);
    }

    #[test]
    fn show_delay_becomes_animation_delay() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_delay: Duration::from_millis(500),
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let (_, fade) = host.last_animation();
        assert_eq!(fade.delay, Duration::from_millis(500));
        assert_eq!(fade.duration, Duration::ZERO);
        assert_eq!(tooltip.state(), LifecycleState::Showing);
    }

    #[test]
    fn zero_duration_shows_instantly() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Activated);
        assert!(host.0.borrow().visible);
        assert!(host.0.borrow().animations.is_empty());
        assert_eq!(host.notes(), vec![Note::ShowCompleted]);
    }

    #[test]
    fn activation_waits_for_timer() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            activate_delay: Duration::from_millis(300),
            dismiss_policy: DismissPolicy::TouchAnywhere,
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);
        assert_eq!(tooltip.state(), LifecycleState::Visible);

        // Grace period: the gesture is swallowed and nothing closes.
        let outside = kurbo::Point::new(5.0, 5.0);
        assert!(tooltip.on_pointer(PointerPhase::Down, outside));
        assert!(tooltip.on_pointer(PointerPhase::Move, outside));
        assert_eq!(tooltip.state(), LifecycleState::Visible);

        let (timer, delay) = host.last_timer();
        assert_eq!(delay, Duration::from_millis(300));
        tooltip.on_timer(timer);
        assert_eq!(tooltip.state(), LifecycleState::Activated);

        assert!(!tooltip.on_pointer(PointerPhase::Move, outside));
        assert!(!tooltip.on_pointer(PointerPhase::Down, outside));
        assert_eq!(tooltip.state(), LifecycleState::Hiding);
        assert_eq!(
            host.notes().last(),
            Some(&Note::Close(CloseEvent {
                id: TooltipId(1),
                from_user: true,
                inside: false,
            }))
        );
    }

    #[test]
    fn inside_tap_uses_translated_bounds() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            dismiss_policy: DismissPolicy::TouchInsideExclusive,
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        assert_eq!(tooltip.content_bounds(), Some(Rect::new(100, 120, 140, 140)));

        // Outside: consumed, stays open.
        assert!(tooltip.on_pointer(PointerPhase::Down, kurbo::Point::new(99.0, 130.0)));
        assert_eq!(tooltip.state(), LifecycleState::Activated);

        // Inside (fractional coordinates truncate): consumed and closed.
        assert!(tooltip.on_pointer(PointerPhase::Down, kurbo::Point::new(139.9, 130.5)));
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(
            host.notes(),
            vec![
                Note::ShowCompleted,
                Note::Close(CloseEvent {
                    id: TooltipId(1),
                    from_user: true,
                    inside: true,
                }),
                Note::HideCompleted,
            ]
        );
        assert_eq!(host.0.borrow().detached, 1);
    }

    #[test]
    fn none_policy_passes_everything_through() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let p = kurbo::Point::new(110.0, 130.0);
        assert!(!tooltip.on_pointer(PointerPhase::Down, p));
        assert!(!tooltip.on_pointer(PointerPhase::Up, p));
        assert_eq!(tooltip.state(), LifecycleState::Showing);
    }

    #[test]
    fn pointer_ignored_when_not_shown() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            dismiss_policy: DismissPolicy::TouchOutsideExclusive,
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        assert!(!tooltip.on_pointer(PointerPhase::Down, kurbo::Point::ZERO));
    }

    #[test]
    fn hide_fades_out_from_current_alpha_and_closes() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);
        host.0.borrow_mut().alpha = 0.75;

        tooltip.hide(true);
        assert_eq!(tooltip.state(), LifecycleState::Hiding);
        assert!(!tooltip.is_showing());
        let (handle, fade) = host.last_animation();
        assert_eq!(fade.from, 0.75);
        assert_eq!(fade.to, 0.0);

        tooltip.on_animation_end(handle);
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert!(!host.0.borrow().visible);
        assert_eq!(host.0.borrow().detached, 1);
        assert_eq!(host.0.borrow().observers, 0);
        assert_eq!(host.notes(), vec![Note::ShowCompleted, Note::HideCompleted]);
    }

    #[test]
    fn hide_is_idempotent() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);

        tooltip.hide(true);
        let animations = host.0.borrow().animations.len();
        tooltip.hide(true);
        tooltip.hide(false);
        assert_eq!(host.0.borrow().animations.len(), animations);

        let (handle, _) = host.last_animation();
        tooltip.on_animation_end(handle);
        tooltip.hide(true);
        tooltip.on_animation_end(handle);
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(host.notes(), vec![Note::ShowCompleted, Note::HideCompleted]);
        assert_eq!(host.0.borrow().detached, 1);
    }

    #[test]
    fn hide_during_fade_in_never_completes_show() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let (fade_in, _) = host.last_animation();
        tooltip.on_animation_start(fade_in);

        tooltip.hide(true);
        assert_eq!(host.0.borrow().cancelled_animations, vec![fade_in]);
        // A late completion of the cancelled fade is ignored.
        tooltip.on_animation_end(fade_in);
        assert_eq!(tooltip.state(), LifecycleState::Hiding);

        let (fade_out, _) = host.last_animation();
        tooltip.on_animation_end(fade_out);
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(host.notes(), vec![Note::HideCompleted]);
        assert!(host.0.borrow().timers.is_empty());
    }

    #[test]
    fn hide_without_remove_returns_to_attached() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);
        tooltip.hide(false);
        let (handle, _) = host.last_animation();
        tooltip.on_animation_end(handle);
        assert_eq!(tooltip.state(), LifecycleState::Attached);
        assert_eq!(host.notes(), vec![Note::ShowCompleted]);
        assert_eq!(host.0.borrow().detached, 0);

        shown(&mut tooltip, &host);
        assert_eq!(tooltip.state(), LifecycleState::Activated);
    }

    #[test]
    fn show_while_hiding_cancels_fade_out() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);
        tooltip.hide(true);
        let (fade_out, _) = host.last_animation();
        host.0.borrow_mut().alpha = 0.4;

        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Showing);
        assert_eq!(host.0.borrow().cancelled_animations, vec![fade_out]);
        let (_, fade_in) = host.last_animation();
        assert_eq!(fade_in.from, 0.4);

        tooltip.on_animation_end(fade_out);
        assert_eq!(tooltip.state(), LifecycleState::Showing);
        assert_eq!(host.notes(), vec![Note::ShowCompleted]);
    }

    #[test]
    fn auto_hide_fires_close_then_hides() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_duration: Some(Duration::from_secs(2)),
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let (timer, delay) = host.last_timer();
        assert_eq!(delay, Duration::from_secs(2));

        tooltip.on_timer(timer);
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(
            host.notes(),
            vec![
                Note::ShowCompleted,
                Note::Close(CloseEvent {
                    id: TooltipId(1),
                    from_user: false,
                    inside: false,
                }),
                Note::HideCompleted,
            ]
        );
    }

    #[test]
    fn hide_cancels_pending_timers() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_duration: Some(Duration::from_secs(2)),
            activate_delay: Duration::from_millis(100),
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let timers: Vec<TimerHandle> = host.0.borrow().timers.iter().map(|(h, _)| *h).collect();
        assert_eq!(timers.len(), 2);

        tooltip.hide(false);
        assert_eq!(host.0.borrow().cancelled_timers, timers);
        // A timer that raced the cancellation is ignored.
        tooltip.on_timer(timers[0]);
        tooltip.on_timer(timers[1]);
        assert_eq!(tooltip.state(), LifecycleState::Attached);
    }

    #[test]
    fn initial_no_fit_reports_failure_and_closes() {
        let host = Host::with_size(500, 500);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(
            host.notes(),
            vec![Note::ShowFailed(TooltipError::Placement(NoFit {
                tried: Sides::all(),
            }))]
        );
        assert_eq!(host.0.borrow().detached, 1);
        assert!(host.0.borrow().animations.is_empty());

        tooltip.show();
        tooltip.hide(true);
        assert_eq!(host.notes().len(), 1);
    }

    #[test]
    fn re_placement_failure_hides_and_reports_instead_of_hide_completed() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            clamp_to_edges: true,
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);

        // Content grows past the viewport, then the anchor moves.
        host.0.borrow_mut().size = Size::new(500, 20);
        tooltip.on_anchor_region_changed(Rect::new(110, 100, 150, 120));
        assert_eq!(tooltip.state(), LifecycleState::Hiding);
        let (handle, _) = host.last_animation();
        tooltip.on_animation_end(handle);
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(
            host.notes(),
            vec![
                Note::ShowCompleted,
                Note::ShowFailed(TooltipError::Placement(NoFit {
                    tried: Sides::all(),
                })),
            ]
        );
    }

    #[test]
    fn anchor_move_re_places() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        tooltip.on_anchor_region_changed(Rect::new(200, 300, 240, 320));
        assert_eq!(tooltip.anchor_rect(), Rect::new(200, 300, 240, 320));
        assert_eq!(
            tooltip.placement().unwrap().draw_rect,
            Rect::new(200, 320, 240, 340)
        );
        assert_eq!(host.0.borrow().translation, Vec2::new(200.0, 320.0));

        // Off-viewport updates keep the last placement.
        tooltip.on_anchor_region_changed(Rect::new(900, 300, 940, 320));
        assert_eq!(tooltip.anchor_rect(), Rect::new(200, 300, 240, 320));
    }

    #[test]
    fn left_overflow_persists_right_preference() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            side: Side::Left,
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(10, 100, 30, 120), &host);
        tooltip.show();
        assert_eq!(tooltip.placement().unwrap().side, Side::Right);
        assert_eq!(tooltip.preferred_side(), Side::Right);

        // Room on the left now, but Right stays first.
        tooltip.on_anchor_region_changed(Rect::new(200, 100, 220, 120));
        assert_eq!(tooltip.placement().unwrap().side, Side::Right);
    }

    #[test]
    fn redraw_delta_shifts_without_solving() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, view) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        view.move_to(Rect::new(100, 80, 140, 100));
        tooltip.on_anchor_about_to_redraw();
        assert_eq!(tooltip.anchor_rect(), Rect::new(100, 80, 140, 100));
        assert_eq!(
            tooltip.placement().unwrap().draw_rect,
            Rect::new(100, 100, 140, 120)
        );
        assert_eq!(host.0.borrow().translation, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn set_offset_translates_relative_to_anchor() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.set_offset(10, 10);
        assert_eq!(host.0.borrow().translation, Vec2::ZERO);

        tooltip.show();
        tooltip.set_offset(110, 90);
        assert_eq!(host.0.borrow().translation, Vec2::new(110.0, 110.0));
        assert_eq!(tooltip.content_bounds(), Some(Rect::new(110, 110, 150, 130)));
    }

    #[test]
    fn anchor_detach_freezes_and_optionally_closes() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, view) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        tooltip.on_anchor_detached();
        assert_eq!(host.0.borrow().observers, 0);
        assert_eq!(tooltip.state(), LifecycleState::Activated);
        view.move_to(Rect::new(0, 0, 10, 10));
        tooltip.on_anchor_region_changed(Rect::new(0, 0, 10, 10));
        tooltip.on_anchor_about_to_redraw();
        assert_eq!(tooltip.anchor_rect(), Rect::new(100, 100, 140, 120));
        // Explicit hide still proceeds.
        tooltip.hide(true);
        assert_eq!(tooltip.state(), LifecycleState::Closed);

        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            dismiss_on_anchor_detach: true,
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        shown(&mut tooltip, &host);
        let animations = host.0.borrow().animations.len();
        tooltip.on_anchor_detached();
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(host.0.borrow().animations.len(), animations);
        assert!(matches!(
            host.notes()[1],
            Note::Close(CloseEvent {
                from_user: false,
                ..
            })
        ));
    }

    #[test]
    fn frozen_anchor_keeps_placement_across_viewport_changes() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let before = tooltip.placement();
        tooltip.on_anchor_detached();

        // Without the frozen anchor this viewport would force a Left placement.
        tooltip.on_viewport_changed(ViewportRegion::new(Rect::new(0, 0, 400, 130), 0));
        assert_eq!(tooltip.placement(), before);
        assert_eq!(tooltip.state(), LifecycleState::Activated);
        assert_eq!(host.0.borrow().translation, Vec2::new(100.0, 120.0));
    }

    #[test]
    fn set_offset_after_close_is_ignored() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        tooltip.hide(true);
        assert_eq!(tooltip.state(), LifecycleState::Closed);

        tooltip.set_offset(300, 300);
        assert_eq!(host.0.borrow().translation, Vec2::new(100.0, 120.0));
    }

    #[test]
    fn repeated_show_does_not_stack_timers() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_duration: Some(Duration::from_secs(2)),
            activate_delay: Duration::from_millis(100),
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        tooltip.show();
        assert_eq!(host.0.borrow().animations.len(), 1);

        let (fade_in, _) = host.last_animation();
        tooltip.on_animation_end(fade_in);
        assert_eq!(tooltip.state(), LifecycleState::Visible);
        tooltip.show();
        let (activate, _) = host.0.borrow().timers[0];
        tooltip.on_timer(activate);
        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Activated);
        assert_eq!(host.0.borrow().timers.len(), 2);
        assert_eq!(host.0.borrow().animations.len(), 1);

        // Re-showing after a hide replaces the timers instead of adding to them.
        tooltip.hide(false);
        let (fade_out, _) = host.last_animation();
        tooltip.on_animation_end(fade_out);
        let cancelled = host.0.borrow().cancelled_timers.len();
        assert_eq!(cancelled, 1);
        tooltip.show();
        let (fade_in, _) = host.last_animation();
        tooltip.on_animation_end(fade_in);
        assert_eq!(host.0.borrow().timers.len(), 4);
        assert_eq!(host.notes(), vec![Note::ShowCompleted, Note::ShowCompleted]);

        // Only the live auto-hide timer closes the tooltip.
        let (stale_auto_hide, _) = host.0.borrow().timers[1];
        tooltip.on_timer(stale_auto_hide);
        assert_eq!(tooltip.state(), LifecycleState::Visible);
        let (auto_hide, _) = host.last_timer();
        tooltip.on_timer(auto_hide);
        assert_eq!(tooltip.state(), LifecycleState::Hiding);
    }

    #[test]
    fn host_cancelled_fade_in_has_no_completion_effects() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_duration: Some(Duration::from_secs(2)),
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let (fade_in, _) = host.last_animation();
        tooltip.on_animation_start(fade_in);
        tooltip.on_animation_cancel(fade_in);
        // A completion racing the cancellation is ignored.
        tooltip.on_animation_end(fade_in);

        assert_eq!(tooltip.state(), LifecycleState::Showing);
        assert!(host.notes().is_empty());
        assert!(host.0.borrow().timers.is_empty());

        // Hiding still works and does not try to cancel the dead fade.
        tooltip.hide(true);
        assert!(host.0.borrow().cancelled_animations.is_empty());
        let (fade_out, _) = host.last_animation();
        tooltip.on_animation_end(fade_out);
        assert_eq!(host.notes(), vec![Note::HideCompleted]);
    }

    #[test]
    fn show_with_vanished_anchor_is_ignored() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, view) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        *view.snapshot.borrow_mut() = None;
        tooltip.show();
        assert_eq!(tooltip.state(), LifecycleState::Attached);
        assert!(host.notes().is_empty());
    }

    #[test]
    fn show_re_measures_anchor() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, view) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        view.move_to(Rect::new(200, 100, 240, 120));
        tooltip.show();
        assert_eq!(
            tooltip.placement().unwrap().draw_rect,
            Rect::new(200, 120, 240, 140)
        );
    }

    #[test]
    fn forced_detach_is_silent_and_idempotent() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            show_duration: Some(Duration::from_secs(1)),
            ..config()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        let (fade_in, _) = host.last_animation();

        tooltip.detach();
        tooltip.detach();
        assert_eq!(tooltip.state(), LifecycleState::Closed);
        assert_eq!(host.0.borrow().cancelled_animations, vec![fade_in]);
        assert_eq!(host.0.borrow().detached, 0);
        assert_eq!(host.0.borrow().observers, 0);

        tooltip.on_animation_end(fade_in);
        tooltip.show();
        tooltip.hide(true);
        assert!(host.notes().is_empty());
    }

    #[test]
    fn operations_before_attach_are_no_ops() {
        let host = Host::with_size(40, 20);
        let view = View::at(Rect::new(100, 100, 140, 120), &host);
        let mut tooltip: ViewTooltip = Tooltip::new(
            config(),
            AnchorTarget::View(view),
            host.clone(),
            host.clone(),
            host.clone(),
        );
        tooltip.show();
        tooltip.hide(true);
        tooltip.on_anchor_region_changed(Rect::new(0, 0, 10, 10));
        assert_eq!(tooltip.state(), LifecycleState::Idle);
        assert!(!tooltip.is_attached());
        assert!(host.0.borrow().prepared.is_none());
    }

    #[test]
    fn point_anchor_sits_below_reserved_band() {
        let host = Host::with_size(40, 20);
        let mut tooltip = Tooltip::at_point(
            instant(),
            Point::new(200, 100),
            host.clone(),
            host.clone(),
            host.clone(),
        );
        tooltip.attach(ViewportRegion::new(Rect::new(0, 0, 400, 800), 24));
        tooltip.show();
        assert_eq!(tooltip.anchor_rect(), Rect::from_point(Point::new(200, 124)));
        assert_eq!(
            tooltip.placement().unwrap().draw_rect,
            Rect::new(180, 124, 220, 144)
        );
    }

    #[test]
    fn viewport_change_re_places() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(instant(), Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        // A shorter viewport leaves no room below the anchor.
        tooltip.on_viewport_changed(ViewportRegion::new(Rect::new(0, 0, 400, 130), 0));
        assert_eq!(tooltip.placement().unwrap().side, Side::Left);
    }

    #[test]
    fn set_text_forwards_to_surface() {
        let host = Host::with_size(40, 20);
        let (mut tooltip, _) = tooltip_with(config(), Rect::new(100, 100, 140, 120), &host);
        tooltip.set_text("Updated");
        assert_eq!(tooltip.text(), "Updated");
        assert_eq!(host.0.borrow().text.as_deref(), Some("Updated"));
    }

    #[test]
    fn hidden_arrow_clears_indicator() {
        let host = Host::with_size(40, 20);
        let cfg = TooltipConfig {
            hide_arrow: true,
            ..instant()
        };
        let (mut tooltip, _) = tooltip_with(cfg, Rect::new(100, 100, 140, 120), &host);
        tooltip.show();
        assert_eq!(
            host.0.borrow().indicator,
            Some(Indicator {
                side: Side::Bottom,
                inset: 0,
                attach: None,
            })
        );
    }
}

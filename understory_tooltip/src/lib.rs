// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tooltip --heading-base-level=0

//! Understory Tooltip: an anchored tooltip lifecycle for UI hosts.
//!
//! ## Overview
//!
//! A [`Tooltip`](tooltip::Tooltip) floats a small piece of content next to an anchor, picks the
//! side it goes on with [`understory_placement`], and owns its own show and hide sequencing:
//!
//! - Attach to the render tree, capturing the viewport and measuring the anchor.
//! - Show with an optional delay and fade-in, then activate after a grace period.
//! - Track the anchor as it moves, re-placing on layout and shifting on every redraw.
//! - Dismiss on touch according to a [`DismissPolicy`](types::DismissPolicy), or after a timeout.
//! - Hide with a fade-out, then close.
//!
//! The crate draws nothing and owns no clock. The host supplies a
//! [`Surface`](host::Surface) for the content node, an [`Animator`](host::Animator) for fades,
//! a [`Scheduler`](host::Scheduler) for timers, and an [`AnchorLookup`](anchor::AnchorLookup)
//! that resolves the anchor without owning it. All transitions run on the caller's thread.
//!
//! ## Modules
//!
//! - [`tooltip`]: the lifecycle state machine.
//! - [`anchor`]: anchor tracking with coarse and fine movement signals.
//! - [`dismiss`]: the touch dismissal decision table.
//! - [`host`]: capability traits and handles.
//! - [`types`]: states, configuration, callbacks.
//! - [`error`]: placement and liveness errors.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use understory_placement::{Point, Rect, Side, Size, ViewportRegion};
//! use understory_tooltip::host::{
//!     AnimationHandle, Animator, ContentSpec, Fade, Indicator, Scheduler, Surface, TimerHandle,
//! };
//! use understory_tooltip::tooltip::Tooltip;
//! use understory_tooltip::types::{LifecycleState, TooltipConfig};
//!
//! #[derive(Default)]
//! struct Host {
//!     next: u64,
//!     offset: Vec2,
//! }
//!
//! impl Surface for Host {
//!     fn prepare(&mut self, _content: &ContentSpec<'_>) {}
//!     fn set_text(&mut self, _text: &str) {}
//!     fn content_size(&self) -> Size { Size::new(80, 24) }
//!     fn set_translation(&mut self, offset: Vec2) { self.offset = offset; }
//!     fn set_indicator(&mut self, _indicator: Indicator) {}
//!     fn set_visible(&mut self, _visible: bool) {}
//!     fn detach(&mut self) {}
//! }
//! impl Animator for Host {
//!     fn animate(&mut self, _fade: Fade) -> AnimationHandle { self.next += 1; AnimationHandle(self.next) }
//!     fn cancel(&mut self, _handle: AnimationHandle) {}
//! }
//! impl Scheduler for Host {
//!     fn schedule(&mut self, _delay: Duration) -> TimerHandle { self.next += 1; TimerHandle(self.next) }
//!     fn cancel(&mut self, _handle: TimerHandle) {}
//! }
//!
//! let config = TooltipConfig { side: Side::Top, text: "Copy".into(), ..Default::default() };
//! let mut tooltip = Tooltip::at_point(
//!     config,
//!     Point::new(200, 300),
//!     Host::default(),
//!     Host::default(),
//!     Host::default(),
//! );
//! tooltip.attach(ViewportRegion::new(Rect::new(0, 0, 400, 800), 0));
//! tooltip.show();
//!
//! // The fade-in was handed to the animator; report it finished.
//! tooltip.on_animation_end(AnimationHandle(1));
//! assert_eq!(tooltip.state(), LifecycleState::Activated);
//! assert_eq!(tooltip.placement().unwrap().draw_rect, Rect::new(160, 276, 240, 300));
//! assert_eq!(tooltip.surface().offset, Vec2::new(160.0, 276.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod anchor;
pub mod dismiss;
pub mod error;
pub mod host;
pub mod tooltip;
pub mod types;

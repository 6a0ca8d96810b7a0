// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip lifecycle on a simulated host.
//!
//! A tiny virtual clock stands in for the host's animation and timer primitives. The tooltip
//! is shown next to an anchor, follows it as it scrolls, ignores a tap during its activation
//! grace period, and is finally dismissed by an outside tap. Lifecycle transitions are logged
//! through `tracing`.
//!
//! Run:
//! - `cargo run -p understory_tooltip_demos --example tooltip_lifecycle`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::Vec2;
use understory_placement::{Rect, Side, Size, ViewportRegion};
use understory_tooltip::anchor::{AnchorLookup, AnchorSnapshot, AnchorTarget};
use understory_tooltip::host::{
    AnimationHandle, Animator, ContentSpec, Fade, Indicator, Scheduler, Subscription, Surface,
    TimerHandle,
};
use understory_tooltip::tooltip::Tooltip;
use understory_tooltip::types::{
    DismissPolicy, PointerPhase, TooltipConfig, TooltipId, TooltipListener,
};

#[derive(Copy, Clone, Debug)]
enum Due {
    AnimationStart(AnimationHandle),
    AnimationEnd(AnimationHandle),
    Timer(TimerHandle),
}

/// Virtual clock shared by the animator and scheduler.
#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    queue: Vec<(Duration, Due)>,
}

impl Clock {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Pop everything due up to `until`, in time order.
    fn advance(&mut self, until: Duration) -> Vec<Due> {
        self.queue.sort_by_key(|(at, _)| *at);
        let split = self.queue.partition_point(|(at, _)| *at <= until);
        self.now = until;
        self.queue.drain(..split).map(|(_, due)| due).collect()
    }
}

#[derive(Clone, Default)]
struct Host(Rc<RefCell<Clock>>);

impl Animator for Host {
    fn animate(&mut self, fade: Fade) -> AnimationHandle {
        let mut clock = self.0.borrow_mut();
        let handle = AnimationHandle(clock.next_id());
        let start = clock.now + fade.delay;
        clock.queue.push((start, Due::AnimationStart(handle)));
        clock
            .queue
            .push((start + fade.duration, Due::AnimationEnd(handle)));
        handle
    }

    fn cancel(&mut self, handle: AnimationHandle) {
        self.0.borrow_mut().queue.retain(|(_, due)| {
            !matches!(due, Due::AnimationStart(h) | Due::AnimationEnd(h) if *h == handle)
        });
    }
}

impl Scheduler for Host {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let mut clock = self.0.borrow_mut();
        let handle = TimerHandle(clock.next_id());
        let at = clock.now + delay;
        clock.queue.push((at, Due::Timer(handle)));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.0
            .borrow_mut()
            .queue
            .retain(|(_, due)| !matches!(due, Due::Timer(h) if *h == handle));
    }
}

/// Content node that prints what it is asked to do.
#[derive(Debug, Default)]
struct Bubble {
    size: Size,
}

impl Surface for Bubble {
    fn prepare(&mut self, content: &ContentSpec<'_>) {
        // Rough text measurement: 8px per character plus padding.
        let width = 8 * i32::try_from(content.text.len()).unwrap_or(i32::MAX) + content.padding;
        self.size = Size::new(width, 16 + content.padding);
        println!("  surface: prepared {:?} as {:?}", content.text, self.size);
    }
    fn set_text(&mut self, text: &str) {
        println!("  surface: text {text:?}");
    }
    fn content_size(&self) -> Size {
        self.size
    }
    fn set_translation(&mut self, offset: Vec2) {
        println!("  surface: translate to ({}, {})", offset.x, offset.y);
    }
    fn set_indicator(&mut self, indicator: Indicator) {
        println!("  surface: indicator {indicator:?}");
    }
    fn set_visible(&mut self, visible: bool) {
        println!("  surface: visible = {visible}");
    }
    fn detach(&mut self) {
        println!("  surface: detached");
    }
}

/// A scrolling list row the tooltip points at.
#[derive(Clone)]
struct Row(Rc<RefCell<Rect>>);

impl AnchorLookup for Row {
    fn resolve(&self) -> Option<AnchorSnapshot> {
        let rect = *self.0.borrow();
        Some(AnchorSnapshot {
            visible_rect: rect,
            location: rect.origin(),
            settled: true,
        })
    }

    fn observe(&mut self) -> Subscription {
        println!("  anchor: observing");
        Subscription::new(|| println!("  anchor: observer released"))
    }
}

struct Printer;

impl TooltipListener for Printer {
    fn on_show_completed(&mut self, id: TooltipId) {
        println!("listener: {id:?} shown");
    }
    fn on_hide_completed(&mut self, id: TooltipId) {
        println!("listener: {id:?} hidden");
    }
}

type Demo = Tooltip<Bubble, Host, Host, Row>;

fn run_until(tooltip: &mut Demo, host: &Host, at: Duration) {
    let due = host.0.borrow_mut().advance(at);
    for event in due {
        match event {
            Due::AnimationStart(h) => tooltip.on_animation_start(h),
            Due::AnimationEnd(h) => tooltip.on_animation_end(h),
            Due::Timer(h) => tooltip.on_timer(h),
        }
    }
    println!("t={:>4}ms state={:?}", at.as_millis(), tooltip.state());
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let host = Host::default();
    let row = Row(Rc::new(RefCell::new(Rect::new(40, 300, 320, 348))));
    let config = TooltipConfig {
        id: TooltipId(1),
        text: "Swipe to archive".into(),
        side: Side::Top,
        dismiss_policy: DismissPolicy::TouchOutside,
        activate_delay: Duration::from_millis(400),
        show_duration: Some(Duration::from_secs(5)),
        ..Default::default()
    };

    let mut tooltip: Demo = Tooltip::new(
        config,
        AnchorTarget::View(row.clone()),
        Bubble::default(),
        host.clone(),
        host.clone(),
    );
    tooltip.set_listener(Printer);
    tooltip.set_close_callback(|event| println!("close callback: {event:?}"));

    tooltip.attach(ViewportRegion::new(Rect::new(0, 0, 360, 640), 24));
    tooltip.show();
    println!("placed: {:?}", tooltip.placement());
    run_until(&mut tooltip, &host, Duration::from_millis(200));

    // The list scrolls by 40px; the tooltip follows on the next frame.
    *row.0.borrow_mut() = Rect::new(40, 260, 320, 308);
    tooltip.on_anchor_about_to_redraw();
    println!("following: {:?}", tooltip.content_bounds());

    // Tapping during the grace period is swallowed.
    let consumed = tooltip.on_pointer(PointerPhase::Down, kurbo::Point::new(10.0, 10.0));
    println!("early tap consumed = {consumed}, state = {:?}", tooltip.state());

    run_until(&mut tooltip, &host, Duration::from_millis(600));
    let consumed = tooltip.on_pointer(PointerPhase::Down, kurbo::Point::new(10.0, 10.0));
    println!("outside tap consumed = {consumed}, state = {:?}", tooltip.state());
    run_until(&mut tooltip, &host, Duration::from_millis(800));
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics.
//!
//! Solves one tooltip placement per anchor and prints where the content lands, which side
//! the solver settled on, and how the preferred side evolves after a left-edge overflow.
//!
//! Run:
//! - `cargo run -p understory_tooltip_demos --example placement_basics`

use understory_placement::{
    PlacementRequest, Rect, Side, Size, ViewportRegion, preference_order, solve,
};

fn main() {
    let viewport = ViewportRegion::new(Rect::new(0, 0, 360, 640), 24);
    let content = Size::new(120, 40);
    let mut preferred = Side::Left;

    let anchors = [
        ("toolbar button", Rect::new(8, 30, 48, 70)),
        ("centered field", Rect::new(120, 300, 240, 340)),
        ("bottom bar", Rect::new(300, 600, 352, 636)),
    ];

    for (name, anchor) in anchors {
        let order = preference_order(preferred);
        let solution = solve(&PlacementRequest {
            anchor,
            content,
            preference: &order,
            viewport,
            clamp_to_edges: true,
            arrow_padding: Some(30),
        });
        match solution.outcome {
            Ok(placement) => println!(
                "{name}: {:?} at {:?}, arrow at {:?}",
                placement.side, placement.draw_rect, placement.attach
            ),
            Err(err) => println!("{name}: {err}"),
        }
        if let Some(side) = solution.preference_override {
            println!("  preferred side is now {side:?}");
            preferred = side;
        }
    }

    // Kurbo interop for hosts that render with floating-point geometry.
    let anchor = Rect::from_kurbo(kurbo::Rect::new(10.4, 20.6, 50.5, 60.0));
    println!("rounded anchor: {anchor:?} -> {:?}", kurbo::Rect::from(anchor));
}

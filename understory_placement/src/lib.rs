// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: a deterministic, `no_std` solver for anchored overlays.
//!
//! ## Overview
//!
//! Given an anchor rectangle, a content size, an ordered list of preferred [`Side`]s, and a
//! [`ViewportRegion`], [`solve`] computes where the content should be drawn, which side it
//! ended up on, and where a directional indicator (an arrow pointing at the anchor) attaches.
//!
//! The solver is a pure function. It never mutates shared state, so the same request always
//! produces the same [`Solution`]. State that must persist between solves (the preferred side
//! after a left-edge overflow) is returned in [`Solution::preference_override`] for the caller
//! to thread into the next request.
//!
//! ## Geometry
//!
//! Coordinates are integers in viewport space. [`Rect`] normalizes its edges on construction.
//! [`ViewportRegion`] pairs the visible rectangle with a reserved band at the top that content
//! must stay below. With the `kurbo` feature, the types convert to and from Kurbo geometry.
//!
//! ## Example
//!
//! ```
//! use understory_placement::{PlacementRequest, Rect, Side, Size, ViewportRegion, preference_order, solve};
//!
//! let order = preference_order(Side::Bottom);
//! let request = PlacementRequest {
//!     anchor: Rect::new(80, 170, 120, 190),
//!     content: Size::new(40, 30),
//!     preference: &order,
//!     viewport: ViewportRegion::new(Rect::new(0, 0, 200, 200), 0),
//!     clamp_to_edges: true,
//!     arrow_padding: None,
//! };
//!
//! // No room below the anchor, so the solver falls back to the next side.
//! let placement = solve(&request).outcome.unwrap();
//! assert_eq!(placement.side, Side::Left);
//! assert_eq!(placement.draw_rect, Rect::new(40, 165, 80, 195));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod side;
pub mod solver;
pub mod types;

pub use side::{Axis, Side, Sides, preference_order};
pub use solver::{
    NoFit, Placement, PlacementRequest, Rejection, Solution, anchor_point, candidate_rect, fit,
    solve,
};
pub use types::{Point, Rect, Size, ViewportRegion};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement sides, side sets, and preference ordering.

/// The edge of the anchor that content is placed against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Content to the left of the anchor, vertically centered.
    Left,
    /// Content to the right of the anchor, vertically centered.
    Right,
    /// Content above the anchor, horizontally centered.
    Top,
    /// Content below the anchor, horizontally centered.
    Bottom,
    /// Content centered over the anchor.
    Center,
}

/// Axis of a two-dimensional layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The `x` axis.
    Horizontal,
    /// The `y` axis.
    Vertical,
}

impl Side {
    /// Canonical fallback order consulted after the preferred side.
    pub const FALLBACK_ORDER: [Self; 5] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::Center,
    ];

    /// Axis along which content may slide while staying attached to this side.
    ///
    /// `None` for [`Side::Center`], which may slide along both axes.
    pub const fn slide_axis(self) -> Option<Axis> {
        match self {
            Self::Top | Self::Bottom => Some(Axis::Horizontal),
            Self::Left | Self::Right => Some(Axis::Vertical),
            Self::Center => None,
        }
    }

    /// Axis that decides whether this side has room at all.
    pub const fn perpendicular_axis(self) -> Option<Axis> {
        match self {
            Self::Top | Self::Bottom => Some(Axis::Vertical),
            Self::Left | Self::Right => Some(Axis::Horizontal),
            Self::Center => None,
        }
    }

    /// True when the content's far edge (away from the anchor) is the one with
    /// the larger coordinate on the perpendicular axis.
    pub(crate) const fn grows_forward(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }
}

bitflags::bitflags! {
    /// A set of [`Side`]s, used to report which sides a solve tried.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Sides: u8 {
        /// [`Side::Left`].
        const LEFT   = 0b0000_0001;
        /// [`Side::Right`].
        const RIGHT  = 0b0000_0010;
        /// [`Side::Top`].
        const TOP    = 0b0000_0100;
        /// [`Side::Bottom`].
        const BOTTOM = 0b0000_1000;
        /// [`Side::Center`].
        const CENTER = 0b0001_0000;
    }
}

impl From<Side> for Sides {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Self::LEFT,
            Side::Right => Self::RIGHT,
            Side::Top => Self::TOP,
            Side::Bottom => Self::BOTTOM,
            Side::Center => Self::CENTER,
        }
    }
}

/// The preference list for `preferred`: that side first, then the remaining
/// sides in [`Side::FALLBACK_ORDER`].
pub fn preference_order(preferred: Side) -> [Side; 5] {
    let mut out = [preferred; 5];
    let mut i = 1;
    for side in Side::FALLBACK_ORDER {
        if side != preferred {
            out[i] = side;
            i += 1;
        }
    }
    out
}

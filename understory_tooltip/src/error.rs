// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while placing a tooltip.

use thiserror::Error;
use understory_placement::NoFit;

/// Why a tooltip could not be placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum TooltipError {
    /// No side fits the viewport. Terminal for the current show attempt.
    #[error(transparent)]
    Placement(#[from] NoFit),
    /// The anchor is no longer reachable; its last known rect is frozen.
    #[error("anchor is no longer reachable")]
    StaleAnchor,
    /// The tooltip is not attached to the render tree.
    #[error("tooltip is not attached")]
    Detached,
}

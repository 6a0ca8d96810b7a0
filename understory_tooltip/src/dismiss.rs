// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch dismissal: decide whether a pointer-down closes the tooltip and whether it is consumed.
//!
//! [`evaluate`] is a pure lookup over the policy, the activation state, and whether the
//! pointer-down landed inside the content bounds. It only applies to the initial pointer-down
//! of a gesture.
//!
//! ## Minimal example
//!
//! ```
//! use understory_tooltip::dismiss::{DismissDecision, evaluate};
//! use understory_tooltip::types::DismissPolicy;
//!
//! // Before activation the gesture is swallowed without closing.
//! assert_eq!(
//!     evaluate(DismissPolicy::TouchAnywhere, false, true),
//!     DismissDecision { should_close: false, consume_event: true },
//! );
//! // Once active, an outside tap closes and passes through.
//! assert_eq!(
//!     evaluate(DismissPolicy::TouchAnywhere, true, false),
//!     DismissDecision { should_close: true, consume_event: false },
//! );
//! ```

use crate::types::DismissPolicy;

/// Result of [`evaluate`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DismissDecision {
    /// Start hiding the tooltip.
    pub should_close: bool,
    /// Stop the event from reaching the UI underneath.
    pub consume_event: bool,
}

impl DismissDecision {
    const fn new(should_close: bool, consume_event: bool) -> Self {
        Self {
            should_close,
            consume_event,
        }
    }
}

/// Decide how a pointer-down is handled.
///
/// | Policy                  | Inside          | Outside         |
/// |-------------------------|-----------------|-----------------|
/// | `None`                  | keep, pass      | keep, pass      |
/// | `TouchInside`           | close, pass     | keep, pass      |
/// | `TouchInsideExclusive`  | close, consume  | keep, consume   |
/// | `TouchOutside`          | close, consume  | close, pass     |
/// | `TouchOutsideExclusive` | close, consume  | close, consume  |
/// | `TouchAnywhere`         | close, pass     | close, pass     |
///
/// Before activation every policy but `None` keeps the tooltip and consumes the event.
pub const fn evaluate(policy: DismissPolicy, activated: bool, inside: bool) -> DismissDecision {
    if matches!(policy, DismissPolicy::None) {
        return DismissDecision::new(false, false);
    }
    if !activated {
        return DismissDecision::new(false, true);
    }
    match policy {
        DismissPolicy::None => DismissDecision::new(false, false),
        DismissPolicy::TouchInside => DismissDecision::new(inside, false),
        DismissPolicy::TouchInsideExclusive => DismissDecision::new(inside, true),
        DismissPolicy::TouchOutside => DismissDecision::new(true, inside),
        DismissPolicy::TouchOutsideExclusive => DismissDecision::new(true, true),
        DismissPolicy::TouchAnywhere => DismissDecision::new(true, false),
    }
}

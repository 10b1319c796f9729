#![forbid(unsafe_code)]

//! Last-known pointer position.
//!
//! [`PointerTracker`] is independent of gesture state: every pointer move and
//! every two-contact touch move overwrites the position, and it is never
//! cleared. Other components read it for the live pointer indicator and as
//! the hit-test coordinate when a pinch fires.

use crate::geometry::PointerPosition;

/// Holds the single most recent pointer coordinate.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: PointerPosition,
}

impl PointerTracker {
    /// Tracker starting at the surface origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally overwrite the position.
    pub fn on_move(&mut self, x: f64, y: f64) {
        self.position = PointerPosition::new(x, y);
    }

    /// Overwrite the position with the midpoint of two contacts.
    pub fn on_two_touch_move(&mut self, a: PointerPosition, b: PointerPosition) {
        self.position = a.midpoint(b);
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> PointerPosition {
        self.position
    }
}

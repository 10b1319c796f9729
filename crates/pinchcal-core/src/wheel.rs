#![forbid(unsafe_code)]

//! Desktop stand-in for pinch: a modified scroll wheel.
//!
//! Each qualifying tick is evaluated independently against the shared
//! [`CooldownClock`]; there is no baseline or session. Scrolling down
//! (`dy > 0`) maps to pinch-in, anything else to pinch-out.

use web_time::Instant;

use crate::cooldown::CooldownClock;
use crate::geometry::PointerPosition;
use crate::pinch::{PinchEvent, PinchKind, PinchSource};

/// Result of feeding one wheel tick to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelOutcome {
    /// The host must cancel its default scroll action.
    pub suppress_default: bool,
    pub pinch: Option<PinchEvent>,
}

/// Maps modified wheel ticks onto the pinch vocabulary.
#[derive(Debug, Clone, Default)]
pub struct WheelGestureAdapter;

impl WheelGestureAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate a wheel tick.
    ///
    /// Without the modifier this is a no-op: nothing is suppressed, nothing
    /// is emitted, the cooldown is untouched. With the modifier the default
    /// scroll is always suppressed, even when the cooldown swallows the tick.
    pub fn on_wheel(
        &self,
        delta_y: f64,
        modifier_held: bool,
        now: Instant,
        pos: PointerPosition,
        cooldown: &mut CooldownClock,
    ) -> WheelOutcome {
        if !modifier_held {
            return WheelOutcome::default();
        }

        if !cooldown.is_open(now) {
            tracing::trace!(target: "pinchcal.gesture", delta_y, "wheel pinch inside cooldown");
            return WheelOutcome {
                suppress_default: true,
                pinch: None,
            };
        }

        let kind = if delta_y > 0.0 {
            PinchKind::In
        } else {
            PinchKind::Out
        };
        cooldown.fire(now);
        tracing::debug!(target: "pinchcal.gesture", ?kind, delta_y, "wheel pinch emitted");

        WheelOutcome {
            suppress_default: true,
            pinch: Some(PinchEvent::new(kind, pos, PinchSource::Wheel, now)),
        }
    }
}

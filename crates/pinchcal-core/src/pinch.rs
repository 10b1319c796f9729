#![forbid(unsafe_code)]

//! Two-contact pinch session.
//!
//! # State Machine
//!
//! ```text
//! Idle ──begin──▶ Tracking ──update (ratio past threshold, cooldown open)──▶ Idle + PinchEvent
//!                    │  ▲
//!                    │  └── begin (new baseline supersedes the old one)
//!                    └── end ──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`GestureBaseline`] exists at a time.
//! 2. A session emits at most one event per `begin()`; emission consumes the
//!    baseline, so fingers left on the glass need a fresh two-contact
//!    re-engagement before another pinch can fire.
//! 3. The shared [`CooldownClock`] is updated only when an event is emitted.
//!
//! # Failure Modes
//!
//! - Zero or non-finite baseline distance: the ratio is treated as 1.0 and no
//!   event fires.
//! - `update()` while idle and `end()` while idle are no-ops.

use web_time::Instant;

use crate::cooldown::CooldownClock;
use crate::geometry::PointerPosition;

// ---------------------------------------------------------------------------
// PinchEvent
// ---------------------------------------------------------------------------

/// Direction of a recognized pinch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinchKind {
    /// Contacts moved together ("zoom out").
    In,
    /// Contacts moved apart ("zoom in" / drill down).
    Out,
}

/// Which input produced a pinch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinchSource {
    Touch,
    Wheel,
}

/// A discrete pinch event with the pointer position at emission time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    pub kind: PinchKind,
    pub pos: PointerPosition,
    pub source: PinchSource,
    pub at: Instant,
}

impl PinchEvent {
    #[must_use]
    pub const fn new(kind: PinchKind, pos: PointerPosition, source: PinchSource, at: Instant) -> Self {
        Self {
            kind,
            pos,
            source,
            at,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_in(&self) -> bool {
        matches!(self.kind, PinchKind::In)
    }

    #[inline]
    #[must_use]
    pub const fn is_out(&self) -> bool {
        matches!(self.kind, PinchKind::Out)
    }
}

/// Classify a distance ratio against a fractional threshold.
///
/// `ratio < 1 - threshold` is a pinch-in, `ratio > 1 + threshold` a
/// pinch-out; the closed band in between (and NaN) is neutral.
#[must_use]
pub fn classify_ratio(ratio: f64, threshold: f64) -> Option<PinchKind> {
    if ratio < 1.0 - threshold {
        Some(PinchKind::In)
    } else if ratio > 1.0 + threshold {
        Some(PinchKind::Out)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// PinchSession
// ---------------------------------------------------------------------------

/// Contact separation recorded when a two-contact gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureBaseline {
    pub distance: f64,
    pub captured_at: Instant,
}

/// Lifecycle of a single two-contact gesture.
#[derive(Debug, Clone)]
pub struct PinchSession {
    threshold: f64,
    baseline: Option<GestureBaseline>,
}

impl PinchSession {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            baseline: None,
        }
    }

    /// Start tracking from `distance`. Supersedes any existing baseline.
    pub fn begin(&mut self, distance: f64, now: Instant) {
        if self.baseline.is_some() {
            tracing::trace!(target: "pinchcal.gesture", distance, "pinch baseline superseded");
        }
        self.baseline = Some(GestureBaseline {
            distance,
            captured_at: now,
        });
    }

    /// Evaluate the current contact distance.
    ///
    /// Returns the emitted event, if any. Emission records `now` on `cooldown`
    /// and returns the session to idle.
    pub fn update(
        &mut self,
        current_distance: f64,
        now: Instant,
        pos: PointerPosition,
        cooldown: &mut CooldownClock,
    ) -> Option<PinchEvent> {
        let baseline = self.baseline?;
        let ratio = Self::ratio(baseline.distance, current_distance);

        if !cooldown.is_open(now) {
            return None;
        }

        let kind = classify_ratio(ratio, self.threshold)?;
        cooldown.fire(now);
        self.baseline = None;
        tracing::debug!(
            target: "pinchcal.gesture",
            ?kind,
            ratio,
            x = pos.x,
            y = pos.y,
            "touch pinch emitted"
        );
        Some(PinchEvent::new(kind, pos, PinchSource::Touch, now))
    }

    /// Clear the baseline. Never emits.
    pub fn end(&mut self) {
        self.baseline = None;
    }

    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.baseline.is_some()
    }

    #[inline]
    #[must_use]
    pub fn baseline(&self) -> Option<GestureBaseline> {
        self.baseline
    }

    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    fn ratio(baseline: f64, current: f64) -> f64 {
        if baseline == 0.0 || !baseline.is_finite() {
            1.0
        } else {
            current / baseline
        }
    }
}

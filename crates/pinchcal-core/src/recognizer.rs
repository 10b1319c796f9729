#![forbid(unsafe_code)]

//! Gesture recognition: turns raw surface input into discrete pinch events.
//!
//! [`GestureRecognizer`] is a stateful processor combining three machines:
//!
//! - **Pointer tracker**: last known position (pointer moves, two-touch
//!   midpoints).
//! - **Pinch session**: two-contact baseline and ratio evaluation.
//! - **Wheel adapter**: modified wheel ticks as simulated pinches.
//!
//! The session and the adapter share one [`CooldownClock`].
//!
//! # Invariants
//!
//! 1. No two pinch events, of any source, are closer than the cooldown window.
//! 2. At most one pinch per two-contact engagement.
//! 3. After `reset()` no baseline exists; pointer position and cooldown are kept.
//!
//! # Failure Modes
//!
//! - Touch start with a contact count other than two is ignored.
//! - Touch end/cancel without an active session is a no-op.

use web_time::Instant;

use crate::config::GestureConfig;
use crate::cooldown::CooldownClock;
use crate::geometry::PointerPosition;
use crate::input::{InputEvent, TouchInput, TouchPhase, WheelInput};
use crate::pinch::{PinchEvent, PinchSession};
use crate::pointer::PointerTracker;
use crate::wheel::WheelGestureAdapter;

/// What a single input event produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Recognition {
    pub pinch: Option<PinchEvent>,
    /// The host must cancel the event's default action.
    pub suppress_default: bool,
    /// The tracked pointer position was overwritten.
    pub pointer_moved: bool,
}

/// Stateful recognizer that transforms raw input into pinch events.
pub struct GestureRecognizer {
    config: GestureConfig,
    pointer: PointerTracker,
    session: PinchSession,
    wheel: WheelGestureAdapter,
    cooldown: CooldownClock,
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("tracking", &self.session.is_tracking())
            .field("pointer", &self.pointer.position())
            .field("last_fired", &self.cooldown.last_fired())
            .finish()
    }
}

impl GestureRecognizer {
    /// Create a new recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            pointer: PointerTracker::new(),
            session: PinchSession::new(config.pinch_threshold),
            wheel: WheelGestureAdapter::new(),
            cooldown: CooldownClock::new(config.pinch_cooldown),
            config,
        }
    }

    /// Process a raw event.
    pub fn process(&mut self, event: &InputEvent, now: Instant) -> Recognition {
        match event {
            InputEvent::PointerMove(pos) => {
                self.pointer.on_move(pos.x, pos.y);
                Recognition {
                    pointer_moved: true,
                    ..Recognition::default()
                }
            }
            InputEvent::Touch(touch) => self.on_touch(touch, now),
            InputEvent::Wheel(wheel) => self.on_wheel(wheel, now),
        }
    }

    /// Return every sub-machine to idle.
    pub fn reset(&mut self) {
        self.session.end();
    }

    #[inline]
    #[must_use]
    pub fn pointer_position(&self) -> PointerPosition {
        self.pointer.position()
    }

    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.session.is_tracking()
    }

    #[inline]
    #[must_use]
    pub fn cooldown(&self) -> &CooldownClock {
        &self.cooldown
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration. Takes effect on the next event.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.session.set_threshold(config.pinch_threshold);
        self.cooldown.set_window(config.pinch_cooldown);
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_touch(&mut self, touch: &TouchInput, now: Instant) -> Recognition {
        match touch.phase {
            TouchPhase::Start => {
                let Some((a, b)) = touch.pair() else {
                    return Recognition::default();
                };
                self.pointer.on_two_touch_move(a, b);
                self.session.begin(a.distance(b), now);
                Recognition {
                    pointer_moved: true,
                    ..Recognition::default()
                }
            }
            TouchPhase::Move => {
                let Some((a, b)) = touch.pair() else {
                    return Recognition::default();
                };
                self.pointer.on_two_touch_move(a, b);
                let pinch = self.session.update(
                    a.distance(b),
                    now,
                    self.pointer.position(),
                    &mut self.cooldown,
                );
                Recognition {
                    pinch,
                    suppress_default: false,
                    pointer_moved: true,
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.session.end();
                Recognition::default()
            }
        }
    }

    fn on_wheel(&mut self, wheel: &WheelInput, now: Instant) -> Recognition {
        let placed = wheel.position();
        if let Some(pos) = placed {
            self.pointer.on_move(pos.x, pos.y);
        }
        let modifier_held = wheel.mods.contains(self.config.wheel_modifier);
        let outcome = self.wheel.on_wheel(
            wheel.dy,
            modifier_held,
            now,
            self.pointer.position(),
            &mut self.cooldown,
        );
        Recognition {
            pinch: outcome.pinch,
            suppress_default: outcome.suppress_default,
            pointer_moved: placed.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, TouchPoint};
    use crate::pinch::{PinchKind, PinchSource};
    use web_time::Duration;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_600: Duration = Duration::from_millis(600);

    fn base() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(GestureConfig::default())
    }

    /// Two contacts centered on (cx, cy), `d` apart horizontally.
    fn pair(phase: TouchPhase, cx: f64, cy: f64, d: f64) -> InputEvent {
        InputEvent::two_touch(phase, (cx - d / 2.0, cy), (cx + d / 2.0, cy))
    }

    #[test]
    fn pointer_move_updates_position() {
        let mut gr = recognizer();
        let r = gr.process(&InputEvent::pointer_move(12.0, 34.0), base());
        assert!(r.pointer_moved);
        assert!(r.pinch.is_none());
        assert_eq!(gr.pointer_position(), PointerPosition::new(12.0, 34.0));
    }

    #[test]
    fn pinch_in_at_midpoint() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&pair(TouchPhase::Start, 200.0, 100.0, 100.0), t);
        assert!(gr.is_tracking());
        let r = gr.process(&pair(TouchPhase::Move, 220.0, 110.0, 70.0), t + MS_10);
        let ev = r.pinch.unwrap();
        assert_eq!(ev.kind, PinchKind::In);
        assert_eq!(ev.source, PinchSource::Touch);
        assert_eq!(ev.pos, PointerPosition::new(220.0, 110.0));
        assert!(!r.suppress_default);
        assert!(!gr.is_tracking());
    }

    #[test]
    fn pinch_out() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&pair(TouchPhase::Start, 0.0, 0.0, 100.0), t);
        let r = gr.process(&pair(TouchPhase::Move, 0.0, 0.0, 150.0), t + MS_10);
        assert!(r.pinch.unwrap().is_out());
    }

    #[test]
    fn single_contact_start_is_ignored() {
        let mut gr = recognizer();
        let t = base();
        let one = InputEvent::touch(TouchPhase::Start, vec![TouchPoint::new(0, 5.0, 5.0)]);
        let r = gr.process(&one, t);
        assert_eq!(r, Recognition::default());
        assert!(!gr.is_tracking());
    }

    #[test]
    fn two_touch_move_without_session_still_moves_pointer() {
        let mut gr = recognizer();
        let r = gr.process(&pair(TouchPhase::Move, 40.0, 50.0, 10.0), base());
        assert!(r.pointer_moved);
        assert!(r.pinch.is_none());
        assert_eq!(gr.pointer_position(), PointerPosition::new(40.0, 50.0));
    }

    #[test]
    fn touch_end_clears_session() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&pair(TouchPhase::Start, 0.0, 0.0, 100.0), t);
        gr.process(&InputEvent::touch(TouchPhase::End, vec![]), t + MS_10);
        assert!(!gr.is_tracking());
        let r = gr.process(&pair(TouchPhase::Move, 0.0, 0.0, 10.0), t + MS_100);
        assert!(r.pinch.is_none());
    }

    #[test]
    fn cancel_without_session_is_noop() {
        let mut gr = recognizer();
        let r = gr.process(&InputEvent::touch(TouchPhase::Cancel, vec![]), base());
        assert_eq!(r, Recognition::default());
    }

    #[test]
    fn wheel_and_touch_share_cooldown() {
        let mut gr = recognizer();
        let t = base();
        let r = gr.process(&InputEvent::wheel(4.0, Modifiers::CTRL), t);
        assert!(r.pinch.unwrap().is_in());
        assert!(r.suppress_default);

        gr.process(&pair(TouchPhase::Start, 0.0, 0.0, 100.0), t + MS_10);
        let blocked = gr.process(&pair(TouchPhase::Move, 0.0, 0.0, 50.0), t + MS_100);
        assert!(blocked.pinch.is_none());
        assert!(gr.is_tracking());

        let fired = gr.process(&pair(TouchPhase::Move, 0.0, 0.0, 50.0), t + MS_600);
        assert!(fired.pinch.is_some());
    }

    #[test]
    fn wheel_requires_configured_modifier() {
        let mut gr = recognizer();
        let t = base();
        let r = gr.process(&InputEvent::wheel(-5.0, Modifiers::SHIFT), t);
        assert_eq!(r, Recognition::default());
        assert!(gr.cooldown().last_fired().is_none());

        let r = gr.process(&InputEvent::wheel(-5.0, Modifiers::CTRL | Modifiers::SHIFT), t);
        assert!(r.pinch.unwrap().is_out());
    }

    #[test]
    fn wheel_uses_tracked_pointer_position() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&InputEvent::pointer_move(77.0, 88.0), t);
        let r = gr.process(&InputEvent::wheel(-1.0, Modifiers::CTRL), t);
        assert_eq!(r.pinch.unwrap().pos, PointerPosition::new(77.0, 88.0));
    }

    #[test]
    fn wheel_coordinates_move_pointer_before_emitting() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&InputEvent::pointer_move(77.0, 88.0), t);

        let tick = WheelInput::vertical(-1.0, Modifiers::CTRL).at(12.0, 34.0);
        let r = gr.process(&InputEvent::Wheel(tick), t);
        assert!(r.pointer_moved);
        assert_eq!(r.pinch.unwrap().pos, PointerPosition::new(12.0, 34.0));
        assert_eq!(gr.pointer_position(), PointerPosition::new(12.0, 34.0));

        // Unmodified ticks still move the pointer but never emit.
        let plain = WheelInput::vertical(-1.0, Modifiers::empty()).at(1.0, 2.0);
        let r = gr.process(&InputEvent::Wheel(plain), t + MS_600);
        assert!(r.pointer_moved);
        assert!(r.pinch.is_none());
        assert_eq!(gr.pointer_position(), PointerPosition::new(1.0, 2.0));
    }

    #[test]
    fn set_config_changes_modifier_and_window() {
        let mut gr = recognizer();
        gr.set_config(GestureConfig {
            pinch_cooldown: Duration::ZERO,
            wheel_modifier: Modifiers::ALT,
            ..GestureConfig::default()
        });
        let t = base();
        assert!(gr.process(&InputEvent::wheel(1.0, Modifiers::CTRL), t).pinch.is_none());
        assert!(gr.process(&InputEvent::wheel(1.0, Modifiers::ALT), t).pinch.is_some());
        assert!(gr.process(&InputEvent::wheel(1.0, Modifiers::ALT), t).pinch.is_some());
    }

    #[test]
    fn reset_keeps_pointer_and_cooldown() {
        let mut gr = recognizer();
        let t = base();
        gr.process(&InputEvent::wheel(1.0, Modifiers::CTRL), t);
        gr.process(&pair(TouchPhase::Start, 10.0, 10.0, 100.0), t);
        gr.reset();
        assert!(!gr.is_tracking());
        assert_eq!(gr.pointer_position(), PointerPosition::new(10.0, 10.0));
        assert_eq!(gr.cooldown().last_fired(), Some(t));
    }
}

#![forbid(unsafe_code)]

//! Normalized input events delivered by the host surface.
//!
//! The host (a windowing layer, a browser shim, or a replay script) is
//! expected to provide:
//! - pointer and touch coordinates in logical surface pixels, and
//! - wheel deltas with the modifier keys held at the time of the tick.
//!
//! With the `serde` feature every type here has a stable JSON shape suitable
//! for record/replay, e.g. `{"kind":"touch","phase":"start","touches":[...]}`.

use bitflags::bitflags;

use crate::geometry::PointerPosition;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single contact point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchPoint {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> PointerPosition {
        PointerPosition::new(self.x, self.y)
    }
}

/// A touch event with every contact currently on the surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchInput {
    pub phase: TouchPhase,
    #[cfg_attr(feature = "serde", serde(default))]
    pub touches: Vec<TouchPoint>,
}

impl TouchInput {
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// The two contact positions, if exactly two contacts are present.
    #[must_use]
    pub fn pair(&self) -> Option<(PointerPosition, PointerPosition)> {
        match self.touches.as_slice() {
            [a, b] => Some((a.position(), b.position())),
            _ => None,
        }
    }
}

/// Wheel input. `dy > 0` scrolls down (away from the user).
///
/// `x`/`y` are the pointer coordinates reported with the tick. Hosts that do
/// not report them leave both unset and the tracked pointer is used as is.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelInput {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub x: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub y: Option<f64>,
    pub dy: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mods: Modifiers,
}

impl WheelInput {
    /// Vertical wheel tick without coordinates.
    #[must_use]
    pub const fn vertical(dy: f64, mods: Modifiers) -> Self {
        Self {
            x: None,
            y: None,
            dy,
            mods,
        }
    }

    /// Attach the pointer coordinates reported with the tick.
    #[must_use]
    pub const fn at(self, x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..self
        }
    }

    /// Reported position, if both coordinates are present.
    #[must_use]
    pub fn position(&self) -> Option<PointerPosition> {
        Some(PointerPosition::new(self.x?, self.y?))
    }
}

/// Normalized input event from the attached surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum InputEvent {
    /// Mouse or pen moved without touching.
    PointerMove(PointerPosition),
    Touch(TouchInput),
    Wheel(WheelInput),
}

impl InputEvent {
    #[must_use]
    pub const fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove(PointerPosition::new(x, y))
    }

    #[must_use]
    pub fn touch(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self::Touch(TouchInput::new(phase, touches))
    }

    /// Two-contact touch event with contacts at `a` and `b`.
    #[must_use]
    pub fn two_touch(phase: TouchPhase, a: (f64, f64), b: (f64, f64)) -> Self {
        Self::touch(
            phase,
            vec![TouchPoint::new(0, a.0, a.1), TouchPoint::new(1, b.0, b.1)],
        )
    }

    #[must_use]
    pub const fn wheel(dy: f64, mods: Modifiers) -> Self {
        Self::Wheel(WheelInput::vertical(dy, mods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_requires_exactly_two_contacts() {
        let one = TouchInput::new(TouchPhase::Start, vec![TouchPoint::new(0, 1.0, 1.0)]);
        assert!(one.pair().is_none());

        let three = TouchInput::new(
            TouchPhase::Start,
            vec![
                TouchPoint::new(0, 0.0, 0.0),
                TouchPoint::new(1, 1.0, 1.0),
                TouchPoint::new(2, 2.0, 2.0),
            ],
        );
        assert!(three.pair().is_none());

        let two = TouchInput::new(
            TouchPhase::Move,
            vec![TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 6.0, 8.0)],
        );
        let (a, b) = two.pair().unwrap();
        assert_eq!(a.distance(b), 10.0);
    }

    #[test]
    fn wheel_position_needs_both_coordinates() {
        let bare = WheelInput::vertical(1.0, Modifiers::CTRL);
        assert_eq!(bare.position(), None);
        assert_eq!(
            bare.at(3.0, 4.0).position(),
            Some(PointerPosition::new(3.0, 4.0))
        );
        let half = WheelInput {
            x: Some(3.0),
            ..bare
        };
        assert_eq!(half.position(), None);
    }

    #[test]
    fn two_touch_builder_assigns_distinct_ids() {
        let InputEvent::Touch(t) = InputEvent::two_touch(TouchPhase::Start, (0.0, 0.0), (1.0, 1.0))
        else {
            panic!("expected touch");
        };
        assert_eq!(t.touches[0].id, 0);
        assert_eq!(t.touches[1].id, 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_shape_is_tagged() {
        let ev = InputEvent::two_touch(TouchPhase::Start, (0.0, 0.0), (100.0, 0.0));
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"kind\":\"touch\""), "{json}");
        assert!(json.contains("\"phase\":\"start\""), "{json}");

        let parsed: InputEvent =
            serde_json::from_str(r#"{"kind":"wheel","dy":-5.0,"mods":"CTRL"}"#).unwrap();
        assert_eq!(parsed, InputEvent::wheel(-5.0, Modifiers::CTRL));

        let moved: InputEvent =
            serde_json::from_str(r#"{"kind":"pointer_move","x":3.0,"y":4.0}"#).unwrap();
        assert_eq!(moved, InputEvent::pointer_move(3.0, 4.0));

        let placed: InputEvent =
            serde_json::from_str(r#"{"kind":"wheel","x":5,"y":6,"dy":1.0,"mods":"CTRL"}"#).unwrap();
        assert_eq!(
            placed,
            InputEvent::Wheel(WheelInput::vertical(1.0, Modifiers::CTRL).at(5.0, 6.0))
        );
    }
}

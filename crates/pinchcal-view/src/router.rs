#![forbid(unsafe_code)]

//! Routing of recognized pinches to view triggers.
//!
//! - Pinch-in routes unconditionally; the controller decides the edge.
//! - Pinch-out in Month hit-tests the event position against the rendered
//!   grid; a miss routes nothing.
//! - Pinch-out in Year resolves the month preview under the event position so
//!   the month view opens on it.
//!
//! The router also keeps the hovered month for year-view feedback. Hover is
//! derived from the pointer position and is not a view transition.

use pinchcal_core::{PinchEvent, PinchKind, PointerPosition};

use crate::calendar::{CalendarCursor, MonthIndex};
use crate::controller::Trigger;
use crate::hit_test::HitTester;
use crate::view::{TransitionPhase, ViewSnapshot, ViewState};

/// A pinch resolved against the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedPinch {
    pub trigger: Trigger,
    /// Month the cursor should move to if the trigger is accepted.
    pub focus_month: Option<MonthIndex>,
}

/// Resolves pinch targets and tracks the hovered month.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    hovered_month: Option<MonthIndex>,
}

impl GestureRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a pinch. `None` means the pinch has no target here.
    ///
    /// Hit-testing only happens while `view` is settled; mid-transition the
    /// outgoing surface is not authoritative, so the bare trigger is routed
    /// and the controller drops it.
    pub fn route_pinch<H: HitTester + ?Sized>(
        &self,
        event: &PinchEvent,
        view: &ViewSnapshot,
        cursor: CalendarCursor,
        hit: &H,
    ) -> Option<RoutedPinch> {
        let bare = |trigger| RoutedPinch {
            trigger,
            focus_month: None,
        };

        match event.kind {
            PinchKind::In => Some(bare(Trigger::PinchIn)),
            PinchKind::Out if !view.is_settled() => Some(bare(Trigger::PinchOut)),
            PinchKind::Out => match view.state {
                ViewState::Month => {
                    let date = hit.hit_test(cursor, event.pos);
                    tracing::debug!(
                        target: "pinchcal.router",
                        x = event.pos.x,
                        y = event.pos.y,
                        hit = ?date,
                        "pinch-out hit-test"
                    );
                    date.map(|d| bare(Trigger::PinchOutOverDate(d)))
                }
                ViewState::Year => Some(RoutedPinch {
                    trigger: Trigger::PinchOut,
                    focus_month: hit.hit_test_month(cursor, event.pos),
                }),
                ViewState::Note => Some(bare(Trigger::PinchOut)),
            },
        }
    }

    /// Recompute the hovered month from the pointer position.
    ///
    /// Only a settled or entering year view has hover; elsewhere it is
    /// cleared. Returns the new value when it changed.
    pub fn refresh_hover<H: HitTester + ?Sized>(
        &mut self,
        pos: PointerPosition,
        view: &ViewSnapshot,
        cursor: CalendarCursor,
        hit: &H,
    ) -> Option<Option<MonthIndex>> {
        let resolved = if view.state == ViewState::Year && view.phase != TransitionPhase::Leaving {
            hit.hit_test_month(cursor, pos)
        } else {
            None
        };
        if resolved == self.hovered_month {
            return None;
        }
        tracing::trace!(target: "pinchcal.router", from = ?self.hovered_month, to = ?resolved, "hover changed");
        self.hovered_month = resolved;
        Some(resolved)
    }

    #[inline]
    #[must_use]
    pub fn hovered_month(&self) -> Option<MonthIndex> {
        self.hovered_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DateKey;
    use pinchcal_core::PinchSource;
    use web_time::Instant;

    /// Left half of the surface is 2024-03-15 / March; right half is empty.
    struct HalfSurface;

    impl HitTester for HalfSurface {
        fn hit_test(&self, _cursor: CalendarCursor, pos: PointerPosition) -> Option<DateKey> {
            (pos.x < 100.0).then(|| DateKey::from_ymd(2024, 3, 15).unwrap())
        }

        fn hit_test_month(&self, _cursor: CalendarCursor, pos: PointerPosition) -> Option<MonthIndex> {
            (pos.x < 100.0).then(|| MonthIndex::new(2).unwrap())
        }
    }

    fn cursor() -> CalendarCursor {
        CalendarCursor::new(2024, MonthIndex::JANUARY)
    }

    fn snapshot(state: ViewState, phase: TransitionPhase) -> ViewSnapshot {
        ViewSnapshot {
            state,
            phase,
            tag: None,
            selected_date: None,
            generation: 0,
        }
    }

    fn pinch(kind: PinchKind, x: f64) -> PinchEvent {
        PinchEvent::new(kind, PointerPosition::new(x, 10.0), PinchSource::Touch, Instant::now())
    }

    #[test]
    fn pinch_in_routes_without_hit_test() {
        let router = GestureRouter::new();
        let view = snapshot(ViewState::Month, TransitionPhase::Settled);
        let routed = router.route_pinch(&pinch(PinchKind::In, 500.0), &view, cursor(), &HalfSurface);
        assert_eq!(routed.unwrap().trigger, Trigger::PinchIn);
    }

    #[test]
    fn month_pinch_out_uses_hit_test() {
        let router = GestureRouter::new();
        let view = snapshot(ViewState::Month, TransitionPhase::Settled);
        let hit = router.route_pinch(&pinch(PinchKind::Out, 10.0), &view, cursor(), &HalfSurface);
        assert_eq!(
            hit.unwrap().trigger,
            Trigger::PinchOutOverDate(DateKey::from_ymd(2024, 3, 15).unwrap())
        );
        let miss = router.route_pinch(&pinch(PinchKind::Out, 500.0), &view, cursor(), &HalfSurface);
        assert!(miss.is_none());
    }

    #[test]
    fn year_pinch_out_focuses_month_under_pointer() {
        let router = GestureRouter::new();
        let view = snapshot(ViewState::Year, TransitionPhase::Settled);
        let routed = router
            .route_pinch(&pinch(PinchKind::Out, 10.0), &view, cursor(), &HalfSurface)
            .unwrap();
        assert_eq!(routed.trigger, Trigger::PinchOut);
        assert_eq!(routed.focus_month, MonthIndex::new(2));
    }

    #[test]
    fn mid_transition_pinch_out_skips_hit_test() {
        let router = GestureRouter::new();
        let view = snapshot(ViewState::Month, TransitionPhase::Leaving);
        let routed = router.route_pinch(&pinch(PinchKind::Out, 10.0), &view, cursor(), &HalfSurface);
        assert_eq!(routed.unwrap().trigger, Trigger::PinchOut);
    }

    #[test]
    fn hover_only_in_year() {
        let mut router = GestureRouter::new();
        let year = snapshot(ViewState::Year, TransitionPhase::Settled);
        let month = snapshot(ViewState::Month, TransitionPhase::Settled);
        let inside = PointerPosition::new(10.0, 10.0);

        assert!(router.refresh_hover(inside, &month, cursor(), &HalfSurface).is_none());
        assert_eq!(
            router.refresh_hover(inside, &year, cursor(), &HalfSurface),
            Some(MonthIndex::new(2))
        );
        // Unchanged: no report.
        assert!(router.refresh_hover(inside, &year, cursor(), &HalfSurface).is_none());
        assert_eq!(router.hovered_month(), MonthIndex::new(2));

        assert_eq!(
            router.refresh_hover(PointerPosition::new(500.0, 0.0), &year, cursor(), &HalfSurface),
            Some(None)
        );
        router.refresh_hover(inside, &year, cursor(), &HalfSurface);
        assert_eq!(router.refresh_hover(inside, &month, cursor(), &HalfSurface), Some(None));
    }

    #[test]
    fn hover_clears_while_leaving_year() {
        let mut router = GestureRouter::new();
        let inside = PointerPosition::new(10.0, 10.0);
        router.refresh_hover(inside, &snapshot(ViewState::Year, TransitionPhase::Settled), cursor(), &HalfSurface);
        let leaving = snapshot(ViewState::Year, TransitionPhase::Leaving);
        assert_eq!(router.refresh_hover(inside, &leaving, cursor(), &HalfSurface), Some(None));
    }
}

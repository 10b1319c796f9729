#![forbid(unsafe_code)]

//! The long-lived engine instance the presentation layer talks to.
//!
//! [`CalendarEngine`] owns every piece of mutable gesture and view state:
//! recognizer (pointer, pinch session, wheel adapter, cooldown), router
//! (hover), transition controller, calendar cursor, notes and observers.
//! There are no globals; two engines never share a cooldown.
//!
//! # Driving the engine
//!
//! The host forwards surface input through [`CalendarEngine::handle_input`]
//! and calls [`CalendarEngine::advance`] from its frame loop (or when
//! [`CalendarEngine::pending_deadline`] passes). Every entry point advances
//! first, so a late frame never lets a trigger see a stale phase.
//!
//! # Invariants
//!
//! 1. At most one surface is attached; input from any other is ignored.
//! 2. Detaching clears the pinch baseline.
//! 3. Observers see every phase change in order, after the cursor update it
//!    implies.
//! 4. Hover is `None` outside a settled or entering year view.
//!
//! # Failure Modes
//!
//! - Navigation and note saving outside their view, or mid-transition, are
//!   refused (`false`) without side effects.
//! - Hit-test misses route nothing.

use web_time::Instant;

use pinchcal_core::{EngineConfig, GestureRecognizer, InputEvent, PointerPosition};

use crate::calendar::{CalendarCursor, DateKey, MonthIndex};
use crate::controller::{Trigger, TriggerOutcome, ViewTransitionController};
use crate::hit_test::HitTester;
use crate::notes::NotesStore;
use crate::observer::{EngineObserver, ObserverRegistry, SubscriptionId};
use crate::router::GestureRouter;
use crate::view::{ViewSnapshot, ViewState};

/// Identity of an input surface the host can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What the host must do with the event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputDisposition {
    /// Cancel the platform default (page scroll or browser zoom).
    pub prevent_default: bool,
}

/// Gesture recognition and view transitions for one calendar.
pub struct CalendarEngine<H: HitTester> {
    config: EngineConfig,
    recognizer: GestureRecognizer,
    router: GestureRouter,
    controller: ViewTransitionController,
    hit_tester: H,
    cursor: CalendarCursor,
    notes: NotesStore,
    observers: ObserverRegistry,
    surface: Option<SurfaceId>,
}

impl<H: HitTester> std::fmt::Debug for CalendarEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarEngine")
            .field("snapshot", &self.controller.snapshot())
            .field("cursor", &self.cursor)
            .field("surface", &self.surface)
            .field("recognizer", &self.recognizer)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

impl<H: HitTester> CalendarEngine<H> {
    /// Engine in Month view, settled, showing `cursor`, with no surface.
    #[must_use]
    pub fn new(config: EngineConfig, hit_tester: H, cursor: CalendarCursor) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config.gesture.clone()),
            router: GestureRouter::new(),
            controller: ViewTransitionController::new(config.transition),
            config,
            hit_tester,
            cursor,
            notes: NotesStore::new(),
            observers: ObserverRegistry::new(),
            surface: None,
        }
    }

    // --- Surface lifecycle -------------------------------------------------

    /// Attach `surface`, replacing any other. Returns `true` if it was not
    /// already attached.
    pub fn attach(&mut self, surface: SurfaceId) -> bool {
        if self.surface == Some(surface) {
            return false;
        }
        if let Some(previous) = self.surface.take() {
            tracing::debug!(target: "pinchcal.engine", surface = previous.get(), "detached (replaced)");
            self.recognizer.reset();
        }
        self.surface = Some(surface);
        tracing::debug!(target: "pinchcal.engine", surface = surface.get(), "attached");
        true
    }

    /// Release `surface` if it is the attached one. Returns whether anything
    /// was released.
    pub fn detach(&mut self, surface: SurfaceId) -> bool {
        if self.surface != Some(surface) {
            return false;
        }
        self.surface = None;
        self.recognizer.reset();
        tracing::debug!(target: "pinchcal.engine", surface = surface.get(), "detached");
        true
    }

    #[inline]
    #[must_use]
    pub fn attached_surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    // --- Input and time ----------------------------------------------------

    /// Feed one raw event from `surface`.
    pub fn handle_input(&mut self, surface: SurfaceId, event: &InputEvent, now: Instant) -> InputDisposition {
        if self.surface != Some(surface) {
            tracing::trace!(target: "pinchcal.engine", surface = surface.get(), "input from unattached surface");
            return InputDisposition::default();
        }
        self.advance(now);

        let recognition = self.recognizer.process(event, now);

        if recognition.pointer_moved {
            let pos = self.recognizer.pointer_position();
            self.observers.notify(|o| o.on_pointer_position_changed(pos));
            self.refresh_hover(pos);
        }

        if let Some(pinch) = recognition.pinch {
            self.observers.notify(|o| o.on_pinch(&pinch));
            let view = self.controller.snapshot();
            let routed = self.router.route_pinch(&pinch, &view, self.cursor, &self.hit_tester);
            if let Some(routed) = routed {
                // Year-view pinch-out opens the month under the gesture, or
                // the last hovered one.
                let focus = match routed.trigger {
                    Trigger::PinchOut => routed.focus_month.or(self.router.hovered_month()),
                    _ => routed.focus_month,
                };
                self.request(routed.trigger, focus, now);
            }
        }

        InputDisposition {
            prevent_default: recognition.suppress_default,
        }
    }

    /// Fire due transition continuations and publish each phase change.
    pub fn advance(&mut self, now: Instant) -> Vec<ViewSnapshot> {
        let changes = self.controller.advance(now);
        for snapshot in &changes {
            self.publish(*snapshot);
        }
        changes
    }

    /// Due time of the next continuation, if a transition is in flight.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.controller.pending_deadline()
    }

    /// Cancel any in-flight transition (settling on its target) and clear the
    /// pinch baseline.
    pub fn reset(&mut self) {
        self.recognizer.reset();
        if let Some(snapshot) = self.controller.reset() {
            self.publish(snapshot);
        }
    }

    // --- Direct operations -------------------------------------------------

    /// Open month `month` of the shown year, without animation. Year view only.
    pub fn select_month(&mut self, month: MonthIndex, now: Instant) -> TriggerOutcome {
        self.advance(now);
        self.request(Trigger::SelectMonth(month), Some(month), now)
    }

    /// Open the note for `date`. Month view only.
    pub fn select_date(&mut self, date: DateKey, now: Instant) -> TriggerOutcome {
        self.advance(now);
        self.request(Trigger::SelectDate(date), None, now)
    }

    /// Leave the note view. Note view only.
    pub fn go_back(&mut self, now: Instant) -> TriggerOutcome {
        self.advance(now);
        self.request(Trigger::GoBack, None, now)
    }

    /// Store `text` for the selected date. Settled note view only.
    pub fn save_note(&mut self, text: impl Into<String>, now: Instant) -> bool {
        self.advance(now);
        let snapshot = self.controller.snapshot();
        let editable = snapshot.state == ViewState::Note && snapshot.is_settled();
        match snapshot.selected_date {
            Some(date) if editable => {
                self.notes.save(date, text);
                true
            }
            _ => false,
        }
    }

    /// Save the note, then leave the note view.
    pub fn save_and_go_back(&mut self, text: impl Into<String>, now: Instant) -> TriggerOutcome {
        if !self.save_note(text, now) {
            return if self.controller.is_settled() {
                TriggerOutcome::Ignored
            } else {
                TriggerOutcome::Dropped
            };
        }
        self.request(Trigger::GoBack, None, now)
    }

    /// Show the next month. Settled month view only.
    pub fn next_month(&mut self, now: Instant) -> bool {
        self.navigate(ViewState::Month, CalendarCursor::next_month, now)
    }

    /// Show the previous month. Settled month view only.
    pub fn prev_month(&mut self, now: Instant) -> bool {
        self.navigate(ViewState::Month, CalendarCursor::prev_month, now)
    }

    /// Show the next year. Settled year view only.
    pub fn next_year(&mut self, now: Instant) -> bool {
        self.navigate(ViewState::Year, CalendarCursor::next_year, now)
    }

    /// Show the previous year. Settled year view only.
    pub fn prev_year(&mut self, now: Instant) -> bool {
        self.navigate(ViewState::Year, CalendarCursor::prev_year, now)
    }

    // --- Observers ---------------------------------------------------------

    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- Accessors ---------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.controller.snapshot()
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub fn hovered_month(&self) -> Option<MonthIndex> {
        self.router.hovered_month()
    }

    #[inline]
    #[must_use]
    pub fn pointer_position(&self) -> PointerPosition {
        self.recognizer.pointer_position()
    }

    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.recognizer.is_tracking()
    }

    #[inline]
    #[must_use]
    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    /// Text of the selected date's note, or `""`.
    #[must_use]
    pub fn selected_note(&self) -> &str {
        self.controller
            .selected_date()
            .map_or("", |date| self.notes.get(date))
    }

    #[must_use]
    pub fn hit_tester(&self) -> &H {
        &self.hit_tester
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration. In-flight continuations keep their due
    /// instants; the new thresholds apply from the next event.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.recognizer.set_config(config.gesture.clone());
        self.controller.set_config(config.transition);
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

impl<H: HitTester> CalendarEngine<H> {
    /// Offer `trigger`; on acceptance move the cursor (to `focus`, or to the
    /// selected date's month) before publishing.
    fn request(&mut self, trigger: Trigger, focus: Option<MonthIndex>, now: Instant) -> TriggerOutcome {
        let outcome = self.controller.request(trigger, now);
        let Some(snapshot) = outcome.snapshot() else {
            return outcome;
        };
        let moved = match trigger {
            Trigger::PinchOutOverDate(date) | Trigger::SelectDate(date) => {
                Some(CalendarCursor::containing(date))
            }
            _ => focus.map(|month| self.cursor.with_month(month)),
        };
        if let Some(cursor) = moved {
            self.set_cursor(cursor);
        }
        self.publish(snapshot);
        outcome
    }

    fn navigate(&mut self, view: ViewState, step: fn(CalendarCursor) -> CalendarCursor, now: Instant) -> bool {
        self.advance(now);
        let snapshot = self.controller.snapshot();
        if snapshot.state != view || !snapshot.is_settled() {
            tracing::debug!(
                target: "pinchcal.engine",
                state = %snapshot.state,
                phase = %snapshot.phase,
                "navigation refused"
            );
            return false;
        }
        self.set_cursor(step(self.cursor));
        true
    }

    fn set_cursor(&mut self, cursor: CalendarCursor) {
        if cursor == self.cursor {
            return;
        }
        self.cursor = cursor;
        self.observers.notify(|o| o.on_cursor_changed(cursor));
    }

    fn publish(&mut self, snapshot: ViewSnapshot) {
        self.observers.notify(|o| o.on_view_state_changed(&snapshot));
        let pos = self.recognizer.pointer_position();
        self.refresh_hover(pos);
    }

    fn refresh_hover(&mut self, pos: PointerPosition) {
        let view = self.controller.snapshot();
        if let Some(hovered) = self.router.refresh_hover(pos, &view, self.cursor, &self.hit_tester) {
            self.observers.notify(|o| o.on_hovered_month_changed(hovered));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

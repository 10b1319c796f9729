//! Replays a parsed script against a [`CalendarEngine`] and collects the
//! resulting notifications as a timeline.
//!
//! Transition continuations are fired at their exact due instants, so the
//! `at_ms` of a phase change is the time it was scheduled for, not the time
//! of the next script step.

use std::cell::RefCell;
use std::rc::Rc;

use pinchcal_core::{EngineConfig, PinchEvent, PinchKind, PinchSource, PointerPosition};
use pinchcal_view::{
    CalendarCursor, CalendarEngine, EngineObserver, MonthIndex, SurfaceId, TriggerOutcome,
    ViewSnapshot,
};
use serde::Serialize;
use web_time::{Duration, Instant};

use crate::layout::GridLayout;
use crate::script::{Action, ScriptStep, Step};

const SURFACE: SurfaceId = SurfaceId::new(1);

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: TimelineEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    View {
        state: &'static str,
        phase: &'static str,
        tag: Option<&'static str>,
        selected_date: Option<String>,
        generation: u64,
    },
    Pinch {
        kind: PinchKind,
        source: PinchSource,
        x: f64,
        y: f64,
    },
    Hover {
        month: Option<u8>,
    },
    Cursor {
        year: i32,
        month: u8,
    },
    Action {
        name: &'static str,
        outcome: &'static str,
    },
    /// Days holding a note when the replay ends.
    Notes {
        dates: Vec<String>,
    },
}

impl From<&ViewSnapshot> for TimelineEvent {
    fn from(s: &ViewSnapshot) -> Self {
        Self::View {
            state: s.state.as_str(),
            phase: s.phase.as_str(),
            tag: s.tag.map(|t| t.as_str()),
            selected_date: s.selected_date.map(|d| d.to_string()),
            generation: s.generation,
        }
    }
}

/// Everything a replay needs besides the script.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub config: EngineConfig,
    pub start: CalendarCursor,
    pub layout: GridLayout,
}

/// Observer that buffers notifications until the replay stamps them.
struct Recorder(Rc<RefCell<Vec<TimelineEvent>>>);

impl EngineObserver for Recorder {
    fn on_view_state_changed(&mut self, snapshot: &ViewSnapshot) {
        self.0.borrow_mut().push(snapshot.into());
    }

    fn on_hovered_month_changed(&mut self, month: Option<MonthIndex>) {
        self.0.borrow_mut().push(TimelineEvent::Hover {
            month: month.map(MonthIndex::get),
        });
    }

    fn on_pinch(&mut self, event: &PinchEvent) {
        let PointerPosition { x, y } = event.pos;
        self.0.borrow_mut().push(TimelineEvent::Pinch {
            kind: event.kind,
            source: event.source,
            x,
            y,
        });
    }

    fn on_cursor_changed(&mut self, cursor: CalendarCursor) {
        self.0.borrow_mut().push(TimelineEvent::Cursor {
            year: cursor.year,
            month: cursor.month.get(),
        });
    }
}

struct Replay {
    engine: CalendarEngine<GridLayout>,
    pending: Rc<RefCell<Vec<TimelineEvent>>>,
    base: Instant,
    timeline: Vec<TimelineEntry>,
}

impl Replay {
    fn at(&self, ms: u64) -> Instant {
        self.base + Duration::from_millis(ms)
    }

    fn ms_since_base(&self, at: Instant) -> u64 {
        u64::try_from(at.saturating_duration_since(self.base).as_millis()).unwrap_or(u64::MAX)
    }

    fn flush(&mut self, at_ms: u64) {
        let drained: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        self.timeline
            .extend(drained.into_iter().map(|event| TimelineEntry { at_ms, event }));
    }

    /// Fire every continuation due at or before `until`, each at its own
    /// instant.
    fn run_until(&mut self, until: Option<Instant>) {
        while let Some(due) = self.engine.pending_deadline() {
            if until.is_some_and(|limit| due > limit) {
                break;
            }
            self.engine.advance(due);
            let ms = self.ms_since_base(due);
            self.flush(ms);
        }
    }

    fn apply(&mut self, step: &ScriptStep) {
        let now = self.at(step.at_ms);
        self.run_until(Some(now));
        match &step.step {
            Step::Input(event) => {
                self.engine.handle_input(SURFACE, event, now);
            }
            Step::Action(action) => {
                let outcome = self.act(action, now);
                self.pending.borrow_mut().push(TimelineEvent::Action {
                    name: action.name(),
                    outcome,
                });
            }
        }
        self.flush(step.at_ms);
    }

    /// Close the timeline with the saved notes, stamped at the last entry.
    fn finish(mut self) -> Vec<TimelineEntry> {
        let notes = self.engine.notes();
        if !notes.is_empty() {
            let at_ms = self.timeline.last().map_or(0, |e| e.at_ms);
            let dates = notes.dates().map(|d| d.to_string()).collect();
            self.timeline.push(TimelineEntry {
                at_ms,
                event: TimelineEvent::Notes { dates },
            });
        }
        self.timeline
    }

    fn act(&mut self, action: &Action, now: Instant) -> &'static str {
        let engine = &mut self.engine;
        match action {
            Action::GoBack => outcome_name(engine.go_back(now)),
            Action::SelectDate(date) => outcome_name(engine.select_date(*date, now)),
            Action::SelectMonth(month) => outcome_name(engine.select_month(*month, now)),
            Action::NextMonth => refused_or_applied(engine.next_month(now)),
            Action::PrevMonth => refused_or_applied(engine.prev_month(now)),
            Action::NextYear => refused_or_applied(engine.next_year(now)),
            Action::PrevYear => refused_or_applied(engine.prev_year(now)),
            Action::SaveNote(text) => refused_or_applied(engine.save_note(text.clone(), now)),
            Action::SaveAndGoBack(text) => outcome_name(engine.save_and_go_back(text.clone(), now)),
            Action::Reset => {
                engine.reset();
                "applied"
            }
        }
    }
}

fn outcome_name(outcome: TriggerOutcome) -> &'static str {
    match outcome {
        TriggerOutcome::Started(_) => "started",
        TriggerOutcome::Applied(_) => "applied",
        TriggerOutcome::Dropped => "dropped",
        TriggerOutcome::Ignored => "ignored",
    }
}

fn refused_or_applied(applied: bool) -> &'static str {
    if applied { "applied" } else { "refused" }
}

/// Run `steps` to completion, including every transition they start.
#[must_use]
pub fn replay(steps: &[ScriptStep], options: ReplayOptions) -> Vec<TimelineEntry> {
    let pending = Rc::new(RefCell::new(Vec::new()));
    let mut engine = CalendarEngine::new(options.config, options.layout, options.start);
    engine.subscribe(Box::new(Recorder(pending.clone())));
    engine.attach(SURFACE);

    let mut run = Replay {
        engine,
        pending,
        base: Instant::now(),
        timeline: Vec::new(),
    };
    for step in steps {
        tracing::trace!(target: "pinchcal.harness", line = step.line, at_ms = step.at_ms, "step");
        run.apply(step);
    }
    run.run_until(None);
    run.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    fn options() -> ReplayOptions {
        ReplayOptions {
            config: EngineConfig::default(),
            start: CalendarCursor::new(2024, MonthIndex::new(2).unwrap()),
            layout: GridLayout::default(),
        }
    }

    fn views(timeline: &[TimelineEntry]) -> Vec<(u64, &'static str, &'static str)> {
        timeline
            .iter()
            .filter_map(|e| match e.event {
                TimelineEvent::View { state, phase, .. } => Some((e.at_ms, state, phase)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn phase_changes_are_stamped_at_due_time() {
        let steps = parse_script(
            r#"{"at_ms": 100, "input": {"kind": "wheel", "dy": 3, "mods": "CTRL"}}
{"at_ms": 2000, "action": "next_year"}"#,
        )
        .unwrap();
        let timeline = replay(&steps, options());
        assert!(!timeline
            .iter()
            .any(|e| matches!(e.event, TimelineEvent::Notes { .. })));
        assert_eq!(
            views(&timeline),
            vec![
                (100, "month", "leaving"),
                (400, "year", "entering_settling"),
                (450, "year", "settled"),
            ]
        );
        assert!(timeline.iter().any(|e| e.at_ms == 2000
            && e.event
                == TimelineEvent::Action {
                    name: "next_year",
                    outcome: "applied"
                }));
    }

    #[test]
    fn select_date_then_save_and_go_back() {
        let steps = parse_script(
            r#"{"at_ms": 0, "action": {"select_date": "2024-03-15"}}
{"at_ms": 10, "action": {"save_note": "too soon"}}
{"at_ms": 500, "action": {"save_and_go_back": "dentist"}}"#,
        )
        .unwrap();
        let timeline = replay(&steps, options());
        let actions: Vec<_> = timeline
            .iter()
            .filter_map(|e| match e.event {
                TimelineEvent::Action { name, outcome } => Some((name, outcome)),
                _ => None,
            })
            .collect();
        assert_eq!(
            actions,
            vec![
                ("select_date", "started"),
                ("save_note", "refused"),
                ("save_and_go_back", "started"),
            ]
        );
        let last = views(&timeline).pop().unwrap();
        assert_eq!(last, (850, "month", "settled"));
        assert_eq!(
            timeline.last().unwrap(),
            &TimelineEntry {
                at_ms: 850,
                event: TimelineEvent::Notes {
                    dates: vec!["2024-03-15".to_string()]
                },
            }
        );
    }

    #[test]
    fn wheel_coordinates_pick_the_date() {
        // Cell centre of 2024-03-15 in the default layout.
        let steps = parse_script(
            r#"{"at_ms": 0, "input": {"kind": "wheel", "x": 220, "y": 160, "dy": -2, "mods": "CTRL"}}"#,
        )
        .unwrap();
        let timeline = replay(&steps, options());
        let first = timeline
            .iter()
            .find_map(|e| match &e.event {
                TimelineEvent::View { tag, selected_date, .. } => Some((*tag, selected_date.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(first, (Some("slide-in"), Some("2024-03-15".to_string())));
    }

    #[test]
    fn entries_serialize_flat() {
        let entry = TimelineEntry {
            at_ms: 5,
            event: TimelineEvent::Hover { month: Some(3) },
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"at_ms":5,"event":"hover","month":3}"#);
    }
}

#![forbid(unsafe_code)]

//! Three-state view machine with timed transition phases.
//!
//! [`ViewTransitionController`] is in exactly one [`ViewState`] (Month, Year,
//! Note) and one [`TransitionPhase`] at any instant. Animated transitions
//! follow a fixed protocol:
//!
//! ```text
//! trigger ─▶ Leaving (tag published)
//!            ── leave_phase ──▶ EnteringSettling (state switched, tag kept)
//!            ── settle_phase ─▶ Settled (tag cleared)
//! ```
//!
//! # Transition table
//!
//! | State | Trigger | Tag | Target |
//! |---|---|---|---|
//! | Month | pinch-out over a date | slide-in | Note |
//! | Month | pinch-in | zoom-out | Year |
//! | Month | select date | slide-in | Note |
//! | Year | pinch-in / pinch-out | zoom-in | Month |
//! | Year | select month | none (immediate) | Month |
//! | Note | pinch-in / go back | slide-out | Month |
//!
//! # Invariants
//!
//! 1. Triggers are accepted only while `Settled`; anything else is dropped.
//! 2. Leaving phases of two transitions never overlap.
//! 3. Each transition gets a fresh generation; a continuation whose generation
//!    is not current is discarded without touching state.
//! 4. A follow-up continuation is due relative to its predecessor's due
//!    instant, so late `advance` calls replay the chain exactly.
//!
//! # Failure Modes
//!
//! - Triggers with no edge from the current state are ignored.
//! - `reset()` mid-transition cancels the chain and settles on the target.

use web_time::Instant;

use pinchcal_core::TransitionConfig;

use crate::calendar::{DateKey, MonthIndex};
use crate::scheduler::{Scheduler, TimerId};
use crate::view::{TransitionPhase, ViewSnapshot, ViewState, VisualTag};

/// A request to change view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    PinchIn,
    /// Pinch-out with no resolved target.
    PinchOut,
    /// Pinch-out whose position hit-tested to a day in the month grid.
    PinchOutOverDate(DateKey),
    SelectDate(DateKey),
    SelectMonth(MonthIndex),
    GoBack,
}

/// What the controller did with a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// An animated transition began; the snapshot is in `Leaving`.
    Started(ViewSnapshot),
    /// The view changed immediately and is `Settled`.
    Applied(ViewSnapshot),
    /// A transition is in flight.
    Dropped,
    /// No edge from the current state.
    Ignored,
}

impl TriggerOutcome {
    #[must_use]
    pub const fn snapshot(&self) -> Option<ViewSnapshot> {
        match self {
            Self::Started(s) | Self::Applied(s) => Some(*s),
            Self::Dropped | Self::Ignored => None,
        }
    }

    #[must_use]
    pub const fn accepted(&self) -> bool {
        matches!(self, Self::Started(_) | Self::Applied(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum StepKind {
    Enter,
    Settle,
}

#[derive(Debug, Clone, Copy)]
struct Step {
    generation: u64,
    kind: StepKind,
}

struct Edge {
    target: ViewState,
    tag: Option<VisualTag>,
    select: Option<DateKey>,
}

/// Drives the view state machine through timed transition phases.
#[derive(Debug)]
pub struct ViewTransitionController {
    config: TransitionConfig,
    state: ViewState,
    phase: TransitionPhase,
    tag: Option<VisualTag>,
    selected_date: Option<DateKey>,
    target: Option<ViewState>,
    generation: u64,
    steps: Scheduler<Step>,
    /// Continuation of the in-flight transition.
    pending: Option<TimerId>,
}

impl ViewTransitionController {
    /// Controller in Month, Settled.
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            state: ViewState::Month,
            phase: TransitionPhase::Settled,
            tag: None,
            selected_date: None,
            target: None,
            generation: 0,
            steps: Scheduler::new(),
            pending: None,
        }
    }

    /// Offer a trigger at `now`.
    pub fn request(&mut self, trigger: Trigger, now: Instant) -> TriggerOutcome {
        if self.phase != TransitionPhase::Settled {
            tracing::debug!(
                target: "pinchcal.view",
                ?trigger,
                state = %self.state,
                phase = %self.phase,
                "trigger dropped mid-transition"
            );
            return TriggerOutcome::Dropped;
        }

        let Some(edge) = Self::edge(self.state, trigger) else {
            tracing::trace!(target: "pinchcal.view", ?trigger, state = %self.state, "no edge");
            return TriggerOutcome::Ignored;
        };

        if let Some(date) = edge.select {
            self.selected_date = Some(date);
        }
        self.generation += 1;

        let Some(tag) = edge.tag else {
            self.state = edge.target;
            tracing::debug!(target: "pinchcal.view", to = %self.state, "view switched immediately");
            return TriggerOutcome::Applied(self.snapshot());
        };

        self.phase = TransitionPhase::Leaving;
        self.tag = Some(tag);
        self.target = Some(edge.target);
        self.pending = Some(self.steps.schedule(
            now + self.config.leave_phase,
            Step {
                generation: self.generation,
                kind: StepKind::Enter,
            },
        ));
        tracing::debug!(
            target: "pinchcal.view",
            from = %self.state,
            to = %edge.target,
            %tag,
            generation = self.generation,
            "transition started"
        );
        TriggerOutcome::Started(self.snapshot())
    }

    /// Fire every continuation due at or before `now`.
    ///
    /// Returns one snapshot per phase change, in order.
    pub fn advance(&mut self, now: Instant) -> Vec<ViewSnapshot> {
        let mut changes = Vec::new();
        while let Some((_, due, step)) = self.steps.pop_due(now) {
            if step.generation != self.generation {
                tracing::debug!(
                    target: "pinchcal.view",
                    stale = step.generation,
                    current = self.generation,
                    "stale continuation discarded"
                );
                continue;
            }
            match step.kind {
                StepKind::Enter => {
                    if let Some(target) = self.target {
                        self.state = target;
                    }
                    self.phase = TransitionPhase::EnteringSettling;
                    self.pending = Some(self.steps.schedule(
                        due + self.config.settle_phase,
                        Step {
                            generation: step.generation,
                            kind: StepKind::Settle,
                        },
                    ));
                }
                StepKind::Settle => {
                    self.phase = TransitionPhase::Settled;
                    self.tag = None;
                    self.target = None;
                    self.pending = None;
                    tracing::debug!(
                        target: "pinchcal.view",
                        state = %self.state,
                        generation = self.generation,
                        "transition settled"
                    );
                }
            }
            changes.push(self.snapshot());
        }
        changes
    }

    /// Cancel any in-flight transition and settle on its target.
    ///
    /// Returns the snapshot if anything changed.
    pub fn reset(&mut self) -> Option<ViewSnapshot> {
        if let Some(id) = self.pending.take() {
            self.steps.cancel(id);
        }
        if self.phase == TransitionPhase::Settled {
            return None;
        }
        if let Some(target) = self.target.take() {
            self.state = target;
        }
        self.phase = TransitionPhase::Settled;
        self.tag = None;
        self.generation += 1;
        Some(self.snapshot())
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.state,
            phase: self.phase,
            tag: self.tag,
            selected_date: self.selected_date,
            generation: self.generation,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase == TransitionPhase::Settled
    }

    #[inline]
    #[must_use]
    pub fn selected_date(&self) -> Option<DateKey> {
        self.selected_date
    }

    /// When the next continuation is due, if a transition is in flight.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.steps.next_due()
    }

    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Update the delays. In-flight continuations keep their due instants.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    fn edge(state: ViewState, trigger: Trigger) -> Option<Edge> {
        let animated = |target, tag| Edge {
            target,
            tag: Some(tag),
            select: None,
        };
        match (state, trigger) {
            (ViewState::Month, Trigger::PinchIn) => Some(animated(ViewState::Year, VisualTag::ZoomOut)),
            (ViewState::Month, Trigger::PinchOutOverDate(date) | Trigger::SelectDate(date)) => {
                Some(Edge {
                    select: Some(date),
                    ..animated(ViewState::Note, VisualTag::SlideIn)
                })
            }
            (ViewState::Year, Trigger::PinchIn | Trigger::PinchOut) => {
                Some(animated(ViewState::Month, VisualTag::ZoomIn))
            }
            (ViewState::Year, Trigger::SelectMonth(_)) => Some(Edge {
                target: ViewState::Month,
                tag: None,
                select: None,
            }),
            (ViewState::Note, Trigger::PinchIn | Trigger::GoBack) => {
                Some(animated(ViewState::Month, VisualTag::SlideOut))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

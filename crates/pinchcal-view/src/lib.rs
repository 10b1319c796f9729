// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! View layer: calendar navigation driven by pinch gestures.
//!
//! # Role in pinchcal
//! `pinchcal-view` sits between the input layer (`pinchcal-core`) and the
//! presentation layer. It resolves what a pinch happened over, runs the
//! Month/Year/Note state machine through its timed phases and tells
//! observers what to draw.
//!
//! # Primary responsibilities
//! - **ViewTransitionController**: three views, three phases, generation-guarded
//!   continuations.
//! - **GestureRouter**: pinch-to-trigger routing and year-view hover.
//! - **CalendarEngine**: the single long-lived instance owning all of the above
//!   plus the cursor, notes and observers.
//! - **Calendar model**: date keys, month indices, Sunday-first month grids.
//!
//! # How it fits in the system
//! The host attaches a surface, forwards raw input to
//! [`CalendarEngine::handle_input`] and calls [`CalendarEngine::advance`] from
//! its frame loop. Rendering code implements [`HitTester`] and
//! [`EngineObserver`]; the engine never touches a rendered tree.

pub mod calendar;
pub mod controller;
pub mod engine;
pub mod notes;
pub mod observer;
pub mod router;
pub mod scheduler;
pub mod view;

pub use calendar::{CalendarCursor, DateKey, MonthGrid, MonthIndex, month_grid};
pub use controller::{Trigger, TriggerOutcome, ViewTransitionController};
pub use engine::{CalendarEngine, InputDisposition, SurfaceId};
pub use hit_test::HitTester;
pub use notes::NotesStore;
pub use observer::{EngineObserver, ObserverRegistry, SubscriptionId};
pub use router::{GestureRouter, RoutedPinch};
pub use scheduler::{Scheduler, TimerId};
pub use view::{TransitionPhase, ViewSnapshot, ViewState, VisualTag};

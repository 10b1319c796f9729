// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: input normalization and pinch recognition.
//!
//! # Role in pinchcal
//! `pinchcal-core` is the input layer. It turns raw pointer, touch and wheel
//! events from the host surface into discrete [`PinchEvent`]s and keeps the
//! last known pointer position.
//!
//! # Primary responsibilities
//! - **PointerTracker**: last pointer or two-touch midpoint.
//! - **PinchSession**: two-contact baseline, ratio thresholding, one-shot emission.
//! - **WheelGestureAdapter**: modified wheel ticks as simulated pinches.
//! - **CooldownClock**: the rate limit shared by both sources.
//! - **EngineConfig**: thresholds and transition timings.
//!
//! # How it fits in the system
//! The view layer (`pinchcal-view`) consumes [`PinchEvent`] values, resolves
//! their targets through hit-testing and drives the view state machine. This
//! crate knows nothing about calendars or views.

pub mod config;
pub mod cooldown;
pub mod geometry;
pub mod input;
pub mod pinch;
pub mod pointer;
pub mod recognizer;
pub mod wheel;

pub use config::{EngineConfig, GestureConfig, TransitionConfig};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use cooldown::CooldownClock;
pub use geometry::{PointerPosition, Rect};
pub use input::{InputEvent, Modifiers, TouchInput, TouchPhase, TouchPoint, WheelInput};
pub use pinch::{GestureBaseline, PinchEvent, PinchKind, PinchSession, PinchSource, classify_ratio};
pub use pointer::PointerTracker;
pub use recognizer::{GestureRecognizer, Recognition};
pub use wheel::{WheelGestureAdapter, WheelOutcome};

#![forbid(unsafe_code)]

//! Script-driven replay harness for the pinchcal engine.
//!
//! Feeds recorded input (JSONL) through a [`pinchcal_view::CalendarEngine`]
//! laid out by a synthetic [`layout::GridLayout`] and prints every
//! notification as a JSON line.

pub mod cli;
pub mod error;
pub mod layout;
pub mod logging;
pub mod replay;
pub mod script;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};

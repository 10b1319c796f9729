//! JSONL input scripts.
//!
//! One step per line, timestamped in milliseconds from the start of the
//! replay:
//!
//! ```text
//! # comment
//! {"at_ms": 0, "input": {"kind": "wheel", "dy": 5, "mods": "CTRL"}}
//! {"at_ms": 400, "action": "go_back"}
//! {"at_ms": 800, "action": {"select_date": "2024-03-15"}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Timestamps must not
//! decrease.

use std::path::Path;

use pinchcal_core::InputEvent;
use pinchcal_view::{DateKey, MonthIndex};
use serde::Deserialize;

use crate::error::{HarnessError, Result};

/// A direct operation, as written in a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawAction {
    GoBack,
    SelectDate(String),
    SelectMonth(u8),
    NextMonth,
    PrevMonth,
    NextYear,
    PrevYear,
    SaveNote(String),
    SaveAndGoBack(String),
    Reset,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLine {
    at_ms: u64,
    #[serde(default)]
    input: Option<InputEvent>,
    #[serde(default)]
    action: Option<RawAction>,
}

/// A validated direct operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GoBack,
    SelectDate(DateKey),
    SelectMonth(MonthIndex),
    NextMonth,
    PrevMonth,
    NextYear,
    PrevYear,
    SaveNote(String),
    SaveAndGoBack(String),
    Reset,
}

impl Action {
    /// Name used in timeline output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GoBack => "go_back",
            Self::SelectDate(_) => "select_date",
            Self::SelectMonth(_) => "select_month",
            Self::NextMonth => "next_month",
            Self::PrevMonth => "prev_month",
            Self::NextYear => "next_year",
            Self::PrevYear => "prev_year",
            Self::SaveNote(_) => "save_note",
            Self::SaveAndGoBack(_) => "save_and_go_back",
            Self::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Input(InputEvent),
    Action(Action),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    /// 1-based source line.
    pub line: usize,
    pub at_ms: u64,
    pub step: Step,
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    let mut last_ms = 0;
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: RawLine =
            serde_json::from_str(trimmed).map_err(|e| HarnessError::script(line, e.to_string()))?;
        if parsed.at_ms < last_ms {
            return Err(HarnessError::script(
                line,
                format!("at_ms {} is before the previous step ({last_ms})", parsed.at_ms),
            ));
        }
        last_ms = parsed.at_ms;

        let step = match (parsed.input, parsed.action) {
            (Some(input), None) => Step::Input(input),
            (None, Some(action)) => Step::Action(resolve_action(line, action)?),
            (Some(_), Some(_)) => {
                return Err(HarnessError::script(line, "both `input` and `action` given"));
            }
            (None, None) => return Err(HarnessError::script(line, "expected `input` or `action`")),
        };
        steps.push(ScriptStep {
            line,
            at_ms: parsed.at_ms,
            step,
        });
    }
    Ok(steps)
}

/// Read and parse a script file.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

fn resolve_action(line: usize, action: RawAction) -> Result<Action> {
    Ok(match action {
        RawAction::GoBack => Action::GoBack,
        RawAction::SelectDate(text) => {
            let date = text
                .parse::<DateKey>()
                .map_err(|e| HarnessError::script(line, format!("bad date {text:?}: {e}")))?;
            Action::SelectDate(date)
        }
        RawAction::SelectMonth(index) => {
            let month = MonthIndex::new(index)
                .ok_or_else(|| HarnessError::script(line, format!("month index {index} out of range")))?;
            Action::SelectMonth(month)
        }
        RawAction::NextMonth => Action::NextMonth,
        RawAction::PrevMonth => Action::PrevMonth,
        RawAction::NextYear => Action::NextYear,
        RawAction::PrevYear => Action::PrevYear,
        RawAction::SaveNote(text) => Action::SaveNote(text),
        RawAction::SaveAndGoBack(text) => Action::SaveAndGoBack(text),
        RawAction::Reset => Action::Reset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinchcal_core::{Modifiers, TouchPhase};

    #[test]
    fn parses_inputs_and_actions() {
        let script = r#"
# zoom out with ctrl+wheel, then open a month
{"at_ms": 0, "input": {"kind": "wheel", "dy": 5, "mods": "CTRL"}}

{"at_ms": 400, "action": {"select_month": 6}}
{"at_ms": 400, "action": "next_month"}
{"at_ms": 900, "input": {"kind": "touch", "phase": "end"}}
"#;
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].line, 3);
        assert_eq!(steps[0].step, Step::Input(InputEvent::wheel(5.0, Modifiers::CTRL)));
        assert_eq!(
            steps[1].step,
            Step::Action(Action::SelectMonth(MonthIndex::new(6).unwrap()))
        );
        assert_eq!(steps[2].step, Step::Action(Action::NextMonth));
        assert_eq!(
            steps[3].step,
            Step::Input(InputEvent::touch(TouchPhase::End, Vec::new()))
        );
    }

    #[test]
    fn rejects_bad_dates_with_line_number() {
        let err = parse_script(r#"{"at_ms": 0, "action": {"select_date": "2024-02-30"}}"#).unwrap_err();
        assert!(matches!(err, HarnessError::Script { line: 1, .. }));
    }

    #[test]
    fn rejects_out_of_range_month() {
        let err = parse_script(r#"{"at_ms": 0, "action": {"select_month": 12}}"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn rejects_time_travel() {
        let script = "{\"at_ms\": 10, \"action\": \"go_back\"}\n{\"at_ms\": 5, \"action\": \"go_back\"}";
        let err = parse_script(script).unwrap_err();
        assert!(matches!(err, HarnessError::Script { line: 2, .. }));
    }

    #[test]
    fn requires_exactly_one_payload() {
        assert!(parse_script(r#"{"at_ms": 0}"#).is_err());
        let both = r#"{"at_ms": 0, "action": "reset", "input": {"kind": "pointer_move", "x": 1, "y": 2}}"#;
        assert!(parse_script(both).is_err());
    }

    #[test]
    fn action_names_match_script_spelling() {
        assert_eq!(Action::SaveAndGoBack(String::new()).name(), "save_and_go_back");
        assert_eq!(Action::SelectDate(DateKey::from_ymd(2024, 1, 1).unwrap()).name(), "select_date");
    }
}

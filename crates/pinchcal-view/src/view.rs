#![forbid(unsafe_code)]

//! View-machine vocabulary shared by the controller, router and observers.

use std::fmt;

use crate::calendar::DateKey;

/// Which of the three views is active. Month is initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    #[default]
    Month,
    Year,
    Note,
}

impl ViewState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the view is static or mid-animation.
///
/// While not `Settled`, the outgoing view's interactive surface is
/// non-authoritative and every trigger is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionPhase {
    #[default]
    Settled,
    /// Outgoing tag published; the old view is still shown.
    Leaving,
    /// The new view is shown; the tag is still applied.
    EnteringSettling,
}

impl TransitionPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Settled => "settled",
            Self::Leaving => "leaving",
            Self::EnteringSettling => "entering_settling",
        }
    }
}

impl fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual class applied to the view container during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualTag {
    ZoomOut,
    ZoomIn,
    SlideIn,
    SlideOut,
}

impl VisualTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZoomOut => "zoom-out",
            Self::ZoomIn => "zoom-in",
            Self::SlideIn => "slide-in",
            Self::SlideOut => "slide-out",
        }
    }
}

impl fmt::Display for VisualTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the presentation layer needs to draw the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub state: ViewState,
    pub phase: TransitionPhase,
    pub tag: Option<VisualTag>,
    /// Set on entering Note; retained (inert) after leaving it.
    pub selected_date: Option<DateKey>,
    /// Transition instance this snapshot belongs to.
    pub generation: u64,
}

impl ViewSnapshot {
    #[inline]
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.phase, TransitionPhase::Settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_render_as_css_classes() {
        assert_eq!(VisualTag::ZoomOut.to_string(), "zoom-out");
        assert_eq!(VisualTag::ZoomIn.to_string(), "zoom-in");
        assert_eq!(VisualTag::SlideIn.to_string(), "slide-in");
        assert_eq!(VisualTag::SlideOut.to_string(), "slide-out");
    }

    #[test]
    fn initial_values() {
        assert_eq!(ViewState::default(), ViewState::Month);
        assert_eq!(TransitionPhase::default(), TransitionPhase::Settled);
    }
}

//! The rendering surface the controllers drive.
//!
//! Controllers never print or prompt directly; they call into a `Surface`.
//! The terminal implementation lives in `terminal.rs`.

use whereabouts_core::{
    ConflictAnnotatedEntry, EntryId, EntryWindow, ScheduleEntry, StatusView, WhereaboutsError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
    Info,
    Warning,
}

/// A transient notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Failure,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Warning,
            text: text.into(),
        }
    }
}

/// Notification guide panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidePanel {
    /// "Enable" or "skip".
    Onboarding,
    /// How to re-enable notifications by hand, with a retry affordance.
    ManualSteps,
}

/// State of the create form's submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitControl {
    Ready,
    Submitting,
}

impl SubmitControl {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitControl::Ready => "Submit",
            SubmitControl::Submitting => "Submitting...",
        }
    }
}

pub trait Surface {
    fn render_entries(&mut self, entries: &[ConflictAnnotatedEntry]);

    /// The entry list could not be fetched.
    fn show_fetch_failure(&mut self, error: &WhereaboutsError);

    fn toast(&mut self, toast: Toast);

    fn set_submit_control(&mut self, control: SubmitControl);

    /// Offer the dismissible delete confirmation for an entry.
    fn ask_delete_confirmation(&mut self, entry: &ScheduleEntry);

    fn remove_entry(&mut self, id: EntryId);

    /// Put an entry back where it was before a drag or resize.
    fn revert_entry(&mut self, id: EntryId, window: EntryWindow);

    fn render_status(&mut self, view: &StatusView);

    fn show_guide(&mut self, panel: GuidePanel);

    fn hide_guide(&mut self);
}

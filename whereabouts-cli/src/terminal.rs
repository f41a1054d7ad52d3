//! `Surface` for an interactive terminal.

use chrono::Utc;
use chrono_tz::Tz;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use whereabouts_core::{
    ConflictAnnotatedEntry, EntryId, EntryWindow, ScheduleEntry, StatusView, WhereaboutsError,
};

use crate::render::{Render, RenderIn, day_label};
use crate::surface::{GuidePanel, SubmitControl, Surface, Toast};
use crate::utils::tui;

pub struct TerminalSurface {
    tz: Tz,
    entries: Vec<ConflictAnnotatedEntry>,
    pending_delete: Option<ScheduleEntry>,
    guide: Option<GuidePanel>,
    spinner: Option<ProgressBar>,
    echo_entries: bool,
}

impl TerminalSurface {
    pub fn new(tz: Tz) -> Self {
        TerminalSurface {
            tz,
            entries: Vec::new(),
            pending_delete: None,
            guide: None,
            spinner: None,
            echo_entries: true,
        }
    }

    /// Whether fetched entry lists are printed. Commands that only need the
    /// list to look an entry up turn this off for that fetch.
    pub fn set_echo_entries(&mut self, echo: bool) {
        self.echo_entries = echo;
    }

    /// The entry awaiting a yes/no, if a delete was requested.
    pub fn take_pending_delete(&mut self) -> Option<ScheduleEntry> {
        self.pending_delete.take()
    }

    pub fn guide(&self) -> Option<GuidePanel> {
        self.guide
    }

    fn print_entries(&self) {
        if self.entries.is_empty() {
            println!("{}", "No entries".dimmed());
            return;
        }

        let today = Utc::now().with_timezone(&self.tz).date_naive();
        let mut current_date = None;

        for annotated in &self.entries {
            let date = annotated.entry.start_time.with_timezone(&self.tz).date_naive();

            if current_date != Some(date) {
                if current_date.is_some() {
                    println!();
                }
                println!("{}", day_label(date, today).bold());
                current_date = Some(date);
            }

            println!("{}", annotated.render_in(&self.tz));
        }

        let conflicts = self.entries.iter().filter(|e| e.is_conflicting).count();
        if conflicts > 0 {
            println!();
            println!(
                "{}",
                format!("{conflicts} overlapping entries marked with !").red()
            );
        }
    }
}

impl Surface for TerminalSurface {
    fn render_entries(&mut self, entries: &[ConflictAnnotatedEntry]) {
        self.entries = entries.to_vec();
        if !self.echo_entries {
            return;
        }
        // A submit refetches while its spinner is still drawn.
        match self.spinner.clone() {
            Some(spinner) => spinner.suspend(|| self.print_entries()),
            None => self.print_entries(),
        }
    }

    fn show_fetch_failure(&mut self, error: &WhereaboutsError) {
        eprintln!("{}", format!("Could not load entries: {error}").red());
    }

    fn toast(&mut self, toast: Toast) {
        match &self.spinner {
            Some(spinner) => spinner.println(toast.render()),
            None => println!("{}", toast.render()),
        }
    }

    fn set_submit_control(&mut self, control: SubmitControl) {
        match control {
            SubmitControl::Submitting => {
                self.spinner = Some(tui::create_spinner(control.label()));
            }
            SubmitControl::Ready => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.finish_and_clear();
                }
            }
        }
    }

    fn ask_delete_confirmation(&mut self, entry: &ScheduleEntry) {
        println!("{}", "Delete this entry?".bold());
        let annotated = self.entries.iter().find(|e| e.entry.id == entry.id);
        match annotated {
            Some(annotated) => println!("{}", annotated.render_in(&self.tz)),
            None => println!("  {entry}"),
        }
        self.pending_delete = Some(entry.clone());
    }

    fn remove_entry(&mut self, id: EntryId) {
        self.entries.retain(|e| e.entry.id != id);
    }

    fn revert_entry(&mut self, id: EntryId, window: EntryWindow) {
        if let Some(annotated) = self.entries.iter_mut().find(|e| e.entry.id == id) {
            annotated.entry.set_window(window);
            println!(
                "{}",
                format!("Entry #{id} kept at its previous time").dimmed()
            );
            println!("{}", annotated.render_in(&self.tz));
        }
    }

    fn render_status(&mut self, view: &StatusView) {
        println!("{} {}", "Status:".bold(), view.render());
    }

    fn show_guide(&mut self, panel: GuidePanel) {
        self.guide = Some(panel);

        println!();
        match panel {
            GuidePanel::Onboarding => {
                println!("{}", "Get notified when the status changes".bold());
                println!(
                    "  Run {} to turn on desktop notifications,",
                    "whereabouts notify enable".cyan()
                );
                println!(
                    "  or {} to stop being asked.",
                    "whereabouts notify skip".cyan()
                );
            }
            GuidePanel::ManualSteps => {
                println!("{}", "Desktop notifications are off".bold());
                println!("  1. Allow notifications for your terminal in the system settings.");
                println!("  2. Make sure a notification daemon is running.");
                println!(
                    "  3. Run {} to check again.",
                    "whereabouts notify retry".cyan()
                );
            }
        }
        println!();
    }

    fn hide_guide(&mut self) {
        self.guide = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;
    use whereabouts_core::detect_conflicts;

    fn entry(id: EntryId, start: u32, end: u32) -> ScheduleEntry {
        ScheduleEntry {
            id,
            location: "Lab 712".to_string(),
            info_source: None,
            start_time: Utc.with_ymd_and_hms(2025, 6, 30, start, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 6, 30, end, 0, 0).unwrap(),
        }
    }

    #[test]
    fn refetch_during_submit_keeps_the_spinner() {
        let mut surface = TerminalSurface::new(Shanghai);
        surface.set_submit_control(SubmitControl::Submitting);

        surface.render_entries(&detect_conflicts(vec![entry(1, 1, 2), entry(2, 3, 4)]));

        assert!(surface.spinner.is_some());
        assert_eq!(surface.entries.len(), 2);

        surface.set_submit_control(SubmitControl::Ready);
        assert!(surface.spinner.is_none());
    }
}

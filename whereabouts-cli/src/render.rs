//! Colored terminal rendering for whereabouts types, using owo_colors.

use chrono_tz::Tz;
use owo_colors::OwoColorize;

use whereabouts_core::{ConflictAnnotatedEntry, StatusCategory, StatusView};

use crate::surface::{Toast, ToastKind};

pub trait Render {
    fn render(&self) -> String;
}

/// Rendering that depends on the display zone.
pub trait RenderIn {
    fn render_in(&self, tz: &Tz) -> String;
}

impl Render for StatusCategory {
    fn render(&self) -> String {
        match self {
            StatusCategory::In => "●".green().to_string(),
            StatusCategory::Out => "●".yellow().to_string(),
            StatusCategory::Gone => "●".red().to_string(),
            StatusCategory::Unknown => "●".dimmed().to_string(),
        }
    }
}

impl Render for StatusView {
    fn render(&self) -> String {
        let text = match self.category {
            StatusCategory::In => self.text.green().bold().to_string(),
            StatusCategory::Out => self.text.yellow().bold().to_string(),
            StatusCategory::Gone => self.text.red().bold().to_string(),
            StatusCategory::Unknown => self.text.dimmed().to_string(),
        };

        if self.updated_label.is_empty() {
            format!("{} {}", self.category.render(), text)
        } else {
            format!(
                "{} {} {}",
                self.category.render(),
                text,
                self.updated_label.dimmed()
            )
        }
    }
}

impl Render for Toast {
    fn render(&self) -> String {
        match self.kind {
            ToastKind::Success => format!("{} {}", "✓".green(), self.text),
            ToastKind::Failure => format!("{} {}", "✗".red(), self.text.red()),
            ToastKind::Info => format!("{} {}", "·".blue(), self.text),
            ToastKind::Warning => format!("{} {}", "!".yellow(), self.text.yellow()),
        }
    }
}

/// One line of the schedule: time range, location, source, id.
impl RenderIn for ConflictAnnotatedEntry {
    fn render_in(&self, tz: &Tz) -> String {
        let entry = &self.entry;
        let start = entry.start_time.with_timezone(tz);
        let end = entry.end_time.with_timezone(tz);

        let range = if start.date_naive() == end.date_naive() {
            format!("{}–{}", start.format("%H:%M"), end.format("%H:%M"))
        } else {
            format!("{}–{}", start.format("%H:%M"), end.format("%b %-d %H:%M"))
        };

        let marker = if self.is_conflicting {
            "!".red().bold().to_string()
        } else {
            " ".to_string()
        };

        let location = if self.is_conflicting {
            entry.location.red().to_string()
        } else {
            entry.location.clone()
        };

        let mut line = format!("{} {:>11} {}", marker, range, location);

        if let Some(source) = &entry.info_source {
            line.push_str(&format!(" {}", format!("({source})").dimmed().italic()));
        }

        line.push_str(&format!(" {}", format!("#{}", entry.id).dimmed()));
        line
    }
}

/// Day heading for grouped entries, e.g. "Today", "Tomorrow", "Wed Feb 25".
pub fn day_label(date: chrono::NaiveDate, today: chrono::NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

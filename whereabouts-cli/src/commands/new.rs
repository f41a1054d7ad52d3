use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use whereabouts_core::config::BoardConfig;
use whereabouts_core::time::{
    DEFAULT_ENTRY_LENGTH_MINUTES, default_window, parse_instant, parse_local_input,
    to_local_input,
};

use crate::dispatch::UiEvent;
use crate::schedule::FormEdit;

const SOMEWHERE_ELSE: &str = "Somewhere else...";

pub struct NewEntryArgs {
    pub location: Option<String>,
    pub source: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub preset: Option<String>,
}

pub async fn run(config: &BoardConfig, args: NewEntryArgs) -> Result<()> {
    let tz = config.timezone()?;
    let interactive = args.location.is_none() && args.preset.is_none();
    let mut board = super::open_board(config)?;

    // --- Location ---
    if let Some(preset) = args.preset {
        if !config.presets.contains(&preset) {
            anyhow::bail!(
                "Preset '{}' not found. Available: {}",
                preset,
                config.presets.join(", ")
            );
        }
        board.dispatch(UiEvent::PresetSelected(preset)).await;
    } else {
        let location = match args.location {
            Some(location) => location,
            None => prompt_location(&config.presets)?,
        };
        board
            .dispatch(UiEvent::FormEdited(FormEdit {
                location: Some(location),
                ..Default::default()
            }))
            .await;
    }

    // --- Source ---
    let source = match args.source {
        Some(source) => Some(source),
        None if interactive => {
            let source: String = Input::new()
                .with_prompt("  Source? (skip)")
                .default(String::new())
                .show_default(false)
                .interact_text()?;
            Some(source)
        }
        None => None,
    };

    // --- Window ---
    let start = match args.start {
        Some(s) => Some(parse_when(&s, &tz)?),
        None if interactive => prompt_start(&tz)?,
        None => None,
    };

    let explicit_end = args.end.is_some() || args.duration.is_some();
    let window = if start.is_some() || explicit_end {
        let start = start.unwrap_or_else(|| default_window(Utc::now()).start);
        let end = if let Some(end) = args.end {
            parse_when(&end, &tz)?
        } else if let Some(duration) = args.duration {
            apply_duration(start, &duration)?
        } else if interactive {
            prompt_end(start, &tz)?
        } else {
            default_end(start)
        };
        Some((start, end))
    } else {
        None
    };

    board
        .dispatch(UiEvent::FormEdited(FormEdit {
            info_source: source,
            start: window.map(|(start, _)| to_local_input(start, &tz)),
            end: window.map(|(_, end)| to_local_input(end, &tz)),
            ..Default::default()
        }))
        .await;

    if interactive {
        println!();
    }

    board.dispatch(UiEvent::SubmitClicked).await;

    Ok(())
}

/// Pick a preset, or type a location.
fn prompt_location(presets: &[String]) -> Result<String> {
    if !presets.is_empty() {
        let mut items: Vec<&str> = presets.iter().map(String::as_str).collect();
        items.push(SOMEWHERE_ELSE);

        let selection = Select::new()
            .with_prompt("  Where?")
            .items(&items)
            .default(0)
            .interact()?;

        if selection < presets.len() {
            return Ok(presets[selection].clone());
        }
    }

    Ok(Input::<String>::new()
        .with_prompt("  Where?")
        .interact_text()?)
}

/// Empty input keeps the default window.
fn prompt_start(tz: &Tz) -> Result<Option<DateTime<Utc>>> {
    loop {
        let input: String = Input::new()
            .with_prompt("  When? (now)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(None);
        }
        match parse_when(&input, tz) {
            Ok(start) => return Ok(Some(start)),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_end(start: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>> {
    loop {
        let input: String = Input::new()
            .with_prompt("  How long? (1 hour)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(default_end(start));
        }
        match parse_end(&input, start, tz) {
            Ok(end) => return Ok(end),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .split_whitespace()
        .map(str::to_lowercase)
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| (*full).to_string())
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a start or end time in the display zone: the form's own
/// `YYYY-MM-DDTHH:MM`, a full timestamp, or natural language.
pub(crate) fn parse_when(input: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(instant) = parse_local_input(input, tz) {
        return Ok(instant);
    }
    if let Ok(instant) = parse_instant(input, tz) {
        return Ok(instant);
    }

    let expanded = expand_abbreviations(input);
    let naive = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("\"{}\" does not exist in {}", input, tz))
}

/// Parse an end input: a duration after `start` first (humantime), then a
/// date/time.
pub(crate) fn parse_end(input: &str, start: DateTime<Utc>, tz: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(end) = apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    parse_when(cleaned, tz)
}

pub(crate) fn apply_duration(start: DateTime<Utc>, input: &str) -> Result<DateTime<Utc>> {
    let std_dur = humantime::parse_duration(input.trim())
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;
    Ok(start + chrono_dur)
}

fn default_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::minutes(DEFAULT_ENTRY_LENGTH_MINUTES)
}

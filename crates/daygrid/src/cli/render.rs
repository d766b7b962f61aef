//! Terminal rendering of [`CmdResult`] values.
//!
//! Every function here builds a `String`; printing is left to `commands.rs`.
//! Styling goes through `console`, which drops colors when the output is not
//! a terminal, so tests can match plain text.

use chrono::{DateTime, Datelike, Local, Utc};
use console::style;
use daygridapp::commands::{CmdMessage, CmdResult, DayEntry, MessageLevel};
use daygridapp::model::{DayKey, DAYS_IN_GRID};
use daygridapp::settings::AppSettings;
use daygridapp::store::access::AccessStatus;
use daygridapp::store::selector::StorageStatus;
use std::collections::BTreeSet;
use std::fmt::Write;

const WRITTEN_DOT: char = '●';
const EMPTY_DOT: char = '·';
const TODAY_DOT: char = '○';

/// Renders a whole command result. With `grid_year`, entries are drawn as
/// that year's grid followed by the list.
pub fn render_result(result: &CmdResult, grid_year: Option<i32>) -> String {
    let mut out = String::new();

    if let Some(year) = grid_year {
        out.push_str(&render_grid(year, &result.entries, DayKey::today().ok()));
        out.push('\n');
    }
    for entry in &result.entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }
    if let Some(status) = &result.status {
        out.push_str(&render_status(status));
    }
    if let Some(settings) = &result.settings {
        out.push_str(&render_settings(settings));
    }
    for message in &result.messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    if result.directory_deleted {
        out.push_str(&recovery_hint());
    }
    out
}

fn render_entry(entry: &DayEntry) -> String {
    let date = entry
        .key
        .date()
        .map(|d| d.format("%a %b %e %Y").to_string())
        .unwrap_or_default();
    let memory = if entry.record.memory.is_empty() {
        style("(empty)".to_string()).dim().italic()
    } else {
        style(entry.record.memory.clone())
    };
    format!(
        "{:>9}  {}  {}  {}",
        style(entry.key.to_string()).yellow(),
        style(date).dim(),
        memory,
        style(format_time_ago(entry.record.date)).dim()
    )
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

/// One row per month, one dot per day on the grid.
///
/// ```text
/// Jan  ●··●···························
/// ```
pub fn render_grid(year: i32, entries: &[DayEntry], today: Option<DayKey>) -> String {
    let written: BTreeSet<u16> = entries
        .iter()
        .filter(|e| e.key.year() == year)
        .map(|e| e.key.day_index())
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {} of {} days",
        style(year).bold(),
        written.len(),
        DAYS_IN_GRID
    );

    let mut current_month = 0;
    for index in 0..DAYS_IN_GRID {
        let Some(date) = DayKey::new(year, index).ok().and_then(|k| k.date()) else {
            continue;
        };
        if date.month() != current_month {
            if current_month != 0 {
                out.push('\n');
            }
            current_month = date.month();
            let _ = write!(out, "{}  ", style(date.format("%b")).dim());
        }
        let is_today = today.is_some_and(|t| t.year() == year && t.day_index() == index);
        let dot = if written.contains(&index) {
            style(WRITTEN_DOT).green()
        } else if is_today {
            style(TODAY_DOT).cyan()
        } else {
            style(EMPTY_DOT).dim()
        };
        let _ = write!(out, "{}", dot);
    }
    out.push('\n');
    out
}

fn describe_access(access: AccessStatus) -> &'static str {
    match access {
        AccessStatus::Unsupported => "not supported on this platform",
        AccessStatus::NotConfigured => "not configured",
        AccessStatus::Accessible => "accessible",
        AccessStatus::Lost => "lost (deleted or permission revoked)",
        AccessStatus::Unavailable => "temporarily unavailable",
    }
}

fn render_status(status: &StorageStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<11}{}", style("Storage:").bold(), status.mode);
    let directory = status.directory.as_deref().unwrap_or("-");
    let _ = writeln!(out, "{:<11}{}", style("Directory:").bold(), directory);
    let _ = writeln!(
        out,
        "{:<11}{}",
        style("Access:").bold(),
        describe_access(status.access)
    );
    let _ = writeln!(out, "{:<11}{}", style("Entries:").bold(), status.entry_count);
    out
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn render_settings(settings: &AppSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15}{}",
        style("Sound effects:").bold(),
        on_off(settings.sound_effects)
    );
    let _ = writeln!(
        out,
        "{:<15}{} at {}",
        style("Reminder:").bold(),
        on_off(settings.notifications.enabled),
        settings.notifications.time
    );
    out
}

fn render_message(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => style(message.content.clone()).dim().to_string(),
        MessageLevel::Success => style(message.content.clone()).green().to_string(),
        MessageLevel::Warning => style(message.content.clone()).yellow().to_string(),
        MessageLevel::Error => style(message.content.clone()).red().to_string(),
    }
}

fn recovery_hint() -> String {
    format!(
        "{}\n  {}  pick the directory again, or another one\n  {}   keep using local storage\n",
        style("Your journal directory could not be reached.").yellow().bold(),
        style("daygrid storage change").cyan(),
        style("daygrid storage local").cyan(),
    )
}

/// The year shown by a naked `daygrid`.
pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use daygridapp::model::{EntryRecord, StorageMode};

    fn entry(key: &str, text: &str) -> DayEntry {
        console::set_colors_enabled(false);
        DayEntry {
            key: key.parse().unwrap(),
            record: EntryRecord::new(text),
        }
    }

    #[test]
    fn test_grid_marks_written_days() {
        let grid = render_grid(2023, &[entry("2023-0", "a"), entry("2023-2", "b")], None);
        let jan = grid.lines().find(|l| l.starts_with("Jan")).unwrap();
        assert!(jan.contains("●·●"));
        assert!(grid.contains("2 of 365 days"));
    }

    #[test]
    fn test_grid_has_twelve_month_rows() {
        console::set_colors_enabled(false);
        let grid = render_grid(2023, &[], None);
        assert_eq!(grid.lines().count(), 13);
        let dots: usize = grid
            .lines()
            .skip(1)
            .map(|l| l.chars().filter(|c| *c == EMPTY_DOT).count())
            .sum();
        assert_eq!(dots, 365);
    }

    #[test]
    fn test_grid_leap_year_drops_last_day() {
        console::set_colors_enabled(false);
        let grid = render_grid(2024, &[], None);
        let dec = grid.lines().find(|l| l.starts_with("Dec")).unwrap();
        assert_eq!(dec.chars().filter(|c| *c == EMPTY_DOT).count(), 30);
    }

    #[test]
    fn test_grid_ignores_other_years() {
        let grid = render_grid(2023, &[entry("2022-0", "old")], None);
        assert!(grid.contains("0 of 365 days"));
    }

    #[test]
    fn test_grid_marks_today() {
        console::set_colors_enabled(false);
        let today = DayKey::new(2023, 1).unwrap();
        let grid = render_grid(2023, &[], Some(today));
        let jan = grid.lines().find(|l| l.starts_with("Jan")).unwrap();
        assert!(jan.contains("·○·"));
    }

    #[test]
    fn test_entry_shows_key_and_text() {
        let line = render_entry(&entry("2024-41", "walked to the lake"));
        assert!(line.contains("2024-41"));
        assert!(line.contains("Sun Feb 11 2024"));
        assert!(line.contains("walked to the lake"));
    }

    #[test]
    fn test_empty_entry_is_marked() {
        assert!(render_entry(&entry("2024-1", "")).contains("(empty)"));
    }

    #[test]
    fn test_status_lists_directory_state() {
        console::set_colors_enabled(false);
        let status = StorageStatus {
            mode: StorageMode::Ephemeral,
            directory: Some("Journal".to_string()),
            directory_deleted: true,
            supported: true,
            access: AccessStatus::Lost,
            entry_count: 3,
        };
        let out = render_status(&status);
        assert!(out.contains("local"));
        assert!(out.contains("Journal"));
        assert!(out.contains("lost"));
        assert!(out.contains('3'));
    }

    #[test]
    fn test_recovery_hint_only_when_directory_deleted() {
        console::set_colors_enabled(false);
        let mut result = CmdResult::default();
        assert!(!render_result(&result, None).contains("storage change"));
        result.directory_deleted = true;
        assert!(render_result(&result, None).contains("storage change"));
    }
}

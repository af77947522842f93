//! Plain-text rendering of the view state

use crate::breakpoints::{HeadingSize, Layout};
use crate::models::{format_percentage, HistoryEntry, OnlineStatus, Period, UptimeColor};
use crate::view::ViewState;
use std::fmt::Write;

const SKELETON: &str = "░░░░░░░░░░░░";
const COLUMN_WIDTH: usize = 24;

pub fn glyph(color: UptimeColor) -> char {
    match color {
        UptimeColor::Green => '█',
        UptimeColor::Yellow => '▓',
        UptimeColor::Red => '▒',
        UptimeColor::NoData => '·',
    }
}

/// Tooltip for a strip cell, e.g. `5 Mar\n99.10%`. Days without data have none.
pub fn tooltip(entry: &HistoryEntry) -> Option<String> {
    entry.uptime.map(|uptime| {
        format!("{}\n{}", entry.date.format("%-d %b"), format_percentage(uptime))
    })
}

pub fn headline(view: &ViewState, brand: &str) -> Option<String> {
    if view.is_placeholder() {
        return None;
    }

    let state = match view.snapshot.status {
        OnlineStatus::Online => "online",
        _ => "offline",
    };
    Some(format!("{} is {}", brand, state))
}

/// Render the whole dashboard as text
pub fn render(view: &ViewState, brand: &str) -> String {
    let layout = view.layout();
    let mut out = String::new();

    render_headline(&mut out, view, brand, &layout);
    render_percentages(&mut out, view, &layout);
    render_strip(&mut out, view, &layout);

    if view.error() {
        let _ = writeln!(out);
        let _ = writeln!(out, "We couldn't load this page  [r] retry");
    }

    out
}

fn render_headline(out: &mut String, view: &ViewState, brand: &str, layout: &Layout) {
    let text = headline(view, brand).unwrap_or_else(|| SKELETON.to_string());
    let _ = writeln!(out, "{}", text);

    let rule = match layout.headline {
        HeadingSize::Large => Some('═'),
        HeadingSize::Medium => Some('─'),
        HeadingSize::Small => None,
    };
    if let Some(rule) = rule {
        let _ = writeln!(out, "{}", rule.to_string().repeat(text.chars().count()));
    }
    let _ = writeln!(out);
}

fn render_percentages(out: &mut String, view: &ViewState, layout: &Layout) {
    let cells: Vec<(String, &str)> = Period::ALL
        .iter()
        .map(|period| {
            let value = match view.snapshot.averages.get(*period) {
                Some(ratio) if !view.is_placeholder() => format_percentage(ratio),
                _ => SKELETON.to_string(),
            };
            let label = if view.is_placeholder() { "" } else { period.label() };
            (value, label)
        })
        .collect();

    for row in cells.chunks(layout.percentage_columns) {
        let values: Vec<String> =
            row.iter().map(|(value, _)| format!("{:<width$}", value, width = COLUMN_WIDTH)).collect();
        let labels: Vec<String> =
            row.iter().map(|(_, label)| format!("{:<width$}", label, width = COLUMN_WIDTH)).collect();

        let _ = writeln!(out, "{}", values.concat().trim_end());
        let _ = writeln!(out, "{}", labels.concat().trim_end());
    }
    let _ = writeln!(out);
}

fn render_strip(out: &mut String, view: &ViewState, layout: &Layout) {
    if view.is_placeholder() {
        let _ = writeln!(out, "{}", SKELETON);
        for _ in 0..(crate::models::HISTORY_WINDOW / layout.strip_columns) {
            let _ = writeln!(out, "{}", "░".repeat(layout.strip_columns));
        }
        return;
    }

    let heading = if layout.compact_labels {
        "API uptime (30d)".to_string()
    } else {
        format!("API uptime{:>width$}", "Last 30 days", width = layout.strip_columns.max(28) - 10)
    };
    let _ = writeln!(out, "{}", heading);

    let entries = view.snapshot.history.entries();
    for row in entries.chunks(layout.strip_columns) {
        let line: String = row.iter().map(|entry| glyph(entry.color())).collect();
        let _ = writeln!(out, "{}", line);
    }

    let incidents: Vec<String> = entries
        .iter()
        .filter(|entry| matches!(entry.color(), UptimeColor::Yellow | UptimeColor::Red))
        .filter_map(tooltip)
        .map(|text| text.replace('\n', " "))
        .collect();

    if !incidents.is_empty() {
        let _ = writeln!(out);
        for incident in incidents {
            let _ = writeln!(out, "  {}", incident);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::BreakpointSet;
    use crate::history::normalize;
    use crate::models::Averages;
    use crate::refresh::Snapshot;
    use chrono::NaiveDate;

    fn loaded_view(width: u32) -> ViewState {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let history = vec![
            HistoryEntry::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), Some(0.991)),
            HistoryEntry::new(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), Some(0.96)),
            HistoryEntry::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(), Some(0.5)),
        ];
        ViewState {
            snapshot: Snapshot::from_parts(
                OnlineStatus::Online,
                Averages::new()
                    .with(Period::Day, 0.999)
                    .with(Period::Week, 0.995)
                    .with(Period::Month, 0.98),
                normalize(history, today),
            ),
            breakpoints: BreakpointSet::for_width(width),
            ..ViewState::default()
        }
    }

    #[test]
    fn test_tooltip_format() {
        let entry = HistoryEntry::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), Some(0.991));
        assert_eq!(tooltip(&entry).unwrap(), "5 Mar\n99.10%");
        assert!(tooltip(&HistoryEntry::placeholder(entry.date)).is_none());
    }

    #[test]
    fn test_render_loaded_dashboard() {
        let text = render(&loaded_view(1200), "Igloo");

        assert!(text.starts_with("Igloo is online\n"));
        assert!(text.contains("99.90%"));
        assert!(text.contains("99.50%"));
        assert!(text.contains("98.00%"));
        assert!(text.contains("Last 24 hours"));
        assert!(text.contains("6 Mar 96.00%"));
        assert!(text.contains("7 Mar 50.00%"));
        assert!(!text.contains("5 Mar"));
        assert!(!text.contains("couldn't load"));

        let strip = format!("{}{}", "·".repeat(27), "█▓▒");
        assert!(text.contains(&strip));
    }

    #[test]
    fn test_narrow_layout_wraps_strip() {
        let text = render(&loaded_view(600), "Igloo");
        let strip_lines: Vec<_> = text
            .lines()
            .filter(|line| !line.is_empty() && line.chars().all(|c| "█▓▒·".contains(c)))
            .collect();
        assert_eq!(strip_lines.len(), 2);
        assert!(strip_lines.iter().all(|line| line.chars().count() == 15));
    }

    #[test]
    fn test_render_loading_and_error() {
        let loading = ViewState::default();
        let text = render(&loading, "Igloo");
        assert!(text.starts_with(SKELETON));
        assert!(!text.contains("couldn't load"));

        let errored = ViewState {
            snapshot: Snapshot::from_parts(
                OnlineStatus::Unknown,
                Averages::new(),
                crate::models::HistoryWindow::empty(),
            ),
            ..ViewState::default()
        };
        let text = render(&errored, "Igloo");
        assert!(headline(&errored, "Igloo").is_none());
        assert!(text.contains("We couldn't load this page"));
    }

    #[test]
    fn test_offline_headline() {
        let mut view = loaded_view(1200);
        view.snapshot.status = OnlineStatus::Offline;
        assert_eq!(headline(&view, "Igloo").unwrap(), "Igloo is offline");
    }
}

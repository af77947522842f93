//! Normalization of `/history` responses into a fixed uptime window

use crate::models::{HistoryEntry, HistoryWindow, HISTORY_WINDOW};
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Turn a raw history response into a [`HistoryWindow`].
///
/// Keeps the last [`HISTORY_WINDOW`] entries, left-pads with null-uptime
/// placeholders one day apart ending the day before the earliest real entry,
/// then sorts ascending by date. Sorting is stable so equal dates keep their
/// source order. An empty response is anchored on `today`, giving the window
/// that ends on `today`.
pub fn normalize(mut entries: Vec<HistoryEntry>, today: NaiveDate) -> HistoryWindow {
    if entries.len() > HISTORY_WINDOW {
        entries.drain(..entries.len() - HISTORY_WINDOW);
    }

    let missing = HISTORY_WINDOW - entries.len();
    if missing > 0 {
        let anchor = entries
            .iter()
            .map(|entry| entry.date)
            .min()
            .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today));

        debug!("Padding history with {} placeholder days before {}", missing, anchor);

        let mut padded: Vec<HistoryEntry> = (1..=missing as u64)
            .rev()
            .map(|offset| {
                let date = anchor.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
                HistoryEntry::placeholder(date)
            })
            .collect();
        padded.append(&mut entries);
        entries = padded;
    }

    entries.sort_by_key(|entry| entry.date);

    HistoryWindow::from_normalized(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn consecutive(start: NaiveDate, count: usize) -> Vec<HistoryEntry> {
        (0..count as u64)
            .map(|i| HistoryEntry::new(start.checked_add_days(Days::new(i)).unwrap(), Some(0.99)))
            .collect()
    }

    #[test]
    fn test_window_is_always_full_length() {
        let today = day(2024, 6, 30);
        for len in 0..=HISTORY_WINDOW + 5 {
            let window = normalize(consecutive(day(2024, 5, 1), len), today);
            assert_eq!(window.len(), HISTORY_WINDOW, "input length {}", len);
        }
    }

    #[test]
    fn test_short_history_is_left_padded() {
        let today = day(2024, 6, 30);
        for len in 1..HISTORY_WINDOW {
            let first_real = day(2024, 5, 10);
            let window = normalize(consecutive(first_real, len), today);
            let pad = HISTORY_WINDOW - len;
            let entries = window.entries();

            for (i, entry) in entries[..pad].iter().enumerate() {
                assert!(entry.uptime.is_none());
                let expected = first_real.checked_sub_days(Days::new((pad - i) as u64)).unwrap();
                assert_eq!(entry.date, expected);
            }
            assert_eq!(
                entries[pad - 1].date,
                first_real.checked_sub_days(Days::new(1)).unwrap()
            );
            assert_eq!(entries[pad].date, first_real);
            assert!(entries[pad..].iter().all(|entry| entry.uptime.is_some()));
        }
    }

    #[test]
    fn test_long_history_keeps_tail() {
        let input = consecutive(day(2024, 1, 1), 45);
        let last = input.last().unwrap().date;
        let window = normalize(input, day(2024, 6, 30));

        assert_eq!(window.first().unwrap().date, day(2024, 1, 16));
        assert_eq!(window.entries().last().unwrap().date, last);
    }

    #[test]
    fn test_unordered_history_is_sorted() {
        let mut input = consecutive(day(2024, 3, 1), 30);
        input.reverse();
        input.swap(3, 17);

        let window = normalize(input, day(2024, 6, 30));
        let dates: Vec<_> = window.iter().map(|entry| entry.date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_equal_dates_keep_source_order() {
        let mut input = consecutive(day(2024, 3, 1), 28);
        input.push(HistoryEntry::new(day(2024, 3, 28), Some(0.5)));
        input.push(HistoryEntry::new(day(2024, 3, 28), Some(0.25)));

        let window = normalize(input, day(2024, 6, 30));
        let tail: Vec<_> = window.entries()[28..].iter().map(|entry| entry.uptime).collect();
        assert_eq!(tail, vec![Some(0.5), Some(0.25)]);
    }

    #[test]
    fn test_empty_history_ends_today() {
        let today = day(2024, 3, 1);
        let window = normalize(Vec::new(), today);

        assert_eq!(window.len(), HISTORY_WINDOW);
        assert!(window.iter().all(|entry| entry.uptime.is_none()));
        assert_eq!(window.entries().last().unwrap().date, today);
        assert_eq!(window.first().unwrap().date, day(2024, 2, 1));
    }

    #[test]
    fn test_padding_crosses_month_boundary() {
        let window = normalize(consecutive(day(2024, 3, 2), 2), day(2024, 6, 30));
        assert_eq!(window.entries()[27].date, day(2024, 3, 1));
        assert_eq!(window.entries()[26].date, day(2024, 2, 29));
    }
}

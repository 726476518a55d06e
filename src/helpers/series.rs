use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

use crate::helpers::dates::{DateParseError, parse_entry_date};
use crate::models::sheets::SheetRecord;

pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Failures while coercing raw spreadsheet cells. An empty weight cell is a
/// gap, not a failure; only malformed non-empty cells end up here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    BadDate(#[from] DateParseError),
    #[error("invalid weight value '{value}'")]
    BadWeight { value: String },
}

/// One normalized measurement. A `None` weight is a recorded gap, preserved
/// rather than interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: Option<f64>,
}

/// Date-ascending weight history for one run, built fresh from the raw
/// spreadsheet rows and discarded when the run finishes. Dates are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSeries {
    entries: Vec<WeightEntry>,
}

/// Outcome of extraction: either a populated series or an explicit no-data
/// signal the caller must branch on.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Report(WeightSeries),
    NoData,
}

/// Week-over-week average movement, or the explicit signal that the history
/// is too short to compare two weeks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeeklyChange {
    Value(f64),
    InsufficientData,
}

/// Normalizes raw rows into a cleaned series: cells coerced, dates
/// deduplicated and sorted ascending, history capped to the most recent
/// `limit` entries. Oldest excess rows are dropped, not newest.
pub fn extract(records: &[SheetRecord], limit: usize) -> Result<ExtractOutcome, ExtractError> {
    if records.is_empty() {
        return Ok(ExtractOutcome::NoData);
    }

    let mut by_date: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for record in records {
        let date = parse_entry_date(&record.date)?;
        let weight = parse_weight_cell(&record.weight)?;
        by_date.insert(date, weight);
    }

    let mut entries: Vec<WeightEntry> = by_date
        .into_iter()
        .map(|(date, weight)| WeightEntry { date, weight })
        .collect();
    let keep = entries.len().min(limit);
    let entries = entries.split_off(entries.len() - keep);

    Ok(ExtractOutcome::Report(WeightSeries { entries }))
}

impl WeightSeries {
    /// Builds a series directly from entries, restoring the ascending-date
    /// invariant. Later duplicates win, matching extraction.
    pub fn from_entries(entries: Vec<WeightEntry>) -> Self {
        let by_date: BTreeMap<NaiveDate, Option<f64>> = entries
            .into_iter()
            .map(|entry| (entry.date, entry.weight))
            .collect();

        Self {
            entries: by_date
                .into_iter()
                .map(|(date, weight)| WeightEntry { date, weight })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|entry| entry.date).collect()
    }

    /// First recorded (non-missing) weight, used to seed the goal benchmark.
    pub fn first_recorded_weight(&self) -> Option<f64> {
        self.entries.iter().find_map(|entry| entry.weight)
    }

    /// Mean weight per calendar week (weeks ending Sunday), ascending by
    /// week. Gaps are skipped; weeks with no recorded weight produce no
    /// bucket.
    pub fn weekly_means(&self) -> Vec<(NaiveDate, f64)> {
        let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for entry in &self.entries {
            let Some(weight) = entry.weight else { continue };
            let slot = buckets.entry(week_ending(entry.date)).or_insert((0.0, 0));
            slot.0 += weight;
            slot.1 += 1;
        }

        buckets
            .into_iter()
            .map(|(week, (sum, count))| (week, sum / count as f64))
            .collect()
    }

    /// Latest weekly mean minus the previous one, rounded to two decimal
    /// places.
    pub fn weekly_change(&self) -> WeeklyChange {
        let means = self.weekly_means();
        if means.len() < 2 {
            return WeeklyChange::InsufficientData;
        }

        let latest = means[means.len() - 1].1;
        let previous = means[means.len() - 2].1;
        WeeklyChange::Value(((latest - previous) * 100.0).round() / 100.0)
    }
}

/// The Sunday closing the calendar week `date` falls in; Sunday maps to
/// itself.
fn week_ending(date: NaiveDate) -> NaiveDate {
    let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(i64::from(to_sunday))
}

fn parse_weight_cell(value: &str) -> Result<Option<f64>, ExtractError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ExtractError::BadWeight {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: &str, weight: &str) -> SheetRecord {
        SheetRecord {
            date: date.to_string(),
            weight: weight.to_string(),
        }
    }

    fn report(records: &[SheetRecord], limit: usize) -> WeightSeries {
        match extract(records, limit).unwrap() {
            ExtractOutcome::Report(series) => series,
            ExtractOutcome::NoData => panic!("expected a populated series"),
        }
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(extract(&[], 30).unwrap(), ExtractOutcome::NoData);
    }

    #[test]
    fn keeps_most_recent_rows_ascending() {
        let records: Vec<SheetRecord> = (1..=10)
            .map(|day| record(&format!("{day:02}/01/24"), "80"))
            .collect();

        let series = report(&records, 5);
        let dates = series.dates();
        assert_eq!(dates.len(), 5);
        assert_eq!(
            dates,
            (6..=10).map(|day| date(2024, 1, day)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn preserves_gaps_and_sorts_ascending() {
        let records = vec![
            record("03/01/24", "79.5"),
            record("01/01/24", "80.0"),
            record("02/01/24", ""),
        ];

        let series = report(&records, 30);
        assert_eq!(
            series.entries(),
            &[
                WeightEntry {
                    date: date(2024, 1, 1),
                    weight: Some(80.0),
                },
                WeightEntry {
                    date: date(2024, 1, 2),
                    weight: None,
                },
                WeightEntry {
                    date: date(2024, 1, 3),
                    weight: Some(79.5),
                },
            ]
        );
    }

    #[test]
    fn duplicate_dates_collapse_to_last_row() {
        let records = vec![record("01/01/24", "80.0"), record("01/01/24", "79.0")];

        let series = report(&records, 30);
        assert_eq!(series.entries().len(), 1);
        assert_eq!(series.entries()[0].weight, Some(79.0));
    }

    #[test]
    fn rejects_malformed_weight() {
        let err = extract(&[record("01/01/24", "eighty")], 30).unwrap_err();
        assert!(matches!(err, ExtractError::BadWeight { .. }));
    }

    #[test]
    fn rejects_malformed_date() {
        let err = extract(&[record("soon", "80.0")], 30).unwrap_err();
        assert!(matches!(err, ExtractError::BadDate(_)));
    }

    #[test]
    fn first_recorded_weight_skips_leading_gap() {
        let records = vec![record("01/01/24", ""), record("02/01/24", "79.0")];

        let series = report(&records, 30);
        assert_eq!(series.first_recorded_weight(), Some(79.0));
    }

    #[test]
    fn week_ending_maps_to_closing_sunday() {
        // 2024-01-01 is a Monday, 2024-01-07 the Sunday closing its week.
        assert_eq!(week_ending(date(2024, 1, 1)), date(2024, 1, 7));
        assert_eq!(week_ending(date(2024, 1, 7)), date(2024, 1, 7));
        assert_eq!(week_ending(date(2024, 1, 8)), date(2024, 1, 14));
    }

    #[test]
    fn weekly_means_bucket_by_calendar_week() {
        let records = vec![
            record("01/01/24", "82.0"),
            record("07/01/24", "80.0"),
            record("08/01/24", "79.0"),
        ];

        let series = report(&records, 30);
        let means = series.weekly_means();
        assert_eq!(
            means,
            vec![(date(2024, 1, 7), 81.0), (date(2024, 1, 14), 79.0)]
        );
    }

    #[test]
    fn weekly_means_skip_gap_only_weeks() {
        let records = vec![
            record("01/01/24", ""),
            record("02/01/24", ""),
            record("08/01/24", "79.0"),
        ];

        let series = report(&records, 30);
        assert_eq!(series.weekly_means(), vec![(date(2024, 1, 14), 79.0)]);
    }

    #[test]
    fn single_week_is_insufficient() {
        let records: Vec<SheetRecord> = (1..=6)
            .map(|day| record(&format!("{day:02}/01/24"), "80"))
            .collect();

        let series = report(&records, 30);
        assert_eq!(series.weekly_change(), WeeklyChange::InsufficientData);
    }

    #[test]
    fn three_full_weeks_diff_last_two_means() {
        let mut records = Vec::new();
        for day in 1..=7 {
            records.push(record(&format!("{day:02}/01/24"), "82.0"));
        }
        for day in 8..=14 {
            records.push(record(&format!("{day:02}/01/24"), "81.0"));
        }
        for day in 15..=21 {
            records.push(record(&format!("{day:02}/01/24"), "80.5"));
        }

        let series = report(&records, 30);
        assert_eq!(series.weekly_change(), WeeklyChange::Value(-0.5));
    }

    #[test]
    fn weekly_change_rounds_to_two_decimals() {
        let records = vec![
            record("07/01/24", "81.0"),
            record("08/01/24", "80.0"),
            record("09/01/24", "80.5"),
            record("10/01/24", "80.5"),
        ];

        let series = report(&records, 30);
        assert_eq!(series.weekly_change(), WeeklyChange::Value(-0.67));
    }

    #[test]
    fn from_entries_restores_ordering() {
        let series = WeightSeries::from_entries(vec![
            WeightEntry {
                date: date(2024, 1, 3),
                weight: Some(79.5),
            },
            WeightEntry {
                date: date(2024, 1, 1),
                weight: Some(80.0),
            },
        ]);

        assert_eq!(series.dates(), vec![date(2024, 1, 1), date(2024, 1, 3)]);
    }
}

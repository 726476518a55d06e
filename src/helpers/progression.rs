use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Configuration failures when describing a goal progression. Fatal to the
/// generating call; never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("direction must be one of: \"positive\", \"negative\"")]
    InvalidDirection,
    #[error("either an explicit date range or a start date and day count must be provided")]
    MissingDateRange,
}

/// Whether the tracked value is expected to climb or fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl FromStr for Direction {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            _ => Err(ProgressionError::InvalidDirection),
        }
    }
}

/// The date index a progression should cover: either precomputed dates or a
/// daily span derived from a start date.
#[derive(Debug, Clone)]
pub enum RangeSpec {
    Dates(Vec<NaiveDate>),
    Span { start_date: NaiveDate, days: usize },
}

/// A synthetic goal trajectory over a date index. Generated once, never
/// mutated; consumers only read it for plotting and comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// Generates the values of a theoretical progression toward a goal: a
/// starting value walked one day at a time, by an absolute delta or a
/// compounding percentage. The result serves as a benchmark curve to plot
/// against real measurements.
///
/// Each value derives from the previously generated one, so percentage mode
/// compounds step by step rather than being recomputed from the origin.
pub fn generate(
    start_value: f64,
    increment: f64,
    direction: Direction,
    is_percentage: bool,
    range: Option<RangeSpec>,
) -> Result<ProgressionSeries, ProgressionError> {
    let dates = resolve_range(range)?;

    let values = if is_percentage {
        let multiplier = match direction {
            Direction::Positive => 1.0 + increment,
            Direction::Negative => 1.0 - increment,
        };
        accumulate(start_value, dates.len(), |previous| previous * multiplier)
    } else {
        let delta = match direction {
            Direction::Positive => increment,
            Direction::Negative => -increment,
        };
        accumulate(start_value, dates.len(), |previous| previous + delta)
    };

    Ok(ProgressionSeries { dates, values })
}

fn resolve_range(range: Option<RangeSpec>) -> Result<Vec<NaiveDate>, ProgressionError> {
    match range {
        Some(RangeSpec::Dates(dates)) if !dates.is_empty() => Ok(dates),
        Some(RangeSpec::Span { start_date, days }) if days > 0 => Ok((0..days)
            .map(|offset| start_date + Duration::days(offset as i64))
            .collect()),
        _ => Err(ProgressionError::MissingDateRange),
    }
}

fn accumulate(start_value: f64, len: usize, step: impl Fn(f64) -> f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(len);
    let mut current = start_value;
    values.push(current);
    for _ in 1..len {
        current = step(current);
        values.push(current);
    }
    values
}

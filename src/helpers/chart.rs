use anyhow::Context;
use charts_rs::{LineChart, NIL_VALUE, Series, THEME_GRAFANA, svg_to_png};
use chrono::Duration;
use tracing::info;

use crate::helpers::progression::{self, Direction, RangeSpec};
use crate::helpers::series::WeightSeries;

const CHART_WIDTH: f32 = 1500.0;
const CHART_HEIGHT: f32 = 500.0;

/// Daily step of the goal benchmark: one unit lost per week.
const GOAL_DAILY_STEP: f64 = 1.0 / 7.0;

/// Renders the trend chart as in-memory PNG bytes: the raw series, its
/// weekly means, and a goal benchmark walked down from the first recorded
/// weight, all over the series' own date index. The x axis therefore spans
/// exactly the first through last entry dates.
pub fn render_trend_chart(series: &WeightSeries) -> anyhow::Result<Vec<u8>> {
    let dates = series.dates();
    info!("Rendering trend chart over {} dates", dates.len());

    let raw_trace: Vec<f32> = series
        .entries()
        .iter()
        .map(|entry| entry.weight.map_or(NIL_VALUE, |weight| weight as f32))
        .collect();

    let mut traces = vec![Series::new("Weight".to_string(), raw_trace)];
    traces.push(Series::new(
        "Weekly average".to_string(),
        weekly_trace(series),
    ));

    // A series of nothing but gaps has no weight to seed the benchmark from,
    // so the goal trace is left off the chart.
    if let Some(seed) = series.first_recorded_weight() {
        let goal = progression::generate(
            seed,
            GOAL_DAILY_STEP,
            Direction::Negative,
            false,
            Some(RangeSpec::Dates(dates.clone())),
        )?;
        let goal_trace: Vec<f32> = goal.values.iter().map(|value| *value as f32).collect();
        traces.push(Series::new("Goal".to_string(), goal_trace));
    }

    let labels: Vec<String> = dates
        .iter()
        .map(|date| date.format("%d/%m").to_string())
        .collect();

    let mut chart = LineChart::new_with_theme(traces, labels, THEME_GRAFANA);
    chart.width = CHART_WIDTH;
    chart.height = CHART_HEIGHT;
    chart.title_text = "Weight trend".to_string();

    let svg = chart.svg().context("failed to render chart svg")?;
    let png = svg_to_png(&svg).context("failed to encode chart png")?;
    info!("Encoded chart PNG, size: {} bytes", png.len());
    Ok(png)
}

/// Aligns the weekly means with the raw date index: each bucket's mean sits
/// at the last series date inside that week, every other position is nil.
fn weekly_trace(series: &WeightSeries) -> Vec<f32> {
    let dates = series.dates();
    let mut trace = vec![NIL_VALUE; dates.len()];
    for (week_end, mean) in series.weekly_means() {
        let week_start = week_end - Duration::days(6);
        if let Some(position) = dates
            .iter()
            .rposition(|date| *date >= week_start && *date <= week_end)
        {
            trace[position] = mean as f32;
        }
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::series::WeightEntry;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day: u32, weight: Option<f64>) -> WeightEntry {
        WeightEntry {
            date: date(2024, 1, day),
            weight,
        }
    }

    #[test]
    fn renders_png_bytes() {
        let series = WeightSeries::from_entries(vec![
            entry(1, Some(82.0)),
            entry(2, None),
            entry(3, Some(81.4)),
            entry(8, Some(81.0)),
        ]);

        let png = render_trend_chart(&series).unwrap();
        assert!(png.len() > 8);
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn renders_single_point_series() {
        let series = WeightSeries::from_entries(vec![entry(1, Some(82.0))]);

        let png = render_trend_chart(&series).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn weekly_trace_marks_last_date_of_each_bucket() {
        let series = WeightSeries::from_entries(vec![
            entry(1, Some(82.0)),
            entry(3, Some(80.0)),
            entry(8, Some(79.0)),
        ]);

        let trace = weekly_trace(&series);
        assert_eq!(trace[0], NIL_VALUE);
        assert_eq!(trace[1], 81.0);
        assert_eq!(trace[2], 79.0);
    }
}

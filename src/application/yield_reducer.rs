// Yearly yield reducer - Year-over-year deltas and the full-year mean overlay
use crate::application::record_normalizer::normalize_year_records;
use crate::domain::telemetry::{NormalizedYearEntry, Series, YieldSeries};
use chrono::{Datelike, Local};
use serde_json::Value;

pub fn current_calendar_year() -> i32 {
    Local::now().year()
}

/// Reduce the yearly payload. Anything other than an array with at least one
/// usable record is reported as `NoData`.
pub fn reduce_yearly(data: &Value, current_year: i32) -> Series<YieldSeries> {
    let Some(records) = data.as_array() else {
        return Series::NoData;
    };
    reduce_entries(normalize_year_records(records), current_year)
}

pub fn reduce_entries(
    mut entries: Vec<NormalizedYearEntry>,
    current_year: i32,
) -> Series<YieldSeries> {
    if entries.is_empty() {
        return Series::NoData;
    }

    entries.sort_by_key(|entry| entry.year);

    let years: Vec<i32> = entries.iter().map(|entry| entry.year).collect();
    let deltas = yearly_deltas(&entries);
    let mean = full_year_mean(&years, &deltas, current_year);

    Series::Data(YieldSeries::new(years, deltas, mean))
}

/// The first year has no predecessor and is reported as its raw cumulative value.
fn yearly_deltas(entries: &[NormalizedYearEntry]) -> Vec<i64> {
    let mut deltas = Vec::with_capacity(entries.len());
    let mut previous: Option<i64> = None;

    for entry in entries {
        let delta = match previous {
            None => entry.cumulative_kwh,
            Some(prev) => (entry.cumulative_kwh - prev).max(0),
        };
        deltas.push(delta);
        previous = Some(entry.cumulative_kwh);
    }

    deltas
}

/// Mean over full years: neither the earliest on record nor the current year.
/// Falls back to every delta when no full year exists. `deltas` is never empty here.
fn full_year_mean(years: &[i32], deltas: &[i64], current_year: i32) -> f64 {
    let full: Vec<i64> = years
        .iter()
        .zip(deltas)
        .enumerate()
        .filter(|(idx, (year, _))| *idx > 0 && **year != current_year)
        .map(|(_, (_, delta))| *delta)
        .collect();

    if full.is_empty() {
        mean(deltas)
    } else {
        mean(&full)
    }
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

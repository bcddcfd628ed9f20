// Record normalizer - Resolves loosely-named upstream fields into canonical records
use crate::domain::telemetry::{CurrentReading, NormalizedYearEntry, RawSample};
use serde_json::{Map, Value};

/// Candidate keys per logical attribute, highest priority first.
pub const YEAR_KEYS: &[&str] = &["year", "Year", "year_value", "yearVal"];
pub const YIELD_KEYS: &[&str] = &["yield", "Yield", "total", "Total", "total_yield"];
pub const TIMESTAMP_KEYS: &[&str] = &["TimeStamp", "timestamp", "timeStamp", "Timestamp"];
pub const POWER_KEYS: &[&str] = &["Power", "power"];
pub const TOTAL_YIELD_KEYS: &[&str] = &["total_yield", "totalYield", "TotalYield"];

const WH_PER_KWH: f64 = 1000.0;

/// First candidate key holding a non-null value wins.
pub fn resolve_field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Numbers and numeric strings; anything else is treated as absent.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Years must be integral. Unparsable years make the record unusable.
fn as_year(value: &Value) -> Option<i32> {
    let number = as_number(value)?;
    if number.fract() != 0.0 {
        return None;
    }
    i32::try_from(number as i64).ok()
}

/// Watt-hours to whole kilowatt-hours, floored at zero.
pub fn wh_to_kwh(wh: f64) -> i64 {
    if !wh.is_finite() {
        return 0;
    }
    (wh / WH_PER_KWH).round().max(0.0) as i64
}

/// Normalize one yearly record. `None` means the record has no usable year.
pub fn normalize_year_record(record: &Value) -> Option<NormalizedYearEntry> {
    let record = record.as_object()?;
    let year = resolve_field(record, YEAR_KEYS).and_then(as_year)?;
    let yield_wh = resolve_field(record, YIELD_KEYS)
        .and_then(as_number)
        .unwrap_or(0.0);

    Some(NormalizedYearEntry::new(year, wh_to_kwh(yield_wh)))
}

pub fn normalize_year_records(records: &[Value]) -> Vec<NormalizedYearEntry> {
    records.iter().filter_map(normalize_year_record).collect()
}

/// Normalize one daily sample. Samples without a timestamp are dropped.
pub fn normalize_sample(record: &Value) -> Option<RawSample> {
    let record = record.as_object()?;
    let timestamp = resolve_field(record, TIMESTAMP_KEYS).and_then(as_number)?;
    let power = resolve_field(record, POWER_KEYS).and_then(as_number);

    Some(RawSample::new(timestamp.floor() as i64, power))
}

/// The current-reading payload. Missing power reads as zero.
pub fn normalize_current(data: &Value) -> CurrentReading {
    let Some(record) = data.as_object() else {
        return CurrentReading {
            power_watts: 0.0,
            total_yield: None,
        };
    };

    CurrentReading {
        power_watts: resolve_field(record, POWER_KEYS)
            .and_then(as_number)
            .unwrap_or(0.0),
        total_yield: resolve_field(record, TOTAL_YIELD_KEYS).and_then(as_number),
    }
}

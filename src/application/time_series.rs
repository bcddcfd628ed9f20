// Time-series assembler - Orders today's samples and labels them for the power curve
use crate::application::record_normalizer::normalize_sample;
use crate::domain::telemetry::{NormalizedSample, RawSample, Series, TimeSeries};
use chrono::{FixedOffset, Local, TimeZone};
use serde_json::Value;

const LABEL_FORMAT: &str = "%H:%M";
const INVALID_LABEL: &str = "--:--";

/// Time zone used to render sample labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClock {
    Local,
    Fixed(FixedOffset),
}

impl LabelClock {
    #[cfg(test)]
    pub fn utc() -> Self {
        use chrono::{Offset, Utc};
        LabelClock::Fixed(Utc.fix())
    }

    /// `HH:MM` for a unix timestamp in this clock's zone.
    pub fn label(&self, timestamp: i64) -> String {
        let label = match self {
            LabelClock::Local => format_in(&Local, timestamp),
            LabelClock::Fixed(offset) => format_in(offset, timestamp),
        };
        label.unwrap_or_else(|| INVALID_LABEL.to_string())
    }
}

fn format_in<Tz: TimeZone>(zone: &Tz, timestamp: i64) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    zone.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format(LABEL_FORMAT).to_string())
}

/// Assemble today's payload. Anything other than a non-empty array of
/// usable samples is reported as `NoData`.
pub fn assemble_today(data: &Value, clock: &LabelClock) -> Series<TimeSeries> {
    let Some(records) = data.as_array() else {
        return Series::NoData;
    };
    let samples: Vec<RawSample> = records.iter().filter_map(normalize_sample).collect();
    assemble_samples(&samples, clock)
}

/// Stable ascending sort by timestamp on a copy; power rounded to whole watts.
pub fn assemble_samples(samples: &[RawSample], clock: &LabelClock) -> Series<TimeSeries> {
    if samples.is_empty() {
        return Series::NoData;
    }

    let mut ordered: Vec<&RawSample> = samples.iter().collect();
    ordered.sort_by_key(|sample| sample.timestamp);

    let points = ordered
        .into_iter()
        .map(|sample| NormalizedSample {
            label: clock.label(sample.timestamp),
            power_watts: round_watts(sample.power),
        })
        .collect();

    Series::Data(TimeSeries::new(points))
}

fn round_watts(power: Option<f64>) -> i64 {
    match power {
        Some(watts) if watts.is_finite() => watts.round().max(0.0) as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_samples_sorted_by_timestamp() {
        let data = json!([
            {"TimeStamp": 100, "Power": 200},
            {"TimeStamp": 50, "Power": 300}
        ]);
        let series = assemble_today(&data, &LabelClock::utc());
        let series = series.data().expect("series");

        assert_eq!(series.labels(), vec!["00:00", "00:01"]);
        assert_eq!(series.values(), vec![300, 200]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let samples = vec![
            RawSample::new(7200, Some(3.0)),
            RawSample::new(3600, Some(1.0)),
            RawSample::new(3600, Some(2.0)),
        ];
        let series = assemble_samples(&samples, &LabelClock::utc());

        assert_eq!(series.data().map(|s| s.values()), Some(vec![1, 2, 3]));
        // input untouched
        assert_eq!(samples[0].timestamp, 7200);
    }

    #[test]
    fn test_power_rounding_and_missing_power() {
        let data = json!([
            {"TimeStamp": 0, "Power": 149.5},
            {"TimeStamp": 60},
            {"TimeStamp": 120, "Power": null},
            {"timestamp": 180, "power": 10.4}
        ]);
        let series = assemble_today(&data, &LabelClock::utc());
        assert_eq!(series.data().map(|s| s.values()), Some(vec![150, 0, 0, 10]));
    }

    #[test]
    fn test_empty_or_invalid_payload_is_no_data() {
        let clock = LabelClock::utc();
        assert!(assemble_today(&json!([]), &clock).is_no_data());
        assert!(assemble_today(&json!({"TimeStamp": 1}), &clock).is_no_data());
        assert!(assemble_today(&Value::Null, &clock).is_no_data());
        assert!(assemble_today(&json!([{"Power": 5}]), &clock).is_no_data());
    }

    #[test]
    fn test_fixed_offset_labels() {
        let clock = LabelClock::Fixed(FixedOffset::east_opt(2 * 3600).expect("offset"));
        // 2024-06-01T10:30:00Z
        assert_eq!(clock.label(1_717_237_800), "12:30");
        assert_eq!(LabelClock::utc().label(i64::MAX), INVALID_LABEL);
    }
}

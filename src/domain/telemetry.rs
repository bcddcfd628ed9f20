// Telemetry data domain models
use std::fmt;

/// Upstream resources polled on every refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Current,
    Today,
    Yearly,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Current, Resource::Today, Resource::Yearly];

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Current => "current",
            Resource::Today => "today",
            Resource::Yearly => "yearly",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a transform: a series to chart, or the placeholder signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Series<T> {
    Data(T),
    NoData,
}

impl<T> Series<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Series::Data(value) => Some(value),
            Series::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Series::NoData)
    }
}

/// Instantaneous inverter reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentReading {
    pub power_watts: f64,
    pub total_yield: Option<f64>,
}

/// One daily power sample after field-name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Unix seconds
    pub timestamp: i64,
    pub power: Option<f64>,
}

impl RawSample {
    pub fn new(timestamp: i64, power: Option<f64>) -> Self {
        Self { timestamp, power }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSample {
    pub label: String,
    pub power_watts: i64,
}

/// Today's power curve in ascending timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    pub points: Vec<NormalizedSample>,
}

impl TimeSeries {
    pub fn new(points: Vec<NormalizedSample>) -> Self {
        Self { points }
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.power_watts).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedYearEntry {
    pub year: i32,
    pub cumulative_kwh: i64,
}

impl NormalizedYearEntry {
    pub fn new(year: i32, cumulative_kwh: i64) -> Self {
        Self {
            year,
            cumulative_kwh,
        }
    }
}

/// Year-over-year production with a flat mean overlay.
///
/// `years`, `delta_kwh` and `mean_series` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldSeries {
    pub years: Vec<i32>,
    pub delta_kwh: Vec<i64>,
    pub mean_kwh: f64,
    pub mean_series: Vec<f64>,
}

impl YieldSeries {
    pub fn new(years: Vec<i32>, delta_kwh: Vec<i64>, mean_kwh: f64) -> Self {
        let mean_series = vec![mean_kwh; years.len()];
        Self {
            years,
            delta_kwh,
            mean_kwh,
            mean_series,
        }
    }
}

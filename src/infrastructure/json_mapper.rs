// Mapper to convert domain models to JSON wire types
use crate::domain::dashboard::{CycleError, DashboardSnapshot, GaugePanel, PanelState, SinkEvent};
use crate::domain::telemetry::{Series, TimeSeries, YieldSeries};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelJson<T> {
    Pending,
    NoData,
    Ready(T),
}

#[derive(Debug, Serialize)]
pub struct GaugeJson {
    pub reading_watts: f64,
    pub total_yield: Option<f64>,
    pub max_watts: f64,
    pub filled_pct: f64,
    pub zone: &'static str,
    pub labels: Vec<&'static str>,
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct TimeSeriesJson {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct YieldJson {
    pub labels: Vec<String>,
    pub bars: Vec<i64>,
    pub mean: Vec<f64>,
    pub mean_kwh: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<&'static str>,
}

/// Body of a response that carries only a cycle error.
#[derive(Debug, Serialize)]
pub struct ErrorBodyJson {
    pub error: ErrorJson,
}

#[derive(Debug, Serialize)]
pub struct SnapshotJson {
    pub gauge: PanelJson<GaugeJson>,
    pub today: PanelJson<TimeSeriesJson>,
    pub yearly: PanelJson<YieldJson>,
    pub error: Option<ErrorJson>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventJson {
    Gauge(GaugeJson),
    Today(PanelJson<TimeSeriesJson>),
    Yearly(PanelJson<YieldJson>),
    Error(ErrorJson),
}

pub fn snapshot_to_json(snapshot: DashboardSnapshot) -> SnapshotJson {
    SnapshotJson {
        gauge: panel_to_json(snapshot.gauge, gauge_to_json),
        today: panel_to_json(snapshot.today, time_series_to_json),
        yearly: panel_to_json(snapshot.yearly, yield_to_json),
        error: snapshot.last_error.as_ref().map(error_to_json),
        updated_at: snapshot.updated_at.map(|t| t.to_rfc3339()),
    }
}

pub fn event_to_json(event: SinkEvent) -> EventJson {
    match event {
        SinkEvent::Gauge(gauge) => EventJson::Gauge(gauge_to_json(gauge)),
        SinkEvent::Today(today) => EventJson::Today(series_to_json(today, time_series_to_json)),
        SinkEvent::Yearly(yearly) => EventJson::Yearly(series_to_json(yearly, yield_to_json)),
        SinkEvent::Error(error) => EventJson::Error(error_to_json(&error)),
    }
}

pub fn error_body_to_json(error: &CycleError) -> ErrorBodyJson {
    ErrorBodyJson {
        error: error_to_json(error),
    }
}

fn panel_to_json<T, J>(panel: PanelState<T>, map: fn(T) -> J) -> PanelJson<J> {
    match panel {
        PanelState::Pending => PanelJson::Pending,
        PanelState::NoData => PanelJson::NoData,
        PanelState::Ready(value) => PanelJson::Ready(map(value)),
    }
}

fn series_to_json<T, J>(series: Series<T>, map: fn(T) -> J) -> PanelJson<J> {
    panel_to_json(series.into(), map)
}

fn gauge_to_json(gauge: GaugePanel) -> GaugeJson {
    let slices = gauge.bands.slices();
    GaugeJson {
        reading_watts: gauge.reading.power_watts,
        total_yield: gauge.reading.total_yield,
        max_watts: gauge.max_watts,
        filled_pct: gauge.bands.filled_pct(),
        zone: gauge.bands.zone().label(),
        labels: slices.iter().map(|(zone, _)| zone.label()).collect(),
        values: slices.iter().map(|(_, pct)| *pct).collect(),
    }
}

fn time_series_to_json(series: TimeSeries) -> TimeSeriesJson {
    TimeSeriesJson {
        labels: series.labels(),
        values: series.values(),
    }
}

fn yield_to_json(series: YieldSeries) -> YieldJson {
    YieldJson {
        labels: series.years.iter().map(|y| y.to_string()).collect(),
        bars: series.delta_kwh,
        mean: series.mean_series,
        mean_kwh: series.mean_kwh,
    }
}

fn error_to_json(error: &CycleError) -> ErrorJson {
    let resources = match error {
        CycleError::Transport { resources } => resources.iter().map(|r| r.name()).collect(),
        CycleError::Authentication => Vec::new(),
    };
    ErrorJson {
        kind: error.kind(),
        message: error.to_string(),
        resources,
    }
}

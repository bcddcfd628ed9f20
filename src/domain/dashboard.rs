// Dashboard domain model
use super::gauge::GaugeBands;
use super::telemetry::{CurrentReading, Resource, Series, TimeSeries, YieldSeries};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Cycle-level failure shown to the user as an error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("authentication failed, check your access key")]
    Authentication,
    #[error("failed to fetch data")]
    Transport { resources: Vec<Resource> },
}

impl CycleError {
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Authentication => "authentication",
            CycleError::Transport { .. } => "transport",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugePanel {
    pub reading: CurrentReading,
    pub max_watts: f64,
    pub bands: GaugeBands,
}

impl GaugePanel {
    pub fn new(reading: CurrentReading, max_watts: f64) -> Self {
        let bands = GaugeBands::from_reading(reading.power_watts, max_watts);
        Self {
            reading,
            max_watts,
            bands,
        }
    }
}

/// Render state of one dashboard panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Pending,
    NoData,
    Ready(T),
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        PanelState::Pending
    }
}

impl<T> From<Series<T>> for PanelState<T> {
    fn from(series: Series<T>) -> Self {
        match series {
            Series::Data(value) => PanelState::Ready(value),
            Series::NoData => PanelState::NoData,
        }
    }
}

/// Last rendered state of every panel. Only the sink writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub gauge: PanelState<GaugePanel>,
    pub today: PanelState<TimeSeries>,
    pub yearly: PanelState<YieldSeries>,
    pub last_error: Option<CycleError>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single update handed to a rendering sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Gauge(GaugePanel),
    Today(Series<TimeSeries>),
    Yearly(Series<YieldSeries>),
    Error(CycleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_panel_bands_follow_reading() {
        let panel = GaugePanel::new(
            CurrentReading {
                power_watts: 3600.0,
                total_yield: Some(12.5),
            },
            4500.0,
        );
        assert!((panel.bands.filled_pct() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_panel_state_from_series() {
        let ready: PanelState<i32> = Series::Data(3).into();
        assert_eq!(ready, PanelState::Ready(3));

        let empty: PanelState<i32> = Series::NoData.into();
        assert_eq!(empty, PanelState::NoData);
    }

    #[test]
    fn test_cycle_error_messages() {
        assert_eq!(
            CycleError::Transport {
                resources: vec![Resource::Today]
            }
            .to_string(),
            "failed to fetch data"
        );
        assert_eq!(CycleError::Authentication.kind(), "authentication");
    }
}

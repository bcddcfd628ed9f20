// Rendering sink - Receives derived series once per refresh cycle
use crate::domain::dashboard::{CycleError, GaugePanel};
use crate::domain::telemetry::{Series, TimeSeries, YieldSeries};

/// Consumer of derived dashboard series.
///
/// Each call replaces the matching panel; the pipeline never reads state back.
/// Overlapping cycles may interleave calls, the last write wins.
pub trait RenderSink: Send + Sync {
    fn apply_gauge_bands(&self, gauge: GaugePanel);

    fn apply_time_series(&self, today: Series<TimeSeries>);

    fn apply_yearly_series(&self, yearly: Series<YieldSeries>);

    fn report_error(&self, error: CycleError);
}

// Sink that forwards every update to a channel for progressive streaming
use crate::application::render_sink::RenderSink;
use crate::domain::dashboard::{CycleError, GaugePanel, SinkEvent};
use crate::domain::telemetry::{Series, TimeSeries, YieldSeries};
use tokio::sync::mpsc;

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<SinkEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: SinkEvent) {
        // Receiver gone means the client disconnected
        if self.tx.send(event).is_err() {
            tracing::debug!("Dropping dashboard update, stream closed");
        }
    }
}

impl RenderSink for ChannelSink {
    fn apply_gauge_bands(&self, gauge: GaugePanel) {
        self.send(SinkEvent::Gauge(gauge));
    }

    fn apply_time_series(&self, today: Series<TimeSeries>) {
        self.send(SinkEvent::Today(today));
    }

    fn apply_yearly_series(&self, yearly: Series<YieldSeries>) {
        self.send(SinkEvent::Yearly(yearly));
    }

    fn report_error(&self, error: CycleError) {
        self.send(SinkEvent::Error(error));
    }
}

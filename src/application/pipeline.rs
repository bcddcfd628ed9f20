// Dashboard pipeline - Drives one refresh cycle from upstream fetch to rendering sink
use crate::application::record_normalizer::normalize_current;
use crate::application::render_sink::RenderSink;
use crate::application::telemetry_source::{Credential, FetchError, TelemetrySource};
use crate::application::time_series::{assemble_today, LabelClock};
use crate::application::yield_reducer::{current_calendar_year, reduce_yearly};
use crate::domain::dashboard::{CycleError, GaugePanel};
use crate::domain::telemetry::Resource;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// What a single cycle did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub applied: Vec<Resource>,
    pub error: Option<CycleError>,
}

#[derive(Clone)]
pub struct DashboardPipeline {
    source: Arc<dyn TelemetrySource>,
    gauge_max_watts: f64,
    clock: LabelClock,
}

impl DashboardPipeline {
    pub fn new(source: Arc<dyn TelemetrySource>, gauge_max_watts: f64, clock: LabelClock) -> Self {
        Self {
            source,
            gauge_max_watts,
            clock,
        }
    }

    pub async fn refresh(&self, credential: Option<&Credential>, sink: &dyn RenderSink) -> CycleReport {
        self.refresh_for_year(credential, sink, current_calendar_year())
            .await
    }

    /// Run one cycle with an explicit "current year" for the full-year mean.
    ///
    /// The three fetches run concurrently and each result reaches the sink as soon
    /// as it resolves. A 401 on any of them drops the fetches still in flight and
    /// reports a single authentication error. Other failures are collected into
    /// one transport error after the remaining resources were applied.
    pub async fn refresh_for_year(
        &self,
        credential: Option<&Credential>,
        sink: &dyn RenderSink,
        current_year: i32,
    ) -> CycleReport {
        let started = Instant::now();
        tracing::debug!("Starting refresh cycle");

        let mut in_flight: FuturesUnordered<_> = Resource::ALL
            .into_iter()
            .map(|resource| {
                let source = &self.source;
                async move { (resource, source.fetch(resource, credential).await) }
            })
            .collect();

        let mut report = CycleReport::default();
        let mut failed = Vec::new();

        while let Some((resource, result)) = in_flight.next().await {
            match result {
                Ok(data) => {
                    self.apply(resource, &data, sink, current_year);
                    report.applied.push(resource);
                }
                Err(FetchError::Unauthorized) => {
                    tracing::warn!("Upstream rejected credential while fetching {}", resource);
                    report.error = Some(CycleError::Authentication);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}", resource, e);
                    failed.push(resource);
                }
            }
        }
        drop(in_flight);

        // An authentication failure supersedes any transport failures seen before it.
        if report.error.is_none() && !failed.is_empty() {
            report.error = Some(CycleError::Transport { resources: failed });
        }
        if let Some(error) = &report.error {
            sink.report_error(error.clone());
        }

        tracing::info!(
            "Refresh cycle finished in {}ms: {} applied, error: {:?}",
            started.elapsed().as_millis(),
            report.applied.len(),
            report.error
        );

        report
    }

    fn apply(&self, resource: Resource, data: &Value, sink: &dyn RenderSink, current_year: i32) {
        match resource {
            Resource::Current => {
                let reading = normalize_current(data);
                sink.apply_gauge_bands(GaugePanel::new(reading, self.gauge_max_watts));
            }
            Resource::Today => {
                let today = assemble_today(data, &self.clock);
                tracing::debug!(
                    "Today series: {} samples",
                    today.data().map_or(0, |s| s.points.len())
                );
                sink.apply_time_series(today);
            }
            Resource::Yearly => {
                let yearly = reduce_yearly(data, current_year);
                if yearly.is_no_data() {
                    tracing::debug!("No usable yearly records");
                }
                sink.apply_yearly_series(yearly);
            }
        }
    }
}

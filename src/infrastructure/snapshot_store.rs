// In-memory snapshot of the last rendered dashboard
use crate::application::render_sink::RenderSink;
use crate::domain::dashboard::{CycleError, DashboardSnapshot, GaugePanel, PanelState};
use crate::domain::telemetry::{Series, TimeSeries, YieldSeries};
use chrono::Utc;
use std::sync::{RwLock, RwLockWriteGuard};

/// Snapshot-holding sink. Each refresh renders into its own store, and a
/// completed cycle is published into the shared one; the last write wins.
#[derive(Debug, Default)]
pub struct DashboardStore {
    snapshot: RwLock<DashboardSnapshot>,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the whole snapshot with one rendered elsewhere.
    pub fn publish(&self, snapshot: DashboardSnapshot) {
        *self.write() = snapshot;
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardSnapshot> {
        self.snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Panel updates clear a stale error banner.
    fn update(&self, apply: impl FnOnce(&mut DashboardSnapshot)) {
        let mut snapshot = self.write();
        apply(&mut snapshot);
        snapshot.last_error = None;
        snapshot.updated_at = Some(Utc::now());
    }
}

impl RenderSink for DashboardStore {
    fn apply_gauge_bands(&self, gauge: GaugePanel) {
        self.update(|s| s.gauge = PanelState::Ready(gauge));
    }

    fn apply_time_series(&self, today: Series<TimeSeries>) {
        self.update(|s| s.today = today.into());
    }

    fn apply_yearly_series(&self, yearly: Series<YieldSeries>) {
        self.update(|s| s.yearly = yearly.into());
    }

    fn report_error(&self, error: CycleError) {
        let mut snapshot = self.write();
        snapshot.last_error = Some(error);
        snapshot.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{CurrentReading, NormalizedSample};

    #[test]
    fn test_new_store_is_pending() {
        let snapshot = DashboardStore::new().snapshot();
        assert_eq!(snapshot.gauge, PanelState::Pending);
        assert_eq!(snapshot.today, PanelState::Pending);
        assert_eq!(snapshot.yearly, PanelState::Pending);
        assert!(snapshot.updated_at.is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = DashboardStore::new();
        let series = |watts| {
            Series::Data(TimeSeries::new(vec![NormalizedSample {
                label: "12:00".to_string(),
                power_watts: watts,
            }]))
        };

        store.apply_time_series(series(100));
        store.apply_time_series(series(200));

        match store.snapshot().today {
            PanelState::Ready(today) => assert_eq!(today.values(), vec![200]),
            other => panic!("unexpected panel state {:?}", other),
        }

        store.apply_time_series(Series::NoData);
        assert_eq!(store.snapshot().today, PanelState::NoData);
    }

    #[test]
    fn test_error_kept_until_next_panel_update() {
        let store = DashboardStore::new();
        store.report_error(CycleError::Authentication);
        assert_eq!(store.snapshot().last_error, Some(CycleError::Authentication));

        store.apply_gauge_bands(GaugePanel::new(
            CurrentReading {
                power_watts: 100.0,
                total_yield: None,
            },
            4500.0,
        ));
        let snapshot = store.snapshot();
        assert!(snapshot.last_error.is_none());
        assert!(matches!(snapshot.gauge, PanelState::Ready(_)));
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let rendered = DashboardStore::new();
        rendered.apply_yearly_series(Series::NoData);

        let shared = DashboardStore::new();
        shared.report_error(CycleError::Authentication);
        shared.publish(rendered.snapshot());

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.yearly, PanelState::NoData);
        assert!(snapshot.last_error.is_none());
        assert_eq!(snapshot.gauge, PanelState::Pending);
    }
}
